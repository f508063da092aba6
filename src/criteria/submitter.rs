// SPDX-License-Identifier: MIT

//! Criteria bound to the user running the query

use std::fmt;

use super::Criterion;
use crate::context::QueryContext;
use crate::error::Result;
use crate::model::{Entity, Field, Value};
use crate::store::{CompareOp, Predicate};

/// `submitted by me`: the submitter is the user running the query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SubmittedByMeCriteria;

impl Criterion for SubmittedByMeCriteria {
    fn compile(&self, ctx: &QueryContext) -> Result<Predicate> {
        let column = ctx.schema.column(Field::Submitter)?;
        match &ctx.current_user {
            Some(user) => Ok(Predicate::guarded(
                column,
                Predicate::Compare {
                    column: column.to_string(),
                    op: CompareOp::Eq,
                    value: Value::Text(user.clone()),
                },
            )),
            None => {
                log::warn!("'submitted by me' compiled without a current user");
                Ok(Predicate::False)
            }
        }
    }

    fn matches(&self, entity: &dyn Entity, ctx: &QueryContext) -> bool {
        match (&ctx.current_user, entity.value(Field::Submitter)) {
            (Some(user), Some(Value::Text(submitter))) => *user == submitter,
            _ => false,
        }
    }
}

impl fmt::Display for SubmittedByMeCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("submitted by me")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct By(&'static str);

    impl Entity for By {
        fn value(&self, field: Field) -> Option<Value> {
            (field == Field::Submitter).then(|| Value::Text(self.0.to_string()))
        }
    }

    #[test]
    fn test_matches_current_user() {
        let ctx = QueryContext::new().with_user("alice");
        assert!(SubmittedByMeCriteria.matches(&By("alice"), &ctx));
        assert!(!SubmittedByMeCriteria.matches(&By("bob"), &ctx));
    }

    #[test]
    fn test_no_current_user_never_matches() {
        let ctx = QueryContext::new();
        assert!(!SubmittedByMeCriteria.matches(&By("alice"), &ctx));
        assert_eq!(SubmittedByMeCriteria.compile(&ctx).unwrap(), Predicate::False);
    }
}
