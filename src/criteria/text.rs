// SPDX-License-Identifier: MIT

//! Wildcard criteria over text fields

use std::fmt;

use super::operator::{Comparison, Operator};
use super::render::quote;
use super::{wildcard, with_polarity, Criterion};
use crate::context::QueryContext;
use crate::error::{Result, ValidationError};
use crate::model::{Entity, Field, Value};
use crate::store::Predicate;

/// `"Version" is "*1.0*"`, `"Job" does not contain "deploy"`
///
/// Matching ignores case. A build without a value for the field never
/// satisfies the natural comparison, so it always satisfies the negated one.
#[derive(Debug, Clone, PartialEq)]
pub struct TextCriteria {
    field: Field,
    pattern: String,
    operator: Operator,
}

impl TextCriteria {
    pub const FIELDS: [Field; 5] = [
        Field::Job,
        Field::Version,
        Field::Branch,
        Field::Tag,
        Field::Submitter,
    ];

    pub fn new(
        field: Field,
        pattern: impl Into<String>,
        operator: Operator,
    ) -> std::result::Result<Self, ValidationError> {
        let pattern = pattern.into();
        let supported = matches!(operator.comparison, Comparison::Is | Comparison::Contains);
        if !Self::FIELDS.contains(&field) || !supported {
            return Err(ValidationError::UnsupportedOperator {
                field: field.to_string(),
                operator: operator.to_string(),
            });
        }
        if pattern.trim().is_empty() {
            return Err(ValidationError::empty(field));
        }
        Ok(Self {
            field,
            pattern,
            operator,
        })
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Lower-cased glob for the natural comparison
    fn glob(&self) -> String {
        let pattern = self.pattern.to_lowercase();
        match self.operator.comparison {
            Comparison::Contains => format!("*{}*", pattern),
            _ => pattern,
        }
    }
}

impl Criterion for TextCriteria {
    fn compile(&self, ctx: &QueryContext) -> Result<Predicate> {
        let column = ctx.schema.column(self.field)?;
        let like = Predicate::Like {
            column: column.to_string(),
            pattern: wildcard::to_like_pattern(&self.glob()),
        };
        Ok(with_polarity(
            self.operator,
            Predicate::guarded(column, like),
        ))
    }

    fn matches(&self, entity: &dyn Entity, _ctx: &QueryContext) -> bool {
        let natural = match entity.value(self.field) {
            Some(Value::Text(value)) => wildcard::matches(&self.glob(), &value.to_lowercase()),
            _ => false,
        };
        self.operator.apply(natural)
    }
}

impl fmt::Display for TextCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            quote(self.field.name()),
            self.operator,
            quote(&self.pattern)
        )
    }
}
