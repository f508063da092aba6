// SPDX-License-Identifier: MIT

//! Build status criteria

use std::fmt;

use super::operator::{Comparison, Operator};
use super::render::quote;
use super::{with_polarity, Criterion};
use crate::context::QueryContext;
use crate::error::{Result, ValidationError};
use crate::model::{BuildStatus, Entity, Field, Value};
use crate::store::{CompareOp, Predicate};

/// `"Status" is "Failed"`
#[derive(Debug, Clone, PartialEq)]
pub struct StatusCriteria {
    status: BuildStatus,
    operator: Operator,
}

impl StatusCriteria {
    pub fn new(status: BuildStatus, operator: Operator) -> std::result::Result<Self, ValidationError> {
        if operator.comparison != Comparison::Is {
            return Err(ValidationError::UnsupportedOperator {
                field: Field::Status.to_string(),
                operator: operator.to_string(),
            });
        }
        Ok(Self { status, operator })
    }

    pub fn parse(text: &str, operator: Operator) -> std::result::Result<Self, ValidationError> {
        if text.trim().is_empty() {
            return Err(ValidationError::empty(Field::Status));
        }
        let status = BuildStatus::from_display_name(text)
            .ok_or_else(|| ValidationError::invalid(Field::Status, text, "unknown build status"))?;
        Self::new(status, operator)
    }

    pub fn status(&self) -> BuildStatus {
        self.status
    }

    fn expected(&self) -> Value {
        Value::Text(self.status.display_name().to_string())
    }
}

impl Criterion for StatusCriteria {
    fn compile(&self, ctx: &QueryContext) -> Result<Predicate> {
        let column = ctx.schema.column(Field::Status)?;
        let compare = Predicate::Compare {
            column: column.to_string(),
            op: CompareOp::Eq,
            value: self.expected(),
        };
        Ok(with_polarity(
            self.operator,
            Predicate::guarded(column, compare),
        ))
    }

    fn matches(&self, entity: &dyn Entity, _ctx: &QueryContext) -> bool {
        let natural = entity.value(Field::Status) == Some(self.expected());
        self.operator.apply(natural)
    }
}

impl fmt::Display for StatusCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            quote(Field::Status.name()),
            self.operator,
            quote(self.status.display_name())
        )
    }
}
