// SPDX-License-Identifier: MIT

//! Submit date criteria

use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;

use super::operator::{Comparison, Operator};
use super::render::quote;
use super::{with_polarity, Criterion};
use crate::context::QueryContext;
use crate::error::{Result, ValidationError};
use crate::model::{Entity, Field, Value};
use crate::store::{CompareOp, Predicate};

/// `"Submit Date" is before "2024-01-01"`
///
/// The operand text is kept as written so rendering reproduces it.
#[derive(Debug, Clone, PartialEq)]
pub struct DateCriteria {
    text: String,
    at: DateTime<Utc>,
    operator: Operator,
}

/// Parse `YYYY-MM-DD` (midnight UTC) or an RFC 3339 timestamp
fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(text) {
        return Some(at.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

impl DateCriteria {
    pub fn parse(text: &str, operator: Operator) -> std::result::Result<Self, ValidationError> {
        if !matches!(operator.comparison, Comparison::Before | Comparison::After) {
            return Err(ValidationError::UnsupportedOperator {
                field: Field::SubmitDate.to_string(),
                operator: operator.to_string(),
            });
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::empty(Field::SubmitDate));
        }
        let at = parse_timestamp(text).ok_or_else(|| {
            ValidationError::invalid(
                Field::SubmitDate,
                text,
                "expected YYYY-MM-DD or an RFC 3339 timestamp",
            )
        })?;
        Ok(Self {
            text: text.to_string(),
            at,
            operator,
        })
    }

    pub fn at(&self) -> DateTime<Utc> {
        self.at
    }

    fn compare_op(&self) -> CompareOp {
        match self.operator.comparison {
            Comparison::Before => CompareOp::Lt,
            _ => CompareOp::Gt,
        }
    }
}

impl Criterion for DateCriteria {
    fn compile(&self, ctx: &QueryContext) -> Result<Predicate> {
        let column = ctx.schema.column(Field::SubmitDate)?;
        let compare = Predicate::Compare {
            column: column.to_string(),
            op: self.compare_op(),
            value: Value::Timestamp(self.at),
        };
        Ok(with_polarity(
            self.operator,
            Predicate::guarded(column, compare),
        ))
    }

    fn matches(&self, entity: &dyn Entity, _ctx: &QueryContext) -> bool {
        let natural = match entity.value(Field::SubmitDate) {
            Some(Value::Timestamp(submitted)) => match self.compare_op() {
                CompareOp::Lt => submitted < self.at,
                CompareOp::Gt => submitted > self.at,
                CompareOp::Eq => submitted == self.at,
            },
            _ => false,
        };
        self.operator.apply(natural)
    }
}

impl fmt::Display for DateCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            quote(Field::SubmitDate.name()),
            self.operator,
            quote(&self.text)
        )
    }
}
