// SPDX-License-Identifier: MIT

//! Build number criteria

use std::fmt;

use super::operator::{Comparison, Operator};
use super::render::quote;
use super::{with_polarity, Criterion};
use crate::context::QueryContext;
use crate::error::{Result, ValidationError};
use crate::model::{Entity, Field, Value};
use crate::store::{CompareOp, Predicate};

/// `"Number" is "12"`, `"Number" is greater than "#100"`
#[derive(Debug, Clone, PartialEq)]
pub struct NumberCriteria {
    value: i64,
    operator: Operator,
}

impl NumberCriteria {
    pub fn new(value: i64, operator: Operator) -> std::result::Result<Self, ValidationError> {
        match operator.comparison {
            Comparison::Is | Comparison::GreaterThan | Comparison::LessThan => {
                Ok(Self { value, operator })
            }
            _ => Err(ValidationError::UnsupportedOperator {
                field: Field::Number.to_string(),
                operator: operator.to_string(),
            }),
        }
    }

    /// Parse an operand such as `12` or `#12`
    pub fn parse(text: &str, operator: Operator) -> std::result::Result<Self, ValidationError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty(Field::Number));
        }
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        let value = digits
            .parse::<i64>()
            .map_err(|e| ValidationError::invalid(Field::Number, text, e.to_string()))?;
        Self::new(value, operator)
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    fn compare_op(&self) -> CompareOp {
        match self.operator.comparison {
            Comparison::GreaterThan => CompareOp::Gt,
            Comparison::LessThan => CompareOp::Lt,
            _ => CompareOp::Eq,
        }
    }
}

impl Criterion for NumberCriteria {
    fn compile(&self, ctx: &QueryContext) -> Result<Predicate> {
        let column = ctx.schema.column(Field::Number)?;
        let compare = Predicate::Compare {
            column: column.to_string(),
            op: self.compare_op(),
            value: Value::Int(self.value),
        };
        Ok(with_polarity(
            self.operator,
            Predicate::guarded(column, compare),
        ))
    }

    fn matches(&self, entity: &dyn Entity, _ctx: &QueryContext) -> bool {
        let natural = match entity.value(Field::Number) {
            Some(Value::Int(number)) => match self.compare_op() {
                CompareOp::Eq => number == self.value,
                CompareOp::Gt => number > self.value,
                CompareOp::Lt => number < self.value,
            },
            _ => false,
        };
        self.operator.apply(natural)
    }
}

impl fmt::Display for NumberCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            quote(Field::Number.name()),
            self.operator,
            quote(&self.value.to_string())
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Numbered(Option<i64>);

    impl Entity for Numbered {
        fn value(&self, field: Field) -> Option<Value> {
            match field {
                Field::Number => self.0.map(Value::Int),
                _ => None,
            }
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!(NumberCriteria::parse("#42", Operator::IS).unwrap().value(), 42);
        assert_eq!(NumberCriteria::parse(" 7 ", Operator::IS).unwrap().value(), 7);
        assert!(matches!(
            NumberCriteria::parse("seven", Operator::IS),
            Err(ValidationError::InvalidOperand { .. })
        ));
        assert!(matches!(
            NumberCriteria::parse("", Operator::IS),
            Err(ValidationError::EmptyOperand { .. })
        ));
        assert!(NumberCriteria::parse("1", Operator::CONTAINS).is_err());
    }

    #[test]
    fn test_comparisons() {
        let ctx = QueryContext::new();
        let gt = NumberCriteria::new(10, Operator::natural(Comparison::GreaterThan)).unwrap();
        let not_gt = NumberCriteria::new(10, Operator::negated_of(Comparison::GreaterThan)).unwrap();
        let lt = NumberCriteria::new(10, Operator::natural(Comparison::LessThan)).unwrap();

        assert!(gt.matches(&Numbered(Some(11)), &ctx));
        assert!(!gt.matches(&Numbered(Some(10)), &ctx));
        assert!(not_gt.matches(&Numbered(Some(10)), &ctx));
        assert!(lt.matches(&Numbered(Some(9)), &ctx));
        assert!(!gt.matches(&Numbered(None), &ctx));
        assert!(not_gt.matches(&Numbered(None), &ctx));
    }

    #[test]
    fn test_render_normalizes_operand() {
        let c = NumberCriteria::parse("#12", Operator::natural(Comparison::LessThan)).unwrap();
        assert_eq!(c.to_string(), r#""Number" is less than "12""#);
    }
}
