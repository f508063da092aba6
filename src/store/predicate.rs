// SPDX-License-Identifier: MIT

//! Store-native predicates produced by criteria compilation

use crate::model::Value;

/// Ordering comparisons understood by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Gt,
    Lt,
}

impl CompareOp {
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
        }
    }
}

/// A composable store condition
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    True,
    False,
    /// Column holds no value
    IsNull(String),
    /// Case-insensitive `LIKE` with `\` as escape; the pattern is already lower-cased
    Like { column: String, pattern: String },
    Compare {
        column: String,
        op: CompareOp,
        value: Value,
    },
    /// Case-insensitive membership; text values are already lower-cased
    In { column: String, values: Vec<Value> },
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    pub fn is_not_null(column: impl Into<String>) -> Self {
        Predicate::IsNull(column.into()).negate()
    }

    /// `column IS NOT NULL AND condition`, which never evaluates to unknown
    /// as long as `condition` is only unknown on a null column
    pub fn guarded(column: &str, condition: Predicate) -> Self {
        Predicate::is_not_null(column).and(condition)
    }

    pub fn and(self, other: Predicate) -> Self {
        let mut parts = match self {
            Predicate::And(parts) => parts,
            single => vec![single],
        };
        match other {
            Predicate::And(more) => parts.extend(more),
            single => parts.push(single),
        }
        Predicate::And(parts)
    }

    pub fn or(self, other: Predicate) -> Self {
        let mut parts = match self {
            Predicate::Or(parts) => parts,
            single => vec![single],
        };
        match other {
            Predicate::Or(more) => parts.extend(more),
            single => parts.push(single),
        }
        Predicate::Or(parts)
    }

    /// Logical negation; double negation collapses, which holds under
    /// three-valued logic as well
    pub fn negate(self) -> Self {
        match self {
            Predicate::True => Predicate::False,
            Predicate::False => Predicate::True,
            Predicate::Not(inner) => *inner,
            other => Predicate::Not(Box::new(other)),
        }
    }
}
