// SPDX-License-Identifier: MIT

//! Operators applied by leaf criteria
//!
//! An operator is a comparison plus a polarity. The negated polarity is the
//! logical complement of the natural one in every backend.

use std::fmt;

/// Comparison performed by a leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    Is,
    Contains,
    GreaterThan,
    LessThan,
    Before,
    After,
}

impl Comparison {
    pub const ALL: [Comparison; 6] = [
        Comparison::Is,
        Comparison::Contains,
        Comparison::GreaterThan,
        Comparison::LessThan,
        Comparison::Before,
        Comparison::After,
    ];
}

/// Whether the natural or the negated form applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Polarity {
    Natural,
    Negated,
}

/// Comparison with polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Operator {
    pub comparison: Comparison,
    pub polarity: Polarity,
}

impl Operator {
    pub const IS: Operator = Operator::natural(Comparison::Is);
    pub const IS_NOT: Operator = Operator::negated_of(Comparison::Is);
    pub const CONTAINS: Operator = Operator::natural(Comparison::Contains);
    pub const DOES_NOT_CONTAIN: Operator = Operator::negated_of(Comparison::Contains);

    pub const fn natural(comparison: Comparison) -> Self {
        Self {
            comparison,
            polarity: Polarity::Natural,
        }
    }

    pub const fn negated_of(comparison: Comparison) -> Self {
        Self {
            comparison,
            polarity: Polarity::Negated,
        }
    }

    /// Same comparison, opposite polarity
    pub fn negated(self) -> Self {
        let polarity = match self.polarity {
            Polarity::Natural => Polarity::Negated,
            Polarity::Negated => Polarity::Natural,
        };
        Self { polarity, ..self }
    }

    pub fn is_negated(self) -> bool {
        self.polarity == Polarity::Negated
    }

    /// Apply polarity to the result of the natural comparison
    pub fn apply(self, natural: bool) -> bool {
        match self.polarity {
            Polarity::Natural => natural,
            Polarity::Negated => !natural,
        }
    }

    /// Keyword text used in queries
    pub fn keyword(self) -> &'static str {
        use Comparison::*;
        use Polarity::*;
        match (self.comparison, self.polarity) {
            (Is, Natural) => "is",
            (Is, Negated) => "is not",
            (Contains, Natural) => "contains",
            (Contains, Negated) => "does not contain",
            (GreaterThan, Natural) => "is greater than",
            (GreaterThan, Negated) => "is not greater than",
            (LessThan, Natural) => "is less than",
            (LessThan, Negated) => "is not less than",
            (Before, Natural) => "is before",
            (Before, Negated) => "is not before",
            (After, Natural) => "is after",
            (After, Negated) => "is not after",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_display() {
        assert_eq!(format!("{}", Operator::IS), "is");
        assert_eq!(format!("{}", Operator::IS_NOT), "is not");
        assert_eq!(format!("{}", Operator::DOES_NOT_CONTAIN), "does not contain");
        assert_eq!(
            format!("{}", Operator::negated_of(Comparison::GreaterThan)),
            "is not greater than"
        );
        assert_eq!(format!("{}", Operator::natural(Comparison::After)), "is after");
    }

    #[test]
    fn test_negation_is_involution() {
        for comparison in Comparison::ALL {
            let op = Operator::natural(comparison);
            assert_ne!(op, op.negated());
            assert_eq!(op, op.negated().negated());
            assert_eq!(op.negated().comparison, comparison);
        }
    }

    #[test]
    fn test_apply() {
        assert!(Operator::IS.apply(true));
        assert!(!Operator::IS_NOT.apply(true));
        assert!(Operator::IS_NOT.apply(false));
        assert!(Operator::DOES_NOT_CONTAIN.is_negated());
        assert!(!Operator::CONTAINS.is_negated());
    }
}
