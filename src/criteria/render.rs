// SPDX-License-Identifier: MIT

//! Canonical query text
//!
//! Precedence from loosest to tightest: `or`, `and`, `not`, then leaves and
//! explicit groups. A child is wrapped in parentheses only when it binds
//! looser than its parent.

use std::fmt;

use super::Criteria;

/// Double-quote a literal, escaping `\` and `"`
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        if ch == '"' || ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
    out
}

impl Criteria {
    fn precedence(&self) -> u8 {
        match self {
            Criteria::Or(..) => 1,
            Criteria::And(..) => 2,
            Criteria::Not(_) => 3,
            Criteria::Leaf(_) | Criteria::Group(_) => 4,
        }
    }
}

fn write_child(f: &mut fmt::Formatter<'_>, child: &Criteria, parent: &Criteria) -> fmt::Result {
    if child.precedence() < parent.precedence() {
        write!(f, "({})", child)
    } else {
        write!(f, "{}", child)
    }
}

impl fmt::Display for Criteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Criteria::Leaf(leaf) => write!(f, "{}", leaf),
            Criteria::And(l, r) => {
                write_child(f, l, self)?;
                f.write_str(" and ")?;
                write_child(f, r, self)
            }
            Criteria::Or(l, r) => {
                write_child(f, l, self)?;
                f.write_str(" or ")?;
                write_child(f, r, self)
            }
            Criteria::Not(c) => {
                f.write_str("not ")?;
                write_child(f, c, self)
            }
            Criteria::Group(c) => write!(f, "({})", c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::{Operator, SubmittedByMeCriteria, TextCriteria};
    use crate::model::Field;

    fn job(name: &str) -> Criteria {
        TextCriteria::new(Field::Job, name, Operator::IS).unwrap().into()
    }

    #[test]
    fn test_quote() {
        assert_eq!(quote("plain"), r#""plain""#);
        assert_eq!(quote(r#"say "hi""#), r#""say \"hi\"""#);
        assert_eq!(quote(r"a\b"), r#""a\\b""#);
    }

    #[test]
    fn test_or_under_and_is_parenthesized() {
        let c = Criteria::and(Criteria::or(job("a"), job("b")), job("c"));
        assert_eq!(
            c.to_string(),
            r#"("Job" is "a" or "Job" is "b") and "Job" is "c""#
        );
    }

    #[test]
    fn test_and_under_or_is_not_parenthesized() {
        let c = Criteria::or(job("a"), Criteria::and(job("b"), job("c")));
        assert_eq!(
            c.to_string(),
            r#""Job" is "a" or "Job" is "b" and "Job" is "c""#
        );
    }

    #[test]
    fn test_not_wraps_composites_only() {
        let c = Criteria::not(job("a"));
        assert_eq!(c.to_string(), r#"not "Job" is "a""#);

        let c = Criteria::not(Criteria::and(job("a"), SubmittedByMeCriteria.into()));
        assert_eq!(c.to_string(), r#"not ("Job" is "a" and submitted by me)"#);

        let c = Criteria::not(Criteria::not(job("a")));
        assert_eq!(c.to_string(), r#"not not "Job" is "a""#);
    }

    #[test]
    fn test_group_is_kept() {
        let c = Criteria::and(Criteria::group(job("a")), job("b"));
        assert_eq!(c.to_string(), r#"("Job" is "a") and "Job" is "b""#);
    }
}
