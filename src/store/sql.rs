// SPDX-License-Identifier: MIT

//! Render predicates as parameterised SQL `WHERE` fragments

use std::fmt;

use super::predicate::Predicate;
use crate::model::Value;

/// A SQL condition with `?` placeholders and their values in order
#[derive(Debug, Clone, PartialEq)]
pub struct SqlStatement {
    pub clause: String,
    pub params: Vec<Value>,
}

impl SqlStatement {
    pub fn from_predicate(predicate: &Predicate) -> Self {
        let mut params = Vec::new();
        let clause = render(predicate, &mut params);
        Self { clause, params }
    }
}

impl fmt::Display for SqlStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.clause)?;
        if !self.params.is_empty() {
            let params: Vec<String> = self.params.iter().map(|p| p.to_string()).collect();
            write!(f, " -- [{}]", params.join(", "))?;
        }
        Ok(())
    }
}

/// Double-quote each dotted part of a column reference
fn quote_ident(column: &str) -> String {
    column
        .split('.')
        .map(|part| format!("\"{}\"", part.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(".")
}

fn render(predicate: &Predicate, params: &mut Vec<Value>) -> String {
    match predicate {
        Predicate::True => "1 = 1".to_string(),
        Predicate::False => "1 = 0".to_string(),
        Predicate::IsNull(column) => format!("{} IS NULL", quote_ident(column)),
        Predicate::Like { column, pattern } => {
            params.push(Value::Text(pattern.clone()));
            format!("LOWER({}) LIKE ? ESCAPE '\\'", quote_ident(column))
        }
        Predicate::Compare { column, op, value } => {
            params.push(value.clone());
            format!("{} {} ?", quote_ident(column), op.symbol())
        }
        Predicate::In { column, values } => {
            params.extend(values.iter().cloned());
            let holes = vec!["?"; values.len()].join(", ");
            format!("LOWER({}) IN ({})", quote_ident(column), holes)
        }
        Predicate::And(parts) => join(parts, " AND ", "1 = 1", params),
        Predicate::Or(parts) => join(parts, " OR ", "1 = 0", params),
        Predicate::Not(inner) => match inner.as_ref() {
            Predicate::IsNull(column) => format!("{} IS NOT NULL", quote_ident(column)),
            other => format!("NOT ({})", render(other, params)),
        },
    }
}

fn join(parts: &[Predicate], separator: &str, empty: &str, params: &mut Vec<Value>) -> String {
    if parts.is_empty() {
        return empty.to_string();
    }
    let rendered: Vec<String> = parts.iter().map(|p| render(p, params)).collect();
    format!("({})", rendered.join(separator))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::predicate::CompareOp;

    #[test]
    fn test_guarded_like() {
        let p = Predicate::guarded(
            "version",
            Predicate::Like {
                column: "version".into(),
                pattern: "%1.0%".into(),
            },
        )
        .negate();
        let sql = SqlStatement::from_predicate(&p);
        assert_eq!(
            sql.clause,
            "NOT ((\"version\" IS NOT NULL AND LOWER(\"version\") LIKE ? ESCAPE '\\'))"
        );
        assert_eq!(sql.params, vec![Value::Text("%1.0%".into())]);
    }

    #[test]
    fn test_in_and_dotted_column() {
        let p = Predicate::In {
            column: "project.path".into(),
            values: vec![Value::Text("a".into()), Value::Text("b".into())],
        };
        let sql = SqlStatement::from_predicate(&p);
        assert_eq!(sql.clause, "LOWER(\"project\".\"path\") IN (?, ?)");
        assert_eq!(sql.params.len(), 2);
    }

    #[test]
    fn test_params_in_order() {
        let p = Predicate::Compare {
            column: "number".into(),
            op: CompareOp::Gt,
            value: Value::Int(1),
        }
        .or(Predicate::Compare {
            column: "number".into(),
            op: CompareOp::Lt,
            value: Value::Int(9),
        });
        let sql = SqlStatement::from_predicate(&p);
        assert_eq!(sql.clause, "(\"number\" > ? OR \"number\" < ?)");
        assert_eq!(sql.params, vec![Value::Int(1), Value::Int(9)]);
        assert_eq!(sql.to_string(), "(\"number\" > ? OR \"number\" < ?) -- [1, 9]");
    }

    #[test]
    fn test_constants() {
        assert_eq!(SqlStatement::from_predicate(&Predicate::False).clause, "1 = 0");
        assert_eq!(SqlStatement::from_predicate(&Predicate::And(vec![])).clause, "1 = 1");
    }
}
