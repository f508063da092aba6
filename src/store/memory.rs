// SPDX-License-Identifier: MIT

//! In-memory store backend
//!
//! Rows are flat column maps. Predicates are evaluated with SQL
//! three-valued logic: a comparison against a missing column is unknown,
//! and a row is selected only when the whole predicate is true.

use std::collections::HashMap;
use std::mem::discriminant;

use super::predicate::{CompareOp, Predicate};
use super::schema::Schema;
use crate::model::{Entity, Value};

const LIKE_ESCAPE: char = '\\';

/// One stored row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: HashMap<String, Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row from every field the schema maps
    pub fn from_entity(entity: &dyn Entity, schema: &Schema) -> Self {
        let mut row = Row::new();
        for (field, column) in schema.columns() {
            if let Some(value) = entity.value(field) {
                row.set(column, value);
            }
        }
        row
    }

    pub fn set(&mut self, column: &str, value: Value) {
        self.columns.insert(column.to_string(), value);
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns.get(column)
    }
}

/// A table of rows that can be filtered by predicates
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    rows: Vec<Row>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load one row per entity
    pub fn from_entities<'a, E, I>(entities: I, schema: &Schema) -> Self
    where
        E: Entity + 'a,
        I: IntoIterator<Item = &'a E>,
    {
        Self {
            rows: entities
                .into_iter()
                .map(|e| Row::from_entity(e, schema))
                .collect(),
        }
    }

    pub fn insert(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Indices of rows for which the predicate is true
    pub fn select(&self, predicate: &Predicate) -> Vec<usize> {
        let selected: Vec<usize> = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| evaluate(predicate, row) == Some(true))
            .map(|(i, _)| i)
            .collect();
        log::debug!(
            "Selected {}/{} rows with {:?}",
            selected.len(),
            self.rows.len(),
            predicate
        );
        selected
    }
}

/// Evaluate a predicate against one row, `None` meaning unknown
pub fn evaluate(predicate: &Predicate, row: &Row) -> Option<bool> {
    match predicate {
        Predicate::True => Some(true),
        Predicate::False => Some(false),
        Predicate::IsNull(column) => Some(row.get(column).is_none()),
        Predicate::Like { column, pattern } => match row.get(column)? {
            Value::Text(text) => Some(like(&text.to_lowercase(), pattern)),
            _ => None,
        },
        Predicate::Compare { column, op, value } => {
            let current = row.get(column)?;
            if discriminant(current) != discriminant(value) {
                return None;
            }
            Some(match op {
                CompareOp::Eq => current == value,
                CompareOp::Gt => current > value,
                CompareOp::Lt => current < value,
            })
        }
        Predicate::In { column, values } => match row.get(column)? {
            Value::Text(text) => Some(values.contains(&Value::Text(text.to_lowercase()))),
            other => Some(values.contains(other)),
        },
        Predicate::And(parts) => {
            let mut result = Some(true);
            for part in parts {
                match evaluate(part, row) {
                    Some(false) => return Some(false),
                    None => result = None,
                    Some(true) => {}
                }
            }
            result
        }
        Predicate::Or(parts) => {
            let mut result = Some(false);
            for part in parts {
                match evaluate(part, row) {
                    Some(true) => return Some(true),
                    None => result = None,
                    Some(false) => {}
                }
            }
            result
        }
        Predicate::Not(inner) => evaluate(inner, row).map(|b| !b),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum LikeToken {
    AnyRun,
    AnyOne,
    Literal(char),
}

fn like_tokens(pattern: &str) -> Vec<LikeToken> {
    let mut tokens = Vec::new();
    let mut chars = pattern.chars();
    while let Some(ch) = chars.next() {
        tokens.push(match ch {
            '%' => LikeToken::AnyRun,
            '_' => LikeToken::AnyOne,
            // A trailing escape stands for itself
            LIKE_ESCAPE => LikeToken::Literal(chars.next().unwrap_or(LIKE_ESCAPE)),
            other => LikeToken::Literal(other),
        });
    }
    tokens
}

/// SQL `LIKE` over characters
fn like(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.chars().collect();
    let tokens = like_tokens(pattern);

    // reachable[j]: the tokens consumed so far can match text[..j]
    let mut reachable = vec![false; text.len() + 1];
    reachable[0] = true;
    for token in tokens {
        let mut next = vec![false; text.len() + 1];
        for j in 0..=text.len() {
            match token {
                LikeToken::AnyRun => {
                    next[j] = reachable[j] || (j > 0 && next[j - 1]);
                }
                LikeToken::AnyOne => {
                    next[j] = j > 0 && reachable[j - 1];
                }
                LikeToken::Literal(c) => {
                    next[j] = j > 0 && reachable[j - 1] && text[j - 1] == c;
                }
            }
        }
        reachable = next;
    }
    reachable[text.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: Vec<(&str, Value)>) -> Row {
        let mut row = Row::new();
        for (k, v) in pairs {
            row.set(k, v);
        }
        row
    }

    fn like_pred(column: &str, pattern: &str) -> Predicate {
        Predicate::Like {
            column: column.to_string(),
            pattern: pattern.to_string(),
        }
    }

    #[test]
    fn test_like() {
        assert!(like("1.0.3", "%1.0%"));
        assert!(!like("2.0.0", "%1.0%"));
        assert!(like("abc", "a_c"));
        assert!(!like("abbc", "a_c"));
        assert!(like("50%", "50\\%"));
        assert!(!like("500", "50\\%"));
        assert!(like("a_b", "a\\_b"));
        assert!(like("a\\b", "a\\\\b"));
        assert!(like("", "%"));
        assert!(!like("", "_"));
    }

    #[test]
    fn test_like_lowercases_column_value() {
        let r = row(vec![("version", Value::Text("RC-1".into()))]);
        assert_eq!(evaluate(&like_pred("version", "rc-%"), &r), Some(true));
    }

    #[test]
    fn test_null_is_unknown() {
        let r = Row::new();
        assert_eq!(evaluate(&like_pred("version", "%"), &r), None);
        assert_eq!(evaluate(&like_pred("version", "%").negate(), &r), None);
        assert_eq!(
            evaluate(&Predicate::IsNull("version".into()), &r),
            Some(true)
        );
    }

    #[test]
    fn test_guard_makes_null_false() {
        let r = Row::new();
        let guarded = Predicate::guarded("version", like_pred("version", "%"));
        assert_eq!(evaluate(&guarded, &r), Some(false));
        assert_eq!(evaluate(&guarded.negate(), &r), Some(true));
    }

    #[test]
    fn test_three_valued_and_or() {
        let r = Row::new();
        let unknown = like_pred("missing", "%");
        assert_eq!(
            evaluate(&unknown.clone().and(Predicate::False), &r),
            Some(false)
        );
        assert_eq!(evaluate(&unknown.clone().and(Predicate::True), &r), None);
        assert_eq!(
            evaluate(&unknown.clone().or(Predicate::True), &r),
            Some(true)
        );
        assert_eq!(evaluate(&unknown.or(Predicate::False), &r), None);
    }

    #[test]
    fn test_compare_and_in() {
        let r = row(vec![
            ("number", Value::Int(10)),
            ("project.path", Value::Text("team/app".into())),
        ]);
        let gt = Predicate::Compare {
            column: "number".into(),
            op: CompareOp::Gt,
            value: Value::Int(5),
        };
        assert_eq!(evaluate(&gt, &r), Some(true));

        let mismatched = Predicate::Compare {
            column: "number".into(),
            op: CompareOp::Eq,
            value: Value::Text("10".into()),
        };
        assert_eq!(evaluate(&mismatched, &r), None);

        let within = Predicate::In {
            column: "project.path".into(),
            values: vec![Value::Text("team/app".into())],
        };
        assert_eq!(evaluate(&within, &r), Some(true));

        let mixed = row(vec![("project.path", Value::Text("Team/App".into()))]);
        assert_eq!(evaluate(&within, &mixed), Some(true));
    }

    #[test]
    fn test_select() {
        let mut store = MemoryStore::new();
        store.insert(row(vec![("number", Value::Int(1))]));
        store.insert(row(vec![("number", Value::Int(2))]));
        store.insert(Row::new());

        let p = Predicate::Compare {
            column: "number".into(),
            op: CompareOp::Lt,
            value: Value::Int(2),
        };
        assert_eq!(store.select(&p), vec![0]);
        assert_eq!(store.select(&p.negate()), vec![1]);
        assert_eq!(store.len(), 3);
    }
}
