// SPDX-License-Identifier: MIT

//! Project path criteria

use std::collections::BTreeSet;
use std::fmt;

use super::operator::{Comparison, Operator};
use super::render::quote;
use super::{path, wildcard, with_polarity, Criterion};
use crate::context::QueryContext;
use crate::error::{Result, ValidationError};
use crate::model::{Entity, Field, Value};
use crate::store::Predicate;

/// `"Project" is "team/**"`
///
/// The path is matched segment by segment, ignoring case. The store has no
/// segment-aware wildcard, so compilation resolves the pattern against the
/// project directory in the context and selects the matching paths.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectCriteria {
    path: String,
    operator: Operator,
}

impl ProjectCriteria {
    pub fn new(project_path: &str, operator: Operator) -> std::result::Result<Self, ValidationError> {
        if operator.comparison != Comparison::Is {
            return Err(ValidationError::UnsupportedOperator {
                field: Field::Project.to_string(),
                operator: operator.to_string(),
            });
        }
        if project_path.trim().is_empty() {
            return Err(ValidationError::empty(Field::Project));
        }
        let path = path::normalize(project_path)
            .map_err(|reason| ValidationError::invalid(Field::Project, project_path, reason))?;
        Ok(Self { path, operator })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }
}

impl Criterion for ProjectCriteria {
    fn compile(&self, ctx: &QueryContext) -> Result<Predicate> {
        let column = ctx.schema.column(Field::Project)?;
        // The store compares lower-cased paths, the same way matching does
        let known: BTreeSet<String> = ctx
            .projects
            .matching(&self.path)
            .into_iter()
            .map(str::to_lowercase)
            .collect();
        let values: Vec<Value> = known.into_iter().map(Value::Text).collect();
        log::debug!("Project pattern '{}' resolved to {:?}", self.path, values);

        let natural = if values.is_empty() {
            Predicate::False
        } else {
            Predicate::guarded(
                column,
                Predicate::In {
                    column: column.to_string(),
                    values,
                },
            )
        };
        Ok(with_polarity(self.operator, natural))
    }

    fn matches(&self, entity: &dyn Entity, _ctx: &QueryContext) -> bool {
        let natural = match entity.value(Field::Project) {
            Some(Value::Text(project)) => {
                wildcard::matches_path(&self.path.to_lowercase(), &project.to_lowercase())
            }
            _ => false,
        };
        self.operator.apply(natural)
    }

    fn is_using_project(&self, project: &str) -> bool {
        path::contains_path(&self.path, project)
    }

    fn on_move_project(&mut self, old_path: &str, new_path: &str) {
        if let Some(moved) = path::substitute_path(&self.path, old_path, new_path) {
            log::debug!("Rewrote project '{}' to '{}'", self.path, moved);
            self.path = moved;
        }
    }
}

impl fmt::Display for ProjectCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            quote(Field::Project.name()),
            self.operator,
            quote(&self.path)
        )
    }
}
