// SPDX-License-Identifier: MIT

//! Mapping from entity fields to store columns

use std::collections::BTreeMap;

use crate::error::{CriteriaError, Result};
use crate::model::Field;

/// Column names for each field the store knows about
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    columns: BTreeMap<Field, String>,
}

impl Schema {
    /// A schema with no columns
    pub fn empty() -> Self {
        Self {
            columns: BTreeMap::new(),
        }
    }

    /// Map a field to a column, replacing any previous mapping
    pub fn with(mut self, field: Field, column: impl Into<String>) -> Self {
        self.columns.insert(field, column.into());
        self
    }

    /// Drop the column for a field
    pub fn without(mut self, field: Field) -> Self {
        self.columns.remove(&field);
        self
    }

    /// Resolve the column for a field
    pub fn column(&self, field: Field) -> Result<&str> {
        self.columns
            .get(&field)
            .map(String::as_str)
            .ok_or(CriteriaError::UnresolvedField(field))
    }

    pub fn columns(&self) -> impl Iterator<Item = (Field, &str)> {
        self.columns.iter().map(|(f, c)| (*f, c.as_str()))
    }
}

impl Default for Schema {
    fn default() -> Self {
        Schema::empty()
            .with(Field::Project, "project.path")
            .with(Field::Number, "number")
            .with(Field::Job, "job_name")
            .with(Field::Version, "version")
            .with(Field::Branch, "branch")
            .with(Field::Tag, "tag")
            .with(Field::Status, "status")
            .with(Field::Submitter, "submitter.login")
            .with(Field::SubmitDate, "submit_date")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_maps_every_field() {
        let schema = Schema::default();
        for field in Field::ALL {
            assert!(schema.column(field).is_ok(), "{} unmapped", field);
        }
    }

    #[test]
    fn test_override_and_remove() {
        let schema = Schema::default()
            .with(Field::Version, "build_version")
            .without(Field::Tag);
        assert_eq!(schema.column(Field::Version).unwrap(), "build_version");
        assert!(matches!(
            schema.column(Field::Tag),
            Err(CriteriaError::UnresolvedField(Field::Tag))
        ));
    }
}
