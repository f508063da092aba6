// SPDX-License-Identifier: MIT

//! Environment handed to criteria when they compile or match

use crate::criteria::wildcard;
use crate::store::Schema;

/// Known project paths, used to resolve path patterns for the store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectDirectory {
    paths: Vec<String>,
}

impl ProjectDirectory {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Known paths matched by a path pattern, ignoring case
    pub fn matching(&self, pattern: &str) -> Vec<&str> {
        let pattern = pattern.to_lowercase();
        self.paths
            .iter()
            .filter(|p| wildcard::matches_path(&pattern, &p.to_lowercase()))
            .map(String::as_str)
            .collect()
    }
}

/// Everything compilation and matching may read besides the entity itself
#[derive(Debug, Clone, Default)]
pub struct QueryContext {
    pub schema: Schema,
    pub projects: ProjectDirectory,
    /// Login of the user running the query
    pub current_user: Option<String>,
}

impl QueryContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }

    pub fn with_projects(mut self, projects: ProjectDirectory) -> Self {
        self.projects = projects;
        self
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.current_user = Some(user.into());
        self
    }
}
