// SPDX-License-Identifier: MIT

//! Engine configuration - YAML loading and context construction

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::registry::{SavedQuery, SavedQueryRegistry};
use crate::context::{ProjectDirectory, QueryContext};
use crate::criteria::path;
use crate::error::{CriteriaError, Result};
use crate::model::Field;
use crate::store::Schema;

/// Environment variable overriding `current_user`
pub const USER_ENV: &str = "CRITERIA_USER";

/// A saved query as written in the configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedQueryDef {
    pub name: String,
    pub query: String,
    #[serde(default)]
    pub subscribers: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub current_user: Option<String>,
    /// Field name to store column, overriding the default schema
    #[serde(default)]
    pub columns: BTreeMap<String, String>,
    /// Known project paths
    #[serde(default)]
    pub projects: Vec<String>,
    #[serde(default)]
    pub saved_queries: Vec<SavedQueryDef>,
}

impl EngineConfig {
    /// Apply overrides from the environment
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(user) = std::env::var(USER_ENV) {
            if !user.trim().is_empty() {
                log::debug!("Current user overridden by {}", USER_ENV);
                self.current_user = Some(user.trim().to_string());
            }
        }
        self
    }

    /// Build the query context described by this configuration
    pub fn context(&self) -> Result<QueryContext> {
        let mut schema = Schema::default();
        for (name, column) in &self.columns {
            let field = Field::from_name(name).ok_or_else(|| {
                CriteriaError::config(format!("unknown field '{}' in columns", name))
            })?;
            schema = schema.with(field, column.as_str());
        }
        {
            // Rows are keyed by column, so each column holds one field
            let mut owners: BTreeMap<&str, Field> = BTreeMap::new();
            for (field, column) in schema.columns() {
                if let Some(other) = owners.insert(column, field) {
                    return Err(CriteriaError::config(format!(
                        "column '{}' is mapped to both '{}' and '{}'",
                        column, other, field
                    )));
                }
            }
        }

        let projects = self
            .projects
            .iter()
            .map(|p| {
                path::normalize(p)
                    .map_err(|reason| CriteriaError::config(format!("project '{}': {}", p, reason)))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut ctx = QueryContext::new()
            .with_schema(schema)
            .with_projects(ProjectDirectory::new(projects));
        if let Some(user) = &self.current_user {
            ctx = ctx.with_user(user.as_str());
        }
        Ok(ctx)
    }

    /// Parse every saved query into a registry
    pub async fn registry(&self) -> Result<SavedQueryRegistry> {
        let registry = SavedQueryRegistry::new();
        for def in &self.saved_queries {
            let query = SavedQuery::parse(&def.name, &def.query, def.subscribers.clone())
                .map_err(|e| CriteriaError::config(format!("saved query '{}': {}", def.name, e)))?;
            if registry.register(query).await.is_some() {
                return Err(CriteriaError::config(format!(
                    "saved query '{}' is defined twice",
                    def.name
                )));
            }
        }
        log::info!("Loaded {} saved queries", self.saved_queries.len());
        Ok(registry)
    }
}

/// Loads engine configuration from YAML files
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load configuration from a YAML file, then apply environment overrides
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<EngineConfig> {
        let content = fs::read_to_string(path)?;
        Ok(Self::parse_yaml(&content)?.with_env_overrides())
    }

    /// Parse configuration from a YAML string
    pub fn parse_yaml(content: &str) -> Result<EngineConfig> {
        let config: EngineConfig = serde_yaml::from_str(content)?;
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
