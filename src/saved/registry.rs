// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::context::QueryContext;
use crate::criteria::{parse, Criteria, Criterion};
use crate::error::Result;
use crate::model::Entity;

/// A named query and the users notified when it matches
#[derive(Debug, Clone, PartialEq)]
pub struct SavedQuery {
    pub name: String,
    pub criteria: Arc<Criteria>,
    pub subscribers: Vec<String>,
}

impl SavedQuery {
    pub fn new(name: impl Into<String>, criteria: Criteria, subscribers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            criteria: Arc::new(criteria),
            subscribers,
        }
    }

    pub fn parse(name: impl Into<String>, query: &str, subscribers: Vec<String>) -> Result<Self> {
        Ok(Self::new(name, parse(query)?, subscribers))
    }

    /// Canonical query text
    pub fn query(&self) -> String {
        self.criteria.to_string()
    }
}

/// A subscriber to notify about a matching entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub query: String,
    pub subscriber: String,
}

/// Saved queries keyed by name
#[derive(Debug, Clone)]
pub struct SavedQueryRegistry {
    queries: Arc<RwLock<BTreeMap<String, SavedQuery>>>,
}

impl SavedQueryRegistry {
    pub fn new() -> Self {
        Self {
            queries: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Register a query, returning the one it replaced
    pub async fn register(&self, query: SavedQuery) -> Option<SavedQuery> {
        let mut queries = self.queries.write().await;
        queries.insert(query.name.clone(), query)
    }

    pub async fn get(&self, name: &str) -> Option<SavedQuery> {
        let queries = self.queries.read().await;
        queries.get(name).cloned()
    }

    pub async fn remove(&self, name: &str) -> Option<SavedQuery> {
        let mut queries = self.queries.write().await;
        queries.remove(name)
    }

    /// Query names in order
    pub async fn names(&self) -> Vec<String> {
        let queries = self.queries.read().await;
        queries.keys().cloned().collect()
    }

    /// Rewrite every query referencing a moved project
    ///
    /// Returns the number of queries that changed.
    pub async fn on_move_project(&self, old_path: &str, new_path: &str) -> usize {
        let mut queries = self.queries.write().await;
        let mut changed = 0;
        for query in queries.values_mut() {
            let moved = Criteria::moved(&query.criteria, old_path, new_path);
            if !Arc::ptr_eq(&moved, &query.criteria) {
                log::info!(
                    "Saved query '{}' moved from '{}' to '{}': {}",
                    query.name,
                    old_path,
                    new_path,
                    moved
                );
                query.criteria = moved;
                changed += 1;
            }
        }
        changed
    }

    /// Names of the queries referencing `path` or anything below it
    pub async fn is_using_project(&self, path: &str) -> Vec<String> {
        let queries = self.queries.read().await;
        queries
            .values()
            .filter(|q| q.criteria.is_using_project(path))
            .map(|q| q.name.clone())
            .collect()
    }

    /// Names of the queries the entity satisfies
    pub async fn matching(&self, entity: &dyn Entity, ctx: &QueryContext) -> Vec<String> {
        let queries = self.queries.read().await;
        queries
            .values()
            .filter(|q| q.criteria.matches(entity, ctx))
            .map(|q| q.name.clone())
            .collect()
    }

    /// One notification per subscriber of each matching query
    pub async fn notifications(&self, entity: &dyn Entity, ctx: &QueryContext) -> Vec<Notification> {
        let queries = self.queries.read().await;
        let notifications: Vec<Notification> = queries
            .values()
            .filter(|q| q.criteria.matches(entity, ctx))
            .flat_map(|q| {
                q.subscribers.iter().map(move |s| Notification {
                    query: q.name.clone(),
                    subscriber: s.clone(),
                })
            })
            .collect();
        log::debug!("{} notifications for entity", notifications.len());
        notifications
    }
}

impl Default for SavedQueryRegistry {
    fn default() -> Self {
        Self::new()
    }
}
