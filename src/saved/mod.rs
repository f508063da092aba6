// SPDX-License-Identifier: MIT

//! Saved queries
//!
//! Named queries loaded from configuration, kept in an async registry that
//! follows project moves and dispatches notifications for new builds.

pub mod config;
pub mod registry;

pub use config::{ConfigLoader, EngineConfig, SavedQueryDef, USER_ENV};
pub use registry::{Notification, SavedQuery, SavedQueryRegistry};
