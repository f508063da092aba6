// SPDX-License-Identifier: MIT

//! Entity model read by criteria
//!
//! Criteria only ever read declared fields through the [`Entity`] trait.
//! [`Build`] is the concrete entity used by the CLI and the tests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;

/// Fields a criteria leaf can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Project,
    Number,
    Job,
    Version,
    Branch,
    Tag,
    Status,
    Submitter,
    SubmitDate,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::Project,
        Field::Number,
        Field::Job,
        Field::Version,
        Field::Branch,
        Field::Tag,
        Field::Status,
        Field::Submitter,
        Field::SubmitDate,
    ];

    /// Name used in query text
    pub fn name(self) -> &'static str {
        match self {
            Field::Project => "Project",
            Field::Number => "Number",
            Field::Job => "Job",
            Field::Version => "Version",
            Field::Branch => "Branch",
            Field::Tag => "Tag",
            Field::Status => "Status",
            Field::Submitter => "Submitter",
            Field::SubmitDate => "Submit Date",
        }
    }

    /// Look up a field by its query name, ignoring case
    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed field value
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Value {
    Int(i64),
    Timestamp(DateTime<Utc>),
    Text(String),
}

impl Value {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Value::Int(n) => write!(f, "{}", n),
            Value::Timestamp(t) => write!(f, "'{}'", t.to_rfc3339()),
        }
    }
}

/// Anything criteria can be matched against in memory
pub trait Entity {
    /// Current value of a field, `None` when absent
    fn value(&self, field: Field) -> Option<Value>;
}

/// Lifecycle status of a build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildStatus {
    Waiting,
    Pending,
    Running,
    Successful,
    Failed,
    Cancelled,
    TimedOut,
}

impl BuildStatus {
    pub const ALL: [BuildStatus; 7] = [
        BuildStatus::Waiting,
        BuildStatus::Pending,
        BuildStatus::Running,
        BuildStatus::Successful,
        BuildStatus::Failed,
        BuildStatus::Cancelled,
        BuildStatus::TimedOut,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            BuildStatus::Waiting => "Waiting",
            BuildStatus::Pending => "Pending",
            BuildStatus::Running => "Running",
            BuildStatus::Successful => "Successful",
            BuildStatus::Failed => "Failed",
            BuildStatus::Cancelled => "Cancelled",
            BuildStatus::TimedOut => "Timed out",
        }
    }

    /// Parse a display name, ignoring case
    pub fn from_display_name(name: &str) -> Option<BuildStatus> {
        BuildStatus::ALL
            .into_iter()
            .find(|s| s.display_name().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A CI build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Build {
    /// Slash separated path of the owning project
    pub project: String,
    pub number: i64,
    pub job: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
    pub status: BuildStatus,
    /// Login of the submitting user
    #[serde(default)]
    pub submitter: Option<String>,
    pub submit_date: DateTime<Utc>,
}

impl Build {
    /// Parse one build from JSON
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Parse a JSON array of builds
    pub fn list_from_json(content: &str) -> Result<Vec<Self>> {
        Ok(serde_json::from_str(content)?)
    }
}

impl Entity for Build {
    fn value(&self, field: Field) -> Option<Value> {
        match field {
            Field::Project => Some(Value::Text(self.project.clone())),
            Field::Number => Some(Value::Int(self.number)),
            Field::Job => Some(Value::Text(self.job.clone())),
            Field::Version => self.version.clone().map(Value::Text),
            Field::Branch => self.branch.clone().map(Value::Text),
            Field::Tag => self.tag.clone().map(Value::Text),
            Field::Status => Some(Value::Text(self.status.display_name().to_string())),
            Field::Submitter => self.submitter.clone().map(Value::Text),
            Field::SubmitDate => Some(Value::Timestamp(self.submit_date)),
        }
    }
}
