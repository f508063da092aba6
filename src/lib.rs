// SPDX-License-Identifier: MIT

//! Build query criteria
//!
//! Parse filter queries over builds, compile them into store predicates or
//! match them in memory, and keep saved queries valid when projects move.

pub mod context;
pub mod criteria;
pub mod error;
pub mod model;
pub mod saved;
pub mod store;

pub use context::{ProjectDirectory, QueryContext};
pub use criteria::{parse, Criteria, Criterion};
pub use error::{CriteriaError, Result, ValidationError};
pub use model::{Build, BuildStatus, Entity, Field, Value};
