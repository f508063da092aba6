// SPDX-License-Identifier: MIT

//! Store-facing side of the engine
//!
//! - `Predicate` - what criteria compile into
//! - `Schema` - field to column mapping
//! - `MemoryStore` - evaluates predicates over in-memory rows
//! - `SqlStatement` - renders predicates as SQL

mod memory;
mod predicate;
mod schema;
mod sql;

pub use memory::{evaluate, MemoryStore, Row};
pub use predicate::{CompareOp, Predicate};
pub use schema::Schema;
pub use sql::SqlStatement;
