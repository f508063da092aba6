// SPDX-License-Identifier: MIT

//! Query criteria
//!
//! A parsed query is a tree of criteria. The same tree can be compiled into
//! a store predicate or matched directly against an in-memory entity, and
//! both must select the same entities. Queries look like:
//! - `"Version" is "*1.0*"`
//! - `"Project" is "team/**" and not "Status" is "Successful"`
//! - `submitted by me or "Number" is greater than "100"`

mod date;
mod number;
mod operator;
mod parser;
pub mod path;
mod project;
mod render;
mod status;
mod submitter;
mod text;
pub mod wildcard;

use std::sync::Arc;

use crate::context::QueryContext;
use crate::error::Result;
use crate::model::Entity;
use crate::store::Predicate;

pub use date::DateCriteria;
pub use number::NumberCriteria;
pub use operator::{Comparison, Operator, Polarity};
pub use parser::parse;
pub use project::ProjectCriteria;
pub use render::quote;
pub use status::StatusCriteria;
pub use submitter::SubmittedByMeCriteria;
pub use text::TextCriteria;

/// Operations every criteria node provides
pub trait Criterion: std::fmt::Display {
    /// Compile into a store predicate
    fn compile(&self, ctx: &QueryContext) -> Result<Predicate>;

    /// Whether the entity would be selected by the compiled predicate
    fn matches(&self, entity: &dyn Entity, ctx: &QueryContext) -> bool;

    /// Whether the node references `path` or anything below it
    fn is_using_project(&self, _path: &str) -> bool {
        false
    }

    /// Rewrite references to a moved project
    fn on_move_project(&mut self, _old_path: &str, _new_path: &str) {}
}

/// Apply operator polarity to a compiled natural predicate
pub(crate) fn with_polarity(operator: Operator, natural: Predicate) -> Predicate {
    if operator.is_negated() {
        natural.negate()
    } else {
        natural
    }
}

/// A criteria bound to one field
#[derive(Debug, Clone, PartialEq)]
pub enum Leaf {
    Text(TextCriteria),
    Project(ProjectCriteria),
    Number(NumberCriteria),
    Status(StatusCriteria),
    Date(DateCriteria),
    SubmittedByMe(SubmittedByMeCriteria),
}

impl Leaf {
    fn as_criterion(&self) -> &dyn Criterion {
        match self {
            Leaf::Text(c) => c,
            Leaf::Project(c) => c,
            Leaf::Number(c) => c,
            Leaf::Status(c) => c,
            Leaf::Date(c) => c,
            Leaf::SubmittedByMe(c) => c,
        }
    }
}

impl std::fmt::Display for Leaf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_criterion())
    }
}

impl Criterion for Leaf {
    fn compile(&self, ctx: &QueryContext) -> Result<Predicate> {
        self.as_criterion().compile(ctx)
    }

    fn matches(&self, entity: &dyn Entity, ctx: &QueryContext) -> bool {
        self.as_criterion().matches(entity, ctx)
    }

    fn is_using_project(&self, path: &str) -> bool {
        self.as_criterion().is_using_project(path)
    }

    fn on_move_project(&mut self, old_path: &str, new_path: &str) {
        // Only project leaves carry paths
        if let Leaf::Project(c) = self {
            c.on_move_project(old_path, new_path);
        }
    }
}

/// A criteria tree
///
/// Children are reference counted so a refactored copy shares every
/// subtree it did not touch.
#[derive(Debug, Clone, PartialEq)]
pub enum Criteria {
    Leaf(Leaf),
    And(Arc<Criteria>, Arc<Criteria>),
    Or(Arc<Criteria>, Arc<Criteria>),
    Not(Arc<Criteria>),
    /// Explicitly parenthesized in the query text
    Group(Arc<Criteria>),
}

impl Criteria {
    pub fn and(left: Criteria, right: Criteria) -> Self {
        Criteria::And(Arc::new(left), Arc::new(right))
    }

    pub fn or(left: Criteria, right: Criteria) -> Self {
        Criteria::Or(Arc::new(left), Arc::new(right))
    }

    pub fn not(inner: Criteria) -> Self {
        Criteria::Not(Arc::new(inner))
    }

    pub fn group(inner: Criteria) -> Self {
        Criteria::Group(Arc::new(inner))
    }

    /// Visit every node depth-first, parents before children
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Criteria)) {
        visit(self);
        match self {
            Criteria::Leaf(_) => {}
            Criteria::And(l, r) | Criteria::Or(l, r) => {
                l.walk(visit);
                r.walk(visit);
            }
            Criteria::Not(c) | Criteria::Group(c) => c.walk(visit),
        }
    }

    /// Every leaf in the tree, left to right
    pub fn leaves(&self) -> Vec<&Leaf> {
        let mut leaves = Vec::new();
        self.walk(&mut |node| {
            if let Criteria::Leaf(leaf) = node {
                leaves.push(leaf);
            }
        });
        leaves
    }

    /// Copy-on-write project move
    ///
    /// Returns the same tree when nothing references `old_path`, when the
    /// paths are the same, or when `new_path` is empty; otherwise a new tree
    /// sharing all untouched subtrees with the original.
    pub fn moved(tree: &Arc<Criteria>, old_path: &str, new_path: &str) -> Arc<Criteria> {
        if path::normalize(new_path).is_err() {
            log::warn!("Ignoring move of '{}' to invalid path '{}'", old_path, new_path);
            return Arc::clone(tree);
        }
        if path::same_path(old_path, new_path) || !tree.is_using_project(old_path) {
            return Arc::clone(tree);
        }
        let mut next = Criteria::clone(tree);
        next.on_move_project(old_path, new_path);
        Arc::new(next)
    }
}

impl From<Leaf> for Criteria {
    fn from(leaf: Leaf) -> Self {
        Criteria::Leaf(leaf)
    }
}

macro_rules! leaf_conversions {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Leaf {
                fn from(c: $ty) -> Self {
                    Leaf::$variant(c)
                }
            }

            impl From<$ty> for Criteria {
                fn from(c: $ty) -> Self {
                    Criteria::Leaf(Leaf::$variant(c))
                }
            }
        )*
    };
}

leaf_conversions!(
    Text(TextCriteria),
    Project(ProjectCriteria),
    Number(NumberCriteria),
    Status(StatusCriteria),
    Date(DateCriteria),
    SubmittedByMe(SubmittedByMeCriteria),
);

impl Criterion for Criteria {
    fn compile(&self, ctx: &QueryContext) -> Result<Predicate> {
        match self {
            Criteria::Leaf(leaf) => leaf.compile(ctx),
            Criteria::And(l, r) => Ok(l.compile(ctx)?.and(r.compile(ctx)?)),
            Criteria::Or(l, r) => Ok(l.compile(ctx)?.or(r.compile(ctx)?)),
            Criteria::Not(c) => Ok(c.compile(ctx)?.negate()),
            Criteria::Group(c) => c.compile(ctx),
        }
    }

    fn matches(&self, entity: &dyn Entity, ctx: &QueryContext) -> bool {
        match self {
            Criteria::Leaf(leaf) => leaf.matches(entity, ctx),
            Criteria::And(l, r) => l.matches(entity, ctx) && r.matches(entity, ctx),
            Criteria::Or(l, r) => l.matches(entity, ctx) || r.matches(entity, ctx),
            Criteria::Not(c) => !c.matches(entity, ctx),
            Criteria::Group(c) => c.matches(entity, ctx),
        }
    }

    fn is_using_project(&self, path: &str) -> bool {
        let mut using = false;
        self.walk(&mut |node| {
            if let Criteria::Leaf(leaf) = node {
                using |= leaf.is_using_project(path);
            }
        });
        using
    }

    fn on_move_project(&mut self, old_path: &str, new_path: &str) {
        match self {
            Criteria::Leaf(leaf) => leaf.on_move_project(old_path, new_path),
            Criteria::And(l, r) | Criteria::Or(l, r) => {
                for child in [l, r] {
                    if child.is_using_project(old_path) {
                        Arc::make_mut(child).on_move_project(old_path, new_path);
                    }
                }
            }
            Criteria::Not(c) | Criteria::Group(c) => {
                if c.is_using_project(old_path) {
                    Arc::make_mut(c).on_move_project(old_path, new_path);
                }
            }
        }
    }
}
