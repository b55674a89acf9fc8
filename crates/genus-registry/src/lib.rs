//! Declaration registry for the genus front-end.
//!
//! This crate provides:
//! - [`DeclRegistry`] - arena storage and validating mutation for every
//!   declaration entry
//! - [`ScopeTree`] - hierarchical name tables backing member lookup and
//!   overload-group fallback

mod members;
mod openness;
mod overloads;
mod registry;
mod scope_tree;
mod signature;

pub use registry::DeclRegistry;
pub use scope_tree::{ScopeData, ScopeEdge, ScopeTree, Symbol};
