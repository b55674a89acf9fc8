//! Genus Compiler
//!
//! Type relations and template specialization over a [`DeclRegistry`].
//!
//! ## Modules
//!
//! - [`assignability`]: Reciprocal assignability and value membership
//! - [`template`]: Dependency resolution and memoized template construction
//! - [`overload`]: Overload selection and call plans
//!
//! [`DeclRegistry`]: genus_registry::DeclRegistry

pub mod assignability;
pub mod overload;
pub mod template;

pub use assignability::{are_identical, assignable, is_instance_of};
pub use overload::{Argument, CallPlan, MatchFlags, Rejection, get_match, match_call};
pub use template::{
    ArgumentKey, ConstructOptions, Constructed, ConstructionEngine, DependencyLevels,
    InferenceConflictPolicy, InstanceCache, resolve_dependencies,
};

// Re-export the error types from core for convenience
pub use genus_core::{ConstructionError, RegistrationError};
