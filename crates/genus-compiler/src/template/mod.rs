//! Template construction.
//!
//! Specializes function and definition templates against a substitution,
//! memoizing results per template family.
//!
//! ## Components
//!
//! - [`InstanceCache`]: cache of constructed entries, keyed by root template
//!   and canonical argument tuple
//! - [`ConstructOptions`]: caching and inference policy
//! - [`ConstructionEngine`]: the recursive specializer
//! - [`Constructed`]: a result, tagged with which side of the closure rule
//!   it landed on

mod cache;
mod dependency;
mod instantiation;
mod substitution;

pub use cache::{ArgumentKey, InstanceCache};
pub use dependency::{DependencyLevels, resolve_dependencies};
pub use instantiation::ConstructionEngine;
pub use substitution::{format_instance_name, lift_to_root};

/// How reverse inference treats an inferred type that disagrees with an
/// explicit binding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InferenceConflictPolicy {
    /// Fail with `InvalidBinding`.
    #[default]
    Reject,
    /// Keep the explicit binding and skip the instance check.
    PreferExplicit,
}

/// Construction settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstructOptions {
    /// Memoize constructed entries.
    pub enable_caching: bool,
    pub inference_conflicts: InferenceConflictPolicy,
}

impl Default for ConstructOptions {
    fn default() -> Self {
        Self {
            enable_caching: true,
            inference_conflicts: InferenceConflictPolicy::Reject,
        }
    }
}

impl ConstructOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_caching(mut self, enable: bool) -> Self {
        self.enable_caching = enable;
        self
    }

    pub fn with_inference_conflicts(mut self, policy: InferenceConflictPolicy) -> Self {
        self.inference_conflicts = policy;
        self
    }
}

/// The result of a construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Constructed<T> {
    pub id: T,
    /// The result still has free parameters.
    pub is_template: bool,
}

impl<T> Constructed<T> {
    pub fn new(id: T, is_template: bool) -> Self {
        Self { id, is_template }
    }

    /// Check if every part of the result is closed.
    pub fn is_concrete(&self) -> bool {
        !self.is_template
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Constructed<U> {
        Constructed {
            id: f(self.id),
            is_template: self.is_template,
        }
    }
}
