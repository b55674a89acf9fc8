//! Error types for declaration building and template construction.
//!
//! ## Error Hierarchy
//!
//! ```text
//! GenusError (top-level wrapper)
//! ├── RegistrationError  - structural mutation of the declaration graph
//! └── ConstructionError  - template specialization
//! ```
//!
//! Every structural check runs before the graph is mutated, so an operation
//! that returns an error has left the registry exactly as it found it.
//! An overload lookup that finds nothing is not an error; it returns an
//! empty result and the caller decides what that means.

use thiserror::Error;

use crate::{EntityRef, MemberKind, Owner, TypeId};

// ============================================================================
// Registration Errors
// ============================================================================

/// Errors raised while adding, removing or attaching declaration entries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// A parameter or member name is already taken in its owner's namespace.
    #[error("duplicate name '{name}' in {owner}")]
    DuplicateName { name: String, owner: Owner },

    /// The entry is already attached to a container.
    #[error("{entity} is already owned by {owner}")]
    AlreadyOwned { entity: EntityRef, owner: Owner },

    /// The entry is not attached to any container.
    #[error("{entity} has no owner")]
    NotOwned { entity: EntityRef },

    /// The entry is attached, but not to the container being edited.
    #[error("{entity} is not a member of {container}")]
    NotMember {
        entity: EntityRef,
        container: Owner,
        owner: Option<Owner>,
    },

    /// Nesting the definition would make it enclose itself.
    #[error("{ty} cannot be nested in {container}, which it encloses")]
    CyclicNesting { ty: TypeId, container: TypeId },

    /// An id that does not name a live entry of the expected kind.
    #[error("unknown {entity}")]
    UnknownEntity { entity: String },

    /// The type is a builtin or nullable type, not a definition.
    #[error("{ty} is not a class, interface or typeclass")]
    NotADefinition { ty: TypeId },

    /// The type cannot be used as a base or interface of the definition.
    #[error("{ty} cannot inherit from {base}")]
    InvalidBase { ty: TypeId, base: TypeId },

    /// The container kind does not accept this kind of member.
    #[error("{container} cannot hold a {kind} member")]
    MemberNotAllowed { kind: MemberKind, container: TypeId },

    /// A property accessor's binding differs from the property's.
    #[error("accessor '{accessor}' does not share the binding of property '{property}'")]
    AccessorBindingMismatch { property: String, accessor: String },

    /// The typeclass already has an implementation for the type.
    #[error("{typeclass} already has an implementation for {ty}")]
    DuplicateImplementation { typeclass: TypeId, ty: TypeId },

    /// The typeclass has no implementation for the type.
    #[error("{typeclass} has no implementation for {ty}")]
    MissingImplementation { typeclass: TypeId, ty: TypeId },
}

impl RegistrationError {
    /// Create an unknown-entity error for any displayable id.
    pub fn unknown(entity: impl std::fmt::Display) -> Self {
        RegistrationError::UnknownEntity {
            entity: entity.to_string(),
        }
    }

    /// Check if this error is an ownership violation.
    pub fn is_ownership_violation(&self) -> bool {
        matches!(
            self,
            RegistrationError::AlreadyOwned { .. }
                | RegistrationError::NotOwned { .. }
                | RegistrationError::NotMember { .. }
                | RegistrationError::CyclicNesting { .. }
        )
    }

    /// Check if this error is a name collision.
    pub fn is_duplicate_name(&self) -> bool {
        matches!(self, RegistrationError::DuplicateName { .. })
    }
}

// ============================================================================
// Construction Errors
// ============================================================================

/// Errors raised while specializing a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    /// Positional instantiation with the wrong number of arguments.
    #[error("'{template}' expects {expected} generic arguments, got {got}")]
    ArityMismatch {
        template: String,
        expected: usize,
        got: usize,
    },

    /// A generic parameter's declared type transitively refers to itself.
    #[error("generic parameter '{parameter}' depends on itself")]
    CyclicDependency { parameter: String },

    /// A binding that cannot be used for its parameter.
    #[error("invalid binding for '{parameter}': {reason}")]
    InvalidBinding { parameter: String, reason: String },

    /// A constructed member could not be inserted into its container.
    #[error(transparent)]
    Registration(#[from] RegistrationError),
}

impl ConstructionError {
    /// Check if this error is a dependency cycle.
    pub fn is_cyclic_dependency(&self) -> bool {
        matches!(self, ConstructionError::CyclicDependency { .. })
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Any error produced by the declaration core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenusError {
    /// A registration error.
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    /// A construction error.
    #[error(transparent)]
    Construction(#[from] ConstructionError),
}

impl GenusError {
    /// Check if this is a registration error.
    pub fn is_registration(&self) -> bool {
        matches!(self, GenusError::Registration(_))
    }

    /// Check if this is a construction error.
    pub fn is_construction(&self) -> bool {
        matches!(self, GenusError::Construction(_))
    }
}
