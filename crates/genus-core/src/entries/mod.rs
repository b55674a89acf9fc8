//! Registry entry types.
//!
//! - [`ParamEntry`] - plain and generic parameters
//! - [`SignatureEntry`] - positional, named and variadic parameter slots
//! - [`FunctionEntry`] - free functions and the function half of methods
//! - [`FieldEntry`], [`MethodEntry`], [`PropertyEntry`] - definition members
//! - [`TypeEntry`] - builtins, nullable types and definitions
//! - [`OverloadGroupEntry`] - same-named callables considered together
//!
//! Supporting types:
//! - [`Member`], [`MemberKind`] - tagged member references
//! - [`DefinitionBody`], [`ClassDef`], [`InterfaceDef`], [`TypeclassDef`]

mod definition;
mod function;
mod member;
mod overload_group;
mod parameter;
mod signature;
mod type_entry;

pub use definition::{ClassDef, DefinitionBody, DefinitionKind, InterfaceDef, TypeclassDef};
pub use function::FunctionEntry;
pub use member::{Access, FieldEntry, Member, MemberBinding, MemberKind, MethodEntry, PropertyEntry};
pub use overload_group::OverloadGroupEntry;
pub use parameter::ParamEntry;
pub use signature::{ParamSlot, SignatureEntry};
pub use type_entry::{TypeEntry, TypeKind};
