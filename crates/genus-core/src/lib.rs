//! Core types for the genus declaration front-end.
//!
//! This crate holds the data model shared by the registry and the compiler:
//! typed ids, runtime values, declaration entries, the ownership slot,
//! substitutions and error types. It contains no lookup or construction
//! logic of its own.

pub mod builtin;
pub mod entries;
pub mod error;
pub mod ids;
pub mod instruction;
pub mod ownership;
pub mod substitution;
pub mod value;

pub use entries::{
    Access, ClassDef, DefinitionBody, DefinitionKind, FieldEntry, FunctionEntry, InterfaceDef,
    Member, MemberBinding, MemberKind, MethodEntry, OverloadGroupEntry, ParamEntry, ParamSlot,
    PropertyEntry, SignatureEntry, TypeEntry, TypeKind, TypeclassDef,
};
pub use error::{ConstructionError, GenusError, RegistrationError};
pub use ids::{FieldId, FunctionId, GroupId, MethodId, ParamId, PropertyId, ScopeId, SignatureId, TypeId};
pub use instruction::{Callee, FunctionBody, Instruction};
pub use ownership::{EntityRef, Owner, OwnerSlot};
pub use builtin::{Builtin, primitives};
pub use substitution::{BindingCycle, GenericArg, Origin, Substitution, TemplateRef};
pub use value::{TypeRef, Value};
