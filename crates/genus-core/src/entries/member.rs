//! Definition members.
//!
//! Members are referenced from their definition through the tagged
//! [`Member`] enum. Each container kind declares which [`MemberKind`]s it
//! accepts (see [`DefinitionKind::accepts`](super::DefinitionKind::accepts)).

use std::fmt;

use crate::{FieldId, FunctionId, MethodId, OwnerSlot, PropertyId, TypeId, TypeRef, Value};

/// How a member is bound to its definition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MemberBinding {
    /// Per-instance.
    #[default]
    Instance,
    /// Shared by all instances, no receiver.
    Static,
    /// Receives the definition itself.
    Class,
}

/// Declared visibility. Recorded, never enforced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Access {
    #[default]
    Public,
    Protected,
    Private,
}

/// Discriminant of [`Member`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Field,
    Method,
    Property,
    Constructor,
    Nested,
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MemberKind::Field => "field",
            MemberKind::Method => "method",
            MemberKind::Property => "property",
            MemberKind::Constructor => "constructor",
            MemberKind::Nested => "nested definition",
        };
        f.write_str(name)
    }
}

/// A member of a class, interface or typeclass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Member {
    Field(FieldId),
    Method(MethodId),
    Property(PropertyId),
    Constructor(MethodId),
    Nested(TypeId),
}

impl Member {
    pub fn kind(&self) -> MemberKind {
        match self {
            Member::Field(_) => MemberKind::Field,
            Member::Method(_) => MemberKind::Method,
            Member::Property(_) => MemberKind::Property,
            Member::Constructor(_) => MemberKind::Constructor,
            Member::Nested(_) => MemberKind::Nested,
        }
    }
}

/// A data member.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldEntry {
    pub name: String,
    pub ty: TypeRef,
    pub default: Option<Value>,
    pub binding: MemberBinding,
    pub access: Access,
    pub owner: OwnerSlot,
}

impl FieldEntry {
    pub fn new(name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            default: None,
            binding: MemberBinding::Instance,
            access: Access::Public,
            owner: OwnerSlot::new(),
        }
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn with_binding(mut self, binding: MemberBinding) -> Self {
        self.binding = binding;
        self
    }

    pub fn with_access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }
}

/// A method: a function plus its member metadata.
///
/// The name and signature live on the wrapped function, which the method
/// owns.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodEntry {
    pub function: FunctionId,
    pub binding: MemberBinding,
    pub access: Access,
    pub owner: OwnerSlot,
}

impl MethodEntry {
    pub fn new(function: FunctionId) -> Self {
        Self {
            function,
            binding: MemberBinding::Instance,
            access: Access::Public,
            owner: OwnerSlot::new(),
        }
    }

    pub fn with_binding(mut self, binding: MemberBinding) -> Self {
        self.binding = binding;
        self
    }

    pub fn with_access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }
}

/// A computed member backed by getter and setter methods.
///
/// Accessors must share the property's binding.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyEntry {
    pub name: String,
    pub ty: TypeRef,
    pub binding: MemberBinding,
    pub access: Access,
    pub getter: Option<MethodId>,
    pub setter: Option<MethodId>,
    pub owner: OwnerSlot,
}

impl PropertyEntry {
    pub fn new(name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            binding: MemberBinding::Instance,
            access: Access::Public,
            getter: None,
            setter: None,
            owner: OwnerSlot::new(),
        }
    }

    pub fn with_binding(mut self, binding: MemberBinding) -> Self {
        self.binding = binding;
        self
    }

    /// Check if the property has neither getter nor setter.
    pub fn is_abstract(&self) -> bool {
        self.getter.is_none() && self.setter.is_none()
    }
}
