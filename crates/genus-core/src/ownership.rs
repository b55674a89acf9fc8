//! Exclusive ownership of declaration entries.
//!
//! Every owned entry (parameter, signature, function, member, nested
//! definition) embeds an [`OwnerSlot`]. The slot holds at most one
//! [`Owner`]; attaching while already owned and detaching while unowned are
//! both rejected, so an entry can never be shared between two containers.
//!
//! Containers perform their own validation (name uniqueness, member kind)
//! before calling [`OwnerSlot::attach`], and attach before pushing into
//! their lists, so a rejected insert leaves the container untouched.

use std::fmt;

use crate::{
    FieldId, FunctionId, MethodId, ParamId, PropertyId, RegistrationError, ScopeId, SignatureId,
    TypeId,
};

/// The container an entry is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Owner {
    /// Parameters are owned by their signature.
    Signature(SignatureId),
    /// A function's signature is owned by the function.
    Function(FunctionId),
    /// A method's function is owned by the method.
    Method(MethodId),
    /// Members, nested definitions and definition signatures.
    Definition(TypeId),
    /// Top-level declarations.
    Scope(ScopeId),
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Owner::Signature(id) => write!(f, "{}", id),
            Owner::Function(id) => write!(f, "{}", id),
            Owner::Method(id) => write!(f, "{}", id),
            Owner::Definition(id) => write!(f, "{}", id),
            Owner::Scope(id) => write!(f, "{}", id),
        }
    }
}

/// A reference to any ownable entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Param(ParamId),
    Signature(SignatureId),
    Function(FunctionId),
    Method(MethodId),
    Field(FieldId),
    Property(PropertyId),
    Type(TypeId),
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityRef::Param(id) => write!(f, "{}", id),
            EntityRef::Signature(id) => write!(f, "{}", id),
            EntityRef::Function(id) => write!(f, "{}", id),
            EntityRef::Method(id) => write!(f, "{}", id),
            EntityRef::Field(id) => write!(f, "{}", id),
            EntityRef::Property(id) => write!(f, "{}", id),
            EntityRef::Type(id) => write!(f, "{}", id),
        }
    }
}

/// The owner field embedded in every ownable entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OwnerSlot(Option<Owner>);

impl OwnerSlot {
    /// An empty slot.
    pub const fn new() -> Self {
        Self(None)
    }

    /// A slot already attached to `owner`.
    pub const fn owned_by(owner: Owner) -> Self {
        Self(Some(owner))
    }

    /// The current owner, if any.
    #[inline]
    pub fn get(&self) -> Option<Owner> {
        self.0
    }

    /// Check if the entry is owned by anything.
    #[inline]
    pub fn is_owned(&self) -> bool {
        self.0.is_some()
    }

    /// Check if the entry is owned by `owner`.
    #[inline]
    pub fn is_owned_by(&self, owner: Owner) -> bool {
        self.0 == Some(owner)
    }

    /// Check that `entity` could be attached, without attaching it.
    pub fn check_attach(&self, entity: EntityRef) -> Result<(), RegistrationError> {
        match self.0 {
            Some(owner) => Err(RegistrationError::AlreadyOwned { entity, owner }),
            None => Ok(()),
        }
    }

    /// Attach `entity` to `owner`.
    ///
    /// Fails if the entry already has an owner, including `owner` itself.
    pub fn attach(&mut self, entity: EntityRef, owner: Owner) -> Result<(), RegistrationError> {
        self.check_attach(entity)?;
        self.0 = Some(owner);
        Ok(())
    }

    /// Clear the owner, returning the previous one.
    pub fn detach(&mut self, entity: EntityRef) -> Result<Owner, RegistrationError> {
        self.0.take().ok_or(RegistrationError::NotOwned { entity })
    }

    /// Require that the entry is owned by `owner`.
    pub fn expect_owner(&self, entity: EntityRef, owner: Owner) -> Result<(), RegistrationError> {
        match self.0 {
            Some(current) if current == owner => Ok(()),
            Some(current) => Err(RegistrationError::NotMember {
                entity,
                container: owner,
                owner: Some(current),
            }),
            None => Err(RegistrationError::NotOwned { entity }),
        }
    }
}
