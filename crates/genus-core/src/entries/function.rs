//! Function entries.

use crate::{FunctionBody, Origin, OwnerSlot, SignatureId, TypeRef, primitives};

/// A function declaration.
///
/// The same entry type backs free functions, methods and constructors; a
/// method wraps its function rather than being one.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionEntry {
    pub name: String,
    /// Parameter list, owned by this function.
    pub signature: SignatureId,
    pub return_type: TypeRef,
    /// Opaque body. `None` for declarations without an implementation.
    pub body: Option<FunctionBody>,
    /// Set on entries produced by construction.
    pub origin: Option<Origin>,
    /// Owning scope or method. Managed by the registry.
    pub owner: OwnerSlot,
}

impl FunctionEntry {
    /// Create a function with return type `Any` and no body.
    pub fn new(name: impl Into<String>, signature: SignatureId) -> Self {
        Self {
            name: name.into(),
            signature,
            return_type: TypeRef::Type(primitives::ANY),
            body: None,
            origin: None,
            owner: OwnerSlot::new(),
        }
    }

    /// Set the return type.
    pub fn with_return_type(mut self, ty: impl Into<TypeRef>) -> Self {
        self.return_type = ty.into();
        self
    }

    /// Set the body.
    pub fn with_body(mut self, body: impl Into<FunctionBody>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Check if the function has an implementation.
    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    /// Check if the function was produced by construction.
    pub fn is_constructed(&self) -> bool {
        self.origin.is_some()
    }
}
