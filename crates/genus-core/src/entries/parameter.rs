//! Parameter entries.

use crate::{OwnerSlot, TypeRef, Value};

/// A parameter of a signature.
///
/// A generic parameter is a free variable of its template until a
/// substitution binds it. Its declared type may be another parameter, which
/// forms a dependency chain (`X: Type`, `Y: X`).
#[derive(Debug, Clone, PartialEq)]
pub struct ParamEntry {
    /// Parameter name, unique within the owning signature.
    pub name: String,
    /// Declared type.
    pub ty: TypeRef,
    /// Value used when a call omits this parameter.
    pub default: Option<Value>,
    /// Declared as a generic parameter.
    pub generic: bool,
    /// Owning signature. Managed by the registry.
    pub owner: OwnerSlot,
}

impl ParamEntry {
    /// Create a plain parameter.
    pub fn new(name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            default: None,
            generic: false,
            owner: OwnerSlot::new(),
        }
    }

    /// Create a generic parameter.
    pub fn generic(name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        Self {
            generic: true,
            ..Self::new(name, ty)
        }
    }

    /// Set the default value.
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Check if a call may omit this parameter.
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Check if this parameter is still a free variable: declared generic,
    /// or typed by another parameter.
    pub fn is_open(&self) -> bool {
        self.generic || self.ty.is_param()
    }

    /// Copy name, type and default into a fresh, unowned entry.
    pub fn detached_copy(&self) -> Self {
        Self {
            owner: OwnerSlot::new(),
            ..self.clone()
        }
    }
}
