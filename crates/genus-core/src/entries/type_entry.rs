//! Type entries.

use crate::{
    Builtin, ClassDef, DefinitionBody, DefinitionKind, InterfaceDef, OwnerSlot, TypeRef,
    TypeclassDef,
};

/// What a type entry is.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    Builtin(Builtin),
    /// `Null` or a value of the inner type. Interned per inner type.
    Nullable(TypeRef),
    Class(ClassDef),
    Interface(InterfaceDef),
    Typeclass(TypeclassDef),
}

/// A type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeEntry {
    pub name: String,
    pub kind: TypeKind,
    /// Declaring scope or enclosing definition. Managed by the registry.
    pub owner: OwnerSlot,
}

impl TypeEntry {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            owner: OwnerSlot::new(),
        }
    }

    /// The builtin this entry represents, if any.
    pub fn builtin(&self) -> Option<Builtin> {
        match &self.kind {
            TypeKind::Builtin(builtin) => Some(*builtin),
            _ => None,
        }
    }

    /// The definition kind, for classes, interfaces and typeclasses.
    pub fn definition_kind(&self) -> Option<DefinitionKind> {
        match &self.kind {
            TypeKind::Class(_) => Some(DefinitionKind::Class),
            TypeKind::Interface(_) => Some(DefinitionKind::Interface),
            TypeKind::Typeclass(_) => Some(DefinitionKind::Typeclass),
            TypeKind::Builtin(_) | TypeKind::Nullable(_) => None,
        }
    }

    /// The shared definition body.
    pub fn body(&self) -> Option<&DefinitionBody> {
        match &self.kind {
            TypeKind::Class(def) => Some(&def.body),
            TypeKind::Interface(def) => Some(&def.body),
            TypeKind::Typeclass(def) => Some(&def.body),
            TypeKind::Builtin(_) | TypeKind::Nullable(_) => None,
        }
    }

    pub fn body_mut(&mut self) -> Option<&mut DefinitionBody> {
        match &mut self.kind {
            TypeKind::Class(def) => Some(&mut def.body),
            TypeKind::Interface(def) => Some(&mut def.body),
            TypeKind::Typeclass(def) => Some(&mut def.body),
            TypeKind::Builtin(_) | TypeKind::Nullable(_) => None,
        }
    }

    pub fn as_class(&self) -> Option<&ClassDef> {
        match &self.kind {
            TypeKind::Class(def) => Some(def),
            _ => None,
        }
    }

    pub fn as_interface(&self) -> Option<&InterfaceDef> {
        match &self.kind {
            TypeKind::Interface(def) => Some(def),
            _ => None,
        }
    }

    pub fn as_typeclass(&self) -> Option<&TypeclassDef> {
        match &self.kind {
            TypeKind::Typeclass(def) => Some(def),
            _ => None,
        }
    }

    pub fn is_definition(&self) -> bool {
        self.definition_kind().is_some()
    }
}
