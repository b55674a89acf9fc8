//! Structural openness queries.
//!
//! An entry is open (a template) when any part of it still refers to a free
//! parameter: a generic parameter in a signature, a parameter-typed slot, or
//! a reference to another open type. Cycles through self-referential
//! definitions are cut by a visited set and count as closed.

use genus_core::{
    FunctionId, Member, MethodId, SignatureId, TemplateRef, TypeId, TypeKind, TypeRef,
};
use rustc_hash::FxHashSet;

use crate::DeclRegistry;

impl DeclRegistry {
    /// Check if a type reference is still open.
    pub fn is_open_type_ref(&self, ty: TypeRef) -> bool {
        self.type_ref_open(ty, &mut FxHashSet::default())
    }

    /// Check if a type is a template or refers to one.
    pub fn is_open_type(&self, ty: TypeId) -> bool {
        self.type_open(ty, &mut FxHashSet::default())
    }

    /// Check if a signature has free parameters.
    pub fn is_open_signature(&self, sig: SignatureId) -> bool {
        self.signature_open(sig, &mut FxHashSet::default())
    }

    /// Check if a function is a template.
    pub fn is_open_function(&self, f: FunctionId) -> bool {
        self.function_open(f, &mut FxHashSet::default())
    }

    /// Check if a class, interface or typeclass is a template.
    pub fn is_open_definition(&self, def: TypeId) -> bool {
        self.is_open_type(def)
    }

    /// Check if a function or definition is a template.
    pub fn is_template(&self, template: TemplateRef) -> bool {
        match template {
            TemplateRef::Function(f) => self.is_open_function(f),
            TemplateRef::Definition(ty) => self.is_open_type(ty),
        }
    }

    fn type_ref_open(&self, ty: TypeRef, visited: &mut FxHashSet<TypeId>) -> bool {
        match ty {
            TypeRef::Param(_) => true,
            TypeRef::Type(id) => self.type_open(id, visited),
        }
    }

    fn type_open(&self, ty: TypeId, visited: &mut FxHashSet<TypeId>) -> bool {
        if !visited.insert(ty) {
            return false;
        }
        let Some(entry) = self.get_type(ty) else {
            return false;
        };
        let (body, related): (_, Vec<TypeId>) = match &entry.kind {
            TypeKind::Builtin(_) => return false,
            TypeKind::Nullable(inner) => return self.type_ref_open(*inner, visited),
            TypeKind::Class(def) => (
                &def.body,
                def.base.iter().chain(def.interfaces.iter()).copied().collect(),
            ),
            TypeKind::Interface(def) => (&def.body, def.bases.clone()),
            TypeKind::Typeclass(def) => (&def.body, def.bases.clone()),
        };

        self.signature_open(body.signature, visited)
            || related.into_iter().any(|other| self.type_open(other, visited))
            || body
                .members
                .iter()
                .any(|member| self.member_open(*member, visited))
    }

    fn member_open(&self, member: Member, visited: &mut FxHashSet<TypeId>) -> bool {
        match member {
            Member::Field(id) => self
                .get_field(id)
                .is_some_and(|field| self.type_ref_open(field.ty, visited)),
            Member::Property(id) => self
                .get_property(id)
                .is_some_and(|property| self.type_ref_open(property.ty, visited)),
            Member::Method(id) | Member::Constructor(id) => self.method_open(id, visited),
            Member::Nested(id) => self.type_open(id, visited),
        }
    }

    fn method_open(&self, method: MethodId, visited: &mut FxHashSet<TypeId>) -> bool {
        self.get_method(method)
            .is_some_and(|entry| self.function_open(entry.function, visited))
    }

    fn function_open(&self, f: FunctionId, visited: &mut FxHashSet<TypeId>) -> bool {
        self.get_function(f).is_some_and(|entry| {
            self.signature_open(entry.signature, visited)
                || self.type_ref_open(entry.return_type, visited)
        })
    }

    fn signature_open(&self, sig: SignatureId, visited: &mut FxHashSet<TypeId>) -> bool {
        let Some(signature) = self.get_signature(sig) else {
            return false;
        };
        signature.parameters().any(|param| {
            self.get_param(param)
                .is_some_and(|entry| entry.is_open() || self.type_ref_open(entry.ty, visited))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genus_core::{FieldEntry, ParamEntry, primitives};

    #[test]
    fn builtins_are_closed() {
        let registry = DeclRegistry::new();
        assert!(!registry.is_open_type(primitives::ANY));
        assert!(!registry.is_open_type_ref(TypeRef::Type(primitives::STRING)));
    }

    #[test]
    fn generic_class_is_open() {
        let mut registry = DeclRegistry::new();
        let class = registry.create_class("Box");
        assert!(!registry.is_open_definition(class));

        let t = registry
            .add_generic_param(class, "T", primitives::TYPE)
            .unwrap();
        registry
            .declare_field(class, FieldEntry::new("value", t))
            .unwrap();
        assert!(registry.is_open_definition(class));
    }

    #[test]
    fn field_typed_by_external_param_is_open() {
        let mut registry = DeclRegistry::new();
        let outer = registry.add_param(ParamEntry::generic("T", primitives::TYPE));
        let class = registry.create_class("Ref");
        registry
            .declare_field(class, FieldEntry::new("target", outer))
            .unwrap();
        assert!(registry.is_open_definition(class));
    }

    #[test]
    fn self_reference_terminates() {
        let mut registry = DeclRegistry::new();
        let node = registry.create_class("Node");
        registry
            .declare_field(node, FieldEntry::new("next", node))
            .unwrap();
        assert!(!registry.is_open_definition(node));
    }

    #[test]
    fn nullable_of_param_is_open() {
        let mut registry = DeclRegistry::new();
        let t = registry.add_param(ParamEntry::generic("T", primitives::TYPE));
        let nullable = registry.nullable(t);
        assert!(registry.is_open_type(nullable));
    }

    #[test]
    fn function_with_param_return_is_open() {
        let mut registry = DeclRegistry::new();
        let t = registry.add_param(ParamEntry::generic("T", primitives::TYPE));
        let f = registry.create_function("id");
        registry.set_return_type(f, t).unwrap();
        assert!(registry.is_open_function(f));
        assert!(registry.is_template(TemplateRef::Function(f)));
    }
}
