//! Validating member operations on classes, interfaces and typeclasses.
//!
//! `add_member` dispatches on the [`Member`] tag: the definition kind decides
//! whether the member kind is accepted, the member's name must be free in the
//! definition's scope (methods may join an existing method group), and only
//! then is the member attached, listed and registered in the scope.

use genus_core::{
    DefinitionKind, EntityRef, FieldEntry, FieldId, GroupId, Member, MemberBinding, MemberKind,
    MethodId, Owner, PropertyId, RegistrationError, ScopeId, TypeId, TypeKind,
};
use rustc_hash::FxHashSet;

use crate::DeclRegistry;
use crate::scope_tree::Symbol;

fn member_entity(member: Member) -> EntityRef {
    match member {
        Member::Field(id) => EntityRef::Field(id),
        Member::Method(id) | Member::Constructor(id) => EntityRef::Method(id),
        Member::Property(id) => EntityRef::Property(id),
        Member::Nested(id) => EntityRef::Type(id),
    }
}

impl DeclRegistry {
    /// Members of a definition in declaration order.
    pub fn members(&self, def: TypeId) -> Result<&[Member], RegistrationError> {
        Ok(&self.definition(def)?.members)
    }

    /// The name a member is registered under. Constructors have none.
    pub fn member_name(&self, member: Member) -> Result<Option<&str>, RegistrationError> {
        Ok(match member {
            Member::Field(id) => Some(&self.field(id)?.name),
            Member::Method(id) => Some(&self.function(self.method(id)?.function)?.name),
            Member::Property(id) => Some(&self.property(id)?.name),
            Member::Nested(id) => Some(&self.type_entry(id)?.name),
            Member::Constructor(id) => {
                self.method(id)?;
                None
            }
        })
    }

    /// Validate that a member of `kind` called `name` may join `def`, and
    /// return the scope it would be registered in.
    fn check_member_slot(
        &self,
        def: TypeId,
        kind: MemberKind,
        name: Option<&str>,
    ) -> Result<ScopeId, RegistrationError> {
        if !self.definition_kind(def)?.accepts(kind) {
            return Err(RegistrationError::MemberNotAllowed {
                kind,
                container: def,
            });
        }
        let scope = self.definition(def)?.scope;
        if let Some(name) = name {
            match (kind, self.scopes.lookup_local(scope, name)) {
                (_, None) | (MemberKind::Method, Some(Symbol::Group(_))) => {}
                _ => {
                    return Err(RegistrationError::DuplicateName {
                        name: name.to_string(),
                        owner: Owner::Definition(def),
                    });
                }
            }
        }
        Ok(scope)
    }

    /// Attach `member` to `def`.
    pub fn add_member(&mut self, def: TypeId, member: Member) -> Result<(), RegistrationError> {
        let name = self.member_name(member)?.map(str::to_string);
        let scope = self.check_member_slot(def, member.kind(), name.as_deref())?;
        if let Member::Nested(nested) = member {
            // The enclosing chain must not pass through the nested definition.
            let nested_scope = self.definition(nested)?.scope;
            if self.scopes.is_within(scope, nested_scope) {
                return Err(RegistrationError::CyclicNesting {
                    ty: nested,
                    container: def,
                });
            }
        }
        let entity = member_entity(member);
        self.check_attach(entity)?;

        self.attach(entity, Owner::Definition(def))?;
        self.definition_mut(def)?.members.push(member);

        match (member, name) {
            (Member::Field(id), Some(name)) => {
                self.scopes.insert(scope, &name, Symbol::Field(id));
            }
            (Member::Property(id), Some(name)) => {
                self.scopes.insert(scope, &name, Symbol::Property(id));
            }
            (Member::Nested(id), Some(name)) => {
                self.scopes.insert(scope, &name, Symbol::Type(id));
                let nested_scope = self.definition(id)?.scope;
                self.scopes.set_parent(nested_scope, scope);
            }
            (Member::Method(id), Some(name)) => {
                let function = self.method(id)?.function;
                let group = self.ensure_method_group(def, &name)?;
                self.group_mut(group)?.overloads.push(function);
            }
            (Member::Constructor(id), _) => {
                let function = self.method(id)?.function;
                let group = self.definition(def)?.constructor_group;
                self.group_mut(group)?.overloads.push(function);
            }
            _ => {}
        }
        tracing::trace!(%def, kind = %member.kind(), "member added");
        Ok(())
    }

    /// Detach `member` from `def` and deregister its name.
    pub fn remove_member(&mut self, def: TypeId, member: Member) -> Result<(), RegistrationError> {
        let entity = member_entity(member);
        self.check_owner(entity, Owner::Definition(def))?;
        let body = self.definition(def)?;
        let scope = body.scope;
        let position = body
            .members
            .iter()
            .position(|existing| *existing == member)
            .ok_or(RegistrationError::NotMember {
                entity,
                container: Owner::Definition(def),
                owner: Some(Owner::Definition(def)),
            })?;
        let name = self.member_name(member)?.map(str::to_string);

        self.detach(entity)?;
        self.definition_mut(def)?.members.remove(position);

        match (member, name) {
            (Member::Field(_) | Member::Property(_), Some(name)) => {
                self.scopes.remove(scope, &name);
            }
            (Member::Nested(id), Some(name)) => {
                self.scopes.remove(scope, &name);
                let nested_scope = self.definition(id)?.scope;
                let root = self.scopes.root();
                self.scopes.set_parent(nested_scope, root);
            }
            (Member::Method(id), Some(name)) => {
                let function = self.method(id)?.function;
                if let Some(group) = self.scopes.lookup_local(scope, &name).and_then(|s| s.as_group()) {
                    let overloads = &mut self.group_mut(group)?.overloads;
                    overloads.retain(|f| *f != function);
                    if overloads.is_empty() {
                        self.scopes.remove(scope, &name);
                    }
                }
            }
            (Member::Constructor(id), _) => {
                let function = self.method(id)?.function;
                let group = self.definition(def)?.constructor_group;
                self.group_mut(group)?.overloads.retain(|f| *f != function);
            }
            _ => {}
        }
        Ok(())
    }

    /// Create a field and add it to `def`.
    pub fn declare_field(&mut self, def: TypeId, entry: FieldEntry) -> Result<FieldId, RegistrationError> {
        self.check_member_slot(def, MemberKind::Field, Some(entry.name.as_str()))?;
        let field = self.add_field(entry);
        self.add_member(def, Member::Field(field))?;
        Ok(field)
    }

    /// Create a method and add it to `def`.
    pub fn declare_method(
        &mut self,
        def: TypeId,
        name: impl Into<String>,
        binding: MemberBinding,
    ) -> Result<MethodId, RegistrationError> {
        let name: String = name.into();
        self.check_member_slot(def, MemberKind::Method, Some(name.as_str()))?;
        let method = self.create_method(name, binding);
        self.add_member(def, Member::Method(method))?;
        Ok(method)
    }

    /// Create a constructor and add it to `def`.
    pub fn declare_constructor(&mut self, def: TypeId) -> Result<MethodId, RegistrationError> {
        self.check_member_slot(def, MemberKind::Constructor, None)?;
        let name = self.type_entry(def)?.name.clone();
        let method = self.create_method(name, MemberBinding::Class);
        self.add_member(def, Member::Constructor(method))?;
        Ok(method)
    }

    /// Set a property's getter and setter.
    pub fn set_accessors(
        &mut self,
        property: PropertyId,
        getter: Option<MethodId>,
        setter: Option<MethodId>,
    ) -> Result<(), RegistrationError> {
        let entry = self.property(property)?;
        for accessor in [getter, setter].into_iter().flatten() {
            self.check_accessor(entry, accessor)?;
        }
        let entry = self.property_mut(property)?;
        entry.getter = getter;
        entry.setter = setter;
        Ok(())
    }

    // ==========================================================================
    // Method groups
    // ==========================================================================

    /// The method group `name` of `def`, created on first use.
    fn ensure_method_group(&mut self, def: TypeId, name: &str) -> Result<GroupId, RegistrationError> {
        let scope = self.definition(def)?.scope;
        if let Some(group) = self.scopes.lookup_local(scope, name).and_then(|s| s.as_group()) {
            return Ok(group);
        }
        let parent = self.method_group_parent(def, name);
        let mut entry = genus_core::OverloadGroupEntry::new(name, scope);
        entry.parent = parent;
        let group = self.push_group(entry);
        self.scopes.insert(scope, name, Symbol::Group(group));
        Ok(group)
    }

    /// The fallback group for method `name` of `def`: the nearest base
    /// class declaring it, else the enclosing scope's group.
    pub(crate) fn method_group_parent(&self, def: TypeId, name: &str) -> Option<GroupId> {
        let entry = self.get_type(def)?;
        let mut visited = FxHashSet::default();
        visited.insert(def);

        let mut current = entry.as_class().and_then(|class| class.base);
        while let Some(base) = current {
            if !visited.insert(base) {
                break;
            }
            let base_entry = self.get_type(base)?;
            let scope = base_entry.body()?.scope;
            if let Some(group) = self.scopes.lookup_local(scope, name).and_then(|s| s.as_group()) {
                return Some(group);
            }
            current = base_entry.as_class().and_then(|class| class.base);
        }

        let enclosing = self.scopes.parent(entry.body()?.scope)?;
        self.scopes
            .lookup(enclosing, name)
            .and_then(|(_, symbol)| symbol.as_group())
    }

    fn relink_method_groups(&mut self, def: TypeId) -> Result<(), RegistrationError> {
        let scope = self.definition(def)?.scope;
        let groups: Vec<(String, GroupId)> = self
            .scopes
            .get_scope(scope)
            .map(|data| {
                data.iter()
                    .filter_map(|(name, symbol)| Some((name.to_string(), symbol.as_group()?)))
                    .collect()
            })
            .unwrap_or_default();
        for (name, group) in groups {
            let parent = self.method_group_parent(def, &name);
            self.group_mut(group)?.parent = parent;
        }
        Ok(())
    }

    // ==========================================================================
    // Inheritance
    // ==========================================================================

    /// Set or clear the base class of `class`. Existing method groups are
    /// relinked to the new base.
    pub fn set_base(&mut self, class: TypeId, base: Option<TypeId>) -> Result<(), RegistrationError> {
        if let Some(base) = base {
            if self.definition_kind(base)? != DefinitionKind::Class || self.inherits(base, class) {
                return Err(RegistrationError::InvalidBase { ty: class, base });
            }
        }
        match &mut self.type_mut(class)?.kind {
            TypeKind::Class(def) => def.base = base,
            _ => return Err(RegistrationError::NotADefinition { ty: class }),
        }
        self.relink_method_groups(class)
    }

    /// Add `base` to the bases of an interface or typeclass, or the
    /// interfaces of a class.
    pub fn add_base(&mut self, ty: TypeId, base: TypeId) -> Result<(), RegistrationError> {
        let kind = self.definition_kind(ty)?;
        let base_kind = self.definition_kind(base)?;
        let invalid = RegistrationError::InvalidBase { ty, base };
        if self.inherits(base, ty) {
            return Err(invalid);
        }
        if kind == DefinitionKind::Class && base_kind == DefinitionKind::Class {
            return self.set_base(ty, Some(base));
        }
        match (&mut self.type_mut(ty)?.kind, base_kind) {
            (TypeKind::Class(def), DefinitionKind::Interface) => push_unique(&mut def.interfaces, base),
            (TypeKind::Interface(def), DefinitionKind::Interface) => push_unique(&mut def.bases, base),
            (TypeKind::Typeclass(def), DefinitionKind::Typeclass) => push_unique(&mut def.bases, base),
            _ => {
                tracing::debug!(?kind, ?base_kind, "rejected base");
                return Err(invalid);
            }
        }
        Ok(())
    }

    /// Check if `ty` is `ancestor` or reaches it through its bases and
    /// interfaces.
    pub fn inherits(&self, ty: TypeId, ancestor: TypeId) -> bool {
        let mut visited = FxHashSet::default();
        let mut stack = vec![ty];
        while let Some(current) = stack.pop() {
            if current == ancestor {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            match self.get_type(current).map(|entry| &entry.kind) {
                Some(TypeKind::Class(def)) => {
                    stack.extend(def.base);
                    stack.extend(def.interfaces.iter().copied());
                }
                Some(TypeKind::Interface(def)) => stack.extend(def.bases.iter().copied()),
                Some(TypeKind::Typeclass(def)) => stack.extend(def.bases.iter().copied()),
                _ => {}
            }
        }
        false
    }

    /// Register `class` as the implementation of `typeclass` for `ty`.
    pub fn add_implementation(
        &mut self,
        typeclass: TypeId,
        ty: TypeId,
        class: TypeId,
    ) -> Result<(), RegistrationError> {
        self.type_entry(ty)?;
        self.type_entry(class)?;
        match &mut self.type_mut(typeclass)?.kind {
            TypeKind::Typeclass(def) => {
                if def.implementations.contains_key(&ty) {
                    return Err(RegistrationError::DuplicateImplementation { typeclass, ty });
                }
                def.implementations.insert(ty, class);
                Ok(())
            }
            _ => Err(RegistrationError::NotADefinition { ty: typeclass }),
        }
    }

    /// Remove the implementation of `typeclass` for `ty`, returning the
    /// implementing class.
    pub fn remove_implementation(&mut self, typeclass: TypeId, ty: TypeId) -> Result<TypeId, RegistrationError> {
        match &mut self.type_mut(typeclass)?.kind {
            TypeKind::Typeclass(def) => def
                .implementations
                .remove(&ty)
                .ok_or(RegistrationError::MissingImplementation { typeclass, ty }),
            _ => Err(RegistrationError::NotADefinition { ty: typeclass }),
        }
    }
}

fn push_unique(list: &mut Vec<TypeId>, ty: TypeId) {
    if !list.contains(&ty) {
        list.push(ty);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genus_core::{PropertyEntry, primitives};

    #[test]
    fn add_field_registers_name() {
        let mut registry = DeclRegistry::new();
        let class = registry.create_class("Point");
        let x = registry
            .declare_field(class, FieldEntry::new("x", primitives::INT32))
            .unwrap();

        let scope = registry.definition(class).unwrap().scope;
        assert_eq!(
            registry.scopes().lookup_local(scope, "x"),
            Some(Symbol::Field(x))
        );
        assert_eq!(
            registry.owner_of(EntityRef::Field(x)),
            Some(Owner::Definition(class))
        );
    }

    #[test]
    fn duplicate_member_name_rejected() {
        let mut registry = DeclRegistry::new();
        let class = registry.create_class("Point");
        registry
            .declare_field(class, FieldEntry::new("x", primitives::INT32))
            .unwrap();
        let clash = registry.add_field(FieldEntry::new("x", primitives::FLOAT64));

        match registry.add_member(class, Member::Field(clash)).unwrap_err() {
            RegistrationError::DuplicateName { name, owner } => {
                assert_eq!(name, "x");
                assert_eq!(owner, Owner::Definition(class));
            }
            e => panic!("Expected DuplicateName, got {:?}", e),
        }
        assert_eq!(registry.members(class).unwrap().len(), 1);
        assert_eq!(registry.owner_of(EntityRef::Field(clash)), None);
    }

    #[test]
    fn methods_with_same_name_share_group() {
        let mut registry = DeclRegistry::new();
        let class = registry.create_class("Printer");
        let a = registry
            .declare_method(class, "print", MemberBinding::Instance)
            .unwrap();
        let b = registry
            .declare_method(class, "print", MemberBinding::Instance)
            .unwrap();

        let scope = registry.definition(class).unwrap().scope;
        let group = registry
            .scopes()
            .lookup_local(scope, "print")
            .and_then(|s| s.as_group())
            .unwrap();
        let overloads = &registry.group(group).unwrap().overloads;
        assert_eq!(
            overloads,
            &vec![
                registry.method(a).unwrap().function,
                registry.method(b).unwrap().function
            ]
        );
    }

    #[test]
    fn method_name_cannot_reuse_field_name() {
        let mut registry = DeclRegistry::new();
        let class = registry.create_class("C");
        registry
            .declare_field(class, FieldEntry::new("size", primitives::INT32))
            .unwrap();
        let err = registry
            .declare_method(class, "size", MemberBinding::Instance)
            .unwrap_err();
        assert!(err.is_duplicate_name());
    }

    #[test]
    fn typeclass_rejects_nested_definition() {
        let mut registry = DeclRegistry::new();
        let typeclass = registry.create_typeclass("Show");
        let nested = registry.create_class("Inner");

        match registry
            .add_member(typeclass, Member::Nested(nested))
            .unwrap_err()
        {
            RegistrationError::MemberNotAllowed { kind, container } => {
                assert_eq!(kind, genus_core::MemberKind::Nested);
                assert_eq!(container, typeclass);
            }
            e => panic!("Expected MemberNotAllowed, got {:?}", e),
        }
    }

    #[test]
    fn nested_definition_scope_is_reparented() {
        let mut registry = DeclRegistry::new();
        let outer = registry.create_class("Outer");
        let inner = registry.create_class("Inner");
        registry.add_member(outer, Member::Nested(inner)).unwrap();

        let outer_scope = registry.definition(outer).unwrap().scope;
        let inner_scope = registry.definition(inner).unwrap().scope;
        assert_eq!(registry.scopes().parent(inner_scope), Some(outer_scope));

        registry.remove_member(outer, Member::Nested(inner)).unwrap();
        assert_eq!(
            registry.scopes().parent(inner_scope),
            Some(registry.root_scope())
        );
        assert_eq!(registry.scopes().lookup_local(outer_scope, "Inner"), None);
    }

    #[test]
    fn definition_cannot_nest_itself() {
        let mut registry = DeclRegistry::new();
        let class = registry.create_class("C");

        match registry.add_member(class, Member::Nested(class)).unwrap_err() {
            RegistrationError::CyclicNesting { ty, container } => {
                assert_eq!(ty, class);
                assert_eq!(container, class);
            }
            e => panic!("Expected CyclicNesting, got {:?}", e),
        }
        assert!(registry.members(class).unwrap().is_empty());
        assert_eq!(registry.owner_of(EntityRef::Type(class)), None);

        let scope = registry.definition(class).unwrap().scope;
        assert_eq!(registry.scopes().parent(scope), Some(registry.root_scope()));
        assert!(registry.lookup(scope, "missing").is_none());
    }

    #[test]
    fn mutual_nesting_rejected() {
        let mut registry = DeclRegistry::new();
        let outer = registry.create_class("Outer");
        let middle = registry.create_class("Middle");
        let inner = registry.create_class("Inner");
        registry.add_member(outer, Member::Nested(middle)).unwrap();
        registry.add_member(middle, Member::Nested(inner)).unwrap();

        let err = registry.add_member(inner, Member::Nested(outer)).unwrap_err();
        assert!(err.is_ownership_violation());
        assert!(matches!(err, RegistrationError::CyclicNesting { .. }));
        assert!(registry.members(inner).unwrap().is_empty());

        let inner_scope = registry.definition(inner).unwrap().scope;
        assert!(registry.lookup(inner_scope, "missing").is_none());
        assert_eq!(
            registry.lookup(inner_scope, "Middle"),
            Some(Symbol::Type(middle))
        );
    }

    #[test]
    fn rejected_declarations_allocate_nothing() {
        let mut registry = DeclRegistry::new();
        let class = registry.create_class("C");
        registry
            .declare_field(class, FieldEntry::new("x", primitives::INT32))
            .unwrap();
        let fields = registry.field_count();
        let methods = registry.method_count();
        let functions = registry.function_count();

        assert!(registry
            .declare_field(class, FieldEntry::new("x", primitives::FLOAT64))
            .is_err());
        assert!(registry
            .declare_method(class, "x", MemberBinding::Instance)
            .is_err());
        assert_eq!(registry.field_count(), fields);
        assert_eq!(registry.method_count(), methods);
        assert_eq!(registry.function_count(), functions);
    }

    #[test]
    fn removing_last_overload_frees_name() {
        let mut registry = DeclRegistry::new();
        let class = registry.create_class("C");
        let m = registry
            .declare_method(class, "run", MemberBinding::Instance)
            .unwrap();

        registry.remove_member(class, Member::Method(m)).unwrap();
        let scope = registry.definition(class).unwrap().scope;
        assert_eq!(registry.scopes().lookup_local(scope, "run"), None);
        assert_eq!(registry.owner_of(EntityRef::Method(m)), None);

        registry
            .declare_field(class, FieldEntry::new("run", primitives::BOOLEAN))
            .unwrap();
    }

    #[test]
    fn remove_member_of_other_definition_fails() {
        let mut registry = DeclRegistry::new();
        let a = registry.create_class("A");
        let b = registry.create_class("B");
        let field = registry
            .declare_field(a, FieldEntry::new("x", primitives::INT32))
            .unwrap();

        let err = registry.remove_member(b, Member::Field(field)).unwrap_err();
        assert!(err.is_ownership_violation());
        assert_eq!(registry.members(a).unwrap(), &[Member::Field(field)]);
    }

    #[test]
    fn constructors_join_constructor_group() {
        let mut registry = DeclRegistry::new();
        let class = registry.create_class("C");
        let ctor = registry.declare_constructor(class).unwrap();

        let group = registry.definition(class).unwrap().constructor_group;
        assert_eq!(
            registry.group(group).unwrap().overloads,
            vec![registry.method(ctor).unwrap().function]
        );
    }

    #[test]
    fn method_group_falls_back_to_base_class() {
        let mut registry = DeclRegistry::new();
        let base = registry.create_class("Base");
        let derived = registry.create_class("Derived");
        registry
            .declare_method(base, "draw", MemberBinding::Instance)
            .unwrap();
        registry
            .declare_method(derived, "draw", MemberBinding::Instance)
            .unwrap();

        let group_of = |registry: &DeclRegistry, def: TypeId| {
            let scope = registry.definition(def).unwrap().scope;
            registry
                .scopes()
                .lookup_local(scope, "draw")
                .and_then(|s| s.as_group())
                .unwrap()
        };
        let derived_group = group_of(&registry, derived);
        assert_eq!(registry.group(derived_group).unwrap().parent, None);

        registry.set_base(derived, Some(base)).unwrap();
        assert_eq!(
            registry.group(derived_group).unwrap().parent,
            Some(group_of(&registry, base))
        );
    }

    #[test]
    fn invalid_bases_rejected() {
        let mut registry = DeclRegistry::new();
        let class = registry.create_class("C");
        let iface = registry.create_interface("I");
        let typeclass = registry.create_typeclass("T");

        assert!(registry.set_base(class, Some(iface)).is_err());
        assert!(registry.set_base(class, Some(class)).is_err());
        assert!(registry.add_base(iface, iface).is_err());
        assert!(registry.add_base(iface, typeclass).is_err());
        registry.add_base(class, iface).unwrap();
        registry.add_base(class, iface).unwrap();
        assert_eq!(
            registry.type_entry(class).unwrap().as_class().unwrap().interfaces,
            vec![iface]
        );
    }

    #[test]
    fn cyclic_hierarchy_rejected() {
        let mut registry = DeclRegistry::new();
        let a = registry.create_class("A");
        let b = registry.create_class("B");
        let c = registry.create_class("C");
        registry.set_base(b, Some(a)).unwrap();
        registry.set_base(c, Some(b)).unwrap();

        match registry.set_base(a, Some(c)).unwrap_err() {
            RegistrationError::InvalidBase { ty, base } => {
                assert_eq!(ty, a);
                assert_eq!(base, c);
            }
            e => panic!("Expected InvalidBase, got {:?}", e),
        }
        assert_eq!(registry.type_entry(a).unwrap().as_class().unwrap().base, None);
        assert!(registry.inherits(c, a));
        assert!(!registry.inherits(a, c));

        let readable = registry.create_interface("Readable");
        let stream = registry.create_interface("Stream");
        registry.add_base(stream, readable).unwrap();
        assert!(registry.add_base(readable, stream).is_err());

        let eq = registry.create_typeclass("Eq");
        let ord = registry.create_typeclass("Ord");
        registry.add_base(ord, eq).unwrap();
        assert!(registry.add_base(eq, ord).is_err());
    }

    #[test]
    fn typeclass_implementations() {
        let mut registry = DeclRegistry::new();
        let show = registry.create_typeclass("Show");
        let impl_class = registry.create_class("ShowInt");

        registry
            .add_implementation(show, primitives::INT32, impl_class)
            .unwrap();
        match registry
            .add_implementation(show, primitives::INT32, impl_class)
            .unwrap_err()
        {
            RegistrationError::DuplicateImplementation { ty, .. } => {
                assert_eq!(ty, primitives::INT32)
            }
            e => panic!("Expected DuplicateImplementation, got {:?}", e),
        }

        assert_eq!(
            registry.remove_implementation(show, primitives::INT32),
            Ok(impl_class)
        );
        assert!(matches!(
            registry.remove_implementation(show, primitives::INT32),
            Err(RegistrationError::MissingImplementation { .. })
        ));
    }

    #[test]
    fn set_accessors_checks_binding() {
        let mut registry = DeclRegistry::new();
        let property = registry
            .add_property(PropertyEntry::new("len", primitives::INT32))
            .unwrap();
        let getter = registry.create_method("get_len", MemberBinding::Instance);
        let setter = registry.create_method("set_len", MemberBinding::Static);

        assert!(registry.set_accessors(property, Some(getter), Some(setter)).is_err());
        assert!(registry.property(property).unwrap().is_abstract());

        registry
            .set_accessors(property, Some(getter), None)
            .unwrap();
        assert_eq!(registry.property(property).unwrap().getter, Some(getter));
    }
}
