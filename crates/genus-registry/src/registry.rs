//! DeclRegistry - arena storage for every declaration entry.
//!
//! This module provides [`DeclRegistry`], the single owner of all parameters,
//! signatures, functions, members, types and overload groups. Entries are
//! addressed by the typed ids from `genus_core` and are never removed, so an
//! id handed out by a registry stays valid for its whole lifetime.
//!
//! # Storage Model
//!
//! - **Arenas**: one `Vec` per entry kind, indexed by the id's slot.
//! - **Ownership**: each owned entry embeds an `OwnerSlot`; the validating
//!   container operations (see `signature.rs`, `members.rs`, `overloads.rs`)
//!   are the only code that attaches or detaches.
//! - **Scopes**: names live in the [`ScopeTree`]; the builtin types are
//!   declared in its root scope.
//! - **Nullable types** are interned per inner type.
//!
//! # Thread Safety
//!
//! `DeclRegistry` is **not thread-safe**. Declarations are built on one
//! thread; once the graph is frozen it may be shared read-only. Construction
//! mutates the registry and must be serialized by the caller.
//!
//! # Example
//!
//! ```
//! use genus_core::{ParamEntry, primitives};
//! use genus_registry::DeclRegistry;
//!
//! let mut registry = DeclRegistry::new();
//! let f = registry.create_function("f");
//! let sig = registry.function(f).unwrap().signature;
//!
//! let x = registry.add_param(ParamEntry::new("x", primitives::BOOLEAN));
//! registry.append_positional(sig, x).unwrap();
//! assert_eq!(registry.param_index(x).unwrap().1, 0);
//! ```

use genus_core::{
    Builtin, ClassDef, DefinitionBody, DefinitionKind, EntityRef, FieldEntry, FunctionEntry,
    FunctionId, GroupId, InterfaceDef, MemberBinding, MethodEntry, MethodId, OverloadGroupEntry,
    Owner, OwnerSlot, ParamEntry, ParamId, PropertyEntry, PropertyId, RegistrationError, ScopeId,
    SignatureEntry, SignatureId, TemplateRef, TypeEntry, TypeId, TypeKind, TypeRef, TypeclassDef,
    FieldId, Origin,
};
use rustc_hash::FxHashMap;

use crate::scope_tree::{ScopeTree, Symbol};

/// Generates the lookup methods for one arena.
macro_rules! arena_accessors {
    ($arena:ident: $id:ty => $entry:ty, $get:ident, $req:ident, $req_mut:ident, $count:ident) => {
        /// Look up an entry, returning `None` for an unknown id.
        pub fn $get(&self, id: $id) -> Option<&$entry> {
            self.$arena.get(id.slot())
        }

        /// Look up an entry, failing with `UnknownEntity` for an unknown id.
        pub fn $req(&self, id: $id) -> Result<&$entry, RegistrationError> {
            self.$arena
                .get(id.slot())
                .ok_or_else(|| RegistrationError::unknown(id))
        }

        pub(crate) fn $req_mut(&mut self, id: $id) -> Result<&mut $entry, RegistrationError> {
            self.$arena
                .get_mut(id.slot())
                .ok_or_else(|| RegistrationError::unknown(id))
        }

        /// Number of entries of this kind.
        pub fn $count(&self) -> usize {
            self.$arena.len()
        }
    };
}

/// Arena storage for the declaration graph.
pub struct DeclRegistry {
    params: Vec<ParamEntry>,
    signatures: Vec<SignatureEntry>,
    functions: Vec<FunctionEntry>,
    methods: Vec<MethodEntry>,
    fields: Vec<FieldEntry>,
    properties: Vec<PropertyEntry>,
    types: Vec<TypeEntry>,
    groups: Vec<OverloadGroupEntry>,

    /// Interned nullable types by inner type.
    nullables: FxHashMap<TypeRef, TypeId>,

    pub(crate) scopes: ScopeTree,
}

impl Default for DeclRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DeclRegistry {
    /// Create a registry with the builtin types registered.
    pub fn new() -> Self {
        let mut registry = Self {
            params: Vec::new(),
            signatures: Vec::new(),
            functions: Vec::new(),
            methods: Vec::new(),
            fields: Vec::new(),
            properties: Vec::new(),
            types: Vec::new(),
            groups: Vec::new(),
            nullables: FxHashMap::default(),
            scopes: ScopeTree::new(),
        };
        registry.register_builtins();
        registry
    }

    fn register_builtins(&mut self) {
        let root = self.scopes.root();
        for builtin in Builtin::ALL {
            let id = TypeId::new(self.types.len() as u32);
            let mut entry = TypeEntry::new(builtin.name(), TypeKind::Builtin(builtin));
            entry.owner = OwnerSlot::owned_by(Owner::Scope(root));
            self.types.push(entry);
            self.scopes.insert(root, builtin.name(), Symbol::Type(id));
        }
    }

    // ==========================================================================
    // Lookup
    // ==========================================================================

    arena_accessors!(params: ParamId => ParamEntry, get_param, param, param_mut, param_count);
    arena_accessors!(signatures: SignatureId => SignatureEntry, get_signature, signature, signature_mut, signature_count);
    arena_accessors!(functions: FunctionId => FunctionEntry, get_function, function, function_mut, function_count);
    arena_accessors!(methods: MethodId => MethodEntry, get_method, method, method_mut, method_count);
    arena_accessors!(fields: FieldId => FieldEntry, get_field, field, field_mut, field_count);
    arena_accessors!(properties: PropertyId => PropertyEntry, get_property, property, property_mut, property_count);
    arena_accessors!(types: TypeId => TypeEntry, get_type, type_entry, type_mut, type_count);
    arena_accessors!(groups: GroupId => OverloadGroupEntry, get_group, group, group_mut, group_count);

    /// The body of a class, interface or typeclass.
    pub fn definition(&self, ty: TypeId) -> Result<&DefinitionBody, RegistrationError> {
        self.type_entry(ty)?
            .body()
            .ok_or(RegistrationError::NotADefinition { ty })
    }

    pub(crate) fn definition_mut(
        &mut self,
        ty: TypeId,
    ) -> Result<&mut DefinitionBody, RegistrationError> {
        self.type_mut(ty)?
            .body_mut()
            .ok_or(RegistrationError::NotADefinition { ty })
    }

    /// The kind of a definition.
    pub fn definition_kind(&self, ty: TypeId) -> Result<DefinitionKind, RegistrationError> {
        self.type_entry(ty)?
            .definition_kind()
            .ok_or(RegistrationError::NotADefinition { ty })
    }

    /// The signature of a function or definition template.
    pub fn template_signature(&self, template: TemplateRef) -> Result<SignatureId, RegistrationError> {
        match template {
            TemplateRef::Function(f) => Ok(self.function(f)?.signature),
            TemplateRef::Definition(ty) => Ok(self.definition(ty)?.signature),
        }
    }

    /// The origin of a constructed function or definition.
    pub fn origin(&self, template: TemplateRef) -> Result<Option<&Origin>, RegistrationError> {
        match template {
            TemplateRef::Function(f) => Ok(self.function(f)?.origin.as_ref()),
            TemplateRef::Definition(ty) => Ok(self.definition(ty)?.origin.as_ref()),
        }
    }

    /// The name of a function or definition template.
    pub fn template_name(&self, template: TemplateRef) -> Result<&str, RegistrationError> {
        match template {
            TemplateRef::Function(f) => Ok(&self.function(f)?.name),
            TemplateRef::Definition(ty) => Ok(&self.type_entry(ty)?.name),
        }
    }

    /// The scope tree.
    pub fn scopes(&self) -> &ScopeTree {
        &self.scopes
    }

    /// The root (global) scope.
    pub fn root_scope(&self) -> ScopeId {
        self.scopes.root()
    }

    /// Human-readable name of a type reference, for diagnostics.
    pub fn type_name(&self, ty: TypeRef) -> String {
        match ty {
            TypeRef::Type(id) => self
                .get_type(id)
                .map_or_else(|| id.to_string(), |entry| entry.name.clone()),
            TypeRef::Param(id) => self
                .get_param(id)
                .map_or_else(|| id.to_string(), |entry| entry.name.clone()),
        }
    }

    // ==========================================================================
    // Ownership
    // ==========================================================================

    fn owner_slot(&self, entity: EntityRef) -> Result<&OwnerSlot, RegistrationError> {
        Ok(match entity {
            EntityRef::Param(id) => &self.param(id)?.owner,
            EntityRef::Signature(id) => &self.signature(id)?.owner,
            EntityRef::Function(id) => &self.function(id)?.owner,
            EntityRef::Method(id) => &self.method(id)?.owner,
            EntityRef::Field(id) => &self.field(id)?.owner,
            EntityRef::Property(id) => &self.property(id)?.owner,
            EntityRef::Type(id) => &self.type_entry(id)?.owner,
        })
    }

    fn owner_slot_mut(&mut self, entity: EntityRef) -> Result<&mut OwnerSlot, RegistrationError> {
        Ok(match entity {
            EntityRef::Param(id) => &mut self.param_mut(id)?.owner,
            EntityRef::Signature(id) => &mut self.signature_mut(id)?.owner,
            EntityRef::Function(id) => &mut self.function_mut(id)?.owner,
            EntityRef::Method(id) => &mut self.method_mut(id)?.owner,
            EntityRef::Field(id) => &mut self.field_mut(id)?.owner,
            EntityRef::Property(id) => &mut self.property_mut(id)?.owner,
            EntityRef::Type(id) => &mut self.type_mut(id)?.owner,
        })
    }

    /// The current owner of an entry.
    pub fn owner_of(&self, entity: EntityRef) -> Option<Owner> {
        self.owner_slot(entity).ok()?.get()
    }

    /// Check that `entity` exists and is unowned.
    pub(crate) fn check_attach(&self, entity: EntityRef) -> Result<(), RegistrationError> {
        self.owner_slot(entity)?.check_attach(entity)
    }

    /// Check that `entity` is owned by `owner`.
    pub(crate) fn check_owner(&self, entity: EntityRef, owner: Owner) -> Result<(), RegistrationError> {
        self.owner_slot(entity)?.expect_owner(entity, owner)
    }

    pub(crate) fn attach(&mut self, entity: EntityRef, owner: Owner) -> Result<(), RegistrationError> {
        self.owner_slot_mut(entity)?.attach(entity, owner)?;
        tracing::trace!(%entity, %owner, "attached");
        Ok(())
    }

    pub(crate) fn detach(&mut self, entity: EntityRef) -> Result<Owner, RegistrationError> {
        let owner = self.owner_slot_mut(entity)?.detach(entity)?;
        tracing::trace!(%entity, %owner, "detached");
        Ok(owner)
    }

    // ==========================================================================
    // Creation
    // ==========================================================================

    /// Add a standalone parameter. Any owner set on `entry` is cleared.
    pub fn add_param(&mut self, mut entry: ParamEntry) -> ParamId {
        let id = ParamId::new(self.params.len() as u32);
        entry.owner = OwnerSlot::new();
        self.params.push(entry);
        id
    }

    /// Add an empty, unowned signature.
    pub fn add_signature(&mut self) -> SignatureId {
        let id = SignatureId::new(self.signatures.len() as u32);
        self.signatures.push(SignatureEntry::new());
        id
    }

    /// Create a function with an empty signature.
    pub fn create_function(&mut self, name: impl Into<String>) -> FunctionId {
        let id = FunctionId::new(self.functions.len() as u32);
        let signature = self.add_signature();
        self.signatures[signature.slot()].owner = OwnerSlot::owned_by(Owner::Function(id));
        self.functions.push(FunctionEntry::new(name, signature));
        id
    }

    /// Add a function built elsewhere. Its signature must be unowned and is
    /// attached to the new function.
    pub fn add_function(&mut self, mut entry: FunctionEntry) -> Result<FunctionId, RegistrationError> {
        let id = FunctionId::new(self.functions.len() as u32);
        let signature = EntityRef::Signature(entry.signature);
        self.check_attach(signature)?;
        self.attach(signature, Owner::Function(id))?;
        entry.owner = OwnerSlot::new();
        self.functions.push(entry);
        Ok(id)
    }

    /// Create a method wrapping a fresh function.
    pub fn create_method(&mut self, name: impl Into<String>, binding: MemberBinding) -> MethodId {
        let id = MethodId::new(self.methods.len() as u32);
        let function = self.create_function(name);
        self.functions[function.slot()].owner = OwnerSlot::owned_by(Owner::Method(id));
        self.methods.push(MethodEntry::new(function).with_binding(binding));
        id
    }

    /// Add a method wrapping an existing, unowned function.
    pub fn add_method(&mut self, mut entry: MethodEntry) -> Result<MethodId, RegistrationError> {
        let id = MethodId::new(self.methods.len() as u32);
        let function = EntityRef::Function(entry.function);
        self.check_attach(function)?;
        self.attach(function, Owner::Method(id))?;
        entry.owner = OwnerSlot::new();
        self.methods.push(entry);
        Ok(id)
    }

    /// Add a standalone field.
    pub fn add_field(&mut self, mut entry: FieldEntry) -> FieldId {
        let id = FieldId::new(self.fields.len() as u32);
        entry.owner = OwnerSlot::new();
        self.fields.push(entry);
        id
    }

    /// Add a standalone property. Its accessors must share its binding.
    pub fn add_property(&mut self, mut entry: PropertyEntry) -> Result<PropertyId, RegistrationError> {
        for accessor in [entry.getter, entry.setter].into_iter().flatten() {
            self.check_accessor(&entry, accessor)?;
        }
        let id = PropertyId::new(self.properties.len() as u32);
        entry.owner = OwnerSlot::new();
        self.properties.push(entry);
        Ok(id)
    }

    pub(crate) fn check_accessor(
        &self,
        property: &PropertyEntry,
        accessor: MethodId,
    ) -> Result<(), RegistrationError> {
        let method = self.method(accessor)?;
        if method.binding != property.binding {
            return Err(RegistrationError::AccessorBindingMismatch {
                property: property.name.clone(),
                accessor: self.function(method.function)?.name.clone(),
            });
        }
        Ok(())
    }

    /// Create a class with an empty signature, declared nowhere yet.
    pub fn create_class(&mut self, name: impl Into<String>) -> TypeId {
        self.create_definition(name, DefinitionKind::Class)
    }

    /// Create an interface with an empty signature.
    pub fn create_interface(&mut self, name: impl Into<String>) -> TypeId {
        self.create_definition(name, DefinitionKind::Interface)
    }

    /// Create a typeclass with an empty signature.
    pub fn create_typeclass(&mut self, name: impl Into<String>) -> TypeId {
        self.create_definition(name, DefinitionKind::Typeclass)
    }

    /// Create a definition of any kind with an empty signature.
    pub fn create_definition(&mut self, name: impl Into<String>, kind: DefinitionKind) -> TypeId {
        let id = TypeId::new(self.types.len() as u32);
        let signature = self.add_signature();
        self.signatures[signature.slot()].owner = OwnerSlot::owned_by(Owner::Definition(id));
        self.push_definition(id, name.into(), kind, signature)
    }

    /// Create a definition around an existing, unowned signature.
    pub fn add_definition(
        &mut self,
        name: impl Into<String>,
        kind: DefinitionKind,
        signature: SignatureId,
    ) -> Result<TypeId, RegistrationError> {
        let id = TypeId::new(self.types.len() as u32);
        let entity = EntityRef::Signature(signature);
        self.check_attach(entity)?;
        self.attach(entity, Owner::Definition(id))?;
        Ok(self.push_definition(id, name.into(), kind, signature))
    }

    fn push_definition(
        &mut self,
        id: TypeId,
        name: String,
        kind: DefinitionKind,
        signature: SignatureId,
    ) -> TypeId {
        let scope = self.scopes.create_scope(self.scopes.root());
        let constructor_group = self.push_group(OverloadGroupEntry::new(name.clone(), scope));
        let body = DefinitionBody::new(signature, scope, constructor_group);
        let kind = match kind {
            DefinitionKind::Class => TypeKind::Class(ClassDef {
                body,
                base: None,
                interfaces: Vec::new(),
            }),
            DefinitionKind::Interface => TypeKind::Interface(InterfaceDef {
                body,
                bases: Vec::new(),
            }),
            DefinitionKind::Typeclass => TypeKind::Typeclass(TypeclassDef {
                body,
                bases: Vec::new(),
                implementations: FxHashMap::default(),
            }),
        };
        self.types.push(TypeEntry::new(name, kind));
        id
    }

    pub(crate) fn push_group(&mut self, entry: OverloadGroupEntry) -> GroupId {
        let id = GroupId::new(self.groups.len() as u32);
        self.groups.push(entry);
        id
    }

    /// The nullable type wrapping `inner`, created on first use.
    pub fn nullable(&mut self, inner: impl Into<TypeRef>) -> TypeId {
        let inner = inner.into();
        if let Some(id) = self.nullables.get(&inner) {
            return *id;
        }
        let id = TypeId::new(self.types.len() as u32);
        let name = format!("{}?", self.type_name(inner));
        self.types.push(TypeEntry::new(name, TypeKind::Nullable(inner)));
        self.nullables.insert(inner, id);
        id
    }

    // ==========================================================================
    // Updates
    // ==========================================================================

    /// Record where a constructed function or definition came from.
    pub fn set_origin(&mut self, target: TemplateRef, origin: Origin) -> Result<(), RegistrationError> {
        match target {
            TemplateRef::Function(f) => self.function_mut(f)?.origin = Some(origin),
            TemplateRef::Definition(ty) => self.definition_mut(ty)?.origin = Some(origin),
        }
        Ok(())
    }

    /// Set a function's return type.
    pub fn set_return_type(&mut self, f: FunctionId, ty: impl Into<TypeRef>) -> Result<(), RegistrationError> {
        self.function_mut(f)?.return_type = ty.into();
        Ok(())
    }

    /// Replace a function's body.
    pub fn set_body(
        &mut self,
        f: FunctionId,
        body: Option<genus_core::FunctionBody>,
    ) -> Result<(), RegistrationError> {
        self.function_mut(f)?.body = body;
        Ok(())
    }

    /// Rewrite the callee of the call instruction at `index` in `f`'s body.
    ///
    /// Returns `false` if the function has no body or the instruction is not
    /// a call.
    pub fn rebind_call(
        &mut self,
        f: FunctionId,
        index: usize,
        callee: genus_core::Callee,
    ) -> Result<bool, RegistrationError> {
        Ok(self
            .function_mut(f)?
            .body
            .as_mut()
            .is_some_and(|body| body.rebind_callee(index, callee)))
    }
}
