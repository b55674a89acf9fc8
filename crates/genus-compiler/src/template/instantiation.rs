//! The construction engine.
//!
//! [`ConstructionEngine::construct`] specializes a function or definition
//! template against a substitution:
//!
//! 1. lift the binding to the root of the template's family;
//! 2. infer, validate and level the root's parameters;
//! 3. compute the canonical key and return a cached (or in-progress) entry
//!    on a hit;
//! 4. substitute the signature level by level, recording each open
//!    parameter's counterpart back into the working substitution;
//! 5. construct the rest (return type, bases, members, nested definitions)
//!    against the working substitution.
//!
//! A result is a template iff any part of it is still open. Definitions are
//! registered in the cache before their members are built, so members that
//! refer back to the definition resolve to the entry under construction.
//! Members are built in their container's context and are never cached on
//! their own.

use genus_core::{
    ConstructionError, DefinitionKind, EntityRef, FieldEntry, FieldId, FunctionEntry, FunctionId,
    GenericArg, Member, MethodEntry, MethodId, Origin, Owner, ParamEntry, ParamId, ParamSlot,
    PropertyEntry, PropertyId, RegistrationError, SignatureId, Substitution, TemplateRef, TypeId,
    TypeKind, TypeRef, Value,
};
use genus_registry::DeclRegistry;
use rustc_hash::FxHashMap;

use super::cache::{ArgumentKey, InstanceCache};
use super::dependency::{
    DependencyLevels, infer_bindings, resolve, resolve_dependencies, validate_bindings,
};
use super::substitution::{
    canonical_key, format_instance_name, lift_to_root, normalize_counterparts,
};
use super::{ConstructOptions, Constructed};

/// A root template with its parameters prepared for substitution.
struct Prepared {
    root: TemplateRef,
    params: Vec<ParamId>,
    levels: DependencyLevels,
    key: ArgumentKey,
    /// Bindings after inference, before any counterpart is recorded.
    subst: Substitution,
}

/// Specializes templates, memoizing results in an [`InstanceCache`].
pub struct ConstructionEngine<'a> {
    registry: &'a mut DeclRegistry,
    cache: &'a mut InstanceCache,
    options: ConstructOptions,
    /// Definitions whose members are still being built.
    in_progress: FxHashMap<(TemplateRef, ArgumentKey), TemplateRef>,
}

impl<'a> ConstructionEngine<'a> {
    pub fn new(registry: &'a mut DeclRegistry, cache: &'a mut InstanceCache) -> Self {
        Self {
            registry,
            cache,
            options: ConstructOptions::default(),
            in_progress: FxHashMap::default(),
        }
    }

    pub fn with_options(mut self, options: ConstructOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ConstructOptions {
        &self.options
    }

    pub fn registry(&self) -> &DeclRegistry {
        &*self.registry
    }

    // ==========================================================================
    // Entry points
    // ==========================================================================

    /// Specialize a function or definition template.
    ///
    /// Returns the template itself if it is already closed.
    #[tracing::instrument(level = "debug", skip_all, fields(template = %template, bindings = subst.len()))]
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn construct(
        &mut self,
        template: TemplateRef,
        subst: &Substitution,
    ) -> Result<Constructed<TemplateRef>, ConstructionError> {
        let (root, subst) = lift_to_root(self.registry, template, subst)?;
        self.construct_root(root, subst, false)
    }

    /// Specialize a function template.
    pub fn construct_function(
        &mut self,
        f: FunctionId,
        subst: &Substitution,
    ) -> Result<Constructed<FunctionId>, ConstructionError> {
        let constructed = self.construct(TemplateRef::Function(f), subst)?;
        match constructed.id {
            TemplateRef::Function(id) => Ok(Constructed::new(id, constructed.is_template)),
            TemplateRef::Definition(_) => Err(RegistrationError::unknown(f).into()),
        }
    }

    /// Specialize a class, interface or typeclass template.
    pub fn construct_definition(
        &mut self,
        ty: TypeId,
        subst: &Substitution,
    ) -> Result<Constructed<TypeId>, ConstructionError> {
        let constructed = self.construct(TemplateRef::Definition(ty), subst)?;
        match constructed.id {
            TemplateRef::Definition(id) => Ok(Constructed::new(id, constructed.is_template)),
            TemplateRef::Function(_) => Err(RegistrationError::NotADefinition { ty }.into()),
        }
    }

    /// Specialize a template by binding its positional parameters in order.
    pub fn instantiate(
        &mut self,
        template: TemplateRef,
        args: &[GenericArg],
    ) -> Result<Constructed<TemplateRef>, ConstructionError> {
        let sig = self.registry.template_signature(template)?;
        let positional = &self.registry.signature(sig)?.positional;
        if positional.len() != args.len() {
            return Err(ConstructionError::ArityMismatch {
                template: self.registry.template_name(template)?.to_string(),
                expected: positional.len(),
                got: args.len(),
            });
        }
        let subst: Substitution = positional.iter().copied().zip(args.iter().cloned()).collect();
        self.construct(template, &subst)
    }

    /// Specialize a field on its own.
    pub fn construct_field(
        &mut self,
        field: FieldId,
        subst: &Substitution,
    ) -> Result<Constructed<FieldId>, ConstructionError> {
        let id = self.build_field(field, subst)?;
        let open = self.registry.is_open_type_ref(self.registry.field(id)?.ty);
        Ok(Constructed::new(id, open))
    }

    /// Specialize a method on its own.
    pub fn construct_method(
        &mut self,
        method: MethodId,
        subst: &Substitution,
    ) -> Result<Constructed<MethodId>, ConstructionError> {
        let id = self.build_method(method, subst)?;
        let open = self.registry.is_open_function(self.registry.method(id)?.function);
        Ok(Constructed::new(id, open))
    }

    /// Specialize a property and its accessors on their own.
    pub fn construct_property(
        &mut self,
        property: PropertyId,
        subst: &Substitution,
    ) -> Result<Constructed<PropertyId>, ConstructionError> {
        let id = self.build_property(property, subst, &FxHashMap::default())?;
        let entry = self.registry.property(id)?;
        let mut open = self.registry.is_open_type_ref(entry.ty);
        for accessor in [entry.getter, entry.setter].into_iter().flatten() {
            open |= self.registry.is_open_function(self.registry.method(accessor)?.function);
        }
        Ok(Constructed::new(id, open))
    }

    /// Substitute a type reference, constructing open types it names.
    pub fn construct_type_ref(
        &mut self,
        ty: TypeRef,
        subst: &Substitution,
    ) -> Result<TypeRef, ConstructionError> {
        match ty {
            TypeRef::Param(param) => match resolve(self.registry, subst, param)? {
                None => Ok(ty),
                Some(GenericArg::Param(other)) => Ok(TypeRef::Param(other)),
                Some(GenericArg::Value(Value::Type(id))) => Ok(TypeRef::Type(id)),
                Some(GenericArg::Value(other)) => Err(ConstructionError::InvalidBinding {
                    parameter: self.registry.type_name(ty),
                    reason: format!("expected a type, got {}", other),
                }),
            },
            TypeRef::Type(id) => self.construct_type(id, subst).map(TypeRef::Type),
        }
    }

    fn construct_type(&mut self, ty: TypeId, subst: &Substitution) -> Result<TypeId, ConstructionError> {
        if !self.registry.is_open_type(ty) {
            return Ok(ty);
        }
        let nullable_of = match &self.registry.type_entry(ty)?.kind {
            TypeKind::Builtin(_) => return Ok(ty),
            TypeKind::Nullable(inner) => Some(*inner),
            _ => None,
        };
        match nullable_of {
            Some(inner) => {
                let inner = self.construct_type_ref(inner, subst)?;
                Ok(self.registry.nullable(inner))
            }
            None => self
                .construct_definition(ty, subst)
                .map(|constructed| constructed.id),
        }
    }

    // ==========================================================================
    // Root construction
    // ==========================================================================

    fn is_cacheable(&self, root: TemplateRef) -> bool {
        if !self.options.enable_caching {
            return false;
        }
        let entity = match root {
            TemplateRef::Function(f) => EntityRef::Function(f),
            TemplateRef::Definition(ty) => EntityRef::Type(ty),
        };
        !matches!(
            self.registry.owner_of(entity),
            Some(Owner::Method(_) | Owner::Definition(_))
        )
    }

    fn lookup(&self, root: TemplateRef, key: &ArgumentKey) -> Option<TemplateRef> {
        if let Some(found) = self.in_progress.get(&(root, key.clone())) {
            return Some(*found);
        }
        if self.is_cacheable(root) {
            self.cache.get_instance(root, key)
        } else {
            None
        }
    }

    fn prepare(&self, root: TemplateRef, mut subst: Substitution) -> Result<Prepared, ConstructionError> {
        let sig = self.registry.template_signature(root)?;
        let params = self.registry.parameters(sig)?;

        normalize_counterparts(self.registry, root, &params, &mut subst)?;
        infer_bindings(self.registry, &params, &mut subst)?;
        validate_bindings(
            self.registry,
            &params,
            &subst,
            self.options.inference_conflicts,
        )?;
        let levels = resolve_dependencies(self.registry, &params, &subst)?;
        let key = canonical_key(self.registry, &params, &subst)?;

        Ok(Prepared {
            root,
            params,
            levels,
            key,
            subst,
        })
    }

    /// Construct a root template. `force` builds a fresh copy even of a
    /// closed template, for entries that cannot be shared between owners.
    fn construct_root(
        &mut self,
        root: TemplateRef,
        subst: Substitution,
        force: bool,
    ) -> Result<Constructed<TemplateRef>, ConstructionError> {
        if !force && !self.registry.is_template(root) {
            return Ok(Constructed::new(root, false));
        }

        let prepared = self.prepare(root, subst)?;
        if let Some(found) = self.lookup(root, &prepared.key) {
            tracing::debug!(fingerprint = prepared.key.fingerprint(), %found, "construction cache hit");
            return Ok(Constructed::new(found, self.registry.is_template(found)));
        }
        tracing::debug!(fingerprint = prepared.key.fingerprint(), "construction cache miss");

        match root {
            TemplateRef::Function(f) => self.build_function(f, prepared),
            TemplateRef::Definition(ty) => self.build_definition(ty, prepared),
        }
    }

    /// Substitute the prepared parameters in dependency order.
    ///
    /// Bound parameters are dropped; every other parameter gets a
    /// counterpart recorded in `subst`. The new signature keeps declaration
    /// order and slots.
    fn build_signature(
        &mut self,
        prepared: &Prepared,
        subst: &mut Substitution,
    ) -> Result<(SignatureId, FxHashMap<ParamId, ParamId>), ConstructionError> {
        let mut pending = Vec::new();
        for &param in &prepared.params {
            if resolve(self.registry, &prepared.subst, param)?.is_none() {
                pending.push(param);
            }
        }

        let mut counterparts: FxHashMap<ParamId, ParamId> = FxHashMap::default();
        for param in prepared.levels.iter() {
            if !pending.contains(&param) {
                continue;
            }
            let entry = self.registry.param(param)?.clone();
            let ty = self.construct_type_ref(entry.ty, subst)?;
            let counterpart = self.registry.add_param(ParamEntry {
                ty,
                ..entry.detached_copy()
            });
            subst.bind(param, counterpart);
            counterparts.insert(param, counterpart);
        }

        let sig = self.registry.add_signature();
        for param in &prepared.params {
            let Some(counterpart) = counterparts.get(param).copied() else {
                continue;
            };
            match self.registry.param_index(*param)?.0 {
                ParamSlot::Positional => self.registry.append_positional(sig, counterpart)?,
                ParamSlot::Named => self.registry.append_named(sig, counterpart)?,
                ParamSlot::VariadicPositional => {
                    self.registry.set_variadic_positional(sig, Some(counterpart))?;
                }
                ParamSlot::VariadicNamed => {
                    self.registry.set_variadic_named(sig, Some(counterpart))?;
                }
            }
        }
        Ok((sig, counterparts))
    }

    /// Bindings of the root's parameters as recorded in the origin.
    fn origin_arguments(
        &self,
        prepared: &Prepared,
        counterparts: &FxHashMap<ParamId, ParamId>,
    ) -> Result<Substitution, ConstructionError> {
        let mut arguments = Substitution::new();
        for &param in &prepared.params {
            if let Some(counterpart) = counterparts.get(&param) {
                arguments.bind(param, *counterpart);
            } else if let Some(arg) = resolve(self.registry, &prepared.subst, param)? {
                arguments.bind(param, arg);
            }
        }
        Ok(arguments)
    }

    fn build_function(
        &mut self,
        f: FunctionId,
        prepared: Prepared,
    ) -> Result<Constructed<TemplateRef>, ConstructionError> {
        let template = self.registry.function(f)?.clone();
        let mut subst = prepared.subst.clone();

        let (signature, counterparts) = self.build_signature(&prepared, &mut subst)?;
        let return_type = self.construct_type_ref(template.return_type, &subst)?;

        let mut entry = FunctionEntry::new(template.name, signature).with_return_type(return_type);
        entry.body = template.body;
        entry.origin = Some(Origin::new(
            prepared.root,
            self.origin_arguments(&prepared, &counterparts)?,
        ));
        let id = self.registry.add_function(entry)?;
        let constructed = TemplateRef::Function(id);

        if self.is_cacheable(prepared.root) {
            self.cache
                .cache_instance(prepared.root, prepared.key, constructed);
        }
        let is_template = self.registry.is_open_function(id);
        tracing::debug!(%constructed, is_template, "constructed function");
        Ok(Constructed::new(constructed, is_template))
    }

    fn build_definition(
        &mut self,
        ty: TypeId,
        prepared: Prepared,
    ) -> Result<Constructed<TemplateRef>, ConstructionError> {
        let kind: DefinitionKind = self.registry.definition_kind(ty)?;
        let name = format_instance_name(
            self.registry,
            &self.registry.type_entry(ty)?.name,
            &prepared.params,
            &prepared.key,
        );
        let mut subst = prepared.subst.clone();

        // 1. Signature, then allocate so self-references can find the entry
        let (signature, counterparts) = self.build_signature(&prepared, &mut subst)?;
        let arguments = self.origin_arguments(&prepared, &counterparts)?;
        let id = self.registry.add_definition(name, kind, signature)?;
        let constructed = TemplateRef::Definition(id);
        self.registry
            .set_origin(constructed, Origin::new(prepared.root, arguments))?;

        // 2. Register before members
        let slot = (prepared.root, prepared.key.clone());
        let cacheable = self.is_cacheable(prepared.root);
        self.in_progress.insert(slot.clone(), constructed);
        if cacheable {
            self.cache
                .cache_instance(prepared.root, prepared.key.clone(), constructed);
        }

        // 3. Bases and members
        let result = self.populate_definition(ty, id, &subst);
        self.in_progress.remove(&slot);
        if let Err(err) = result {
            if cacheable {
                self.cache.remove_instance(prepared.root, &prepared.key);
            }
            tracing::debug!(%err, "definition construction failed");
            return Err(err);
        }

        let is_template = self.registry.is_open_definition(id);
        tracing::debug!(%constructed, is_template, "constructed definition");
        Ok(Constructed::new(constructed, is_template))
    }

    // ==========================================================================
    // Members
    // ==========================================================================

    fn populate_definition(
        &mut self,
        template: TypeId,
        target: TypeId,
        subst: &Substitution,
    ) -> Result<(), ConstructionError> {
        let (base, bases, mut implementations) = match &self.registry.type_entry(template)?.kind {
            TypeKind::Class(def) => (def.base, def.interfaces.clone(), Vec::new()),
            TypeKind::Interface(def) => (None, def.bases.clone(), Vec::new()),
            TypeKind::Typeclass(def) => (
                None,
                def.bases.clone(),
                def.implementations
                    .iter()
                    .map(|(ty, class)| (*ty, *class))
                    .collect::<Vec<_>>(),
            ),
            _ => return Err(RegistrationError::NotADefinition { ty: template }.into()),
        };
        implementations.sort_unstable();

        if let Some(base) = base {
            let base = self.construct_type(base, subst)?;
            self.registry.set_base(target, Some(base))?;
        }
        for other in bases {
            let other = self.construct_type(other, subst)?;
            self.registry.add_base(target, other)?;
        }
        for (ty, class) in implementations {
            let ty = self.construct_type(ty, subst)?;
            let class = self.construct_type(class, subst)?;
            self.registry.add_implementation(target, ty, class)?;
        }

        let members = self.registry.members(template)?.to_vec();
        let mut methods: FxHashMap<MethodId, MethodId> = FxHashMap::default();
        for member in &members {
            if let Member::Method(method) | Member::Constructor(method) = *member {
                let constructed = self.build_method(method, subst)?;
                methods.insert(method, constructed);
            }
        }

        for member in members {
            let constructed = match member {
                Member::Field(field) => Member::Field(self.build_field(field, subst)?),
                Member::Method(method) => Member::Method(mapped(&methods, method)?),
                Member::Constructor(method) => Member::Constructor(mapped(&methods, method)?),
                Member::Property(property) => {
                    Member::Property(self.build_property(property, subst, &methods)?)
                }
                Member::Nested(nested) => Member::Nested(self.build_nested(nested, subst)?),
            };
            self.registry.add_member(target, constructed)?;
        }
        Ok(())
    }

    fn build_field(&mut self, field: FieldId, subst: &Substitution) -> Result<FieldId, ConstructionError> {
        let template = self.registry.field(field)?.clone();
        let ty = self.construct_type_ref(template.ty, subst)?;
        let mut entry = FieldEntry::new(template.name, ty)
            .with_binding(template.binding)
            .with_access(template.access);
        entry.default = template.default;
        Ok(self.registry.add_field(entry))
    }

    fn build_method(&mut self, method: MethodId, subst: &Substitution) -> Result<MethodId, ConstructionError> {
        let template = self.registry.method(method)?.clone();
        let function = match self
            .construct_root(TemplateRef::Function(template.function), subst.clone(), true)?
            .id
        {
            TemplateRef::Function(function) => function,
            TemplateRef::Definition(_) => {
                return Err(RegistrationError::unknown(template.function).into());
            }
        };
        let entry = MethodEntry::new(function)
            .with_binding(template.binding)
            .with_access(template.access);
        Ok(self.registry.add_method(entry)?)
    }

    /// Build a property; accessors found in `methods` are remapped, others
    /// are constructed alongside.
    fn build_property(
        &mut self,
        property: PropertyId,
        subst: &Substitution,
        methods: &FxHashMap<MethodId, MethodId>,
    ) -> Result<PropertyId, ConstructionError> {
        let template = self.registry.property(property)?.clone();
        let ty = self.construct_type_ref(template.ty, subst)?;

        let mut accessors = [None, None];
        for (slot, accessor) in accessors.iter_mut().zip([template.getter, template.setter]) {
            if let Some(accessor) = accessor {
                *slot = Some(match methods.get(&accessor) {
                    Some(constructed) => *constructed,
                    None => self.build_method(accessor, subst)?,
                });
            }
        }

        let mut entry = PropertyEntry::new(template.name, ty).with_binding(template.binding);
        entry.access = template.access;
        entry.getter = accessors[0];
        entry.setter = accessors[1];
        Ok(self.registry.add_property(entry)?)
    }

    fn build_nested(&mut self, nested: TypeId, subst: &Substitution) -> Result<TypeId, ConstructionError> {
        match self
            .construct_root(TemplateRef::Definition(nested), subst.clone(), true)?
            .id
        {
            TemplateRef::Definition(id) => Ok(id),
            TemplateRef::Function(_) => Err(RegistrationError::NotADefinition { ty: nested }.into()),
        }
    }
}

fn mapped(methods: &FxHashMap<MethodId, MethodId>, method: MethodId) -> Result<MethodId, ConstructionError> {
    methods
        .get(&method)
        .copied()
        .ok_or_else(|| RegistrationError::unknown(method).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::InferenceConflictPolicy;
    use genus_core::{MemberBinding, primitives};

    /// `f(a: Type, b: Int32, c: Type)` with `a` and `c` generic.
    fn generic_function(registry: &mut DeclRegistry) -> (FunctionId, ParamId, ParamId) {
        let f = registry.create_function("f");
        let sig = registry.function(f).unwrap().signature;
        let a = registry
            .add_positional_param(sig, ParamEntry::generic("a", primitives::TYPE))
            .unwrap();
        registry
            .add_positional_param(sig, ParamEntry::new("b", primitives::INT32))
            .unwrap();
        let c = registry
            .add_positional_param(sig, ParamEntry::generic("c", primitives::TYPE))
            .unwrap();
        (f, a, c)
    }

    /// `class Box<T> { value: T; get(): T }`
    fn generic_box(registry: &mut DeclRegistry) -> (TypeId, ParamId) {
        let class = registry.create_class("Box");
        let t = registry.add_generic_param(class, "T", primitives::TYPE).unwrap();
        registry
            .declare_field(class, FieldEntry::new("value", t))
            .unwrap();
        let get = registry
            .declare_method(class, "get", MemberBinding::Instance)
            .unwrap();
        let get_fn = registry.method(get).unwrap().function;
        registry.set_return_type(get_fn, t).unwrap();
        (class, t)
    }

    fn param_names(registry: &DeclRegistry, sig: SignatureId) -> Vec<String> {
        registry
            .parameters(sig)
            .unwrap()
            .into_iter()
            .map(|param| registry.param(param).unwrap().name.clone())
            .collect()
    }

    #[test]
    fn bound_parameters_are_dropped() {
        let mut registry = DeclRegistry::new();
        let mut cache = InstanceCache::new();
        let (f, a, c) = generic_function(&mut registry);
        let subst = Substitution::new()
            .with(a, primitives::BOOLEAN)
            .with(c, primitives::STRING);

        let constructed = ConstructionEngine::new(&mut registry, &mut cache)
            .construct_function(f, &subst)
            .unwrap();
        assert!(constructed.is_concrete());

        let entry = registry.function(constructed.id).unwrap();
        assert_eq!(param_names(&registry, entry.signature), vec!["b"]);
        let b = registry.parameters(entry.signature).unwrap()[0];
        assert_eq!(registry.param(b).unwrap().ty, TypeRef::Type(primitives::INT32));

        let origin = entry.origin.as_ref().unwrap();
        assert_eq!(origin.template, TemplateRef::Function(f));
        assert_eq!(origin.arguments.get(a), Some(&GenericArg::ty(primitives::BOOLEAN)));
    }

    #[test]
    fn same_key_returns_same_entry() {
        let mut registry = DeclRegistry::new();
        let mut cache = InstanceCache::new();
        let (f, a, c) = generic_function(&mut registry);

        let mut engine = ConstructionEngine::new(&mut registry, &mut cache);
        let first = engine
            .construct_function(
                f,
                &Substitution::new()
                    .with(a, primitives::BOOLEAN)
                    .with(c, primitives::STRING),
            )
            .unwrap();
        let second = engine
            .construct_function(
                f,
                &Substitution::new()
                    .with(c, primitives::STRING)
                    .with(a, primitives::BOOLEAN),
            )
            .unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(cache.instance_count(), 1);
    }

    #[test]
    fn residual_shares_root_cache() {
        let mut registry = DeclRegistry::new();
        let mut cache = InstanceCache::new();
        let (f, a, c) = generic_function(&mut registry);
        let mut engine = ConstructionEngine::new(&mut registry, &mut cache);

        let residual = engine
            .construct_function(f, &Substitution::new().with(a, primitives::BOOLEAN))
            .unwrap();
        assert!(residual.is_template);
        let sig = engine.registry().function(residual.id).unwrap().signature;
        assert_eq!(param_names(engine.registry(), sig), vec!["b", "c"]);

        let again = engine
            .construct_function(residual.id, &Substitution::new())
            .unwrap();
        assert_eq!(again.id, residual.id);

        let c2 = engine.registry().find_parameter(sig, "c").unwrap();
        let via_residual = engine
            .construct_function(residual.id, &Substitution::new().with(c2, primitives::STRING))
            .unwrap();
        let direct = engine
            .construct_function(
                f,
                &Substitution::new()
                    .with(a, primitives::BOOLEAN)
                    .with(c, primitives::STRING),
            )
            .unwrap();
        assert_eq!(via_residual.id, direct.id);
        assert!(direct.is_concrete());
    }

    #[test]
    fn fully_bound_signature_collapses() {
        let mut registry = DeclRegistry::new();
        let mut cache = InstanceCache::new();
        let f = registry.create_function("id");
        let sig = registry.function(f).unwrap().signature;
        let t = registry
            .add_positional_param(sig, ParamEntry::generic("T", primitives::TYPE))
            .unwrap();
        registry.set_return_type(f, t).unwrap();

        let constructed = ConstructionEngine::new(&mut registry, &mut cache)
            .instantiate(TemplateRef::Function(f), &[GenericArg::ty(primitives::BOOLEAN)])
            .unwrap();
        let TemplateRef::Function(id) = constructed.id else {
            panic!("Expected a function, got {:?}", constructed.id);
        };
        let entry = registry.function(id).unwrap();
        assert!(constructed.is_concrete());
        assert!(registry.signature(entry.signature).unwrap().is_empty());
        assert!(!registry.is_generic_signature(entry.signature));
        assert_eq!(entry.return_type, TypeRef::Type(primitives::BOOLEAN));
    }

    #[test]
    fn chained_parameters_are_substituted_in_order() {
        let mut registry = DeclRegistry::new();
        let mut cache = InstanceCache::new();
        let f = registry.create_function("g");
        let sig = registry.function(f).unwrap().signature;
        // Declared out of dependency order: `y: X` before `X: Type`.
        let x_id = ParamId::new(registry.param_count() as u32 + 1);
        registry
            .add_positional_param(sig, ParamEntry::generic("y", x_id))
            .unwrap();
        let x = registry
            .add_positional_param(sig, ParamEntry::generic("X", primitives::TYPE))
            .unwrap();
        assert_eq!(x, x_id);

        let constructed = ConstructionEngine::new(&mut registry, &mut cache)
            .construct_function(f, &Substitution::new())
            .unwrap();
        assert!(constructed.is_template);

        let new_sig = registry.function(constructed.id).unwrap().signature;
        assert_eq!(param_names(&registry, new_sig), vec!["y", "X"]);
        let params = registry.parameters(new_sig).unwrap();
        assert_eq!(registry.param(params[0]).unwrap().ty, TypeRef::Param(params[1]));
    }

    #[test]
    fn cycle_leaves_cache_and_registry_unchanged() {
        let mut registry = DeclRegistry::new();
        let mut cache = InstanceCache::new();
        let f = registry.create_function("h");
        let sig = registry.function(f).unwrap().signature;
        let y_id = ParamId::new(registry.param_count() as u32 + 1);
        let x = registry
            .add_positional_param(sig, ParamEntry::generic("X", y_id))
            .unwrap();
        registry
            .add_positional_param(sig, ParamEntry::generic("Y", x))
            .unwrap();
        let functions = registry.function_count();
        let params = registry.param_count();

        let err = ConstructionEngine::new(&mut registry, &mut cache)
            .construct_function(f, &Substitution::new())
            .unwrap_err();
        assert!(err.is_cyclic_dependency());
        assert_eq!(cache.instance_count(), 0);
        assert_eq!(registry.function_count(), functions);
        assert_eq!(registry.param_count(), params);
    }

    #[test]
    fn class_members_are_substituted() {
        let mut registry = DeclRegistry::new();
        let mut cache = InstanceCache::new();
        let (class, _) = generic_box(&mut registry);

        let constructed = ConstructionEngine::new(&mut registry, &mut cache)
            .instantiate(
                TemplateRef::Definition(class),
                &[GenericArg::ty(primitives::INT32)],
            )
            .unwrap();
        assert!(constructed.is_concrete());
        let TemplateRef::Definition(id) = constructed.id else {
            panic!("Expected a definition, got {:?}", constructed.id);
        };

        assert_eq!(registry.type_entry(id).unwrap().name, "Box<Int32>");
        let members = registry.members(id).unwrap().to_vec();
        assert_eq!(members.len(), 2);
        match members[0] {
            Member::Field(field) => {
                assert_eq!(registry.field(field).unwrap().ty, TypeRef::Type(primitives::INT32));
                assert_eq!(
                    registry.owner_of(EntityRef::Field(field)),
                    Some(Owner::Definition(id))
                );
            }
            other => panic!("Expected a field, got {:?}", other),
        }
        let group = registry.method_group(id, "get").unwrap();
        let get = registry.overloads(group).unwrap()[0];
        assert_eq!(
            registry.function(get).unwrap().return_type,
            TypeRef::Type(primitives::INT32)
        );
    }

    #[test]
    fn self_reference_resolves_to_entry_under_construction() {
        let mut registry = DeclRegistry::new();
        let mut cache = InstanceCache::new();
        let node = registry.create_class("Node");
        let t = registry.add_generic_param(node, "T", primitives::TYPE).unwrap();
        registry.declare_field(node, FieldEntry::new("value", t)).unwrap();
        let next = registry.nullable(node);
        registry.declare_field(node, FieldEntry::new("next", next)).unwrap();

        let mut engine = ConstructionEngine::new(&mut registry, &mut cache);
        for subst in [Substitution::new().with(t, primitives::STRING), Substitution::new()] {
            let constructed = engine.construct_definition(node, &subst).unwrap();
            let registry = engine.registry();
            let Member::Field(field) = registry.members(constructed.id).unwrap()[1] else {
                panic!("Expected a field");
            };
            let TypeRef::Type(nullable) = registry.field(field).unwrap().ty else {
                panic!("Expected a concrete field type");
            };
            assert_eq!(
                registry.type_entry(nullable).unwrap().kind,
                TypeKind::Nullable(TypeRef::Type(constructed.id))
            );
        }
    }

    #[test]
    fn generic_method_keeps_class_open() {
        let mut registry = DeclRegistry::new();
        let mut cache = InstanceCache::new();
        let (class, t) = generic_box(&mut registry);
        let map = registry
            .declare_method(class, "map", MemberBinding::Instance)
            .unwrap();
        let map_fn = registry.method(map).unwrap().function;
        let map_sig = registry.function(map_fn).unwrap().signature;
        let u = registry
            .add_positional_param(map_sig, ParamEntry::generic("U", primitives::TYPE))
            .unwrap();
        registry
            .add_positional_param(map_sig, ParamEntry::new("seed", t))
            .unwrap();
        registry.set_return_type(map_fn, u).unwrap();

        let constructed = ConstructionEngine::new(&mut registry, &mut cache)
            .construct_definition(class, &Substitution::new().with(t, primitives::INT32))
            .unwrap();
        assert!(constructed.is_template);

        let group = registry.method_group(constructed.id, "map").unwrap();
        let map = registry.overloads(group).unwrap()[0];
        let sig = registry.function(map).unwrap().signature;
        let seed = registry.find_parameter(sig, "seed").unwrap();
        assert_eq!(registry.param(seed).unwrap().ty, TypeRef::Type(primitives::INT32));
        assert!(registry.find_parameter(sig, "U").is_some());
    }

    #[test]
    fn property_accessors_follow_constructed_methods() {
        let mut registry = DeclRegistry::new();
        let mut cache = InstanceCache::new();
        let (class, t) = generic_box(&mut registry);
        let group = registry.method_group(class, "get").unwrap();
        let get_fn = registry.overloads(group).unwrap()[0];
        let Some(Owner::Method(get)) = registry.owner_of(EntityRef::Function(get_fn)) else {
            panic!("Expected a method");
        };
        let property = registry
            .add_property(PropertyEntry {
                getter: Some(get),
                ..PropertyEntry::new("current", t)
            })
            .unwrap();
        registry.add_member(class, Member::Property(property)).unwrap();

        let constructed = ConstructionEngine::new(&mut registry, &mut cache)
            .construct_definition(class, &Substitution::new().with(t, primitives::BOOLEAN))
            .unwrap();

        let members = registry.members(constructed.id).unwrap().to_vec();
        let Member::Method(new_get) = members[1] else {
            panic!("Expected a method");
        };
        let Member::Property(new_property) = members[2] else {
            panic!("Expected a property");
        };
        let entry = registry.property(new_property).unwrap();
        assert_eq!(entry.getter, Some(new_get));
        assert_eq!(entry.ty, TypeRef::Type(primitives::BOOLEAN));
    }

    #[test]
    fn open_base_is_constructed() {
        let mut registry = DeclRegistry::new();
        let mut cache = InstanceCache::new();
        let (base, bt) = generic_box(&mut registry);
        let derived = registry.create_class("Derived");
        let u = registry.add_generic_param(derived, "U", primitives::TYPE).unwrap();

        let mut engine = ConstructionEngine::new(&mut registry, &mut cache);
        let base_of_u = engine
            .construct_definition(base, &Substitution::new().with(bt, u))
            .unwrap();
        assert!(base_of_u.is_template);
        engine.registry.set_base(derived, Some(base_of_u.id)).unwrap();

        let constructed = engine
            .construct_definition(derived, &Substitution::new().with(u, primitives::INT32))
            .unwrap();
        let direct = engine
            .construct_definition(base, &Substitution::new().with(bt, primitives::INT32))
            .unwrap();
        assert!(constructed.is_concrete());
        let class = engine.registry().type_entry(constructed.id).unwrap();
        assert_eq!(class.as_class().unwrap().base, Some(direct.id));
    }

    #[test]
    fn arity_is_checked_at_entry() {
        let mut registry = DeclRegistry::new();
        let mut cache = InstanceCache::new();
        let (class, _) = generic_box(&mut registry);

        let err = ConstructionEngine::new(&mut registry, &mut cache)
            .instantiate(TemplateRef::Definition(class), &[])
            .unwrap_err();
        match err {
            ConstructionError::ArityMismatch {
                template,
                expected,
                got,
            } => {
                assert_eq!(template, "Box");
                assert_eq!(expected, 1);
                assert_eq!(got, 0);
            }
            e => panic!("Expected ArityMismatch, got {:?}", e),
        }
    }

    #[test]
    fn non_type_binding_is_rejected() {
        let mut registry = DeclRegistry::new();
        let mut cache = InstanceCache::new();
        let (class, _) = generic_box(&mut registry);

        let err = ConstructionEngine::new(&mut registry, &mut cache)
            .instantiate(
                TemplateRef::Definition(class),
                &[GenericArg::Value(Value::Int(4))],
            )
            .unwrap_err();
        assert!(matches!(err, ConstructionError::InvalidBinding { .. }));
        assert_eq!(cache.instance_count(), 0);
    }

    #[test]
    fn caching_can_be_disabled() {
        let mut registry = DeclRegistry::new();
        let mut cache = InstanceCache::new();
        let (class, t) = generic_box(&mut registry);
        let subst = Substitution::new().with(t, primitives::STRING);

        let mut engine = ConstructionEngine::new(&mut registry, &mut cache).with_options(
            ConstructOptions::new()
                .with_caching(false)
                .with_inference_conflicts(InferenceConflictPolicy::PreferExplicit),
        );
        let first = engine.construct_definition(class, &subst).unwrap();
        let second = engine.construct_definition(class, &subst).unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(cache.instance_count(), 0);
    }

    #[test]
    fn closed_template_is_returned_unchanged() {
        let mut registry = DeclRegistry::new();
        let mut cache = InstanceCache::new();
        let f = registry.create_function("plain");

        let constructed = ConstructionEngine::new(&mut registry, &mut cache)
            .construct(TemplateRef::Function(f), &Substitution::new())
            .unwrap();
        assert_eq!(constructed, Constructed::new(TemplateRef::Function(f), false));
    }

    #[test]
    fn standalone_field_construction() {
        let mut registry = DeclRegistry::new();
        let mut cache = InstanceCache::new();
        let t = registry.add_param(ParamEntry::generic("T", primitives::TYPE));
        let field = registry.add_field(FieldEntry::new("item", t));

        let mut engine = ConstructionEngine::new(&mut registry, &mut cache);
        let open = engine.construct_field(field, &Substitution::new()).unwrap();
        assert!(open.is_template);
        let closed = engine
            .construct_field(field, &Substitution::new().with(t, primitives::FLOAT64))
            .unwrap();
        assert!(closed.is_concrete());
        assert_eq!(
            engine.registry().field(closed.id).unwrap().ty,
            TypeRef::Type(primitives::FLOAT64)
        );
    }
}
