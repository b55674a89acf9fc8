//! Genus
//!
//! The declaration and type core of a language front-end: an ownership-checked
//! declaration graph, reciprocal assignability, memoized template
//! construction and overload resolution.
//!
//! ## Crates
//!
//! - [`genus_core`]: ids, values, entries, substitutions and errors
//! - [`genus_registry`]: the declaration arena and its scope tree
//! - [`genus_compiler`]: assignability, construction and overload resolution
//!
//! [`Context`] bundles a registry with an instance cache and construction
//! options for callers that do not need to manage them separately.

pub use genus_compiler;
pub use genus_core;
pub use genus_registry;

use genus_compiler::{
    Argument, CallPlan, ConstructOptions, Constructed, ConstructionEngine, ConstructionError,
    InstanceCache, MatchFlags,
};
use genus_core::{FunctionId, GenericArg, GroupId, Substitution, TemplateRef, TypeId, TypeRef, Value};
use genus_registry::DeclRegistry;

pub mod prelude {
    pub use genus_compiler::{
        Argument, CallPlan, ConstructOptions, Constructed, ConstructionEngine,
        InferenceConflictPolicy, InstanceCache, MatchFlags, are_identical, assignable,
        get_match, is_instance_of, match_call,
    };
    pub use genus_core::{
        Access, Callee, ConstructionError, EntityRef, FieldEntry, FunctionBody, FunctionId,
        GenericArg, GenusError, GroupId, Instruction, Member, MemberBinding, MemberKind,
        MethodEntry, Origin, Owner, ParamEntry, ParamId, PropertyEntry, RegistrationError,
        ScopeId, SignatureId, Substitution, TemplateRef, TypeId, TypeKind, TypeRef, Value, primitives,
    };
    pub use genus_registry::{DeclRegistry, Symbol};

    pub use crate::Context;
}

/// A registry together with its construction cache.
#[derive(Default)]
pub struct Context {
    registry: DeclRegistry,
    cache: InstanceCache,
    options: ConstructOptions,
}

impl Context {
    /// Create a context with the builtin types registered.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, options: ConstructOptions) -> Self {
        self.options = options;
        self
    }

    pub fn registry(&self) -> &DeclRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut DeclRegistry {
        &mut self.registry
    }

    pub fn cache(&self) -> &InstanceCache {
        &self.cache
    }

    pub fn options(&self) -> &ConstructOptions {
        &self.options
    }

    /// Drop every memoized instance. Constructed entries stay in the registry.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// A construction engine over this context's registry and cache.
    pub fn engine(&mut self) -> ConstructionEngine<'_> {
        ConstructionEngine::new(&mut self.registry, &mut self.cache).with_options(self.options)
    }

    // ==========================================================================
    // Construction
    // ==========================================================================

    pub fn construct(
        &mut self,
        template: TemplateRef,
        subst: &Substitution,
    ) -> Result<Constructed<TemplateRef>, ConstructionError> {
        self.engine().construct(template, subst)
    }

    pub fn construct_function(
        &mut self,
        f: FunctionId,
        subst: &Substitution,
    ) -> Result<Constructed<FunctionId>, ConstructionError> {
        self.engine().construct_function(f, subst)
    }

    pub fn construct_definition(
        &mut self,
        ty: TypeId,
        subst: &Substitution,
    ) -> Result<Constructed<TypeId>, ConstructionError> {
        self.engine().construct_definition(ty, subst)
    }

    /// Bind the template's positional parameters in order.
    pub fn instantiate(
        &mut self,
        template: TemplateRef,
        args: &[GenericArg],
    ) -> Result<Constructed<TemplateRef>, ConstructionError> {
        self.engine().instantiate(template, args)
    }

    // ==========================================================================
    // Type relations and overloads
    // ==========================================================================

    pub fn assignable(&self, source: impl Into<TypeRef>, target: impl Into<TypeRef>) -> bool {
        genus_compiler::assignable(&self.registry, source.into(), target.into())
    }

    pub fn is_instance_of(&self, value: &Value, ty: impl Into<TypeRef>) -> bool {
        genus_compiler::is_instance_of(&self.registry, value, ty.into())
    }

    pub fn get_match(
        &self,
        group: GroupId,
        positional: &[TypeRef],
        named: &[(&str, TypeRef)],
        flags: MatchFlags,
    ) -> Vec<FunctionId> {
        genus_compiler::get_match(&self.registry, group, positional, named, flags)
    }

    pub fn match_call(
        &self,
        group: GroupId,
        args: &[Argument],
        kwargs: &[(&str, Argument)],
        flags: MatchFlags,
    ) -> Vec<CallPlan> {
        genus_compiler::match_call(&self.registry, group, args, kwargs, flags)
    }
}
