//! Substitution maps and template origins.
//!
//! A [`Substitution`] binds declared parameters to [`GenericArg`]s: a value
//! (usually a type) or another parameter. Bindings to parameters form chains
//! that are followed by [`Substitution::resolve`]; a chain that loops back on
//! itself is reported as a [`BindingCycle`].

use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::{FunctionId, ParamId, TypeId, Value};

/// The argument bound to a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GenericArg {
    /// A concrete value, including types.
    Value(Value),
    /// Another (still open) parameter.
    Param(ParamId),
}

impl GenericArg {
    /// Bind to a type.
    pub fn ty(ty: TypeId) -> Self {
        GenericArg::Value(Value::Type(ty))
    }

    /// The bound type, if this argument is a type value.
    pub fn as_type(&self) -> Option<TypeId> {
        match self {
            GenericArg::Value(value) => value.as_type(),
            GenericArg::Param(_) => None,
        }
    }

    /// The bound parameter, if this argument is a parameter.
    pub fn as_param(&self) -> Option<ParamId> {
        match self {
            GenericArg::Param(param) => Some(*param),
            GenericArg::Value(_) => None,
        }
    }
}

impl From<Value> for GenericArg {
    fn from(value: Value) -> Self {
        GenericArg::Value(value)
    }
}

impl From<TypeId> for GenericArg {
    fn from(ty: TypeId) -> Self {
        GenericArg::ty(ty)
    }
}

impl From<ParamId> for GenericArg {
    fn from(param: ParamId) -> Self {
        GenericArg::Param(param)
    }
}

impl fmt::Display for GenericArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenericArg::Value(value) => write!(f, "{}", value),
            GenericArg::Param(param) => write!(f, "{}", param),
        }
    }
}

/// A parameter binding chain that refers back to one of its own links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingCycle {
    /// The parameter the lookup started from.
    pub param: ParamId,
}

/// A mapping from declared parameters to bound arguments.
///
/// Insertion order is irrelevant: construction keys are always derived from
/// the declaration's parameter order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitution {
    bindings: FxHashMap<ParamId, GenericArg>,
}

impl Substitution {
    /// Create an empty substitution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: bind `param` to `arg`.
    pub fn with(mut self, param: ParamId, arg: impl Into<GenericArg>) -> Self {
        self.bind(param, arg);
        self
    }

    /// Bind `param` to `arg`, replacing any previous binding.
    pub fn bind(&mut self, param: ParamId, arg: impl Into<GenericArg>) {
        self.bindings.insert(param, arg.into());
    }

    /// Remove the binding for `param`.
    pub fn unbind(&mut self, param: ParamId) -> Option<GenericArg> {
        self.bindings.remove(&param)
    }

    /// The direct binding of `param`, without following chains.
    pub fn get(&self, param: ParamId) -> Option<&GenericArg> {
        self.bindings.get(&param)
    }

    /// Check if `param` has a direct binding.
    pub fn contains(&self, param: ParamId) -> bool {
        self.bindings.contains_key(&param)
    }

    /// Iterate over all bindings in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (ParamId, &GenericArg)> {
        self.bindings.iter().map(|(param, arg)| (*param, arg))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Follow the binding chain starting at `param`.
    ///
    /// Returns `None` if `param` is unbound, a value if the chain ends in
    /// one, or the last parameter of the chain if it ends in an unbound
    /// parameter.
    pub fn resolve(&self, param: ParamId) -> Result<Option<GenericArg>, BindingCycle> {
        let mut visited = FxHashSet::default();
        visited.insert(param);

        let mut current = match self.bindings.get(&param) {
            None => return Ok(None),
            Some(arg) => arg,
        };

        loop {
            match current {
                GenericArg::Value(_) => return Ok(Some(current.clone())),
                GenericArg::Param(next) => {
                    if !visited.insert(*next) {
                        return Err(BindingCycle { param });
                    }
                    match self.bindings.get(next) {
                        Some(arg) => current = arg,
                        None => return Ok(Some(GenericArg::Param(*next))),
                    }
                }
            }
        }
    }
}

impl FromIterator<(ParamId, GenericArg)> for Substitution {
    fn from_iter<I: IntoIterator<Item = (ParamId, GenericArg)>>(iter: I) -> Self {
        Self {
            bindings: iter.into_iter().collect(),
        }
    }
}

impl Extend<(ParamId, GenericArg)> for Substitution {
    fn extend<I: IntoIterator<Item = (ParamId, GenericArg)>>(&mut self, iter: I) {
        self.bindings.extend(iter);
    }
}

/// A template that specializations are derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateRef {
    Function(FunctionId),
    /// A class, interface or typeclass.
    Definition(TypeId),
}

impl fmt::Display for TemplateRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateRef::Function(id) => write!(f, "{}", id),
            TemplateRef::Definition(id) => write!(f, "{}", id),
        }
    }
}

/// Where a constructed entry came from.
///
/// `arguments` is keyed by the template's own parameters: bound parameters
/// map to their argument, open ones to the counterpart parameter created in
/// the constructed entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    pub template: TemplateRef,
    pub arguments: Substitution,
}

impl Origin {
    pub fn new(template: TemplateRef, arguments: Substitution) -> Self {
        Self {
            template,
            arguments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives;

    fn p(index: u32) -> ParamId {
        ParamId::new(index)
    }

    #[test]
    fn resolve_unbound() {
        let subst = Substitution::new();
        assert_eq!(subst.resolve(p(0)), Ok(None));
    }

    #[test]
    fn resolve_follows_chain_to_value() {
        let subst = Substitution::new()
            .with(p(0), p(1))
            .with(p(1), p(2))
            .with(p(2), primitives::BOOLEAN);

        assert_eq!(
            subst.resolve(p(0)),
            Ok(Some(GenericArg::ty(primitives::BOOLEAN)))
        );
    }

    #[test]
    fn resolve_stops_at_unbound_param() {
        let subst = Substitution::new().with(p(0), p(1));
        assert_eq!(subst.resolve(p(0)), Ok(Some(GenericArg::Param(p(1)))));
    }

    #[test]
    fn resolve_detects_self_binding() {
        let subst = Substitution::new().with(p(0), p(0));
        assert_eq!(subst.resolve(p(0)), Err(BindingCycle { param: p(0) }));
    }

    #[test]
    fn resolve_detects_longer_loop() {
        let subst = Substitution::new()
            .with(p(0), p(1))
            .with(p(1), p(2))
            .with(p(2), p(1));
        assert!(subst.resolve(p(0)).is_err());
    }

    #[test]
    fn insertion_order_is_irrelevant() {
        let a = Substitution::new()
            .with(p(0), primitives::BOOLEAN)
            .with(p(1), primitives::STRING);
        let b = Substitution::new()
            .with(p(1), primitives::STRING)
            .with(p(0), primitives::BOOLEAN);
        assert_eq!(a, b);
    }
}
