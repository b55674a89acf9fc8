//! Substitution bookkeeping for template families.
//!
//! Every constructed entry records its root template and the bindings of
//! the root's parameters (see `Origin`). Open parameters are recorded as
//! aliases of their counterparts in the constructed entry. That lets a
//! binding against any member of a family be translated back to the root
//! ([`lift_to_root`]), so the whole family shares one key space.

use genus_core::{
    ConstructionError, EntityRef, GenericArg, Owner, ParamId, Substitution, TemplateRef, TypeRef,
    Value,
};
use genus_registry::DeclRegistry;
use rustc_hash::{FxHashMap, FxHashSet};

use super::cache::ArgumentKey;
use super::dependency::resolve;

/// The function or definition owning `param`'s signature.
fn holder_of(registry: &DeclRegistry, param: ParamId) -> Option<TemplateRef> {
    let Some(Owner::Signature(sig)) = registry.owner_of(EntityRef::Param(param)) else {
        return None;
    };
    match registry.owner_of(EntityRef::Signature(sig))? {
        Owner::Function(f) => Some(TemplateRef::Function(f)),
        Owner::Definition(ty) => Some(TemplateRef::Definition(ty)),
        _ => None,
    }
}

/// Check if `candidate` is the counterpart of `root`'s parameter `param` in
/// some entry constructed from `root`.
pub(crate) fn is_counterpart(
    registry: &DeclRegistry,
    root: TemplateRef,
    param: ParamId,
    candidate: ParamId,
) -> bool {
    let Some(holder) = holder_of(registry, candidate) else {
        return false;
    };
    registry
        .origin(holder)
        .ok()
        .flatten()
        .is_some_and(|origin| {
            origin.template == root
                && origin.arguments.get(param) == Some(&GenericArg::Param(candidate))
        })
}

/// Translate `subst`, a binding for `template`, into a binding for the root
/// of its family.
///
/// Bindings of parameters outside the template's signature are carried over
/// unchanged. A root template is returned as is.
pub fn lift_to_root(
    registry: &DeclRegistry,
    template: TemplateRef,
    subst: &Substitution,
) -> Result<(TemplateRef, Substitution), ConstructionError> {
    let mut current = template;
    let mut subst = subst.clone();

    while let Some(origin) = registry.origin(current)? {
        let sig = registry.template_signature(current)?;
        let own: FxHashSet<ParamId> = registry.parameters(sig)?.into_iter().collect();
        let root_of: FxHashMap<ParamId, ParamId> = origin
            .arguments
            .iter()
            .filter_map(|(root_param, arg)| {
                arg.as_param()
                    .filter(|counterpart| own.contains(counterpart))
                    .map(|counterpart| (counterpart, root_param))
            })
            .collect();

        let mut lifted: Substitution = subst
            .iter()
            .filter(|(param, _)| !own.contains(param))
            .map(|(param, arg)| (param, arg.clone()))
            .collect();

        for (root_param, arg) in origin.arguments.iter() {
            let terminal = match arg {
                GenericArg::Value(value) => {
                    lifted.bind(root_param, value.clone());
                    continue;
                }
                GenericArg::Param(param) => match resolve(registry, &subst, *param)? {
                    Some(GenericArg::Value(value)) => {
                        lifted.bind(root_param, value);
                        continue;
                    }
                    Some(GenericArg::Param(terminal)) => terminal,
                    None => *param,
                },
            };
            match root_of.get(&terminal) {
                Some(own) if *own == root_param => {}
                Some(own) => lifted.bind(root_param, *own),
                None => lifted.bind(root_param, terminal),
            }
        }

        tracing::trace!(from = %current, to = %origin.template, "lifted binding");
        current = origin.template;
        subst = lifted;
    }
    Ok((current, subst))
}

/// Unbind every root parameter bound to its own counterpart in a family
/// member: `T` bound to `T'` means the same as `T` left open.
pub(crate) fn normalize_counterparts(
    registry: &DeclRegistry,
    root: TemplateRef,
    params: &[ParamId],
    subst: &mut Substitution,
) -> Result<(), ConstructionError> {
    for &param in params {
        if let Some(GenericArg::Param(candidate)) = resolve(registry, subst, param)? {
            if is_counterpart(registry, root, param, candidate) {
                subst.unbind(param);
            }
        }
    }
    Ok(())
}

/// The canonical key of binding `params` with `subst`: one slot per
/// parameter in declaration order, independent of insertion order.
pub(crate) fn canonical_key(
    registry: &DeclRegistry,
    params: &[ParamId],
    subst: &Substitution,
) -> Result<ArgumentKey, ConstructionError> {
    let mut slots = Vec::with_capacity(params.len());
    for &param in params {
        slots.push(resolve(registry, subst, param)?);
    }
    Ok(ArgumentKey::new(slots))
}

/// Format the name of a constructed entry, e.g. `Pair<Int32, B>`.
pub fn format_instance_name(
    registry: &DeclRegistry,
    name: &str,
    params: &[ParamId],
    key: &ArgumentKey,
) -> String {
    if params.is_empty() {
        return name.to_string();
    }
    let args: Vec<String> = params
        .iter()
        .zip(key.slots())
        .map(|(param, slot)| match slot {
            Some(GenericArg::Value(Value::Type(ty))) => registry.type_name(TypeRef::Type(*ty)),
            Some(GenericArg::Value(value)) => value.to_string(),
            Some(GenericArg::Param(other)) => registry.type_name(TypeRef::Param(*other)),
            None => registry.type_name(TypeRef::Param(*param)),
        })
        .collect();
    format!("{}<{}>", name, args.join(", "))
}
