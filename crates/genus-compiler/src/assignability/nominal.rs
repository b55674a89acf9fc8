//! Nominal hierarchy walks.

use genus_core::{TemplateRef, TypeId, TypeKind};
use genus_registry::DeclRegistry;
use rustc_hash::FxHashSet;

/// Every definition `source` is nominally a subtype of, excluding itself.
///
/// Follows base classes, interfaces, base interfaces, base typeclasses and
/// the origin template of constructed definitions. Cycles are cut by the
/// visited set.
pub fn ancestors(registry: &DeclRegistry, source: TypeId) -> FxHashSet<TypeId> {
    let mut visited = FxHashSet::default();
    let mut stack = vec![source];

    while let Some(current) = stack.pop() {
        let Some(entry) = registry.get_type(current) else {
            continue;
        };
        let mut push = |ty: TypeId| {
            if ty != source && visited.insert(ty) {
                stack.push(ty);
            }
        };

        match &entry.kind {
            TypeKind::Class(def) => {
                def.base.into_iter().for_each(&mut push);
                def.interfaces.iter().copied().for_each(&mut push);
            }
            TypeKind::Interface(def) => def.bases.iter().copied().for_each(&mut push),
            TypeKind::Typeclass(def) => def.bases.iter().copied().for_each(&mut push),
            TypeKind::Builtin(_) | TypeKind::Nullable(_) => {}
        }
        let origin = entry.body().and_then(|body| body.origin.as_ref());
        if let Some(TemplateRef::Definition(template)) = origin.map(|origin| origin.template) {
            push(template);
        }
    }
    visited
}

/// Check if `source` reaches `target` through the nominal hierarchy.
pub fn derives_from(registry: &DeclRegistry, source: TypeId, target: TypeId) -> bool {
    ancestors(registry, source).contains(&target)
}

/// Check if `typeclass` has an implementation for `ty` or for one of its
/// ancestors.
pub fn has_implementation(registry: &DeclRegistry, typeclass: TypeId, ty: TypeId) -> bool {
    let Some(def) = registry.get_type(typeclass).and_then(|entry| entry.as_typeclass()) else {
        return false;
    };
    if def.implementations.contains_key(&ty) {
        return true;
    }
    // A constructed type counts if its template is implemented.
    ancestors(registry, ty)
        .iter()
        .any(|ancestor| def.implementations.contains_key(ancestor))
}
