//! Type assignability protocol.
//!
//! Assignability is a two-sided negotiation rather than a single subtyping
//! relation:
//!
//! ```text
//! assignable(source, target) := assignable_to(source, target)
//!                           && assignable_from(target, source)
//! ```
//!
//! The source side only vetoes (`Void` goes nowhere, `Any` only to `Any`,
//! open parameters only to themselves); the target side decides what it
//! accepts (nominal subtypes, `Null` into nullable types, implemented
//! typeclasses). Both sides short-circuit on identity, which keeps
//! self-comparisons of `Any` and open parameters from recursing.
//!
//! ## Components
//!
//! - [`assignable`] - the reciprocal check
//! - [`assignable_to`] / [`assignable_from`] - the two halves
//! - [`are_identical`] - strict identity, for exact overload lookup
//! - [`is_instance_of`] - value membership
//! - [`nominal`] - hierarchy walks over bases, interfaces and origins

pub mod nominal;

use genus_core::{Builtin, TypeKind, TypeRef, Value, primitives};
use genus_registry::DeclRegistry;

/// Check if a value of type `source` may be used where `target` is expected.
pub fn assignable(registry: &DeclRegistry, source: TypeRef, target: TypeRef) -> bool {
    assignable_to(registry, source, target) && assignable_from(registry, target, source)
}

/// Check if two type references denote the very same type.
#[inline]
pub fn are_identical(a: TypeRef, b: TypeRef) -> bool {
    a == b
}

/// Check if `value` is an instance of `ty`.
pub fn is_instance_of(registry: &DeclRegistry, value: &Value, ty: TypeRef) -> bool {
    assignable(registry, TypeRef::Type(value.runtime_type()), ty)
}

/// The source half: may `source` flow into `target` at all?
pub fn assignable_to(registry: &DeclRegistry, source: TypeRef, target: TypeRef) -> bool {
    if are_identical(source, target) {
        return true;
    }
    let (TypeRef::Type(source), TypeRef::Type(target)) = (source, target) else {
        return false;
    };
    match registry.get_type(source).map(|entry| &entry.kind) {
        Some(TypeKind::Builtin(Builtin::Void)) => false,
        Some(TypeKind::Builtin(Builtin::Any)) => target == primitives::ANY,
        Some(_) => true,
        None => false,
    }
}

/// The target half: does `target` accept values of type `source`?
pub fn assignable_from(registry: &DeclRegistry, target: TypeRef, source: TypeRef) -> bool {
    if are_identical(source, target) {
        return true;
    }
    let (TypeRef::Type(target), TypeRef::Type(source)) = (target, source) else {
        return false;
    };
    let Some(entry) = registry.get_type(target) else {
        return false;
    };
    match &entry.kind {
        TypeKind::Builtin(Builtin::Any) => source != primitives::VOID,
        TypeKind::Builtin(_) => false,
        TypeKind::Nullable(inner) => {
            source == primitives::NULL || assignable(registry, TypeRef::Type(source), *inner)
        }
        TypeKind::Class(_) | TypeKind::Interface(_) => {
            nominal::derives_from(registry, source, target)
        }
        TypeKind::Typeclass(_) => {
            nominal::has_implementation(registry, target, source)
                || nominal::derives_from(registry, source, target)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genus_core::{ParamEntry, ParamId};

    fn ty(id: genus_core::TypeId) -> TypeRef {
        TypeRef::Type(id)
    }

    #[test]
    fn identity_is_assignable() {
        let registry = DeclRegistry::new();
        assert!(assignable(&registry, ty(primitives::BOOLEAN), ty(primitives::BOOLEAN)));
        assert!(assignable(&registry, ty(primitives::ANY), ty(primitives::ANY)));
    }

    #[test]
    fn void_is_assignable_nowhere() {
        let registry = DeclRegistry::new();
        assert!(!assignable(&registry, ty(primitives::VOID), ty(primitives::ANY)));
        assert!(!assignable(&registry, ty(primitives::BOOLEAN), ty(primitives::VOID)));
    }

    #[test]
    fn any_is_top() {
        let registry = DeclRegistry::new();
        assert!(assignable(&registry, ty(primitives::INT32), ty(primitives::ANY)));
        assert!(assignable(&registry, ty(primitives::NULL), ty(primitives::ANY)));
        assert!(!assignable(&registry, ty(primitives::ANY), ty(primitives::INT32)));
    }

    #[test]
    fn distinct_builtins_are_not_assignable() {
        let registry = DeclRegistry::new();
        assert!(!assignable(&registry, ty(primitives::INT32), ty(primitives::FLOAT64)));
        assert!(!assignable(&registry, ty(primitives::NULL), ty(primitives::STRING)));
    }

    #[test]
    fn null_and_inner_flow_into_nullable() {
        let mut registry = DeclRegistry::new();
        let maybe_string = ty(registry.nullable(primitives::STRING));

        assert!(assignable(&registry, ty(primitives::NULL), maybe_string));
        assert!(assignable(&registry, ty(primitives::STRING), maybe_string));
        assert!(!assignable(&registry, ty(primitives::INT32), maybe_string));
        assert!(!assignable(&registry, maybe_string, ty(primitives::STRING)));
        assert!(assignable(&registry, maybe_string, ty(primitives::ANY)));
    }

    #[test]
    fn subclass_is_assignable_to_base() {
        let mut registry = DeclRegistry::new();
        let base = registry.create_class("Animal");
        let derived = registry.create_class("Dog");
        let iface = registry.create_interface("Pet");
        registry.set_base(derived, Some(base)).unwrap();
        registry.add_base(base, iface).unwrap();

        assert!(assignable(&registry, ty(derived), ty(base)));
        assert!(assignable(&registry, ty(derived), ty(iface)));
        assert!(assignable(&registry, ty(derived), ty(primitives::ANY)));
        assert!(!assignable(&registry, ty(base), ty(derived)));
        assert!(!assignable(&registry, ty(iface), ty(base)));
    }

    #[test]
    fn typeclass_accepts_implemented_types() {
        let mut registry = DeclRegistry::new();
        let show = registry.create_typeclass("Show");
        let show_bool = registry.create_class("ShowBool");
        registry
            .add_implementation(show, primitives::BOOLEAN, show_bool)
            .unwrap();

        assert!(assignable(&registry, ty(primitives::BOOLEAN), ty(show)));
        assert!(!assignable(&registry, ty(primitives::INT32), ty(show)));
    }

    #[test]
    fn typeclass_flows_only_to_its_bases() {
        let mut registry = DeclRegistry::new();
        let eq = registry.create_typeclass("Eq");
        let ord = registry.create_typeclass("Ord");
        let show = registry.create_typeclass("Show");
        let class = registry.create_class("Ordering");
        registry.add_base(ord, eq).unwrap();

        assert!(assignable(&registry, ty(ord), ty(eq)));
        assert!(assignable(&registry, ty(ord), ty(primitives::ANY)));
        assert!(!assignable(&registry, ty(eq), ty(ord)));
        assert!(!assignable(&registry, ty(ord), ty(show)));
        assert!(!assignable(&registry, ty(ord), ty(class)));
    }

    #[test]
    fn open_parameters_match_only_themselves() {
        let mut registry = DeclRegistry::new();
        let t = registry.add_param(ParamEntry::generic("T", primitives::TYPE));
        let u = registry.add_param(ParamEntry::generic("U", primitives::TYPE));

        assert!(assignable(&registry, TypeRef::Param(t), TypeRef::Param(t)));
        assert!(!assignable(&registry, TypeRef::Param(t), TypeRef::Param(u)));
        assert!(!assignable(&registry, TypeRef::Param(t), ty(primitives::ANY)));
        assert!(!assignable(&registry, ty(primitives::BOOLEAN), TypeRef::Param(t)));
    }

    #[test]
    fn values_are_instances_of_their_types() {
        let registry = DeclRegistry::new();
        assert!(is_instance_of(&registry, &Value::Bool(true), ty(primitives::BOOLEAN)));
        assert!(is_instance_of(&registry, &Value::Bool(true), ty(primitives::ANY)));
        assert!(is_instance_of(
            &registry,
            &Value::Type(primitives::INT32),
            ty(primitives::TYPE)
        ));
        assert!(!is_instance_of(&registry, &Value::Int(1), ty(primitives::TYPE)));
    }

    #[test]
    fn identical_is_strict() {
        assert!(are_identical(ty(primitives::ANY), ty(primitives::ANY)));
        assert!(!are_identical(ty(primitives::BOOLEAN), ty(primitives::ANY)));
        assert!(!are_identical(
            TypeRef::Param(ParamId::new(0)),
            TypeRef::Param(ParamId::new(1))
        ));
    }
}
