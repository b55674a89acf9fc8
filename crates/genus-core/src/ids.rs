//! Typed identifiers for declaration entries.
//!
//! Every entry in the declaration registry is addressed by a small copyable
//! index newtype. Ids are handed out by the registry in allocation order and
//! are never reused, so an id stays valid for the lifetime of its registry.
//!
//! ## Components
//!
//! - [`ParamId`] - a parameter (plain or generic)
//! - [`SignatureId`] - an ordered/named/variadic parameter list
//! - [`FunctionId`] - a free function, or the function half of a method
//! - [`MethodId`], [`FieldId`], [`PropertyId`] - definition members
//! - [`TypeId`] - builtin types, nullable types and definitions
//! - [`GroupId`] - an overload group
//! - [`ScopeId`] - a node in the scope tree

use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            /// Create an id from a raw index.
            #[inline]
            pub const fn new(index: u32) -> Self {
                Self(index)
            }

            /// Get the underlying index.
            #[inline]
            pub const fn index(self) -> u32 {
                self.0
            }

            /// Get the underlying index as a `usize`, for arena access.
            #[inline]
            pub const fn slot(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "_{}"), self.0)
            }
        }

        impl From<u32> for $name {
            fn from(index: u32) -> Self {
                Self::new(index)
            }
        }

        impl From<$name> for u32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(
    /// Identifies a parameter entry.
    ParamId,
    "param"
);
define_id!(
    /// Identifies a signature entry.
    SignatureId,
    "sig"
);
define_id!(
    /// Identifies a function entry.
    FunctionId,
    "fn"
);
define_id!(
    /// Identifies a method entry.
    MethodId,
    "method"
);
define_id!(
    /// Identifies a field entry.
    FieldId,
    "field"
);
define_id!(
    /// Identifies a property entry.
    PropertyId,
    "prop"
);
define_id!(
    /// Identifies a type entry.
    ///
    /// Builtin types occupy the first ids; see [`crate::primitives`].
    TypeId,
    "type"
);
define_id!(
    /// Identifies an overload group.
    GroupId,
    "group"
);
define_id!(
    /// Identifies a scope in the scope tree.
    ScopeId,
    "scope"
);
