//! Builtin types and their fixed ids.
//!
//! The registry pre-registers one type entry per [`Builtin`] variant, in
//! discriminant order, so the first `TypeId`s always name the builtins.

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::TypeId;

/// The builtin types known to every registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u32)]
pub enum Builtin {
    /// The meta-type: every type is a value of type `Type`.
    Type = 0,
    /// The empty type. Nothing is assignable to or from it.
    Void = 1,
    /// The single-valued type.
    Unit = 2,
    Boolean = 3,
    Int32 = 4,
    Float64 = 5,
    String = 6,
    /// The top type.
    Any = 7,
    /// The type of the `null` value.
    Null = 8,
}

impl Builtin {
    /// All builtins in registration order.
    pub const ALL: [Builtin; 9] = [
        Builtin::Type,
        Builtin::Void,
        Builtin::Unit,
        Builtin::Boolean,
        Builtin::Int32,
        Builtin::Float64,
        Builtin::String,
        Builtin::Any,
        Builtin::Null,
    ];

    /// The fixed type id of this builtin.
    pub fn type_id(self) -> TypeId {
        TypeId::new(self.into())
    }

    /// The builtin occupying `id`, if any.
    pub fn from_type_id(id: TypeId) -> Option<Self> {
        Builtin::try_from(id.index()).ok()
    }

    /// The source-level name of this builtin.
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Type => "Type",
            Builtin::Void => "Void",
            Builtin::Unit => "Unit",
            Builtin::Boolean => "Boolean",
            Builtin::Int32 => "Int32",
            Builtin::Float64 => "Float64",
            Builtin::String => "String",
            Builtin::Any => "Any",
            Builtin::Null => "Null",
        }
    }
}

/// Fixed ids of the builtin types.
pub mod primitives {
    use crate::TypeId;

    pub const TYPE: TypeId = TypeId::new(0);
    pub const VOID: TypeId = TypeId::new(1);
    pub const UNIT: TypeId = TypeId::new(2);
    pub const BOOLEAN: TypeId = TypeId::new(3);
    pub const INT32: TypeId = TypeId::new(4);
    pub const FLOAT64: TypeId = TypeId::new(5);
    pub const STRING: TypeId = TypeId::new(6);
    pub const ANY: TypeId = TypeId::new(7);
    pub const NULL: TypeId = TypeId::new(8);
}
