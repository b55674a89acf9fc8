//! Runtime values and type references.
//!
//! A [`Value`] is anything that can be bound to a parameter. Types are values
//! too (`Value::Type`), which is how a generic parameter of type `Type` gets
//! bound to a concrete type. A [`TypeRef`] is the declared type of a
//! parameter, field or property: either a concrete type or another parameter
//! acting as a type variable.

use std::fmt;

use ordered_float::OrderedFloat;

use crate::primitives;
use crate::{ParamId, TypeId};

/// A bindable value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// Absence of a value. Its runtime type is `Any`.
    Undefined,
    Unit,
    Null,
    Bool(bool),
    Int(i32),
    Float(OrderedFloat<f64>),
    Str(String),
    /// A type used as a value.
    Type(TypeId),
}

impl Value {
    /// Create a float value.
    pub fn float(value: f64) -> Self {
        Value::Float(OrderedFloat(value))
    }

    /// Create a string value.
    pub fn string(value: impl Into<String>) -> Self {
        Value::Str(value.into())
    }

    /// The runtime type of this value.
    pub fn runtime_type(&self) -> TypeId {
        match self {
            Value::Undefined => primitives::ANY,
            Value::Unit => primitives::UNIT,
            Value::Null => primitives::NULL,
            Value::Bool(_) => primitives::BOOLEAN,
            Value::Int(_) => primitives::INT32,
            Value::Float(_) => primitives::FLOAT64,
            Value::Str(_) => primitives::STRING,
            Value::Type(_) => primitives::TYPE,
        }
    }

    /// If this value is a type, return it.
    pub fn as_type(&self) -> Option<TypeId> {
        match self {
            Value::Type(ty) => Some(*ty),
            _ => None,
        }
    }

    /// Check if this value is a type.
    pub fn is_type(&self) -> bool {
        matches!(self, Value::Type(_))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Unit => write!(f, "()"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::Type(ty) => write!(f, "{}", ty),
        }
    }
}

/// The declared type of a parameter, field, property or return slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// A type entry.
    Type(TypeId),
    /// A type variable: the type is whatever this parameter gets bound to.
    Param(ParamId),
}

impl TypeRef {
    /// Check if this reference is a type variable.
    pub fn is_param(&self) -> bool {
        matches!(self, TypeRef::Param(_))
    }

    /// The referenced type, if concrete.
    pub fn as_type(&self) -> Option<TypeId> {
        match self {
            TypeRef::Type(ty) => Some(*ty),
            TypeRef::Param(_) => None,
        }
    }

    /// The referenced parameter, if a type variable.
    pub fn as_param(&self) -> Option<ParamId> {
        match self {
            TypeRef::Param(param) => Some(*param),
            TypeRef::Type(_) => None,
        }
    }
}

impl From<TypeId> for TypeRef {
    fn from(ty: TypeId) -> Self {
        TypeRef::Type(ty)
    }
}

impl From<ParamId> for TypeRef {
    fn from(param: ParamId) -> Self {
        TypeRef::Param(param)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Type(ty) => write!(f, "{}", ty),
            TypeRef::Param(param) => write!(f, "{}", param),
        }
    }
}
