//! IR Types
//!
//! The closed type vocabulary of the input IR. Anything outside this set
//! is rejected by the coercion registry rather than silently passed
//! through.

use serde::{Deserialize, Serialize};

/// A static type attached to an IR value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Type {
    /// Signed 32-bit integer semantics.
    Int,
    /// Immutable string.
    Str,
    /// Boolean.
    Bool,
    /// Pointer to a value of the element type, represented at runtime as
    /// a single-element box.
    Pointer(Box<Type>),
    /// Ordered aggregate of element types (multi-value returns).
    Tuple(Vec<Type>),
}

impl Type {
    /// Pointee type, if this is a pointer.
    pub fn pointee(&self) -> Option<&Type> {
        match self {
            Type::Pointer(elem) => Some(elem),
            _ => None,
        }
    }

    /// Element types, if this is a tuple.
    pub fn tuple_elems(&self) -> Option<&[Type]> {
        match self {
            Type::Tuple(elems) => Some(elems),
            _ => None,
        }
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Str => write!(f, "str"),
            Type::Bool => write!(f, "bool"),
            Type::Pointer(elem) => write!(f, "*{}", elem),
            Type::Tuple(elems) => {
                write!(f, "(")?;
                for (i, elem) in elems.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", elem)?;
                }
                write!(f, ")")
            }
        }
    }
}
