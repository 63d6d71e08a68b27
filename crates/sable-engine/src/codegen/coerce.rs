//! Coercion Registry
//!
//! Per-type strategies enforcing source-type value semantics in the
//! dynamically-typed target: how to coerce an expression to the type's
//! runtime representation, and the type's default value. Types without
//! a strategy are a hard error, never a silent pass-through.

use crate::error::{CompileError, CompileResult};
use crate::ir::Type;

/// Strategy for one type.
pub trait Coerce {
    /// Wrap `expr` so its runtime value obeys this type's semantics.
    fn coerce(&self, expr: &str) -> String;

    /// Expression for this type's zero value.
    fn default_value(&self) -> String;
}

/// Signed 32-bit truncation via bitwise identity with zero.
struct IntCoerce;

impl Coerce for IntCoerce {
    fn coerce(&self, expr: &str) -> String {
        format!("{}|0", expr)
    }

    fn default_value(&self) -> String {
        "0".to_string()
    }
}

/// Stringification by concatenation with the empty string.
struct StrCoerce;

impl Coerce for StrCoerce {
    fn coerce(&self, expr: &str) -> String {
        format!("\"\"+{}", expr)
    }

    fn default_value(&self) -> String {
        "\"\"".to_string()
    }
}

/// Boolean normalization by double negation.
struct BoolCoerce;

impl Coerce for BoolCoerce {
    fn coerce(&self, expr: &str) -> String {
        format!("!!{}", expr)
    }

    fn default_value(&self) -> String {
        "false".to_string()
    }
}

/// Pointers are one-element boxes; the box itself is already the
/// correct representation, so coercion is identity.
struct PointerCoerce {
    elem_default: String,
}

impl Coerce for PointerCoerce {
    fn coerce(&self, expr: &str) -> String {
        expr.to_string()
    }

    fn default_value(&self) -> String {
        format!("[{}]", self.elem_default)
    }
}

/// Look up the strategy for a type.
pub fn coercer(ty: &Type) -> CompileResult<Box<dyn Coerce>> {
    match ty {
        Type::Int => Ok(Box::new(IntCoerce)),
        Type::Str => Ok(Box::new(StrCoerce)),
        Type::Bool => Ok(Box::new(BoolCoerce)),
        Type::Pointer(elem) => Ok(Box::new(PointerCoerce {
            elem_default: default_value(elem)?,
        })),
        Type::Tuple(_) => Err(CompileError::UnsupportedType {
            ty: ty.to_string(),
        }),
    }
}

/// Coerce `expr` to `ty`'s runtime representation.
pub fn coerce(ty: &Type, expr: &str) -> CompileResult<String> {
    Ok(coercer(ty)?.coerce(expr))
}

/// Default value expression for `ty`.
pub fn default_value(ty: &Type) -> CompileResult<String> {
    Ok(coercer(ty)?.default_value())
}
