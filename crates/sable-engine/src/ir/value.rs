//! IR Values
//!
//! Read-only descriptions of SSA values: constants, parameters, globals,
//! previously defined locals, and function/builtin references. The
//! frontend builds these once; the backend never mutates them.

use super::ty::Type;
use serde::{Deserialize, Serialize};

/// Compilation unit identifier (index into `Program::units`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitId(pub u32);

impl UnitId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "u{}", self.0)
    }
}

/// The closed builtin set recognized by instruction lowering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Builtin {
    /// Print arguments to standard output.
    Println,
}

impl Builtin {
    /// Declared name of the builtin in the source IR.
    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Println => "println",
        }
    }
}

/// An SSA value reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    /// Constant literal, carried as its textual form and emitted
    /// verbatim (never coerced).
    Const(String),
    /// Function parameter, by declared name.
    Param(String),
    /// Unit-level global, by declared name.
    Global(String),
    /// Previously defined local, by virtual-register name.
    Local(String),
    /// Reference to a function member of a unit.
    Func {
        /// Unit the function belongs to.
        unit: UnitId,
        /// Declared function name within the unit.
        name: String,
    },
    /// Reference to a builtin.
    Builtin(Builtin),
}

/// A value paired with its static type, as instruction operands carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedValue {
    pub value: Value,
    pub ty: Type,
}

impl TypedValue {
    pub fn new(value: Value, ty: Type) -> Self {
        Self { value, ty }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_id_display() {
        assert_eq!(format!("{}", UnitId::new(3)), "u3");
    }

    #[test]
    fn test_builtin_name() {
        assert_eq!(Builtin::Println.name(), "println");
    }
}
