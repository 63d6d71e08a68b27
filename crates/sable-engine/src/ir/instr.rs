//! IR Instructions
//!
//! The closed instruction vocabulary. Each instruction defines at most
//! one output value; lowering allocates the virtual register for it.

use super::ty::Type;
use super::value::{Builtin, TypedValue, UnitId, Value};
use serde::{Deserialize, Serialize};

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl BinOp {
    /// Arithmetic operators coerce their result; comparisons do not.
    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Rem
        )
    }

    /// Target-language operator token.
    pub fn token(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Rem => "%",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
        }
    }
}

impl std::fmt::Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    /// Pointer dereference (`*x`): reads slot 0 of the box.
    Deref,
    /// Logical negation (`!x`).
    Not,
}

/// Call target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Callee {
    /// One of the fixed builtins.
    Builtin(Builtin),
    /// A user function member of a unit.
    Func {
        /// Unit the function belongs to.
        unit: UnitId,
        /// Declared function name within the unit.
        name: String,
    },
}

/// An SSA instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    /// Call a builtin or user function.
    Call {
        callee: Callee,
        args: Vec<TypedValue>,
    },

    /// Unary operation; defines a register.
    UnaryOp {
        op: UnaryOp,
        operand: TypedValue,
    },

    /// Binary operation; defines a register typed `ty`.
    BinaryOp {
        op: BinOp,
        /// Result type (consulted for arithmetic coercion).
        ty: Type,
        lhs: TypedValue,
        rhs: TypedValue,
    },

    /// Return zero or more values through the tuple scratch array.
    Return(Vec<TypedValue>),

    /// Store a value through a pointer box (`addr[0] = value`).
    Store {
        addr: TypedValue,
        value: TypedValue,
    },

    /// Read a positional field out of a tuple value; defines a register.
    Extract {
        tuple: TypedValue,
        index: usize,
    },

    /// Conditional branch; successor order is [true-target, false-target].
    Branch {
        cond: Value,
    },

    /// Unconditional branch to the block's single successor.
    Jump,

    /// Value merge: one incoming value per predecessor, in predecessor
    /// order. Defines a register.
    Phi {
        edges: Vec<TypedValue>,
    },
}

impl Instruction {
    /// Whether this instruction unconditionally leaves the current block
    /// (no synthesized fallthrough is needed after it).
    pub fn transfers_control(&self) -> bool {
        matches!(
            self,
            Instruction::Return(_) | Instruction::Branch { .. } | Instruction::Jump
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binop_classes() {
        assert!(BinOp::Add.is_arithmetic());
        assert!(BinOp::Rem.is_arithmetic());
        assert!(!BinOp::Eq.is_arithmetic());
        assert!(!BinOp::Ge.is_arithmetic());
    }

    #[test]
    fn test_binop_tokens() {
        assert_eq!(BinOp::Mul.token(), "*");
        assert_eq!(format!("{}", BinOp::Ne), "!=");
    }

    #[test]
    fn test_transfers_control() {
        assert!(Instruction::Jump.transfers_control());
        assert!(Instruction::Return(vec![]).transfers_control());
        assert!(!Instruction::Call {
            callee: Callee::Builtin(Builtin::Println),
            args: vec![],
        }
        .transfers_control());
    }
}
