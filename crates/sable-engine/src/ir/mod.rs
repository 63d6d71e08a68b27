//! Intermediate Representation (IR)
//!
//! The frontend-supplied SSA form the backend consumes. Plain owned
//! data, serde-serializable, immutable from the backend's point of view.
//!
//! # Structure
//!
//! - `Program` - ordered list of compilation units
//! - `Unit` - declared name plus ordered function/global members
//! - `Function` - parameters and basic blocks
//! - `BasicBlock` - instructions plus successor/predecessor indices
//! - `Instruction` - the closed SSA instruction set
//! - `Value` / `TypedValue` - operand references with static types

pub mod block;
pub mod function;
pub mod instr;
pub mod module;
pub mod ty;
pub mod value;

pub use block::BasicBlock;
pub use function::{Function, Global, Param};
pub use instr::{BinOp, Callee, Instruction, UnaryOp};
pub use module::{Member, Program, Unit, ENTRY_UNIT};
pub use ty::Type;
pub use value::{Builtin, TypedValue, UnitId, Value};
