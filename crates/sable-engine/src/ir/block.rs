//! Basic Blocks
//!
//! A block is an ordered instruction list plus its position in the
//! function's control-flow graph. Successor order is significant: a
//! conditional branch lists [true-target, false-target].

use super::instr::Instruction;
use serde::{Deserialize, Serialize};

/// A basic block inside a function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicBlock {
    /// Position of this block in the owning function's block list.
    pub index: usize,
    /// Instructions, in execution order.
    pub instructions: Vec<Instruction>,
    /// Successor block indices.
    pub successors: Vec<usize>,
    /// Predecessor block indices.
    pub predecessors: Vec<usize>,
}

impl BasicBlock {
    /// Create an empty block at the given position.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            instructions: Vec::new(),
            successors: Vec::new(),
            predecessors: Vec::new(),
        }
    }

    /// Append an instruction.
    pub fn push(&mut self, instr: Instruction) {
        self.instructions.push(instr);
    }

    /// Last instruction, if any.
    pub fn last_instruction(&self) -> Option<&Instruction> {
        self.instructions.last()
    }

    /// Whether execution can run off the end of this block, requiring a
    /// synthesized fallthrough transition in dispatch mode.
    pub fn falls_through(&self) -> bool {
        !self
            .last_instruction()
            .is_some_and(|instr| instr.transfers_control())
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Whether the block holds no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}
