//! IR Functions and Globals
//!
//! Functions carry an ordered parameter list and their basic blocks;
//! globals carry a name and type. Both are unit members.

use super::block::BasicBlock;
use super::instr::Instruction;
use super::ty::Type;
use serde::{Deserialize, Serialize};

/// A function parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub ty: Type,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A unit-level global variable, initialized to its type's default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Global {
    pub name: String,
    pub ty: Type,
}

impl Global {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// An IR function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    /// Declared function name.
    pub name: String,
    /// Ordered parameters.
    pub params: Vec<Param>,
    /// Basic blocks; block 0 is the entry.
    pub blocks: Vec<BasicBlock>,
}

impl Function {
    /// Create a function with no blocks yet.
    pub fn new(name: impl Into<String>, params: Vec<Param>) -> Self {
        Self {
            name: name.into(),
            params,
            blocks: Vec::new(),
        }
    }

    /// Append a block, returning its index.
    pub fn add_block(&mut self, block: BasicBlock) -> usize {
        let index = self.blocks.len();
        self.blocks.push(block);
        index
    }

    /// Number of blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Validate the structural invariants the linearizer relies on.
    pub fn validate(&self) -> Result<(), String> {
        if self.blocks.is_empty() {
            return Err("function has no blocks".to_string());
        }

        for (pos, block) in self.blocks.iter().enumerate() {
            if block.index != pos {
                return Err(format!(
                    "block at position {} carries index {}",
                    pos, block.index
                ));
            }

            for &succ in &block.successors {
                if succ >= self.blocks.len() {
                    return Err(format!(
                        "block {} references non-existent successor {}",
                        pos, succ
                    ));
                }
            }
            for &pred in &block.predecessors {
                if pred >= self.blocks.len() {
                    return Err(format!(
                        "block {} references non-existent predecessor {}",
                        pos, pred
                    ));
                }
            }

            for instr in &block.instructions {
                match instr {
                    Instruction::Branch { .. } if block.successors.len() != 2 => {
                        return Err(format!(
                            "block {} branches with {} successors (want 2)",
                            pos,
                            block.successors.len()
                        ));
                    }
                    Instruction::Jump if block.successors.len() != 1 => {
                        return Err(format!(
                            "block {} jumps with {} successors (want 1)",
                            pos,
                            block.successors.len()
                        ));
                    }
                    Instruction::Phi { edges } if edges.len() != block.predecessors.len() => {
                        return Err(format!(
                            "block {} phi has {} edges for {} predecessors",
                            pos,
                            edges.len(),
                            block.predecessors.len()
                        ));
                    }
                    _ => {}
                }
            }
        }

        Ok(())
    }
}
