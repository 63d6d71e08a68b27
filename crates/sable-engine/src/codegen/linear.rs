//! Control-Flow Linearizer
//!
//! Emits function bodies. A single-block function is emitted straight
//! line; anything else becomes a dispatch loop: a `while (1)` over a
//! `switch` on the next-block variable, with one case per block. A
//! second variable tracks the block that last finished executing, which
//! is what phi resolution keys on.

use super::coerce;
use super::lower::FunctionLowering;
use super::resolver::{escape, UnitResolver};
use crate::emit::{Emitter, NodeKind};
use crate::error::{CompileError, CompileResult};
use crate::ir::{BasicBlock, Function, Instruction, TypedValue, UnitId};

/// Mutable local holding the index of the next block to execute.
pub const LABEL_VAR: &str = "$l";

/// Mutable local holding the index of the block that just finished.
pub const PREV_VAR: &str = "$p";

/// Emit one function declaration, body and all.
pub fn lower_function(
    func: &Function,
    unit: UnitId,
    resolver: &UnitResolver,
    emitter: &Emitter,
) -> CompileResult<()> {
    let mut lowering = FunctionLowering::new(unit, resolver);

    let params: Vec<String> = func.params.iter().map(|p| escape(&p.name)).collect();
    emitter.emit(
        format!("function {}({}) {{", escape(&func.name), params.join(", ")),
        NodeKind::BlockOpen,
    )?;

    // Re-coerce parameters in place; callers are not trusted to pass
    // correctly represented values.
    for param in &func.params {
        let name = escape(&param.name);
        emitter.emit(
            format!("{} = {}", name, coerce::coerce(&param.ty, &name)?),
            NodeKind::Normal,
        )?;
    }

    if func.blocks.len() == 1 {
        straight_line(&mut lowering, &func.blocks[0], emitter)?;
    } else {
        dispatch_loop(&mut lowering, func, emitter)?;
    }

    emitter.close_block()
}

/// Straight-line mode: the single block's instructions, verbatim, in
/// order. No dispatch apparatus.
fn straight_line(
    lowering: &mut FunctionLowering<'_>,
    block: &BasicBlock,
    emitter: &Emitter,
) -> CompileResult<()> {
    for instr in &block.instructions {
        match instr {
            Instruction::Branch { .. } | Instruction::Jump | Instruction::Phi { .. } => {
                return Err(CompileError::InvalidIr {
                    message: "control transfer in a single-block function".to_string(),
                });
            }
            other => emitter.emit(lowering.lower_instruction(other)?, NodeKind::Normal)?,
        }
    }
    Ok(())
}

/// Dispatch mode: every case ends by either returning or assigning the
/// next block index and breaking, so each loop iteration executes
/// exactly one block.
fn dispatch_loop(
    lowering: &mut FunctionLowering<'_>,
    func: &Function,
    emitter: &Emitter,
) -> CompileResult<()> {
    // Precomputed before emission: which blocks need a synthesized
    // fallthrough transition.
    let falls_through: Vec<bool> = func.blocks.iter().map(|b| b.falls_through()).collect();

    emitter.emit(
        format!("var {} = 0, {} = 0", LABEL_VAR, PREV_VAR),
        NodeKind::Normal,
    )?;
    emitter.emit(
        format!("while (1) switch({}) {{", LABEL_VAR),
        NodeKind::BlockOpen,
    )?;

    for block in &func.blocks {
        emitter.emit(format!("case {}:", block.index), NodeKind::BlockOpen)?;

        for instr in &block.instructions {
            match instr {
                Instruction::Phi { edges } => lower_phi(lowering, block, edges, emitter)?,

                Instruction::Branch { cond } => {
                    let cond = lowering.value_text(cond)?;
                    emitter.emit(
                        format!(
                            "{} = ({}) ? {} : {}; break",
                            LABEL_VAR, cond, block.successors[0], block.successors[1]
                        ),
                        NodeKind::Normal,
                    )?;
                }

                Instruction::Jump => {
                    emitter.emit(
                        format!(
                            "{} = {}; {} = {}; break;",
                            LABEL_VAR, block.successors[0], PREV_VAR, block.index
                        ),
                        NodeKind::Normal,
                    )?;
                }

                other => emitter.emit(lowering.lower_instruction(other)?, NodeKind::Normal)?,
            }
        }

        if falls_through[block.index] {
            emitter.emit(
                format!(
                    "{} = {}; {} = {}; break;",
                    LABEL_VAR,
                    block.index + 1,
                    PREV_VAR,
                    block.index
                ),
                NodeKind::BlockClose,
            )?;
        } else {
            emitter.emit("", NodeKind::BlockClose)?;
        }
    }

    emitter.close_block()
}

/// Phi resolution: a secondary switch on the previous-block variable
/// assigns the edge value for whichever predecessor actually ran.
fn lower_phi(
    lowering: &mut FunctionLowering<'_>,
    block: &BasicBlock,
    edges: &[TypedValue],
    emitter: &Emitter,
) -> CompileResult<()> {
    let register = lowering.frame.alloc();
    emitter.emit(
        format!("var {}; switch({}) {{", register, PREV_VAR),
        NodeKind::BlockOpen,
    )?;
    for (edge, &pred) in edges.iter().zip(&block.predecessors) {
        emitter.emit(
            format!(
                "case {}: {} = {}; break;",
                pred,
                register,
                lowering.coerced_text(edge)?
            ),
            NodeKind::Normal,
        )?;
    }
    emitter.close_block()
}
