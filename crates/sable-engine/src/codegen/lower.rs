//! Instruction Lowering
//!
//! Renders individual SSA instructions as target-language statements,
//! allocating virtual registers for defined values. Control-transfer
//! instructions (`Branch`, `Jump`, `Phi`) are rendered by the
//! linearizer, because their text depends on block indices.

use super::coerce;
use super::frame::Frame;
use super::resolver::{escape, UnitResolver};
use super::{TUPLE_SCRATCH_SLOTS, TUPLE_VAR};
use crate::error::{CompileError, CompileResult};
use crate::ir::{Callee, Instruction, TypedValue, UnaryOp, UnitId, Value};

/// Lowering context for one function body.
pub struct FunctionLowering<'a> {
    pub(crate) frame: Frame<'a>,
}

impl<'a> FunctionLowering<'a> {
    pub fn new(unit: UnitId, resolver: &'a UnitResolver) -> Self {
        Self {
            frame: Frame::new(unit, resolver),
        }
    }

    /// Raw (uncoerced) text of a value.
    pub fn value_text(&self, value: &Value) -> CompileResult<String> {
        match value {
            Value::Const(text) => Ok(text.clone()),
            Value::Param(name) | Value::Global(name) => Ok(escape(name)),
            Value::Local(register) => Ok(register.clone()),
            Value::Func { unit, name } => self.frame.function_ref(*unit, name),
            Value::Builtin(builtin) => Ok(escape(builtin.name())),
        }
    }

    /// Value text with the operand's type coercion applied. Constants
    /// are emitted verbatim; their literal text already carries the
    /// right representation.
    pub fn coerced_text(&self, operand: &TypedValue) -> CompileResult<String> {
        let text = self.value_text(&operand.value)?;
        match operand.value {
            Value::Const(_) => Ok(text),
            _ => coerce::coerce(&operand.ty, &text),
        }
    }

    fn args_raw(&self, args: &[TypedValue]) -> CompileResult<String> {
        let rendered: Vec<String> = args
            .iter()
            .map(|arg| self.value_text(&arg.value))
            .collect::<CompileResult<_>>()?;
        Ok(rendered.join(", "))
    }

    fn args_coerced(&self, args: &[TypedValue]) -> CompileResult<String> {
        let rendered: Vec<String> = args
            .iter()
            .map(|arg| self.coerced_text(arg))
            .collect::<CompileResult<_>>()?;
        Ok(rendered.join(", "))
    }

    /// Lower one non-control-transfer instruction to a statement.
    pub fn lower_instruction(&mut self, instr: &Instruction) -> CompileResult<String> {
        match instr {
            Instruction::Call { callee, args } => match callee {
                // Print arguments are deliberately not coerced; they
                // print in their natural representation.
                Callee::Builtin(crate::ir::Builtin::Println) => {
                    Ok(format!("console.log({})", self.args_raw(args)?))
                }
                Callee::Func { unit, name } => {
                    let register = self.frame.alloc();
                    let target = self.frame.function_ref(*unit, name)?;
                    let args = self.args_coerced(args)?;
                    Ok(format!("var {} = {}({})", register, target, args))
                }
            },

            Instruction::UnaryOp { op, operand } => match op {
                UnaryOp::Deref => {
                    let elem = operand.ty.pointee().ok_or_else(|| CompileError::InvalidIr {
                        message: format!("dereference of non-pointer type {}", operand.ty),
                    })?;
                    let register = self.frame.alloc();
                    let pointer = self.value_text(&operand.value)?;
                    let read = coerce::coerce(elem, &format!("{}[0]", pointer))?;
                    Ok(format!("var {} = {}", register, read))
                }
                UnaryOp::Not => {
                    let register = self.frame.alloc();
                    let operand = self.value_text(&operand.value)?;
                    Ok(format!("var {} = !{}", register, operand))
                }
            },

            Instruction::BinaryOp { op, ty, lhs, rhs } => {
                let register = self.frame.alloc();
                let lhs = self.value_text(&lhs.value)?;
                let rhs = self.value_text(&rhs.value)?;
                if op.is_arithmetic() {
                    // Coerce the result, not the operands, so overflow
                    // truncation happens once per operation.
                    let expr = coerce::coerce(ty, &format!("({} {} {})", lhs, op, rhs))?;
                    Ok(format!("var {} = {}", register, expr))
                } else {
                    Ok(format!("var {} = {} {} {}", register, lhs, op, rhs))
                }
            }

            Instruction::Return(values) => {
                if values.is_empty() {
                    return Ok("return".to_string());
                }
                if values.len() > TUPLE_SCRATCH_SLOTS {
                    return Err(CompileError::TupleOverflow {
                        count: values.len(),
                        capacity: TUPLE_SCRATCH_SLOTS,
                    });
                }
                let mut stmt = String::new();
                for (i, value) in values.iter().enumerate() {
                    stmt.push_str(&format!(
                        "{}[{}] = {}; ",
                        TUPLE_VAR,
                        i,
                        self.coerced_text(value)?
                    ));
                }
                stmt.push_str(&format!("return {}", TUPLE_VAR));
                Ok(stmt)
            }

            Instruction::Store { addr, value } => {
                let target = self.value_text(&addr.value)?;
                let stored = self.coerced_text(value)?;
                Ok(format!("{}[0] = {}", target, stored))
            }

            Instruction::Extract { tuple, index } => {
                let elems = tuple.ty.tuple_elems().ok_or_else(|| CompileError::InvalidIr {
                    message: format!("extract from non-tuple type {}", tuple.ty),
                })?;
                let elem = elems.get(*index).ok_or_else(|| CompileError::InvalidIr {
                    message: format!("extract index {} out of range for {}", index, tuple.ty),
                })?;
                let register = self.frame.alloc();
                let source = self.value_text(&tuple.value)?;
                let read = coerce::coerce(elem, &format!("{}[{}]", source, index))?;
                Ok(format!("var {} = {}", register, read))
            }

            Instruction::Branch { .. } | Instruction::Jump | Instruction::Phi { .. } => {
                Err(CompileError::InvalidIr {
                    message: "control-transfer instruction outside the linearizer".to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{BinOp, Builtin, Type};

    fn resolver() -> UnitResolver {
        let mut resolver = UnitResolver::new();
        resolver.assign(UnitId::new(0), "main");
        resolver.assign(UnitId::new(1), "util");
        resolver
    }

    fn typed(value: Value, ty: Type) -> TypedValue {
        TypedValue::new(value, ty)
    }

    #[test]
    fn test_println_args_stay_raw() {
        let resolver = resolver();
        let mut lowering = FunctionLowering::new(UnitId::new(0), &resolver);
        let stmt = lowering
            .lower_instruction(&Instruction::Call {
                callee: Callee::Builtin(Builtin::Println),
                args: vec![
                    typed(Value::Local("t0".into()), Type::Int),
                    typed(Value::Const("\"hi\"".into()), Type::Str),
                ],
            })
            .unwrap();
        assert_eq!(stmt, "console.log(t0, \"hi\")");
    }

    #[test]
    fn test_user_call_allocates_register_and_coerces_args() {
        let resolver = resolver();
        let mut lowering = FunctionLowering::new(UnitId::new(0), &resolver);
        let stmt = lowering
            .lower_instruction(&Instruction::Call {
                callee: Callee::Func {
                    unit: UnitId::new(1),
                    name: "add".into(),
                },
                args: vec![typed(Value::Param("x".into()), Type::Int)],
            })
            .unwrap();
        assert_eq!(stmt, "var t0 = _util._add(_x|0)");
    }

    #[test]
    fn test_arithmetic_coerces_result_once() {
        let resolver = resolver();
        let mut lowering = FunctionLowering::new(UnitId::new(0), &resolver);
        assert_eq!(lowering.frame.alloc(), "t0");
        let stmt = lowering
            .lower_instruction(&Instruction::BinaryOp {
                op: BinOp::Mul,
                ty: Type::Int,
                lhs: typed(Value::Local("t0".into()), Type::Int),
                rhs: typed(Value::Const("4".into()), Type::Int),
            })
            .unwrap();
        assert_eq!(stmt, "var t1 = (t0 * 4)|0");
    }

    #[test]
    fn test_comparison_is_uncoerced() {
        let resolver = resolver();
        let mut lowering = FunctionLowering::new(UnitId::new(0), &resolver);
        assert_eq!(lowering.frame.alloc(), "t0");
        let stmt = lowering
            .lower_instruction(&Instruction::BinaryOp {
                op: BinOp::Lt,
                ty: Type::Bool,
                lhs: typed(Value::Local("t0".into()), Type::Int),
                rhs: typed(Value::Const("10".into()), Type::Int),
            })
            .unwrap();
        assert_eq!(stmt, "var t1 = t0 < 10");
    }

    #[test]
    fn test_deref_coerces_to_element_type() {
        let resolver = resolver();
        let mut lowering = FunctionLowering::new(UnitId::new(0), &resolver);
        let stmt = lowering
            .lower_instruction(&Instruction::UnaryOp {
                op: UnaryOp::Deref,
                operand: typed(
                    Value::Param("p".into()),
                    Type::Pointer(Box::new(Type::Int)),
                ),
            })
            .unwrap();
        assert_eq!(stmt, "var t0 = _p[0]|0");
    }

    #[test]
    fn test_deref_of_non_pointer_is_invalid() {
        let resolver = resolver();
        let mut lowering = FunctionLowering::new(UnitId::new(0), &resolver);
        let result = lowering.lower_instruction(&Instruction::UnaryOp {
            op: UnaryOp::Deref,
            operand: typed(Value::Param("p".into()), Type::Int),
        });
        assert!(matches!(result, Err(CompileError::InvalidIr { .. })));
    }

    #[test]
    fn test_return_empty() {
        let resolver = resolver();
        let mut lowering = FunctionLowering::new(UnitId::new(0), &resolver);
        let stmt = lowering.lower_instruction(&Instruction::Return(vec![])).unwrap();
        assert_eq!(stmt, "return");
    }

    #[test]
    fn test_return_multi_fills_tuple_scratch() {
        let resolver = resolver();
        let mut lowering = FunctionLowering::new(UnitId::new(0), &resolver);
        let stmt = lowering
            .lower_instruction(&Instruction::Return(vec![
                typed(Value::Local("t0".into()), Type::Int),
                typed(Value::Const("\"x\"".into()), Type::Str),
            ]))
            .unwrap();
        assert_eq!(stmt, "$tuple[0] = t0|0; $tuple[1] = \"x\"; return $tuple");
    }

    #[test]
    fn test_return_overflow_is_fatal() {
        let resolver = resolver();
        let mut lowering = FunctionLowering::new(UnitId::new(0), &resolver);
        let values = vec![typed(Value::Const("0".into()), Type::Int); TUPLE_SCRATCH_SLOTS + 1];
        assert!(matches!(
            lowering.lower_instruction(&Instruction::Return(values)),
            Err(CompileError::TupleOverflow { .. })
        ));
    }

    #[test]
    fn test_store_writes_slot_zero() {
        let resolver = resolver();
        let mut lowering = FunctionLowering::new(UnitId::new(0), &resolver);
        let stmt = lowering
            .lower_instruction(&Instruction::Store {
                addr: typed(
                    Value::Param("p".into()),
                    Type::Pointer(Box::new(Type::Int)),
                ),
                value: typed(Value::Local("t0".into()), Type::Int),
            })
            .unwrap();
        assert_eq!(stmt, "_p[0] = t0|0");
    }

    #[test]
    fn test_extract_coerces_field_type() {
        let resolver = resolver();
        let mut lowering = FunctionLowering::new(UnitId::new(0), &resolver);
        assert_eq!(lowering.frame.alloc(), "t0");
        let stmt = lowering
            .lower_instruction(&Instruction::Extract {
                tuple: typed(
                    Value::Local("t0".into()),
                    Type::Tuple(vec![Type::Int, Type::Str]),
                ),
                index: 1,
            })
            .unwrap();
        assert_eq!(stmt, "var t1 = \"\"+t0[1]");
    }

    #[test]
    fn test_extract_out_of_range_is_invalid() {
        let resolver = resolver();
        let mut lowering = FunctionLowering::new(UnitId::new(0), &resolver);
        let result = lowering.lower_instruction(&Instruction::Extract {
            tuple: typed(Value::Local("t0".into()), Type::Tuple(vec![Type::Int])),
            index: 3,
        });
        assert!(matches!(result, Err(CompileError::InvalidIr { .. })));
    }
}
