//! Compilation Units and Programs
//!
//! A `Unit` is one package/module of the input program; a `Program` is
//! the ordered unit list handed to the backend. Both are frontend-owned
//! and never mutated here.

use super::function::{Function, Global};
use super::instr::{Callee, Instruction};
use super::value::{UnitId, Value};
use crate::error::{CompileError, CompileResult};
use serde::{Deserialize, Serialize};

/// Declared name of the entry unit.
pub const ENTRY_UNIT: &str = "main";

/// A unit member, in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Member {
    Function(Function),
    Global(Global),
}

impl Member {
    /// Declared name of the member.
    pub fn name(&self) -> &str {
        match self {
            Member::Function(f) => &f.name,
            Member::Global(g) => &g.name,
        }
    }
}

/// A compilation unit: declared name plus ordered members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    /// Declared unit name (not necessarily unique across the program).
    pub name: String,
    /// Members in declaration order.
    pub members: Vec<Member>,
}

impl Unit {
    /// Create an empty unit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    /// Append a function member.
    pub fn add_function(&mut self, func: Function) {
        self.members.push(Member::Function(func));
    }

    /// Append a global member.
    pub fn add_global(&mut self, global: Global) {
        self.members.push(Member::Global(global));
    }

    /// Iterate over the function members.
    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.members.iter().filter_map(|m| match m {
            Member::Function(f) => Some(f),
            Member::Global(_) => None,
        })
    }
}

/// A whole input program.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Program {
    /// Units in traversal (emission) order.
    pub units: Vec<Unit>,
}

impl Program {
    /// Create an empty program.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a unit, returning its id.
    pub fn add_unit(&mut self, unit: Unit) -> UnitId {
        let id = UnitId::new(self.units.len() as u32);
        self.units.push(unit);
        id
    }

    /// Get a unit by id.
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(id.index())
    }

    /// Id of the unit declared `main`, if any.
    pub fn entry_unit(&self) -> Option<UnitId> {
        self.units
            .iter()
            .position(|u| u.name == ENTRY_UNIT)
            .map(|i| UnitId::new(i as u32))
    }

    /// Validate every function's structure and every cross-unit
    /// reference before lowering starts.
    pub fn validate(&self) -> CompileResult<()> {
        for unit in &self.units {
            for func in unit.functions() {
                func.validate().map_err(|message| CompileError::InvalidIr {
                    message: format!("{}.{}: {}", unit.name, func.name, message),
                })?;

                for block in &func.blocks {
                    for instr in &block.instructions {
                        self.check_unit_refs(instr).map_err(|message| {
                            CompileError::InvalidIr {
                                message: format!("{}.{}: {}", unit.name, func.name, message),
                            }
                        })?;
                    }
                }
            }
        }
        Ok(())
    }

    fn check_unit_refs(&self, instr: &Instruction) -> Result<(), String> {
        let mut check = |value: &Value| -> Result<(), String> {
            if let Value::Func { unit, .. } = value {
                if unit.index() >= self.units.len() {
                    return Err(format!("function reference to non-existent unit {}", unit));
                }
            }
            Ok(())
        };

        match instr {
            Instruction::Call { callee, args } => {
                if let Callee::Func { unit, .. } = callee {
                    if unit.index() >= self.units.len() {
                        return Err(format!("call to non-existent unit {}", unit));
                    }
                }
                for arg in args {
                    check(&arg.value)?;
                }
            }
            Instruction::UnaryOp { operand, .. } => check(&operand.value)?,
            Instruction::BinaryOp { lhs, rhs, .. } => {
                check(&lhs.value)?;
                check(&rhs.value)?;
            }
            Instruction::Return(values) => {
                for v in values {
                    check(&v.value)?;
                }
            }
            Instruction::Store { addr, value } => {
                check(&addr.value)?;
                check(&value.value)?;
            }
            Instruction::Extract { tuple, .. } => check(&tuple.value)?,
            Instruction::Branch { cond } => check(cond)?,
            Instruction::Jump => {}
            Instruction::Phi { edges } => {
                for edge in edges {
                    check(&edge.value)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::block::BasicBlock;
    use crate::ir::ty::Type;
    use crate::ir::value::TypedValue;

    fn return_only_function(name: &str) -> Function {
        let mut func = Function::new(name, vec![]);
        let mut block = BasicBlock::new(0);
        block.push(Instruction::Return(vec![]));
        func.add_block(block);
        func
    }

    #[test]
    fn test_entry_unit() {
        let mut program = Program::new();
        program.add_unit(Unit::new("util"));
        let main = program.add_unit(Unit::new("main"));
        assert_eq!(program.entry_unit(), Some(main));
    }

    #[test]
    fn test_entry_unit_missing() {
        let mut program = Program::new();
        program.add_unit(Unit::new("util"));
        assert_eq!(program.entry_unit(), None);
    }

    #[test]
    fn test_validate_ok() {
        let mut unit = Unit::new("main");
        unit.add_function(return_only_function("main"));
        let mut program = Program::new();
        program.add_unit(unit);
        assert!(program.validate().is_ok());
    }

    #[test]
    fn test_validate_bad_unit_ref() {
        let mut func = Function::new("main", vec![]);
        let mut block = BasicBlock::new(0);
        block.push(Instruction::Call {
            callee: Callee::Func {
                unit: UnitId::new(9),
                name: "f".into(),
            },
            args: vec![],
        });
        block.push(Instruction::Return(vec![]));
        func.add_block(block);

        let mut unit = Unit::new("main");
        unit.add_function(func);
        let mut program = Program::new();
        program.add_unit(unit);

        assert!(matches!(
            program.validate(),
            Err(CompileError::InvalidIr { .. })
        ));
    }

    #[test]
    fn test_validate_bad_value_ref() {
        let mut func = Function::new("main", vec![]);
        let mut block = BasicBlock::new(0);
        block.push(Instruction::Return(vec![TypedValue::new(
            Value::Func {
                unit: UnitId::new(4),
                name: "f".into(),
            },
            Type::Int,
        )]));
        func.add_block(block);

        let mut unit = Unit::new("main");
        unit.add_function(func);
        let mut program = Program::new();
        program.add_unit(unit);

        assert!(program.validate().is_err());
    }
}
