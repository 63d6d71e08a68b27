//! Per-Function Frame
//!
//! Owns the virtual-register allocator for one function's lowering and
//! knows which unit the function lives in, so it can qualify (or not)
//! function references. One frame per function; dropped when the
//! function is done.

use super::resolver::{escape, UnitResolver};
use crate::error::CompileResult;
use crate::ir::UnitId;

/// Per-function lowering state.
pub struct Frame<'a> {
    unit: UnitId,
    resolver: &'a UnitResolver,
    next_register: u32,
}

impl<'a> Frame<'a> {
    /// Create a frame for a function belonging to `unit`.
    pub fn new(unit: UnitId, resolver: &'a UnitResolver) -> Self {
        Self {
            unit,
            resolver,
            next_register: 0,
        }
    }

    /// Allocate the next virtual register: `t0`, `t1`, `t2`, ...
    /// strictly increasing, never reused. Callers must allocate before
    /// rendering operand expressions so register numbers track emission
    /// order.
    pub fn alloc(&mut self) -> String {
        let name = format!("t{}", self.next_register);
        self.next_register += 1;
        name
    }

    /// Render a function reference: unqualified for the current unit,
    /// `unitIdent.functionIdent` across units.
    pub fn function_ref(&self, unit: UnitId, name: &str) -> CompileResult<String> {
        if unit == self.unit {
            Ok(escape(name))
        } else {
            Ok(format!("{}.{}", self.resolver.resolve(unit)?, escape(name)))
        }
    }

    /// Unit this frame lowers into.
    pub fn unit(&self) -> UnitId {
        self.unit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_sequence() {
        let resolver = UnitResolver::new();
        let mut frame = Frame::new(UnitId::new(0), &resolver);
        assert_eq!(frame.alloc(), "t0");
        assert_eq!(frame.alloc(), "t1");
        assert_eq!(frame.alloc(), "t2");
    }

    #[test]
    fn test_same_unit_ref_is_unqualified() {
        let mut resolver = UnitResolver::new();
        resolver.assign(UnitId::new(0), "main");
        let frame = Frame::new(UnitId::new(0), &resolver);
        assert_eq!(frame.function_ref(UnitId::new(0), "f").unwrap(), "_f");
    }

    #[test]
    fn test_cross_unit_ref_is_qualified() {
        let mut resolver = UnitResolver::new();
        resolver.assign(UnitId::new(0), "main");
        resolver.assign(UnitId::new(1), "util");
        let frame = Frame::new(UnitId::new(0), &resolver);
        assert_eq!(
            frame.function_ref(UnitId::new(1), "f").unwrap(),
            "_util._f"
        );
    }

    #[test]
    fn test_cross_unit_ref_unassigned_fails() {
        let resolver = UnitResolver::new();
        let frame = Frame::new(UnitId::new(0), &resolver);
        assert!(frame.function_ref(UnitId::new(1), "f").is_err());
    }
}
