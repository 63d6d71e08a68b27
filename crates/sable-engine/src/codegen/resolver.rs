//! Unit Identifier Resolver
//!
//! Assigns collision-free identifiers to compilation units and answers
//! lookups during lowering. Built once per compile run and threaded by
//! reference; never a process-wide singleton, so independent compiles
//! stay isolated.

use crate::error::{CompileError, CompileResult};
use crate::ir::{Program, UnitId};
use rustc_hash::{FxHashMap, FxHashSet};

/// Fixed prefix applied to every generated identifier so emitted names
/// cannot collide with target-language reserved words.
pub const ESCAPE_PREFIX: &str = "_";

/// Escape a declared name for emission.
pub fn escape(name: &str) -> String {
    format!("{}{}", ESCAPE_PREFIX, name)
}

/// Per-run map from unit id to its generated, globally unique identifier.
#[derive(Debug, Default)]
pub struct UnitResolver {
    names: FxHashMap<UnitId, String>,
    used: FxHashSet<String>,
}

impl UnitResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a resolver with every unit of the program assigned, in
    /// traversal order, before any lowering happens.
    pub fn of_program(program: &Program) -> Self {
        let mut resolver = Self::new();
        for (i, unit) in program.units.iter().enumerate() {
            resolver.assign(UnitId::new(i as u32), &unit.name);
        }
        resolver
    }

    /// Assign an identifier for a unit. The first unit with a given base
    /// name keeps it; later collisions probe `name2`, `name3`, ... until
    /// an unused identifier is found.
    pub fn assign(&mut self, id: UnitId, declared: &str) -> String {
        let base = escape(declared);
        let mut candidate = base.clone();
        let mut suffix = 2;
        while self.used.contains(&candidate) {
            candidate = format!("{}{}", base, suffix);
            suffix += 1;
        }
        self.used.insert(candidate.clone());
        self.names.insert(id, candidate.clone());
        candidate
    }

    /// Look up a unit's generated identifier. A missing mapping is an
    /// invariant violation, not a recoverable condition.
    pub fn resolve(&self, id: UnitId) -> CompileResult<&str> {
        self.names
            .get(&id)
            .map(String::as_str)
            .ok_or(CompileError::UnresolvedUnit { unit: id.as_u32() })
    }
}
