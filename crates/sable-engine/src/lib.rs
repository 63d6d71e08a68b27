//! Sable Compiler Backend
//!
//! Consumes a frontend-built SSA program and lowers it to a single
//! flat, dynamically-typed JavaScript program:
//! - Value/type model with a per-type coercion registry
//! - Per-function virtual-register allocation
//! - Collision-free cross-unit identifier resolution
//! - Control-flow linearization (straight-line or dispatch loop, with
//!   phi resolution keyed on the previously executed block)
//! - A producer/consumer emission pipeline rendering tagged fragments
//!   as indented text

#![warn(rust_2018_idioms)]

pub mod codegen;
pub mod emit;
pub mod error;
pub mod ir;

pub use codegen::{compile, compile_to_string};
pub use error::{CompileError, CompileResult};
