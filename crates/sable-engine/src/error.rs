//! Compile Errors
//!
//! All failure modes of the backend surface as `CompileError` values.
//! Malformed input IR is an invariant violation reported through
//! `InvalidIr`, never a panic.

/// Result alias used throughout the backend.
pub type CompileResult<T> = Result<T, CompileError>;

/// Errors produced while lowering a program.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// A type with no coercion strategy reached the registry.
    #[error("unsupported type in coercion: {ty}")]
    UnsupportedType {
        /// Rendered form of the offending type.
        ty: String,
    },

    /// The input IR violates a structural invariant.
    #[error("invalid IR: {message}")]
    InvalidIr {
        /// Description of the violated invariant.
        message: String,
    },

    /// A function reference named a unit the resolver never assigned.
    #[error("unresolved unit reference: u{unit}")]
    UnresolvedUnit {
        /// Raw unit index carried by the reference.
        unit: u32,
    },

    /// The program has no unit declared `main` to drive entry calls.
    #[error("program has no `main` unit")]
    MissingEntryUnit,

    /// A return carries more values than the tuple scratch array holds.
    #[error("return of {count} values exceeds tuple scratch capacity {capacity}")]
    TupleOverflow {
        /// Number of returned values.
        count: usize,
        /// Fixed scratch capacity.
        capacity: usize,
    },

    /// The rendering stage hung up before lowering finished.
    #[error("renderer closed before lowering finished")]
    RendererClosed,

    /// The rendering thread panicked.
    #[error("renderer thread panicked")]
    RendererPanicked,

    /// Writing to the output sink failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
