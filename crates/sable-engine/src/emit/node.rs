//! Code Nodes
//!
//! The unit flowing through the emission pipeline: a text fragment plus
//! a structural tag. The stream must be well-nested: every `BlockOpen`
//! is matched by a later `BlockClose` at the same depth.

/// Structural tag attached to a fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Plain statement line.
    Normal,
    /// Line that opens a nested block; depth increases after it.
    BlockOpen,
    /// Line that closes a nested block; depth decreases before it.
    BlockClose,
}

/// One tagged text fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeNode {
    pub text: String,
    pub kind: NodeKind,
}

impl CodeNode {
    pub fn new(text: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }
}
