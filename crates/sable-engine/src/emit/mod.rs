//! Code Emission Pipeline
//!
//! Lowering produces a stream of tagged text fragments (`CodeNode`);
//! a single rendering consumer turns the stream into indented output
//! text. The two stages are connected by a bounded channel, so a slow
//! sink applies backpressure to lowering.

pub mod node;
pub mod render;

pub use node::{CodeNode, NodeKind};
pub use render::{spawn, Emitter, RenderThread, Renderer, CHANNEL_CAPACITY, INDENT_WIDTH};
