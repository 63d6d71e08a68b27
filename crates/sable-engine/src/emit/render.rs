//! Stream Renderer
//!
//! Consumes `CodeNode`s in enqueue order and writes indented text.
//! Rendering is append-only and single-pass; indentation mirrors block
//! nesting exactly as long as the stream is well-nested.

use super::node::{CodeNode, NodeKind};
use crate::error::{CompileError, CompileResult};
use crossbeam::channel::{self, Sender};
use std::io::{self, Write};
use std::thread::{self, JoinHandle};

/// Spaces per nesting level.
pub const INDENT_WIDTH: usize = 2;

/// Bounded capacity of the lowering -> rendering channel. A full queue
/// blocks the producer; this is the only producer suspension point.
pub const CHANNEL_CAPACITY: usize = 256;

/// Indentation-tracking renderer. Synchronous and reusable on its own;
/// the channel plumbing below drives one instance per compile.
#[derive(Debug, Default)]
pub struct Renderer {
    depth: usize,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render one node. `BlockClose` dedents before printing and is
    /// followed by a blank line; `BlockOpen` indents after printing.
    pub fn render<W: Write>(&mut self, node: &CodeNode, out: &mut W) -> io::Result<()> {
        if node.kind == NodeKind::BlockClose {
            self.depth = self.depth.saturating_sub(1);
        }

        for _ in 0..self.depth * INDENT_WIDTH {
            out.write_all(b" ")?;
        }
        out.write_all(node.text.as_bytes())?;
        out.write_all(b"\n")?;

        match node.kind {
            NodeKind::BlockClose => out.write_all(b"\n")?,
            NodeKind::BlockOpen => self.depth += 1,
            NodeKind::Normal => {}
        }

        Ok(())
    }

    /// Current nesting depth.
    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// Producer handle held by the lowering stage.
pub struct Emitter {
    tx: Sender<CodeNode>,
}

impl Emitter {
    /// Enqueue one fragment. Blocks while the channel is full.
    pub fn emit(&self, text: impl Into<String>, kind: NodeKind) -> CompileResult<()> {
        self.tx
            .send(CodeNode::new(text, kind))
            .map_err(|_| CompileError::RendererClosed)
    }

    /// Enqueue the ubiquitous `}` block terminator.
    pub fn close_block(&self) -> CompileResult<()> {
        self.emit("}", NodeKind::BlockClose)
    }
}

/// Handle to the rendering thread; joining it is the drain handshake.
pub struct RenderThread<W> {
    handle: JoinHandle<io::Result<W>>,
}

impl<W> RenderThread<W> {
    /// Wait for the consumer to drain the channel and flush, then take
    /// the sink back. Call after dropping the `Emitter`.
    pub fn finish(self) -> CompileResult<W> {
        match self.handle.join() {
            Ok(result) => result.map_err(CompileError::Io),
            Err(_) => Err(CompileError::RendererPanicked),
        }
    }
}

/// Spawn the rendering stage over the given sink and hand back the
/// producer side.
pub fn spawn<W: Write + Send + 'static>(mut sink: W) -> (Emitter, RenderThread<W>) {
    let (tx, rx) = channel::bounded::<CodeNode>(CHANNEL_CAPACITY);

    let handle = thread::spawn(move || {
        let mut renderer = Renderer::new();
        for node in rx {
            renderer.render(&node, &mut sink)?;
        }
        sink.flush()?;
        Ok(sink)
    });

    (Emitter { tx }, RenderThread { handle })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_all(nodes: &[CodeNode]) -> String {
        let mut renderer = Renderer::new();
        let mut out = Vec::new();
        for node in nodes {
            renderer.render(node, &mut out).unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_indentation_mirrors_nesting() {
        let nodes = vec![
            CodeNode::new("function f() {", NodeKind::BlockOpen),
            CodeNode::new("var t0 = 1", NodeKind::Normal),
            CodeNode::new("}", NodeKind::BlockClose),
        ];
        assert_eq!(render_all(&nodes), "function f() {\n  var t0 = 1\n}\n\n");
    }

    #[test]
    fn test_nested_blocks() {
        let nodes = vec![
            CodeNode::new("a {", NodeKind::BlockOpen),
            CodeNode::new("b {", NodeKind::BlockOpen),
            CodeNode::new("x", NodeKind::Normal),
            CodeNode::new("}", NodeKind::BlockClose),
            CodeNode::new("}", NodeKind::BlockClose),
        ];
        assert_eq!(render_all(&nodes), "a {\n  b {\n    x\n  }\n\n}\n\n");
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let nodes = vec![
            CodeNode::new("a {", NodeKind::BlockOpen),
            CodeNode::new("x", NodeKind::Normal),
            CodeNode::new("}", NodeKind::BlockClose),
        ];
        assert_eq!(render_all(&nodes), render_all(&nodes));
    }

    #[test]
    fn test_depth_never_underflows() {
        let mut renderer = Renderer::new();
        let mut out = Vec::new();
        renderer
            .render(&CodeNode::new("}", NodeKind::BlockClose), &mut out)
            .unwrap();
        assert_eq!(renderer.depth(), 0);
    }

    #[test]
    fn test_pipeline_preserves_order() {
        let (emitter, render) = spawn(Vec::new());
        emitter.emit("a {", NodeKind::BlockOpen).unwrap();
        emitter.emit("x", NodeKind::Normal).unwrap();
        emitter.close_block().unwrap();
        drop(emitter);

        let sink = render.finish().unwrap();
        assert_eq!(String::from_utf8(sink).unwrap(), "a {\n  x\n}\n\n");
    }
}
