//! Code Generation
//!
//! Drives the whole lowering: walks units, functions, and globals in
//! order, producing the tagged fragment stream the renderer turns into
//! text. The emitted program is one immediately invoked closure whose
//! body ends with the entry unit's `_init()` and `_main()` calls.

pub mod coerce;
pub mod frame;
pub mod linear;
pub mod lower;
pub mod resolver;

use crate::emit::{self, Emitter, NodeKind};
use crate::error::{CompileError, CompileResult};
use crate::ir::{Member, Program, Unit, UnitId};
use resolver::{escape, UnitResolver};
use std::io::Write;

/// Name of the shared multi-return scratch array.
pub const TUPLE_VAR: &str = "$tuple";

/// Fixed capacity of the tuple scratch array. An implementation
/// constant, not computed from any function's return arity.
pub const TUPLE_SCRATCH_SLOTS: usize = 10;

fn prelude() -> String {
    format!("var {} = Array({});", TUPLE_VAR, TUPLE_SCRATCH_SLOTS)
}

/// Compile a program into the given sink. The sink moves to the
/// rendering thread and is handed back once the node stream is drained
/// and flushed.
pub fn compile<W: Write + Send + 'static>(program: &Program, sink: W) -> CompileResult<W> {
    program.validate()?;
    let resolver = UnitResolver::of_program(program);

    let (emitter, render) = emit::spawn(sink);
    let lowered = emit_program(program, &resolver, &emitter);

    // End-of-stream: drop the sender, then block until the renderer has
    // drained and flushed. A lowering error still joins the renderer so
    // the sink is not abandoned mid-write.
    drop(emitter);
    let sink = render.finish();

    lowered?;
    sink
}

/// Compile into an in-memory string (test and tooling convenience).
pub fn compile_to_string(program: &Program) -> CompileResult<String> {
    let bytes = compile(program, Vec::new())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn emit_program(
    program: &Program,
    resolver: &UnitResolver,
    emitter: &Emitter,
) -> CompileResult<()> {
    let entry = program.entry_unit().ok_or(CompileError::MissingEntryUnit)?;

    emitter.emit("(function() {", NodeKind::BlockOpen)?;
    emitter.emit(prelude(), NodeKind::Normal)?;

    for (i, unit) in program.units.iter().enumerate() {
        emit_unit(UnitId::new(i as u32), unit, resolver, emitter)?;
    }

    let entry_name = resolver.resolve(entry)?;
    emitter.emit(
        format!(
            "{unit}.{init}(); {unit}.{main}()}})()",
            unit = entry_name,
            init = escape("init"),
            main = escape("main"),
        ),
        NodeKind::BlockClose,
    )
}

/// One unit becomes a wrapper object: members are declared inside a
/// closure and exported through the returned namespace object.
fn emit_unit(
    id: UnitId,
    unit: &Unit,
    resolver: &UnitResolver,
    emitter: &Emitter,
) -> CompileResult<()> {
    let ident = resolver.resolve(id)?;
    emitter.emit(
        format!("var {} = new function() {{", ident),
        NodeKind::BlockOpen,
    )?;

    for member in &unit.members {
        match member {
            Member::Function(func) => linear::lower_function(func, id, resolver, emitter)?,
            Member::Global(global) => {
                emitter.emit(
                    format!(
                        "var {} = {}",
                        escape(&global.name),
                        coerce::default_value(&global.ty)?
                    ),
                    NodeKind::Normal,
                )?;
            }
        }
    }

    emitter.emit("return {", NodeKind::BlockOpen)?;
    for (i, member) in unit.members.iter().enumerate() {
        let name = escape(member.name());
        let mut line = format!("{}: {}", name, name);
        if i + 1 < unit.members.len() {
            line.push(',');
        }
        emitter.emit(line, NodeKind::Normal)?;
    }
    emitter.close_block()?;
    emitter.close_block()
}
