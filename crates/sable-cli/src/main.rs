//! Sable command-line driver
//!
//! Reads a serialized SSA program (JSON) and writes the lowered
//! JavaScript next to it, with a fixed `.js` suffix appended to the
//! input path.

use anyhow::{Context, Result};
use clap::Parser;
use sable_engine::ir::Program;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

/// Built-in sample compiled when no input is named.
const DEFAULT_INPUT: &str = "demos/sample.sir.json";

#[derive(Parser)]
#[command(name = "sable")]
#[command(about = "Lower a serialized SSA program to JavaScript", long_about = None)]
#[command(version)]
struct Cli {
    /// Input IR file (JSON)
    #[arg(default_value = DEFAULT_INPUT)]
    input: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let source = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("reading {}", cli.input.display()))?;
    let program: Program = serde_json::from_str(&source)
        .with_context(|| format!("parsing IR from {}", cli.input.display()))?;

    let mut out_path = cli.input.clone().into_os_string();
    out_path.push(".js");
    let out_path = PathBuf::from(out_path);

    let file = File::create(&out_path)
        .with_context(|| format!("creating {}", out_path.display()))?;
    sable_engine::compile(&program, BufWriter::new(file))
        .with_context(|| format!("compiling {}", cli.input.display()))?;

    Ok(())
}
