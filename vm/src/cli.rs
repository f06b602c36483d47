//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;
use vm::engine::{EngineConfig, DEFAULT_MAX_CYCLES};

/// Runs a program image on the oblivious engine and prints the non-zero
/// register and memory cells as `slot value` lines.
#[derive(Parser, Debug)]
#[command(name = "obvm", version, about)]
pub(crate) struct Args {
    /// Program image to run.
    #[arg(short, long, required_unless_present = "demo")]
    pub program: Option<PathBuf>,

    /// Cycle budget before giving up.
    #[arg(short, long, default_value_t = DEFAULT_MAX_CYCLES)]
    pub max_cycles: usize,

    /// Reserved counter slot that stops the program. Defaults to N-1.
    #[arg(long)]
    pub halt_slot: Option<usize>,

    /// Output file. If not specified, writes to stdout.
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Writes the built-in demo image (6 * 7 by repeated addition) to this
    /// path and exits.
    #[arg(long, conflicts_with = "program")]
    pub demo: Option<PathBuf>,
}

impl Args {
    pub fn config(&self) -> EngineConfig {
        EngineConfig {
            max_cycles: self.max_cycles,
            halt_slot: self.halt_slot,
        }
    }
}
