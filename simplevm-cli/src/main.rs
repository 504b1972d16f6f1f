//! SimpleVM CLI — load a word file and execute it.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Usage, input or parse error
//! - 3: Runtime fault

mod commands;

use std::path::PathBuf;
use std::process;

use clap::Parser;
use simplevm_vm::config::{
    DEFAULT_GLOBALS_CAPACITY, DEFAULT_LOCALS_PER_FRAME, DEFAULT_MAX_CALL_DEPTH,
    DEFAULT_STACK_CAPACITY,
};
use tracing_subscriber::EnvFilter;

/// Execute a SimpleVM program given as a list of integer words.
#[derive(Debug, Parser)]
#[command(name = "simplevm", version)]
pub struct Cli {
    /// Program file: integers separated by whitespace or commas, `#` comments.
    pub program: PathBuf,

    /// Start with tracing enabled.
    #[arg(long)]
    pub trace: bool,

    /// Print a state dump after the run, including after a fault.
    #[arg(long)]
    pub dump: bool,

    /// Operand stack capacity.
    #[arg(long, default_value_t = DEFAULT_STACK_CAPACITY)]
    pub stack_capacity: usize,

    /// Number of global slots.
    #[arg(long, default_value_t = DEFAULT_GLOBALS_CAPACITY)]
    pub globals: usize,

    /// Local slots per call frame.
    #[arg(long, default_value_t = DEFAULT_LOCALS_PER_FRAME)]
    pub locals: usize,

    /// Maximum call-frame depth, bottom frame included.
    #[arg(long, default_value_t = DEFAULT_MAX_CALL_DEPTH)]
    pub max_call_depth: usize,

    /// Abort after executing this many instructions.
    #[arg(long)]
    pub max_steps: Option<u64>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::try_parse().unwrap_or_else(|e| {
        let _ = e.print();
        process::exit(if e.use_stderr() { 1 } else { 0 });
    });

    if let Err(code) = commands::run(&cli) {
        process::exit(code);
    }
}
