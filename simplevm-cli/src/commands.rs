//! CLI command implementation.

use std::fs;

use simplevm_common::Program;
use simplevm_vm::{VmConfig, VM};
use tracing::info;

use crate::Cli;

/// Load and execute the program named on the command line.
pub fn run(cli: &Cli) -> Result<(), i32> {
    let input = cli.program.display();

    let text = fs::read_to_string(&cli.program).map_err(|e| {
        eprintln!("error: cannot read '{input}': {e}");
        1
    })?;

    let program: Program = text.parse().map_err(|e| {
        eprintln!("error: {input}: {e}");
        1
    })?;

    let config = VmConfig::default()
        .with_stack_capacity(cli.stack_capacity)
        .with_globals_capacity(cli.globals)
        .with_locals_per_frame(cli.locals)
        .with_max_call_depth(cli.max_call_depth)
        .with_max_steps(cli.max_steps);
    info!(words = program.len(), ?config, "loaded {input}");

    let mut vm = VM::new(config);
    vm.set_tracing(cli.trace);

    let result = vm.execute(&program);
    if cli.dump {
        vm.dump();
    }

    match result {
        Ok(termination) => {
            info!(?termination, "run finished");
            Ok(())
        }
        Err(e) => {
            eprintln!("runtime error: {e}");
            Err(3)
        }
    }
}
