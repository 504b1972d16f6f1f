//! SimpleVM virtual machine — executes pre-encoded word streams.
//!
//! The VM is a stack-based machine with:
//! - A fixed-capacity operand stack of signed words
//! - A fixed-size globals table shared by every frame
//! - A call stack of frames, each with its own locals and return address
//!
//! Diagnostics (TRACE, DUMP, PRINT) go to an injected [`Sink`]. Run
//! lifecycle events are logged through `tracing`.
//!
//! # Usage
//!
//! ```
//! use simplevm_common::{Instruction, Opcode, Program};
//! use simplevm_vm::{BufferSink, Termination, VmConfig, VM};
//!
//! let program = Program::from_instructions(&[
//!     Instruction::with_operand(Opcode::Const, 2),
//!     Instruction::with_operand(Opcode::Const, 40),
//!     Instruction::op(Opcode::Add),
//!     Instruction::op(Opcode::Print),
//!     Instruction::op(Opcode::Halt),
//! ]);
//!
//! let mut vm = VM::with_sink(VmConfig::default(), BufferSink::new());
//! assert_eq!(vm.execute(&program), Ok(Termination::Halted { at: 6 }));
//! assert_eq!(vm.sink().lines(), &["42".to_string()]);
//! ```

pub mod config;
pub mod error;
pub mod execute;
pub mod frame;
pub mod globals;
pub mod machine;
pub mod sink;
pub mod stack;

pub use config::VmConfig;
pub use error::RuntimeError;
pub use execute::Control;
pub use frame::CallFrame;
pub use machine::{Status, Termination, VM};
pub use sink::{BufferSink, Sink, StdoutSink};

use simplevm_common::Program;

/// Execute a program with the default configuration, printing
/// diagnostics to standard output.
///
/// # Errors
///
/// Returns [`RuntimeError`] if the program faults (FATAL, unbalanced RET,
/// division by zero, bounds violation, unknown opcode, etc.).
pub fn run(program: &Program) -> Result<Termination, RuntimeError> {
    let mut vm = VM::new(VmConfig::default());
    vm.execute(program)
}
