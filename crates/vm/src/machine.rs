//! VM state management: operand stack, globals, call frames, diagnostics.

use simplevm_common::Word;

use crate::config::VmConfig;
use crate::error::RuntimeError;
use crate::frame::{CallFrame, CallStack};
use crate::globals::Globals;
use crate::sink::{Sink, StdoutSink};
use crate::stack::OperandStack;

/// How a successful run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// HALT executed at instruction `at`.
    Halted { at: usize },
    /// The instruction pointer reached or passed the end of the program.
    EndOfProgram,
}

/// Where the engine is in its run lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Constructed, nothing executed yet.
    Ready,
    /// The last run ended normally.
    Halted,
    /// The last run ended with a fault.
    Faulted,
}

/// The SimpleVM engine.
///
/// Owns every piece of mutable execution state. State persists across
/// [`execute`](VM::execute) calls; only the instruction pointer is reset.
pub struct VM<S: Sink = StdoutSink> {
    pub(crate) config: VmConfig,
    /// Operand stack.
    pub(crate) stack: OperandStack,
    /// Globals table.
    pub(crate) globals: Globals,
    /// Call frames; the bottom frame is created here and never popped.
    pub(crate) frames: CallStack,
    /// Instruction pointer (word index).
    pub(crate) ip: usize,
    /// Emit TRACE lines to the sink.
    pub(crate) trace: bool,
    pub(crate) status: Status,
    pub(crate) sink: S,
}

impl VM<StdoutSink> {
    /// Create a VM writing diagnostics to standard output.
    pub fn new(config: VmConfig) -> Self {
        Self::with_sink(config, StdoutSink)
    }
}

impl Default for VM<StdoutSink> {
    fn default() -> Self {
        Self::new(VmConfig::default())
    }
}

impl<S: Sink> VM<S> {
    /// Create a VM writing diagnostics to `sink`.
    pub fn with_sink(config: VmConfig, sink: S) -> Self {
        Self {
            config,
            stack: OperandStack::new(config.stack_capacity),
            globals: Globals::new(config.globals_capacity),
            frames: CallStack::new(config.locals_per_frame, config.max_call_depth),
            ip: 0,
            trace: false,
            status: Status::Ready,
            sink,
        }
    }

    pub fn config(&self) -> &VmConfig {
        &self.config
    }

    /// Current operand stack contents, bottom first.
    pub fn stack(&self) -> &[Word] {
        self.stack.as_slice()
    }

    /// Current globals table.
    pub fn globals(&self) -> &[Word] {
        self.globals.as_slice()
    }

    /// Call frames, innermost first.
    pub fn frames(&self) -> impl Iterator<Item = &CallFrame> {
        self.frames.iter()
    }

    pub fn frame_depth(&self) -> usize {
        self.frames.depth()
    }

    pub fn ip(&self) -> usize {
        self.ip
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_tracing(&self) -> bool {
        self.trace
    }

    /// Turn tracing on or off without executing TRACE.
    pub fn set_tracing(&mut self, enabled: bool) {
        self.trace = enabled;
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Emit a point-in-time snapshot of the whole engine to the sink.
    pub fn dump(&mut self) {
        let mut lines = vec![
            format!("ip: {}", self.ip),
            format!("globals: {:?}", self.globals.as_slice()),
            format!("stack: {:?}", self.stack.as_slice()),
        ];
        let depth = self.frames.depth();
        for (offset, frame) in self.frames.iter().enumerate() {
            let ret = match frame.return_address {
                Some(address) => address.to_string(),
                None => "-".to_string(),
            };
            lines.push(format!(
                "frame {}: return {ret}, locals: {:?}",
                depth - 1 - offset,
                frame.locals
            ));
        }
        for line in &lines {
            self.sink.emit(line);
        }
    }

    pub(crate) fn push(&mut self, value: Word) -> Result<(), RuntimeError> {
        self.stack.push(value, self.ip)
    }

    pub(crate) fn pop(&mut self) -> Result<Word, RuntimeError> {
        self.stack.pop(self.ip)
    }

    /// Emit a `TRACE:` line when tracing is on.
    pub(crate) fn trace_line(&mut self, message: std::fmt::Arguments<'_>) {
        if self.trace {
            self.sink.emit(&format!("TRACE: {message}"));
        }
    }

    pub(crate) fn trace_stack(&mut self) {
        if self.trace {
            let line = format!("TRACE:       stack: {:?}", self.stack.as_slice());
            self.sink.emit(&line);
        }
    }
}
