//! Main execution loop and opcode dispatch for the SimpleVM engine.

use simplevm_common::{Instruction, Opcode, Program, Word};
use tracing::debug;

use crate::error::RuntimeError;
use crate::machine::{Status, Termination, VM};
use crate::sink::Sink;

/// What the dispatch loop does after an instruction has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Fall through to the next instruction.
    Next,
    /// Continue at this absolute word index.
    Jump(usize),
    /// Stop the run successfully.
    Halt,
}

impl<S: Sink> VM<S> {
    /// Execute `program` from word 0 until HALT, the end of the program,
    /// or a fault.
    pub fn execute(&mut self, program: &Program) -> Result<Termination, RuntimeError> {
        debug!(words = program.len(), "execute start");
        self.ip = 0;

        let result = self.run_loop(program);
        match &result {
            Ok(termination) => {
                self.status = Status::Halted;
                debug!(?termination, ip = self.ip, "execute finished");
            }
            Err(err) => {
                self.status = Status::Faulted;
                debug!(error = %err, ip = err.at(), "execute faulted");
            }
        }
        result
    }

    /// Execute one decoded instruction against the current state.
    ///
    /// The instruction is treated as if it sat at the current ip: the ip
    /// afterwards is the jump target, or the word after the instruction.
    pub fn step(&mut self, instr: Instruction) -> Result<Control, RuntimeError> {
        self.dispatch(instr, instr.width())
    }

    fn run_loop(&mut self, program: &Program) -> Result<Termination, RuntimeError> {
        let mut steps: u64 = 0;

        while self.ip < program.len() {
            if let Some(limit) = self.config.max_steps {
                if steps >= limit {
                    return Err(RuntimeError::StepLimitExceeded { at: self.ip, limit });
                }
            }
            steps += 1;

            let (instr, width) = program.decode_at(self.ip)?;
            if self.dispatch(instr, width)? == Control::Halt {
                return Ok(Termination::Halted { at: self.ip });
            }
        }

        Ok(Termination::EndOfProgram)
    }

    /// Apply `instr` located at the current ip and move the ip.
    fn dispatch(&mut self, instr: Instruction, width: usize) -> Result<Control, RuntimeError> {
        let at = self.ip;
        let next = at + width;

        if instr.opcode != Opcode::Trace {
            self.trace_line(format_args!("{at:04} {instr}"));
        }

        let control = self.apply(instr, at, next)?;
        match control {
            Control::Next => self.ip = next,
            Control::Jump(target) => self.ip = target,
            Control::Halt => {}
        }

        if instr.opcode.mutates_stack() {
            self.trace_stack();
        }
        Ok(control)
    }

    fn apply(
        &mut self,
        instr: Instruction,
        at: usize,
        next: usize,
    ) -> Result<Control, RuntimeError> {
        match instr.opcode {
            // Control
            Opcode::Nop => {}
            Opcode::Dump => self.dump(),
            Opcode::Trace => {
                self.trace = !self.trace;
                self.trace_line(format_args!("{at:04} {instr}"));
            }
            Opcode::Print => {
                let value = self.pop()?;
                self.sink.emit(&value.to_string());
            }
            Opcode::Halt => return Ok(Control::Halt),
            Opcode::Fatal => return Err(RuntimeError::Fatal { at }),

            // Stack
            Opcode::Const => {
                let value = operand(instr, at)?;
                self.push(value)?;
            }
            Opcode::Pop => {
                self.pop()?;
            }

            // Arithmetic
            Opcode::Add => self.binary(|lhs, rhs| Ok(lhs.wrapping_add(rhs)))?,
            Opcode::Sub => self.binary(|lhs, rhs| Ok(lhs.wrapping_sub(rhs)))?,
            Opcode::Mul => self.binary(|lhs, rhs| Ok(lhs.wrapping_mul(rhs)))?,
            Opcode::Div => self.binary(|lhs, rhs| match rhs {
                0 => Err(RuntimeError::DivisionByZero { at }),
                _ => Ok(lhs.wrapping_div(rhs)),
            })?,
            Opcode::Mod => self.binary(|lhs, rhs| match rhs {
                0 => Err(RuntimeError::DivisionByZero { at }),
                _ => Ok(lhs.wrapping_rem(rhs)),
            })?,
            Opcode::Abs => self.unary(Word::wrapping_abs)?,
            Opcode::Neg => self.unary(Word::wrapping_neg)?,

            // Comparison
            Opcode::Eq => self.compare(|lhs, rhs| lhs == rhs)?,
            Opcode::Neq => self.compare(|lhs, rhs| lhs != rhs)?,
            Opcode::Gt => self.compare(|lhs, rhs| lhs > rhs)?,
            Opcode::Lt => self.compare(|lhs, rhs| lhs < rhs)?,
            Opcode::Gte => self.compare(|lhs, rhs| lhs >= rhs)?,
            Opcode::Lte => self.compare(|lhs, rhs| lhs <= rhs)?,

            // Branching
            Opcode::Jmp => return Ok(Control::Jump(absolute(operand(instr, at)?, at)?)),
            Opcode::Rjmp => return Ok(Control::Jump(relative(next, operand(instr, at)?, at)?)),
            Opcode::Jmpi => {
                let target = self.pop()?;
                return Ok(Control::Jump(absolute(target, at)?));
            }
            Opcode::Rjmpi => {
                let offset = self.pop()?;
                return Ok(Control::Jump(relative(next, offset, at)?));
            }
            Opcode::Jz | Opcode::Jnz => {
                let target = operand(instr, at)?;
                let value = self.pop()?;
                let taken = (value == 0) == (instr.opcode == Opcode::Jz);
                if taken {
                    return Ok(Control::Jump(absolute(target, at)?));
                }
            }

            // Globals
            Opcode::Gload => {
                let value = self.globals.load(operand(instr, at)?, at)?;
                self.push(value)?;
            }
            Opcode::Gstore => {
                let index = operand(instr, at)?;
                let value = self.pop()?;
                self.globals.store(index, value, at)?;
            }

            // Functions
            Opcode::Call => {
                let entry = absolute(operand(instr, at)?, at)?;
                self.frames.push(next, at)?;
                return Ok(Control::Jump(entry));
            }
            Opcode::Ret => {
                let resume = self.frames.pop(at)?;
                return Ok(Control::Jump(resume));
            }
            Opcode::Load => {
                let value = self.frames.current().load(operand(instr, at)?, at)?;
                self.push(value)?;
            }
            Opcode::Store => {
                let index = operand(instr, at)?;
                let value = self.pop()?;
                self.frames.current_mut().store(index, value, at)?;
            }
        }

        Ok(Control::Next)
    }

    /// Pop rhs, then lhs, push `op(lhs, rhs)`.
    fn binary<F>(&mut self, op: F) -> Result<(), RuntimeError>
    where
        F: FnOnce(Word, Word) -> Result<Word, RuntimeError>,
    {
        let rhs = self.pop()?;
        let lhs = self.pop()?;
        let result = op(lhs, rhs)?;
        self.push(result)
    }

    fn unary(&mut self, op: fn(Word) -> Word) -> Result<(), RuntimeError> {
        let value = self.pop()?;
        self.push(op(value))
    }

    /// Pop rhs, then lhs, push 1 if the relation holds else 0.
    fn compare(&mut self, op: fn(Word, Word) -> bool) -> Result<(), RuntimeError> {
        let rhs = self.pop()?;
        let lhs = self.pop()?;
        self.push(Word::from(op(lhs, rhs)))
    }
}

fn operand(instr: Instruction, at: usize) -> Result<Word, RuntimeError> {
    instr.operand.ok_or(RuntimeError::MissingOperand {
        at,
        opcode: instr.opcode,
    })
}

fn absolute(target: Word, at: usize) -> Result<usize, RuntimeError> {
    usize::try_from(target).map_err(|_| RuntimeError::InvalidJumpTarget { at, target })
}

/// Offsets count from the word after the jump instruction.
fn relative(next: usize, offset: Word, at: usize) -> Result<usize, RuntimeError> {
    let base = Word::try_from(next).unwrap_or(Word::MAX);
    let target = base
        .checked_add(offset)
        .ok_or(RuntimeError::JumpOffsetOverflow { at, offset })?;
    absolute(target, at)
}
