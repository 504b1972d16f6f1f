//! Runtime faults for the SimpleVM engine.
//!
//! Every fault ends the current run. Each variant carries the index of
//! the instruction that triggered it (`at`) for debugging.

use simplevm_common::{DecodeError, Opcode, Word};
use thiserror::Error;

/// Errors that terminate program execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// The word at `at` is not a known opcode.
    #[error("unrecognized opcode {value} at instruction {at}")]
    UnknownOpcode { at: usize, value: Word },

    /// An opcode's declared operand is missing from the end of the program.
    #[error("{opcode} at instruction {at} is missing its operand")]
    MissingOperand { at: usize, opcode: Opcode },

    /// RET executed with only the bottom frame on the call stack.
    #[error("unbalanced RET at instruction {at}: no caller to return to")]
    UnbalancedReturn { at: usize },

    /// The program executed FATAL.
    #[error("FATAL at instruction {at}")]
    Fatal { at: usize },

    /// DIV or MOD with a zero divisor.
    #[error("division by zero at instruction {at}")]
    DivisionByZero { at: usize },

    /// Push onto a full operand stack.
    #[error("stack overflow at instruction {at} (capacity {capacity})")]
    StackOverflow { at: usize, capacity: usize },

    /// Pop from an empty operand stack.
    #[error("stack underflow at instruction {at}")]
    StackUnderflow { at: usize },

    /// LOAD or STORE outside the current frame's locals.
    #[error("local slot {index} out of range (size {size}) at instruction {at}")]
    LocalOutOfRange { at: usize, index: Word, size: usize },

    /// GLOAD or GSTORE outside the globals table.
    #[error("global slot {index} out of range (size {size}) at instruction {at}")]
    GlobalOutOfRange { at: usize, index: Word, size: usize },

    /// A jump or call resolved to a negative address.
    #[error("invalid jump target {target} at instruction {at}")]
    InvalidJumpTarget { at: usize, target: Word },

    /// A relative jump whose offset overflows the address space.
    #[error("relative jump offset {offset} out of range at instruction {at}")]
    JumpOffsetOverflow { at: usize, offset: Word },

    /// Decode requested past the last word of the program.
    #[error("no instruction at {at}")]
    ProgramOutOfBounds { at: usize },

    /// CALL with the frame stack already at its configured depth.
    #[error("call stack overflow at instruction {at} (limit {limit})")]
    CallStackOverflow { at: usize, limit: usize },

    /// The configured instruction budget ran out.
    #[error("step limit {limit} exceeded at instruction {at}")]
    StepLimitExceeded { at: usize, limit: u64 },
}

impl RuntimeError {
    /// Index of the instruction that faulted.
    pub fn at(&self) -> usize {
        match self {
            RuntimeError::UnknownOpcode { at, .. }
            | RuntimeError::MissingOperand { at, .. }
            | RuntimeError::UnbalancedReturn { at }
            | RuntimeError::Fatal { at }
            | RuntimeError::DivisionByZero { at }
            | RuntimeError::StackOverflow { at, .. }
            | RuntimeError::StackUnderflow { at }
            | RuntimeError::LocalOutOfRange { at, .. }
            | RuntimeError::GlobalOutOfRange { at, .. }
            | RuntimeError::InvalidJumpTarget { at, .. }
            | RuntimeError::JumpOffsetOverflow { at, .. }
            | RuntimeError::ProgramOutOfBounds { at }
            | RuntimeError::CallStackOverflow { at, .. }
            | RuntimeError::StepLimitExceeded { at, .. } => *at,
        }
    }

    /// True for call/return mismatches in the program structure, as
    /// opposed to faults caused by the data being computed.
    pub fn is_structural(&self) -> bool {
        matches!(self, RuntimeError::UnbalancedReturn { .. })
    }
}

impl From<DecodeError> for RuntimeError {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::UnknownOpcode { at, value } => RuntimeError::UnknownOpcode { at, value },
            DecodeError::MissingOperand { at, opcode } => {
                RuntimeError::MissingOperand { at, opcode }
            }
            DecodeError::OutOfBounds { at } => RuntimeError::ProgramOutOfBounds { at },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formats() {
        assert_eq!(
            RuntimeError::DivisionByZero { at: 5 }.to_string(),
            "division by zero at instruction 5"
        );
        assert_eq!(
            RuntimeError::UnbalancedReturn { at: 0 }.to_string(),
            "unbalanced RET at instruction 0: no caller to return to"
        );
        assert_eq!(
            RuntimeError::UnknownOpcode { at: 2, value: 77 }.to_string(),
            "unrecognized opcode 77 at instruction 2"
        );
        assert_eq!(
            RuntimeError::MissingOperand {
                at: 4,
                opcode: Opcode::Const
            }
            .to_string(),
            "CONST at instruction 4 is missing its operand"
        );
    }

    #[test]
    fn only_unbalanced_return_is_structural() {
        assert!(RuntimeError::UnbalancedReturn { at: 3 }.is_structural());
        assert!(!RuntimeError::Fatal { at: 3 }.is_structural());
        assert!(!RuntimeError::StackUnderflow { at: 3 }.is_structural());
    }

    #[test]
    fn at_reports_instruction_index() {
        assert_eq!(RuntimeError::Fatal { at: 9 }.at(), 9);
        assert_eq!(
            RuntimeError::GlobalOutOfRange {
                at: 11,
                index: 40,
                size: 32
            }
            .at(),
            11
        );
    }

    #[test]
    fn decode_errors_convert() {
        let err: RuntimeError = DecodeError::UnknownOpcode { at: 1, value: -4 }.into();
        assert_eq!(err, RuntimeError::UnknownOpcode { at: 1, value: -4 });

        let err: RuntimeError = DecodeError::OutOfBounds { at: 12 }.into();
        assert_eq!(err, RuntimeError::ProgramOutOfBounds { at: 12 });
        assert_eq!(err.to_string(), "no instruction at 12");
    }
}
