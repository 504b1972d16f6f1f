//! Decode and load errors for SimpleVM word streams.

use thiserror::Error;

use crate::instruction::Word;
use crate::opcode::Opcode;

/// Errors that occur while decoding an instruction from a word stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The word at `at` is not a member of the opcode table.
    #[error("unrecognized opcode {value} at {at}")]
    UnknownOpcode { at: usize, value: Word },

    /// The opcode at `at` declares an operand that is not in the stream.
    #[error("{opcode} at {at} is missing its operand")]
    MissingOperand { at: usize, opcode: Opcode },

    /// Decoding was asked to start past the end of the stream.
    #[error("no instruction at {at}")]
    OutOfBounds { at: usize },
}

impl DecodeError {
    /// Index of the opcode word that failed to decode.
    pub fn at(&self) -> usize {
        match self {
            DecodeError::UnknownOpcode { at, .. }
            | DecodeError::MissingOperand { at, .. }
            | DecodeError::OutOfBounds { at } => *at,
        }
    }
}

/// Errors that occur while loading a program from its textual word list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A token that is not a signed decimal integer.
    #[error("line {line}: invalid word '{token}'")]
    InvalidWord { line: usize, token: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_unknown_opcode() {
        assert_eq!(
            DecodeError::UnknownOpcode { at: 7, value: 99 }.to_string(),
            "unrecognized opcode 99 at 7"
        );
    }

    #[test]
    fn display_missing_operand() {
        assert_eq!(
            DecodeError::MissingOperand {
                at: 3,
                opcode: Opcode::Const
            }
            .to_string(),
            "CONST at 3 is missing its operand"
        );
    }

    #[test]
    fn display_invalid_word() {
        assert_eq!(
            ParseError::InvalidWord {
                line: 2,
                token: "ADD".into()
            }
            .to_string(),
            "line 2: invalid word 'ADD'"
        );
    }

    #[test]
    fn at_reports_opcode_index() {
        assert_eq!(DecodeError::UnknownOpcode { at: 4, value: -1 }.at(), 4);
    }
}
