//! Instruction decoding and encoding for SimpleVM word streams.
//!
//! An instruction occupies one opcode word followed by as many operand
//! words as [`Opcode::operand_count`] declares:
//! ```text
//! [CONST, 13]   two words
//! [ADD]         one word
//! ```

use std::fmt;

use crate::error::DecodeError;
use crate::opcode::Opcode;

/// A machine word. Every stack slot, local, global and program word is one.
pub type Word = i64;

/// A single decoded instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    /// The operation to perform.
    pub opcode: Opcode,
    /// The literal operand, present exactly when the opcode declares one.
    pub operand: Option<Word>,
}

impl Instruction {
    /// An instruction with no operand.
    pub fn op(opcode: Opcode) -> Self {
        Self {
            opcode,
            operand: None,
        }
    }

    /// An instruction carrying a literal operand.
    pub fn with_operand(opcode: Opcode, operand: Word) -> Self {
        Self {
            opcode,
            operand: Some(operand),
        }
    }

    /// Number of words this instruction occupies in a stream.
    pub fn width(&self) -> usize {
        1 + self.opcode.operand_count()
    }

    /// Decode the instruction starting at `words[at]`.
    ///
    /// Returns the instruction and the number of words it consumed.
    pub fn decode(words: &[Word], at: usize) -> Result<(Self, usize), DecodeError> {
        let value = *words.get(at).ok_or(DecodeError::OutOfBounds { at })?;
        let opcode =
            Opcode::try_from(value).map_err(|value| DecodeError::UnknownOpcode { at, value })?;

        let instr = match opcode.operand_count() {
            0 => Self::op(opcode),
            _ => {
                let operand = *words
                    .get(at + 1)
                    .ok_or(DecodeError::MissingOperand { at, opcode })?;
                Self::with_operand(opcode, operand)
            }
        };

        Ok((instr, instr.width()))
    }

    /// Append this instruction's words to `out`.
    pub fn encode_into(&self, out: &mut Vec<Word>) {
        out.push(self.opcode.code());
        if self.opcode.operand_count() > 0 {
            out.push(self.operand.unwrap_or(0));
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operand {
            Some(operand) => write!(f, "{} {operand}", self.opcode),
            None => write!(f, "{}", self.opcode),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_zero_operand() {
        let words = [Opcode::Add.code()];
        assert_eq!(
            Instruction::decode(&words, 0),
            Ok((Instruction::op(Opcode::Add), 1))
        );
    }

    #[test]
    fn decode_one_operand() {
        let words = [Opcode::Nop.code(), Opcode::Const.code(), -13];
        assert_eq!(
            Instruction::decode(&words, 1),
            Ok((Instruction::with_operand(Opcode::Const, -13), 2))
        );
    }

    #[test]
    fn operand_word_is_not_reinterpreted_as_opcode() {
        // The operand 20 is the ADD code point but belongs to CONST.
        let words = [Opcode::Const.code(), Opcode::Add.code(), Opcode::Pop.code()];
        let (first, width) = Instruction::decode(&words, 0).unwrap();
        assert_eq!(first, Instruction::with_operand(Opcode::Const, 20));
        let (second, _) = Instruction::decode(&words, width).unwrap();
        assert_eq!(second, Instruction::op(Opcode::Pop));
    }

    #[test]
    fn decode_rejects_unknown_opcode() {
        let words = [Opcode::Nop.code(), 999];
        assert_eq!(
            Instruction::decode(&words, 1),
            Err(DecodeError::UnknownOpcode { at: 1, value: 999 })
        );
    }

    #[test]
    fn decode_rejects_truncated_operand() {
        let words = [Opcode::Jmp.code()];
        assert_eq!(
            Instruction::decode(&words, 0),
            Err(DecodeError::MissingOperand {
                at: 0,
                opcode: Opcode::Jmp
            })
        );
    }

    #[test]
    fn decode_past_end_is_out_of_bounds() {
        assert_eq!(
            Instruction::decode(&[], 0),
            Err(DecodeError::OutOfBounds { at: 0 })
        );
    }

    #[test]
    fn encode_writes_operand_only_when_declared() {
        let mut out = Vec::new();
        Instruction::with_operand(Opcode::Gstore, 3).encode_into(&mut out);
        Instruction::op(Opcode::Ret).encode_into(&mut out);
        assert_eq!(out, vec![51, 3, 61]);
    }

    #[test]
    fn display_formats() {
        assert_eq!(Instruction::op(Opcode::Halt).to_string(), "HALT");
        assert_eq!(
            Instruction::with_operand(Opcode::Jnz, 13).to_string(),
            "JNZ 13"
        );
    }

    #[test]
    fn width_follows_arity() {
        assert_eq!(Instruction::op(Opcode::Print).width(), 1);
        assert_eq!(Instruction::with_operand(Opcode::Call, 3).width(), 2);
    }
}
