//! Program representation for SimpleVM word streams.
//!
//! A program is a flat sequence of words: opcodes interleaved with their
//! operands. Text files hold the same words as signed decimal integers.

use std::str::FromStr;

use crate::error::{DecodeError, ParseError};
use crate::instruction::{Instruction, Word};

/// A SimpleVM program: an immutable sequence of words.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    words: Vec<Word>,
}

impl Program {
    /// Create a program from raw words.
    pub fn new(words: Vec<Word>) -> Self {
        Self { words }
    }

    /// Encode a list of instructions into a program.
    pub fn from_instructions(instructions: &[Instruction]) -> Self {
        let mut words = Vec::with_capacity(instructions.len() * 2);
        for instr in instructions {
            instr.encode_into(&mut words);
        }
        Self { words }
    }

    /// The raw word stream.
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// Decode the instruction starting at word `ip`.
    pub fn decode_at(&self, ip: usize) -> Result<(Instruction, usize), DecodeError> {
        Instruction::decode(&self.words, ip)
    }

    /// Number of words in the program.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns true if the program has no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl From<Vec<Word>> for Program {
    fn from(words: Vec<Word>) -> Self {
        Self::new(words)
    }
}

impl FromStr for Program {
    type Err = ParseError;

    /// Parse whitespace or comma separated integers. `#` and `//` start a
    /// comment that runs to the end of the line.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut words = Vec::new();

        for (index, raw_line) in text.lines().enumerate() {
            let line = strip_comment(raw_line);
            for token in line
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|t| !t.is_empty())
            {
                let word = token.parse::<Word>().map_err(|_| ParseError::InvalidWord {
                    line: index + 1,
                    token: token.to_string(),
                })?;
                words.push(word);
            }
        }

        Ok(Self { words })
    }
}

fn strip_comment(line: &str) -> &str {
    let cut = [line.find('#'), line.find("//")]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(line.len());
    &line[..cut]
}
