//! Opcode definitions for the SimpleVM instruction set.
//!
//! Codes are grouped by decade: control and I/O in 0-9, stack in 10-19,
//! arithmetic in 20-29, comparison in 30-39, branching in 40-49, globals
//! in 50-59 and functions in 60-69.

use std::fmt;

use crate::instruction::Word;

/// Identifies the operation to perform.
///
/// The `#[repr(i64)]` attribute gives every variant its stable code point
/// in the word stream.
#[repr(i64)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    // Control
    /// No effect.
    Nop = 0,
    /// Emit the full engine state to the diagnostic sink.
    Dump = 1,
    /// Toggle the trace flag.
    Trace = 2,
    /// Pop one value and emit it to the diagnostic sink.
    Print = 3,
    /// Stop execution successfully.
    Halt = 4,
    /// Stop execution with an unrecoverable fault.
    Fatal = 5,

    // Stack
    /// Push the literal operand.
    Const = 10,
    /// Discard the top value.
    Pop = 11,

    // Arithmetic
    /// Pop rhs, pop lhs, push lhs + rhs.
    Add = 20,
    /// Pop rhs, pop lhs, push lhs - rhs.
    Sub = 21,
    /// Pop rhs, pop lhs, push lhs * rhs.
    Mul = 22,
    /// Pop rhs, pop lhs, push lhs / rhs. Division by zero faults.
    Div = 23,
    /// Pop rhs, pop lhs, push lhs % rhs. Division by zero faults.
    Mod = 24,
    /// Pop one value, push its absolute value.
    Abs = 25,
    /// Pop one value, push its negation.
    Neg = 26,

    // Comparison
    /// Push 1 if lhs == rhs, else 0.
    Eq = 30,
    /// Push 1 if lhs != rhs, else 0.
    Neq = 31,
    /// Push 1 if lhs > rhs, else 0.
    Gt = 32,
    /// Push 1 if lhs < rhs, else 0.
    Lt = 33,
    /// Push 1 if lhs >= rhs, else 0.
    Gte = 34,
    /// Push 1 if lhs <= rhs, else 0.
    Lte = 35,

    // Branching
    /// Jump to the literal absolute target.
    Jmp = 40,
    /// Jump by the literal offset, relative to the next instruction.
    Rjmp = 41,
    /// Pop an absolute target and jump to it.
    Jmpi = 42,
    /// Pop an offset and jump by it, relative to the next instruction.
    Rjmpi = 43,
    /// Pop a value, jump to the literal target if it is zero.
    Jz = 44,
    /// Pop a value, jump to the literal target if it is nonzero.
    Jnz = 45,

    // Globals
    /// Push `globals[operand]`.
    Gload = 50,
    /// Pop into `globals[operand]`.
    Gstore = 51,

    // Functions
    /// Push a frame returning to the next instruction, jump to the operand.
    Call = 60,
    /// Pop the current frame and resume at its return address.
    Ret = 61,
    /// Push the current frame's local `operand`.
    Load = 62,
    /// Pop into the current frame's local `operand`.
    Store = 63,
}

/// All valid opcodes, in definition order. Useful for exhaustive testing.
pub const ALL_OPCODES: [Opcode; 33] = [
    Opcode::Nop,
    Opcode::Dump,
    Opcode::Trace,
    Opcode::Print,
    Opcode::Halt,
    Opcode::Fatal,
    Opcode::Const,
    Opcode::Pop,
    Opcode::Add,
    Opcode::Sub,
    Opcode::Mul,
    Opcode::Div,
    Opcode::Mod,
    Opcode::Abs,
    Opcode::Neg,
    Opcode::Eq,
    Opcode::Neq,
    Opcode::Gt,
    Opcode::Lt,
    Opcode::Gte,
    Opcode::Lte,
    Opcode::Jmp,
    Opcode::Rjmp,
    Opcode::Jmpi,
    Opcode::Rjmpi,
    Opcode::Jz,
    Opcode::Jnz,
    Opcode::Gload,
    Opcode::Gstore,
    Opcode::Call,
    Opcode::Ret,
    Opcode::Load,
    Opcode::Store,
];

impl TryFrom<Word> for Opcode {
    /// The unrecognized word itself.
    type Error = Word;

    fn try_from(value: Word) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Opcode::Nop),
            1 => Ok(Opcode::Dump),
            2 => Ok(Opcode::Trace),
            3 => Ok(Opcode::Print),
            4 => Ok(Opcode::Halt),
            5 => Ok(Opcode::Fatal),

            10 => Ok(Opcode::Const),
            11 => Ok(Opcode::Pop),

            20 => Ok(Opcode::Add),
            21 => Ok(Opcode::Sub),
            22 => Ok(Opcode::Mul),
            23 => Ok(Opcode::Div),
            24 => Ok(Opcode::Mod),
            25 => Ok(Opcode::Abs),
            26 => Ok(Opcode::Neg),

            30 => Ok(Opcode::Eq),
            31 => Ok(Opcode::Neq),
            32 => Ok(Opcode::Gt),
            33 => Ok(Opcode::Lt),
            34 => Ok(Opcode::Gte),
            35 => Ok(Opcode::Lte),

            40 => Ok(Opcode::Jmp),
            41 => Ok(Opcode::Rjmp),
            42 => Ok(Opcode::Jmpi),
            43 => Ok(Opcode::Rjmpi),
            44 => Ok(Opcode::Jz),
            45 => Ok(Opcode::Jnz),

            50 => Ok(Opcode::Gload),
            51 => Ok(Opcode::Gstore),

            60 => Ok(Opcode::Call),
            61 => Ok(Opcode::Ret),
            62 => Ok(Opcode::Load),
            63 => Ok(Opcode::Store),

            other => Err(other),
        }
    }
}

impl Opcode {
    /// The code point this opcode occupies in a word stream.
    pub fn code(self) -> Word {
        self as Word
    }

    /// Number of operand words that trail this opcode in the stream.
    ///
    /// Every decoder must consult this table. Getting an arity wrong
    /// desynchronizes the rest of the program.
    pub fn operand_count(self) -> usize {
        match self {
            Opcode::Const
            | Opcode::Jmp
            | Opcode::Rjmp
            | Opcode::Jz
            | Opcode::Jnz
            | Opcode::Gload
            | Opcode::Gstore
            | Opcode::Call
            | Opcode::Load
            | Opcode::Store => 1,

            Opcode::Nop
            | Opcode::Dump
            | Opcode::Trace
            | Opcode::Print
            | Opcode::Halt
            | Opcode::Fatal
            | Opcode::Pop
            | Opcode::Add
            | Opcode::Sub
            | Opcode::Mul
            | Opcode::Div
            | Opcode::Mod
            | Opcode::Abs
            | Opcode::Neg
            | Opcode::Eq
            | Opcode::Neq
            | Opcode::Gt
            | Opcode::Lt
            | Opcode::Gte
            | Opcode::Lte
            | Opcode::Jmpi
            | Opcode::Rjmpi
            | Opcode::Ret => 0,
        }
    }

    /// True if executing this opcode changes the operand stack.
    pub fn mutates_stack(self) -> bool {
        !matches!(
            self,
            Opcode::Nop
                | Opcode::Dump
                | Opcode::Trace
                | Opcode::Halt
                | Opcode::Fatal
                | Opcode::Jmp
                | Opcode::Rjmp
                | Opcode::Call
                | Opcode::Ret
        )
    }

    /// Returns the upper-case mnemonic for this opcode.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Nop => "NOP",
            Opcode::Dump => "DUMP",
            Opcode::Trace => "TRACE",
            Opcode::Print => "PRINT",
            Opcode::Halt => "HALT",
            Opcode::Fatal => "FATAL",
            Opcode::Const => "CONST",
            Opcode::Pop => "POP",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Div => "DIV",
            Opcode::Mod => "MOD",
            Opcode::Abs => "ABS",
            Opcode::Neg => "NEG",
            Opcode::Eq => "EQ",
            Opcode::Neq => "NEQ",
            Opcode::Gt => "GT",
            Opcode::Lt => "LT",
            Opcode::Gte => "GTE",
            Opcode::Lte => "LTE",
            Opcode::Jmp => "JMP",
            Opcode::Rjmp => "RJMP",
            Opcode::Jmpi => "JMPI",
            Opcode::Rjmpi => "RJMPI",
            Opcode::Jz => "JZ",
            Opcode::Jnz => "JNZ",
            Opcode::Gload => "GLOAD",
            Opcode::Gstore => "GSTORE",
            Opcode::Call => "CALL",
            Opcode::Ret => "RET",
            Opcode::Load => "LOAD",
            Opcode::Store => "STORE",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
