//! SimpleVM common types and word-stream encoding.
//!
//! This crate provides the foundational data structures for the SimpleVM
//! instruction set:
//!
//! - [`Opcode`] — the closed opcode table with per-opcode arity
//! - [`Instruction`] — one decoded opcode with its optional operand
//! - [`Program`] — an immutable word stream
//! - [`DecodeError`] / [`ParseError`] — decoding and text loading errors
//!
//! # Dependencies
//!
//! This crate uses `thiserror` (compile-time proc-macro, zero runtime cost)
//! and has no other dependencies.

pub mod error;
pub mod instruction;
pub mod opcode;
pub mod program;

// Re-export commonly used types at the crate root.
pub use error::{DecodeError, ParseError};
pub use instruction::{Instruction, Word};
pub use opcode::Opcode;
pub use program::Program;
