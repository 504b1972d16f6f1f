//! Fixed-capacity operand stack.

use simplevm_common::Word;

use crate::error::RuntimeError;

/// The operand stack. Never grows past the capacity it was built with.
#[derive(Debug, Clone)]
pub struct OperandStack {
    slots: Vec<Word>,
    capacity: usize,
}

impl OperandStack {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a value, failing with `StackOverflow` when full.
    pub fn push(&mut self, value: Word, at: usize) -> Result<(), RuntimeError> {
        if self.slots.len() >= self.capacity {
            return Err(RuntimeError::StackOverflow {
                at,
                capacity: self.capacity,
            });
        }
        self.slots.push(value);
        Ok(())
    }

    /// Pop the top value, failing with `StackUnderflow` when empty.
    pub fn pop(&mut self, at: usize) -> Result<Word, RuntimeError> {
        self.slots.pop().ok_or(RuntimeError::StackUnderflow { at })
    }

    pub fn peek(&self) -> Option<Word> {
        self.slots.last().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Live values, bottom first.
    pub fn as_slice(&self) -> &[Word] {
        &self.slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_pop_is_lifo() {
        let mut stack = OperandStack::new(4);
        stack.push(1, 0).unwrap();
        stack.push(2, 0).unwrap();
        assert_eq!(stack.peek(), Some(2));
        assert_eq!(stack.pop(0), Ok(2));
        assert_eq!(stack.pop(0), Ok(1));
        assert!(stack.is_empty());
    }

    #[test]
    fn overflow_at_capacity() {
        let mut stack = OperandStack::new(2);
        stack.push(1, 0).unwrap();
        stack.push(2, 1).unwrap();
        assert_eq!(
            stack.push(3, 2),
            Err(RuntimeError::StackOverflow { at: 2, capacity: 2 })
        );
        assert_eq!(stack.as_slice(), &[1, 2]);
    }

    #[test]
    fn underflow_when_empty() {
        let mut stack = OperandStack::new(2);
        assert_eq!(stack.pop(7), Err(RuntimeError::StackUnderflow { at: 7 }));
    }

    #[test]
    fn zero_capacity_rejects_every_push() {
        let mut stack = OperandStack::new(0);
        assert!(stack.push(1, 0).is_err());
    }
}
