//! Call frames and the call-frame stack.

use simplevm_common::Word;

use crate::error::RuntimeError;

/// Activation record for one function invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallFrame {
    /// Instruction index to resume at after RET. `None` for the bottom frame.
    pub return_address: Option<usize>,
    /// Local slots, zero-initialized.
    pub locals: Vec<Word>,
}

impl CallFrame {
    fn new(return_address: Option<usize>, locals: usize) -> Self {
        Self {
            return_address,
            locals: vec![0; locals],
        }
    }

    /// Read local `index`.
    pub fn load(&self, index: Word, at: usize) -> Result<Word, RuntimeError> {
        let slot = self.slot(index, at)?;
        Ok(self.locals[slot])
    }

    /// Write local `index`.
    pub fn store(&mut self, index: Word, value: Word, at: usize) -> Result<(), RuntimeError> {
        let slot = self.slot(index, at)?;
        self.locals[slot] = value;
        Ok(())
    }

    fn slot(&self, index: Word, at: usize) -> Result<usize, RuntimeError> {
        usize::try_from(index)
            .ok()
            .filter(|&slot| slot < self.locals.len())
            .ok_or(RuntimeError::LocalOutOfRange {
                at,
                index,
                size: self.locals.len(),
            })
    }
}

/// LIFO stack of call frames. Never empty: the bottom frame lives for the
/// lifetime of the VM.
#[derive(Debug, Clone)]
pub struct CallStack {
    frames: Vec<CallFrame>,
    locals_per_frame: usize,
    max_depth: usize,
}

impl CallStack {
    /// A call stack holding only the bottom frame.
    pub fn new(locals_per_frame: usize, max_depth: usize) -> Self {
        Self {
            frames: vec![CallFrame::new(None, locals_per_frame)],
            locals_per_frame,
            max_depth,
        }
    }

    /// Enter a new frame that returns to `return_address`.
    pub fn push(&mut self, return_address: usize, at: usize) -> Result<(), RuntimeError> {
        if self.frames.len() >= self.max_depth {
            return Err(RuntimeError::CallStackOverflow {
                at,
                limit: self.max_depth,
            });
        }
        self.frames
            .push(CallFrame::new(Some(return_address), self.locals_per_frame));
        Ok(())
    }

    /// Leave the current frame and return its return address.
    ///
    /// Fails with `UnbalancedReturn` when only the bottom frame remains.
    pub fn pop(&mut self, at: usize) -> Result<usize, RuntimeError> {
        if self.frames.len() <= 1 {
            return Err(RuntimeError::UnbalancedReturn { at });
        }
        match self.frames.pop() {
            Some(CallFrame {
                return_address: Some(address),
                ..
            }) => Ok(address),
            _ => Err(RuntimeError::UnbalancedReturn { at }),
        }
    }

    pub fn current(&self) -> &CallFrame {
        // The bottom frame is never popped.
        &self.frames[self.frames.len() - 1]
    }

    pub fn current_mut(&mut self) -> &mut CallFrame {
        let top = self.frames.len() - 1;
        &mut self.frames[top]
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Frames from innermost to outermost.
    pub fn iter(&self) -> impl Iterator<Item = &CallFrame> {
        self.frames.iter().rev()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_bottom_frame() {
        let calls = CallStack::new(4, 8);
        assert_eq!(calls.depth(), 1);
        assert_eq!(calls.current().return_address, None);
        assert_eq!(calls.current().locals, vec![0; 4]);
    }

    #[test]
    fn push_pop_restores_depth() {
        let mut calls = CallStack::new(4, 8);
        calls.push(17, 3).unwrap();
        assert_eq!(calls.depth(), 2);
        assert_eq!(calls.pop(9), Ok(17));
        assert_eq!(calls.depth(), 1);
    }

    #[test]
    fn pop_bottom_frame_is_unbalanced() {
        let mut calls = CallStack::new(4, 8);
        assert_eq!(calls.pop(5), Err(RuntimeError::UnbalancedReturn { at: 5 }));
        assert_eq!(calls.depth(), 1);
    }

    #[test]
    fn depth_limit_counts_bottom_frame() {
        let mut calls = CallStack::new(1, 2);
        calls.push(0, 0).unwrap();
        assert_eq!(
            calls.push(0, 4),
            Err(RuntimeError::CallStackOverflow { at: 4, limit: 2 })
        );
    }

    #[test]
    fn new_frames_get_fresh_locals() {
        let mut calls = CallStack::new(2, 8);
        calls.current_mut().store(0, 42, 0).unwrap();
        calls.push(10, 0).unwrap();
        assert_eq!(calls.current().load(0, 0), Ok(0));
        calls.pop(0).unwrap();
        assert_eq!(calls.current().load(0, 0), Ok(42));
    }

    #[test]
    fn local_bounds_are_checked() {
        let mut frame = CallFrame::new(None, 2);
        assert_eq!(
            frame.load(2, 6),
            Err(RuntimeError::LocalOutOfRange {
                at: 6,
                index: 2,
                size: 2
            })
        );
        assert_eq!(
            frame.store(-1, 5, 6),
            Err(RuntimeError::LocalOutOfRange {
                at: 6,
                index: -1,
                size: 2
            })
        );
    }

    #[test]
    fn iter_is_innermost_first() {
        let mut calls = CallStack::new(1, 8);
        calls.push(5, 0).unwrap();
        calls.push(9, 0).unwrap();
        let returns: Vec<_> = calls.iter().map(|f| f.return_address).collect();
        assert_eq!(returns, vec![Some(9), Some(5), None]);
    }
}
