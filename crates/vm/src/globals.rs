//! Fixed-size globals table shared by every frame.

use simplevm_common::Word;

use crate::error::RuntimeError;

#[derive(Debug, Clone)]
pub struct Globals {
    slots: Vec<Word>,
}

impl Globals {
    /// A zeroed table of `size` slots.
    pub fn new(size: usize) -> Self {
        Self {
            slots: vec![0; size],
        }
    }

    pub fn load(&self, index: Word, at: usize) -> Result<Word, RuntimeError> {
        let slot = self.slot(index, at)?;
        Ok(self.slots[slot])
    }

    pub fn store(&mut self, index: Word, value: Word, at: usize) -> Result<(), RuntimeError> {
        let slot = self.slot(index, at)?;
        self.slots[slot] = value;
        Ok(())
    }

    pub fn as_slice(&self) -> &[Word] {
        &self.slots
    }

    fn slot(&self, index: Word, at: usize) -> Result<usize, RuntimeError> {
        usize::try_from(index)
            .ok()
            .filter(|&slot| slot < self.slots.len())
            .ok_or(RuntimeError::GlobalOutOfRange {
                at,
                index,
                size: self.slots.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_zeroed() {
        assert_eq!(Globals::new(3).as_slice(), &[0, 0, 0]);
    }

    #[test]
    fn store_then_load() {
        let mut globals = Globals::new(4);
        globals.store(3, -8, 0).unwrap();
        assert_eq!(globals.load(3, 0), Ok(-8));
    }

    #[test]
    fn out_of_range() {
        let globals = Globals::new(4);
        assert_eq!(
            globals.load(4, 2),
            Err(RuntimeError::GlobalOutOfRange {
                at: 2,
                index: 4,
                size: 4
            })
        );
        assert!(globals.load(-1, 2).is_err());
    }
}
