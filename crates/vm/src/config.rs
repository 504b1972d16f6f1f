//! Resource bounds for a VM instance.
//!
//! All capacities are fixed when the VM is constructed. Exceeding one is
//! a fault, never a resize.

/// Default operand stack capacity.
pub const DEFAULT_STACK_CAPACITY: usize = 100;
/// Default number of local slots in each call frame.
pub const DEFAULT_LOCALS_PER_FRAME: usize = 32;
/// Default size of the globals table.
pub const DEFAULT_GLOBALS_CAPACITY: usize = 32;
/// Default maximum number of call frames, bottom frame included.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 256;

/// Configuration for a [`VM`](crate::VM).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VmConfig {
    /// Maximum number of values on the operand stack.
    pub stack_capacity: usize,
    /// Local slots per call frame.
    pub locals_per_frame: usize,
    /// Slots in the globals table.
    pub globals_capacity: usize,
    /// Maximum call-frame depth, counting the bottom frame.
    pub max_call_depth: usize,
    /// Optional budget of executed instructions per `execute` call.
    pub max_steps: Option<u64>,
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            stack_capacity: DEFAULT_STACK_CAPACITY,
            locals_per_frame: DEFAULT_LOCALS_PER_FRAME,
            globals_capacity: DEFAULT_GLOBALS_CAPACITY,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            max_steps: None,
        }
    }
}

impl VmConfig {
    pub fn with_stack_capacity(mut self, capacity: usize) -> Self {
        self.stack_capacity = capacity;
        self
    }

    pub fn with_locals_per_frame(mut self, slots: usize) -> Self {
        self.locals_per_frame = slots;
        self
    }

    pub fn with_globals_capacity(mut self, slots: usize) -> Self {
        self.globals_capacity = slots;
        self
    }

    /// Values below 1 are raised to 1 so the bottom frame always fits.
    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth.max(1);
        self
    }

    pub fn with_max_steps(mut self, steps: Option<u64>) -> Self {
        self.max_steps = steps;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_sizes() {
        let config = VmConfig::default();
        assert_eq!(config.stack_capacity, 100);
        assert_eq!(config.locals_per_frame, 32);
        assert_eq!(config.globals_capacity, 32);
        assert_eq!(config.max_steps, None);
    }

    #[test]
    fn builder_overrides() {
        let config = VmConfig::default()
            .with_stack_capacity(4)
            .with_globals_capacity(8)
            .with_locals_per_frame(2)
            .with_max_steps(Some(1000));
        assert_eq!(config.stack_capacity, 4);
        assert_eq!(config.globals_capacity, 8);
        assert_eq!(config.locals_per_frame, 2);
        assert_eq!(config.max_steps, Some(1000));
    }

    #[test]
    fn call_depth_never_below_one() {
        assert_eq!(VmConfig::default().with_max_call_depth(0).max_call_depth, 1);
    }
}
