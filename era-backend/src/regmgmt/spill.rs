//! Spill Slot Accounting
//!
//! Spill slots are ebp-relative 4-byte cells handed out in increasing offset
//! order. A slot is never handed out twice within one emission, so the
//! largest offset seen is the size of the spill area.

use era_codegen::{CallingConvention, Reg};

/// One register saved to the stack, to be reloaded later
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpillRecord {
    pub reg: Reg,
    pub offset: u32,
}

/// Per-emission spill slot allocator
#[derive(Debug, Clone, Default)]
pub struct SpillSlots {
    max_offset: u32,
}

impl SpillSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a fresh slot for `reg`
    pub fn alloc(&mut self, reg: Reg) -> SpillRecord {
        let offset = self.max_offset + CallingConvention::SLOT_SIZE;
        self.max_offset = offset;
        SpillRecord { reg, offset }
    }

    /// Deepest offset handed out so far
    pub fn max_offset(&self) -> u32 {
        self.max_offset
    }
}
