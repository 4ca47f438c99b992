//! Register Windows
//!
//! A window is the ordered set of registers a subtree may clobber. The last
//! register is the top: the subtree leaves its result there. Windows are
//! small `Copy` values; narrowing or reordering one produces a new window and
//! never disturbs the caller's.

use era_codegen::Reg;
use std::fmt;

/// Largest pool the target supports
pub const MAX_POOL_SIZE: usize = 3;

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RegWindow {
    regs: [Reg; MAX_POOL_SIZE],
    len: usize,
}

impl RegWindow {
    /// Window over `regs`, bottom first
    pub(crate) fn new(regs: &[Reg]) -> Self {
        assert!(regs.len() <= MAX_POOL_SIZE, "window of {} registers", regs.len());

        let mut window = Self {
            regs: [Reg::Eax; MAX_POOL_SIZE],
            len: regs.len(),
        };
        window.regs[..regs.len()].copy_from_slice(regs);
        window
    }

    pub fn as_slice(&self) -> &[Reg] {
        &self.regs[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, reg: Reg) -> bool {
        self.as_slice().contains(&reg)
    }

    /// Register receiving the result
    pub fn top(&self) -> Option<Reg> {
        self.as_slice().last().copied()
    }

    /// Register below the top
    pub fn second(&self) -> Option<Reg> {
        self.len.checked_sub(2).map(|i| self.regs[i])
    }

    /// The window without its top register
    pub fn pop(&self) -> Self {
        let len = self.len.saturating_sub(1);
        Self::new(&self.regs[..len])
    }

    /// The window with its top two registers exchanged
    pub fn swap_top(&self) -> Self {
        let mut window = *self;
        if self.len >= 2 {
            window.regs.swap(self.len - 1, self.len - 2);
        }
        window
    }

    /// The window with `regs` added below its current bottom
    pub fn with_bottom(&self, regs: &[Reg]) -> Self {
        let mut combined = Vec::with_capacity(regs.len() + self.len);
        combined.extend_from_slice(regs);
        combined.extend_from_slice(self.as_slice());
        Self::new(&combined)
    }
}

impl fmt::Debug for RegWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}
