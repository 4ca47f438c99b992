//! Register Pool Configuration

use super::window::{RegWindow, MAX_POOL_SIZE};
use crate::error::AllocError;
use era_codegen::Reg;
use serde::{Deserialize, Serialize};

/// Ordered registers available to the allocator, bottom first
///
/// The top register receives the final result. Registers outside the pool
/// never hold live values, so the allocator may clobber them freely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Reg>", into = "Vec<Reg>")]
pub struct RegisterPool {
    regs: Vec<Reg>,
}

impl RegisterPool {
    pub fn new(regs: &[Reg]) -> Result<Self, AllocError> {
        if regs.is_empty() {
            return Err(AllocError::InvalidPool("pool is empty".to_string()));
        }
        if regs.len() > MAX_POOL_SIZE {
            return Err(AllocError::InvalidPool(format!(
                "{} registers given, at most {} are allocatable",
                regs.len(),
                MAX_POOL_SIZE
            )));
        }
        for (i, reg) in regs.iter().enumerate() {
            if !reg.is_allocatable() {
                return Err(AllocError::InvalidPool(format!("{reg} is not allocatable")));
            }
            if regs[..i].contains(reg) {
                return Err(AllocError::InvalidPool(format!("{reg} listed twice")));
            }
        }

        Ok(Self { regs: regs.to_vec() })
    }

    /// Parse a comma-separated list such as `edx,ecx,eax`
    pub fn parse(list: &str) -> Result<Self, AllocError> {
        let regs = list
            .split(',')
            .map(|name| name.parse::<Reg>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(AllocError::InvalidPool)?;
        Self::new(&regs)
    }

    pub fn regs(&self) -> &[Reg] {
        &self.regs
    }

    pub fn len(&self) -> usize {
        self.regs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regs.is_empty()
    }

    pub fn contains(&self, reg: Reg) -> bool {
        self.regs.contains(&reg)
    }

    /// Window covering the whole pool
    pub fn window(&self) -> RegWindow {
        RegWindow::new(&self.regs)
    }

    /// Whether `reg` holds a value of some enclosing computation
    pub fn is_live(&self, reg: Reg, window: &RegWindow) -> bool {
        self.contains(reg) && !window.contains(reg)
    }

    /// Pool registers outside `window`, in pool order
    pub fn live_outside(&self, window: &RegWindow) -> Vec<Reg> {
        self.regs
            .iter()
            .copied()
            .filter(|&reg| !window.contains(reg))
            .collect()
    }
}

impl Default for RegisterPool {
    fn default() -> Self {
        Self {
            regs: vec![Reg::Edx, Reg::Ecx, Reg::Eax],
        }
    }
}

impl TryFrom<Vec<Reg>> for RegisterPool {
    type Error = AllocError;

    fn try_from(regs: Vec<Reg>) -> Result<Self, Self::Error> {
        Self::new(&regs)
    }
}

impl From<RegisterPool> for Vec<Reg> {
    fn from(pool: RegisterPool) -> Self {
        pool.regs
    }
}
