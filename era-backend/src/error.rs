//! Allocation Errors
//!
//! Every error here is a fault in the caller's configuration or in the
//! allocator itself, never an expected outcome for a valid tree. Emission
//! stops at the first one and no partial listing is returned.

use era_codegen::{AbiError, Reg};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocError {
    #[error("No registers available: needed {needed}, have {available}")]
    OutOfRegisters { needed: usize, available: usize },

    #[error("Illegal allocation: dividend in {dividend} while divisor occupies {divisor}")]
    IllegalAllocation { dividend: Reg, divisor: Reg },

    #[error("Invalid register pool: {0}")]
    InvalidPool(String),

    #[error("ABI violation: {0}")]
    Abi(#[from] AbiError),
}
