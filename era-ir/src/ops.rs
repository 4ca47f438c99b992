//! Expression Operators
//! 
//! Defines the binary arithmetic operators that can appear in an expression tree.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    // Arithmetic
    Add, Sub, Mul,
    Div, Rem,      // Signed quotient and remainder
    
    // Shifts
    Shl,           // Shift left
    Sar,           // Arithmetic shift right
    Shr,           // Logical shift right
}

impl BinaryOp {
    /// Division family, pinned to the fixed divide registers
    pub fn is_division(&self) -> bool {
        matches!(self, BinaryOp::Div | BinaryOp::Rem)
    }
    
    /// Shift family, pinned to the fixed shift-count register
    pub fn is_shift(&self) -> bool {
        matches!(self, BinaryOp::Shl | BinaryOp::Sar | BinaryOp::Shr)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op_str = match self {
            BinaryOp::Add => "add",
            BinaryOp::Sub => "sub",
            BinaryOp::Mul => "mul",
            BinaryOp::Div => "div",
            BinaryOp::Rem => "rem",
            BinaryOp::Shl => "shl",
            BinaryOp::Sar => "sra",
            BinaryOp::Shr => "srl",
        };
        write!(f, "{op_str}")
    }
}
