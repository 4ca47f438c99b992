//! Ershov Register Allocator - Expression Trees
//! 
//! This crate defines the expression trees consumed by the register
//! allocator:
//! 
//! - `expr` - Arena-allocated immutable nodes addressed by `ExprId`
//! - `ops` - Binary arithmetic operators
//! - `tree` - Owned, serde-serializable tree form used for JSON input
//! - `linear` - Three-address listing for inspection

// Public exports - clean API surface
pub use self::expr::{Expr, ExprArena, ExprDisplay, ExprId, SlotId};
pub use self::ops::BinaryOp;
pub use self::tree::{ExprTree, TreeError};
pub use self::linear::{format_linear, linearize, LinearInst, LinearOperand};

// Internal modules
mod expr;
mod ops;
mod tree;
mod linear;

#[cfg(test)]
mod tests;
