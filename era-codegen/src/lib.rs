//! Ershov Register Allocator - i386 Target Model
//! 
//! This crate describes the machine the expression code generator targets:
//! 
//! - Register set and assembly instructions
//! - cdecl ABI (fixed registers, argument passing, stack frames)
//! - Assembly text emission

pub mod asm;
pub mod abi;
pub mod emit;

pub use asm::{Reg, AsmInst};
pub use abi::{AbiError, CallingConvention, Frame};
pub use emit::emit_instructions;
