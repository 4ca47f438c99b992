//! i386 cdecl ABI Implementation
//!
//! This module implements the parts of the 32-bit cdecl calling convention
//! and stack frame layout the expression code generator depends on: the
//! fixed registers of the ISA, argument passing, and the function
//! prologue/epilogue around the spill area.

use crate::asm::{AsmInst, Reg};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AbiError {
    #[error("Stack frame too large: {0} bytes")]
    FrameTooLarge(u32),

    #[error("Too many call arguments: {0}")]
    TooManyArguments(usize),
}

/// cdecl Calling Convention and Fixed Registers
///
/// Register Usage:
/// - EAX: Return value, dividend and quotient of idiv
/// - EDX: Sign extension of the dividend, remainder of idiv
/// - ECX: Divisor scratch for idiv, shift count (cl)
/// - EAX, ECX, EDX are caller-saved
/// - ESP, EBP: Stack pointer and frame pointer
///
/// Arguments are pushed right to left, one 4-byte slot each, and popped by
/// the caller.
pub struct CallingConvention;

impl CallingConvention {
    /// Register holding a call's return value
    pub const RETURN_REG: Reg = Reg::Eax;

    /// Registers a callee may clobber
    pub const CALLER_SAVED: [Reg; 3] = [Reg::Eax, Reg::Ecx, Reg::Edx];

    /// idiv takes the dividend in EAX and leaves the quotient there
    pub const DIVIDEND: Reg = Reg::Eax;

    /// cdq extends into EDX and idiv leaves the remainder there
    pub const REMAINDER: Reg = Reg::Edx;

    /// Where the divisor is moved so it stays clear of EAX and EDX
    pub const DIVISOR: Reg = Reg::Ecx;

    /// Registers clobbered by a divide sequence, in emergency-spill order
    pub const DIVIDE_CLOBBERS: [Reg; 3] = [Reg::Eax, Reg::Edx, Reg::Ecx];

    /// Variable shifts read their count from cl
    pub const SHIFT_COUNT: Reg = Reg::Ecx;

    /// Stack registers
    pub const STACK_PTR: Reg = Reg::Esp;
    pub const FRAME_PTR: Reg = Reg::Ebp;

    /// Bytes occupied by one pushed argument or one spill slot
    pub const SLOT_SIZE: u32 = 4;

    /// Bytes the caller pops after a call with `count` arguments
    pub fn arg_area_size(count: usize) -> Result<i32, AbiError> {
        count
            .checked_mul(Self::SLOT_SIZE as usize)
            .and_then(|size| i32::try_from(size).ok())
            .ok_or(AbiError::TooManyArguments(count))
    }
}

/// Stack Frame Layout
///
/// The frame holds only the spill area below the saved frame pointer:
///
/// ```text
/// [ebp+0]   saved ebp
/// [ebp-4]   first spill slot
/// [ebp-8]   second spill slot
/// ...
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Bytes reserved below ebp for spill slots
    pub spill_size: u32,
}

impl Frame {
    pub fn new(spill_size: u32) -> Result<Self, AbiError> {
        if i32::try_from(spill_size).is_err() {
            return Err(AbiError::FrameTooLarge(spill_size));
        }
        Ok(Self { spill_size })
    }

    /// Generate function prologue
    ///
    /// The prologue:
    /// 1. Saves the old frame pointer
    /// 2. Sets up the new frame pointer
    /// 3. Reserves the spill area, if any
    pub fn gen_prologue(&self) -> Vec<AsmInst> {
        let mut code = vec![
            AsmInst::Push(CallingConvention::FRAME_PTR),
            AsmInst::Mov(CallingConvention::FRAME_PTR, CallingConvention::STACK_PTR),
        ];

        if self.spill_size > 0 {
            code.push(AsmInst::SubI(
                CallingConvention::STACK_PTR,
                self.spill_size as i32,
            ));
        }

        code
    }

    /// Generate function epilogue
    ///
    /// The epilogue:
    /// 1. Releases the frame by restoring the stack pointer
    /// 2. Restores the old frame pointer
    /// 3. Returns to caller
    pub fn gen_epilogue(&self) -> Vec<AsmInst> {
        vec![
            AsmInst::Mov(CallingConvention::STACK_PTR, CallingConvention::FRAME_PTR),
            AsmInst::Pop(CallingConvention::FRAME_PTR),
            AsmInst::Ret,
        ]
    }

    /// Surround a function body with prologue and epilogue
    pub fn wrap(&self, body: Vec<AsmInst>) -> Vec<AsmInst> {
        let mut code = self.gen_prologue();
        code.extend(body);
        code.extend(self.gen_epilogue());
        code
    }
}
