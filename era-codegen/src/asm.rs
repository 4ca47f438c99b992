//! i386 Assembly Instruction Definitions
//!
//! This module defines the register model and the subset of the 32-bit x86
//! instruction set that the expression code generator emits. Instructions
//! render in lowercase Intel syntax.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// i386 Register Set
///
/// Only eax, ecx and edx are handed out by the allocator. They are also
/// exactly the registers pinned by idiv/cdq (eax, edx), variable shifts (cl)
/// and the cdecl return value (eax). esp and ebp frame the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reg {
    // General purpose registers
    Eax, Ecx, Edx,

    // Stack registers
    Esp,  // Stack pointer
    Ebp,  // Frame pointer
}

impl Reg {
    /// Registers the allocator may place values in
    pub const ALLOCATABLE: [Reg; 3] = [Reg::Eax, Reg::Ecx, Reg::Edx];

    pub fn is_allocatable(&self) -> bool {
        Self::ALLOCATABLE.contains(self)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Reg::Eax => "eax",
            Reg::Ecx => "ecx",
            Reg::Edx => "edx",
            Reg::Esp => "esp",
            Reg::Ebp => "ebp",
        }
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Reg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "eax" => Ok(Reg::Eax),
            "ecx" => Ok(Reg::Ecx),
            "edx" => Ok(Reg::Edx),
            "esp" => Ok(Reg::Esp),
            "ebp" => Ok(Reg::Ebp),
            other => Err(format!("unknown register '{other}'")),
        }
    }
}

/// i386 Assembly Instructions
///
/// Two-operand instructions follow Intel order: destination first.
/// Frame slots are addressed relative to ebp, either by a symbolic local
/// name (`[ebp-foo]`) or by a numeric spill offset (`[ebp-4]`).
#[derive(Debug, Clone, PartialEq)]
pub enum AsmInst {
    // Data Movement
    Li(Reg, i32),                 // mov rd, imm
    Mov(Reg, Reg),                // mov rd, rs
    MovSym(Reg, String),          // mov rd, symbol
    LoadLocal(Reg, String),       // mov rd, [ebp-slot]
    LeaLocal(Reg, String),        // lea rd, [ebp-slot]
    Load(Reg, Reg),               // mov rd, [rs]
    Store(Reg, Reg),              // mov [rd], rs
    Xchg(Reg, Reg),               // xchg ra, rb

    // Spill Traffic
    Spill(u32, Reg),              // mov [ebp-off], rs
    Reload(Reg, u32),             // mov rd, [ebp-off]

    // Arithmetic
    Add(Reg, Reg),                // rd += rs
    Sub(Reg, Reg),                // rd -= rs
    Imul(Reg, Reg),               // rd *= rs
    AddI(Reg, i32),               // rd += imm
    SubI(Reg, i32),               // rd -= imm
    Cdq,                          // sign-extend eax into edx
    Idiv(Reg),                    // eax, edx = edx:eax / rs, edx:eax % rs

    // Shifts by cl
    Shl(Reg),
    Sar(Reg),
    Shr(Reg),

    // Stack and Control Flow
    Push(Reg),
    Pop(Reg),
    CallReg(Reg),
    Ret,

    // Assembly Pseudo-Instructions
    Comment(String),
}

impl fmt::Display for AsmInst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Data movement
            AsmInst::Li(rd, imm) => write!(f, "mov {rd}, {imm}"),
            AsmInst::Mov(rd, rs) => write!(f, "mov {rd}, {rs}"),
            AsmInst::MovSym(rd, sym) => write!(f, "mov {rd}, {sym}"),
            AsmInst::LoadLocal(rd, slot) => write!(f, "mov {rd}, [ebp-{slot}]"),
            AsmInst::LeaLocal(rd, slot) => write!(f, "lea {rd}, [ebp-{slot}]"),
            AsmInst::Load(rd, rs) => write!(f, "mov {rd}, [{rs}]"),
            AsmInst::Store(rd, rs) => write!(f, "mov [{rd}], {rs}"),
            AsmInst::Xchg(ra, rb) => write!(f, "xchg {ra}, {rb}"),

            // Spills
            AsmInst::Spill(offset, rs) => write!(f, "mov [ebp-{offset}], {rs}"),
            AsmInst::Reload(rd, offset) => write!(f, "mov {rd}, [ebp-{offset}]"),

            // Arithmetic
            AsmInst::Add(rd, rs) => write!(f, "add {rd}, {rs}"),
            AsmInst::Sub(rd, rs) => write!(f, "sub {rd}, {rs}"),
            AsmInst::Imul(rd, rs) => write!(f, "imul {rd}, {rs}"),
            AsmInst::AddI(rd, imm) => write!(f, "add {rd}, {imm}"),
            AsmInst::SubI(rd, imm) => write!(f, "sub {rd}, {imm}"),
            AsmInst::Cdq => write!(f, "cdq"),
            AsmInst::Idiv(rs) => write!(f, "idiv {rs}"),

            // Shifts
            AsmInst::Shl(rd) => write!(f, "shl {rd}, cl"),
            AsmInst::Sar(rd) => write!(f, "sar {rd}, cl"),
            AsmInst::Shr(rd) => write!(f, "shr {rd}, cl"),

            // Stack and control flow
            AsmInst::Push(rs) => write!(f, "push {rs}"),
            AsmInst::Pop(rd) => write!(f, "pop {rd}"),
            AsmInst::CallReg(rs) => write!(f, "call {rs}"),
            AsmInst::Ret => write!(f, "ret"),

            // Pseudo
            AsmInst::Comment(text) => write!(f, "; {text}"),
        }
    }
}
