//! Ershov Register Allocator - Backend
//! 
//! This crate turns one expression tree into i386 code using Ershov
//! (Sethi-Ullman) labeling:
//! 
//! - `ershov` - Bottom-up register need of every subtree
//! - `regmgmt` - Register pool, windows and spill slots
//! - `emit` - Top-down emission, including the fixed-register sequences for
//!   division, shifts and calls
//! 
//! [`generate`] runs both passes and reports the body together with the
//! spill area size the surrounding frame has to reserve.

mod emit;
pub mod ershov;
pub mod regmgmt;
mod error;

pub use error::AllocError;
pub use regmgmt::{RegWindow, RegisterPool, SpillRecord, SpillSlots};

use era_codegen::{emit_instructions, AsmInst, Frame, Reg};
use era_ir::{ExprArena, ExprId};
use log::debug;
use serde::{Deserialize, Serialize};

/// Options for code generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocOptions {
    pub pool: RegisterPool,
    pub trace_spills: bool,
}

impl Default for AllocOptions {
    fn default() -> Self {
        Self {
            pool: RegisterPool::default(),
            trace_spills: false,
        }
    }
}

impl AllocOptions {
    /// Replace the pool, bottom register first
    pub fn with_pool(mut self, regs: &[Reg]) -> Result<Self, AllocError> {
        self.pool = RegisterPool::new(regs)?;
        Ok(self)
    }

    pub fn with_trace_spills(mut self, enabled: bool) -> Self {
        self.trace_spills = enabled;
        self
    }
}

/// Code generated for one expression tree
#[derive(Debug, Clone, PartialEq)]
pub struct Generated {
    /// Instructions leaving the result in the pool's top register
    pub body: Vec<AsmInst>,
    /// Bytes of spill area below ebp
    pub frame_size: u32,
    /// External symbols referenced by the body, sorted
    pub externs: Vec<String>,
}

impl Generated {
    pub fn frame(&self) -> Result<Frame, AllocError> {
        Ok(Frame::new(self.frame_size)?)
    }

    /// The body wrapped in prologue and epilogue
    pub fn into_function(self) -> Result<Vec<AsmInst>, AllocError> {
        let frame = self.frame()?;
        Ok(frame.wrap(self.body))
    }

    /// Complete listing: extern declarations and the framed function
    pub fn listing(&self) -> Result<String, AllocError> {
        let function = self.frame()?.wrap(self.body.clone());
        Ok(emit_instructions(&self.externs, &function))
    }

    /// Listing of the bare body, without frame or externs
    pub fn body_listing(&self) -> String {
        emit_instructions(&[], &self.body)
    }

    /// Number of spill stores in the body
    pub fn spill_count(&self) -> usize {
        self.body
            .iter()
            .filter(|inst| matches!(inst, AsmInst::Spill(..)))
            .count()
    }
}

/// Code generator configured once and reusable across trees
#[derive(Debug, Clone, Default)]
pub struct Generator {
    options: AllocOptions,
}

impl Generator {
    pub fn new(options: AllocOptions) -> Self {
        Self { options }
    }

    /// Label and emit the tree rooted at `root`
    pub fn generate(&self, arena: &ExprArena, root: ExprId) -> Result<Generated, AllocError> {
        let labels = ershov::label(arena, root);
        debug!(
            "generating {} ({} nodes, weight {}) with pool {:?}",
            root,
            labels.len(),
            labels.weight(root),
            self.options.pool.regs()
        );

        let mut emitter = emit::Emitter::new(arena, &labels, &self.options.pool);
        emitter.set_trace_spills(self.options.trace_spills);
        let body = emitter.emit(root, self.options.pool.window())?;
        let (frame_size, externs) = emitter.finish();

        debug!("{} instructions, frame size {}", body.len(), frame_size);
        Ok(Generated {
            body,
            frame_size,
            externs,
        })
    }
}

/// Generate code with the default pool
pub fn generate(arena: &ExprArena, root: ExprId) -> Result<Generated, AllocError> {
    Generator::default().generate(arena, root)
}
