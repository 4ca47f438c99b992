//! Top-Down Emission
//!
//! Walks a labeled tree and produces the instruction sequence leaving the
//! root's value in the top register of the pool. Each node receives a
//! [`RegWindow`] of registers it may clobber; pool registers outside the
//! window hold values of enclosing computations and are spilled around any
//! code that needs them.
//!
//! The walk runs off an explicit task stack. Visiting an inner node emits
//! whatever has to precede its operands, then schedules the operand visits
//! followed by a finishing step, so tree depth never grows the native stack.
//!
//! The node kinds with register constraints live in their own modules:
//!
//! - `binary` - Operand ordering and the generic two-register combine
//! - `divide` - idiv with the dividend pinned to eax and the divisor to ecx
//! - `shift` - Variable shifts with the count pinned to cl
//! - `call` - cdecl calls with right-to-left pushes

use self::binary::Operands;
use self::call::CallSite;
use crate::ershov::Labels;
use crate::error::AllocError;
use crate::regmgmt::{RegWindow, RegisterPool, SpillRecord, SpillSlots};
use era_codegen::{AsmInst, Reg};
use era_ir::{BinaryOp, Expr, ExprArena, ExprId};
use log::trace;
use std::collections::BTreeSet;

mod binary;
mod call;
mod divide;
mod shift;


/// Pending work of the emission walk
enum Task {
    /// Emit a subtree into a window
    Visit(ExprId, RegWindow),
    /// Emit a single instruction
    Inst(AsmInst),
    /// Combine the operands of a node once they are in registers
    Finish(Finish),
}

enum Finish {
    Binary(BinaryOp, Operands),
    Store(Operands),
    Call(CallSite),
}

/// Emission state for one tree
pub(crate) struct Emitter<'a> {
    arena: &'a ExprArena,
    labels: &'a Labels,
    pool: &'a RegisterPool,
    trace_spills: bool,
    slots: SpillSlots,
    externs: BTreeSet<String>,
}

impl<'a> Emitter<'a> {
    pub(crate) fn new(arena: &'a ExprArena, labels: &'a Labels, pool: &'a RegisterPool) -> Self {
        Self {
            arena,
            labels,
            pool,
            trace_spills: false,
            slots: SpillSlots::new(),
            externs: BTreeSet::new(),
        }
    }

    /// Annotate spill traffic with comments
    pub(crate) fn set_trace_spills(&mut self, enabled: bool) {
        self.trace_spills = enabled;
    }

    /// Emit `root` so that its value ends up in `window.top()`
    pub(crate) fn emit(
        &mut self,
        root: ExprId,
        window: RegWindow,
    ) -> Result<Vec<AsmInst>, AllocError> {
        self.check_window(&window)?;

        let mut code = Vec::new();
        let mut tasks = vec![Task::Visit(root, window)];
        while let Some(task) = tasks.pop() {
            match task {
                Task::Visit(id, window) => self.visit(id, window, &mut tasks, &mut code)?,
                Task::Inst(inst) => code.push(inst),
                Task::Finish(step) => self.finish_node(step, &mut code)?,
            }
        }

        Ok(code)
    }

    /// Consume the emitter, yielding the frame size and the referenced
    /// external symbols in sorted order
    pub(crate) fn finish(self) -> (u32, Vec<String>) {
        (self.slots.max_offset(), self.externs.into_iter().collect())
    }

    /// A window may only hand out pool registers, each once
    fn check_window(&self, window: &RegWindow) -> Result<(), AllocError> {
        let regs = window.as_slice();
        for (i, reg) in regs.iter().enumerate() {
            if !self.pool.contains(*reg) {
                return Err(AllocError::InvalidPool(format!("{reg} is not in the pool")));
            }
            if regs[..i].contains(reg) {
                return Err(AllocError::InvalidPool(format!("{reg} appears twice in the window")));
            }
        }
        Ok(())
    }

    fn visit(
        &mut self,
        id: ExprId,
        window: RegWindow,
        tasks: &mut Vec<Task>,
        code: &mut Vec<AsmInst>,
    ) -> Result<(), AllocError> {
        trace!("emit {} into {:?}", id, window);

        let arena = self.arena;
        match arena.get(id) {
            Expr::Numeric(value) => code.push(AsmInst::Li(top(&window)?, *value)),
            Expr::Variable(slot) => {
                code.push(AsmInst::LoadLocal(top(&window)?, slot.to_string()));
            }
            Expr::AddressOfVariable(slot) => {
                code.push(AsmInst::LeaLocal(top(&window)?, slot.to_string()));
            }
            Expr::AddressOfExternal(symbol) => {
                self.externs.insert(symbol.clone());
                code.push(AsmInst::MovSym(top(&window)?, symbol.clone()));
            }
            Expr::Load(ptr) => {
                let reg = top(&window)?;
                tasks.push(Task::Inst(AsmInst::Load(reg, reg)));
                tasks.push(Task::Visit(*ptr, window));
            }
            Expr::Store { value, ptr } => {
                let (operands, visits) = self.prepare_operands(*value, *ptr, window, code)?;
                schedule(tasks, visits, Finish::Store(operands));
            }
            Expr::Binary { op, lhs, rhs } => {
                let (operands, visits) = self.prepare_operands(*lhs, *rhs, window, code)?;
                schedule(tasks, visits, Finish::Binary(*op, operands));
            }
            Expr::Call { callee, args } => self.schedule_call(*callee, args, window, tasks, code)?,
        }

        Ok(())
    }

    fn finish_node(&mut self, step: Finish, code: &mut Vec<AsmInst>) -> Result<(), AllocError> {
        match step {
            Finish::Binary(op, operands) => self.emit_binary(op, &operands, code)?,
            Finish::Store(operands) => self.emit_store(&operands, code),
            Finish::Call(site) => self.emit_call(site, code)?,
        }
        Ok(())
    }

    /// Save `reg` to a fresh slot
    fn spill(&mut self, reg: Reg, why: &str, code: &mut Vec<AsmInst>) -> SpillRecord {
        let record = self.slots.alloc(reg);
        if self.trace_spills {
            code.push(AsmInst::Comment(format!(
                "{why} {reg} to slot {}",
                record.offset
            )));
        }
        code.push(AsmInst::Spill(record.offset, reg));
        record
    }

    /// Reload every record, most recent first
    fn restore(&self, records: &[SpillRecord], code: &mut Vec<AsmInst>) {
        for record in records.iter().rev() {
            if self.trace_spills {
                code.push(AsmInst::Comment(format!(
                    "Reload {} from slot {}",
                    record.reg, record.offset
                )));
            }
            code.push(AsmInst::Reload(record.reg, record.offset));
        }
    }
}

/// Queue operand visits in order, then the step combining them
fn schedule(tasks: &mut Vec<Task>, visits: Vec<(ExprId, RegWindow)>, step: Finish) {
    tasks.push(Task::Finish(step));
    for (id, window) in visits.into_iter().rev() {
        tasks.push(Task::Visit(id, window));
    }
}

/// Result register of a window
fn top(window: &RegWindow) -> Result<Reg, AllocError> {
    window.top().ok_or(AllocError::OutOfRegisters {
        needed: 1,
        available: 0,
    })
}
