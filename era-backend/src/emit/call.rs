//! cdecl Calls
//!
//! Arguments are evaluated last to first, each into the full window and
//! pushed as soon as it is computed, so a call never needs more than one
//! register for its arguments. The callee address goes into the window's
//! top. eax, ecx and edx do not survive the call, so any of them holding an
//! enclosing value is saved to a spill slot beforehand.

use super::{top, Emitter, Finish, Task};
use crate::error::AllocError;
use crate::regmgmt::{RegWindow, SpillRecord};
use era_codegen::{AsmInst, CallingConvention as CC, Reg};
use era_ir::ExprId;
use log::debug;

/// A call whose arguments and callee are being evaluated
pub(super) struct CallSite {
    target: Reg,
    arg_count: usize,
    saved: Vec<SpillRecord>,
}

impl Emitter<'_> {
    pub(super) fn schedule_call(
        &mut self,
        callee: ExprId,
        args: &[ExprId],
        window: RegWindow,
        tasks: &mut Vec<Task>,
        code: &mut Vec<AsmInst>,
    ) -> Result<(), AllocError> {
        let target = top(&window)?;

        let mut saved = Vec::new();
        for reg in CC::CALLER_SAVED {
            if self.pool.is_live(reg, &window) {
                debug!("saving {} across call", reg);
                saved.push(self.spill(reg, "Save", code));
            }
        }

        // Popped in reverse: rightmost argument first, the call last
        tasks.push(Task::Finish(Finish::Call(CallSite {
            target,
            arg_count: args.len(),
            saved,
        })));
        tasks.push(Task::Visit(callee, window));
        for &arg in args {
            tasks.push(Task::Inst(AsmInst::Push(target)));
            tasks.push(Task::Visit(arg, window));
        }

        Ok(())
    }

    pub(super) fn emit_call(&self, site: CallSite, code: &mut Vec<AsmInst>) -> Result<(), AllocError> {
        code.push(AsmInst::CallReg(site.target));
        if site.target != CC::RETURN_REG {
            code.push(AsmInst::Mov(site.target, CC::RETURN_REG));
        }

        if site.arg_count > 0 {
            let size = CC::arg_area_size(site.arg_count)?;
            code.push(AsmInst::AddI(CC::STACK_PTR, size));
        }

        self.restore(&site.saved, code);
        Ok(())
    }
}
