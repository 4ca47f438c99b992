//! Variable Shifts
//!
//! `shl`/`sar`/`shr` take their count in cl. Four placements are possible
//! once both operands are in registers:
//!
//! | placement               | sequence                                          |
//! |-------------------------|---------------------------------------------------|
//! | count already in ecx    | `op shifted, cl`                                  |
//! | shifted value in ecx    | `xchg ecx, count` `op count, cl` `mov ecx, count` |
//! | ecx free                | `mov ecx, count` `op shifted, cl`                 |
//! | ecx holds another value | `xchg ecx, count` `op shifted, cl` `xchg ecx, count` |

use super::binary::Operands;
use super::Emitter;
use era_codegen::{AsmInst, CallingConvention as CC, Reg};
use era_ir::BinaryOp;
use log::debug;

fn shift_by_cl(op: BinaryOp, reg: Reg) -> AsmInst {
    match op {
        BinaryOp::Sar => AsmInst::Sar(reg),
        BinaryOp::Shr => AsmInst::Shr(reg),
        _ => AsmInst::Shl(reg),
    }
}

impl Emitter<'_> {
    pub(super) fn emit_shift(&mut self, op: BinaryOp, operands: &Operands, code: &mut Vec<AsmInst>) {
        debug_assert!(op.is_shift());
        let shifted = operands.top;
        let amount = operands.second;

        if amount == CC::SHIFT_COUNT {
            code.push(shift_by_cl(op, shifted));
        } else if shifted == CC::SHIFT_COUNT {
            code.push(AsmInst::Xchg(CC::SHIFT_COUNT, amount));
            code.push(shift_by_cl(op, amount));
            code.push(AsmInst::Mov(CC::SHIFT_COUNT, amount));
        } else if !self.pool.is_live(CC::SHIFT_COUNT, &operands.window) {
            code.push(AsmInst::Mov(CC::SHIFT_COUNT, amount));
            code.push(shift_by_cl(op, shifted));
        } else {
            debug!("ecx is live across {}, borrowing it", op);
            code.push(AsmInst::Xchg(CC::SHIFT_COUNT, amount));
            code.push(shift_by_cl(op, shifted));
            code.push(AsmInst::Xchg(CC::SHIFT_COUNT, amount));
        }
    }
}
