//! Division and Remainder
//!
//! `idiv` divides edx:eax by its operand, leaving the quotient in eax and
//! the remainder in edx. The sequence emitted is
//!
//! ```text
//! <shuffle dividend into eax, divisor into ecx>
//! cdq
//! idiv ecx
//! mov dividend, eax|edx
//! ```
//!
//! so eax, edx and ecx are all clobbered regardless of where the operands
//! were evaluated. Any of them holding an enclosing value is spilled first.

use super::binary::Operands;
use super::Emitter;
use crate::error::AllocError;
use era_codegen::{AsmInst, CallingConvention as CC};
use era_ir::BinaryOp;
use log::debug;

impl Emitter<'_> {
    pub(super) fn emit_divide(
        &mut self,
        op: BinaryOp,
        operands: &Operands,
        code: &mut Vec<AsmInst>,
    ) -> Result<(), AllocError> {
        debug_assert!(op.is_division());
        let dividend = operands.top;
        let divisor = operands.second;

        let mut emergency = Vec::new();
        for reg in CC::DIVIDE_CLOBBERS {
            if reg != dividend && self.pool.is_live(reg, &operands.window) {
                debug!("{} is live across {}, emergency spill", reg, op);
                emergency.push(self.spill(reg, "Emergency spill", code));
            }
        }

        if divisor == CC::DIVIDEND {
            if dividend == CC::DIVISOR {
                code.push(AsmInst::Xchg(CC::DIVIDEND, CC::DIVISOR));
            } else if dividend == CC::DIVIDEND {
                return Err(AllocError::IllegalAllocation { dividend, divisor });
            } else {
                code.push(AsmInst::Mov(CC::DIVISOR, CC::DIVIDEND));
                code.push(AsmInst::Mov(CC::DIVIDEND, dividend));
            }
        } else {
            if dividend != CC::DIVIDEND {
                code.push(AsmInst::Mov(CC::DIVIDEND, dividend));
            }
            if divisor != CC::DIVISOR {
                code.push(AsmInst::Mov(CC::DIVISOR, divisor));
            }
        }

        code.push(AsmInst::Cdq);
        code.push(AsmInst::Idiv(CC::DIVISOR));

        let result = match op {
            BinaryOp::Rem => CC::REMAINDER,
            _ => CC::DIVIDEND,
        };
        if dividend != result {
            code.push(AsmInst::Mov(dividend, result));
        }

        self.restore(&emergency, code);
        Ok(())
    }
}
