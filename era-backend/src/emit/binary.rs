//! Generic Binary Operators
//!
//! Both operands need a register at the combine point. The heavier operand
//! is evaluated first so that its larger register demand is met before the
//! lighter operand's result pins a register.

use super::Emitter;
use crate::error::AllocError;
use crate::regmgmt::{RegWindow, SpillRecord};
use era_codegen::{AsmInst, Reg};
use era_ir::{BinaryOp, ExprId};
use log::debug;

/// Where the operands of a binary node end up
pub(super) struct Operands {
    /// Window the operands are evaluated in, widened by any spills
    pub window: RegWindow,
    /// Holds the left operand; also receives the result
    pub top: Reg,
    /// Holds the right operand
    pub second: Reg,
    /// Registers spilled to make room, in spill order
    pub spills: Vec<SpillRecord>,
}

impl Emitter<'_> {
    /// Make room for two operands and decide their placement: `lhs` lands in
    /// the window's top and `rhs` in the register below. Returns the operand
    /// visits in evaluation order.
    pub(super) fn prepare_operands(
        &mut self,
        lhs: ExprId,
        rhs: ExprId,
        window: RegWindow,
        code: &mut Vec<AsmInst>,
    ) -> Result<(Operands, Vec<(ExprId, RegWindow)>), AllocError> {
        let (window, spills) = self.make_room(window, code)?;
        let (top, second) = match (window.top(), window.second()) {
            (Some(top), Some(second)) => (top, second),
            _ => {
                return Err(AllocError::OutOfRegisters {
                    needed: 2,
                    available: window.len(),
                })
            }
        };

        let visits = if self.labels.weight(lhs) < self.labels.weight(rhs) {
            debug!("right operand {} is heavier, evaluating it first", rhs);
            let swapped = window.swap_top();
            vec![(rhs, swapped), (lhs, swapped.pop())]
        } else {
            vec![(lhs, window), (rhs, window.pop())]
        };

        let operands = Operands {
            window,
            top,
            second,
            spills,
        };
        Ok((operands, visits))
    }

    /// Spill ancestor registers until the window holds two registers
    fn make_room(
        &mut self,
        window: RegWindow,
        code: &mut Vec<AsmInst>,
    ) -> Result<(RegWindow, Vec<SpillRecord>), AllocError> {
        if window.len() >= 2 {
            return Ok((window, Vec::new()));
        }

        let needed = 2 - window.len();
        let victims = self.pool.live_outside(&window);
        if victims.len() < needed {
            return Err(AllocError::OutOfRegisters {
                needed: 2,
                available: window.len() + victims.len(),
            });
        }

        let mut widened = window;
        let mut spills = Vec::with_capacity(needed);
        for &reg in victims.iter().take(needed) {
            debug!("window {:?} too small, spilling {}", window, reg);
            spills.push(self.spill(reg, "Spill", code));
            widened = widened.with_bottom(&[reg]);
        }

        Ok((widened, spills))
    }

    pub(super) fn emit_binary(
        &mut self,
        op: BinaryOp,
        operands: &Operands,
        code: &mut Vec<AsmInst>,
    ) -> Result<(), AllocError> {
        let (dst, src) = (operands.top, operands.second);

        match op {
            BinaryOp::Add => code.push(AsmInst::Add(dst, src)),
            BinaryOp::Sub => code.push(AsmInst::Sub(dst, src)),
            BinaryOp::Mul => code.push(AsmInst::Imul(dst, src)),
            BinaryOp::Div | BinaryOp::Rem => self.emit_divide(op, operands, code)?,
            BinaryOp::Shl | BinaryOp::Sar | BinaryOp::Shr => self.emit_shift(op, operands, code),
        }

        self.restore(&operands.spills, code);
        Ok(())
    }

    /// `mov [ptr], value`; the stored value is the node's result
    pub(super) fn emit_store(&self, operands: &Operands, code: &mut Vec<AsmInst>) {
        code.push(AsmInst::Store(operands.second, operands.top));
        self.restore(&operands.spills, code);
    }
}
