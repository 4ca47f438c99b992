//! Three-Address Listing
//!
//! Flattens an expression tree into numbered virtual values, one instruction
//! per node, e.g.
//!
//! ```text
//! <0> = const 1
//! <1> = local foo
//! <2> = add <0>, <1>
//! ```
//!
//! Useful for eyeballing what a tree computes before looking at the
//! register-allocated output.

use crate::expr::{Expr, ExprArena, ExprId};
use std::fmt;

/// Operand of a linear instruction
#[derive(Debug, Clone, PartialEq)]
pub enum LinearOperand {
    Value(u32),
    Imm(i32),
    Symbol(String),
}

impl fmt::Display for LinearOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinearOperand::Value(id) => write!(f, "<{id}>"),
            LinearOperand::Imm(value) => write!(f, "{value}"),
            LinearOperand::Symbol(name) => write!(f, "{name}"),
        }
    }
}

/// One three-address instruction
#[derive(Debug, Clone, PartialEq)]
pub struct LinearInst {
    pub result: Option<u32>,
    pub opcode: String,
    pub operands: Vec<LinearOperand>,
}

impl fmt::Display for LinearInst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(result) = self.result {
            write!(f, "<{result}> = ")?;
        }
        write!(f, "{}", self.opcode)?;
        for (i, operand) in self.operands.iter().enumerate() {
            if i == 0 {
                write!(f, " {operand}")?;
            } else {
                write!(f, ", {operand}")?;
            }
        }
        Ok(())
    }
}

struct Linearizer<'a> {
    arena: &'a ExprArena,
    next_value: u32,
    insts: Vec<LinearInst>,
}

impl Linearizer<'_> {
    fn fresh(&mut self) -> u32 {
        let value = self.next_value;
        self.next_value += 1;
        value
    }

    fn define(&mut self, opcode: &str, operands: Vec<LinearOperand>) -> u32 {
        let result = self.fresh();
        self.insts.push(LinearInst {
            result: Some(result),
            opcode: opcode.to_string(),
            operands,
        });
        result
    }

    fn run(&mut self, root: ExprId) {
        let arena = self.arena;
        let mut steps = vec![(root, false)];
        let mut values: Vec<u32> = Vec::new();

        while let Some((id, expanded)) = steps.pop() {
            let expr = arena.get(id);
            let inputs = operand_order(expr);
            if !expanded && !inputs.is_empty() {
                steps.push((id, true));
                steps.extend(inputs.into_iter().rev().map(|input| (input, false)));
                continue;
            }

            let start = values.len() - inputs.len();
            let inputs = values.split_off(start);
            let value = match expr {
                Expr::Numeric(value) => self.define("const", vec![LinearOperand::Imm(*value)]),
                Expr::Variable(slot) => {
                    self.define("local", vec![LinearOperand::Symbol(slot.to_string())])
                }
                Expr::AddressOfVariable(slot) => {
                    self.define("frame", vec![LinearOperand::Symbol(slot.to_string())])
                }
                Expr::AddressOfExternal(symbol) => {
                    self.define("global", vec![LinearOperand::Symbol(symbol.clone())])
                }
                Expr::Load(_) => self.define("load", vec![LinearOperand::Value(inputs[0])]),
                Expr::Store { .. } => {
                    let copy = self.define("copy", vec![LinearOperand::Value(inputs[1])]);
                    self.insts.push(LinearInst {
                        result: None,
                        opcode: "store".to_string(),
                        operands: vec![LinearOperand::Value(inputs[0]), LinearOperand::Value(copy)],
                    });
                    copy
                }
                Expr::Binary { op, .. } => self.define(
                    &op.to_string(),
                    vec![LinearOperand::Value(inputs[0]), LinearOperand::Value(inputs[1])],
                ),
                Expr::Call { .. } => {
                    let (args, callee) = inputs.split_at(inputs.len() - 1);
                    let mut operands = vec![LinearOperand::Value(callee[0])];
                    operands.extend(args.iter().map(|&arg| LinearOperand::Value(arg)));
                    self.define("call", operands)
                }
            };
            values.push(value);
        }
    }
}

/// Operands in evaluation order: the address of a store comes before the
/// value, and call arguments come before the callee
fn operand_order(expr: &Expr) -> Vec<ExprId> {
    match expr {
        Expr::Store { value, ptr } => vec![*ptr, *value],
        Expr::Call { callee, args } => {
            let mut order = args.clone();
            order.push(*callee);
            order
        }
        _ => expr.children(),
    }
}

/// Flatten the tree rooted at `root` into three-address form
pub fn linearize(arena: &ExprArena, root: ExprId) -> Vec<LinearInst> {
    let mut linearizer = Linearizer {
        arena,
        next_value: 0,
        insts: Vec::new(),
    };
    linearizer.run(root);
    linearizer.insts
}

/// Render a linear listing, one instruction per line
pub fn format_linear(insts: &[LinearInst]) -> String {
    let mut out = String::new();
    for inst in insts {
        out.push_str(&inst.to_string());
        out.push('\n');
    }
    out
}
