//! Ershov Labeling
//!
//! Bottom-up pass computing, for every node, the number of registers needed
//! to evaluate its subtree without spilling (Sethi-Ullman numbering):
//!
//! - leaves need one register
//! - a binary node whose operands need `l` and `r` registers needs
//!   `max(l, r)` when they differ and `l + 1` when they are equal, since both
//!   results are live at the combine point
//! - a load evaluates its pointer in place and needs what the pointer needs
//! - a call needs what its callee needs; every argument is pushed before the
//!   next one is evaluated, so arguments never add pressure at the call site
//!
//! Weights are keyed by node handle, so structurally identical subtrees are
//! labeled independently. The walk keeps its own stack, so tree depth is
//! bounded by memory rather than by the thread's stack.

use era_ir::{Expr, ExprArena, ExprId};
use log::trace;
use std::collections::HashMap;

/// Combine the weights of two operands evaluated into distinct registers
pub fn combine(lhs: u32, rhs: u32) -> u32 {
    if lhs == rhs {
        lhs + 1
    } else {
        lhs.max(rhs)
    }
}

/// Ershov weight of every node in one tree
#[derive(Debug, Clone, Default)]
pub struct Labels {
    weights: HashMap<ExprId, u32>,
}

impl Labels {
    /// Weight of a node of the labeled tree
    pub(crate) fn weight(&self, id: ExprId) -> u32 {
        self.weights[&id]
    }

    pub fn get(&self, id: ExprId) -> Option<u32> {
        self.weights.get(&id).copied()
    }

    /// Number of labeled nodes
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    fn record(&mut self, id: ExprId, weight: u32) {
        trace!("label {} = {}", id, weight);
        self.weights.insert(id, weight);
    }
}

/// Label every node of the tree rooted at `root`
///
/// Post-order over an explicit stack: a node is weighed once all of its
/// children, call arguments included, carry a weight.
pub fn label(arena: &ExprArena, root: ExprId) -> Labels {
    let mut labels = Labels::default();
    let mut stack = vec![(root, false)];

    while let Some((id, expanded)) = stack.pop() {
        let expr = arena.get(id);
        if expr.is_leaf() {
            labels.record(id, 1);
            continue;
        }
        if !expanded {
            stack.push((id, true));
            stack.extend(expr.children().into_iter().map(|child| (child, false)));
            continue;
        }

        let weight = match expr {
            Expr::Load(ptr) => labels.weight(*ptr),
            Expr::Store { value, ptr } => combine(labels.weight(*value), labels.weight(*ptr)),
            Expr::Binary { lhs, rhs, .. } => combine(labels.weight(*lhs), labels.weight(*rhs)),
            Expr::Call { callee, .. } => labels.weight(*callee),
            _ => 1,
        };
        labels.record(id, weight);
    }

    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_combine() {
        assert_eq!(combine(1, 1), 2);
        assert_eq!(combine(2, 1), 2);
        assert_eq!(combine(1, 3), 3);
        assert_eq!(combine(3, 3), 4);
    }

    #[test]
    fn test_leaves() {
        let mut arena = ExprArena::new();
        let leaves = [
            arena.numeric(7),
            arena.variable("x"),
            arena.address_of("y"),
            arena.external("z"),
        ];

        for leaf in leaves {
            assert_eq!(label(&arena, leaf).weight(leaf), 1);
        }
    }

    #[test]
    fn test_balanced_tree() {
        let mut arena = ExprArena::new();
        let a = arena.variable("a");
        let b = arena.variable("b");
        let c = arena.variable("c");
        let d = arena.variable("d");
        let ab = arena.add(a, b);
        let cd = arena.mul(c, d);
        let root = arena.sub(ab, cd);

        let labels = label(&arena, root);
        assert_eq!(labels.weight(ab), 2);
        assert_eq!(labels.weight(cd), 2);
        assert_eq!(labels.weight(root), 3);
        assert_eq!(labels.len(), 7);
    }

    #[test]
    fn test_left_chain_stays_at_two() {
        let mut arena = ExprArena::new();
        let mut acc = arena.variable("v0");
        for i in 1..10 {
            let next = arena.variable(format!("v{i}"));
            acc = arena.add(acc, next);
        }

        assert_eq!(label(&arena, acc).weight(acc), 2);
    }

    #[test]
    fn test_load_takes_pointer_weight() {
        let mut arena = ExprArena::new();
        let a = arena.variable("a");
        let b = arena.variable("b");
        let ptr = arena.add(a, b);
        let load = arena.load(ptr);

        assert_eq!(label(&arena, load).weight(load), 2);
    }

    #[test]
    fn test_store_combines_operands() {
        let mut arena = ExprArena::new();
        let value = arena.numeric(10);
        let ptr = arena.external("foo");
        let store = arena.store(value, ptr);

        assert_eq!(label(&arena, store).weight(store), 2);
    }

    #[test]
    fn test_call_ignores_arguments() {
        let mut arena = ExprArena::new();
        let w = arena.variable("w");
        let x = arena.variable("x");
        let y = arena.variable("y");
        let z = arena.variable("z");
        let wx = arena.add(w, x);
        let yz = arena.add(y, z);
        let heavy = arena.mul(wx, yz);
        let callee = arena.address_of("fn");
        let call = arena.call(callee, vec![heavy]);

        let labels = label(&arena, call);
        assert_eq!(labels.weight(call), 1);
        // Arguments are labeled all the same
        assert_eq!(labels.weight(heavy), 3);
        assert_eq!(labels.weight(wx), 2);
    }

    #[test]
    fn test_identical_subtrees_labeled_separately() {
        let mut arena = ExprArena::new();
        let a1 = arena.variable("a");
        let b1 = arena.variable("b");
        let first = arena.add(a1, b1);
        let a2 = arena.variable("a");
        let b2 = arena.variable("b");
        let second = arena.add(a2, b2);
        let root = arena.mul(first, second);

        let labels = label(&arena, root);
        assert_eq!(labels.len(), 7);
        assert_eq!(labels.weight(first), 2);
        assert_eq!(labels.weight(second), 2);
        assert_eq!(labels.weight(root), 3);
    }

    #[test]
    fn test_deep_chain_labeled_without_recursion() {
        let mut arena = ExprArena::new();
        let mut acc = arena.numeric(0);
        for _ in 0..100_000 {
            let one = arena.numeric(1);
            acc = arena.add(acc, one);
        }

        let labels = label(&arena, acc);
        assert_eq!(labels.weight(acc), 2);
        assert_eq!(labels.len(), arena.len());
    }

    #[test]
    fn test_unreachable_nodes_unlabeled() {
        let mut arena = ExprArena::new();
        let stray = arena.numeric(1);
        let root = arena.numeric(2);

        let labels = label(&arena, root);
        assert_eq!(labels.get(stray), None);
        assert_eq!(labels.get(root), Some(1));
    }
}
