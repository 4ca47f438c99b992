//! Expression Nodes and Arena
//!
//! Expression trees live in an [`ExprArena`] and are addressed by [`ExprId`]
//! handles. Nodes are immutable once pushed, and children are always pushed
//! before their parent, so a tree is built bottom-up and can never contain a
//! cycle. Two structurally identical subtrees are distinct nodes with distinct
//! handles.

use crate::ops::BinaryOp;
use crate::tree::ExprTree;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle to a node inside an [`ExprArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(u32);

impl ExprId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Symbolic stack-frame slot of a local variable
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(pub String);

impl SlotId {
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SlotId {
    fn from(name: &str) -> Self {
        SlotId(name.to_string())
    }
}

impl From<String> for SlotId {
    fn from(name: String) -> Self {
        SlotId(name)
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Expression node
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Integer literal
    Numeric(i32),

    /// Read of a stack-frame local
    Variable(SlotId),

    /// Address of a stack-frame local (no memory access)
    AddressOfVariable(SlotId),

    /// Address of a linker-resolved external symbol
    AddressOfExternal(String),

    /// Dereference of a pointer-valued operand
    Load(ExprId),

    /// Write `value` through `ptr`; the node evaluates to the stored value
    Store { value: ExprId, ptr: ExprId },

    /// Binary arithmetic
    Binary { op: BinaryOp, lhs: ExprId, rhs: ExprId },

    /// Indirect call through the value of `callee`
    Call { callee: ExprId, args: Vec<ExprId> },
}

impl Expr {
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            Expr::Numeric(_)
                | Expr::Variable(_)
                | Expr::AddressOfVariable(_)
                | Expr::AddressOfExternal(_)
        )
    }

    /// Child handles in source order
    pub fn children(&self) -> Vec<ExprId> {
        match self {
            Expr::Numeric(_)
            | Expr::Variable(_)
            | Expr::AddressOfVariable(_)
            | Expr::AddressOfExternal(_) => Vec::new(),
            Expr::Load(ptr) => vec![*ptr],
            Expr::Store { value, ptr } => vec![*value, *ptr],
            Expr::Binary { lhs, rhs, .. } => vec![*lhs, *rhs],
            Expr::Call { callee, args } => {
                let mut children = Vec::with_capacity(args.len() + 1);
                children.push(*callee);
                children.extend(args.iter().copied());
                children
            }
        }
    }
}

/// Owner of every node of one or more expression trees
#[derive(Debug, Clone, Default)]
pub struct ExprArena {
    nodes: Vec<Expr>,
}

impl ExprArena {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node. Handles from another arena are a programmer error.
    pub fn get(&self, id: ExprId) -> &Expr {
        &self.nodes[id.index()]
    }

    fn push(&mut self, expr: Expr) -> ExprId {
        let id = ExprId(self.nodes.len() as u32);
        self.nodes.push(expr);
        id
    }

    fn check_child(&self, child: ExprId) {
        debug_assert!(
            child.index() < self.nodes.len(),
            "child {child} does not belong to this arena"
        );
    }

    pub fn numeric(&mut self, value: i32) -> ExprId {
        self.push(Expr::Numeric(value))
    }

    pub fn variable(&mut self, slot: impl Into<SlotId>) -> ExprId {
        self.push(Expr::Variable(slot.into()))
    }

    pub fn address_of(&mut self, slot: impl Into<SlotId>) -> ExprId {
        self.push(Expr::AddressOfVariable(slot.into()))
    }

    pub fn external(&mut self, symbol: impl Into<String>) -> ExprId {
        self.push(Expr::AddressOfExternal(symbol.into()))
    }

    pub fn load(&mut self, ptr: ExprId) -> ExprId {
        self.check_child(ptr);
        self.push(Expr::Load(ptr))
    }

    pub fn store(&mut self, value: ExprId, ptr: ExprId) -> ExprId {
        self.check_child(value);
        self.check_child(ptr);
        self.push(Expr::Store { value, ptr })
    }

    pub fn binary(&mut self, op: BinaryOp, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.check_child(lhs);
        self.check_child(rhs);
        self.push(Expr::Binary { op, lhs, rhs })
    }

    pub fn add(&mut self, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.binary(BinaryOp::Add, lhs, rhs)
    }

    pub fn sub(&mut self, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.binary(BinaryOp::Sub, lhs, rhs)
    }

    pub fn mul(&mut self, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.binary(BinaryOp::Mul, lhs, rhs)
    }

    pub fn div(&mut self, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.binary(BinaryOp::Div, lhs, rhs)
    }

    pub fn rem(&mut self, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.binary(BinaryOp::Rem, lhs, rhs)
    }

    pub fn shl(&mut self, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.binary(BinaryOp::Shl, lhs, rhs)
    }

    pub fn sar(&mut self, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.binary(BinaryOp::Sar, lhs, rhs)
    }

    pub fn shr(&mut self, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.binary(BinaryOp::Shr, lhs, rhs)
    }

    pub fn call(&mut self, callee: ExprId, args: Vec<ExprId>) -> ExprId {
        self.check_child(callee);
        for &arg in &args {
            self.check_child(arg);
        }
        self.push(Expr::Call { callee, args })
    }

    /// Copy a serialized tree into the arena, children first
    pub fn insert_tree(&mut self, tree: &ExprTree) -> ExprId {
        enum Step<'t> {
            Enter(&'t ExprTree),
            Build(&'t ExprTree),
        }

        let mut steps = vec![Step::Enter(tree)];
        let mut built: Vec<ExprId> = Vec::new();

        while let Some(step) = steps.pop() {
            match step {
                Step::Enter(tree) => {
                    steps.push(Step::Build(tree));
                    steps.extend(tree.children().into_iter().rev().map(Step::Enter));
                }
                Step::Build(tree) => {
                    let start = built.len() - tree.children().len();
                    let kids = built.split_off(start);
                    let id = match tree {
                        ExprTree::Numeric(value) => self.numeric(*value),
                        ExprTree::Variable(slot) => self.variable(slot.clone()),
                        ExprTree::AddressOfVariable(slot) => self.address_of(slot.clone()),
                        ExprTree::AddressOfExternal(symbol) => self.external(symbol.clone()),
                        ExprTree::Load(_) => self.load(kids[0]),
                        ExprTree::Store(..) => self.store(kids[0], kids[1]),
                        ExprTree::Binary(op, ..) => self.binary(*op, kids[0], kids[1]),
                        ExprTree::Call(..) => self.call(kids[0], kids[1..].to_vec()),
                    };
                    built.push(id);
                }
            }
        }

        built[0]
    }

    /// Rebuild the serialized form of the tree rooted at `id`
    pub fn to_tree(&self, id: ExprId) -> ExprTree {
        let mut steps = vec![(id, false)];
        let mut built: Vec<ExprTree> = Vec::new();

        while let Some((id, expanded)) = steps.pop() {
            let expr = self.get(id);
            if !expanded && !expr.is_leaf() {
                steps.push((id, true));
                steps.extend(expr.children().into_iter().rev().map(|child| (child, false)));
                continue;
            }

            let start = built.len() - expr.children().len();
            let mut kids = built.split_off(start);
            let tree = match expr {
                Expr::Numeric(value) => ExprTree::Numeric(*value),
                Expr::Variable(slot) => ExprTree::Variable(slot.clone()),
                Expr::AddressOfVariable(slot) => ExprTree::AddressOfVariable(slot.clone()),
                Expr::AddressOfExternal(symbol) => ExprTree::AddressOfExternal(symbol.clone()),
                Expr::Load(_) => ExprTree::load(kids.remove(0)),
                Expr::Store { .. } => {
                    let ptr = kids.remove(1);
                    ExprTree::store(kids.remove(0), ptr)
                }
                Expr::Binary { op, .. } => {
                    let rhs = kids.remove(1);
                    ExprTree::binary(*op, kids.remove(0), rhs)
                }
                Expr::Call { .. } => {
                    let args = kids.split_off(1);
                    ExprTree::call(kids.remove(0), args)
                }
            };
            built.push(tree);
        }

        built.remove(0)
    }

    /// S-expression rendering of the tree rooted at `id`
    pub fn display(&self, id: ExprId) -> ExprDisplay<'_> {
        ExprDisplay { arena: self, root: id }
    }
}

/// Helper returned by [`ExprArena::display`]
pub struct ExprDisplay<'a> {
    arena: &'a ExprArena,
    root: ExprId,
}

impl fmt::Display for ExprDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        enum Piece {
            Node(ExprId),
            Space,
            Close,
        }

        let mut pieces = vec![Piece::Node(self.root)];
        while let Some(piece) = pieces.pop() {
            let id = match piece {
                Piece::Node(id) => id,
                Piece::Space => {
                    write!(f, " ")?;
                    continue;
                }
                Piece::Close => {
                    write!(f, ")")?;
                    continue;
                }
            };

            let expr = self.arena.get(id);
            match expr {
                Expr::Numeric(value) => write!(f, "{value}")?,
                Expr::Variable(slot) => write!(f, "{slot}")?,
                Expr::AddressOfVariable(slot) => write!(f, "&{slot}")?,
                Expr::AddressOfExternal(symbol) => write!(f, "@{symbol}")?,
                Expr::Load(_) => write!(f, "(load")?,
                Expr::Store { .. } => write!(f, "(store")?,
                Expr::Binary { op, .. } => write!(f, "({op}")?,
                Expr::Call { .. } => write!(f, "(call")?,
            }

            if !expr.is_leaf() {
                pieces.push(Piece::Close);
                for child in expr.children().into_iter().rev() {
                    pieces.push(Piece::Node(child));
                    pieces.push(Piece::Space);
                }
            }
        }

        Ok(())
    }
}
