//! Serialized Expression Trees
//!
//! [`ExprTree`] is the owned, recursive form of an expression that callers
//! hand over as JSON. It is lowered into an [`ExprArena`](crate::ExprArena)
//! with [`ExprArena::insert_tree`](crate::ExprArena::insert_tree) before any
//! code generation happens.

use crate::expr::SlotId;
use crate::ops::BinaryOp;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TreeError {
    #[error("Malformed expression tree: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Expression file contains no trees")]
    Empty,
}

/// Owned expression tree, externally tagged in JSON:
/// `{"Binary": ["Add", {"Numeric": 1}, {"Variable": "foo"}]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprTree {
    Numeric(i32),
    Variable(SlotId),
    AddressOfVariable(SlotId),
    AddressOfExternal(String),
    Load(Box<ExprTree>),
    /// `(value, pointer)`
    Store(Box<ExprTree>, Box<ExprTree>),
    Binary(BinaryOp, Box<ExprTree>, Box<ExprTree>),
    /// `(callee, arguments)`
    Call(Box<ExprTree>, Vec<ExprTree>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<ExprTree>),
    One(ExprTree),
}

impl ExprTree {
    /// Parse either a single tree or a JSON array of trees
    pub fn from_json(text: &str) -> Result<Vec<ExprTree>, TreeError> {
        let trees = match serde_json::from_str::<OneOrMany>(text)? {
            OneOrMany::Many(trees) => trees,
            OneOrMany::One(tree) => vec![tree],
        };

        if trees.is_empty() {
            return Err(TreeError::Empty);
        }
        Ok(trees)
    }

    /// Subtrees in source order
    pub fn children(&self) -> Vec<&ExprTree> {
        match self {
            ExprTree::Numeric(_)
            | ExprTree::Variable(_)
            | ExprTree::AddressOfVariable(_)
            | ExprTree::AddressOfExternal(_) => Vec::new(),
            ExprTree::Load(ptr) => vec![ptr.as_ref()],
            ExprTree::Store(value, ptr) => vec![value.as_ref(), ptr.as_ref()],
            ExprTree::Binary(_, lhs, rhs) => vec![lhs.as_ref(), rhs.as_ref()],
            ExprTree::Call(callee, args) => {
                let mut children = Vec::with_capacity(args.len() + 1);
                children.push(callee.as_ref());
                children.extend(args.iter());
                children
            }
        }
    }

    pub fn numeric(value: i32) -> Self {
        ExprTree::Numeric(value)
    }

    pub fn variable(slot: &str) -> Self {
        ExprTree::Variable(SlotId::from(slot))
    }

    pub fn address_of(slot: &str) -> Self {
        ExprTree::AddressOfVariable(SlotId::from(slot))
    }

    pub fn external(symbol: &str) -> Self {
        ExprTree::AddressOfExternal(symbol.to_string())
    }

    pub fn load(ptr: ExprTree) -> Self {
        ExprTree::Load(Box::new(ptr))
    }

    pub fn store(value: ExprTree, ptr: ExprTree) -> Self {
        ExprTree::Store(Box::new(value), Box::new(ptr))
    }

    pub fn binary(op: BinaryOp, lhs: ExprTree, rhs: ExprTree) -> Self {
        ExprTree::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    pub fn call(callee: ExprTree, args: Vec<ExprTree>) -> Self {
        ExprTree::Call(Box::new(callee), args)
    }
}
