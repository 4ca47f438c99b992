//! Built-in demonstration trees

use era_ir::{BinaryOp, ExprTree};

fn num(value: i32) -> ExprTree {
    ExprTree::numeric(value)
}

fn var(slot: &str) -> ExprTree {
    ExprTree::variable(slot)
}

fn bin(op: BinaryOp, lhs: ExprTree, rhs: ExprTree) -> ExprTree {
    ExprTree::binary(op, lhs, rhs)
}

/// Balanced tower of `op` over the given leaves, pairing neighbours
fn tower(op: BinaryOp, leaves: &[&str]) -> ExprTree {
    match leaves {
        [leaf] => var(leaf),
        _ => {
            let (lhs, rhs) = leaves.split_at(leaves.len() / 2);
            bin(op, tower(op, lhs), tower(op, rhs))
        }
    }
}

fn arithmetic() -> Vec<ExprTree> {
    use BinaryOp::*;

    let bcfg = bin(Add, bin(Add, var("b"), var("c")), bin(Mul, var("f"), var("g")));
    let d3 = bin(Add, var("d"), num(3));

    vec![
        num(123),
        var("foo"),
        bin(Add, num(123), num(456)),
        bin(Add, var("foo"), bin(Add, num(456), num(789))),
        bin(
            Add,
            bin(
                Add,
                bin(Add, var("foo"), num(222)),
                bin(Add, var("bar"), num(111)),
            ),
            bin(Add, num(123), num(789)),
        ),
        bin(Mul, var("foo"), bin(Mul, num(456), num(789))),
        bin(Sub, num(456), var("foo")),
        bin(Mul, bcfg.clone(), d3.clone()),
        bin(Sub, d3, bcfg),
    ]
}

fn division() -> Vec<ExprTree> {
    use BinaryOp::*;

    vec![
        bin(Div, var("p"), var("q")),
        bin(Rem, var("p"), var("q")),
        bin(Div, bin(Add, num(10), var("p")), var("q")),
        bin(Div, var("p"), bin(Add, num(10), var("q"))),
        bin(Div, bin(Div, num(8), var("p")), bin(Div, num(10), var("q"))),
        tower(Div, &["qq", "rr", "ss", "tt", "b", "c", "f", "g"]),
    ]
}

fn shift() -> Vec<ExprTree> {
    use BinaryOp::*;

    vec![
        bin(Shl, var("x"), num(8)),
        bin(Sar, bin(Add, num(10), var("p")), var("q")),
        bin(Shr, var("p"), bin(Add, num(10), var("q"))),
        bin(Shl, bin(Shl, num(8), var("p")), bin(Shl, num(10), var("q"))),
        tower(Shl, &["qq", "rr", "ss", "tt", "b", "c", "f", "g"]),
    ]
}

fn call() -> Vec<ExprTree> {
    use BinaryOp::*;

    vec![
        ExprTree::call(var("foo"), vec![]),
        ExprTree::call(ExprTree::address_of("foo"), vec![var("p")]),
        ExprTree::call(num(7779), vec![var("p")]),
        ExprTree::call(
            ExprTree::address_of("fn"),
            vec![
                bin(Shl, num(8), var("p")),
                bin(Shl, num(10), var("q")),
            ],
        ),
        ExprTree::call(
            ExprTree::external("printf"),
            vec![
                ExprTree::external("fmt"),
                ExprTree::load(ExprTree::external("counter")),
            ],
        ),
        bin(
            Add,
            var("a"),
            ExprTree::call(ExprTree::external("rand"), vec![]),
        ),
    ]
}

fn memory() -> Vec<ExprTree> {
    use BinaryOp::*;

    vec![
        ExprTree::load(ExprTree::address_of("x")),
        ExprTree::store(num(10), ExprTree::external("foo")),
        ExprTree::store(
            bin(Add, ExprTree::load(ExprTree::external("foo")), num(1)),
            ExprTree::external("foo"),
        ),
    ]
}

/// Fixture names accepted by `demo --name`
pub const NAMES: [&str; 5] = ["arithmetic", "division", "shift", "call", "memory"];

pub fn fixture(name: &str) -> Option<Vec<ExprTree>> {
    match name {
        "arithmetic" => Some(arithmetic()),
        "division" => Some(division()),
        "shift" => Some(shift()),
        "call" => Some(call()),
        "memory" => Some(memory()),
        _ => None,
    }
}
