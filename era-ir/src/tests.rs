//! Unit tests for the expression tree crate

use super::*;
use pretty_assertions::assert_eq;

fn operand(arena: &mut ExprArena, global: &str, value: i32) -> ExprId {
    let ptr = arena.external(global);
    let loaded = arena.load(ptr);
    let constant = arena.numeric(value);
    arena.sub(loaded, constant)
}

fn spilling_tree(arena: &mut ExprArena) -> ExprId {
    let a = operand(arena, "v4", 22);
    let b = operand(arena, "v8", 11);
    let left = arena.sub(a, b);
    let c = operand(arena, "v12", 3);
    let d = operand(arena, "v16", 9);
    let right = arena.sub(c, d);
    arena.sub(left, right)
}

#[test]
fn test_children_precede_parents() {
    let mut arena = ExprArena::new();
    let lhs = arena.numeric(1);
    let rhs = arena.variable("foo");
    let sum = arena.add(lhs, rhs);

    assert!(lhs < sum);
    assert!(rhs < sum);
    assert_eq!(arena.len(), 3);
    assert_eq!(
        arena.get(sum),
        &Expr::Binary { op: BinaryOp::Add, lhs, rhs }
    );
}

#[test]
fn test_identical_subtrees_are_distinct_nodes() {
    let mut arena = ExprArena::new();
    let a = arena.variable("x");
    let b = arena.variable("x");

    assert_ne!(a, b);
    assert_eq!(arena.get(a), arena.get(b));
}

#[test]
fn test_display_sexpr() {
    let mut arena = ExprArena::new();
    let f = arena.address_of("fn");
    let p = arena.variable("p");
    let g = arena.external("g");
    let load = arena.load(g);
    let shifted = arena.shl(p, load);
    let call = arena.call(f, vec![shifted]);

    assert_eq!(arena.display(call).to_string(), "(call &fn (shl p (load @g)))");
}

#[test]
fn test_tree_roundtrip_through_arena() {
    let tree = ExprTree::call(
        ExprTree::external("f"),
        vec![
            ExprTree::store(ExprTree::numeric(10), ExprTree::address_of("slot")),
            ExprTree::binary(BinaryOp::Rem, ExprTree::variable("p"), ExprTree::numeric(3)),
        ],
    );

    let mut arena = ExprArena::new();
    let root = arena.insert_tree(&tree);

    assert_eq!(arena.to_tree(root), tree);
    assert_eq!(arena.len(), 8);
}

#[test]
fn test_tree_json_format() {
    let json = r#"{"Binary": ["Add", {"Numeric": 123}, {"Variable": "foo"}]}"#;
    let trees = ExprTree::from_json(json).unwrap();

    assert_eq!(
        trees,
        vec![ExprTree::binary(
            BinaryOp::Add,
            ExprTree::numeric(123),
            ExprTree::variable("foo"),
        )]
    );
}

#[test]
fn test_tree_json_array() {
    let json = r#"[{"Numeric": 1}, {"Call": [{"AddressOfExternal": "f"}, []]}]"#;
    let trees = ExprTree::from_json(json).unwrap();

    assert_eq!(trees.len(), 2);
    assert_eq!(trees[1], ExprTree::call(ExprTree::external("f"), vec![]));
}

#[test]
fn test_tree_json_errors() {
    assert!(matches!(ExprTree::from_json("[]"), Err(TreeError::Empty)));
    assert!(matches!(
        ExprTree::from_json(r#"{"Frobnicate": 1}"#),
        Err(TreeError::Json(_))
    ));
}

#[test]
fn test_linear_binary() {
    let mut arena = ExprArena::new();
    let a = arena.numeric(1);
    let b = arena.numeric(2);
    let root = arena.shl(a, b);

    assert_eq!(
        format_linear(&linearize(&arena, root)),
        "<0> = const 1\n<1> = const 2\n<2> = shl <0>, <1>\n"
    );
}

#[test]
fn test_linear_store_visits_pointer_first() {
    let mut arena = ExprArena::new();
    let value = arena.numeric(10);
    let ptr = arena.external("foo");
    let root = arena.store(value, ptr);

    assert_eq!(
        format_linear(&linearize(&arena, root)),
        "<0> = global foo\n<1> = const 10\n<2> = copy <1>\nstore <0>, <2>\n"
    );
}

#[test]
fn test_linear_call_visits_arguments_first() {
    let mut arena = ExprArena::new();
    let callee = arena.external("f");
    let arg = arena.numeric(2);
    let root = arena.call(callee, vec![arg]);

    assert_eq!(
        format_linear(&linearize(&arena, root)),
        "<0> = const 2\n<1> = global f\n<2> = call <1>, <0>\n"
    );
}

#[test]
fn test_linear_spilling_tree() {
    let mut arena = ExprArena::new();
    let root = spilling_tree(&mut arena);
    let listing = format_linear(&linearize(&arena, root));

    assert_eq!(
        listing,
        "<0> = global v4\n\
         <1> = load <0>\n\
         <2> = const 22\n\
         <3> = sub <1>, <2>\n\
         <4> = global v8\n\
         <5> = load <4>\n\
         <6> = const 11\n\
         <7> = sub <5>, <6>\n\
         <8> = sub <3>, <7>\n\
         <9> = global v12\n\
         <10> = load <9>\n\
         <11> = const 3\n\
         <12> = sub <10>, <11>\n\
         <13> = global v16\n\
         <14> = load <13>\n\
         <15> = const 9\n\
         <16> = sub <14>, <15>\n\
         <17> = sub <12>, <16>\n\
         <18> = sub <8>, <17>\n"
    );
}

#[test]
fn test_children_in_source_order() {
    let mut arena = ExprArena::new();
    let value = arena.numeric(1);
    let ptr = arena.address_of("x");
    let store = arena.store(value, ptr);
    let f = arena.external("f");
    let call = arena.call(f, vec![store, value]);

    assert_eq!(arena.get(store).children(), vec![value, ptr]);
    assert_eq!(arena.get(call).children(), vec![f, store, value]);
    assert!(arena.get(value).children().is_empty());
}

#[test]
fn test_linear_call_with_several_arguments() {
    let mut arena = ExprArena::new();
    let callee = arena.external("f");
    let first = arena.numeric(1);
    let second = arena.numeric(2);
    let root = arena.call(callee, vec![first, second]);

    assert_eq!(
        format_linear(&linearize(&arena, root)),
        "<0> = const 1\n<1> = const 2\n<2> = global f\n<3> = call <2>, <0>, <1>\n"
    );
    assert_eq!(arena.display(root).to_string(), "(call @f 1 2)");
}

fn left_chain(arena: &mut ExprArena, depth: usize) -> ExprId {
    let mut acc = arena.variable("x");
    for _ in 0..depth {
        let one = arena.numeric(1);
        acc = arena.add(acc, one);
    }
    acc
}

#[test]
fn test_deep_chain_display_and_linear() {
    let depth = 100_000;
    let mut arena = ExprArena::new();
    let root = left_chain(&mut arena, depth);

    let text = arena.display(root).to_string();
    assert!(text.starts_with("(add (add (add"));
    assert!(text.ends_with(" 1) 1)"));
    assert_eq!(text.matches("(add").count(), depth);

    let insts = linearize(&arena, root);
    assert_eq!(insts.len(), 2 * depth + 1);
    assert_eq!(insts[0].to_string(), "<0> = local x");
}

#[test]
fn test_deep_chain_roundtrip() {
    let mut arena = ExprArena::new();
    let root = left_chain(&mut arena, 2_000);

    let tree = arena.to_tree(root);
    let mut copy = ExprArena::new();
    let copied = copy.insert_tree(&tree);

    assert_eq!(copy.len(), arena.len());
    assert_eq!(copy.display(copied).to_string(), arena.display(root).to_string());
}
