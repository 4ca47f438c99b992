//! Tests for complete listings of small trees

use era_backend::{generate, AllocError, AllocOptions, Generator};
use era_codegen::Reg;
use era_ir::{ExprArena, ExprTree};
use pretty_assertions::assert_eq;

fn body(generated: &era_backend::Generated) -> Vec<String> {
    generated.body.iter().map(ToString::to_string).collect()
}

#[test]
fn test_add_constants_two_registers() {
    let mut arena = ExprArena::new();
    let lhs = arena.numeric(123);
    let rhs = arena.numeric(456);
    let root = arena.add(lhs, rhs);

    let options = AllocOptions::default().with_pool(&[Reg::Ecx, Reg::Eax]).unwrap();
    let generated = Generator::new(options).generate(&arena, root).unwrap();

    assert_eq!(body(&generated), vec!["mov eax, 123", "mov ecx, 456", "add eax, ecx"]);
    assert_eq!(generated.frame_size, 0);
}

#[test]
fn test_division() {
    let mut arena = ExprArena::new();
    let one = arena.numeric(1);
    let two = arena.numeric(2);
    let root = arena.div(one, two);

    let generated = generate(&arena, root).unwrap();
    assert_eq!(body(&generated), vec!["mov eax, 1", "mov ecx, 2", "cdq", "idiv ecx"]);
}

#[test]
fn test_remainder() {
    let mut arena = ExprArena::new();
    let one = arena.numeric(1);
    let two = arena.numeric(2);
    let root = arena.rem(one, two);

    let generated = generate(&arena, root).unwrap();
    assert_eq!(
        body(&generated),
        vec!["mov eax, 1", "mov ecx, 2", "cdq", "idiv ecx", "mov eax, edx"]
    );
}

#[test]
fn test_shift_left() {
    let mut arena = ExprArena::new();
    let one = arena.numeric(1);
    let two = arena.numeric(2);
    let root = arena.shl(one, two);

    let generated = generate(&arena, root).unwrap();
    assert_eq!(body(&generated), vec!["mov eax, 1", "mov ecx, 2", "shl eax, cl"]);
}

#[test]
fn test_call_listing() {
    let mut arena = ExprArena::new();
    let f = arena.external("f");
    let two = arena.numeric(2);
    let root = arena.call(f, vec![two]);

    let generated = generate(&arena, root).unwrap();
    assert_eq!(generated.externs, vec!["f".to_string()]);
    assert_eq!(
        generated.listing().unwrap(),
        "extern f\n\
         push ebp\n\
         mov ebp, esp\n\
         mov eax, 2\n\
         push eax\n\
         mov eax, f\n\
         call eax\n\
         add esp, 4\n\
         mov esp, ebp\n\
         pop ebp\n\
         ret\n"
    );
}

#[test]
fn test_nested_calls() {
    let mut arena = ExprArena::new();
    let g = arena.external("g");
    let one = arena.numeric(1);
    let inner = arena.call(g, vec![one]);
    let f = arena.external("f");
    let two = arena.numeric(2);
    let root = arena.call(f, vec![inner, two]);

    let generated = generate(&arena, root).unwrap();
    assert_eq!(
        body(&generated),
        vec![
            "mov eax, 2",
            "push eax",
            "mov eax, 1",
            "push eax",
            "mov eax, g",
            "call eax",
            "add esp, 4",
            "push eax",
            "mov eax, f",
            "call eax",
            "add esp, 8",
        ]
    );
    assert_eq!(generated.externs, vec!["f".to_string(), "g".to_string()]);
}

#[test]
fn test_spilled_function_reserves_frame() {
    let mut arena = ExprArena::new();
    let a = arena.variable("a");
    let b = arena.variable("b");
    let c = arena.variable("c");
    let d = arena.variable("d");
    let ab = arena.add(a, b);
    let cd = arena.add(c, d);
    let root = arena.add(ab, cd);

    let options = AllocOptions::default().with_pool(&[Reg::Ecx, Reg::Eax]).unwrap();
    let generated = Generator::new(options).generate(&arena, root).unwrap();
    assert_eq!(generated.spill_count(), 1);

    let function: Vec<String> = generated
        .into_function()
        .unwrap()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(&function[..3], &["push ebp", "mov ebp, esp", "sub esp, 4"]);
    assert_eq!(&function[function.len() - 3..], &["mov esp, ebp", "pop ebp", "ret"]);
}

#[test]
fn test_tree_from_json() {
    let text = r#"{"Binary": ["Add", {"Load": {"AddressOfExternal": "g"}}, {"Numeric": 1}]}"#;
    let trees = ExprTree::from_json(text).unwrap();
    let mut arena = ExprArena::new();
    let root = arena.insert_tree(&trees[0]);

    let generated = generate(&arena, root).unwrap();
    assert_eq!(
        generated.body_listing(),
        "mov eax, g\nmov eax, [eax]\nmov ecx, 1\nadd eax, ecx\n"
    );
}

#[test]
fn test_invalid_pool_rejected() {
    assert!(matches!(
        AllocOptions::default().with_pool(&[Reg::Esp]),
        Err(AllocError::InvalidPool(_))
    ));
}

#[test]
fn test_options_from_json() {
    let options: AllocOptions =
        serde_json::from_str(r#"{"pool": ["ecx", "eax"], "trace_spills": true}"#).unwrap();
    assert_eq!(options.pool.regs(), &[Reg::Ecx, Reg::Eax]);
    assert!(options.trace_spills);

    let defaults: AllocOptions = serde_json::from_str("{}").unwrap();
    assert_eq!(defaults, AllocOptions::default());
}
