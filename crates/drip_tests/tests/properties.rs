//! Universal testable properties (spec §8). Each is checked against a small
//! set of representative programs rather than via a property-testing crate
//! — the grammar's state space is small enough that a handful of concrete
//! witnesses covers every code path these properties exercise.

mod support;
use drip_base::DripError;
use drip_bytecode::{Op, Subroutine, Value};
use drip_check::type_check_program;
use drip_compile::compile_program;
use drip_syntax::parse;
use drip_types::finalize::finalize;
use drip_vm::interpret_program;
use support::run_source;

/// 1. Every syntactically valid, type-checking program terminates (no
/// unbounded backward branch here) and returns a value of its declared
/// `main` return type.
#[test]
fn terminates_and_returns_declared_type() {
    let cases: &[(&str, Value)] = &[
        ("function main () -> Float ( return 1. + 2.; )", Value::float(3.0)),
        ("function main () -> Float ( x = 5.; return x - 2.; )", Value::float(3.0)),
        (
            "structure Point ( x: Float, y: Float, )\n\
             function main () -> Float ( p = Point(x=1., y=2.,); return p.y; )",
            Value::float(2.0),
        ),
    ];
    for (source, expected) in cases {
        assert_eq!(run_source(source), *expected, "source: {source}");
    }
}

/// 2. Round-trip: serializing a finalized program and re-parsing it yields
/// the same typed program, modulo spans (see `drip-fmt`'s own tests for the
/// span caveat; here we only need the *value* the pipeline produces to be
/// unaffected by a trip through `drip-fmt`).
#[test]
fn round_trip_through_serializer_preserves_runtime_value() {
    let source = "structure Point ( x: Float, y: Float, )\n\
                  function main () -> Float ( p = Point(x=4., y=5.,); return p.x + p.y; )";
    let prelim = parse(source).unwrap();
    let (program, interner) = finalize(&prelim).unwrap();
    let before = {
        type_check_program(&program).unwrap();
        let bytecode = compile_program(&program, &interner).unwrap();
        let main = interner.lookup("main").unwrap();
        let mut sink = Vec::new();
        interpret_program(&bytecode, main, &mut sink).unwrap()
    };

    let text = drip_fmt::serialize_program(&program, &interner);
    let reprelim = parse(&text).unwrap();
    let (reprogram, reinterner) = finalize(&reprelim).unwrap();
    type_check_program(&reprogram).unwrap();
    let rebytecode = compile_program(&reprogram, &reinterner).unwrap();
    let remain = reinterner.lookup("main").unwrap();
    let mut resink = Vec::new();
    let after = interpret_program(&rebytecode, remain, &mut resink).unwrap();

    assert_eq!(before, after);
}

/// 3. Rebinding a name within a function preserves its type.
#[test]
fn rebinding_with_a_different_type_is_rejected() {
    let prelim = parse(
        "structure Point ( x: Float, y: Float, )\n\
         function main () -> Float ( p = Point(x=1., y=2.,); p = 3.; return p.x; )",
    )
    .unwrap();
    let (program, _interner) = finalize(&prelim).unwrap();
    let err = type_check_program(&program).unwrap_err();
    assert!(matches!(err, DripError::TypeCheck(..)));
}

#[test]
fn rebinding_with_the_same_type_is_accepted() {
    let result = run_source("function main () -> Float ( x = 1.; x = x + 1.; return x; )");
    assert_eq!(result, Value::float(2.0));
}

/// 4. `BRANCH_TO_FLAG f` is a no-op when the condition is falsy, and jumps
/// to the instruction after `SET_FLAG f` when truthy.
#[test]
fn branch_to_flag_is_a_noop_on_a_falsy_condition() {
    use std::collections::HashMap;
    let mut interner = drip_base::Interner::new();
    let main = interner.intern("main");
    let flag = interner.intern("f");
    let ops = vec![
        Op::SetFlag(flag),
        Op::PushFromLiteral(Value::int(0.0)),
        Op::BranchToFlag(flag),
        Op::PushFromLiteral(Value::int(42.0)),
        Op::Return,
    ];
    let mut subroutines = HashMap::new();
    subroutines.insert(main, Subroutine { ops, arguments: Vec::new() });
    let program = drip_bytecode::Program::new(subroutines, HashMap::new());
    let mut sink = Vec::new();
    let result = interpret_program(&program, main, &mut sink).unwrap();
    assert_eq!(result, Value::int(42.0));
}

#[test]
fn branch_to_flag_resumes_immediately_after_set_flag_on_a_truthy_condition() {
    use std::collections::HashMap;
    let mut interner = drip_base::Interner::new();
    let main = interner.intern("main");
    let flag = interner.intern("f");
    // SET_FLAG f; PUSH 1; BRANCH_TO_FLAG f (taken -> resumes at index 2,
    // the PUSH_FROM_LITERAL 99 right after SET_FLAG); RETURN pops whatever
    // is on top, so a wrong landing spot would see the wrong value.
    let ops = vec![
        Op::SetFlag(flag),
        Op::PushFromLiteral(Value::int(1.0)),
        Op::BranchToFlag(flag),
        Op::PushFromLiteral(Value::int(7.0)),
        Op::Return,
    ];
    let mut subroutines = HashMap::new();
    subroutines.insert(main, Subroutine { ops, arguments: Vec::new() });
    let program = drip_bytecode::Program::new(subroutines, HashMap::new());
    let mut sink = Vec::new();
    let result = interpret_program(&program, main, &mut sink).unwrap();
    assert_eq!(result, Value::int(7.0));
}

/// 5. A recursive `CALL_SUBROUTINE` with k arguments removes exactly k
/// values from the caller's stack and pushes exactly one value back.
#[test]
fn call_subroutine_removes_k_args_and_pushes_one_value() {
    let result = run_source(
        "function add (a: Float, b: Float) -> Float ( return a + b; )\n\
         function main () -> Float ( return add(a=1., b=2.) + 10.; )",
    );
    // If CALL_SUBROUTINE left stray operands behind, BINARY_ADD after the
    // call would see the wrong stack depth and this would not type-check
    // or would compute the wrong value.
    assert_eq!(result, Value::float(13.0));
}

#[test]
fn recursive_call_through_multiple_frames_removes_args_each_time() {
    let result = run_source(
        "function double (n: Float) -> Float ( return n + n; )\n\
         function quadruple (n: Float) -> Float ( return double(n=double(n=n)); )\n\
         function main () -> Float ( return quadruple(n=2.); )",
    );
    assert_eq!(result, Value::float(8.0));
}

/// 6. `CONSTRUCT_STRUCTURE S` immediately followed by
/// `POP_AND_PUSH_PROPERTY S.fields[i].name` is equivalent to having pushed
/// that field's source expression directly.
#[test]
fn construct_then_property_access_equals_the_field_expression_directly() {
    let via_construction = run_source(
        "structure Point ( x: Float, y: Float, )\n\
         function main () -> Float ( p = Point(x=3., y=4.,); return p.x; )",
    );
    let direct = run_source("function main () -> Float ( return 3.; )");
    assert_eq!(via_construction, direct);
}
