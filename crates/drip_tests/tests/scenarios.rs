//! Concrete scenarios S1-S6.

mod support;
use drip_bytecode::Value;
use support::{run_asm, run_source};

#[test]
fn s1_arithmetic_via_assembly() {
    let result = run_asm(
        "START_SUBROUTINE main\n\
         PUSH_FROM_LITERAL int 2\n\
         PUSH_FROM_LITERAL int 3\n\
         BINARY_ADD\n\
         RETURN\n\
         END_SUBROUTINE main\n",
    );
    assert_eq!(result, Value::int(5.0));
}

#[test]
fn s2_subtraction_order_via_assembly() {
    let result = run_asm(
        "START_SUBROUTINE main\n\
         PUSH_FROM_LITERAL int 2\n\
         PUSH_FROM_LITERAL int 3\n\
         BINARY_SUBTRACT\n\
         RETURN\n\
         END_SUBROUTINE main\n",
    );
    assert_eq!(result, Value::int(-1.0));
}

#[test]
fn s3_three_times_four_loop_via_assembly() {
    // x = 0; c = 3; start: x += 4; c -= 1; branch start while c != 0; return x.
    let result = run_asm(
        "START_SUBROUTINE main\n\
         PUSH_FROM_LITERAL int 0\n\
         POP_TO_NAME x\n\
         PUSH_FROM_LITERAL int 3\n\
         POP_TO_NAME c\n\
         SET_FLAG start\n\
         PUSH_FROM_NAME x\n\
         PUSH_FROM_LITERAL int 4\n\
         BINARY_ADD\n\
         POP_TO_NAME x\n\
         PUSH_FROM_NAME c\n\
         PUSH_FROM_LITERAL int 1\n\
         BINARY_SUBTRACT\n\
         POP_TO_NAME c\n\
         PUSH_FROM_NAME c\n\
         BRANCH_TO_FLAG start\n\
         PUSH_FROM_NAME x\n\
         RETURN\n\
         END_SUBROUTINE main\n",
    );
    assert_eq!(result, Value::int(12.0));
}

#[test]
fn s4_structures_and_functions_via_source() {
    let result = run_source(
        "structure Point ( x: Float, y: Float, )\n\
         structure Line ( start: Point, end: Point, )\n\
         function manhattan_length (line: Line) -> Float (\n\
           a = (line.start.x + line.end.x);\n\
           b = (line.start.y + line.end.y);\n\
           return a + b;\n\
         )\n\
         function main () -> Float (\n\
           origin = Point(x=0., y=0.,);\n\
           one_one = Point(x=4., y=5.,);\n\
           line_a = Line(start=origin, end=one_one,);\n\
           length = manhattan_length(line=line_a,);\n\
           return length;\n\
         )",
    );
    assert_eq!(result, Value::float(9.0));
}

#[test]
fn s5_recursive_increment_via_assembly() {
    let result = run_asm(
        "START_SUBROUTINE inc x\n\
         PUSH_FROM_NAME x\n\
         PUSH_FROM_LITERAL int 1\n\
         BINARY_ADD\n\
         RETURN\n\
         END_SUBROUTINE inc\n\
         START_SUBROUTINE main\n\
         PUSH_FROM_LITERAL int 5\n\
         CALL_SUBROUTINE inc\n\
         CALL_SUBROUTINE inc\n\
         RETURN\n\
         END_SUBROUTINE main\n",
    );
    assert_eq!(result, Value::int(7.0));
}

#[test]
fn s6_type_parameter_resolution_via_source() {
    let result = run_source(
        "structure Point[T, U] ( x: T, y: U, )\n\
         function main () -> Float (\n\
           origin = Point[T = Float, U = Float](x=0., y=0.,);\n\
           return origin.x;\n\
         )",
    );
    assert_eq!(result, Value::float(0.0));
}
