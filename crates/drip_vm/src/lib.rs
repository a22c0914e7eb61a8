//! # drip-vm
//!
//! The stack-based bytecode interpreter (§4.H). `interpret_program` drives a
//! [`Program`] starting from its `main` subroutine; `interpret_subroutine`
//! recurses for every `CALL_SUBROUTINE`.
//!
//! The driver unconditionally advances the program counter by one after
//! every op, including a taken `BRANCH_TO_FLAG`. A branch to flag `f` (set
//! at `pc = k` by `SET_FLAG f`) therefore resumes execution at `k + 1` — the
//! op immediately following the `SET_FLAG` — not at `k` itself. This
//! fencepost is load-bearing: assembly programs are written expecting it.
//!
//! ```
//! use drip_syntax::parse;
//! use drip_types::finalize::finalize;
//! use drip_check::type_check_program;
//! use drip_compile::compile_program;
//! use drip_vm::interpret_program;
//!
//! let prelim = parse("function main () -> Float ( return 1. + 2.; )").unwrap();
//! let (program, interner) = finalize(&prelim).unwrap();
//! type_check_program(&program).unwrap();
//! let bytecode = compile_program(&program, &interner).unwrap();
//! let main = interner.lookup("main").unwrap();
//! let mut sink = Vec::new();
//! let result = interpret_program(&bytecode, main, &mut sink).unwrap();
//! assert_eq!(result, drip_bytecode::Value::float(3.0));
//! ```

use drip_base::{DripError, Result, Symbol};
use drip_bytecode::{FrameState, Op, PrimitiveTag, Program, Value};
use std::collections::HashMap;
use std::io::Write;

/// Interprets `program` starting at its `main` subroutine with no arguments,
/// writing every `PRINT_NAME` to `sink`.
pub fn interpret_program(program: &Program, main: Symbol, sink: &mut dyn Write) -> Result<Value> {
    let subroutine = program
        .subroutines
        .get(&main)
        .ok_or_else(|| DripError::runtime("no main subroutine"))?;
    let init_state = FrameState::new(HashMap::new(), std::rc::Rc::clone(&program.structures));
    interpret_subroutine(program, subroutine, init_state, sink)
}

/// Runs one subroutine body to completion, recursing into
/// `interpret_subroutine` for every `CALL_SUBROUTINE` it executes.
///
/// Returns `state.return_value` if a `RETURN` executed, else the canonical
/// zero value `Tagged(Int, 0)`.
pub fn interpret_subroutine(
    program: &Program,
    subroutine: &drip_bytecode::Subroutine,
    init_state: FrameState,
    sink: &mut dyn Write,
) -> Result<Value> {
    let mut state = init_state;

    while state.program_counter < subroutine.ops.len() && !state.return_set {
        let op = &subroutine.ops[state.program_counter];

        match op {
            Op::CallSubroutine(name) => {
                let callee = program
                    .subroutines
                    .get(name)
                    .ok_or_else(|| DripError::runtime("call to unknown subroutine"))?;
                let args = state.pop_n(callee.arguments.len())?;
                let names = callee
                    .arguments
                    .iter()
                    .copied()
                    .zip(args)
                    .collect::<HashMap<Symbol, Value>>();
                let callee_state = FrameState::new(names, std::rc::Rc::clone(&state.structures));
                let return_value = interpret_subroutine(program, callee, callee_state, sink)?;
                state.push(return_value);
            }
            _ => interpret_op(op, &mut state, sink)?,
        }

        state.program_counter += 1;
    }

    Ok(state.return_value.take().unwrap_or_else(|| Value::int(0.0)))
}

/// Executes every op except `CALL_SUBROUTINE`, which the driver in
/// [`interpret_subroutine`] handles directly since it recurses.
fn interpret_op(op: &Op, state: &mut FrameState, sink: &mut dyn Write) -> Result<()> {
    match op {
        Op::Noop => {}

        Op::PushFromLiteral(value) => state.push(value.clone()),

        Op::PushFromName(name) => {
            let value = state
                .names
                .get(name)
                .cloned()
                .ok_or_else(|| DripError::runtime("unbound name"))?;
            state.push(value);
        }

        Op::PopToName(name) => {
            let value = state.pop()?;
            state.names.insert(*name, value);
        }

        Op::StoreFromLiteral(name, value) => {
            state.names.insert(*name, value.clone());
        }

        Op::BinaryAdd => {
            let values = state.pop_n(2)?;
            let (b, a) = (&values[0], &values[1]);
            let (tag_b, val_b) = tagged(b)?;
            let (tag_a, val_a) = tagged(a)?;
            if tag_a != tag_b {
                return Err(DripError::runtime("BINARY_ADD operands must share a tag"));
            }
            state.push(Value::Tagged {
                tag: tag_b,
                value: val_b + val_a,
            });
        }

        Op::BinarySubtract => {
            let values = state.pop_n(2)?;
            let (l, r) = (&values[0], &values[1]);
            let (tag_l, val_l) = tagged(l)?;
            let (_, val_r) = tagged(r)?;
            state.push(Value::Tagged {
                tag: tag_l,
                value: val_l - val_r,
            });
        }

        Op::ConstructStructure(name) => {
            let structure = state
                .structures
                .get(name)
                .cloned()
                .ok_or_else(|| DripError::runtime("construction of unknown structure"))?;
            let values = state.pop_n(structure.fields.len())?;
            let fields = structure
                .fields
                .iter()
                .copied()
                .zip(values)
                .collect::<HashMap<Symbol, Value>>();
            state.push(Value::Instance {
                structure: *name,
                fields,
            });
        }

        Op::PopAndPushProperty(property) => {
            let instance = state.pop()?;
            match instance {
                Value::Instance { fields, .. } => {
                    let value = fields
                        .get(property)
                        .cloned()
                        .ok_or_else(|| DripError::runtime("absent field"))?;
                    state.push(value);
                }
                Value::Tagged { .. } => {
                    return Err(DripError::runtime("property access on a non-structure value"))
                }
            }
        }

        Op::SetFlag(flag) => {
            if state.flags.contains_key(flag) {
                return Err(DripError::runtime("flag set more than once"));
            }
            state.flags.insert(*flag, state.program_counter);
        }

        Op::BranchToFlag(flag) => {
            let target = *state
                .flags
                .get(flag)
                .ok_or_else(|| DripError::runtime("branch to unset flag"))?;
            let condition = state.pop()?;
            if condition.is_truthy() {
                state.program_counter = target;
            }
        }

        Op::Return => {
            if state.return_set {
                return Err(DripError::runtime("return executed twice in one frame"));
            }
            let value = state.pop()?;
            state.return_value = Some(value);
            state.return_set = true;
        }

        Op::PrintName(name) => {
            let value = state
                .names
                .get(name)
                .ok_or_else(|| DripError::runtime("unbound name"))?;
            writeln!(sink, "{}", value.to_display_string())
                .map_err(|e| DripError::runtime(format!("diagnostic sink write failed: {e}")))?;
        }

        Op::CallSubroutine(_) => unreachable!("CALL_SUBROUTINE is handled by the driver"),
    }
    Ok(())
}

fn tagged(value: &Value) -> Result<(PrimitiveTag, f64)> {
    match value {
        Value::Tagged { tag, value } => Ok((*tag, *value)),
        Value::Instance { .. } => Err(DripError::runtime("arithmetic on a non-tagged value")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drip_check::type_check_program;
    use drip_compile::compile_program;
    use drip_syntax::parse;
    use drip_types::finalize::finalize;

    fn run(source: &str) -> Result<Value> {
        let prelim = parse(source).unwrap();
        let (program, interner) = finalize(&prelim).unwrap();
        type_check_program(&program).unwrap();
        let bytecode = compile_program(&program, &interner).unwrap();
        let main = interner.lookup("main").unwrap();
        let mut sink = Vec::new();
        interpret_program(&bytecode, main, &mut sink)
    }

    #[test]
    fn arithmetic_subtracts_in_source_order() {
        let result = run("function main () -> Float ( return 5. - 2.; )").unwrap();
        assert_eq!(result, Value::float(3.0));
    }

    #[test]
    fn construction_and_property_access_round_trip() {
        let result = run(
            "structure Point ( x: Float, y: Float, )\n\
             function main () -> Float ( p = Point(x=7., y=9.,); return p.x; )",
        )
        .unwrap();
        assert_eq!(result, Value::float(7.0));
    }

    #[test]
    fn recursive_call_removes_args_and_returns_one_value() {
        let result = run(
            "function add (a: Float, b: Float) -> Float ( return a + b; )\n\
             function main () -> Float ( return add(a=1., b=2.,); )",
        )
        .unwrap();
        assert_eq!(result, Value::float(3.0));
    }

    #[test]
    fn missing_return_falls_back_to_zero() {
        use drip_bytecode::{Op as RawOp, Subroutine};
        use std::collections::HashMap as Map;
        let mut interner = drip_base::Interner::new();
        let main = interner.intern("main");
        let mut subroutines = Map::new();
        subroutines.insert(main, Subroutine { ops: vec![RawOp::Noop], arguments: Vec::new() });
        let program = Program::new(subroutines, Map::new());
        let mut sink = Vec::new();
        let result = interpret_program(&program, main, &mut sink).unwrap();
        assert_eq!(result, Value::int(0.0));
    }

    #[test]
    fn print_name_writes_bare_numeric_display() {
        let prelim = parse("function main () -> Float ( x = 5.; return x; )").unwrap();
        let (typed, interner) = finalize(&prelim).unwrap();
        type_check_program(&typed).unwrap();
        let mut bytecode = compile_program(&typed, &interner).unwrap();
        let main = interner.lookup("main").unwrap();
        let x = interner.lookup("x").unwrap();
        bytecode
            .subroutines
            .get_mut(&main)
            .unwrap()
            .ops
            .insert(2, Op::PrintName(x));
        let mut sink = Vec::new();
        interpret_program(&bytecode, main, &mut sink).unwrap();
        assert_eq!(String::from_utf8(sink).unwrap(), "5\n");
    }

    #[test]
    fn branch_to_flag_resumes_after_the_set_flag_op() {
        use drip_bytecode::{Op as RawOp, Subroutine};
        let mut interner = drip_base::Interner::new();
        let main = interner.intern("main");
        let loop_flag = interner.intern("loop");
        // Ops: PUSH 0 -> POP_TO n; SET_FLAG loop; PUSH 0 (condition=false, so
        // BRANCH_TO_FLAG falls through); RETURN 99.
        let ops = vec![
            RawOp::PushFromLiteral(Value::int(0.0)),
            RawOp::SetFlag(loop_flag),
            RawOp::PushFromLiteral(Value::int(0.0)),
            RawOp::BranchToFlag(loop_flag),
            RawOp::PushFromLiteral(Value::int(99.0)),
            RawOp::Return,
        ];
        let mut subroutines = HashMap::new();
        subroutines.insert(main, Subroutine { ops, arguments: Vec::new() });
        let program = Program::new(subroutines, HashMap::new());
        let mut sink = Vec::new();
        let result = interpret_program(&program, main, &mut sink).unwrap();
        assert_eq!(result, Value::int(99.0));
    }
}
