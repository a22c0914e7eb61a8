//! # drip-compile
//!
//! Lowers a type-checked [`drip_types::ast::Program`] to a
//! [`drip_bytecode::Program`].
//!
//! The source grammar only ever supplies constructor and call arguments as
//! named pairs, and nothing in the grammar guarantees the call site lists
//! them in declaration order. The compiler is the one place that reorders
//! them: every `CONSTRUCT_STRUCTURE` pushes its field values in the
//! structure's declared field order, and every `CALL_SUBROUTINE` pushes its
//! argument values in the callee's declared parameter order, so the
//! interpreter can bind them positionally without carrying names at
//! runtime.
//!
//! ```
//! use drip_syntax::parse;
//! use drip_types::finalize::finalize;
//! use drip_check::type_check_program;
//! use drip_compile::compile_program;
//!
//! let prelim = parse("function main () -> Float ( return 1. + 2.; )").unwrap();
//! let (program, interner) = finalize(&prelim).unwrap();
//! type_check_program(&program).unwrap();
//! let bytecode = compile_program(&program, &interner).unwrap();
//! assert!(interner.lookup("main").is_some());
//! let _ = bytecode;
//! ```

use drip_base::{DripError, Interner, Result, Symbol};
use drip_bytecode::{Op, Program as BytecodeProgram, RuntimeStructure, Subroutine};
use drip_types::ast::{BinaryOp, Expression, FunctionDefinition, Program, Statement};
use drip_types::types::Primitive;
use std::collections::HashMap;
use std::rc::Rc;

/// Compiles every function in `program` into a runtime [`BytecodeProgram`].
///
/// Fails if the program has no function named `main`, since a bytecode
/// program with nothing to start from can never be interpreted.
pub fn compile_program(program: &Program, interner: &Interner) -> Result<BytecodeProgram> {
    let structures: HashMap<Symbol, Rc<RuntimeStructure>> = program
        .structures
        .iter()
        .map(|s| {
            let fields = s.fields.iter().map(|f| f.name).collect();
            (s.name, Rc::new(RuntimeStructure { name: s.name, fields }))
        })
        .collect();

    let field_order: HashMap<Symbol, &[Symbol]> = structures
        .iter()
        .map(|(name, s)| (*name, s.fields.as_slice()))
        .collect();

    let param_order: HashMap<Symbol, Vec<Symbol>> = program
        .functions
        .iter()
        .map(|f| (f.name, f.parameters.iter().map(|p| p.name).collect()))
        .collect();

    let mut subroutines = HashMap::new();
    for function in &program.functions {
        let subroutine = compile_function(function, &field_order, &param_order)?;
        subroutines.insert(function.name, subroutine);
    }

    let bytecode = BytecodeProgram::new(subroutines, structures);
    let main = interner
        .lookup("main")
        .ok_or_else(|| DripError::compiler("program has no main function"))?;
    bytecode.validate(main)?;
    Ok(bytecode)
}

fn compile_function(
    function: &FunctionDefinition,
    field_order: &HashMap<Symbol, &[Symbol]>,
    param_order: &HashMap<Symbol, Vec<Symbol>>,
) -> Result<Subroutine> {
    let mut ops = Vec::new();
    for stmt in &function.body {
        compile_statement(stmt, field_order, param_order, &mut ops)?;
    }
    Ok(Subroutine {
        ops,
        arguments: function.parameters.iter().map(|p| p.name).collect(),
    })
}

fn compile_statement(
    stmt: &Statement,
    field_order: &HashMap<Symbol, &[Symbol]>,
    param_order: &HashMap<Symbol, Vec<Symbol>>,
    ops: &mut Vec<Op>,
) -> Result<()> {
    match stmt {
        Statement::Assignment { name, expression, .. } => {
            compile_expression(expression, field_order, param_order, ops)?;
            ops.push(Op::PopToName(*name));
        }
        Statement::Return { expression, .. } => {
            compile_expression(expression, field_order, param_order, ops)?;
            ops.push(Op::Return);
        }
    }
    Ok(())
}

fn compile_expression(
    expr: &Expression,
    field_order: &HashMap<Symbol, &[Symbol]>,
    param_order: &HashMap<Symbol, Vec<Symbol>>,
    ops: &mut Vec<Op>,
) -> Result<()> {
    match expr {
        Expression::Literal { value, tag, .. } => {
            let literal = match tag {
                Primitive::Int => drip_bytecode::Value::int(*value),
                Primitive::Float => drip_bytecode::Value::float(*value),
            };
            ops.push(Op::PushFromLiteral(literal));
        }

        Expression::VariableReference { name, .. } => {
            ops.push(Op::PushFromName(*name));
        }

        Expression::Construction { type_name, args, span, .. } => {
            let order = field_order
                .get(type_name)
                .ok_or_else(|| DripError::compiler("construction of unknown structure"))?;
            for field_name in order.iter() {
                let (_, arg_expr) = args
                    .iter()
                    .find(|(name, _)| name == field_name)
                    .ok_or_else(|| DripError::Compiler("missing field in construction".into(), Some(*span)))?;
                compile_expression(arg_expr, field_order, param_order, ops)?;
            }
            ops.push(Op::ConstructStructure(*type_name));
        }

        Expression::FunctionCall { function_name, args, span } => {
            let order = param_order
                .get(function_name)
                .ok_or_else(|| DripError::Compiler("call to unknown function".into(), Some(*span)))?;
            for param_name in order.iter() {
                let (_, arg_expr) = args
                    .iter()
                    .find(|(name, _)| name == param_name)
                    .ok_or_else(|| {
                        DripError::Compiler("missing argument in function call".into(), Some(*span))
                    })?;
                compile_expression(arg_expr, field_order, param_order, ops)?;
            }
            ops.push(Op::CallSubroutine(*function_name));
        }

        Expression::PropertyAccess { entity, property_name, .. } => {
            compile_expression(entity, field_order, param_order, ops)?;
            ops.push(Op::PopAndPushProperty(*property_name));
        }

        Expression::BinaryOperator { operator, lhs, rhs, .. } => {
            compile_expression(lhs, field_order, param_order, ops)?;
            compile_expression(rhs, field_order, param_order, ops)?;
            ops.push(match operator {
                BinaryOp::Add => Op::BinaryAdd,
                BinaryOp::Subtract => Op::BinarySubtract,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use drip_syntax::parse;
    use drip_types::finalize::finalize;

    fn compile(source: &str) -> Result<(BytecodeProgram, drip_base::Interner)> {
        let prelim = parse(source).unwrap();
        let (program, interner) = finalize(&prelim).unwrap();
        let bytecode = compile_program(&program, &interner)?;
        Ok((bytecode, interner))
    }

    #[test]
    fn compiles_trivial_main() {
        let (program, _interner) = compile("function main () -> Float ( return 1. + 2.; )").unwrap();
        assert_eq!(program.subroutines.len(), 1);
    }

    #[test]
    fn rejects_program_without_main() {
        let err = compile("function helper () -> Float ( return 0.; )").unwrap_err();
        assert!(matches!(err, DripError::Compiler(..)));
    }

    #[test]
    fn reorders_construction_args_to_declared_field_order() {
        let (program, interner) = compile(
            "structure Point ( x: Float, y: Float, )\n\
             function main () -> Point ( return Point(y=2., x=1.,); )",
        )
        .unwrap();
        let main_sym = interner.lookup("main").unwrap();
        let subroutine = &program.subroutines[&main_sym];
        let construct_pos = subroutine
            .ops
            .iter()
            .position(|op| matches!(op, Op::ConstructStructure(_)))
            .unwrap();
        assert_eq!(construct_pos, 2, "two pushes must precede the construct op");
    }

    #[test]
    fn reorders_call_args_to_declared_parameter_order() {
        let (program, interner) = compile(
            "function add (a: Float, b: Float) -> Float ( return a + b; )\n\
             function main () -> Float ( return add(b=2., a=1.,); )",
        )
        .unwrap();
        let main_sym = interner.lookup("main").unwrap();
        let subroutine = &program.subroutines[&main_sym];
        let call_pos = subroutine
            .ops
            .iter()
            .position(|op| matches!(op, Op::CallSubroutine(_)))
            .unwrap();
        assert_eq!(call_pos, 2, "two pushes (a then b) must precede the call op");
    }
}
