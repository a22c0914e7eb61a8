//! # drip-fmt
//!
//! Serializes a finalized [`drip_types::ast::Program`] back to surface
//! syntax. Structure and function preambles are spread over multiple
//! lines, one field or parameter per line; a binary operator is always
//! printed infix and parenthesized, so the result never depends on an
//! operator-precedence convention the reader has to recall.
//!
//! The serializer only ever sees a *typed* program, so every type name it
//! prints came from resolving a structure or primitive, never from
//! re-emitting unresolved source text. Round-tripping
//! `parse . finalize . serialize . parse . finalize` back to the same typed
//! program is the property `drip-fmt`'s tests check.
//!
//! ```
//! use drip_syntax::parse;
//! use drip_types::finalize::finalize;
//! use drip_fmt::serialize_program;
//!
//! let prelim = parse("function main () -> Float ( return 1. + 2.; )").unwrap();
//! let (program, interner) = finalize(&prelim).unwrap();
//! let text = serialize_program(&program, &interner);
//! assert!(text.contains("(1 + 2)"));
//! ```

use drip_base::{Interner, Symbol};
use drip_types::ast::{BinaryOp, Expression, FunctionDefinition, Program, Statement};
use drip_types::types::{ConcreteType, ExpressionType, Primitive, StructureDefinition};

const INDENT: &str = "    ";

/// Serializes every structure definition, then every function definition,
/// in their declaration order.
pub fn serialize_program(program: &Program, interner: &Interner) -> String {
    let mut out = String::new();
    for structure in &program.structures {
        out.push_str(&serialize_structure(structure, interner));
        out.push_str("\n\n");
    }
    for function in &program.functions {
        out.push_str(&serialize_function(function, interner));
        out.push_str("\n\n");
    }
    out
}

fn serialize_structure(structure: &StructureDefinition, interner: &Interner) -> String {
    let mut out = format!("structure {}", interner.resolve(structure.name));
    out.push_str(&serialize_type_params(&structure.type_parameters, interner));
    out.push_str(" (\n");
    for field in &structure.fields {
        out.push_str(INDENT);
        out.push_str(interner.resolve(field.name));
        out.push_str(": ");
        out.push_str(&expression_type_name(&field.type_, interner));
        out.push_str(",\n");
    }
    out.push(')');
    out
}

fn serialize_function(function: &FunctionDefinition, interner: &Interner) -> String {
    let mut out = format!("function {} (\n", interner.resolve(function.name));
    for param in &function.parameters {
        out.push_str(INDENT);
        out.push_str(interner.resolve(param.name));
        out.push_str(": ");
        out.push_str(&concrete_type_name(&param.type_, interner));
        out.push_str(",\n");
    }
    out.push_str(") -> ");
    out.push_str(&concrete_type_name(&function.return_type, interner));
    out.push_str(" (\n");
    for statement in &function.body {
        out.push_str(INDENT);
        out.push_str(&serialize_statement(statement, interner));
        out.push_str(";\n");
    }
    out.push(')');
    out
}

fn serialize_statement(statement: &Statement, interner: &Interner) -> String {
    match statement {
        Statement::Assignment { name, expression, .. } => {
            format!("{} = {}", interner.resolve(*name), serialize_expression(expression, interner))
        }
        Statement::Return { expression, .. } => format!("return {}", serialize_expression(expression, interner)),
    }
}

fn serialize_expression(expression: &Expression, interner: &Interner) -> String {
    match expression {
        Expression::Literal { value, .. } => format_number(*value),
        Expression::VariableReference { name, .. } => interner.resolve(*name).to_string(),
        Expression::Construction {
            type_name,
            type_args,
            args,
            ..
        } => {
            let mut out = interner.resolve(*type_name).to_string();
            out.push_str(&serialize_type_args(type_args, interner));
            out.push('(');
            out.push_str(&serialize_args(args, interner));
            out.push(')');
            out
        }
        Expression::FunctionCall { function_name, args, .. } => {
            format!("{}({})", interner.resolve(*function_name), serialize_args(args, interner))
        }
        Expression::PropertyAccess { entity, property_name, .. } => {
            format!("{}.{}", serialize_expression(entity, interner), interner.resolve(*property_name))
        }
        Expression::BinaryOperator { operator, lhs, rhs, .. } => format!(
            "({} {} {})",
            serialize_expression(lhs, interner),
            binary_op_symbol(*operator),
            serialize_expression(rhs, interner)
        ),
    }
}

fn serialize_args(args: &[(Symbol, Expression)], interner: &Interner) -> String {
    args.iter()
        .map(|(name, expr)| format!("{}={},", interner.resolve(*name), serialize_expression(expr, interner)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn serialize_type_params(type_parameters: &[Symbol], interner: &Interner) -> String {
    if type_parameters.is_empty() {
        return String::new();
    }
    let names = type_parameters
        .iter()
        .map(|p| interner.resolve(*p))
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{names}]")
}

fn serialize_type_args(type_args: &[(Symbol, Symbol)], interner: &Interner) -> String {
    if type_args.is_empty() {
        return String::new();
    }
    let pairs = type_args
        .iter()
        .map(|(param, ty)| format!("{} = {}", interner.resolve(*param), interner.resolve(*ty)))
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{pairs}]")
}

fn binary_op_symbol(operator: BinaryOp) -> &'static str {
    match operator {
        BinaryOp::Add => "+",
        BinaryOp::Subtract => "-",
    }
}

fn concrete_type_name(type_: &ConcreteType, interner: &Interner) -> String {
    match type_ {
        ConcreteType::Primitive(Primitive::Int) => "Int".to_string(),
        ConcreteType::Primitive(Primitive::Float) => "Float".to_string(),
        ConcreteType::Structure(structure) => interner.resolve(structure.name).to_string(),
    }
}

fn expression_type_name(type_: &ExpressionType, interner: &Interner) -> String {
    match type_ {
        ExpressionType::Concrete(concrete) => concrete_type_name(concrete, interner),
        ExpressionType::Placeholder(name) => interner.resolve(*name).to_string(),
    }
}

/// Renders a literal value the lexer can read back. `NUMBER` is
/// `digit+ ('.' digit*)?`, so a whole number prints with no decimal point
/// at all rather than a trailing `.`.
fn format_number(value: f64) -> String {
    format!("{value}")
}
