//! The finalization pass: preliminary AST → typed AST.
//!
//! Two passes, mirroring §4.C:
//!
//! 1. Build the structure table. For each structure in declaration order,
//!    resolve every field's type-name against the primitive set and the
//!    *previously* finalized structures; a type-name equal to a declared
//!    type parameter of the current structure becomes a [`Placeholder`]
//!    and defers resolution. Forward references between structures are
//!    rejected — this keeps finalization O(N) without a topological sort.
//! 2. Build the function table using the completed structure table for
//!    parameter and return type resolution.
//!
//! [`Placeholder`]: crate::types::ExpressionType::Placeholder
//!
//! ```
//! use drip_syntax::parse;
//! use drip_types::finalize::finalize;
//!
//! let prelim = parse("structure Point ( x: Float, y: Float, )").unwrap();
//! let (program, _interner) = finalize(&prelim).unwrap();
//! assert_eq!(program.structures.len(), 1);
//! ```

use crate::ast::{ArgumentDefinition, BinaryOp, Expression, FunctionDefinition, Program, Statement};
use crate::types::{primitive_name_to_type, ConcreteType, ExpressionType, FieldDefinition, StructureDefinition};
use drip_base::{DripError, Interner, Result, Symbol};
use drip_syntax::ast as prelim_ast;
use std::collections::HashMap;
use std::rc::Rc;

/// Finalizes a preliminary program into a typed [`Program`], returning the
/// interner that assigned every [`Symbol`] along the way.
pub fn finalize(prelim: &prelim_ast::Program) -> Result<(Program, Interner)> {
    let mut interner = Interner::new();
    let primitives = crate::types::intern_primitive_symbols(&mut interner);
    let mut structures_so_far: HashMap<Symbol, Rc<StructureDefinition>> = HashMap::new();
    let mut ordered_structures = Vec::new();

    for sdef in &prelim.structures {
        let name = interner.intern(&sdef.name);
        let type_parameters: Vec<Symbol> = sdef
            .type_parameters
            .iter()
            .map(|p| interner.intern(p))
            .collect();

        let mut fields = Vec::new();
        for field in &sdef.fields {
            let type_ = resolve_field_type(
                &field.type_name,
                &type_parameters,
                &structures_so_far,
                &mut interner,
                field.span,
            )?;
            fields.push(FieldDefinition {
                name: interner.intern(&field.name),
                type_,
            });
        }

        let def = Rc::new(StructureDefinition {
            name,
            type_parameters,
            fields,
        });
        structures_so_far.insert(name, Rc::clone(&def));
        ordered_structures.push(def);
    }

    let mut functions = Vec::new();
    for fdef in &prelim.functions {
        let name = interner.intern(&fdef.name);
        let mut parameters = Vec::new();
        for param in &fdef.parameters {
            let type_ = resolve_concrete_type_name(
                &param.type_name,
                &structures_so_far,
                &mut interner,
                param.span,
            )?;
            parameters.push(ArgumentDefinition {
                name: interner.intern(&param.name),
                type_,
                span: param.span,
            });
        }
        let return_type = resolve_concrete_type_name(
            &fdef.return_type,
            &structures_so_far,
            &mut interner,
            fdef.span,
        )?;
        let body = fdef
            .body
            .iter()
            .map(|stmt| convert_statement(stmt, &mut interner))
            .collect();
        functions.push(FunctionDefinition {
            name,
            parameters,
            return_type,
            body,
            span: fdef.span,
        });
    }

    Ok((Program::new(ordered_structures, functions, primitives), interner))
}

fn resolve_field_type(
    type_name: &str,
    type_parameters: &[Symbol],
    structures_so_far: &HashMap<Symbol, Rc<StructureDefinition>>,
    interner: &mut Interner,
    span: drip_base::Span,
) -> Result<ExpressionType> {
    let sym = interner.intern(type_name);
    if type_parameters.contains(&sym) {
        return Ok(ExpressionType::Placeholder(sym));
    }
    if let Some(primitive) = primitive_name_to_type(type_name) {
        return Ok(ExpressionType::Concrete(ConcreteType::Primitive(primitive)));
    }
    if let Some(structure) = structures_so_far.get(&sym) {
        return Ok(ExpressionType::Concrete(ConcreteType::Structure(Rc::clone(
            structure,
        ))));
    }
    Err(DripError::name_resolution(
        format!("unknown type '{type_name}' (forward references between structures are not allowed)"),
        span,
    ))
}

fn resolve_concrete_type_name(
    type_name: &str,
    structures_so_far: &HashMap<Symbol, Rc<StructureDefinition>>,
    interner: &mut Interner,
    span: drip_base::Span,
) -> Result<ConcreteType> {
    if let Some(primitive) = primitive_name_to_type(type_name) {
        return Ok(ConcreteType::Primitive(primitive));
    }
    let sym = interner.intern(type_name);
    if let Some(structure) = structures_so_far.get(&sym) {
        return Ok(ConcreteType::Structure(Rc::clone(structure)));
    }
    Err(DripError::name_resolution(
        format!("unknown type '{type_name}'"),
        span,
    ))
}

fn convert_statement(stmt: &prelim_ast::Statement, interner: &mut Interner) -> Statement {
    match stmt {
        prelim_ast::Statement::Assignment { name, expression, span } => Statement::Assignment {
            name: interner.intern(name),
            expression: convert_expression(expression, interner),
            span: *span,
        },
        prelim_ast::Statement::Return { expression, span } => Statement::Return {
            expression: convert_expression(expression, interner),
            span: *span,
        },
    }
}

fn convert_expression(expr: &prelim_ast::Expression, interner: &mut Interner) -> Expression {
    match expr {
        prelim_ast::Expression::Literal { value, span } => Expression::Literal {
            value: *value,
            tag: crate::types::Primitive::Float,
            span: *span,
        },
        prelim_ast::Expression::VariableReference { name, span } => Expression::VariableReference {
            name: interner.intern(name),
            span: *span,
        },
        prelim_ast::Expression::Construction {
            type_name,
            type_args,
            args,
            span,
        } => Expression::Construction {
            type_name: interner.intern(type_name),
            type_args: type_args
                .iter()
                .map(|(param, ty)| (interner.intern(param), interner.intern(ty)))
                .collect(),
            args: args
                .iter()
                .map(|(name, e)| (interner.intern(name), convert_expression(e, interner)))
                .collect(),
            span: *span,
        },
        prelim_ast::Expression::FunctionCall {
            function_name,
            args,
            span,
        } => Expression::FunctionCall {
            function_name: interner.intern(function_name),
            args: args
                .iter()
                .map(|(name, e)| (interner.intern(name), convert_expression(e, interner)))
                .collect(),
            span: *span,
        },
        prelim_ast::Expression::PropertyAccess {
            entity,
            property_name,
            span,
        } => Expression::PropertyAccess {
            entity: Box::new(convert_expression(entity, interner)),
            property_name: interner.intern(property_name),
            span: *span,
        },
        prelim_ast::Expression::BinaryOperator {
            operator,
            lhs,
            rhs,
            span,
        } => Expression::BinaryOperator {
            operator: match operator {
                prelim_ast::BinaryOp::Add => BinaryOp::Add,
                prelim_ast::BinaryOp::Subtract => BinaryOp::Subtract,
            },
            lhs: Box::new(convert_expression(lhs, interner)),
            rhs: Box::new(convert_expression(rhs, interner)),
            span: *span,
        },
    }
}
