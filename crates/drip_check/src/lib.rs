//! # drip-check
//!
//! The type checker: validates a finalized [`drip_types::ast::Program`].
//!
//! `function_return_types` accumulates as functions are checked in
//! declaration order (§4.E), so a function may call any function declared
//! earlier in the same program but not one declared later or itself.
//!
//! ```
//! use drip_syntax::parse;
//! use drip_types::finalize::finalize;
//! use drip_check::type_check_program;
//!
//! let prelim = parse("function main () -> Float ( return 0.; )").unwrap();
//! let (program, _interner) = finalize(&prelim).unwrap();
//! type_check_program(&program).unwrap();
//! ```

use drip_base::{DripError, Result, Symbol};
use drip_types::ast::{BinaryOp, Expression, FunctionDefinition, Program, Statement};
use drip_types::types::{ConcreteType, ExpressionType};
use std::collections::HashMap;
use std::rc::Rc;

/// Per-program type-checking state: the structure/function environment and
/// the incrementally-populated table of already-checked function return
/// types.
struct TypeCheckingContext<'p> {
    program: &'p Program,
    function_return_types: HashMap<Symbol, ConcreteType>,
}

/// Type-checks every function in `program`, in declaration order.
pub fn type_check_program(program: &Program) -> Result<()> {
    let mut ctx = TypeCheckingContext {
        program,
        function_return_types: HashMap::new(),
    };
    for function in &program.functions {
        ctx.type_check_function(function)?;
    }
    Ok(())
}

impl<'p> TypeCheckingContext<'p> {
    fn type_check_function(&mut self, function: &FunctionDefinition) -> Result<()> {
        let mut local_scope: HashMap<Symbol, ConcreteType> = HashMap::new();
        for param in &function.parameters {
            local_scope.insert(param.name, param.type_.clone());
        }

        let mut return_set = false;
        let mut inferred_return: Option<ConcreteType> = None;

        for stmt in &function.body {
            if return_set {
                return Err(DripError::type_check(
                    "no statement may follow a return",
                    stmt_span(stmt),
                ));
            }
            match stmt {
                Statement::Return { expression, .. } => {
                    inferred_return = Some(self.type_check_expression(expression, &local_scope)?);
                    return_set = true;
                }
                Statement::Assignment { name, expression, span } => {
                    let ty = self.type_check_expression(expression, &local_scope)?;
                    if let Some(prev) = local_scope.get(name) {
                        if *prev != ty {
                            return Err(DripError::type_check(
                                "reassignment must keep the same type as the prior binding",
                                *span,
                            ));
                        }
                    }
                    local_scope.insert(*name, ty);
                }
            }
        }

        if !return_set {
            return Err(DripError::type_check(
                "function body must end with a return statement",
                function.span,
            ));
        }
        let inferred = inferred_return.expect("return_set implies inferred_return is populated");
        if inferred != function.return_type {
            return Err(DripError::type_check(
                "inferred return type does not match the declared return type",
                function.span,
            ));
        }

        self.function_return_types
            .insert(function.name, function.return_type.clone());
        Ok(())
    }

    fn type_check_expression(
        &self,
        expr: &Expression,
        local_scope: &HashMap<Symbol, ConcreteType>,
    ) -> Result<ConcreteType> {
        match expr {
            Expression::Literal { tag, .. } => Ok(ConcreteType::Primitive(*tag)),

            Expression::VariableReference { name, span } => local_scope
                .get(name)
                .cloned()
                .ok_or_else(|| DripError::name_resolution("unknown variable", *span)),

            Expression::Construction {
                type_name,
                type_args,
                args,
                span,
            } => {
                let structure = self
                    .program
                    .structure(*type_name)
                    .ok_or_else(|| DripError::name_resolution("unknown structure", *span))?;

                if type_args.is_empty() {
                    self.check_construction_args(structure, args, local_scope, *span)?;
                    Ok(ConcreteType::Structure(Rc::clone(structure)))
                } else {
                    let mut map = HashMap::new();
                    for (param_name, type_name_sym) in type_args {
                        let concrete = self.resolve_concrete_type(*type_name_sym, *span)?;
                        map.insert(*param_name, concrete);
                    }
                    for declared in &structure.type_parameters {
                        if !map.contains_key(declared) {
                            return Err(DripError::type_check(
                                "missing type argument for structure type parameter",
                                *span,
                            ));
                        }
                    }
                    let resolved = Rc::new(structure.resolve_type(&map));
                    self.check_construction_args(&resolved, args, local_scope, *span)?;
                    Ok(ConcreteType::Structure(resolved))
                }
            }

            Expression::FunctionCall {
                function_name,
                args,
                span,
            } => {
                let return_type = self
                    .function_return_types
                    .get(function_name)
                    .cloned()
                    .ok_or_else(|| {
                        DripError::name_resolution(
                            "unknown function (or called before its declaration)",
                            *span,
                        )
                    })?;
                let function_def = self
                    .program
                    .function(*function_name)
                    .expect("a return type is only recorded for a declared function");

                if args.len() != function_def.parameters.len() {
                    return Err(DripError::type_check(
                        "function call argument count does not match declaration",
                        *span,
                    ));
                }
                for param in &function_def.parameters {
                    let (_, arg_expr) = args
                        .iter()
                        .find(|(name, _)| *name == param.name)
                        .ok_or_else(|| {
                            DripError::type_check("missing named argument for parameter", *span)
                        })?;
                    let arg_ty = self.type_check_expression(arg_expr, local_scope)?;
                    if arg_ty != param.type_ {
                        return Err(DripError::type_check(
                            "argument type does not match declared parameter type",
                            *span,
                        ));
                    }
                }
                Ok(return_type)
            }

            Expression::PropertyAccess {
                entity,
                property_name,
                span,
            } => {
                let inner = self.type_check_expression(entity, local_scope)?;
                match inner {
                    ConcreteType::Structure(s) => {
                        let field = s.field_lookup(*property_name).ok_or_else(|| {
                            DripError::name_resolution("unknown field", *span)
                        })?;
                        match &field.type_ {
                            ExpressionType::Concrete(c) => Ok(c.clone()),
                            ExpressionType::Placeholder(_) => Err(DripError::type_check(
                                "field type parameter was never resolved",
                                *span,
                            )),
                        }
                    }
                    ConcreteType::Primitive(_) => Err(DripError::type_check(
                        "property access on a primitive value",
                        *span,
                    )),
                }
            }

            Expression::BinaryOperator { lhs, rhs, span, .. } => {
                let l = self.type_check_expression(lhs, local_scope)?;
                let r = self.type_check_expression(rhs, local_scope)?;
                if l != r {
                    return Err(DripError::type_check(
                        "binary operator operands must have the same type",
                        *span,
                    ));
                }
                Ok(l)
            }
        }
    }

    fn check_construction_args(
        &self,
        structure: &drip_types::types::StructureDefinition,
        args: &[(Symbol, Expression)],
        local_scope: &HashMap<Symbol, ConcreteType>,
        span: drip_base::Span,
    ) -> Result<()> {
        if args.len() != structure.fields.len() {
            return Err(DripError::type_check(
                "construction argument count does not match the structure's field count",
                span,
            ));
        }
        for field in &structure.fields {
            let (_, arg_expr) = args
                .iter()
                .find(|(name, _)| *name == field.name)
                .ok_or_else(|| DripError::type_check("missing field in construction", span))?;
            let arg_ty = self.type_check_expression(arg_expr, local_scope)?;
            let field_concrete = field.type_.as_concrete().ok_or_else(|| {
                DripError::type_check("structure field type parameter was never resolved", span)
            })?;
            if arg_ty != *field_concrete {
                return Err(DripError::type_check(
                    "construction argument type does not match declared field type",
                    span,
                ));
            }
        }
        Ok(())
    }

    fn resolve_concrete_type(&self, type_name: Symbol, span: drip_base::Span) -> Result<ConcreteType> {
        if let Some(structure) = self.program.structure(type_name) {
            return Ok(ConcreteType::Structure(Rc::clone(structure)));
        }
        if let Some(primitive) = self.program.primitives.get(&type_name) {
            return Ok(ConcreteType::Primitive(*primitive));
        }
        Err(DripError::name_resolution("unknown type argument", span))
    }
}

fn stmt_span(stmt: &Statement) -> drip_base::Span {
    match stmt {
        Statement::Assignment { span, .. } | Statement::Return { span, .. } => *span,
    }
}
