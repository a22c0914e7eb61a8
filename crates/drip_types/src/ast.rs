//! The typed (finalized) AST. Names are interned [`Symbol`]s and structure
//! references point at a shared, already-finalized [`StructureDefinition`].
//! Lives for the duration of type-check + compile, then is discarded.

use crate::types::{ConcreteType, Primitive, StructureDefinition};
use drip_base::{Span, Symbol};
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Source-level literals are always `Float` — the grammar has no
    /// integer literal syntax; only the assembly front end distinguishes
    /// int/float tags.
    Literal {
        value: f64,
        tag: Primitive,
        span: Span,
    },
    VariableReference {
        name: Symbol,
        span: Span,
    },
    /// `type_args` maps each type-parameter name to the *textual* type name
    /// supplied at the call site — resolving it to a [`ConcreteType`] and
    /// calling [`StructureDefinition::resolve_type`] is the type checker's
    /// job, since it requires the live structure/primitive lookup tables.
    Construction {
        type_name: Symbol,
        type_args: Vec<(Symbol, Symbol)>,
        args: Vec<(Symbol, Expression)>,
        span: Span,
    },
    FunctionCall {
        function_name: Symbol,
        args: Vec<(Symbol, Expression)>,
        span: Span,
    },
    PropertyAccess {
        entity: Box<Expression>,
        property_name: Symbol,
        span: Span,
    },
    BinaryOperator {
        operator: BinaryOp,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
        span: Span,
    },
}

impl Expression {
    pub fn span(&self) -> Span {
        match self {
            Expression::Literal { span, .. }
            | Expression::VariableReference { span, .. }
            | Expression::Construction { span, .. }
            | Expression::FunctionCall { span, .. }
            | Expression::PropertyAccess { span, .. }
            | Expression::BinaryOperator { span, .. } => *span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Assignment {
        name: Symbol,
        expression: Expression,
        span: Span,
    },
    Return {
        expression: Expression,
        span: Span,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentDefinition {
    pub name: Symbol,
    pub type_: ConcreteType,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDefinition {
    pub name: Symbol,
    pub parameters: Vec<ArgumentDefinition>,
    pub return_type: ConcreteType,
    pub body: Vec<Statement>,
    pub span: Span,
}

/// The finalized, typed program: ordered structure and function tables plus
/// derived lookup maps by name.
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub structures: Vec<Rc<StructureDefinition>>,
    pub functions: Vec<FunctionDefinition>,
    /// The symbols `"Int"`/`"Float"` were interned under, so later stages
    /// can recognize a primitive name from its [`Symbol`] alone.
    pub primitives: HashMap<Symbol, Primitive>,
    structure_lookup: HashMap<Symbol, Rc<StructureDefinition>>,
    function_lookup: HashMap<Symbol, usize>,
}

impl Program {
    pub fn new(
        structures: Vec<Rc<StructureDefinition>>,
        functions: Vec<FunctionDefinition>,
        primitives: HashMap<Symbol, Primitive>,
    ) -> Self {
        let structure_lookup = structures.iter().map(|s| (s.name, Rc::clone(s))).collect();
        let function_lookup = functions
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name, i))
            .collect();
        Self {
            structures,
            functions,
            primitives,
            structure_lookup,
            function_lookup,
        }
    }

    pub fn structure(&self, name: Symbol) -> Option<&Rc<StructureDefinition>> {
        self.structure_lookup.get(&name)
    }

    pub fn function(&self, name: Symbol) -> Option<&FunctionDefinition> {
        self.function_lookup.get(&name).map(|&i| &self.functions[i])
    }
}
