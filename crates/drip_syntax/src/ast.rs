//! The preliminary AST: parser output holding textual type-names, not
//! resolved types. Discarded after finalization (see `drip-types`).

use drip_base::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal {
        value: f64,
        span: Span,
    },
    VariableReference {
        name: String,
        span: Span,
    },
    Construction {
        type_name: String,
        type_args: Vec<(String, String)>,
        args: Vec<(String, Expression)>,
        span: Span,
    },
    FunctionCall {
        function_name: String,
        args: Vec<(String, Expression)>,
        span: Span,
    },
    PropertyAccess {
        entity: Box<Expression>,
        property_name: String,
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
        name: String,
        expression: Expression,
        span: Span,
    },
    Return {
        expression: Expression,
        span: Span,
    },
}

/// A `name: type_name` pair, used for both structure fields and function
/// parameters — the grammar shares one production for both.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentDefinition {
    pub name: String,
    pub type_name: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructureDefinition {
    pub name: String,
    pub type_parameters: Vec<String>,
    pub fields: Vec<ArgumentDefinition>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDefinition {
    pub name: String,
    pub parameters: Vec<ArgumentDefinition>,
    pub return_type: String,
    pub body: Vec<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub structures: Vec<StructureDefinition>,
    pub functions: Vec<FunctionDefinition>,
}
