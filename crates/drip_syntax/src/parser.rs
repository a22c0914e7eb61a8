//! Recursive-descent parser: token stream → preliminary AST.
//!
//! A grammar violation propagates a hard [`DripError::Parse`] on the first
//! violation rather than returning a partial tree, so callers never have to
//! discover corruption downstream.
//!
//! ```
//! use drip_syntax::parser::parse;
//!
//! let program = parse("function main () -> Float ( return 0.; )").unwrap();
//! assert_eq!(program.functions.len(), 1);
//! ```

use crate::ast::{ArgumentDefinition, BinaryOp, Expression, FunctionDefinition, Program, Statement, StructureDefinition};
use crate::lexer::lex;
use crate::token::{Token, TokenKind};
use drip_base::{DripError, Result, Span};

/// Lexes and parses `source` into a preliminary [`Program`].
pub fn parse(source: &str) -> Result<Program> {
    let tokens = lex(source)?;
    Parser::new(tokens).parse_program()
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn error(&self, message: impl Into<String>) -> DripError {
        DripError::parse(message, self.peek().span)
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<Token> {
        if std::mem::discriminant(&self.peek().kind) == std::mem::discriminant(kind) {
            Ok(self.advance())
        } else {
            Err(self.error(format!(
                "expected {}, found {}",
                kind.describe(),
                self.peek().kind.describe()
            )))
        }
    }

    fn expect_snake_name(&mut self) -> Result<(String, Span)> {
        let tok = self.peek().clone();
        match tok.kind {
            TokenKind::SnakeName(name) => {
                self.advance();
                Ok((name, tok.span))
            }
            _ => Err(self.error(format!("expected identifier, found {}", tok.kind.describe()))),
        }
    }

    fn expect_camel_name(&mut self) -> Result<(String, Span)> {
        let tok = self.peek().clone();
        match tok.kind {
            TokenKind::CamelName(name) => {
                self.advance();
                Ok((name, tok.span))
            }
            _ => Err(self.error(format!("expected type name, found {}", tok.kind.describe()))),
        }
    }

    fn at(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.peek().kind) == std::mem::discriminant(kind)
    }

    // program := (structure_def | function_def)*
    fn parse_program(&mut self) -> Result<Program> {
        let mut program = Program::default();
        while !self.at(&TokenKind::Eof) {
            match &self.peek().kind {
                TokenKind::Structure => program.structures.push(self.parse_structure_def()?),
                TokenKind::Function => program.functions.push(self.parse_function_def()?),
                other => {
                    return Err(self.error(format!(
                        "expected 'structure' or 'function', found {}",
                        other.describe()
                    )))
                }
            }
        }
        Ok(program)
    }

    // structure_def := STRUCTURE CamelName TypeParams? '(' ArgDefs ','? ')'
    fn parse_structure_def(&mut self) -> Result<StructureDefinition> {
        let start = self.peek().span;
        self.expect(&TokenKind::Structure)?;
        let (name, _) = self.expect_camel_name()?;
        let type_parameters = self.parse_optional_type_params()?;
        self.expect(&TokenKind::LParen)?;
        let fields = self.parse_arg_defs()?;
        let end = self.expect(&TokenKind::RParen)?.span;
        Ok(StructureDefinition {
            name,
            type_parameters,
            fields,
            span: start.merge(end),
        })
    }

    fn parse_optional_type_params(&mut self) -> Result<Vec<String>> {
        if !self.at(&TokenKind::LBracket) {
            return Ok(Vec::new());
        }
        self.advance();
        let mut params = Vec::new();
        loop {
            if self.at(&TokenKind::RBracket) {
                break;
            }
            let (name, _) = self.expect_camel_name()?;
            params.push(name);
            if self.at(&TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        self.expect(&TokenKind::RBracket)?;
        Ok(params)
    }

    // ArgDefs := (arg_def (',' arg_def)* ','?)?  where arg_def := snake_name ':' type_name
    fn parse_arg_defs(&mut self) -> Result<Vec<ArgumentDefinition>> {
        let mut defs = Vec::new();
        while !self.at(&TokenKind::RParen) {
            let (name, start) = self.expect_snake_name()?;
            self.expect(&TokenKind::Colon)?;
            let (type_name, type_span) = self.parse_type_name()?;
            defs.push(ArgumentDefinition {
                name,
                type_name,
                span: start.merge(type_span),
            });
            if self.at(&TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        Ok(defs)
    }

    fn parse_type_name(&mut self) -> Result<(String, Span)> {
        self.expect_camel_name()
    }

    // function_def := FUNCTION snake_name '(' ArgDefs ','? ')' ARROW CamelName '(' (statement ';')* ')'
    fn parse_function_def(&mut self) -> Result<FunctionDefinition> {
        let start = self.peek().span;
        self.expect(&TokenKind::Function)?;
        let (name, _) = self.expect_snake_name()?;
        self.expect(&TokenKind::LParen)?;
        let parameters = self.parse_arg_defs()?;
        self.expect(&TokenKind::RParen)?;
        self.expect(&TokenKind::Arrow)?;
        let (return_type, _) = self.parse_type_name()?;
        self.expect(&TokenKind::LParen)?;
        let mut body = Vec::new();
        while !self.at(&TokenKind::RParen) {
            body.push(self.parse_statement()?);
            self.expect(&TokenKind::Semicolon)?;
        }
        let end = self.expect(&TokenKind::RParen)?.span;
        Ok(FunctionDefinition {
            name,
            parameters,
            return_type,
            body,
            span: start.merge(end),
        })
    }

    // statement := RETURN expression | snake_name '=' expression
    fn parse_statement(&mut self) -> Result<Statement> {
        let start = self.peek().span;
        if self.at(&TokenKind::Return) {
            self.advance();
            let expression = self.parse_expression()?;
            let span = start.merge(expression.span());
            return Ok(Statement::Return { expression, span });
        }
        let (name, _) = self.expect_snake_name()?;
        self.expect(&TokenKind::Equals)?;
        let expression = self.parse_expression()?;
        let span = start.merge(expression.span());
        Ok(Statement::Assignment {
            name,
            expression,
            span,
        })
    }

    // expression := term (('+' | '-') term)*
    fn parse_expression(&mut self) -> Result<Expression> {
        let mut lhs = self.parse_postfix()?;
        loop {
            let operator = match &self.peek().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Subtract,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_postfix()?;
            let span = lhs.span().merge(rhs.span());
            lhs = Expression::BinaryOperator {
                operator,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                span,
            };
        }
        Ok(lhs)
    }

    // term := primary ('.' snake_name)*
    fn parse_postfix(&mut self) -> Result<Expression> {
        let mut expr = self.parse_primary()?;
        while self.at(&TokenKind::Period) {
            self.advance();
            let (property_name, prop_span) = self.expect_snake_name()?;
            let span = expr.span().merge(prop_span);
            expr = Expression::PropertyAccess {
                entity: Box::new(expr),
                property_name,
                span,
            };
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expression> {
        let tok = self.peek().clone();
        match tok.kind {
            TokenKind::Number(value) => {
                self.advance();
                Ok(Expression::Literal { value, span: tok.span })
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(&TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::CamelName(type_name) => {
                self.advance();
                let type_args = self.parse_optional_type_args()?;
                self.expect(&TokenKind::LParen)?;
                let args = self.parse_named_args()?;
                let end = self.expect(&TokenKind::RParen)?.span;
                Ok(Expression::Construction {
                    type_name,
                    type_args,
                    args,
                    span: tok.span.merge(end),
                })
            }
            TokenKind::SnakeName(name) => {
                self.advance();
                if self.at(&TokenKind::LParen) {
                    self.advance();
                    let args = self.parse_named_args()?;
                    let end = self.expect(&TokenKind::RParen)?.span;
                    Ok(Expression::FunctionCall {
                        function_name: name,
                        args,
                        span: tok.span.merge(end),
                    })
                } else {
                    Ok(Expression::VariableReference { name, span: tok.span })
                }
            }
            other => Err(self.error(format!("expected an expression, found {}", other.describe()))),
        }
    }

    // TypeArgs := '[' (snake_name|CamelName) '=' CamelName (',' ...)* ']'
    fn parse_optional_type_args(&mut self) -> Result<Vec<(String, String)>> {
        if !self.at(&TokenKind::LBracket) {
            return Ok(Vec::new());
        }
        self.advance();
        let mut args = Vec::new();
        loop {
            if self.at(&TokenKind::RBracket) {
                break;
            }
            let (param_name, _) = self.expect_camel_name()?;
            self.expect(&TokenKind::Equals)?;
            let (type_name, _) = self.parse_type_name()?;
            args.push((param_name, type_name));
            if self.at(&TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        self.expect(&TokenKind::RBracket)?;
        Ok(args)
    }

    // Args := arg (',' arg)* ','? where arg := snake_name '=' expression
    fn parse_named_args(&mut self) -> Result<Vec<(String, Expression)>> {
        let mut args = Vec::new();
        while !self.at(&TokenKind::RParen) {
            let (name, _) = self.expect_snake_name()?;
            self.expect(&TokenKind::Equals)?;
            let expression = self.parse_expression()?;
            args.push((name, expression));
            if self.at(&TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        Ok(args)
    }
}
