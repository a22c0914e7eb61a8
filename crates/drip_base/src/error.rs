//! Error types with source location tracking.
//!
//! Every fallible stage of the toolchain (lex, parse, finalize, type-check,
//! compile, interpret, assemble) returns a [`DripError`]. Errors carry an
//! optional [`Span`] — the lexer, parser, and finalizer can always attach
//! one; the interpreter sometimes cannot (a runtime fault discovered deep in
//! a recursive call has no single source location).
//!
//! # Example
//!
//! ```
//! use drip_base::{DripError, Span, Result};
//!
//! fn check_tag(name: &str, span: Span) -> Result<()> {
//!     if name == "Int" || name == "Float" {
//!         Ok(())
//!     } else {
//!         Err(DripError::name_resolution(format!("unknown primitive '{name}'"), span))
//!     }
//! }
//!
//! let err = check_tag("Bool", Span::new(0, 4)).unwrap_err();
//! assert!(err.to_string().contains("unknown primitive"));
//! ```

use crate::span::Span;
use std::fmt;

/// The kind of failure that occurred, matching the toolchain stage it was
/// raised from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DripError {
    /// An unknown character was encountered while lexing.
    Lex(String, Option<Span>),
    /// A grammar violation while parsing tokens into a preliminary tree.
    Parse(String, Option<Span>),
    /// An unknown structure, function, field, variable, or primitive name.
    NameResolution(String, Option<Span>),
    /// A type-checking rule was violated.
    TypeCheck(String, Option<Span>),
    /// The AST→bytecode compiler encountered something it cannot lower.
    Compiler(String, Option<Span>),
    /// A precondition of a bytecode op or the interpreter driver was violated.
    Runtime(String, Option<Span>),
}

impl DripError {
    /// Constructs a [`DripError::Lex`].
    pub fn lex(message: impl Into<String>, span: Span) -> Self {
        DripError::Lex(message.into(), Some(span))
    }

    /// Constructs a [`DripError::Parse`].
    pub fn parse(message: impl Into<String>, span: Span) -> Self {
        DripError::Parse(message.into(), Some(span))
    }

    /// Constructs a [`DripError::Parse`] with no associated location.
    pub fn parse_unspanned(message: impl Into<String>) -> Self {
        DripError::Parse(message.into(), None)
    }

    /// Constructs a [`DripError::NameResolution`].
    pub fn name_resolution(message: impl Into<String>, span: Span) -> Self {
        DripError::NameResolution(message.into(), Some(span))
    }

    /// Constructs a [`DripError::TypeCheck`].
    pub fn type_check(message: impl Into<String>, span: Span) -> Self {
        DripError::TypeCheck(message.into(), Some(span))
    }

    /// Constructs a [`DripError::Compiler`].
    pub fn compiler(message: impl Into<String>) -> Self {
        DripError::Compiler(message.into(), None)
    }

    /// Constructs a [`DripError::Runtime`] with no associated location.
    ///
    /// Most runtime faults (stack underflow, tag mismatch, missing `main`)
    /// have no single source span by the time they surface.
    pub fn runtime(message: impl Into<String>) -> Self {
        DripError::Runtime(message.into(), None)
    }

    /// Returns the span attached to this error, if any.
    pub fn span(&self) -> Option<Span> {
        match self {
            DripError::Lex(_, s)
            | DripError::Parse(_, s)
            | DripError::NameResolution(_, s)
            | DripError::TypeCheck(_, s)
            | DripError::Compiler(_, s)
            | DripError::Runtime(_, s) => *s,
        }
    }

    fn kind_name(&self) -> &'static str {
        match self {
            DripError::Lex(..) => "lex error",
            DripError::Parse(..) => "parse error",
            DripError::NameResolution(..) => "name resolution error",
            DripError::TypeCheck(..) => "type error",
            DripError::Compiler(..) => "compiler error",
            DripError::Runtime(..) => "runtime error",
        }
    }

    fn message(&self) -> &str {
        match self {
            DripError::Lex(m, _)
            | DripError::Parse(m, _)
            | DripError::NameResolution(m, _)
            | DripError::TypeCheck(m, _)
            | DripError::Compiler(m, _)
            | DripError::Runtime(m, _) => m,
        }
    }
}

impl fmt::Display for DripError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.span() {
            Some(span) => write!(
                f,
                "{}: {} at {}..{}",
                self.kind_name(),
                self.message(),
                span.start,
                span.end
            ),
            None => write!(f, "{}: {}", self.kind_name(), self.message()),
        }
    }
}

impl std::error::Error for DripError {}

/// Alias for `std::result::Result<T, DripError>`.
pub type Result<T> = std::result::Result<T, DripError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_error_display_includes_span() {
        let err = DripError::lex("illegal character '@'", Span::new(3, 4));
        let display = err.to_string();
        assert!(display.contains("lex error"));
        assert!(display.contains("illegal character"));
        assert!(display.contains("3..4"));
    }

    #[test]
    fn runtime_error_display_without_span() {
        let err = DripError::runtime("stack underflow");
        let display = err.to_string();
        assert!(display.contains("runtime error"));
        assert!(display.contains("stack underflow"));
        assert!(!display.contains(".."));
    }

    #[test]
    fn span_accessor_returns_attached_span() {
        let span = Span::new(1, 2);
        let err = DripError::type_check("mismatch", span);
        assert_eq!(err.span(), Some(span));
    }
}
