#![cfg_attr(docsrs, feature(doc_cfg))]

//! # drip-base
//!
//! Structural atoms shared by every crate in the drip toolchain.
//!
//! - [`Arena`] — general-purpose bump allocation, not currently used by the AST
//! - [`Interner`]/[`Symbol`] — string interning for O(1) name comparison
//! - [`Span`] — source location tracking
//! - [`DripError`]/[`Result`] — errors tagged with a stage kind and location
//!
//! # Design Principles
//!
//! This crate has no knowledge of the language's grammar or semantics. It
//! provides only generic, reusable infrastructure that the lexer, parser,
//! finalizer, type checker, compiler, and interpreter crates build upon.

pub mod arena;
pub mod error;
pub mod intern;
pub mod span;

pub use arena::Arena;
pub use error::{DripError, Result};
pub use intern::{Interner, Symbol, SymbolEq};
pub use span::Span;
