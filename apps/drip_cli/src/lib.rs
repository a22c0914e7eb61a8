//! # drip-cli
//!
//! Command-line interface for the drip language toolchain.
//!
//! | Command | Description |
//! |---------|-------------|
//! | `drip run <file>` | Parse, finalize, type-check, compile, and interpret a source file |
//! | `drip run --asm <file>` | Assemble and interpret an assembly file |
//! | `drip check <file>` | Parse, finalize, and type-check only |
//! | `drip fmt <file>` | Parse, finalize, and print the file back through the serializer |
//!
//! All command logic lives in [`cli`]; `main.rs` is a thin wrapper that
//! prints errors and sets the process exit code.

pub mod cli;

pub use cli::run_cli;
