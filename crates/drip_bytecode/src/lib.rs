//! # drip-bytecode
//!
//! The bytecode layer shared by the compiler, interpreter, and assembly
//! front end: runtime [`Value`]s, the closed [`Op`] set, and the
//! [`Program`]/[`Subroutine`]/[`FrameState`] containers that tie them
//! together.

pub mod ops;
pub mod program;
pub mod value;

pub use ops::Op;
pub use program::{FrameState, Program, RuntimeStructure, Subroutine};
pub use value::{PrimitiveTag, Value};
