//! The closed bytecode op set (§4.G / §3 "Bytecode op set").
//!
//! `Op` covers every op legal inside a subroutine body, including
//! `CallSubroutine` (which the interpreter driver handles specially rather
//! than through a per-op `interpret` method, since it recurses). The
//! textual framing ops `START_SUBROUTINE`/`END_SUBROUTINE` are not part of
//! this enum — they exist only in the assembly front end, which consumes
//! them to build a [`crate::program::Subroutine`] container and never
//! stores them in `ops`.

use crate::value::Value;
use drip_base::Symbol;

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Noop,
    PushFromLiteral(Value),
    PushFromName(Symbol),
    PopToName(Symbol),
    StoreFromLiteral(Symbol, Value),
    BinaryAdd,
    BinarySubtract,
    ConstructStructure(Symbol),
    PopAndPushProperty(Symbol),
    SetFlag(Symbol),
    BranchToFlag(Symbol),
    Return,
    PrintName(Symbol),
    CallSubroutine(Symbol),
}

impl Op {
    /// The assembly mnemonic for this op, used by the textual serializer
    /// and by error messages.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Op::Noop => "NOOP",
            Op::PushFromLiteral(_) => "PUSH_FROM_LITERAL",
            Op::PushFromName(_) => "PUSH_FROM_NAME",
            Op::PopToName(_) => "POP_TO_NAME",
            Op::StoreFromLiteral(..) => "STORE_FROM_LITERAL",
            Op::BinaryAdd => "BINARY_ADD",
            Op::BinarySubtract => "BINARY_SUBTRACT",
            Op::ConstructStructure(_) => "CONSTRUCT_STRUCTURE",
            Op::PopAndPushProperty(_) => "POP_AND_PUSH_PROPERTY",
            Op::SetFlag(_) => "SET_FLAG",
            Op::BranchToFlag(_) => "BRANCH_TO_FLAG",
            Op::Return => "RETURN",
            Op::PrintName(_) => "PRINT_NAME",
            Op::CallSubroutine(_) => "CALL_SUBROUTINE",
        }
    }
}
