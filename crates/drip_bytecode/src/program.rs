//! Bytecode containers: [`RuntimeStructure`], [`Subroutine`], [`Program`],
//! and the per-call [`FrameState`].

use crate::ops::Op;
use crate::value::Value;
use drip_base::{DripError, Result, Symbol};
use std::collections::HashMap;
use std::rc::Rc;

/// The bytecode-level view of a structure: just enough to bind
/// `CONSTRUCT_STRUCTURE`'s popped arguments to field names in declaration
/// order. The interpreter has no need for the richer type information the
/// type checker works with.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeStructure {
    pub name: Symbol,
    pub fields: Vec<Symbol>,
}

/// A compiled function body: its ops, in order, plus its ordered
/// argument-name list (used to bind a `CALL_SUBROUTINE`'s popped arguments).
#[derive(Debug, Clone, PartialEq)]
pub struct Subroutine {
    pub ops: Vec<Op>,
    pub arguments: Vec<Symbol>,
}

/// A runtime bytecode program: subroutines and structures by name.
///
/// `main` is required; this is checked by [`Program::validate`], which both
/// the compiler and the assembly front end call before handing a `Program`
/// to the interpreter.
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub subroutines: HashMap<Symbol, Subroutine>,
    pub structures: Rc<HashMap<Symbol, Rc<RuntimeStructure>>>,
}

impl Program {
    pub fn new(subroutines: HashMap<Symbol, Subroutine>, structures: HashMap<Symbol, Rc<RuntimeStructure>>) -> Self {
        Self {
            subroutines,
            structures: Rc::new(structures),
        }
    }

    /// Checks the one program-level invariant that isn't enforced op by op:
    /// a `main` subroutine must exist.
    pub fn validate(&self, main: Symbol) -> Result<()> {
        if self.subroutines.contains_key(&main) {
            Ok(())
        } else {
            Err(DripError::runtime("no main subroutine"))
        }
    }
}

/// The immutable per-call record: stack, locals, labels, program counter,
/// and return slot. A fresh `FrameState` is created for every recursive
/// `CALL_SUBROUTINE`; nothing is shared across calls except the program's
/// structure table.
#[derive(Debug, Clone, Default)]
pub struct FrameState {
    pub stack: Vec<Value>,
    pub names: HashMap<Symbol, Value>,
    pub return_value: Option<Value>,
    pub return_set: bool,
    pub flags: HashMap<Symbol, usize>,
    pub program_counter: usize,
    pub structures: Rc<HashMap<Symbol, Rc<RuntimeStructure>>>,
}

impl FrameState {
    pub fn new(names: HashMap<Symbol, Value>, structures: Rc<HashMap<Symbol, Rc<RuntimeStructure>>>) -> Self {
        Self {
            stack: Vec::new(),
            names,
            return_value: None,
            return_set: false,
            flags: HashMap::new(),
            program_counter: 0,
            structures,
        }
    }

    /// Pops the top `n` values off the stack, preserving order: the value
    /// that was pushed first ends up at index 0 of the returned `Vec`, the
    /// value pushed last (the top of the stack) ends up at the end.
    pub fn pop_n(&mut self, n: usize) -> Result<Vec<Value>> {
        if self.stack.len() < n {
            return Err(DripError::runtime("stack underflow"));
        }
        Ok(self.stack.split_off(self.stack.len() - n))
    }

    pub fn pop(&mut self) -> Result<Value> {
        self.pop_n(1).map(|mut v| v.pop().expect("pop_n(1) returns exactly one value"))
    }

    pub fn push(&mut self, value: Value) {
        self.stack.push(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pop_n_preserves_push_order() {
        let mut frame = FrameState::new(HashMap::new(), Rc::new(HashMap::new()));
        frame.push(Value::int(1.0));
        frame.push(Value::int(2.0));
        frame.push(Value::int(3.0));
        let popped = frame.pop_n(2).unwrap();
        assert_eq!(popped, vec![Value::int(2.0), Value::int(3.0)]);
        assert_eq!(frame.stack, vec![Value::int(1.0)]);
    }

    #[test]
    fn pop_n_underflow_is_an_error() {
        let mut frame = FrameState::new(HashMap::new(), Rc::new(HashMap::new()));
        assert!(frame.pop_n(1).is_err());
    }

    #[test]
    fn program_requires_main() {
        let program = Program::new(HashMap::new(), HashMap::new());
        let mut interner = drip_base::Interner::new();
        let main = interner.intern("main");
        assert!(program.validate(main).is_err());
    }
}
