//! Shared pipeline helpers: source/assembly text in, runtime [`Value`] out.

use drip_bytecode::Value;

/// Runs surface-syntax `source` end to end: parse, finalize, type-check,
/// compile, interpret. Panics (via `.unwrap()`) on any stage failure —
/// callers that expect a particular stage to fail should drive the stages
/// themselves instead of going through this helper.
#[allow(dead_code)]
pub fn run_source(source: &str) -> Value {
    let prelim = drip_syntax::parse(source).unwrap();
    let (program, interner) = drip_types::finalize::finalize(&prelim).unwrap();
    drip_check::type_check_program(&program).unwrap();
    let bytecode = drip_compile::compile_program(&program, &interner).unwrap();
    let main = interner.lookup("main").unwrap();
    let mut sink = Vec::new();
    drip_vm::interpret_program(&bytecode, main, &mut sink).unwrap()
}

/// Runs assembly `source` end to end: assemble, interpret.
#[allow(dead_code)]
pub fn run_asm(source: &str) -> Value {
    let mut interner = drip_base::Interner::new();
    let program = drip_asm::parse_asm_program(source, &mut interner).unwrap();
    let main = interner.lookup("main").unwrap();
    let mut sink = Vec::new();
    drip_vm::interpret_program(&program, main, &mut sink).unwrap()
}
