//! # drip-asm
//!
//! The textual bytecode assembly front end (§4.I): a line-oriented syntax
//! where each `START_SUBROUTINE name arg…` … `END_SUBROUTINE name` block
//! becomes one [`drip_bytecode::Subroutine`]. Subroutine nesting is illegal,
//! and a `main` subroutine is required.
//!
//! ```
//! use drip_base::Interner;
//! use drip_asm::parse_asm_program;
//!
//! let mut interner = Interner::new();
//! let program = parse_asm_program(
//!     "START_SUBROUTINE main\n\
//!      PUSH_FROM_LITERAL int 2\n\
//!      PUSH_FROM_LITERAL int 3\n\
//!      BINARY_ADD\n\
//!      RETURN\n\
//!      END_SUBROUTINE main\n",
//!     &mut interner,
//! ).unwrap();
//! assert_eq!(program.subroutines.len(), 1);
//! ```

use drip_base::{DripError, Interner, Result, Symbol};
use drip_bytecode::{Op, PrimitiveTag, Program, Subroutine, Value};
use std::collections::HashMap;

/// One non-blank line split on ASCII spaces into its op code and operands.
struct ByteCodeLine<'a> {
    op_code: &'a str,
    arguments: Vec<&'a str>,
}

impl<'a> ByteCodeLine<'a> {
    fn lex(line: &'a str) -> Self {
        let mut parts = line.split(' ');
        let op_code = parts.next().unwrap_or("");
        ByteCodeLine {
            op_code,
            arguments: parts.collect(),
        }
    }

    fn require_arity(&self, n: usize) -> Result<()> {
        if self.arguments.len() == n {
            Ok(())
        } else {
            Err(DripError::parse_unspanned(format!(
                "{} expects {} operand(s), got {}",
                self.op_code,
                n,
                self.arguments.len()
            )))
        }
    }
}

/// A lexed assembly line: either subroutine framing or a subroutine-body op.
enum AsmLine {
    StartSubroutine { name: String, arguments: Vec<String> },
    EndSubroutine { name: String },
    Op(Op),
}

fn parse_literal(tag_name: &str, value_literal: &str) -> Result<Value> {
    let value: f64 = value_literal
        .parse()
        .map_err(|_| DripError::parse_unspanned(format!("invalid literal value '{value_literal}'")))?;
    match tag_name {
        "int" => Ok(Value::Tagged { tag: PrimitiveTag::Int, value }),
        "float" => Ok(Value::Tagged { tag: PrimitiveTag::Float, value }),
        other => Err(DripError::parse_unspanned(format!("unknown literal tag '{other}'"))),
    }
}

fn parse_line(line: &ByteCodeLine, interner: &mut Interner) -> Result<AsmLine> {
    match line.op_code {
        "START_SUBROUTINE" => {
            if line.arguments.is_empty() {
                return Err(DripError::parse_unspanned("START_SUBROUTINE requires a name"));
            }
            Ok(AsmLine::StartSubroutine {
                name: line.arguments[0].to_string(),
                arguments: line.arguments[1..].iter().map(|s| s.to_string()).collect(),
            })
        }
        "END_SUBROUTINE" => {
            line.require_arity(1)?;
            Ok(AsmLine::EndSubroutine { name: line.arguments[0].to_string() })
        }
        "CALL_SUBROUTINE" => {
            line.require_arity(1)?;
            Ok(AsmLine::Op(Op::CallSubroutine(interner.intern(line.arguments[0]))))
        }
        "NOOP" => {
            line.require_arity(0)?;
            Ok(AsmLine::Op(Op::Noop))
        }
        "PUSH_FROM_LITERAL" => {
            line.require_arity(2)?;
            Ok(AsmLine::Op(Op::PushFromLiteral(parse_literal(line.arguments[0], line.arguments[1])?)))
        }
        "PUSH_FROM_NAME" => {
            line.require_arity(1)?;
            Ok(AsmLine::Op(Op::PushFromName(interner.intern(line.arguments[0]))))
        }
        "POP_TO_NAME" => {
            line.require_arity(1)?;
            Ok(AsmLine::Op(Op::PopToName(interner.intern(line.arguments[0]))))
        }
        "STORE_FROM_LITERAL" => {
            line.require_arity(3)?;
            let name = interner.intern(line.arguments[0]);
            let value = parse_literal(line.arguments[1], line.arguments[2])?;
            Ok(AsmLine::Op(Op::StoreFromLiteral(name, value)))
        }
        "BINARY_ADD" => {
            line.require_arity(0)?;
            Ok(AsmLine::Op(Op::BinaryAdd))
        }
        "BINARY_SUBTRACT" => {
            line.require_arity(0)?;
            Ok(AsmLine::Op(Op::BinarySubtract))
        }
        "CONSTRUCT_STRUCTURE" => {
            line.require_arity(1)?;
            Ok(AsmLine::Op(Op::ConstructStructure(interner.intern(line.arguments[0]))))
        }
        "POP_AND_PUSH_PROPERTY" => {
            line.require_arity(1)?;
            Ok(AsmLine::Op(Op::PopAndPushProperty(interner.intern(line.arguments[0]))))
        }
        "SET_FLAG" => {
            line.require_arity(1)?;
            Ok(AsmLine::Op(Op::SetFlag(interner.intern(line.arguments[0]))))
        }
        "BRANCH_TO_FLAG" => {
            line.require_arity(1)?;
            Ok(AsmLine::Op(Op::BranchToFlag(interner.intern(line.arguments[0]))))
        }
        "RETURN" => {
            line.require_arity(0)?;
            Ok(AsmLine::Op(Op::Return))
        }
        "PRINT_NAME" => {
            line.require_arity(1)?;
            Ok(AsmLine::Op(Op::PrintName(interner.intern(line.arguments[0]))))
        }
        other => Err(DripError::parse_unspanned(format!("unknown op code '{other}'"))),
    }
}

/// Lexes and parses every non-blank line of `source` in order.
fn lex_program(source: &str, interner: &mut Interner) -> Result<Vec<AsmLine>> {
    source
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| parse_line(&ByteCodeLine::lex(line), interner))
        .collect()
}

/// Parses a full assembly program into a runtime [`Program`].
///
/// `main` must be present; anything else — a line outside any subroutine, a
/// nested `START_SUBROUTINE`, or an `END_SUBROUTINE` whose name doesn't
/// match the currently open subroutine — is a parse error.
pub fn parse_asm_program(source: &str, interner: &mut Interner) -> Result<Program> {
    struct Open {
        name: Symbol,
        arguments: Vec<Symbol>,
        ops: Vec<Op>,
    }

    let mut subroutines = HashMap::new();
    let mut current: Option<Open> = None;

    for line in lex_program(source, interner)? {
        match line {
            AsmLine::StartSubroutine { name, arguments } => {
                if current.is_some() {
                    return Err(DripError::parse_unspanned("started a subroutine inside a subroutine"));
                }
                current = Some(Open {
                    name: interner.intern(&name),
                    arguments: arguments.iter().map(|a| interner.intern(a)).collect(),
                    ops: Vec::new(),
                });
            }
            AsmLine::EndSubroutine { name } => {
                let open = current
                    .take()
                    .ok_or_else(|| DripError::parse_unspanned("ended a subroutine not inside a subroutine"))?;
                let closed_name = interner.intern(&name);
                if closed_name != open.name {
                    return Err(DripError::parse_unspanned("END_SUBROUTINE name does not match the open subroutine"));
                }
                subroutines.insert(open.name, Subroutine { ops: open.ops, arguments: open.arguments });
            }
            AsmLine::Op(op) => match &mut current {
                Some(open) => open.ops.push(op),
                None => return Err(DripError::parse_unspanned("op outside of any subroutine")),
            },
        }
    }

    if current.is_some() {
        return Err(DripError::parse_unspanned("file ended with a subroutine still open"));
    }

    let main = interner
        .lookup("main")
        .ok_or_else(|| DripError::parse_unspanned("no main subroutine"))?;
    let program = Program::new(subroutines, HashMap::new());
    program.validate(main)?;
    Ok(program)
}

/// Parses a standalone sequence of subroutine-body ops with no framing, for
/// use as a single synthetic `main` with no arguments.
pub fn parse_asm_snippet(source: &str, interner: &mut Interner) -> Result<Vec<Op>> {
    lex_program(source, interner)?
        .into_iter()
        .map(|line| match line {
            AsmLine::Op(op) => Ok(op),
            AsmLine::StartSubroutine { .. } | AsmLine::EndSubroutine { .. } => Err(
                DripError::parse_unspanned("subroutine framing is not legal inside a snippet"),
            ),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use drip_vm::interpret_program;

    fn run_snippet(source: &str) -> Value {
        let mut interner = Interner::new();
        let ops = parse_asm_snippet(source, &mut interner).unwrap();
        let main = interner.intern("main");
        let mut subroutines = HashMap::new();
        subroutines.insert(main, Subroutine { ops, arguments: Vec::new() });
        let program = Program::new(subroutines, HashMap::new());
        let mut sink = Vec::new();
        interpret_program(&program, main, &mut sink).unwrap()
    }

    #[test]
    fn noop_snippet_runs_to_completion() {
        run_snippet("NOOP");
    }

    #[test]
    fn two_plus_three_via_literals() {
        let result = run_snippet(
            "PUSH_FROM_LITERAL int 2\n\
             PUSH_FROM_LITERAL int 3\n\
             BINARY_ADD\n\
             RETURN",
        );
        assert_eq!(result, Value::int(5.0));
    }

    #[test]
    fn two_plus_three_via_named_storage() {
        let result = run_snippet(
            "STORE_FROM_LITERAL x int 2\n\
             STORE_FROM_LITERAL y int 3\n\
             PUSH_FROM_NAME x\n\
             PUSH_FROM_NAME y\n\
             BINARY_ADD\n\
             RETURN",
        );
        assert_eq!(result, Value::int(5.0));
    }

    #[test]
    fn three_times_four_via_branch_loop() {
        let result = run_snippet(
            "STORE_FROM_LITERAL x int 0\n\
             STORE_FROM_LITERAL c int 3\n\
             SET_FLAG start\n\
             PUSH_FROM_NAME x\n\
             PUSH_FROM_LITERAL int 4\n\
             BINARY_ADD\n\
             POP_TO_NAME x\n\
             PUSH_FROM_LITERAL int 1\n\
             PUSH_FROM_NAME c\n\
             BINARY_SUBTRACT\n\
             POP_TO_NAME c\n\
             PUSH_FROM_NAME c\n\
             BRANCH_TO_FLAG start\n\
             PUSH_FROM_NAME x\n\
             RETURN",
        );
        assert_eq!(result, Value::int(12.0));
    }

    #[test]
    fn program_with_single_main_subroutine() {
        let mut interner = Interner::new();
        let program = parse_asm_program(
            "START_SUBROUTINE main\n\
             STORE_FROM_LITERAL x int 2\n\
             PUSH_FROM_NAME x\n\
             RETURN\n\
             END_SUBROUTINE main\n",
            &mut interner,
        )
        .unwrap();
        let main = interner.lookup("main").unwrap();
        let mut sink = Vec::new();
        let result = interpret_program(&program, main, &mut sink).unwrap();
        assert_eq!(result, Value::int(2.0));
    }

    #[test]
    fn program_with_helper_subroutine_call() {
        let mut interner = Interner::new();
        let program = parse_asm_program(
            "START_SUBROUTINE f\n\
             PUSH_FROM_LITERAL int 4\n\
             RETURN\n\
             END_SUBROUTINE f\n\
             \n\
             START_SUBROUTINE main\n\
             CALL_SUBROUTINE f\n\
             RETURN\n\
             END_SUBROUTINE main\n",
            &mut interner,
        )
        .unwrap();
        let main = interner.lookup("main").unwrap();
        let mut sink = Vec::new();
        let result = interpret_program(&program, main, &mut sink).unwrap();
        assert_eq!(result, Value::int(4.0));
    }

    #[test]
    fn program_with_argument_taking_subroutine_called_twice() {
        let mut interner = Interner::new();
        let program = parse_asm_program(
            "START_SUBROUTINE inc x\n\
             PUSH_FROM_NAME x\n\
             PUSH_FROM_LITERAL int 1\n\
             BINARY_ADD\n\
             RETURN\n\
             END_SUBROUTINE inc\n\
             \n\
             START_SUBROUTINE main\n\
             PUSH_FROM_LITERAL int 5\n\
             CALL_SUBROUTINE inc\n\
             CALL_SUBROUTINE inc\n\
             RETURN\n\
             END_SUBROUTINE main\n",
            &mut interner,
        )
        .unwrap();
        let main = interner.lookup("main").unwrap();
        let mut sink = Vec::new();
        let result = interpret_program(&program, main, &mut sink).unwrap();
        assert_eq!(result, Value::int(7.0));
    }

    #[test]
    fn nested_start_subroutine_is_an_error() {
        let mut interner = Interner::new();
        let err = parse_asm_program(
            "START_SUBROUTINE outer\n\
             START_SUBROUTINE inner\n\
             RETURN\n\
             END_SUBROUTINE inner\n\
             END_SUBROUTINE outer\n",
            &mut interner,
        )
        .unwrap_err();
        assert!(matches!(err, DripError::Parse(..)));
    }

    #[test]
    fn missing_main_is_a_clean_error_not_a_panic() {
        let mut interner = Interner::new();
        let err = parse_asm_program(
            "START_SUBROUTINE helper\n\
             RETURN\n\
             END_SUBROUTINE helper\n",
            &mut interner,
        )
        .unwrap_err();
        assert!(matches!(err, DripError::Parse(..)));
    }

    #[test]
    fn end_subroutine_name_mismatch_is_an_error() {
        let mut interner = Interner::new();
        let err = parse_asm_program(
            "START_SUBROUTINE main\n\
             RETURN\n\
             END_SUBROUTINE other\n",
            &mut interner,
        )
        .unwrap_err();
        assert!(matches!(err, DripError::Parse(..)));
    }
}
