//! Command-line interface for the `drip` toolchain.
//!
//! Built on [`clap`] for argument parsing: a thin [`Cli`]/[`Commands`] pair
//! that parses arguments and dispatches to a handler function per
//! subcommand.

use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

use drip_base::DripError;

#[derive(Parser)]
#[command(name = "drip")]
#[command(about = "The drip language toolchain", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Raise diagnostic verbosity: print each pipeline stage as it starts.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a `.drip` source file (or, with `--asm`, an assembly file) to
    /// completion and print the resulting value.
    Run {
        /// Path to the source (or assembly, with `--asm`) file.
        file: PathBuf,

        /// Treat `file` as assembly text instead of surface syntax.
        #[arg(long)]
        asm: bool,
    },

    /// Parse, finalize, and type-check a source file without running it.
    Check {
        /// Path to the source file.
        file: PathBuf,
    },

    /// Parse and finalize a source file, then print it back out through the
    /// serializer.
    Fmt {
        /// Path to the source file.
        file: PathBuf,
    },
}

/// Parses command-line arguments and executes the corresponding command.
pub fn run_cli() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { file, asm } if asm => cmd_run_asm(&file, cli.verbose),
        Commands::Run { file, .. } => cmd_run(&file, cli.verbose),
        Commands::Check { file } => cmd_check(&file, cli.verbose),
        Commands::Fmt { file } => cmd_fmt(&file, cli.verbose),
    }
}

fn trace(verbose: bool, stage: &str) {
    if verbose {
        eprintln!("drip: {stage}");
    }
}

fn read_source(file: &PathBuf) -> Result<String, Box<dyn std::error::Error>> {
    Ok(fs::read_to_string(file)?)
}

fn cmd_run(file: &PathBuf, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let source = read_source(file)?;

    trace(verbose, "lexing and parsing");
    let prelim = drip_syntax::parse(&source)?;

    trace(verbose, "finalizing");
    let (program, interner) = drip_types::finalize::finalize(&prelim)?;

    trace(verbose, "type-checking");
    drip_check::type_check_program(&program)?;

    trace(verbose, "compiling");
    let bytecode = drip_compile::compile_program(&program, &interner)?;

    trace(verbose, "interpreting");
    let main = interner
        .lookup("main")
        .ok_or_else(|| DripError::runtime("program has no 'main' function"))?;
    let mut stdout = std::io::stdout();
    let result = drip_vm::interpret_program(&bytecode, main, &mut stdout)?;

    println!("{}", result.to_display_string());
    Ok(())
}

fn cmd_run_asm(file: &PathBuf, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let source = read_source(file)?;

    trace(verbose, "assembling");
    let mut interner = drip_base::Interner::new();
    let bytecode = drip_asm::parse_asm_program(&source, &mut interner)?;

    trace(verbose, "interpreting");
    let main = interner
        .lookup("main")
        .ok_or_else(|| DripError::runtime("program has no 'main' subroutine"))?;
    let mut stdout = std::io::stdout();
    let result = drip_vm::interpret_program(&bytecode, main, &mut stdout)?;

    println!("{}", result.to_display_string());
    Ok(())
}

fn cmd_check(file: &PathBuf, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let source = read_source(file)?;

    trace(verbose, "lexing and parsing");
    let prelim = drip_syntax::parse(&source)?;

    trace(verbose, "finalizing");
    let (program, _interner) = drip_types::finalize::finalize(&prelim)?;

    trace(verbose, "type-checking");
    drip_check::type_check_program(&program)?;

    Ok(())
}

fn cmd_fmt(file: &PathBuf, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let source = read_source(file)?;

    trace(verbose, "lexing and parsing");
    let prelim = drip_syntax::parse(&source)?;

    trace(verbose, "finalizing");
    let (program, interner) = drip_types::finalize::finalize(&prelim)?;

    let text = drip_fmt::serialize_program(&program, &interner);
    print!("{text}");
    Ok(())
}
