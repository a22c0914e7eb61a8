//! `drip` — standalone binary entry point.
//!
//! Thin wrapper around [`drip_cli::run_cli`]; all command logic lives in the
//! library crate so it stays testable without spawning a process.

fn main() {
    if let Err(e) = drip_cli::run_cli() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
