//! Calliope console binary.
//! Run with: cargo run --bin calliope

use std::process::ExitCode;

use calliope_console::start_console;

fn main() -> ExitCode {
    start_console::run()
}
