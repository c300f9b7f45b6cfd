#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(coverage_nightly, coverage(off))]

//! Binary entry point for the space heater.
//!
//! This module is excluded from mutation testing because testing process entry/exit behavior
//! is impractical - it requires spawning subprocesses and checking exit codes.

use std::process::ExitCode;

use argh::FromArgs;

/// Heat up the room by keeping every logical processor busy. Press Ctrl-C to stop.
#[derive(FromArgs)]
struct Args {}

// Binary entry point - mutations would require subprocess testing which is impractical.
#[cfg_attr(test, mutants::skip)]
fn main() -> ExitCode {
    // No options, but this still provides --help and rejects unknown arguments.
    let Args {} = argh::from_env();

    match space_heater::run() {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
