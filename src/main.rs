//! Binary entrypoint for the `folio` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    // Site source, recording and replay are read from FOLIO_* variables.
    folio::logging::init();
    match folio::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
