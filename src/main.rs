//! manga-shelf: terminal client for a manga/manhwa reading service.
//!
//! Browse your continue-reading shelf and session-grouped reading history
//! from the terminal, against a local snapshot of the reading service's
//! history payloads.

use std::process::ExitCode;

use manga_shelf::cli;

fn main() -> ExitCode {
    // Run the CLI (logging is initialized by cli::run based on --log-level and --log-format)
    match cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Print error message
            eprintln!("Error: {e}");

            // Print cause chain in debug mode
            if std::env::var("RUST_BACKTRACE").is_ok() {
                if let Some(source) = std::error::Error::source(&e) {
                    eprintln!("Caused by: {source}");
                }
            }

            // Return appropriate exit code
            ExitCode::from(e.exit_code() as u8)
        }
    }
}
