//! Glue shared by the binaries in `src/bin/`.

use std::process::ExitCode;

/// Report a fatal error on stdout the way the tools always have and turn it
/// into exit status 1.
pub fn finish(result: anyhow::Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("Error: {e:#}");
            ExitCode::from(1)
        }
    }
}
