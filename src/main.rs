use std::process::ExitCode;

use taxlaw::cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Errors are already reported by the CLI layer
    match cli::Cli::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
