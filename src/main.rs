//! Souk CLI

use std::process::ExitCode;

use tracing::error;

use crate::cli::Cli;

mod cli;

fn main() -> ExitCode {
    let cli = match Cli::load() {
        Ok(cli) => cli,
        Err(error) => error.exit(),
    };

    if let Err(error) = cli.logging.init() {
        #[expect(
            clippy::print_stderr,
            reason = "logging failed to initialize, must use eprintln"
        )]
        {
            eprintln!("Logging error: {error}");
        }

        return ExitCode::FAILURE;
    }

    match cli.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "command failed");

            #[expect(
                clippy::print_stderr,
                reason = "errors must reach the user even when logs are filtered out"
            )]
            {
                eprintln!("{err}");
            }

            ExitCode::FAILURE
        }
    }
}
