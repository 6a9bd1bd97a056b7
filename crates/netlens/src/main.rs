//! netlens entry point.

use clap::Parser;
use netlens::cli::Cli;
use std::process::ExitCode;
use tracing::error;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = netlens::init_logging(cli.log_level.as_deref()) {
        eprintln!("Error: {:#}", e);
        return ExitCode::FAILURE;
    }

    match netlens::run(&cli) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %format!("{:#}", e), "netlens failed");
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
