use std::process::ExitCode;

use colored::Colorize;

fn main() -> ExitCode {
    match concept_cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(concept_cli::CliError::InvalidArgument(message)) => {
            eprintln!("{}", message);
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("{} {}", "✗".red(), e);
            ExitCode::FAILURE
        }
    }
}
