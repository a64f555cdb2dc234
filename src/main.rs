use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod copy;
mod error;
mod library;
mod naming;
mod runtime;

fn main() -> ExitCode {
    // Logs go to stderr so stdout carries only progress.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_args();
    match runtime::run(&args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("pcp: {e}");
            ExitCode::FAILURE
        }
    }
}
