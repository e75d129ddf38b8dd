//! Repoship: publish a local project directory to a hosted git repository.
//!
//! This is the main entry point for the `repoship` CLI. It parses arguments,
//! sets up logging, runs the publish workflow, and maps the outcome to an
//! exit code.

mod cli;
pub mod config;
pub mod error;
pub mod exit_codes;
pub mod git;
pub mod prompt;
pub mod report;
pub mod stages;
pub mod state;
pub mod workflow;

#[cfg(test)]
mod test_support;

use cli::Cli;
use error::{PublishError, Result};
use git::SystemRunner;
use prompt::{NoInput, Prompter, TerminalPrompter};
use report::RunReport;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(code) => ExitCode::from(code as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);
            for hint in err.remediation() {
                eprintln!("  - {}", hint);
            }
            if cli.json {
                print_aborted_report(&cli, &err);
            }

            ExitCode::from(err.exit_code() as u8)
        }
    }
}

/// Logs go to stderr. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<i32> {
    let config = cli.config();
    config.validate()?;

    let mut terminal;
    let mut no_input = NoInput;
    let prompter: &mut dyn Prompter = if config.interactive {
        terminal = TerminalPrompter::stdio();
        &mut terminal
    } else {
        &mut no_input
    };

    let current_dir = std::env::current_dir().map_err(|e| {
        PublishError::Environment(format!("cannot determine current directory: {}", e))
    })?;
    let working_directory =
        workflow::resolve_working_directory(cli.dir.as_deref(), &current_dir, prompter)?;

    let request = cli.request(&working_directory);
    let report = workflow::publish(&SystemRunner, &config, &request, prompter);

    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        report::print_report(&report);
    }

    Ok(report.exit_code)
}

/// Keep stdout machine-readable when the run fails before the workflow starts.
fn print_aborted_report(cli: &Cli, err: &PublishError) {
    let working_directory = cli
        .dir
        .clone()
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_default();
    let report = RunReport::aborted(&working_directory, &cli.config(), err);

    match report.to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error: {}", e),
    }
}
