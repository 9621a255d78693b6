//! Tasklane CLI
//!
//! Command-line interface for running remote image jobs to completion.

mod commands;
mod config;

use std::process::ExitCode;

use clap::Parser;
use colored::*;
use commands::{Commands, handle_command};
use config::GlobalArgs;
use tasklane_runner::{ErrorKind, JobError};
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tasklane")]
#[command(about = "Submit remote image jobs and download their results", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "tasklane=info,tasklane_runner=info,tasklane_client=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match handle_command(cli.command, &cli.global).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            report_error(&err);
            ExitCode::from(exit_code(&err))
        }
    }
}

fn report_error(err: &anyhow::Error) {
    match err.downcast_ref::<JobError>() {
        Some(job_error) => {
            let label = match job_error.kind() {
                ErrorKind::JobFailure => "Job failed".red(),
                ErrorKind::Timeout => "Timed out".yellow(),
                ErrorKind::Input => "Invalid input".red(),
                ErrorKind::Transport => "Transport error".red(),
                ErrorKind::Protocol => "Protocol error".red(),
                ErrorKind::Storage => "Storage error".red(),
            };
            eprintln!("{} {}: {}", "✗".red(), label.bold(), job_error);
            if let Some(handle) = job_error.handle() {
                eprintln!("  Request ID: {}", handle.to_string().dimmed());
            }
        }
        None => eprintln!("{} {:#}", "✗".red(), err),
    }
}

/// Distinct exit codes per error category
fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<JobError>().map(JobError::kind) {
        Some(ErrorKind::Input) => 2,
        Some(ErrorKind::Transport) => 3,
        Some(ErrorKind::Protocol) => 4,
        Some(ErrorKind::JobFailure) => 5,
        Some(ErrorKind::Timeout) => 6,
        Some(ErrorKind::Storage) => 7,
        None => 1,
    }
}
