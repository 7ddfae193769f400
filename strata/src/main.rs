// strata/src/main.rs

mod cli;
mod commands;

use clap::Parser;
use std::process::ExitCode;

use cli::{Cli, Commands};
use strata_core::StrataError;
use strata_core::domain::DomainError;
use strata_core::infrastructure::error::InfrastructureError;

/// Exit codes: 0 ok, 1 load/check failure, 2 configuration error.
const EXIT_FAILURE: u8 = 1;
const EXIT_CONFIG: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    // 1. Setup Logging (Tracing)
    // RUST_LOG=debug strata run ... pour voir les détails
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match dispatch(cli.command).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(EXIT_FAILURE),
        Err(e) => {
            if is_configuration_error(&e) {
                eprintln!("\n⚙️  CONFIGURATION ERROR: {:#}", e);
                ExitCode::from(EXIT_CONFIG)
            } else {
                eprintln!("\n💥 CRITICAL ERROR: {:#}", e);
                ExitCode::from(EXIT_FAILURE)
            }
        }
    }
}

async fn dispatch(command: Commands) -> anyhow::Result<bool> {
    match command {
        Commands::Seed { project_dir } => commands::seed::execute(&project_dir).await,
        Commands::Run {
            project_dir,
            window,
        } => commands::run::execute(&project_dir, &window).await,
        Commands::Test { project_dir } => commands::test::execute(&project_dir).await,
        Commands::Build {
            project_dir,
            window,
        } => commands::build::execute(&project_dir, &window).await,
        Commands::Status { project_dir } => commands::status::execute(&project_dir).await,
        Commands::Inspect {
            project_dir,
            table,
            limit,
        } => commands::inspect::execute(&project_dir, &table, limit),
        Commands::Query { query, project_dir } => {
            tracing::debug!(%query, "Ad-hoc query");
            commands::query::execute(&project_dir, &query).await
        }
        Commands::Clean { project_dir } => commands::clean::execute(&project_dir),
    }
}

fn is_configuration_error(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<StrataError>()
            .is_some_and(StrataError::is_configuration)
            || cause
                .downcast_ref::<InfrastructureError>()
                .is_some_and(InfrastructureError::is_configuration)
            || cause
                .downcast_ref::<DomainError>()
                .is_some_and(DomainError::is_configuration)
    })
}
