//! wl-migrate - move a YouTube "Watch Later" playlist into a dated playlist.
//!
//! Main entry point: parses the command line, loads configuration and runs
//! either the migration or the CSV export.

mod config;
mod error;
mod export;
mod ingest;
mod migrate;
mod prompt;
mod youtube;

use clap::{Parser, Subcommand};
use config::{Config, Settings};
use error::MigrateError;
use export::ExportTargets;
use migrate::{MigrationPlan, Outcome};
use prompt::StdinPrompter;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use youtube::InnerTubeAuthenticator;

/// Migrate YouTube "Watch Later" into a private playlist, then clear it.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Path to a JSONC config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Copy, Subcommand, Default)]
enum Command {
    /// Copy the exported CSV into a new playlist and optionally clear Watch Later
    #[default]
    Migrate,
    /// Write Watch Later to CSV_FILENAME (public) and CSV_FILENAME_PRIVATE (private)
    Export,
}

/// Main application entry point.
///
/// # Details
/// Every failure is reported as a readable block on stderr; the process
/// then exits normally.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wl_migrate=warn")),
        )
        .init();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or_default();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            return Ok(());
        }
    };

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ERROR: {:#}", e);
            return Ok(());
        }
    };
    tracing::debug!(?command, ?settings, "starting");

    let authenticator = InnerTubeAuthenticator::new(config.clone());
    let mut prompter = StdinPrompter;

    let result = match command {
        Command::Migrate => {
            println!("Starting the playlist migration process...");
            let plan = MigrationPlan {
                csv_path: settings.csv_path.as_path(),
                date: chrono::Utc::now().date_naive(),
                removal_delay: config.removal_delay(),
            };
            migrate::run(&plan, &mut prompter, &authenticator)
                .await
                .map(|outcome| outcome != Outcome::AbortedNoCookie)
        }
        Command::Export => {
            println!("Starting the Watch Later export...");
            let targets = ExportTargets {
                public_csv: settings.csv_path.as_path(),
                private_csv: settings.private_csv_path.as_path(),
            };
            export::run(&targets, &mut prompter, &authenticator)
                .await
                .map(|report| match report {
                    Some(report) => {
                        println!(
                            "\nExported {} public and {} private videos.",
                            report.public, report.private
                        );
                        true
                    }
                    None => false,
                })
        }
    };

    match result {
        Ok(true) => println!("\n✅ --- SCRIPT COMPLETE --- ✅"),
        Ok(false) => {}
        Err(e) => report_failure(&e),
    }

    Ok(())
}

fn report_failure(error: &MigrateError) {
    match error {
        MigrateError::FileAccess { path, .. } if error.is_file_not_found() => {
            eprintln!("\n❌ --- FILE NOT FOUND --- ❌");
            eprintln!("Error: The file '{}' was not found.", path.display());
            eprintln!("Please ensure you have run `wl-migrate export` first.");
        }
        _ => {
            eprintln!("\n❌ --- AN ERROR OCCURRED --- ❌");
            eprintln!("Error details: {}", error);
        }
    }
}
