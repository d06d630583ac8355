//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `linkscrape` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use linkscrape::initialization::{init_crypto_provider, init_logger_with};
use linkscrape::{run_scrape, Config, Opt};

#[tokio::main]
async fn main() -> Result<()> {
    // LINKSCRAPE_DB_PATH may come from a .env file in the current directory
    // or next to the executable.
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let config: Config = Opt::parse().into();

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format)
        .context("Failed to initialize logger")?;

    init_crypto_provider();

    match run_scrape(config).await {
        Ok(report) => {
            println!(
                "✅ Scraped {} record{} from {} target{} ({} failed) in {:.1}s{}",
                report.records,
                if report.records == 1 { "" } else { "s" },
                report.targets,
                if report.targets == 1 { "" } else { "s" },
                report.failed_targets,
                report.elapsed_seconds,
                if report.interrupted { " - interrupted" } else { "" }
            );
            println!(
                "Results saved in {} and {}",
                report.json_output.display(),
                report.csv_output.display()
            );
            if let Some(db_path) = &report.db_path {
                println!("Database: {}", db_path.display());
            }
            println!("Goodbye!");
            Ok(())
        }
        Err(e) => {
            eprintln!("linkscrape error: {:#}", e);
            process::exit(1);
        }
    }
}
