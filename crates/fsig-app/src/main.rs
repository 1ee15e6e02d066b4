//! future-signals - Entry Point
//!
//! Verifies the license key once per installation, then produces the
//! daily signal report from the live feed.

use anyhow::Result;
use clap::{Parser, Subcommand};
use fsig_app::{AppConfig, AppError, Application};
use fsig_license::{LicenseError, VerifyOutcome};
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn};

/// Trading signal report generator
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via FSIG_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show whether this installation is verified
    Status,
    /// Verify a license key (prompts when --key is omitted)
    Verify {
        #[arg(short, long)]
        key: Option<String>,
    },
    /// Generate a signal report
    Generate {
        /// Also write the report to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print Prometheus metrics in the text exposition format
    Metrics,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    fsig_telemetry::init_logging().map_err(AppError::from)?;

    info!("Starting future-signals v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load(args.config)?;
    info!(
        feed_url = %config.feed.url,
        min_confidence = config.signals.min_confidence,
        data_dir = %config.persistence.data_dir.display(),
        "Configuration loaded"
    );

    let app = Application::new(config)?;

    match args.command {
        Some(Command::Status) => {
            if app.is_verified() {
                println!("Verified");
            } else {
                println!("Not verified");
            }
        }
        Some(Command::Verify { key }) => {
            let key = match key {
                Some(key) => key,
                None => match prompt_key().await? {
                    Some(key) => key,
                    None => return Ok(()),
                },
            };
            submit_key(&app, &key).await?;
        }
        Some(Command::Generate { output }) => {
            generate(&app, output).await?;
        }
        Some(Command::Metrics) => {
            let text = fsig_telemetry::render_metrics().map_err(AppError::from)?;
            print!("{text}");
        }
        None => {
            while !app.is_verified() {
                let Some(key) = prompt_key().await? else {
                    warn!("No key entered, exiting");
                    return Ok(());
                };
                submit_key(&app, &key).await?;
            }
            generate(&app, None).await?;
        }
    }

    Ok(())
}

/// Submit a key and print the user-facing outcome.
async fn submit_key(app: &Application, key: &str) -> Result<()> {
    match app.verify(key).await {
        Ok(outcome @ VerifyOutcome::Verified { .. }) => println!("✅ {outcome}"),
        Ok(outcome) => println!("❌ {outcome}"),
        Err(AppError::License(LicenseError::EmptyKey)) => {
            println!("❌ {}", LicenseError::EmptyKey)
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

/// Generate a report, print it and optionally write it to a file.
async fn generate(app: &Application, output: Option<PathBuf>) -> Result<()> {
    let report = app.generate().await?;
    println!("{report}");

    if let Some(path) = output {
        std::fs::write(&path, report.text()).map_err(AppError::from)?;
        info!(path = %path.display(), "Report written");
    }
    Ok(())
}

/// Read one key from stdin. `None` on end of input.
async fn prompt_key() -> Result<Option<String>> {
    print!("Enter your license key: ");
    std::io::stdout().flush()?;

    let line = tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        std::io::stdin().read_line(&mut line).map(|read| (read, line))
    })
    .await??;

    Ok(match line {
        (0, _) => None,
        (_, text) => Some(text.trim().to_string()),
    })
}
