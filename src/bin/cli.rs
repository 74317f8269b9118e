//! Epidash CLI
//!
//! Command-line interface against a running Epidash server:
//! - Render the dashboard and save the snapshot
//! - Print summary counters
//! - Print classified districts
//! - Generate a default config file

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use epidash::charts::{PanelOutcome, SnapshotSurface};
use epidash::config::{generate_default_config, Config, DashboardConfig};
use epidash::dashboard::{load_payload, Dashboard, HttpPayloadSource};
use epidash::model::DashboardPayload;
use epidash::transform::DistrictClassifier;

#[derive(Parser)]
#[command(name = "epidash-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Hong Kong epidemic dashboard")]
#[command(long_about = "Epidash renders the Hong Kong epidemic dashboard.\nFetch case data, render every panel and inspect the results.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL (default: from config)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render every panel and save the snapshot
    Render {
        /// Snapshot output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show summary counters
    Summary,

    /// List districts with risk levels
    Districts,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load_default();
    epidash::logging::init(&config.logging);

    let mut dashboard_config = config.dashboard.clone();
    if let Some(url) = cli.api_url {
        dashboard_config.api_url = url;
    }

    match cli.command {
        Commands::Render { output } => {
            let dashboard = Dashboard::from_config(&dashboard_config)?;
            let surface = SnapshotSurface::new(dashboard.mounts());
            let report = dashboard.run(&surface).await;
            let snapshot = surface.into_snapshot();

            let body = serde_json::json!({ "snapshot": snapshot, "report": &report });
            let text = serde_json::to_string_pretty(&body)?;

            match output {
                Some(path) => {
                    std::fs::write(&path, text)
                        .with_context(|| format!("failed to write {:?}", path))?;
                    println!("Snapshot written to {:?}", path);
                }
                None if cli.format == "json" => println!("{}", text),
                None => {}
            }

            if cli.format != "json" {
                if let Some(error) = &report.error {
                    println!("Load failed: {}", error);
                }

                println!("{:<14} {:<12} {}", "Panel", "Status", "Detail");
                println!("{}", "-".repeat(50));
                for panel in &report.panels {
                    let (status, detail) = describe_outcome(&panel.outcome);
                    println!("{:<14} {:<12} {}", panel.kind.as_str(), status, detail);
                }
                println!();
                println!(
                    "Rendered {}/{} panels, map shape {}",
                    report.rendered_count(),
                    report.panels.len(),
                    if report.shape_registered { "registered" } else { "missing" }
                );
            }

            if report.is_error() {
                std::process::exit(1);
            }
        }

        Commands::Summary => {
            let payload = fetch(&dashboard_config).await?;
            let summary = payload.summary.unwrap_or_default();

            match cli.format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
                _ => {
                    println!("累计确诊: {}", summary.total_confirmed);
                    println!("今日新增: {}", summary.new_cases_today);
                    println!("死亡病例: {}", summary.death_cases);
                    println!("治愈病例: {}", summary.cured_cases);
                    println!("更新时间: {}", summary.latest_date);
                }
            }
        }

        Commands::Districts => {
            let payload = fetch(&dashboard_config).await?;
            let districts = DistrictClassifier::default().classify_all(&payload.district_data);

            match cli.format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&districts)?),
                _ if districts.is_empty() => println!("No district data"),
                _ => {
                    println!("{:<10} {:<22} {:>10} {}", "District", "Name", "Confirmed", "Risk");
                    println!("{}", "-".repeat(56));
                    for district in districts {
                        println!(
                            "{:<10} {:<22} {:>10} {}",
                            district.native_name, district.name, district.confirmed, district.risk
                        );
                    }
                }
            }
        }

        Commands::Config { output } => {
            let config = generate_default_config();

            if let Some(path) = output {
                std::fs::write(&path, &config)
                    .with_context(|| format!("failed to write {:?}", path))?;
                println!("Config written to {:?}", path);
            } else {
                println!("{}", config);
            }
        }
    }

    Ok(())
}

/// Load the payload, exiting with the user-facing message on failure
async fn fetch(config: &DashboardConfig) -> anyhow::Result<DashboardPayload> {
    let source = HttpPayloadSource::from_config(config)?;

    match load_payload(&source).await {
        Ok(payload) => Ok(payload),
        Err(e) => {
            eprintln!("{}", e.user_message());
            eprintln!();
            eprintln!("Make sure the Epidash server is running at {}:", config.api_url);
            eprintln!("  cargo run --bin epidash");
            std::process::exit(1);
        }
    }
}

fn describe_outcome(outcome: &PanelOutcome) -> (&'static str, &str) {
    match outcome {
        PanelOutcome::Rendered => ("rendered", ""),
        PanelOutcome::Ineffective { reason } => ("ineffective", reason.as_str()),
        PanelOutcome::Skipped { reason } => ("skipped", reason.as_str()),
        PanelOutcome::Failed { error } => ("failed", error.as_str()),
    }
}
