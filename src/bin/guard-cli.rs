use std::path::PathBuf;

use clap::{Parser, Subcommand};

use outbound_guard::config::{load_config, GuardConfig};
use outbound_guard::context::CorrelationId;
use outbound_guard::isolation::PoolRegistry;
use outbound_guard::observability;
use outbound_guard::{StatisticsServiceClient, UserServiceClient};

#[derive(Parser)]
#[command(name = "guard-cli")]
#[command(about = "Probe CLI for the guarded outbound clients", long_about = None)]
struct Cli {
    /// Path to a TOML config file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Correlation id to propagate; a fresh one is generated when omitted.
    #[arg(long)]
    correlation: Option<CorrelationId>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up whether a user is premium, degrading to false on faults
    CheckUser { id: String },
    /// Publish one advertisement-view event
    AdShown { id: u64 },
    /// Show the configured isolation pools
    Pools,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GuardConfig::default(),
    };

    observability::logging::init_logging(&config.observability);
    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            observability::metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let registry = PoolRegistry::from_config(&config.groups);
    let correlation = cli.correlation.unwrap_or_default();
    let http = reqwest::Client::new();

    match cli.command {
        Commands::CheckUser { id } => {
            let client = UserServiceClient::new(&config.user_service, &registry, http)?;
            match client.is_premium_user(&id, correlation).await {
                Ok(premium) => {
                    let report = serde_json::json!({
                        "id": id,
                        "premiumUser": premium,
                        "correlationId": correlation.to_string(),
                    });
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
                Err(err) => {
                    eprintln!("Error: user lookup failed: {}", err);
                    std::process::exit(1);
                }
            }
        }
        Commands::AdShown { id } => {
            let client = StatisticsServiceClient::new(&config.statistics, &registry, http)?;
            // Hold the process open until the spawned publish settles.
            client.advertisement_is_shown(id, correlation).await?;
            let report = serde_json::json!({
                "id": id,
                "correlationId": correlation.to_string(),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Pools => {
            println!("{}", serde_json::to_string_pretty(&config.groups)?);
        }
    }

    Ok(())
}
