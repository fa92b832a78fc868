//! Pythia MCP Server
//!
//! Stdio MCP server giving tool-calling agents authenticated access to the
//! aiprediction.us daily prediction API.

mod config;
mod server;
mod tools;

use std::sync::Arc;

use clap::Parser;
use tracing::{debug, error, info, warn};

use pythia_client::{Oracle, PredictionService};

use crate::config::{ENV_BASE_URL, ENV_TIMEOUT_SECS, ServerConfig};
use crate::server::run_server;

/// Command-line overrides for the environment configuration.
#[derive(Debug, Parser)]
#[command(
    name = "pythia-mcp",
    version,
    about = "MCP server for aiprediction.us daily predictions"
)]
struct Args {
    /// Base URL of the prediction service (overrides API_BASE_URL).
    #[arg(long)]
    base_url: Option<String>,

    /// Request timeout in seconds (overrides PYTHIA_TIMEOUT_SECS).
    #[arg(long)]
    timeout_secs: Option<u64>,
}

/// Initializes structured logging with tracing.
///
/// Supports two output formats via the `PYTHIA_LOG_FORMAT` environment
/// variable:
/// - `json`: Machine-readable JSON logs
/// - `pretty`: Human-readable formatted logs (default)
///
/// Log level is controlled via `RUST_LOG`. Everything is written to stderr;
/// stdout belongs to the MCP transport.
fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};

    let format = std::env::var("PYTHIA_LOG_FORMAT")
        .unwrap_or_else(|_| "pretty".to_string())
        .to_lowercase();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pythia_mcp=info,pythia_client=info"));

    match format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .init();
        }
        _ => {
            fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .init();
        }
    }
}

/// Best-effort warm-up: log in and fetch today's record.
///
/// Failure is logged but never fatal; the service may simply have no data
/// yet for today.
async fn startup_probe(service: &dyn PredictionService) {
    match service.current_date_data().await {
        Ok(record) => {
            info!(
                "Startup probe fetched {} with {} prediction fields",
                record.did,
                record.last_elements.len()
            );
        }
        Err(e) => {
            warn!("Startup probe did not get today's record ({e}); serving anyway");
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env may carry RUST_LOG and the log format, so read it before tracing
    // is initialized.
    let dotenv = dotenvy::dotenv();
    init_tracing();
    if let Ok(path) = dotenv {
        debug!("Loaded environment from {}", path.display());
    }

    info!("Starting Pythia MCP server");

    let args = Args::parse();

    // Flags take precedence over the environment.
    let config = match ServerConfig::from_lookup(|name| {
        let flag = match name {
            ENV_BASE_URL => args.base_url.clone(),
            ENV_TIMEOUT_SECS => args.timeout_secs.map(|secs| secs.to_string()),
            _ => None,
        };
        flag.or_else(|| std::env::var(name).ok())
    }) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {e}");
            return Err(e.into());
        }
    };

    info!(
        "Configured for {} as user {}, timeout {}s",
        config.credentials.base_url(),
        config.credentials.username(),
        config.client.timeout.as_secs()
    );

    let oracle = match Oracle::new(config.credentials, config.client) {
        Ok(oracle) => oracle,
        Err(e) => {
            error!("Failed to initialize the prediction client: {e}");
            return Err(e.into());
        }
    };
    let service: Arc<dyn PredictionService> = Arc::new(oracle);

    startup_probe(service.as_ref()).await;

    run_server(service).await
}
