//! cropcheck
//!
//! Submits every sample folder to the crop service, polls the jobs until they
//! resolve and writes each result next to its inputs.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, error, info, info_span};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cropcheck_client::{JobService, ProtocolAdapter, ServiceClient};
use cropcheck_core::ProtocolVersion;
use cropcheck_runner::{Config, driver};

#[derive(Parser)]
#[command(name = "cropcheck")]
#[command(about = "End-to-end exerciser for the crop service", long_about = None)]
struct Cli {
    /// Service base URL
    #[arg(long, env = "CROPCHECK_BASE_URL", default_value = "http://localhost:8000")]
    base_url: String,

    /// API version to speak (v1 or v2)
    #[arg(long, env = "CROPCHECK_API_VERSION", default_value = "v2")]
    api_version: String,

    /// Folder whose subfolders are the samples
    #[arg(long, env = "CROPCHECK_SAMPLES_ROOT", default_value = "samples/images")]
    samples_root: PathBuf,

    /// Seconds between poll rounds
    #[arg(long, env = "CROPCHECK_POLL_INTERVAL", default_value_t = 2)]
    poll_interval: u64,

    /// Per-request timeout in seconds
    #[arg(long, env = "CROPCHECK_REQUEST_TIMEOUT", default_value_t = 30)]
    request_timeout: u64,

    /// Max status requests in flight per round
    #[arg(long, env = "CROPCHECK_MAX_PARALLEL_POLLS", default_value_t = 8)]
    max_parallel_polls: usize,

    /// Abandon a job after this many consecutive failed polls (default: retry forever)
    #[arg(long, env = "CROPCHECK_MAX_POLL_FAILURES")]
    max_poll_failures: Option<u32>,

    /// Stop polling after this many seconds (default: no limit)
    #[arg(long, env = "CROPCHECK_RUN_TIMEOUT")]
    run_timeout: Option<u64>,
}

impl Cli {
    fn into_config(self) -> Result<Config> {
        let protocol: ProtocolVersion = self
            .api_version
            .parse()
            .context("Invalid configuration")?;

        let mut config = Config::new(self.base_url, protocol);
        config.samples_root = self.samples_root;
        config.poll_interval = Duration::from_secs(self.poll_interval);
        config.request_timeout = Duration::from_secs(self.request_timeout);
        config.max_parallel_polls = self.max_parallel_polls;
        config.max_poll_failures = self.max_poll_failures;
        config.run_timeout = self.run_timeout.map(Duration::from_secs);

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "cropcheck=info,cropcheck_runner=info,cropcheck_client=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Cli::parse().into_config()?;
    info!(
        "Loaded configuration: base_url={}, api_version={}, samples_root={}",
        config.base_url,
        config.protocol,
        config.samples_root.display()
    );

    let client = ServiceClient::with_timeout(config.base_url.clone(), config.request_timeout)
        .context("Failed to build HTTP client")?;
    let service: Arc<dyn JobService> = Arc::new(ProtocolAdapter::new(config.protocol, client));

    let shutdown = CancellationToken::new();
    tokio::spawn(shutdown_signal(shutdown.clone()));

    let run_id = uuid::Uuid::new_v4();
    let report = match driver::run(&config, service, shutdown)
        .instrument(info_span!("run", %run_id))
        .await
    {
        Ok(report) => report,
        Err(e) => {
            error!("Run failed: {:#}", e);
            return Err(e);
        }
    };

    report.print();

    if !report.is_success() {
        std::process::exit(1);
    }

    Ok(())
}

/// Cancels submission and polling on Ctrl+C or SIGTERM
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Interrupt received, finishing the request in flight");
    shutdown.cancel();
}
