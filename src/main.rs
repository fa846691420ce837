//! neuralab - HTTP prediction service for published signal models

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use server::ServerConfig;
use tracing::{error, info};

/// Delay before the single restart attempt.
const RESTART_DELAY: Duration = Duration::from_secs(5);

#[derive(Parser)]
#[command(name = "neuralab")]
#[command(about = "Serve published boosted-tree models over HTTP")]
struct Cli {
    /// Host to bind to
    #[arg(short = 'H', long, env = "NEURALAB_HOST", default_value = "localhost")]
    host: String,

    /// Port to listen on
    #[arg(short = 'P', long, env = "NEURALAB_PORT", default_value_t = 8080)]
    port: u16,

    /// Directory holding model artifacts; only `+`-prefixed files are served
    #[arg(long, env = "NEURALAB_MODELS_DIR", default_value = "models")]
    models_dir: PathBuf,
}

impl Cli {
    fn server_config(&self) -> ServerConfig {
        ServerConfig::default()
            .host(self.host.clone())
            .port(self.port)
            .models_dir(self.models_dir.clone())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Cli::parse().server_config();
    info!(
        addr = %config.bind_addr(),
        models_dir = %config.models_dir.display(),
        "Starting prediction service"
    );

    if let Err(err) = server::serve(&config).await {
        error!("Service stopped: {}", err);
        info!("Restarting in {}s", RESTART_DELAY.as_secs());
        tokio::time::sleep(RESTART_DELAY).await;

        server::serve(&config)
            .await
            .context("prediction service failed after restart")?;
    }

    Ok(())
}
