//! neuralab-train CLI - fit one boosted-tree model per dataset signal

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use dataset::Dataset;
use tracing::info;
use training::{BoosterParams, TrainConfig, train_all};

#[derive(Parser)]
#[command(name = "neuralab-train")]
#[command(about = "Train signal classifiers from a recorded dataset")]
struct Cli {
    /// Dataset directory containing metadata.json
    #[arg(value_name = "DATASET")]
    dataset: PathBuf,

    /// Directory model artifacts are written to
    #[arg(long, env = "NEURALAB_MODELS_DIR", default_value = "models")]
    models_dir: PathBuf,

    /// Fraction of rows held out for validation
    #[arg(long, default_value_t = 0.02)]
    test_size: f64,

    /// Seed for the train/validation shuffle
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// JSON file overriding booster parameters
    #[arg(long, value_name = "FILE")]
    params: Option<PathBuf>,

    /// Train only these signals (repeatable; default: all)
    #[arg(long = "signal", value_name = "NAME")]
    signals: Vec<String>,

    /// Write artifacts with the publish marker so the service loads them
    #[arg(long)]
    publish: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let params = match &cli.params {
        Some(path) => BoosterParams::from_json_file(path)?,
        None => BoosterParams::default(),
    };

    let dataset = Dataset::open(&cli.dataset)
        .with_context(|| format!("opening dataset {}", cli.dataset.display()))?;

    let config = TrainConfig::default()
        .models_dir(cli.models_dir)
        .test_size(cli.test_size)
        .seed(cli.seed)
        .params(params)
        .signals(cli.signals)
        .publish(cli.publish);

    let trained = train_all(&dataset, &config)
        .with_context(|| format!("training dataset {}", dataset.name()))?;

    for model in &trained {
        info!("{} -> {}", model.signal, model.path.display());
    }
    info!("Trained {} model(s)", trained.len());

    Ok(())
}
