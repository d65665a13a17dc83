//! `checkworthy` command-line entrypoint.
//!
//! Scores sentences read from stdin (one per line) and prints them as JSON, or trains a
//! new model from a labelled CSV.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::Parser;
use mimalloc::MiMalloc;
use tokio::io::AsyncReadExt;

use pastel::config::Config;
use pastel::llm::LlmClient;
use pastel::pastel::CheckworthyClaimDetector;
use pastel::training::train_model;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Command-line arguments for checkworthy
#[derive(Parser, Debug)]
#[command(name = "checkworthy")]
#[command(about = "Scores sentences for checkworthiness")]
#[command(version)]
struct Args {
    /// Train a model from this labelled CSV (sentence,score) instead of scoring
    #[arg(long, requires_all = ["features", "out"])]
    train: Option<PathBuf>,

    /// Feature list for training, one question or function name per line
    #[arg(long)]
    features: Option<PathBuf>,

    /// Where to write the trained model
    #[arg(long)]
    out: Option<PathBuf>,

    /// Model file to score with (overrides PASTEL_MODEL_PATH)
    #[arg(long, env = "PASTEL_MODEL_PATH")]
    model: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = Config::from_env()?;
    if args.model.is_some() {
        config.model_path = args.model.clone();
    }
    config.validate()?;

    let client: Arc<dyn LlmClient> = Arc::new(config.llm_client());
    tracing::info!(llm_model = %config.llm_model, "checkworthy starting");

    match (args.train, args.features, args.out) {
        (Some(csv), Some(features), Some(out)) => {
            let listing = tokio::fs::read_to_string(&features)
                .await
                .with_context(|| format!("reading feature list {}", features.display()))?;
            let names: Vec<&str> = listing
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .collect();
            if names.is_empty() {
                bail!("feature list {} is empty", features.display());
            }

            let model = train_model(&csv, &names, &out, client, config.retry_policy()).await?;
            tracing::info!(
                out = %out.display(),
                features = model.len(),
                "Model trained"
            );
        }
        (None, _, _) => {
            let detector = CheckworthyClaimDetector::new(config.detector_config()?, client)?;

            let mut input = String::new();
            tokio::io::stdin()
                .read_to_string(&mut input)
                .await
                .context("reading sentences from stdin")?;
            let sentences: Vec<String> = input
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect();

            let scored = detector.score(&sentences).await?;
            println!("{}", serde_json::to_string_pretty(&scored)?);
        }
        _ => bail!("--train needs both --features and --out"),
    }

    Ok(())
}
