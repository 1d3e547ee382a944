use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use toxic_relay::config::Config;
use toxic_relay::toxicity::huggingface::HuggingFaceClassifier;
use toxic_relay::toxicity::traits::ToxicityClassifier;

/// toxic-relay: score text for toxicity through a hosted model.
///
/// Forwards text to a Hugging Face text-classification model and returns
/// a fixed six-label score object.
#[derive(Parser)]
#[command(name = "toxic-relay", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server
    Serve {
        /// Port to listen on (overrides PORT)
        #[arg(long)]
        port: Option<u16>,

        /// Address to bind (overrides BIND_ADDR)
        #[arg(long)]
        bind: Option<String>,
    },

    /// Classify a single text and print its scores
    Classify {
        /// The text to score
        text: String,

        /// Print the raw JSON score record instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("toxic_relay=info,tower_http=info")
            }),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Serve { port, bind } => {
            if config.hf_token.is_none() {
                warn!("HF_TOKEN is not set; /detect-toxic will answer with config_error");
            }
            if config.loading_retry.is_enabled() {
                info!(
                    retries = config.loading_retry.max_retries,
                    "Retrying model-loading responses"
                );
            }

            let classifier = HuggingFaceClassifier::new(&config)?;
            let state = toxic_relay::web::AppState::new(Arc::new(classifier));
            let port = port.unwrap_or(config.port);
            let bind = bind.unwrap_or_else(|| config.bind_addr.clone());

            toxic_relay::web::run_server(state, port, &bind).await?;
        }

        Commands::Classify { text, json } => {
            config.require_hf_token()?;
            let classifier = HuggingFaceClassifier::new(&config)?;

            let record = classifier.classify(&text).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                toxic_relay::output::terminal::display_scores(
                    &text,
                    classifier.model_id(),
                    &record,
                );
            }
        }
    }

    Ok(())
}
