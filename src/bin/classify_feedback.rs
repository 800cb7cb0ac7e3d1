//! Feedback classification CLI
//!
//! Classifies one piece of feedback with the same pipeline the server uses.
//!
//! Usage:
//!   cargo run --features cli --bin classify_feedback -- "The lectures were engaging"
//!   echo "Hard to follow at times" | cargo run --features cli --bin classify_feedback
//!   cargo run --features cli --bin classify_feedback -- --verbose --no-model "ok I guess"

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sentiment_classifier::{create_pipeline, ClassifierConfig, KeywordMatcher, SentimentPipeline};

/// Classify student feedback as positive, negative, neutral or unknown
#[derive(Parser, Debug)]
#[command(name = "classify_feedback")]
#[command(about = "Classify student feedback sentiment")]
struct Args {
    /// Feedback text; read from stdin when omitted
    text: Vec<String>,

    /// YAML lexicon with `positive:` and `negative:` keyword lists
    #[arg(long, env = "SENTIMENT_LEXICON_PATH")]
    lexicon: Option<PathBuf>,

    /// Model attempts before giving up
    #[arg(long, env = "SENTIMENT_MAX_RETRIES")]
    max_retries: Option<u32>,

    /// Keyword matching only; never call the model
    #[arg(long)]
    no_model: bool,

    /// Print the classification attempt as JSON
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let text = if args.text.is_empty() {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read feedback from stdin")?;
        buf
    } else {
        args.text.join(" ")
    };

    let mut config = ClassifierConfig::from_env();
    if let Some(path) = args.lexicon {
        config.lexicon_path = Some(path);
    }
    if let Some(max_retries) = args.max_retries {
        config.max_retries = max_retries;
    }

    let pipeline = if args.no_model {
        let lexicon = config.load_lexicon().context("Failed to load lexicon")?;
        SentimentPipeline::default()
            .with_strategy(Arc::new(KeywordMatcher::new(Arc::new(lexicon))))
    } else {
        create_pipeline(&config).context("Failed to build sentiment pipeline")?
    };

    let classification = pipeline.classify_detailed(&text).await;

    if args.verbose {
        println!("{}", serde_json::to_string_pretty(&classification)?);
    } else {
        println!("{}", classification.label);
    }

    Ok(())
}
