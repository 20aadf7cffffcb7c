//! Bilitrend - Bilibili video metadata collection and trend analysis.
//!
//! Collects search results for a configured keyword set, enriches every video
//! with authoritative per-item statistics, and derives engagement and
//! sentiment reports from the result.

use bilitrend::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    // Initialize logging based on verbosity
    let default_filter = if cli::is_verbose() {
        "bilitrend=info"
    } else {
        "bilitrend=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Run CLI
    cli::run().await
}
