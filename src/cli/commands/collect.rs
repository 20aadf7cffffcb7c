//! Data collection command.

use std::time::Duration;

use console::style;
use tracing::info;

use crate::client::BiliClient;
use crate::collector::Collector;
use crate::config::Settings;
use crate::rate_limit::RateLimiter;

pub async fn cmd_collect(settings: &Settings, force_recollect: bool) -> anyhow::Result<()> {
    let enriched_path = settings.storage.enriched_path();
    if enriched_path.exists() && !force_recollect {
        println!(
            "{} {} already exists (use --force-recollect to re-collect)",
            style("skipping collection:").yellow(),
            enriched_path.display()
        );
        return Ok(());
    }

    println!("{}", style("Collecting search results").bold());
    println!("  keywords: {}", settings.keywords.join(", "));
    println!("  window:   {}", settings.date_range.describe());

    let client = BiliClient::new(
        &settings.api,
        Duration::from_secs(settings.collection.timeout_secs),
    )?;
    let limiter = RateLimiter::new(Duration::from_millis(settings.collection.request_delay_ms));
    let collector = Collector::new(&client, &limiter, settings);

    info!("starting collection");
    let records = collector.collect_all().await?;
    if records.is_empty() {
        println!("{}", style("no records collected").yellow());
        return Ok(());
    }

    println!("collected {} unique videos; fetching details", records.len());
    let enriched = collector.enrich_all(records).await?;

    println!(
        "{} {} videos -> {}",
        style("done:").green(),
        enriched.len(),
        enriched_path.display()
    );
    Ok(())
}
