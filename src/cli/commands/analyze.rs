//! Data analysis command.

use anyhow::bail;
use console::style;
use tracing::info;

use super::helpers::print_report_summary;
use crate::analysis;
use crate::config::Settings;
use crate::storage;

pub fn cmd_analyze(settings: &Settings) -> anyhow::Result<()> {
    let enriched_path = settings.storage.enriched_path();
    if !enriched_path.exists() {
        bail!(
            "no collected data at {} (run `bilitrend collect` first)",
            enriched_path.display()
        );
    }

    let mut records = storage::read_records_csv(&enriched_path)?;
    if records.is_empty() {
        bail!("collected data file {} is empty", enriched_path.display());
    }
    println!(
        "{} {} records loaded",
        style("Analyzing").bold(),
        records.len()
    );

    analysis::preprocess(&mut records, &settings.sentiment);
    let report = analysis::build_report(&records, &settings.analysis);

    storage::write_records_csv(&settings.storage.analyzed_path(), &records)?;
    storage::write_json(&settings.storage.report_path(), &report)?;
    info!(
        "analysis report written to {}",
        settings.storage.report_path().display()
    );

    print_report_summary(&report);
    Ok(())
}
