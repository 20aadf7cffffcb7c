//! Chart-data export command.

use anyhow::bail;
use console::style;

use crate::config::Settings;
use crate::storage;
use crate::viz;

pub fn cmd_visualize(settings: &Settings) -> anyhow::Result<()> {
    let report_path = settings.storage.report_path();
    if !report_path.exists() {
        bail!(
            "no analysis report at {} (run `bilitrend analyze` first)",
            report_path.display()
        );
    }

    let report = storage::read_report(&report_path)?;
    let charts_dir = settings.storage.charts_dir();
    viz::write_chart_data(&charts_dir, &report)?;

    println!(
        "{} chart data written to {}",
        style("done:").green(),
        charts_dir.display()
    );
    Ok(())
}
