//! Flat-file persistence for record sets and reports.
//!
//! Every artifact is rewritten whole; phases communicate exclusively through
//! these files, so each one is owned by whichever phase wrote it last.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::analysis::AnalysisReport;
use crate::models::VideoRecord;

/// Write a record set as a UTF-8 CSV with a header row.
pub fn write_records_csv(path: &Path, records: &[VideoRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    for record in records {
        writer
            .serialize(record)
            .with_context(|| format!("failed to write record to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to flush {}", path.display()))?;
    Ok(())
}

/// Read a record set back from a CSV artifact.
pub fn read_records_csv(path: &Path) -> Result<Vec<VideoRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let mut records = Vec::new();
    for row in reader.deserialize() {
        let record: VideoRecord =
            row.with_context(|| format!("failed to parse record in {}", path.display()))?;
        records.push(record);
    }
    Ok(records)
}

/// Write any serializable value as pretty-printed JSON.
pub fn write_json<T: ?Sized + Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    let body = serde_json::to_vec_pretty(value).context("failed to serialize value")?;
    fs::write(path, body).with_context(|| format!("failed to write {}", path.display()))
}

pub fn read_report(path: &Path) -> Result<AnalysisReport> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}
