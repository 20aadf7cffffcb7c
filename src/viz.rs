//! Chart-data export for the visualization layer.
//!
//! The actual rendering lives outside this crate; `visualize` only reshapes
//! the saved report into per-chart JSON series plus an index file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::json;

use crate::analysis::AnalysisReport;
use crate::storage;

const CHART_FILES: [&str; 4] = [
    "viz.trends.json",
    "viz.sentiment.json",
    "viz.keywords.json",
    "viz.engagement.json",
];

pub fn write_chart_data(charts_dir: &Path, report: &AnalysisReport) -> Result<()> {
    fs::create_dir_all(charts_dir)
        .with_context(|| format!("failed to create {}", charts_dir.display()))?;

    storage::write_json(&charts_dir.join("viz.trends.json"), &build_trends(report))?;
    storage::write_json(
        &charts_dir.join("viz.sentiment.json"),
        &build_sentiment(report),
    )?;
    storage::write_json(
        &charts_dir.join("viz.keywords.json"),
        &build_keywords(report),
    )?;
    storage::write_json(
        &charts_dir.join("viz.engagement.json"),
        &build_engagement(report),
    )?;

    let index = json!({
        "version": 1,
        "total_videos": report.overview.total_videos,
        "date_range": &report.overview.date_range,
        "files": CHART_FILES,
    });
    storage::write_json(&charts_dir.join("viz.index.json"), &index)?;
    Ok(())
}

fn build_trends(report: &AnalysisReport) -> serde_json::Value {
    let yearly = &report.time_trends.yearly;
    let quarterly = &report.time_trends.quarterly;
    json!({
        "years": yearly.keys().collect::<Vec<_>>(),
        "video_count": yearly.values().map(|t| t.video_count).collect::<Vec<_>>(),
        "avg_views": yearly.values().map(|t| t.avg_views).collect::<Vec<_>>(),
        "avg_engagement_rate": yearly.values().map(|t| t.avg_engagement_rate).collect::<Vec<_>>(),
        "quarters": quarterly.keys().collect::<Vec<_>>(),
        "quarterly_video_count": quarterly.values().map(|t| t.video_count).collect::<Vec<_>>(),
    })
}

fn build_sentiment(report: &AnalysisReport) -> serde_json::Value {
    let sentiment = &report.sentiment_analysis;
    json!({
        "labels": sentiment.distribution.keys().collect::<Vec<_>>(),
        "counts": sentiment.distribution.values().collect::<Vec<_>>(),
        "yearly": &sentiment.yearly,
    })
}

fn build_keywords(report: &AnalysisReport) -> serde_json::Value {
    let keywords = &report.content_themes.top_keywords;
    json!({
        "keywords": keywords.iter().map(|k| &k.keyword).collect::<Vec<_>>(),
        "weights": keywords.iter().map(|k| k.weight).collect::<Vec<_>>(),
        "tags": &report.content_themes.top_tags,
    })
}

fn build_engagement(report: &AnalysisReport) -> serde_json::Value {
    let patterns = &report.engagement_patterns;
    json!({
        "stats": &patterns.stats,
        "high_engagement_threshold": patterns.high_engagement_threshold,
        "high_engagement_count": patterns.high_engagement_count,
        "duration_buckets": &patterns.duration_engagement,
    })
}
