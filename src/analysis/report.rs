//! Comprehensive analysis report assembly.

use serde::{Deserialize, Serialize};

use super::engagement::{analyze_engagement_patterns, EngagementPatterns};
use super::sentiment::{analyze_sentiment, SentimentSummary};
use super::themes::{analyze_content_themes, ContentThemes};
use super::trends::{analyze_time_trends, TimeTrends};
use super::{mean, round2, round3};
use crate::config::AnalysisSettings;
use crate::models::VideoRecord;

#[derive(Debug, Serialize, Deserialize)]
pub struct Overview {
    pub total_videos: u64,
    /// "first year - last year" over records with a known date.
    pub date_range: String,
    pub total_views: u64,
    pub avg_views: f64,
    pub total_engagement: u64,
    pub avg_engagement_rate: f64,
}

/// The single structured report artifact consumed by the visualization
/// layer. Every value is a JSON primitive, list, or mapping.
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub overview: Overview,
    pub time_trends: TimeTrends,
    pub content_themes: ContentThemes,
    pub sentiment_analysis: SentimentSummary,
    pub engagement_patterns: EngagementPatterns,
}

/// Build the full report; records must already be preprocessed.
pub fn build_report(records: &[VideoRecord], cfg: &AnalysisSettings) -> AnalysisReport {
    AnalysisReport {
        overview: build_overview(records),
        time_trends: analyze_time_trends(records),
        content_themes: analyze_content_themes(records, cfg),
        sentiment_analysis: analyze_sentiment(records),
        engagement_patterns: analyze_engagement_patterns(records, cfg),
    }
}

fn build_overview(records: &[VideoRecord]) -> Overview {
    let views: Vec<f64> = records.iter().map(|r| r.views as f64).collect();
    let rates: Vec<f64> = records.iter().map(|r| r.engagement_rate).collect();

    let known_years: Vec<i32> = records.iter().map(|r| r.year).filter(|y| *y > 0).collect();
    let date_range = match (known_years.iter().min(), known_years.iter().max()) {
        (Some(first), Some(last)) => format!("{first} - {last}"),
        _ => String::new(),
    };

    Overview {
        total_videos: records.len() as u64,
        date_range,
        total_views: records.iter().map(|r| r.views).sum(),
        avg_views: round2(mean(&views)),
        total_engagement: records.iter().map(|r| r.engagement_score).sum(),
        avg_engagement_rate: round3(mean(&rates)),
    }
}
