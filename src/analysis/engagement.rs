//! Engagement-pattern statistics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::text::{keyword_counts, KeywordCount};
use super::{mean, median, percentile, round2, std_dev};
use crate::config::AnalysisSettings;
use crate::models::VideoRecord;

#[derive(Debug, Serialize, Deserialize)]
pub struct CounterStats {
    pub mean: f64,
    pub median: f64,
    pub std: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DurationBucket {
    /// Bucket label in minutes, e.g. "5-15".
    pub label: String,
    pub video_count: u64,
    pub avg_engagement_rate: f64,
    pub avg_views: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EngagementPatterns {
    /// Mean/median/std per raw counter and for the engagement rate.
    pub stats: BTreeMap<String, CounterStats>,
    /// Engagement-rate cutoff of the high-engagement cohort.
    pub high_engagement_threshold: f64,
    pub high_engagement_count: u64,
    pub high_engagement_keywords: Vec<KeywordCount>,
    /// Present only when any record carries duration data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_engagement: Option<Vec<DurationBucket>>,
}

/// Duration bucket boundaries in minutes (upper edges, right-closed).
const DURATION_BINS: [(f64, &str); 4] = [
    (5.0, "0-5"),
    (15.0, "5-15"),
    (30.0, "15-30"),
    (60.0, "30-60"),
];
const DURATION_OVERFLOW: &str = "60+";

pub fn analyze_engagement_patterns(
    records: &[VideoRecord],
    cfg: &AnalysisSettings,
) -> EngagementPatterns {
    let mut stats = BTreeMap::new();
    let counters: [(&str, Box<dyn Fn(&VideoRecord) -> f64>); 8] = [
        ("views", Box::new(|r| r.views as f64)),
        ("likes", Box::new(|r| r.likes as f64)),
        ("coins", Box::new(|r| r.coins as f64)),
        ("favorites", Box::new(|r| r.favorites as f64)),
        ("shares", Box::new(|r| r.shares as f64)),
        ("comments", Box::new(|r| r.comments as f64)),
        ("danmaku", Box::new(|r| r.danmaku as f64)),
        ("engagement_rate", Box::new(|r| r.engagement_rate)),
    ];
    for (name, accessor) in &counters {
        let values: Vec<f64> = records.iter().map(|r| accessor(r)).collect();
        stats.insert(
            name.to_string(),
            CounterStats {
                mean: round2(mean(&values)),
                median: round2(median(&values)),
                std: round2(std_dev(&values)),
            },
        );
    }

    let rates: Vec<f64> = records.iter().map(|r| r.engagement_rate).collect();
    let threshold = percentile(&rates, cfg.high_engagement_percentile);
    let cohort: Vec<&VideoRecord> = records
        .iter()
        .filter(|r| r.engagement_rate > threshold)
        .collect();
    let cohort_titles: Vec<&str> = cohort.iter().map(|r| r.title.as_str()).collect();

    EngagementPatterns {
        stats,
        high_engagement_threshold: round2(threshold),
        high_engagement_count: cohort.len() as u64,
        high_engagement_keywords: keyword_counts(cohort_titles, 20),
        duration_engagement: duration_buckets(records),
    }
}

/// Mean engagement by duration bucket; `None` when no record has duration
/// data. Records without a duration are left out of every bucket.
fn duration_buckets(records: &[VideoRecord]) -> Option<Vec<DurationBucket>> {
    if records.iter().all(|r| r.duration_seconds == 0) {
        return None;
    }

    let mut groups: Vec<Vec<&VideoRecord>> = vec![Vec::new(); DURATION_BINS.len() + 1];
    for record in records {
        if record.duration_seconds == 0 {
            continue;
        }
        let minutes = record.duration_minutes();
        let idx = DURATION_BINS
            .iter()
            .position(|(upper, _)| minutes <= *upper)
            .unwrap_or(DURATION_BINS.len());
        groups[idx].push(record);
    }

    let labels: Vec<&str> = DURATION_BINS
        .iter()
        .map(|(_, label)| *label)
        .chain(std::iter::once(DURATION_OVERFLOW))
        .collect();

    let buckets = labels
        .into_iter()
        .zip(groups)
        .map(|(label, group)| {
            let rates: Vec<f64> = group.iter().map(|r| r.engagement_rate).collect();
            let views: Vec<f64> = group.iter().map(|r| r.views as f64).collect();
            DurationBucket {
                label: label.to_string(),
                video_count: group.len() as u64,
                avg_engagement_rate: round2(mean(&rates)),
                avg_views: round2(mean(&views)),
            }
        })
        .collect();
    Some(buckets)
}
