//! Temporal aggregation of the record set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{mean, round2};
use crate::models::VideoRecord;

#[derive(Debug, Serialize, Deserialize)]
pub struct YearlyTrend {
    pub video_count: u64,
    pub total_views: u64,
    pub avg_views: f64,
    pub avg_engagement_score: f64,
    pub avg_engagement_rate: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuarterlyTrend {
    pub video_count: u64,
    pub avg_views: f64,
    pub avg_engagement_rate: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MonthlyTrend {
    pub video_count: u64,
    pub avg_views: f64,
}

/// Calendar-bucketed aggregates. BTreeMap keys ("2021", "2021-Q3",
/// "2021-08") sort ascending by period.
#[derive(Debug, Serialize, Deserialize)]
pub struct TimeTrends {
    pub yearly: BTreeMap<String, YearlyTrend>,
    pub quarterly: BTreeMap<String, QuarterlyTrend>,
    pub monthly: BTreeMap<String, MonthlyTrend>,
}

/// Records with an unknown publication date (year 0) are left out of every
/// bucket.
pub fn analyze_time_trends(records: &[VideoRecord]) -> TimeTrends {
    let mut yearly_groups: BTreeMap<String, Vec<&VideoRecord>> = BTreeMap::new();
    let mut quarterly_groups: BTreeMap<String, Vec<&VideoRecord>> = BTreeMap::new();
    let mut monthly_groups: BTreeMap<String, Vec<&VideoRecord>> = BTreeMap::new();

    for record in records {
        if record.year == 0 {
            continue;
        }
        yearly_groups
            .entry(record.year.to_string())
            .or_default()
            .push(record);
        quarterly_groups
            .entry(format!("{}-Q{}", record.year, record.quarter))
            .or_default()
            .push(record);
        monthly_groups
            .entry(format!("{}-{:02}", record.year, record.month))
            .or_default()
            .push(record);
    }

    let yearly = yearly_groups
        .into_iter()
        .map(|(key, group)| {
            let views: Vec<f64> = group.iter().map(|r| r.views as f64).collect();
            let scores: Vec<f64> = group.iter().map(|r| r.engagement_score as f64).collect();
            let rates: Vec<f64> = group.iter().map(|r| r.engagement_rate).collect();
            (
                key,
                YearlyTrend {
                    video_count: group.len() as u64,
                    total_views: group.iter().map(|r| r.views).sum(),
                    avg_views: round2(mean(&views)),
                    avg_engagement_score: round2(mean(&scores)),
                    avg_engagement_rate: round2(mean(&rates)),
                },
            )
        })
        .collect();

    let quarterly = quarterly_groups
        .into_iter()
        .map(|(key, group)| {
            let views: Vec<f64> = group.iter().map(|r| r.views as f64).collect();
            let rates: Vec<f64> = group.iter().map(|r| r.engagement_rate).collect();
            (
                key,
                QuarterlyTrend {
                    video_count: group.len() as u64,
                    avg_views: round2(mean(&views)),
                    avg_engagement_rate: round2(mean(&rates)),
                },
            )
        })
        .collect();

    let monthly = monthly_groups
        .into_iter()
        .map(|(key, group)| {
            let views: Vec<f64> = group.iter().map(|r| r.views as f64).collect();
            (
                key,
                MonthlyTrend {
                    video_count: group.len() as u64,
                    avg_views: round2(mean(&views)),
                },
            )
        })
        .collect();

    TimeTrends {
        yearly,
        quarterly,
        monthly,
    }
}
