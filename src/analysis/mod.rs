//! Derived metrics and aggregate statistics over collected records.
//!
//! Everything in this module is a pure function of the record set; no network
//! or filesystem access happens here.

mod engagement;
mod report;
mod sentiment;
mod text;
mod themes;
mod trends;

pub use engagement::{analyze_engagement_patterns, CounterStats, DurationBucket, EngagementPatterns};
pub use report::{build_report, AnalysisReport, Overview};
pub use sentiment::{analyze_sentiment, classify, score_text, LabelEngagement, SentimentSummary};
pub use text::{keyword_counts, keyword_weights, tokenize, KeywordCount, KeywordWeight};
pub use themes::{analyze_content_themes, AuthorStats, ContentThemes, TagCount};
pub use trends::{analyze_time_trends, MonthlyTrend, QuarterlyTrend, TimeTrends, YearlyTrend};

use crate::config::SentimentThresholds;
use crate::models::VideoRecord;

/// Fill every derived field: calendar buckets, engagement metrics, and the
/// sentiment classification of the title.
pub fn preprocess(records: &mut [VideoRecord], thresholds: &SentimentThresholds) {
    for record in records.iter_mut() {
        record.fill_time_fields();
        record.compute_engagement();
        record.sentiment_score = sentiment::score_text(&record.title);
        record.sentiment = sentiment::classify(record.sentiment_score, thresholds);
    }
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

pub(crate) fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Sample standard deviation (n - 1 denominator); 0 for fewer than two values.
pub(crate) fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance =
        values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Quantile with linear interpolation between closest ranks.
pub(crate) fn percentile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        let weight = rank - lower as f64;
        sorted[lower] * (1.0 - weight) + sorted[upper] * weight
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_median_of_small_sets() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[2.0, 4.0]), 3.0);
        assert_eq!(median(&[1.0, 3.0, 2.0]), 2.0);
        assert_eq!(median(&[1.0, 2.0, 3.0, 4.0]), 2.5);
    }

    #[test]
    fn sample_std_dev() {
        assert_eq!(std_dev(&[5.0]), 0.0);
        // sample std of [2, 4, 4, 4, 5, 5, 7, 9] is ~2.138
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((std_dev(&values) - 2.138).abs() < 0.001);
    }

    #[test]
    fn percentile_interpolates() {
        let values = [10.0, 20.0, 30.0, 40.0, 50.0];
        assert_eq!(percentile(&values, 0.0), 10.0);
        assert_eq!(percentile(&values, 1.0), 50.0);
        assert_eq!(percentile(&values, 0.5), 30.0);
        assert_eq!(percentile(&values, 0.8), 42.0);
    }

    #[test]
    fn preprocess_fills_all_derived_fields() {
        let mut record = VideoRecord::default();
        record.title = "高效执行的方法".into();
        record.published_at = 1_629_000_000;
        record.views = 100;
        record.likes = 10;
        record.coins = 5;
        record.favorites = 2;
        record.shares = 1;
        record.comments = 3;

        let mut records = vec![record];
        preprocess(&mut records, &SentimentThresholds::default());

        assert_eq!(records[0].year, 2021);
        assert_eq!(records[0].engagement_score, 75);
        assert!((records[0].engagement_rate - 75.0).abs() < 1e-9);
        assert!((0.0..=1.0).contains(&records[0].sentiment_score));
    }
}
