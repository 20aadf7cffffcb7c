//! Lexicon-based sentiment scoring and aggregate sentiment statistics.
//!
//! Titles are short, so the scorer counts occurrences of positive and
//! negative lexicon terms (substring matches, which also covers undelimited
//! Chinese text) and maps the balance onto a [0, 1] score. A title with no
//! lexicon hits, or no text at all, scores a neutral 0.5.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use super::text::{keyword_counts, KeywordCount};
use super::{mean, round2, round3};
use crate::config::SentimentThresholds;
use crate::models::{SentimentLabel, VideoRecord};

static POSITIVE_TERMS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    vec![
        "优秀", "高效", "提升", "提高", "成功", "学会", "掌握", "干货", "必看", "推荐", "实用",
        "厉害", "最强", "突破", "成长", "进步", "惊艳", "超赞", "好用", "靠谱", "神器", "清晰",
        "轻松", "受益", "精华", "满满", "喜欢", "爱了", "amazing", "great", "best", "excellent",
        "perfect", "love",
    ]
});

static NEGATIVE_TERMS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    vec![
        "失败", "拖延", "焦虑", "痛苦", "讨厌", "垃圾", "难受", "崩溃", "无语", "后悔", "浪费",
        "翻车", "劝退", "避雷", "错误", "太差", "很差", "太烂", "踩坑", "骗局", "放弃", "迷茫",
        "bad", "worst", "terrible", "awful", "hate", "fail",
    ]
});

/// Score a title into [0, 1]; 0.5 is neutral.
pub fn score_text(text: &str) -> f64 {
    if text.trim().is_empty() {
        return 0.5;
    }

    let lower = text.to_lowercase();
    let positive: usize = POSITIVE_TERMS.iter().map(|t| lower.matches(t).count()).sum();
    let negative: usize = NEGATIVE_TERMS.iter().map(|t| lower.matches(t).count()).sum();

    let total = positive + negative;
    if total == 0 {
        return 0.5;
    }
    0.5 + 0.5 * (positive as f64 - negative as f64) / total as f64
}

/// Classify a score against the configured cutoffs.
///
/// Strict inequalities on both sides; a score exactly equal to a cutoff is
/// neutral.
pub fn classify(score: f64, thresholds: &SentimentThresholds) -> SentimentLabel {
    if score > thresholds.positive {
        SentimentLabel::Positive
    } else if score < thresholds.negative {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LabelEngagement {
    pub mean_views: f64,
    pub mean_engagement_rate: f64,
    pub mean_sentiment_score: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SentimentSummary {
    /// Record counts per label.
    pub distribution: BTreeMap<String, u64>,
    /// Per-year label percentages; each year's row sums to 100.
    pub yearly: BTreeMap<String, BTreeMap<String, f64>>,
    /// Mean engagement metrics grouped by label.
    pub engagement_by_label: BTreeMap<String, LabelEngagement>,
    pub positive_keywords: Vec<KeywordCount>,
    pub negative_keywords: Vec<KeywordCount>,
}

const LABELS: [SentimentLabel; 3] = [
    SentimentLabel::Positive,
    SentimentLabel::Neutral,
    SentimentLabel::Negative,
];

/// Aggregate sentiment statistics; records must already be preprocessed.
pub fn analyze_sentiment(records: &[VideoRecord]) -> SentimentSummary {
    let mut distribution: BTreeMap<String, u64> = BTreeMap::new();
    for label in LABELS {
        distribution.insert(label.as_str().to_string(), 0);
    }
    for record in records {
        *distribution
            .entry(record.sentiment.as_str().to_string())
            .or_insert(0) += 1;
    }

    let mut yearly_counts: BTreeMap<String, BTreeMap<String, u64>> = BTreeMap::new();
    for record in records {
        if record.year == 0 {
            continue;
        }
        let row = yearly_counts.entry(record.year.to_string()).or_default();
        *row.entry(record.sentiment.as_str().to_string()).or_insert(0) += 1;
    }
    let yearly = yearly_counts
        .into_iter()
        .map(|(year, row)| {
            let total: u64 = row.values().sum();
            let mut percentages = BTreeMap::new();
            for label in LABELS {
                let count = row.get(label.as_str()).copied().unwrap_or(0);
                let pct = if total > 0 {
                    round2(count as f64 / total as f64 * 100.0)
                } else {
                    0.0
                };
                percentages.insert(label.as_str().to_string(), pct);
            }
            (year, percentages)
        })
        .collect();

    let mut engagement_by_label = BTreeMap::new();
    for label in LABELS {
        let group: Vec<&VideoRecord> =
            records.iter().filter(|r| r.sentiment == label).collect();
        if group.is_empty() {
            continue;
        }
        let views: Vec<f64> = group.iter().map(|r| r.views as f64).collect();
        let rates: Vec<f64> = group.iter().map(|r| r.engagement_rate).collect();
        let scores: Vec<f64> = group.iter().map(|r| r.sentiment_score).collect();
        engagement_by_label.insert(
            label.as_str().to_string(),
            LabelEngagement {
                mean_views: round3(mean(&views)),
                mean_engagement_rate: round3(mean(&rates)),
                mean_sentiment_score: round3(mean(&scores)),
            },
        );
    }

    let positive_titles = titles_with_label(records, SentimentLabel::Positive);
    let negative_titles = titles_with_label(records, SentimentLabel::Negative);

    SentimentSummary {
        distribution,
        yearly,
        engagement_by_label,
        positive_keywords: keyword_counts(positive_titles.iter().map(String::as_str), 20),
        negative_keywords: keyword_counts(negative_titles.iter().map(String::as_str), 20),
    }
}

fn titles_with_label(records: &[VideoRecord], label: SentimentLabel) -> Vec<String> {
    records
        .iter()
        .filter(|r| r.sentiment == label)
        .map(|r| r.title.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thresholds() -> SentimentThresholds {
        SentimentThresholds {
            positive: 0.6,
            negative: 0.4,
        }
    }

    #[test]
    fn empty_and_neutral_titles_score_half() {
        assert_eq!(score_text(""), 0.5);
        assert_eq!(score_text("   "), 0.5);
        assert_eq!(score_text("普通的一天"), 0.5);
    }

    #[test]
    fn lexicon_hits_move_the_score() {
        assert!(score_text("高效实用的干货") > 0.5);
        assert!(score_text("浪费时间，后悔了") < 0.5);
        let score = score_text("高效但是拖延");
        assert_eq!(score, 0.5);
    }

    #[test]
    fn score_stays_in_unit_interval() {
        for text in ["高效 实用 推荐 干货 必看", "垃圾 翻车 劝退 避雷"] {
            let score = score_text(text);
            assert!((0.0..=1.0).contains(&score), "score {score} out of range");
        }
    }

    #[test]
    fn classify_uses_strict_inequalities() {
        let t = thresholds();
        assert_eq!(classify(0.6, &t), SentimentLabel::Neutral);
        assert_eq!(classify(0.4, &t), SentimentLabel::Neutral);
        assert_eq!(classify(0.6000001, &t), SentimentLabel::Positive);
        assert_eq!(classify(0.3999999, &t), SentimentLabel::Negative);
        assert_eq!(classify(0.5, &t), SentimentLabel::Neutral);
    }

    #[test]
    fn classify_is_monotonic_in_score() {
        let t = thresholds();
        let mut last_rank = 0i32;
        for step in 0..=100 {
            let score = step as f64 / 100.0;
            let rank = match classify(score, &t) {
                SentimentLabel::Negative => -1,
                SentimentLabel::Neutral => 0,
                SentimentLabel::Positive => 1,
            };
            if step > 0 {
                assert!(rank >= last_rank, "label regressed at score {score}");
            }
            last_rank = rank;
        }
    }

    #[test]
    fn default_thresholds_classify_scenario() {
        // score 0.65 against {positive: 0.6, negative: -0.1} must be positive
        let label = classify(0.65, &SentimentThresholds::default());
        assert_eq!(label, SentimentLabel::Positive);
    }

    fn labeled(year: i32, label: SentimentLabel) -> VideoRecord {
        let mut r = VideoRecord::default();
        r.year = year;
        r.sentiment = label;
        r
    }

    #[test]
    fn yearly_percentages_sum_to_100() {
        let records = vec![
            labeled(2021, SentimentLabel::Positive),
            labeled(2021, SentimentLabel::Neutral),
            labeled(2021, SentimentLabel::Neutral),
            labeled(2022, SentimentLabel::Negative),
        ];
        let summary = analyze_sentiment(&records);
        for (year, row) in &summary.yearly {
            let total: f64 = row.values().sum();
            assert!((total - 100.0).abs() < 0.05, "year {year} sums to {total}");
        }
        assert_eq!(summary.yearly["2021"]["neutral"], 66.67);
        assert_eq!(summary.yearly["2022"]["negative"], 100.0);
    }

    #[test]
    fn distribution_counts_all_labels() {
        let records = vec![
            labeled(2021, SentimentLabel::Positive),
            labeled(2021, SentimentLabel::Positive),
            labeled(2021, SentimentLabel::Neutral),
        ];
        let summary = analyze_sentiment(&records);
        assert_eq!(summary.distribution["positive"], 2);
        assert_eq!(summary.distribution["neutral"], 1);
        assert_eq!(summary.distribution["negative"], 0);
    }
}
