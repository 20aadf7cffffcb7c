//! Content-theme aggregation: keywords, tags, and author rankings.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::text::{keyword_weights, KeywordWeight};
use super::{mean, round2};
use crate::config::AnalysisSettings;
use crate::models::VideoRecord;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorStats {
    pub author: String,
    pub video_count: u64,
    pub total_views: u64,
    pub avg_engagement_score: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContentThemes {
    pub top_keywords: Vec<KeywordWeight>,
    /// Per-year keyword slices, keyed by year.
    pub yearly_keywords: BTreeMap<String, Vec<KeywordWeight>>,
    pub top_tags: Vec<TagCount>,
    /// Ranked by record count.
    pub most_active_authors: Vec<AuthorStats>,
    /// Ranked by summed views.
    pub most_influential_authors: Vec<AuthorStats>,
}

pub fn analyze_content_themes(
    records: &[VideoRecord],
    cfg: &AnalysisSettings,
) -> ContentThemes {
    let texts: Vec<String> = records
        .iter()
        .map(|r| format!("{} {}", r.title, r.description))
        .collect();
    let mut top_keywords = keyword_weights(texts.iter().map(String::as_str), cfg.corpus_keywords);
    top_keywords.truncate(cfg.corpus_keyword_display);

    let mut yearly_texts: BTreeMap<String, Vec<&str>> = BTreeMap::new();
    for (record, text) in records.iter().zip(texts.iter()) {
        if record.year == 0 {
            continue;
        }
        yearly_texts
            .entry(record.year.to_string())
            .or_default()
            .push(text.as_str());
    }
    let yearly_keywords = yearly_texts
        .into_iter()
        .map(|(year, year_texts)| {
            let mut keywords = keyword_weights(year_texts, cfg.yearly_keywords);
            keywords.truncate(cfg.yearly_keyword_display);
            (year, keywords)
        })
        .collect();

    ContentThemes {
        top_keywords,
        yearly_keywords,
        top_tags: top_tags(records, cfg.top_tags),
        most_active_authors: rank_authors(records, cfg.top_authors, RankBy::Count),
        most_influential_authors: rank_authors(records, cfg.top_authors, RankBy::Views),
    }
}

fn top_tags(records: &[VideoRecord], top_n: usize) -> Vec<TagCount> {
    let mut counts: HashMap<String, u64> = HashMap::new();
    for record in records {
        for tag in record.tags.split(',') {
            let tag = tag.trim();
            if tag.is_empty() {
                continue;
            }
            *counts.entry(tag.to_string()).or_insert(0) += 1;
        }
    }

    let mut tags: Vec<TagCount> = counts
        .into_iter()
        .map(|(tag, count)| TagCount { tag, count })
        .collect();
    tags.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
    tags.truncate(top_n);
    tags
}

enum RankBy {
    Count,
    Views,
}

fn rank_authors(records: &[VideoRecord], top_n: usize, by: RankBy) -> Vec<AuthorStats> {
    let mut groups: HashMap<&str, Vec<&VideoRecord>> = HashMap::new();
    for record in records {
        if record.author.is_empty() {
            continue;
        }
        groups.entry(record.author.as_str()).or_default().push(record);
    }

    let mut authors: Vec<AuthorStats> = groups
        .into_iter()
        .map(|(author, group)| {
            let scores: Vec<f64> = group.iter().map(|r| r.engagement_score as f64).collect();
            AuthorStats {
                author: author.to_string(),
                video_count: group.len() as u64,
                total_views: group.iter().map(|r| r.views).sum(),
                avg_engagement_score: round2(mean(&scores)),
            }
        })
        .collect();

    match by {
        RankBy::Count => authors.sort_by(|a, b| {
            b.video_count
                .cmp(&a.video_count)
                .then_with(|| b.total_views.cmp(&a.total_views))
                .then_with(|| a.author.cmp(&b.author))
        }),
        RankBy::Views => authors.sort_by(|a, b| {
            b.total_views
                .cmp(&a.total_views)
                .then_with(|| b.video_count.cmp(&a.video_count))
                .then_with(|| a.author.cmp(&b.author))
        }),
    }
    authors.truncate(top_n);
    authors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(author: &str, views: u64, tags: &str, year: i32) -> VideoRecord {
        let mut r = VideoRecord::default();
        r.author = author.to_string();
        r.views = views;
        r.tags = tags.to_string();
        r.year = year;
        r.title = "执行力 方法论".to_string();
        r
    }

    #[test]
    fn tags_are_split_trimmed_and_counted() {
        let records = vec![
            record("a", 0, "学习, 效率 ,学习", 2021),
            record("b", 0, "效率", 2021),
            record("c", 0, "", 2021),
        ];
        let tags = top_tags(&records, 10);
        assert_eq!(tags[0].tag, "学习");
        assert_eq!(tags[0].count, 2);
        assert_eq!(tags[1].tag, "效率");
        assert_eq!(tags[1].count, 2);
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn active_and_influential_rankings_differ() {
        let records = vec![
            record("prolific", 10, "", 2021),
            record("prolific", 10, "", 2021),
            record("prolific", 10, "", 2021),
            record("viral", 1_000_000, "", 2021),
        ];
        let cfg = AnalysisSettings::default();
        let themes = analyze_content_themes(&records, &cfg);

        assert_eq!(themes.most_active_authors[0].author, "prolific");
        assert_eq!(themes.most_active_authors[0].video_count, 3);
        assert_eq!(themes.most_influential_authors[0].author, "viral");
        assert_eq!(themes.most_influential_authors[0].total_views, 1_000_000);
    }

    #[test]
    fn yearly_keywords_respect_display_slice() {
        let mut cfg = AnalysisSettings::default();
        cfg.yearly_keyword_display = 1;
        let records = vec![record("a", 0, "", 2021)];
        let themes = analyze_content_themes(&records, &cfg);
        assert_eq!(themes.yearly_keywords["2021"].len(), 1);
    }

    #[test]
    fn anonymous_records_are_not_ranked() {
        let records = vec![record("", 100, "", 2021)];
        let themes = analyze_content_themes(&records, &AnalysisSettings::default());
        assert!(themes.most_active_authors.is_empty());
    }
}
