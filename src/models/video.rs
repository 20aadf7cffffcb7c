//! Video record model and search-result extraction.
//!
//! A [`VideoRecord`] is created from one search-result item, later overwritten
//! in place with authoritative values from the detail endpoint, and finally
//! extended with derived metrics before persistence.

use chrono::{DateTime, Datelike};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Search result ordering accepted by the search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Combined relevance ranking (the platform default).
    #[default]
    TotalRank,
    Click,
    PubDate,
    Danmaku,
    Favorites,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TotalRank => "totalrank",
            Self::Click => "click",
            Self::PubDate => "pubdate",
            Self::Danmaku => "dm",
            Self::Favorites => "stow",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "totalrank" => Some(Self::TotalRank),
            "click" => Some(Self::Click),
            "pubdate" => Some(Self::PubDate),
            "dm" => Some(Self::Danmaku),
            "stow" => Some(Self::Favorites),
            _ => None,
        }
    }
}

/// Coarse sentiment classification of a title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }
}

/// One discovered content item.
///
/// Field order defines the column order of the tabular artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoRecord {
    /// Platform-unique short code (bvid); the dedup key.
    pub id: String,
    /// Numeric id (aid).
    pub numeric_id: u64,
    pub title: String,
    pub author: String,
    pub author_id: u64,
    pub description: String,
    /// Comma-joined raw tag string as delivered by the API.
    pub tags: String,
    pub category: String,
    pub duration_seconds: u64,
    pub cover_url: String,
    pub link_url: String,
    /// Publication unix timestamp; 0 when unknown.
    pub published_at: i64,
    /// Creation timestamp used as fallback when `published_at` is 0.
    pub created_at: i64,
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub month: u32,
    #[serde(default)]
    pub quarter: u32,
    pub views: u64,
    pub comments: u64,
    pub danmaku: u64,
    pub favorites: u64,
    pub coins: u64,
    pub likes: u64,
    pub shares: u64,
    #[serde(default)]
    pub cid: u64,
    #[serde(default = "default_page_count")]
    pub page_count: u32,
    #[serde(default)]
    pub copyright: u32,
    #[serde(default)]
    pub owner_face: String,
    #[serde(default)]
    pub dynamic_text: String,
    /// JSON-encoded subtitle info from the detail endpoint, empty when absent.
    #[serde(default)]
    pub subtitle_json: String,
    /// JSON-encoded collaboration staff list, empty when absent.
    #[serde(default)]
    pub staff_json: String,
    /// JSON-encoded dispute/flag info, empty when absent.
    #[serde(default)]
    pub dispute_json: String,
    #[serde(default)]
    pub engagement_score: u64,
    #[serde(default)]
    pub engagement_rate: f64,
    #[serde(default = "default_sentiment_score")]
    pub sentiment_score: f64,
    #[serde(default)]
    pub sentiment: SentimentLabel,
    /// Which search term produced this record.
    pub source_keyword: String,
    pub collected_at: i64,
}

fn default_page_count() -> u32 {
    1
}

fn default_sentiment_score() -> f64 {
    0.5
}

impl Default for VideoRecord {
    fn default() -> Self {
        Self {
            id: String::new(),
            numeric_id: 0,
            title: String::new(),
            author: String::new(),
            author_id: 0,
            description: String::new(),
            tags: String::new(),
            category: String::new(),
            duration_seconds: 0,
            cover_url: String::new(),
            link_url: String::new(),
            published_at: 0,
            created_at: 0,
            year: 0,
            month: 0,
            quarter: 0,
            views: 0,
            comments: 0,
            danmaku: 0,
            favorites: 0,
            coins: 0,
            likes: 0,
            shares: 0,
            cid: 0,
            page_count: default_page_count(),
            copyright: 0,
            owner_face: String::new(),
            dynamic_text: String::new(),
            subtitle_json: String::new(),
            staff_json: String::new(),
            dispute_json: String::new(),
            engagement_score: 0,
            engagement_rate: 0.0,
            sentiment_score: default_sentiment_score(),
            sentiment: SentimentLabel::Neutral,
            source_keyword: String::new(),
            collected_at: 0,
        }
    }
}

/// Inline highlight markers the search endpoint wraps around matched terms.
const HIGHLIGHT_OPEN: &str = "<em class=\"keyword\">";
const HIGHLIGHT_CLOSE: &str = "</em>";

impl VideoRecord {
    /// Map one raw search-result item into a record.
    ///
    /// Never fails: every missing or unparsable field falls back to its
    /// default (empty string, 0). Only the search highlight markers are
    /// removed from the title; any other markup passes through untouched.
    pub fn from_search_item(item: &Value) -> Self {
        let mut record = Self::default();

        record.id = json_string(item.get("bvid"));
        record.numeric_id = json_u64(item.get("aid"));
        record.title = strip_highlight(&json_string(item.get("title")));
        record.author = extract_author(item);
        record.author_id = json_u64(item.get("mid"));
        record.description = json_string(item.get("description"));
        record.tags = json_string(item.get("tag"));
        record.category = json_string(item.get("typename"));
        record.duration_seconds = parse_duration(item.get("duration"));
        record.cover_url = json_string(item.get("pic"));
        record.link_url = json_string(item.get("arcurl"));
        record.published_at = json_i64(item.get("pubdate"));
        record.created_at = json_i64(item.get("created"));
        record.views = json_u64(item.get("play"));
        record.danmaku = json_u64(item.get("video_review"));
        record.comments = json_u64(item.get("review"));
        record.favorites = json_u64(item.get("favorites"));
        record.coins = json_u64(item.get("coins"));
        record.likes = json_u64(item.get("like"));
        record.shares = json_u64(item.get("share"));

        record
    }

    /// Publication timestamp, falling back to the creation timestamp.
    pub fn effective_timestamp(&self) -> i64 {
        if self.published_at > 0 {
            self.published_at
        } else {
            self.created_at
        }
    }

    /// Whether the effective timestamp lies in `[start, end]` inclusive.
    pub fn in_date_window(&self, start: i64, end: i64) -> bool {
        let ts = self.effective_timestamp();
        start <= ts && ts <= end
    }

    /// Derive year/month/quarter from the effective timestamp.
    ///
    /// An unknown timestamp (<= 0) leaves all three at 0.
    pub fn fill_time_fields(&mut self) {
        let ts = self.effective_timestamp();
        match DateTime::from_timestamp(ts, 0) {
            Some(dt) if ts > 0 => {
                self.year = dt.year();
                self.month = dt.month();
                self.quarter = (dt.month() - 1) / 3 + 1;
            }
            _ => {
                self.year = 0;
                self.month = 0;
                self.quarter = 0;
            }
        }
    }

    /// Compute the weighted engagement score and view-normalized rate.
    pub fn compute_engagement(&mut self) {
        self.engagement_score = self.likes * 3
            + self.coins * 5
            + self.favorites * 4
            + self.shares * 6
            + self.comments * 2;
        self.engagement_rate = if self.views > 0 {
            self.engagement_score as f64 / self.views as f64 * 100.0
        } else {
            0.0
        };
    }

    pub fn duration_minutes(&self) -> f64 {
        self.duration_seconds as f64 / 60.0
    }
}

/// Remove the search highlight markers by literal substring removal.
fn strip_highlight(title: &str) -> String {
    title.replace(HIGHLIGHT_OPEN, "").replace(HIGHLIGHT_CLOSE, "")
}

/// Author resolution: a nested `owner.name` wins when present, otherwise the
/// flat `author` string field.
fn extract_author(item: &Value) -> String {
    let nested = json_string(item.get("owner").and_then(|o| o.get("name")));
    if !nested.is_empty() {
        return nested;
    }
    json_string(item.get("author"))
}

/// Search results report duration as "MM:SS" or "HH:MM:SS"; the detail
/// endpoint reports plain seconds. Accept both, coercing anything else to 0.
fn parse_duration(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::String(s)) => {
            let parts: Vec<&str> = s.trim().split(':').collect();
            if parts.is_empty() || parts.len() > 3 {
                return 0;
            }
            let mut seconds: u64 = 0;
            for part in &parts {
                match part.trim().parse::<u64>() {
                    Ok(v) => seconds = seconds * 60 + v,
                    Err(_) => return 0,
                }
            }
            seconds
        }
        other => json_u64(other),
    }
}

/// Coerce a JSON value to a non-negative integer; numbers and numeric strings
/// are accepted, everything else (including negatives) becomes 0.
pub(crate) fn json_u64(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Number(n)) => {
            if let Some(v) = n.as_u64() {
                v
            } else if let Some(v) = n.as_f64() {
                if v > 0.0 {
                    v as u64
                } else {
                    0
                }
            } else {
                0
            }
        }
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| *v > 0.0)
            .map(|v| v as u64)
            .unwrap_or(0),
        _ => 0,
    }
}

pub(crate) fn json_i64(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n.as_i64().unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse::<i64>().unwrap_or(0),
        _ => 0,
    }
}

pub(crate) fn json_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extract_from_full_item() {
        let item = json!({
            "bvid": "BV1xx411c7mD",
            "aid": 170001,
            "title": "<em class=\"keyword\">执行力</em>训练指南",
            "author": "some up",
            "mid": 42,
            "description": "desc",
            "duration": "12:34",
            "pubdate": 1600000000,
            "created": 1599999999,
            "play": 1000,
            "video_review": 20,
            "review": 30,
            "favorites": 40,
            "coins": 50,
            "like": 60,
            "share": 70,
            "tag": "学习,效率",
            "typename": "知识",
            "pic": "//i0.example/cover.jpg",
            "arcurl": "https://example/video/BV1xx411c7mD"
        });

        let record = VideoRecord::from_search_item(&item);
        assert_eq!(record.id, "BV1xx411c7mD");
        assert_eq!(record.numeric_id, 170001);
        assert_eq!(record.title, "执行力训练指南");
        assert_eq!(record.author, "some up");
        assert_eq!(record.author_id, 42);
        assert_eq!(record.duration_seconds, 12 * 60 + 34);
        assert_eq!(record.published_at, 1600000000);
        assert_eq!(record.views, 1000);
        assert_eq!(record.danmaku, 20);
        assert_eq!(record.comments, 30);
        assert_eq!(record.favorites, 40);
        assert_eq!(record.coins, 50);
        assert_eq!(record.likes, 60);
        assert_eq!(record.shares, 70);
        assert_eq!(record.tags, "学习,效率");
        assert_eq!(record.category, "知识");
    }

    #[test]
    fn extract_from_empty_item_yields_defaults() {
        let record = VideoRecord::from_search_item(&json!({}));
        assert_eq!(record.id, "");
        assert_eq!(record.views, 0);
        assert_eq!(record.published_at, 0);
        assert_eq!(record.title, "");
        assert_eq!(record.page_count, 1);
        assert_eq!(record.sentiment_score, 0.5);
    }

    #[test]
    fn nested_owner_name_wins_over_flat_author() {
        let item = json!({"author": "flat", "owner": {"name": "nested"}});
        assert_eq!(VideoRecord::from_search_item(&item).author, "nested");

        let item = json!({"author": "flat", "owner": {}});
        assert_eq!(VideoRecord::from_search_item(&item).author, "flat");

        let item = json!({"author": "flat"});
        assert_eq!(VideoRecord::from_search_item(&item).author, "flat");
    }

    #[test]
    fn unrelated_markup_passes_through() {
        let item = json!({"title": "<em class=\"keyword\">a</em> <b>b</b>"});
        assert_eq!(VideoRecord::from_search_item(&item).title, "a <b>b</b>");
    }

    #[test]
    fn numeric_strings_and_negatives_coerce() {
        let item = json!({"play": "123", "like": -5, "coins": "junk", "share": 1.9});
        let record = VideoRecord::from_search_item(&item);
        assert_eq!(record.views, 123);
        assert_eq!(record.likes, 0);
        assert_eq!(record.coins, 0);
        assert_eq!(record.shares, 1);
    }

    #[test]
    fn duration_formats() {
        assert_eq!(parse_duration(Some(&json!("12:34"))), 754);
        assert_eq!(parse_duration(Some(&json!("01:02:03"))), 3723);
        assert_eq!(parse_duration(Some(&json!(600))), 600);
        assert_eq!(parse_duration(Some(&json!("oops"))), 0);
        assert_eq!(parse_duration(None), 0);
    }

    #[test]
    fn effective_timestamp_falls_back_to_created() {
        let mut record = VideoRecord::default();
        record.created_at = 500;
        assert_eq!(record.effective_timestamp(), 500);
        record.published_at = 400;
        assert_eq!(record.effective_timestamp(), 400);
    }

    #[test]
    fn date_window_is_inclusive_at_both_ends() {
        let mut record = VideoRecord::default();
        record.published_at = 100;
        assert!(record.in_date_window(100, 200));
        record.published_at = 200;
        assert!(record.in_date_window(100, 200));
        record.published_at = 201;
        assert!(!record.in_date_window(100, 200));
        record.published_at = 99;
        assert!(!record.in_date_window(100, 200));
    }

    #[test]
    fn time_fields_from_timestamp() {
        let mut record = VideoRecord::default();
        // 2021-08-15 00:00:00 UTC
        record.published_at = 1629000000;
        record.fill_time_fields();
        assert_eq!(record.year, 2021);
        assert_eq!(record.month, 8);
        assert_eq!(record.quarter, 3);

        record.published_at = 0;
        record.created_at = 0;
        record.fill_time_fields();
        assert_eq!(record.year, 0);
        assert_eq!(record.quarter, 0);
    }

    #[test]
    fn engagement_score_and_rate() {
        let mut record = VideoRecord::default();
        record.views = 100;
        record.likes = 10;
        record.coins = 5;
        record.favorites = 2;
        record.shares = 1;
        record.comments = 3;
        record.compute_engagement();
        assert_eq!(record.engagement_score, 75);
        assert!((record.engagement_rate - 75.0).abs() < 1e-9);
    }

    #[test]
    fn engagement_rate_is_zero_without_views() {
        let mut record = VideoRecord::default();
        record.likes = 100;
        record.compute_engagement();
        assert_eq!(record.engagement_rate, 0.0);
        assert_eq!(record.engagement_score, 300);
    }
}
