//! Runtime configuration with embedded defaults and optional TOML overrides.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::models::SortOrder;

/// Settings file picked up from the working directory when `--config` is not
/// given.
pub const DEFAULT_SETTINGS_FILE: &str = "bilitrend.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub api: ApiSettings,
    pub keywords: Keywords,
    pub date_range: DateRange,
    pub collection: CollectionSettings,
    pub analysis: AnalysisSettings,
    pub sentiment: SentimentThresholds,
    pub storage: StorageSettings,
}

/// Search keyword list; a top-level `keywords = [...]` array in TOML.
pub type Keywords = Vec<String>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub search_url: String,
    pub detail_url: String,
    pub user_agent: String,
    pub referer: String,
    pub origin: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            search_url: "https://api.bilibili.com/x/web-interface/search/all/v2".to_string(),
            detail_url: "https://api.bilibili.com/x/web-interface/view".to_string(),
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            referer: "https://www.bilibili.com/".to_string(),
            origin: "https://www.bilibili.com".to_string(),
        }
    }
}

/// Inclusive unix-timestamp window applied to every collected record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DateRange {
    pub start_timestamp: i64,
    pub end_timestamp: i64,
}

impl Default for DateRange {
    fn default() -> Self {
        Self {
            // 2019-01-01 00:00:00 UTC+8 .. 2026-01-01 00:00:00 UTC+8
            start_timestamp: 1_546_272_000,
            end_timestamp: 1_767_225_600,
        }
    }
}

impl DateRange {
    pub fn describe(&self) -> String {
        format!(
            "{} .. {}",
            format_date(self.start_timestamp),
            format_date(self.end_timestamp)
        )
    }
}

fn format_date(ts: i64) -> String {
    DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| ts.to_string())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionSettings {
    /// Pagination cap per keyword.
    pub max_pages: u32,
    /// Per-keyword accumulated record cap.
    pub max_results_per_keyword: usize,
    /// Fixed inter-request delay in milliseconds.
    pub request_delay_ms: u64,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Search ordering; one of totalrank, click, pubdate, dm, stow.
    pub order: String,
}

impl Default for CollectionSettings {
    fn default() -> Self {
        Self {
            max_pages: 20,
            max_results_per_keyword: 1000,
            request_delay_ms: 1000,
            timeout_secs: 10,
            order: SortOrder::TotalRank.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Corpus-wide keyword extraction depth and its report display slice.
    pub corpus_keywords: usize,
    pub corpus_keyword_display: usize,
    /// Per-year keyword extraction depth and its report display slice.
    pub yearly_keywords: usize,
    pub yearly_keyword_display: usize,
    pub top_tags: usize,
    pub top_authors: usize,
    /// Engagement-rate quantile above which a record counts as high-engagement.
    pub high_engagement_percentile: f64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            corpus_keywords: 100,
            corpus_keyword_display: 50,
            yearly_keywords: 20,
            yearly_keyword_display: 10,
            top_tags: 30,
            top_authors: 20,
            high_engagement_percentile: 0.8,
        }
    }
}

/// Cutoffs applied to the [0,1] sentiment score. Scores strictly above
/// `positive` classify as positive, strictly below `negative` as negative;
/// boundary values are neutral.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentThresholds {
    pub positive: f64,
    pub negative: f64,
}

impl Default for SentimentThresholds {
    fn default() -> Self {
        Self {
            positive: 0.6,
            negative: -0.1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("output"),
        }
    }
}

impl StorageSettings {
    pub fn raw_dir(&self) -> PathBuf {
        self.data_dir.join("raw")
    }

    pub fn processed_dir(&self) -> PathBuf {
        self.data_dir.join("processed")
    }

    pub fn charts_dir(&self) -> PathBuf {
        self.output_dir.join("charts")
    }

    pub fn per_keyword_path(&self, keyword: &str) -> PathBuf {
        self.raw_dir()
            .join(format!("{}_data.csv", sanitize_keyword(keyword)))
    }

    pub fn merged_path(&self) -> PathBuf {
        self.raw_dir().join("all_videos_data.csv")
    }

    pub fn enriched_path(&self) -> PathBuf {
        self.processed_dir().join("enriched_videos_data.csv")
    }

    pub fn analyzed_path(&self) -> PathBuf {
        self.output_dir.join("analyzed_data.csv")
    }

    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join("analysis_report.json")
    }
}

/// Keywords become file names; spaces and path separators are flattened.
fn sanitize_keyword(keyword: &str) -> String {
    keyword
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            other => other,
        })
        .collect()
}

fn default_keywords() -> Vec<String> {
    [
        "执行力",
        "执行力培训",
        "执行力管理",
        "团队执行力",
        "提高执行力",
        "执行力差",
        "执行力强",
        "执行力不足",
        "执行能力",
        "执行方法",
        "高效执行",
        "落地执行",
        "执行思维",
        "执行技巧",
        "执行文化",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

impl Settings {
    /// Load settings from an explicit TOML file, from `bilitrend.toml` in the
    /// working directory when present, or fall back to embedded defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_SETTINGS_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };
        if settings.keywords.is_empty() {
            settings.keywords = default_keywords();
        }
        Ok(settings)
    }

    fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("failed to parse settings file {}", path.display()))
    }

    /// Check internal consistency; used directly by `--dry-run`.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.keywords.is_empty() {
            bail!("no search keywords configured");
        }
        if self.keywords.iter().any(|k| k.trim().is_empty()) {
            bail!("search keywords must be non-empty");
        }
        if self.date_range.start_timestamp > self.date_range.end_timestamp {
            bail!(
                "date window start ({}) is after its end ({})",
                self.date_range.start_timestamp,
                self.date_range.end_timestamp
            );
        }
        if self.collection.max_pages == 0 {
            bail!("collection.max_pages must be at least 1");
        }
        if self.collection.max_results_per_keyword == 0 {
            bail!("collection.max_results_per_keyword must be at least 1");
        }
        if SortOrder::from_str(&self.collection.order).is_none() {
            bail!(
                "unknown collection.order '{}' (expected one of totalrank, click, pubdate, dm, stow)",
                self.collection.order
            );
        }
        if self.sentiment.positive <= self.sentiment.negative {
            bail!("sentiment.positive threshold must be above sentiment.negative");
        }
        let percentile = self.analysis.high_engagement_percentile;
        if !(0.0..1.0).contains(&percentile) {
            bail!("analysis.high_engagement_percentile must lie in [0, 1)");
        }
        for (name, url) in [
            ("api.search_url", &self.api.search_url),
            ("api.detail_url", &self.api.detail_url),
        ] {
            url::Url::parse(url).with_context(|| format!("invalid {name} '{url}'"))?;
        }
        Ok(())
    }

    /// Create every directory an end-to-end run writes into.
    /// Failure here is fatal; nothing else in the pipeline can recover from it.
    pub fn ensure_directories(&self) -> anyhow::Result<()> {
        for dir in [
            self.storage.raw_dir(),
            self.storage.processed_dir(),
            self.storage.output_dir.clone(),
            self.storage.charts_dir(),
        ] {
            fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create directory {}", dir.display()))?;
        }
        Ok(())
    }

    pub fn sort_order(&self) -> SortOrder {
        SortOrder::from_str(&self.collection.order).unwrap_or_default()
    }
}
