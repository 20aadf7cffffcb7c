//! Collection and enrichment loops.
//!
//! Collection pages through the search endpoint per keyword and persists
//! per-keyword results before the global merge, so partial progress survives
//! a crash between keywords. Enrichment replaces search-derived approximate
//! fields with authoritative detail values, one record at a time.

use std::collections::HashMap;

use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use tracing::{info, warn};

use crate::client::BiliClient;
use crate::config::Settings;
use crate::models::{json_i64, json_string, json_u64, VideoRecord};
use crate::rate_limit::RateLimiter;
use crate::storage;

pub struct Collector<'a> {
    client: &'a BiliClient,
    limiter: &'a RateLimiter,
    settings: &'a Settings,
}

impl<'a> Collector<'a> {
    pub fn new(client: &'a BiliClient, limiter: &'a RateLimiter, settings: &'a Settings) -> Self {
        Self {
            client,
            limiter,
            settings,
        }
    }

    /// Page through search results for one keyword until the endpoint runs
    /// dry, a call fails, or a configured cap is hit.
    pub async fn collect_keyword(&self, keyword: &str) -> Vec<VideoRecord> {
        let max_pages = self.settings.collection.max_pages;
        let max_results = self.settings.collection.max_results_per_keyword;
        let order = self.settings.sort_order();

        let mut collected = Vec::new();
        let mut page = 1u32;

        loop {
            if page > max_pages {
                info!("'{}': page cap {} reached", keyword, max_pages);
                break;
            }

            self.limiter.acquire().await;
            let items = match self.client.search(keyword, page, order).await {
                Ok(items) => items,
                Err(e) => {
                    warn!("'{}' page {} search failed: {}", keyword, page, e);
                    break;
                }
            };

            if items.is_empty() {
                info!("'{}': no more results on page {}", keyword, page);
                break;
            }

            let now = Utc::now().timestamp();
            for item in &items {
                let mut record = VideoRecord::from_search_item(item);
                record.source_keyword = keyword.to_string();
                record.collected_at = now;
                collected.push(record);
            }

            info!(
                "'{}' page {}: {} items (total {})",
                keyword,
                page,
                items.len(),
                collected.len()
            );

            if collected.len() >= max_results {
                info!("'{}': result cap {} reached", keyword, max_results);
                break;
            }

            page += 1;
        }

        collected
    }

    /// Collect every configured keyword, persisting each keyword's
    /// date-filtered results before merging, deduplicating, and persisting
    /// the combined set.
    pub async fn collect_all(&self) -> anyhow::Result<Vec<VideoRecord>> {
        let start = self.settings.date_range.start_timestamp;
        let end = self.settings.date_range.end_timestamp;

        let bar = keyword_progress(self.settings.keywords.len() as u64);
        let mut all = Vec::new();

        for keyword in &self.settings.keywords {
            bar.set_message(keyword.clone());
            let records = self.collect_keyword(keyword).await;
            let kept = filter_by_date(records, start, end);
            info!("'{}': {} records inside the date window", keyword, kept.len());

            if !kept.is_empty() {
                let path = self.settings.storage.per_keyword_path(keyword);
                storage::write_records_csv(&path, &kept)?;
            }
            all.extend(kept);
            bar.inc(1);
        }
        bar.finish_and_clear();

        if all.is_empty() {
            warn!("no records collected for any keyword");
            return Ok(all);
        }

        let deduped = dedup_keep_last(all);
        storage::write_records_csv(&self.settings.storage.merged_path(), &deduped)?;
        info!("collected {} unique videos", deduped.len());
        Ok(deduped)
    }

    /// Fetch authoritative detail data for every record and merge it in.
    ///
    /// A failed fetch keeps the record unchanged; one bad item never aborts
    /// the loop. The enriched set is persisted as its own artifact.
    pub async fn enrich_all(
        &self,
        records: Vec<VideoRecord>,
    ) -> anyhow::Result<Vec<VideoRecord>> {
        let bar = detail_progress(records.len() as u64);
        let total = records.len();
        let mut failures = 0usize;
        let mut enriched = Vec::with_capacity(total);

        for mut record in records {
            if record.id.is_empty() {
                enriched.push(record);
                bar.inc(1);
                continue;
            }

            self.limiter.acquire().await;
            match self.client.fetch_detail(&record.id).await {
                Ok(detail) => apply_detail(&mut record, &detail),
                Err(e) => {
                    failures += 1;
                    warn!("detail fetch failed for {}: {}", record.id, e);
                }
            }
            enriched.push(record);
            bar.inc(1);
        }
        bar.finish_and_clear();

        if failures > 0 {
            warn!(
                "{} of {} detail fetches failed; those records keep their search-derived values",
                failures, total
            );
        }

        storage::write_records_csv(&self.settings.storage.enriched_path(), &enriched)?;
        info!("enriched {} videos", enriched.len());
        Ok(enriched)
    }
}

/// Drop records whose effective timestamp falls outside `[start, end]`.
pub fn filter_by_date(records: Vec<VideoRecord>, start: i64, end: i64) -> Vec<VideoRecord> {
    records
        .into_iter()
        .filter(|r| r.in_date_window(start, end))
        .collect()
}

/// Deduplicate by id, keeping the last occurrence in collection order.
/// Kept records stay at their (last-occurrence) positions.
pub fn dedup_keep_last(records: Vec<VideoRecord>) -> Vec<VideoRecord> {
    let mut last_index: HashMap<String, usize> = HashMap::new();
    for (idx, record) in records.iter().enumerate() {
        last_index.insert(record.id.clone(), idx);
    }

    records
        .into_iter()
        .enumerate()
        .filter(|(idx, record)| last_index.get(&record.id) == Some(idx))
        .map(|(_, record)| record)
        .collect()
}

/// Merge one detail payload into a record.
///
/// Every field is overwritten only when present (and non-null) in the
/// payload; absent fields keep their search-derived values.
pub fn apply_detail(record: &mut VideoRecord, detail: &Value) {
    if let Some(stat) = detail.get("stat") {
        merge_u64(&mut record.views, stat.get("view"));
        merge_u64(&mut record.danmaku, stat.get("danmaku"));
        merge_u64(&mut record.comments, stat.get("reply"));
        merge_u64(&mut record.favorites, stat.get("favorite"));
        merge_u64(&mut record.coins, stat.get("coin"));
        merge_u64(&mut record.likes, stat.get("like"));
        merge_u64(&mut record.shares, stat.get("share"));
    }

    merge_u64(&mut record.duration_seconds, detail.get("duration"));
    merge_u64(&mut record.cid, detail.get("cid"));
    if let Some(pages) = detail.get("pages") {
        // the detail endpoint reports either a page count or a page list
        match pages {
            Value::Array(list) => record.page_count = list.len() as u32,
            other => {
                let count = json_u64(Some(other));
                if count > 0 {
                    record.page_count = count as u32;
                }
            }
        }
    }
    if present(detail.get("copyright")) {
        record.copyright = json_u64(detail.get("copyright")) as u32;
    }

    if let Some(owner) = detail.get("owner") {
        merge_string(&mut record.author, owner.get("name"));
        let mid = json_u64(owner.get("mid"));
        if mid > 0 {
            record.author_id = mid;
        }
        merge_string(&mut record.owner_face, owner.get("face"));
    }

    merge_string(&mut record.category, detail.get("tname"));
    merge_string(&mut record.description, detail.get("desc"));
    merge_string(&mut record.dynamic_text, detail.get("dynamic"));
    if present(detail.get("pubdate")) {
        let pubdate = json_i64(detail.get("pubdate"));
        if pubdate > 0 {
            record.published_at = pubdate;
        }
    }

    merge_json_blob(&mut record.subtitle_json, detail.get("subtitle"));
    merge_json_blob(&mut record.staff_json, detail.get("staff"));
    merge_json_blob(&mut record.dispute_json, detail.get("argue_info"));
}

fn present(value: Option<&Value>) -> bool {
    matches!(value, Some(v) if !v.is_null())
}

fn merge_u64(field: &mut u64, value: Option<&Value>) {
    if present(value) {
        *field = json_u64(value);
    }
}

fn merge_string(field: &mut String, value: Option<&Value>) {
    if present(value) {
        let text = json_string(value);
        if !text.is_empty() {
            *field = text;
        }
    }
}

fn merge_json_blob(field: &mut String, value: Option<&Value>) {
    if present(value) {
        *field = value
            .and_then(|v| serde_json::to_string(v).ok())
            .unwrap_or_default();
    }
}

fn keyword_progress(len: u64) -> ProgressBar {
    ProgressBar::new(len).with_style(
        ProgressStyle::with_template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    )
}

fn detail_progress(len: u64) -> ProgressBar {
    ProgressBar::new(len).with_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} ({eta}) enriching",
        )
        .unwrap()
        .progress_chars("#>-"),
    )
}
