//! Offline end-to-end pipeline tests.
//!
//! Exercises the full post-collection path over a synthetic record set:
//! dedup and date filtering, enrichment merge semantics, derived metrics,
//! report assembly, and the on-disk artifact round trips.

use bilitrend::analysis::{build_report, preprocess};
use bilitrend::collector::{apply_detail, dedup_keep_last, filter_by_date};
use bilitrend::config::{AnalysisSettings, SentimentThresholds, StorageSettings};
use bilitrend::models::{SentimentLabel, VideoRecord};
use bilitrend::{storage, viz};

use serde_json::json;

fn search_record(id: &str, published_at: i64, collected_at: i64) -> VideoRecord {
    let mut record = VideoRecord::from_search_item(&json!({
        "bvid": id,
        "title": "高效执行的干货分享",
        "author": "up one",
        "play": 100,
        "like": 10,
        "coins": 5,
        "favorites": 2,
        "share": 1,
        "review": 3,
        "pubdate": published_at,
        "tag": "学习,效率"
    }));
    record.source_keyword = "执行力".to_string();
    record.collected_at = collected_at;
    record
}

#[test]
fn duplicate_ids_collapse_to_the_later_collection() {
    let records = vec![
        search_record("BV1", 1_600_000_000, 100),
        search_record("BV2", 1_600_000_000, 100),
        search_record("BV1", 1_600_000_000, 200),
    ];
    let deduped = dedup_keep_last(records);
    assert_eq!(deduped.len(), 2);
    let bv1 = deduped.iter().find(|r| r.id == "BV1").unwrap();
    assert_eq!(bv1.collected_at, 200);
}

#[test]
fn date_window_then_dedup_then_metrics() {
    let records = vec![
        search_record("BV1", 1_600_000_000, 1),
        search_record("BV2", 100, 1), // outside the window
    ];
    let kept = filter_by_date(records, 1_546_272_000, 1_767_225_600);
    assert_eq!(kept.len(), 1);

    let mut records = dedup_keep_last(kept);
    preprocess(&mut records, &SentimentThresholds::default());

    // views=100, likes=10, coins=5, favorites=2, shares=1, comments=3
    // score = 10*3 + 5*5 + 2*4 + 1*6 + 3*2 = 75, rate = 75%
    assert_eq!(records[0].engagement_score, 75);
    assert!((records[0].engagement_rate - 75.0).abs() < 1e-9);
    assert_eq!(records[0].year, 2020);
}

#[test]
fn one_failed_enrichment_leaves_the_set_complete() {
    let mut records: Vec<VideoRecord> = (0..5)
        .map(|i| search_record(&format!("BV{i}"), 1_600_000_000, 1))
        .collect();

    let detail = json!({
        "stat": {"view": 5000, "like": 500},
        "duration": 480,
        "owner": {"name": "verified up", "mid": 9}
    });
    for (i, record) in records.iter_mut().enumerate() {
        if i != 3 {
            apply_detail(record, &detail);
        }
    }

    assert_eq!(records.len(), 5);
    assert_eq!(records[3].views, 100);
    assert_eq!(records[3].author, "up one");
    for (i, record) in records.iter().enumerate() {
        if i != 3 {
            assert_eq!(record.views, 5000);
            assert_eq!(record.author, "verified up");
            assert_eq!(record.duration_seconds, 480);
        }
    }
}

#[test]
fn artifacts_round_trip_and_feed_the_report() {
    let dir = tempfile::tempdir().unwrap();
    let storage_cfg = StorageSettings {
        data_dir: dir.path().join("data"),
        output_dir: dir.path().join("output"),
    };

    let mut records = vec![
        search_record("BV1", 1_600_000_000, 1),
        search_record("BV2", 1_629_000_000, 1),
    ];
    storage::write_records_csv(&storage_cfg.enriched_path(), &records).unwrap();

    let mut loaded = storage::read_records_csv(&storage_cfg.enriched_path()).unwrap();
    assert_eq!(loaded.len(), records.len());
    assert_eq!(loaded[0].id, "BV1");

    preprocess(&mut loaded, &SentimentThresholds::default());
    let report = build_report(&loaded, &AnalysisSettings::default());
    assert_eq!(report.overview.total_videos, 2);
    assert_eq!(report.overview.date_range, "2020 - 2021");

    storage::write_json(&storage_cfg.report_path(), &report).unwrap();
    let reread = storage::read_report(&storage_cfg.report_path()).unwrap();
    assert_eq!(reread.overview.total_views, report.overview.total_views);

    viz::write_chart_data(&storage_cfg.charts_dir(), &reread).unwrap();
    assert!(storage_cfg.charts_dir().join("viz.index.json").exists());

    // the pre-analysis artifact is untouched by later phases
    preprocess(&mut records, &SentimentThresholds::default());
    storage::write_records_csv(&storage_cfg.analyzed_path(), &records).unwrap();
    assert!(storage_cfg.enriched_path().exists());
}

#[test]
fn sentiment_labels_follow_the_configured_cutoffs() {
    let thresholds = SentimentThresholds {
        positive: 0.6,
        negative: 0.4,
    };
    let mut positive = search_record("BV1", 1_600_000_000, 1);
    positive.title = "高效实用的干货，推荐".to_string();
    let mut negative = search_record("BV2", 1_600_000_000, 1);
    negative.title = "浪费时间，后悔了，避雷".to_string();
    let mut neutral = search_record("BV3", 1_600_000_000, 1);
    neutral.title = "第三期视频".to_string();

    let mut records = vec![positive, negative, neutral];
    preprocess(&mut records, &thresholds);

    assert_eq!(records[0].sentiment, SentimentLabel::Positive);
    assert_eq!(records[1].sentiment, SentimentLabel::Negative);
    assert_eq!(records[2].sentiment, SentimentLabel::Neutral);
}
