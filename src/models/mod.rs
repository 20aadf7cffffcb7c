//! Data models for collected video records.

mod video;

pub use video::{SentimentLabel, SortOrder, VideoRecord};
pub(crate) use video::{json_i64, json_string, json_u64};
