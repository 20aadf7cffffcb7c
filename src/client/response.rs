//! Response envelope types for the Bilibili web API.

use serde::Deserialize;
use serde_json::Value;

/// Common response envelope; `code != 0` is an application-level error.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Value,
}

/// Search results resolved from the tagged result-group list.
///
/// The search endpoint nests items inside typed groups. A group tagged
/// `video` is preferred; with no such tag the first group's items are used;
/// with no groups at all the search legitimately found nothing; that is a
/// "no results" outcome, not an error.
#[derive(Debug, PartialEq)]
pub enum ResultGroups {
    Video(Vec<Value>),
    Other(Vec<Value>),
    Empty,
}

impl ResultGroups {
    pub fn resolve(data: &Value) -> Self {
        let groups = match data.get("result").and_then(Value::as_array) {
            Some(groups) if !groups.is_empty() => groups,
            _ => return Self::Empty,
        };

        for group in groups {
            if group.get("result_type").and_then(Value::as_str) == Some("video") {
                return Self::Video(group_items(group));
            }
        }
        Self::Other(group_items(&groups[0]))
    }

    pub fn into_items(self) -> Vec<Value> {
        match self {
            Self::Video(items) | Self::Other(items) => items,
            Self::Empty => Vec::new(),
        }
    }
}

fn group_items(group: &Value) -> Vec<Value> {
    group
        .get("data")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}
