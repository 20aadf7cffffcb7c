//! Bilibili web API client.
//!
//! One persistent reqwest client with browser-like default headers, reused
//! across all search and detail calls for connection reuse. This layer does
//! no retries and no pacing; both live in the collection loops.

mod response;

pub use response::{ApiEnvelope, ResultGroups};

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, ORIGIN, REFERER};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::config::ApiSettings;
use crate::models::SortOrder;

/// Failures surfaced by a single API call.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected HTTP status {0}")]
    Status(reqwest::StatusCode),

    #[error("api error {code}: {message}")]
    Api { code: i64, message: String },

    #[error("malformed response body: {0}")]
    Malformed(#[from] serde_json::Error),
}

pub struct BiliClient {
    client: reqwest::Client,
    search_url: String,
    detail_url: String,
}

impl BiliClient {
    pub fn new(api: &ApiSettings, timeout: Duration) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(REFERER, HeaderValue::from_str(&api.referer)?);
        headers.insert(ORIGIN, HeaderValue::from_str(&api.origin)?);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, text/plain, */*"),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("zh-CN,zh;q=0.9,en;q=0.8"),
        );

        let client = reqwest::Client::builder()
            .user_agent(&api.user_agent)
            .default_headers(headers)
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .cookie_store(true)
            .build()?;

        Ok(Self {
            client,
            search_url: api.search_url.clone(),
            detail_url: api.detail_url.clone(),
        })
    }

    /// Search one page of results for a keyword.
    ///
    /// Returns the raw item list of the video result group; an empty list
    /// means the search ran out of results, not that the call failed.
    pub async fn search(
        &self,
        keyword: &str,
        page: u32,
        order: SortOrder,
    ) -> Result<Vec<Value>, ApiError> {
        debug_assert!(page >= 1);
        let page = page.to_string();
        let params = [
            ("keyword", keyword),
            ("page", page.as_str()),
            ("order", order.as_str()),
            ("duration", "0"),
            ("tids", "0"),
            ("search_type", "video"),
        ];

        debug!("searching '{}' page {}", keyword, page);
        let envelope = self.request(&self.search_url, &params).await?;
        Ok(ResultGroups::resolve(&envelope.data).into_items())
    }

    /// Fetch authoritative detail data for one video.
    pub async fn fetch_detail(&self, bvid: &str) -> Result<Value, ApiError> {
        let params = [("bvid", bvid)];
        debug!("fetching detail for {}", bvid);
        let envelope = self.request(&self.detail_url, &params).await?;
        Ok(envelope.data)
    }

    async fn request(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<ApiEnvelope, ApiError> {
        let response = self.client.get(url).query(params).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }

        let body = response.text().await?;
        let envelope: ApiEnvelope = serde_json::from_str(&body)?;
        if envelope.code != 0 {
            return Err(ApiError::Api {
                code: envelope.code,
                message: envelope.message,
            });
        }
        Ok(envelope)
    }
}
