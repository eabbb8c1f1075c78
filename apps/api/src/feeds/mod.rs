//! Built-in prompt feeds, fetched over HTTP on every catalog load.
//!
//! Two feeds exist: a frequently-updated `daily` feed and a stable `core` feed.
//! Each returns a JSON array of prompt-shaped objects. Requests are
//! cache-busted with a `t=<millis>` query parameter. Entries come back
//! undecoded so one malformed entry cannot sink the rest of its feed.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::prompt::PromptOrigin;
#[cfg(test)]
use crate::models::prompt::RawPrompt;

pub const DEFAULT_DAILY_FEED_URL: &str =
    "https://raw.githubusercontent.com/g1thubX/nano-banana-verse-tool/main/config/daily-add.json";
pub const DEFAULT_CORE_FEED_URL: &str =
    "https://raw.githubusercontent.com/g1thubX/nano-banana-verse-tool/refs/heads/main/config/prompts.json";

const FEED_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedSource {
    Daily,
    Core,
}

impl FeedSource {
    pub fn label(self) -> &'static str {
        match self {
            FeedSource::Daily => "daily",
            FeedSource::Core => "core",
        }
    }

    pub fn origin(self) -> PromptOrigin {
        match self {
            FeedSource::Daily => PromptOrigin::Daily,
            FeedSource::Core => PromptOrigin::Core,
        }
    }
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("feed returned status {0}")]
    Status(u16),
}

/// Source of built-in prompts. Carried by the repository as `Arc<dyn PromptFeed>`.
#[async_trait]
pub trait PromptFeed: Send + Sync {
    async fn fetch(&self, source: FeedSource) -> Result<Vec<Value>, FeedError>;
}

/// Fetches the feeds over HTTP.
#[derive(Clone)]
pub struct HttpFeedClient {
    client: Client,
    daily_url: String,
    core_url: String,
}

impl HttpFeedClient {
    pub fn new(daily_url: String, core_url: String) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(FEED_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            daily_url,
            core_url,
        })
    }

    fn url_for(&self, source: FeedSource) -> &str {
        match source {
            FeedSource::Daily => &self.daily_url,
            FeedSource::Core => &self.core_url,
        }
    }
}

#[async_trait]
impl PromptFeed for HttpFeedClient {
    async fn fetch(&self, source: FeedSource) -> Result<Vec<Value>, FeedError> {
        let url = self.url_for(source);
        let cache_buster = chrono::Utc::now().timestamp_millis().to_string();
        debug!("Fetching {} feed from {url}", source.label());

        let response = self
            .client
            .get(url)
            .query(&[("t", cache_buster)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Failed to fetch {} prompts: {}", source.label(), status);
            return Err(FeedError::Status(status.as_u16()));
        }

        let prompts: Vec<Value> = response.json().await?;
        info!("Fetched {} {} prompts", prompts.len(), source.label());
        Ok(prompts)
    }
}

/// Canned feed used by repository, session and route tests. A `None` feed
/// answers with a 503.
#[cfg(test)]
#[derive(Default, Clone)]
pub struct StaticFeed {
    pub daily: Option<Vec<RawPrompt>>,
    pub core: Option<Vec<RawPrompt>>,
}

#[cfg(test)]
#[async_trait]
impl PromptFeed for StaticFeed {
    async fn fetch(&self, source: FeedSource) -> Result<Vec<Value>, FeedError> {
        let feed = match source {
            FeedSource::Daily => &self.daily,
            FeedSource::Core => &self.core,
        };
        let entries = feed.as_ref().ok_or(FeedError::Status(503))?;
        Ok(entries
            .iter()
            .map(|entry| serde_json::to_value(entry).unwrap())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
    use serde_json::json;
    use std::collections::HashMap;

    async fn spawn_feed_server() -> String {
        let app = Router::new()
            .route(
                "/daily.json",
                get(|Query(params): Query<HashMap<String, String>>| async move {
                    // Echo whether the cache buster arrived so the test can see it.
                    let busted = params.contains_key("t");
                    Json(json!([
                        { "title": "Daily one", "prompt": "text", "author": "a", "category": busted.to_string() },
                        { "title": "Daily two", "prompt": "text", "previews": "single.png" }
                    ]))
                }),
            )
            .route(
                "/core.json",
                get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, Json(Value::Null)) }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_http_feed_fetches_with_cache_buster() {
        let base = spawn_feed_server().await;
        let client =
            HttpFeedClient::new(format!("{base}/daily.json"), format!("{base}/core.json")).unwrap();

        // The second entry is malformed but still arrives; ingestion drops it.
        let daily = client.fetch(FeedSource::Daily).await.unwrap();
        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0]["title"], "Daily one");
        assert_eq!(daily[0]["category"], "true");

        let prompts = crate::prompts::merge::ingest(daily, PromptOrigin::Daily);
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].title, "Daily one");
    }

    #[tokio::test]
    async fn test_http_feed_reports_error_status() {
        let base = spawn_feed_server().await;
        let client =
            HttpFeedClient::new(format!("{base}/daily.json"), format!("{base}/core.json")).unwrap();

        let err = client.fetch(FeedSource::Core).await.unwrap_err();
        assert!(matches!(err, FeedError::Status(500)));
    }

    #[test]
    fn test_feed_origin_mapping() {
        assert_eq!(FeedSource::Daily.origin(), PromptOrigin::Daily);
        assert_eq!(FeedSource::Core.origin(), PromptOrigin::Core);
        assert_eq!(FeedSource::Core.label(), "core");
    }
}
