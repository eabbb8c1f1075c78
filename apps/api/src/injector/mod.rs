//! Prompt insertion: hands a prompt's text to whatever input field the user
//! is working in. The service never touches that field itself; a relay on
//! the user's side receives the text and pastes it.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

const RELAY_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum InsertError {
    /// Nothing is able to receive the text right now.
    #[error("no insertion target available")]
    NoTarget,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("relay returned status {0}")]
    Status(u16),
}

#[async_trait]
pub trait PromptInserter: Send + Sync {
    async fn insert(&self, scope: Uuid, text: &str) -> Result<(), InsertError>;
}

#[derive(Debug, Serialize)]
struct RelayRequest<'a> {
    user_id: Uuid,
    text: &'a str,
}

/// Posts `{user_id, text}` to a relay. Without a relay URL every insert
/// reports `NoTarget`.
#[derive(Clone)]
pub struct RelayInserter {
    client: Client,
    url: Option<String>,
}

impl RelayInserter {
    pub fn new(url: Option<String>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(RELAY_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl PromptInserter for RelayInserter {
    async fn insert(&self, scope: Uuid, text: &str) -> Result<(), InsertError> {
        let Some(url) = self.url.as_deref() else {
            debug!("No insert relay configured");
            return Err(InsertError::NoTarget);
        };

        let response = self
            .client
            .post(url)
            .json(&RelayRequest {
                user_id: scope,
                text,
            })
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                info!("Inserted prompt for {scope} ({} chars)", text.chars().count());
                Ok(())
            }
            // The relay is up but has no focused field to paste into.
            StatusCode::NOT_FOUND | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
                Err(InsertError::NoTarget)
            }
            status => {
                warn!("Insert relay returned {status}");
                Err(InsertError::Status(status.as_u16()))
            }
        }
    }
}

/// Records every inserted text. Used by route tests.
#[cfg(test)]
#[derive(Default, Clone)]
pub struct RecordingInserter {
    pub inserted: std::sync::Arc<std::sync::Mutex<Vec<String>>>,
    pub no_target: bool,
}

#[cfg(test)]
#[async_trait]
impl PromptInserter for RecordingInserter {
    async fn insert(&self, _scope: Uuid, text: &str) -> Result<(), InsertError> {
        if self.no_target {
            return Err(InsertError::NoTarget);
        }
        self.inserted.lock().unwrap().push(text.to_string());
        Ok(())
    }
}
