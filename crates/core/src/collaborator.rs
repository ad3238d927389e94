//! HTTP plumbing shared by the external collaborator clients (embedding
//! provider, text classifier).
//!
//! Each collaborator is a JSON-over-HTTP endpoint. Transient failures are
//! retried with exponential backoff; everything else surfaces as a
//! [`CollaboratorError`] that callers record against the affected item.

use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::config::CollaboratorConfig;
use crate::error::InsightsError;

#[derive(Debug, Clone, Error)]
pub enum CollaboratorError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("timeout")]
    Timeout,
    #[error("http {status}: {body}")]
    Http { status: u16, body: String },
    #[error("rate limited")]
    RateLimited,
    #[error("unauthorized")]
    Unauthorized,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl CollaboratorError {
    /// Returns true if the error is transient and should be retried.
    pub fn should_retry(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Timeout | Self::RateLimited => true,
            Self::Http { status, .. } => (500..=599).contains(status),
            _ => false,
        }
    }
}

impl From<CollaboratorError> for InsightsError {
    fn from(err: CollaboratorError) -> Self {
        InsightsError::Collaborator(err.to_string())
    }
}

fn map_reqwest_error(err: reqwest::Error) -> CollaboratorError {
    if err.is_timeout() {
        CollaboratorError::Timeout
    } else if err.is_decode() {
        CollaboratorError::InvalidResponse(err.to_string())
    } else {
        CollaboratorError::Transport(err.to_string())
    }
}

/// JSON POST client for one collaborator endpoint.
#[derive(Debug, Clone)]
pub struct CollaboratorClient {
    http: Client,
    endpoint: String,
    api_key: Option<String>,
    max_retries: usize,
}

impl CollaboratorClient {
    pub fn new(endpoint: impl Into<String>, config: &CollaboratorConfig) -> Result<Self, CollaboratorError> {
        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(concat!("bistro-insights/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CollaboratorError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            api_key: config.api_key.clone(),
            max_retries: config.max_retries,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST `body` and decode the JSON response, retrying transient failures.
    pub async fn post_json<Req, Resp>(&self, body: &Req) -> Result<Resp, CollaboratorError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        (|| async { self.send_once(body).await })
            .retry(
                ExponentialBuilder::default()
                    .with_min_delay(Duration::from_millis(200))
                    .with_max_delay(Duration::from_secs(5))
                    .with_max_times(self.max_retries)
                    .with_jitter(),
            )
            .when(|e: &CollaboratorError| e.should_retry())
            .notify(|e, dur| {
                warn!(
                    endpoint = %self.endpoint,
                    error = %e,
                    "Collaborator call failed, retrying after {:.2}s",
                    dur.as_secs_f64()
                )
            })
            .await
    }

    async fn send_once<Req, Resp>(&self, body: &Req) -> Result<Resp, CollaboratorError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let mut request = self.http.post(&self.endpoint).json(body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let res = request.send().await.map_err(map_reqwest_error)?;

        match res.status() {
            s if s.is_success() => res.json::<Resp>().await.map_err(map_reqwest_error),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(CollaboratorError::Unauthorized),
            StatusCode::TOO_MANY_REQUESTS => Err(CollaboratorError::RateLimited),
            s => {
                let status = s.as_u16();
                let body = res.text().await.unwrap_or_default();
                Err(CollaboratorError::Http { status, body })
            }
        }
    }
}
