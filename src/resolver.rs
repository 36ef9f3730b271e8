//! Media resolver adapter
//!
//! Translates an Instagram page URL into the direct media URLs behind it by
//! calling an external resolver service. All transport and protocol failures
//! are mapped at this seam into the closed [`ResolverError`] set consumed by
//! the error classifier.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Failure kinds a resolution or dispatch attempt can end in.
///
/// The order of the variants mirrors the order in which user-facing messages
/// are matched; see [`crate::bot::messages`].
#[derive(Debug, Error)]
pub enum ResolverError {
    /// The resolver answered 429
    #[error("resolver rate limited the request")]
    RateLimited,
    /// The resolver answered 404; link invalid or content removed
    #[error("content not found")]
    NotFound,
    /// The transport timed out or the connection was aborted
    #[error("request timed out")]
    Timeout,
    /// The resolver answered 500
    #[error("resolver internal error")]
    UpstreamError,
    /// Anything that does not fit the classified kinds
    #[error("unclassified failure: {0}")]
    Unclassified(String),
}

/// Resolves a media page URL to an ordered list of direct media URLs.
#[async_trait]
pub trait MediaResolver: Send + Sync {
    /// Resolve `link` into direct URLs, preserving the order the service
    /// returns them in.
    async fn resolve(&self, link: &str) -> Result<Vec<String>, ResolverError>;
}

/// Response shape of the resolver service
#[derive(Debug, Deserialize)]
struct ResolveResponse {
    url_list: Vec<String>,
}

/// [`MediaResolver`] backed by an HTTP resolver service.
pub struct HttpMediaResolver {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpMediaResolver {
    /// Create a resolver talking to the service at `endpoint`.
    #[must_use]
    pub fn new(endpoint: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }

    fn map_status(status: StatusCode) -> ResolverError {
        match status {
            StatusCode::TOO_MANY_REQUESTS => ResolverError::RateLimited,
            StatusCode::NOT_FOUND => ResolverError::NotFound,
            StatusCode::INTERNAL_SERVER_ERROR => ResolverError::UpstreamError,
            other => ResolverError::Unclassified(format!("resolver answered {other}")),
        }
    }
}

impl From<reqwest::Error> for ResolverError {
    fn from(err: reqwest::Error) -> Self {
        (&err).into()
    }
}

impl From<&reqwest::Error> for ResolverError {
    fn from(err: &reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            return Self::Timeout;
        }
        match err.status() {
            Some(status) => HttpMediaResolver::map_status(status),
            None => Self::Unclassified(err.to_string()),
        }
    }
}

#[async_trait]
impl MediaResolver for HttpMediaResolver {
    async fn resolve(&self, link: &str) -> Result<Vec<String>, ResolverError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("url", link)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::map_status(status));
        }

        let body: ResolveResponse = response
            .json()
            .await
            .map_err(|e| ResolverError::Unclassified(format!("malformed resolver body: {e}")))?;

        debug!(count = body.url_list.len(), "resolved media urls");
        Ok(body.url_list)
    }
}
