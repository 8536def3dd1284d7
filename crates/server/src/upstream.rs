use std::time::Duration;

use axum::body::Bytes;
use reqwest::Client;
use serde::Deserialize;
use shared::error::UPSTREAM_FETCH_FAILED;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::config::ApiKey;

pub const DEFAULT_NEWS_API_BASE_URL: &str = "https://newsapi.org/v2/everything";

/// Parameters forwarded to the upstream search endpoint. Everything except
/// `query` is passed through as the raw string the caller supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamQuery {
    pub query: String,
    pub page: String,
    pub sort_by: String,
    pub page_size: String,
}

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("transport error talking to news api: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("news api answered {status}")]
    Status { status: u16, message: Option<String> },

    #[error("news api returned a malformed body: {0}")]
    InvalidBody(String),
}

impl UpstreamError {
    /// Message that is safe to hand back to the browser.
    pub fn public_message(&self) -> String {
        match self {
            Self::Status {
                message: Some(message),
                ..
            } => message.clone(),
            Self::Status {
                status,
                message: None,
            } => format!("News API request failed with status {status}"),
            Self::Transport(_) | Self::InvalidBody(_) => UPSTREAM_FETCH_FAILED.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct UpstreamErrorBody {
    message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewsApiClient {
    http: Client,
    base_url: String,
}

impl NewsApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full upstream URL including the credential. Never log the result.
    pub(crate) fn everything_url(&self, api_key: &ApiKey, query: &UpstreamQuery) -> String {
        format!(
            "{}?q={}&apiKey={}&pageSize={}&page={}&sortBy={}",
            self.base_url,
            urlencoding::encode(&query.query),
            urlencoding::encode(api_key.expose()),
            urlencoding::encode(&query.page_size),
            urlencoding::encode(&query.page),
            urlencoding::encode(&query.sort_by),
        )
    }

    /// Fetches one page from the upstream API and returns its JSON body as-is.
    pub async fn everything(
        &self,
        api_key: &ApiKey,
        query: &UpstreamQuery,
    ) -> Result<Bytes, UpstreamError> {
        debug!(
            query = %query.query,
            page = %query.page,
            sort_by = %query.sort_by,
            page_size = %query.page_size,
            "forwarding search to news api"
        );

        let response = self
            .http
            .get(self.everything_url(api_key, query))
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                error!(error = %e, timeout = e.is_timeout(), "news api request failed");
                UpstreamError::Transport(e)
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            let e = e.without_url();
            error!(error = %e, "failed to read news api body");
            UpstreamError::Transport(e)
        })?;

        if !status.is_success() {
            let message = serde_json::from_slice::<UpstreamErrorBody>(&body)
                .ok()
                .and_then(|parsed| parsed.message)
                .filter(|message| !message.trim().is_empty());
            warn!(status = status.as_u16(), ?message, "news api rejected request");
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice::<serde::de::IgnoredAny>(&body).map_err(|e| {
            error!(error = %e, "news api body is not valid json");
            UpstreamError::InvalidBody(e.to_string())
        })?;

        debug!(bytes = body.len(), "news api answered");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> NewsApiClient {
        NewsApiClient::new("https://news.test/v2/everything", Duration::from_secs(1))
            .expect("client")
    }

    #[test]
    fn everything_url_percent_encodes_query() {
        let key = ApiKey::new("k3y").expect("key");
        let url = client().everything_url(
            &key,
            &UpstreamQuery {
                query: "rust & tokio/axum".into(),
                page: "2".into(),
                sort_by: "relevancy".into(),
                page_size: "6".into(),
            },
        );
        assert_eq!(
            url,
            "https://news.test/v2/everything?q=rust%20%26%20tokio%2Faxum&apiKey=k3y&pageSize=6&page=2&sortBy=relevancy"
        );
    }

    #[test]
    fn status_error_prefers_upstream_message() {
        let err = UpstreamError::Status {
            status: 401,
            message: Some("Your API key is invalid".into()),
        };
        assert_eq!(err.public_message(), "Your API key is invalid");

        let err = UpstreamError::Status {
            status: 502,
            message: None,
        };
        assert_eq!(
            err.public_message(),
            "News API request failed with status 502"
        );
    }

    #[test]
    fn malformed_body_uses_generic_message() {
        let err = UpstreamError::InvalidBody("expected value".into());
        assert_eq!(err.public_message(), UPSTREAM_FETCH_FAILED);
    }
}
