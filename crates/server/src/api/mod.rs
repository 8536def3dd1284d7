use axum::body::Bytes;
use shared::{
    domain::SortKey,
    error::{ErrorEnvelope, API_KEY_NOT_CONFIGURED},
    protocol::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE, DEFAULT_PROXY_QUERY},
};
use thiserror::Error;

use crate::{
    config::ApiKey,
    upstream::{NewsApiClient, UpstreamError, UpstreamQuery},
};

#[derive(Clone)]
pub struct ApiContext {
    pub upstream: NewsApiClient,
    pub api_key: Option<ApiKey>,
}

/// Raw query string of `GET /api/news`. Values stay strings so they can be
/// forwarded exactly as received.
#[derive(Debug, Default)]
pub struct NewsParams {
    pub q: Option<String>,
    pub page: Option<String>,
    pub sort_by: Option<String>,
    pub page_size: Option<String>,
}

impl NewsParams {
    /// Builds params from decoded query pairs. A repeated key keeps its first
    /// value; unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "q" => &mut params.q,
                "page" => &mut params.page,
                "sortBy" => &mut params.sort_by,
                "pageSize" => &mut params.page_size,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }

    pub fn into_upstream_query(self) -> UpstreamQuery {
        UpstreamQuery {
            query: non_empty_or(self.q, DEFAULT_PROXY_QUERY),
            page: non_empty_or(self.page, &DEFAULT_PAGE.to_string()),
            sort_by: non_empty_or(self.sort_by, SortKey::default().as_str()),
            page_size: non_empty_or(self.page_size, &DEFAULT_PAGE_SIZE.to_string()),
        }
    }
}

fn non_empty_or(value: Option<String>, fallback: &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("news api key is not configured")]
    MissingApiKey,
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl ProxyError {
    pub fn envelope(&self) -> ErrorEnvelope {
        match self {
            Self::MissingApiKey => ErrorEnvelope::new(API_KEY_NOT_CONFIGURED),
            Self::Upstream(err) => ErrorEnvelope::new(err.public_message()),
        }
    }
}

/// Forwards one search to the upstream API and returns its body untouched.
pub async fn proxy_news(ctx: &ApiContext, params: NewsParams) -> Result<Bytes, ProxyError> {
    let api_key = ctx.api_key.as_ref().ok_or(ProxyError::MissingApiKey)?;
    let query = params.into_upstream_query();
    Ok(ctx.upstream.everything(api_key, &query).await?)
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
