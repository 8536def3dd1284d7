use serde::{Deserialize, Serialize};

use crate::{
    domain::{Article, SortKey},
    error::CLIENT_FETCH_FAILED,
};

pub const NEWS_ROUTE: &str = "/api/news";
pub const DEFAULT_PROXY_QUERY: &str = "latest";
pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 6;
pub const STATUS_OK: &str = "ok";

/// Query string sent from the client to the proxy endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyQuery {
    pub q: String,
    pub page: u32,
    #[serde(rename = "sortBy")]
    pub sort_by: SortKey,
    #[serde(rename = "pageSize")]
    pub page_size: u32,
}

impl Default for ProxyQuery {
    fn default() -> Self {
        Self {
            q: DEFAULT_PROXY_QUERY.to_string(),
            page: DEFAULT_PAGE,
            sort_by: SortKey::default(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Any JSON body the proxy may answer with: the relayed upstream page, the
/// proxy's `{error}` envelope, or an upstream `{status:"error", message}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_results: Option<u64>,
    #[serde(default)]
    pub articles: Option<Vec<Article>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultPage {
    pub total_results: u64,
    pub articles: Vec<Article>,
}

impl ProxyBody {
    pub fn ok(total_results: u64, articles: Vec<Article>) -> Self {
        Self {
            status: Some(STATUS_OK.to_string()),
            total_results: Some(total_results),
            articles: Some(articles),
            ..Self::default()
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status.as_deref() == Some(STATUS_OK)
    }

    /// Message to surface when this body does not describe a result page.
    pub fn failure_message(&self) -> String {
        [self.error.as_deref(), self.message.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|message| !message.is_empty())
            .unwrap_or(CLIENT_FETCH_FAILED)
            .to_string()
    }

    pub fn into_page(self) -> Result<ResultPage, String> {
        if !self.is_ok() {
            return Err(self.failure_message());
        }
        Ok(ResultPage {
            total_results: self.total_results.unwrap_or_default(),
            articles: self.articles.unwrap_or_default(),
        })
    }
}
