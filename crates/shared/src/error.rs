use serde::{Deserialize, Serialize};

pub const API_KEY_NOT_CONFIGURED: &str = "API key not configured.";
pub const UPSTREAM_FETCH_FAILED: &str = "Failed to fetch news.";
pub const CLIENT_FETCH_FAILED: &str = "Failed to fetch news";

/// Body of every non-2xx answer produced by the proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
}

impl ErrorEnvelope {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
