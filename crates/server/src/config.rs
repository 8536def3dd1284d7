use std::{collections::HashMap, fmt, fs};

use crate::upstream::DEFAULT_NEWS_API_BASE_URL;

const SETTINGS_FILE: &str = "server.toml";

/// The upstream credential. Formatting never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Returns `None` for blank input so an empty variable counts as unset.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

#[derive(Debug)]
pub struct Settings {
    pub server_bind: String,
    pub news_api_key: Option<ApiKey>,
    pub news_api_base_url: String,
    pub upstream_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:3000".into(),
            news_api_key: None,
            news_api_base_url: DEFAULT_NEWS_API_BASE_URL.into(),
            upstream_timeout_secs: 10,
        }
    }
}

pub fn load_settings() -> Settings {
    let file = fs::read_to_string(SETTINGS_FILE).ok();
    settings_from_sources(file.as_deref(), |key| std::env::var(key).ok())
}

/// Defaults, then the flat `server.toml` table, then environment variables.
pub fn settings_from_sources(
    file: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file {
        match toml::from_str::<HashMap<String, String>>(raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.get("bind_addr") {
                    settings.server_bind = v.clone();
                }
                if let Some(v) = file_cfg.get("news_api_key") {
                    settings.news_api_key = ApiKey::new(v.as_str());
                }
                if let Some(v) = file_cfg.get("news_api_base_url") {
                    settings.news_api_base_url = v.clone();
                }
                if let Some(parsed) = file_cfg
                    .get("upstream_timeout_secs")
                    .and_then(|v| v.parse::<u64>().ok())
                {
                    settings.upstream_timeout_secs = parsed;
                }
            }
            Err(error) => {
                tracing::warn!(%error, file = SETTINGS_FILE, "ignoring unreadable settings file");
            }
        }
    }

    if let Some(v) = env("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = env("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = env("NEWS_API_KEY") {
        settings.news_api_key = ApiKey::new(v);
    }
    if let Some(v) = env("APP__NEWS_API_KEY") {
        settings.news_api_key = ApiKey::new(v);
    }

    if let Some(v) = env("NEWS_API_BASE_URL") {
        settings.news_api_base_url = v;
    }
    if let Some(v) = env("APP__NEWS_API_BASE_URL") {
        settings.news_api_base_url = v;
    }

    if let Some(parsed) = env("APP__UPSTREAM_TIMEOUT_SECS").and_then(|v| v.parse::<u64>().ok()) {
        settings.upstream_timeout_secs = parsed;
    }

    settings
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
