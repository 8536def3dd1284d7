use shared::error::CLIENT_FETCH_FAILED;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("could not reach news proxy: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("news proxy answered with a body that is not json: {0}")]
    InvalidBody(#[from] serde_json::Error),

    #[error("news proxy rejected the search: {0}")]
    Rejected(String),
}

impl FetchError {
    /// Text shown in place of the results.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected(message) => message.clone(),
            Self::Transport(_) | Self::InvalidBody(_) => CLIENT_FETCH_FAILED.to_string(),
        }
    }
}
