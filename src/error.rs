use thiserror::Error;

/// Why a page fetch failed.
///
/// A superseded request is not represented here: its task is aborted and any
/// late result is dropped by token in [`crate::feed::FeedState`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The endpoint answered with a non-success status.
    #[error("API error: {0}")]
    Status(u16),
    /// The request never produced a response (DNS, connect, reset, ...).
    #[error("network error: {0}")]
    Transport(String),
    /// The body was not a JSON array of items.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::Status(status.as_u16()),
            None => Self::Transport(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}
