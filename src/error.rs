// src/error.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("invalid backend url: {0}")]
    Url(#[from] url::ParseError),

    /// Network failure, timeout, or a body that could not be read.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered, but not with the JSON we expect.
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
}

pub type DashboardResult<T> = Result<T, DashboardError>;

impl DashboardError {
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed(_))
    }
}
