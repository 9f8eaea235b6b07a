//! Data store errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Transport failure talking to the backend.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("unexpected response from store: {0}")]
    UnexpectedResponse(String),

    /// A unique constraint rejected the write.
    #[error("row already exists")]
    UniqueViolation,

    /// No row matched.
    #[error("row not found")]
    NotFound,

    /// A row did not have the expected shape.
    #[error("invalid row: {0}")]
    Decode(#[from] serde_json::Error),
}
