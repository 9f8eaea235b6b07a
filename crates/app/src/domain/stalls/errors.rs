//! Stalls service errors.

use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum StallsServiceError {
    #[error("stall not found")]
    NotFound,

    #[error("storage error")]
    Store(#[source] StoreError),
}

impl From<StoreError> for StallsServiceError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound => Self::NotFound,
            other => Self::Store(other),
        }
    }
}
