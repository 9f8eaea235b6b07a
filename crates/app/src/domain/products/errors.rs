//! Products service errors.

use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ProductsServiceError {
    #[error("product not found")]
    NotFound,

    #[error("product already exists")]
    AlreadyExists,

    #[error("unsupported photo type: {0}")]
    UnsupportedPhoto(String),

    #[error("storage error")]
    Store(#[source] StoreError),
}

impl From<StoreError> for ProductsServiceError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound => Self::NotFound,
            StoreError::UniqueViolation => Self::AlreadyExists,
            other => Self::Store(other),
        }
    }
}
