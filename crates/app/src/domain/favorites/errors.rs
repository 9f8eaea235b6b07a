//! Favorites service errors.

use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum FavoritesServiceError {
    #[error("favorite not found")]
    NotFound,

    #[error("storage error")]
    Store(#[source] StoreError),
}

impl From<StoreError> for FavoritesServiceError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound => Self::NotFound,
            other => Self::Store(other),
        }
    }
}
