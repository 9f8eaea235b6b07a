//! Orders service errors.

use pestitele::orders::OrderError;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("order not found")]
    NotFound,

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error("storage error")]
    Store(#[source] StoreError),
}

impl From<StoreError> for OrdersServiceError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound => Self::NotFound,
            other => Self::Store(other),
        }
    }
}
