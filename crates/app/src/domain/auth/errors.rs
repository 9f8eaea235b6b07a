//! Auth service errors.

use thiserror::Error;

use crate::{session::SessionError, store::StoreError};

#[derive(Debug, Error)]
pub enum AuthServiceError {
    #[error("phone number is already registered")]
    PhoneTaken,

    #[error("wrong phone number or PIN")]
    InvalidCredentials,

    #[error("grower not found")]
    NotFound,

    #[error("session error")]
    Session(#[from] SessionError),

    #[error("storage error")]
    Store(#[source] StoreError),
}

impl From<StoreError> for AuthServiceError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::UniqueViolation => Self::PhoneTaken,
            StoreError::NotFound => Self::NotFound,
            other => Self::Store(other),
        }
    }
}
