//! Checkout errors.

use pestitele::{forms::ValidationErrors, orders::OrderError};
use thiserror::Error;

use crate::{domain::favorites::FavoritesServiceError, store::StoreError};

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("checkout form is invalid")]
    Invalid(ValidationErrors),

    #[error("cart is empty")]
    EmptyCart,

    #[error("an order is already being submitted")]
    AlreadySubmitting,

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error("failed to remember favorite grower")]
    Favorite(#[from] FavoritesServiceError),

    #[error("storage error")]
    Store(#[from] StoreError),
}
