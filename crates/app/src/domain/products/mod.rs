//! Products

pub mod errors;
pub mod photos;
pub mod service;

pub use errors::ProductsServiceError;
pub use photos::Photo;
pub use service::*;
