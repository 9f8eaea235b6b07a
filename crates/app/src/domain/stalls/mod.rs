//! Stalls

pub mod errors;
pub mod service;

pub use errors::StallsServiceError;
pub use service::*;
