//! Calling, texting and navigating

pub mod errors;
pub mod service;

pub use errors::ContactServiceError;
pub use service::*;
