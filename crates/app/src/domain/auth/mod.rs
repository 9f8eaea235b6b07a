//! Grower authentication

pub mod errors;
pub mod pin;
pub mod service;
pub mod sms;

pub use errors::AuthServiceError;
pub use service::*;
