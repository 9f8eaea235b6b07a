//! Grower discovery

pub mod service;

pub use service::*;
