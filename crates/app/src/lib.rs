//! Pěstitelé app services
//!
//! Backend access, device capabilities and the services the screens call.

pub mod config;
pub mod context;
pub mod device;
pub mod domain;
pub mod observability;
pub mod session;
pub mod store;
