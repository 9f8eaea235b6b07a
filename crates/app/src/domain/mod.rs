//! Pěstitelé domain services

pub mod auth;
pub mod checkout;
pub mod contact;
pub mod discovery;
pub mod favorites;
pub mod orders;
pub mod products;
pub mod stalls;
