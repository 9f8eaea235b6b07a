//! Pěstitelé
//!
//! Core logic of a local-produce marketplace: finding growers near you, a
//! single-grower cart that turns into an order, a multi-grower shopping list,
//! dated stalls and the forms that feed them. Everything here is synchronous
//! and free of I/O; the app crate wires it to the backend and the device.

pub mod cart;
pub mod contact;
pub mod discovery;
pub mod favorites;
pub mod forms;
pub mod geo;
pub mod growers;
pub mod ids;
pub mod orders;
pub mod prelude;
pub mod products;
pub mod shopping_list;
pub mod stalls;
