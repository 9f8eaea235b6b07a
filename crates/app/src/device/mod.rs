//! Device services
//!
//! Location, a small persisted string map and the OS launchers for calls,
//! texts and navigation.

mod launcher;
mod location;
mod storage;

pub use launcher::*;
pub use location::*;
pub use storage::*;
