//! API handlers.

pub mod credits;
pub mod health;
pub mod stats;
pub mod usage;
