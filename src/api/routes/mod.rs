//! API Routes
//!
//! Route handlers organized by functionality.

pub mod apps;
pub mod events;
pub mod health;
