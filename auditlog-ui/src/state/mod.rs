//! State Management
//!
//! [`Portal`] is the page state as plain data; [`Controller`] puts it in a
//! signal and connects it to the API.

pub mod controller;
pub mod event;
pub mod portal;

pub use controller::{provide_controller, use_controller, Controller};
pub use event::{EventRecord, Expansion};
pub use portal::{Portal, RegisterStatus, View};
