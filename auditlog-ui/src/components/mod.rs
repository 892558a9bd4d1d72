//! UI Components
//!
//! Leptos components for the auth and events views.

pub mod auth_panel;
pub mod events_view;
pub mod nav;

pub use auth_panel::AuthPanel;
pub use events_view::{EventList, EventsView};
pub use nav::Nav;
