//! Audit Log Front End
//!
//! Browser front end for the audit-log service, built with Leptos (WASM).
//!
//! # Features
//!
//! - Register an application and copy its bearer token
//! - Log in with a token and browse that application's events
//! - Expand any event card to see the full record as JSON
//!
//! # Architecture
//!
//! [`state::Portal`] holds the page state as plain data and is tested
//! natively. [`state::Controller`] wraps it in a signal and runs requests
//! through an [`api::AuditApi`]; the components only read the signal and
//! call the controller.

use leptos::*;

pub mod api;
pub mod app;
pub mod clipboard;
pub mod components;
pub mod state;

/// Mount the app to the document body
pub fn mount() {
    mount_to_body(|| view! { <app::App /> });
}
