//! App Root Component
//!
//! Creates the controller, shares it with the views, and wires the navbar.

use leptos::*;
use std::rc::Rc;

use crate::api::{api_base, HttpApi};
use crate::components::{AuthPanel, EventsView, Nav};
use crate::state::{provide_controller, View};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    let base = api_base();
    web_sys::console::log_1(&format!("Audit Log API at {}", base).into());

    let controller = provide_controller(Rc::new(HttpApi::new(base)));
    let portal = controller.portal();

    let nav_visible = Signal::derive(move || portal.with(|p| p.nav_visible()));
    let showing_events = move || portal.with(|p| p.view() == View::Events);

    let back = controller.clone();
    let on_back = Callback::new(move |_| back.show_auth());
    let on_refresh = Callback::new(move |_| controller.refresh());

    view! {
        <div class="app">
            <Nav visible=nav_visible on_back=on_back on_refresh=on_refresh />

            <main>
                <Show when=showing_events fallback=|| view! { <AuthPanel /> }>
                    <EventsView />
                </Show>
            </main>
        </div>
    }
}
