//! Navigation Component
//!
//! Header bar with the back and refresh buttons, shown only on the events view.

use leptos::*;

/// Navigation header component
#[component]
pub fn Nav(
    #[prop(into)] visible: Signal<bool>,
    on_back: Callback<()>,
    on_refresh: Callback<()>,
) -> impl IntoView {
    view! {
        <nav class="navbar is-light" role="navigation" aria-label="main navigation">
            <div class="navbar-brand">
                <span class="navbar-item has-text-weight-bold">"Audit Log"</span>
            </div>

            <div class="navbar-end">
                <div class="navbar-item buttons">
                    <button
                        id="navbar-back"
                        type="button"
                        class="button"
                        class:is-hidden=move || !visible.get()
                        on:click=move |_| on_back.call(())
                    >
                        "Back"
                    </button>
                    <button
                        id="navbar-refresh"
                        type="button"
                        class="button is-info"
                        class:is-hidden=move || !visible.get()
                        on:click=move |_| on_refresh.call(())
                    >
                        "Refresh"
                    </button>
                </div>
            </div>
        </nav>
    }
}
