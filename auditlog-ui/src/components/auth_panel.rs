//! Auth Panel
//!
//! Registration and login forms side by side.

use leptos::*;

use crate::clipboard;
use crate::state::{use_controller, RegisterStatus};

#[component]
pub fn AuthPanel() -> impl IntoView {
    view! {
        <section id="auth-view" class="section">
            <div class="container">
                <div class="columns">
                    <div class="column">
                        <RegisterForm />
                    </div>
                    <div class="column">
                        <LoginForm />
                    </div>
                </div>
            </div>
        </section>
    }
}

/// Register a new application and show its token
#[component]
fn RegisterForm() -> impl IntoView {
    let controller = use_controller();
    let portal = controller.portal();

    let status = create_memo(move |_| portal.with(|p| p.register_status().clone()));

    let input_controller = controller.clone();
    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        controller.register();
    };

    view! {
        <form class="box" on:submit=on_submit>
            <h2 class="title is-5">"Register application"</h2>
            <div class="field">
                <label class="label" for="app-name-input">"Application name"</label>
                <div class="control">
                    <input
                        id="app-name-input"
                        class="input"
                        type="text"
                        placeholder="my-service"
                        prop:value=move || portal.with(|p| p.name_input().to_string())
                        on:input=move |ev| input_controller.set_name_input(event_target_value(&ev))
                    />
                </div>
            </div>
            <button id="register-btn" type="submit" class="button is-primary">
                "Register"
            </button>
            <div id="register-result" class="mt-3">
                {move || match status.get() {
                    RegisterStatus::Idle => ().into_view(),
                    RegisterStatus::Message(message) => {
                        view! { <p class="help is-size-6">{message}</p> }.into_view()
                    }
                    RegisterStatus::Issued { token } => view! { <IssuedToken token=token /> }.into_view(),
                }}
            </div>
        </form>
    }
}

/// Freshly issued token with a copy button
#[component]
fn IssuedToken(token: String) -> impl IntoView {
    let (copied, set_copied) = create_signal(false);

    let copy_source = token.clone();
    let on_copy = move |_: web_sys::MouseEvent| {
        let token = copy_source.clone();
        spawn_local(async move {
            match clipboard::write_text(&token).await {
                Ok(()) => set_copied.set(true),
                Err(e) => web_sys::console::error_1(&e.into()),
            }
        });
    };

    view! {
        <div class="notification is-success is-light">
            <p class="mb-2">"Registered. Your token:"</p>
            <code id="jwt-token" style="word-break: break-all">{token}</code>
            <button id="copy-jwt" type="button" class="button is-small ml-2" on:click=on_copy>
                {move || if copied.get() { "Copied" } else { "Copy" }}
            </button>
        </div>
    }
}

/// Log in with an existing token
#[component]
fn LoginForm() -> impl IntoView {
    let controller = use_controller();
    let portal = controller.portal();

    let message = create_memo(move |_| portal.with(|p| p.login_message().map(str::to_string)));

    let input_controller = controller.clone();
    let paste_controller = controller.clone();
    let on_paste = move |_: web_sys::MouseEvent| {
        let controller = paste_controller.clone();
        spawn_local(async move {
            match clipboard::read_text().await {
                Ok(text) => controller.set_token_input(text.trim().to_string()),
                Err(e) => web_sys::console::error_1(&e.into()),
            }
        });
    };
    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        controller.login();
    };

    view! {
        <form class="box" on:submit=on_submit>
            <h2 class="title is-5">"Log in with a token"</h2>
            <div class="field has-addons">
                <div class="control is-expanded">
                    <input
                        id="auth-token-input"
                        class="input"
                        type="text"
                        placeholder="Bearer token"
                        prop:value=move || portal.with(|p| p.token_input().to_string())
                        on:input=move |ev| input_controller.set_token_input(event_target_value(&ev))
                    />
                </div>
                <div class="control">
                    <button id="paste-token" type="button" class="button" on:click=on_paste>
                        "Paste"
                    </button>
                </div>
            </div>
            <button id="login-btn" type="submit" class="button is-link">
                "Login"
            </button>
            <div id="login-result" class="mt-3">
                {move || message.get().map(|text| view! { <p class="help is-size-6">{text}</p> })}
            </div>
        </form>
    }
}
