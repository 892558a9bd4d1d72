//! Portal Controller
//!
//! Reactive wrapper around [`Portal`]: holds it in a signal, performs the
//! requests its `begin_*` calls hand out, and feeds the responses back.

use leptos::*;
use std::rc::Rc;

use super::portal::{LoadOutcome, LoadRequest, Portal};
use crate::api::AuditApi;

#[derive(Clone)]
pub struct Controller {
    portal: RwSignal<Portal>,
    api: Rc<dyn AuditApi>,
}

impl Controller {
    pub fn new(api: Rc<dyn AuditApi>) -> Self {
        Self {
            portal: create_rw_signal(Portal::new()),
            api,
        }
    }

    pub fn portal(&self) -> RwSignal<Portal> {
        self.portal
    }

    pub fn set_name_input(&self, value: String) {
        self.portal.update(|p| p.set_name_input(value));
    }

    pub fn set_token_input(&self, value: String) {
        self.portal.update(|p| p.set_token_input(value));
    }

    /// Register the application named in the name field
    pub fn register(&self) {
        let Some(request) = self.portal.try_update(|p| p.begin_register()).flatten() else {
            return;
        };

        let api = Rc::clone(&self.api);
        let portal = self.portal;
        spawn_local(async move {
            let result = api.register_app(&request.name).await;
            match &result {
                Ok(_) => web_sys::console::log_1(
                    &format!("Registered application '{}'", request.name).into(),
                ),
                Err(e) => web_sys::console::error_1(
                    &format!("Failed to register '{}': {:?}", request.name, e).into(),
                ),
            }
            portal.try_update(|p| p.finish_register(result));
        });
    }

    /// Load events for the token in the login form
    pub fn login(&self) {
        if let Some(request) = self.portal.try_update(|p| p.begin_login()).flatten() {
            self.load(request);
        }
    }

    /// Reload the active application's events
    pub fn refresh(&self) {
        if let Some(request) = self.portal.try_update(|p| p.begin_refresh()).flatten() {
            self.load(request);
        }
    }

    pub fn show_auth(&self) {
        self.portal.update(|p| p.show_auth());
    }

    fn load(&self, request: LoadRequest) {
        let api = Rc::clone(&self.api);
        let portal = self.portal;
        spawn_local(async move {
            let result = api.fetch_events(&request.token).await;
            if let Err(e) = &result {
                web_sys::console::error_1(&format!("Failed to fetch events: {:?}", e).into());
            }

            let outcome = portal.try_update(|p| p.finish_load(&request, result));
            if outcome == Some(LoadOutcome::Stale) {
                web_sys::console::log_1(
                    &format!("Discarded stale event load #{}", request.seq).into(),
                );
            }
        });
    }
}

/// Make a [`Controller`] available to every component below this one
pub fn provide_controller(api: Rc<dyn AuditApi>) -> Controller {
    let controller = Controller::new(api);
    provide_context(controller.clone());
    controller
}

pub fn use_controller() -> Controller {
    use_context::<Controller>().expect("Controller not provided")
}
