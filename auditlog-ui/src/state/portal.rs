//! Portal State
//!
//! Everything the page shows, as plain data. Each user action is split in
//! two: a `begin_*` call that validates input and returns the request to
//! send (or `None` when nothing should be sent), and a `finish_*` call
//! that applies the response.
//!
//! Event loads carry a sequence number. Only the most recently started
//! load may render; a completion for any older load is dropped, and
//! returning to the auth view invalidates whatever is in flight.

use crate::api::ApiFailure;
use crate::state::EventRecord;

/// Title used when the login form's name field is blank
pub const FALLBACK_APP_NAME: &str = "Unnamed application";

pub const MSG_NAME_REQUIRED: &str = "Please enter an application name.";
pub const MSG_REGISTERING: &str = "Registering...";
pub const MSG_REGISTRATION_FAILED: &str = "Registration failed.";
pub const MSG_TOKEN_REQUIRED: &str = "Please enter an auth token.";
pub const MSG_LOADING_EVENTS: &str = "Loading events...";
pub const MSG_LOGIN_FAILED: &str = "Invalid token or failed to fetch events.";
pub const MSG_REFRESH_FAILED: &str = "Could not refresh events.";

/// Which of the two views is on screen
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Auth,
    Events,
}

/// What the registration result area shows
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum RegisterStatus {
    #[default]
    Idle,
    /// Validation, progress, or failure text
    Message(String),
    /// Registration succeeded
    Issued { token: String },
}

/// The application whose events are on screen
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveApp {
    pub name: String,
    pub token: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterRequest {
    pub name: String,
}

/// What started an event load
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadKind {
    Login,
    Refresh,
}

/// An event load to perform; hand it back to [`Portal::finish_load`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadRequest {
    pub seq: u64,
    pub token: String,
    pub app_name: String,
    pub kind: LoadKind,
}

/// What [`Portal::finish_load`] did with a completion
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Rendered,
    Failed,
    /// A newer load was started or the user went back; nothing changed
    Stale,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Portal {
    view: View,
    name_input: String,
    token_input: String,
    register_status: RegisterStatus,
    login_message: Option<String>,
    notice: Option<String>,
    active: Option<ActiveApp>,
    events: Vec<EventRecord>,
    render_generation: u64,
    latest_load: u64,
}

impl Portal {
    /// Initial state: auth view, empty forms, navigation hidden
    pub fn new() -> Self {
        Self::default()
    }

    // ============ Inputs ============

    pub fn set_name_input(&mut self, value: impl Into<String>) {
        self.name_input = value.into();
    }

    pub fn set_token_input(&mut self, value: impl Into<String>) {
        self.token_input = value.into();
    }

    // ============ Registration ============

    pub fn begin_register(&mut self) -> Option<RegisterRequest> {
        let name = self.name_input.trim();
        if name.is_empty() {
            self.register_status = RegisterStatus::Message(MSG_NAME_REQUIRED.to_string());
            return None;
        }

        let request = RegisterRequest {
            name: name.to_string(),
        };
        self.register_status = RegisterStatus::Message(MSG_REGISTERING.to_string());
        Some(request)
    }

    /// Apply a registration response. The issued token also pre-fills the
    /// login form.
    pub fn finish_register(&mut self, result: Result<String, ApiFailure>) {
        self.register_status = match result {
            Ok(token) => {
                self.token_input = token.clone();
                RegisterStatus::Issued { token }
            }
            Err(ApiFailure::Server {
                detail: Some(detail),
                ..
            }) => RegisterStatus::Message(detail),
            Err(ApiFailure::Server { detail: None, .. }) => {
                RegisterStatus::Message(MSG_REGISTRATION_FAILED.to_string())
            }
            Err(ApiFailure::Transport(description)) => {
                RegisterStatus::Message(format!("Error: {}", description))
            }
        };
    }

    // ============ Event Loads ============

    pub fn begin_login(&mut self) -> Option<LoadRequest> {
        let token = self.token_input.trim();
        if token.is_empty() {
            self.login_message = Some(MSG_TOKEN_REQUIRED.to_string());
            return None;
        }

        let token = token.to_string();
        let app_name = match self.name_input.trim() {
            "" => FALLBACK_APP_NAME.to_string(),
            name => name.to_string(),
        };

        self.login_message = Some(MSG_LOADING_EVENTS.to_string());
        Some(self.next_load(token, app_name, LoadKind::Login))
    }

    /// Reload the active application's events. Only meaningful while the
    /// events view is showing.
    pub fn begin_refresh(&mut self) -> Option<LoadRequest> {
        if self.view != View::Events {
            return None;
        }
        let active = self.active.clone()?;

        self.notice = None;
        Some(self.next_load(active.token, active.name, LoadKind::Refresh))
    }

    fn next_load(&mut self, token: String, app_name: String, kind: LoadKind) -> LoadRequest {
        self.latest_load += 1;
        LoadRequest {
            seq: self.latest_load,
            token,
            app_name,
            kind,
        }
    }

    pub fn finish_load(
        &mut self,
        request: &LoadRequest,
        result: Result<Vec<EventRecord>, ApiFailure>,
    ) -> LoadOutcome {
        if request.seq != self.latest_load {
            return LoadOutcome::Stale;
        }

        match result {
            Ok(events) => {
                self.view = View::Events;
                self.active = Some(ActiveApp {
                    name: request.app_name.clone(),
                    token: request.token.clone(),
                });
                self.events = events;
                self.render_generation += 1;
                self.login_message = None;
                self.notice = None;
                LoadOutcome::Rendered
            }
            Err(failure) => {
                match request.kind {
                    LoadKind::Login => self.login_message = Some(login_failure_text(&failure)),
                    LoadKind::Refresh => self.notice = Some(MSG_REFRESH_FAILED.to_string()),
                }
                LoadOutcome::Failed
            }
        }
    }

    // ============ Navigation ============

    /// Return to the auth view. Form contents survive; the active
    /// application and any in-flight load do not.
    pub fn show_auth(&mut self) {
        self.view = View::Auth;
        self.active = None;
        self.notice = None;
        self.latest_load += 1;
    }

    // ============ Queries ============

    pub fn view(&self) -> View {
        self.view
    }

    pub fn nav_visible(&self) -> bool {
        self.view == View::Events
    }

    pub fn name_input(&self) -> &str {
        &self.name_input
    }

    pub fn token_input(&self) -> &str {
        &self.token_input
    }

    pub fn register_status(&self) -> &RegisterStatus {
        &self.register_status
    }

    pub fn login_message(&self) -> Option<&str> {
        self.login_message.as_deref()
    }

    /// Non-blocking notice shown above the event list
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    pub fn app_name(&self) -> Option<&str> {
        self.active.as_ref().map(|app| app.name.as_str())
    }

    pub fn active(&self) -> Option<&ActiveApp> {
        self.active.as_ref()
    }

    /// Bumped on every successful render; the list is rebuilt when it changes
    pub fn render_generation(&self) -> u64 {
        self.render_generation
    }
}

fn login_failure_text(failure: &ApiFailure) -> String {
    match failure {
        ApiFailure::Server {
            detail: Some(detail),
            ..
        } => format!("Login failed: {}", detail),
        ApiFailure::Server { detail: None, .. } => MSG_LOGIN_FAILED.to_string(),
        ApiFailure::Transport(description) => format!("Error: {}", description),
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::api::AuditApi;
    use async_trait::async_trait;
    use serde_json::json;
    use std::cell::RefCell;

    fn event(value: serde_json::Value) -> EventRecord {
        serde_json::from_value(value).unwrap()
    }

    fn sample_events() -> Vec<EventRecord> {
        vec![
            event(json!({"id": 1, "timestamp": "t", "type": "A"})),
            event(json!({"id": 2, "timestamp": "u", "type": "B", "source": "svc"})),
        ]
    }

    /// Records every call and answers from canned results
    #[derive(Default)]
    struct MockApi {
        register_calls: RefCell<Vec<String>>,
        fetch_calls: RefCell<Vec<String>>,
        register_result: Option<Result<String, ApiFailure>>,
        fetch_result: Option<Result<Vec<EventRecord>, ApiFailure>>,
    }

    #[async_trait(?Send)]
    impl AuditApi for MockApi {
        async fn register_app(&self, name: &str) -> Result<String, ApiFailure> {
            self.register_calls.borrow_mut().push(name.to_string());
            self.register_result
                .clone()
                .unwrap_or_else(|| Ok("T".to_string()))
        }

        async fn fetch_events(&self, token: &str) -> Result<Vec<EventRecord>, ApiFailure> {
            self.fetch_calls.borrow_mut().push(token.to_string());
            self.fetch_result.clone().unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    async fn register(portal: &mut Portal, api: &MockApi) {
        if let Some(request) = portal.begin_register() {
            let result = api.register_app(&request.name).await;
            portal.finish_register(result);
        }
    }

    async fn login(portal: &mut Portal, api: &MockApi) -> Option<LoadOutcome> {
        let request = portal.begin_login()?;
        let result = api.fetch_events(&request.token).await;
        Some(portal.finish_load(&request, result))
    }

    async fn refresh(portal: &mut Portal, api: &MockApi) -> Option<LoadOutcome> {
        let request = portal.begin_refresh()?;
        let result = api.fetch_events(&request.token).await;
        Some(portal.finish_load(&request, result))
    }

    #[test]
    fn test_initial_state() {
        let portal = Portal::new();
        assert_eq!(portal.view(), View::Auth);
        assert!(!portal.nav_visible());
        assert_eq!(portal.register_status(), &RegisterStatus::Idle);
        assert!(portal.events().is_empty());
    }

    #[tokio::test]
    async fn test_register_blank_name_sends_nothing() {
        let api = MockApi::default();
        let mut portal = Portal::new();
        portal.set_name_input("   ");

        register(&mut portal, &api).await;

        assert!(api.register_calls.borrow().is_empty());
        assert_eq!(
            portal.register_status(),
            &RegisterStatus::Message(MSG_NAME_REQUIRED.to_string())
        );
    }

    #[test]
    fn test_register_shows_progress_and_trims() {
        let mut portal = Portal::new();
        portal.set_name_input("  billing  ");

        let request = portal.begin_register().unwrap();

        assert_eq!(request.name, "billing");
        assert_eq!(
            portal.register_status(),
            &RegisterStatus::Message(MSG_REGISTERING.to_string())
        );
    }

    #[tokio::test]
    async fn test_register_success_prefills_token() {
        let api = MockApi {
            register_result: Some(Ok("T".to_string())),
            ..Default::default()
        };
        let mut portal = Portal::new();
        portal.set_name_input("billing");

        register(&mut portal, &api).await;

        assert_eq!(api.register_calls.borrow().as_slice(), ["billing"]);
        assert_eq!(
            portal.register_status(),
            &RegisterStatus::Issued {
                token: "T".to_string()
            }
        );
        assert_eq!(portal.token_input(), "T");
    }

    #[tokio::test]
    async fn test_register_server_error_shows_detail() {
        let api = MockApi {
            register_result: Some(Err(ApiFailure::Server {
                status: 400,
                detail: Some("Name taken".to_string()),
            })),
            ..Default::default()
        };
        let mut portal = Portal::new();
        portal.set_name_input("billing");

        register(&mut portal, &api).await;

        assert_eq!(
            portal.register_status(),
            &RegisterStatus::Message("Name taken".to_string())
        );
        assert_eq!(portal.token_input(), "");
    }

    #[test]
    fn test_register_error_without_detail() {
        let mut portal = Portal::new();
        portal.set_name_input("billing");
        portal.begin_register();

        portal.finish_register(Err(ApiFailure::Server {
            status: 500,
            detail: None,
        }));

        assert_eq!(
            portal.register_status(),
            &RegisterStatus::Message(MSG_REGISTRATION_FAILED.to_string())
        );
    }

    #[test]
    fn test_register_transport_error() {
        let mut portal = Portal::new();
        portal.set_name_input("billing");
        portal.begin_register();

        portal.finish_register(Err(ApiFailure::Transport("Network error".to_string())));

        assert_eq!(
            portal.register_status(),
            &RegisterStatus::Message("Error: Network error".to_string())
        );
    }

    #[tokio::test]
    async fn test_login_blank_token_sends_nothing() {
        let api = MockApi::default();
        let mut portal = Portal::new();
        portal.set_token_input("  ");

        assert!(login(&mut portal, &api).await.is_none());
        assert!(api.fetch_calls.borrow().is_empty());
        assert_eq!(portal.login_message(), Some(MSG_TOKEN_REQUIRED));
        assert_eq!(portal.view(), View::Auth);
    }

    #[tokio::test]
    async fn test_login_success_renders_events() {
        let api = MockApi {
            fetch_result: Some(Ok(sample_events())),
            ..Default::default()
        };
        let mut portal = Portal::new();
        portal.set_name_input("billing");
        portal.set_token_input(" T ");

        let outcome = login(&mut portal, &api).await;

        assert_eq!(outcome, Some(LoadOutcome::Rendered));
        assert_eq!(api.fetch_calls.borrow().as_slice(), ["T"]);
        assert_eq!(portal.view(), View::Events);
        assert!(portal.nav_visible());
        assert_eq!(portal.app_name(), Some("billing"));
        assert_eq!(portal.events().len(), 2);
        assert_eq!(portal.login_message(), None);
        assert_eq!(portal.render_generation(), 1);
    }

    #[tokio::test]
    async fn test_login_without_name_uses_fallback_title() {
        let api = MockApi::default();
        let mut portal = Portal::new();
        portal.set_token_input("T");

        login(&mut portal, &api).await;

        assert_eq!(portal.app_name(), Some(FALLBACK_APP_NAME));
        assert!(portal.events().is_empty());
    }

    #[test]
    fn test_login_shows_loading_message() {
        let mut portal = Portal::new();
        portal.set_token_input("T");

        portal.begin_login().unwrap();

        assert_eq!(portal.login_message(), Some(MSG_LOADING_EVENTS));
    }

    #[tokio::test]
    async fn test_login_failure_stays_on_auth() {
        let api = MockApi {
            fetch_result: Some(Err(ApiFailure::Server {
                status: 401,
                detail: Some("Could not validate credentials".to_string()),
            })),
            ..Default::default()
        };
        let mut portal = Portal::new();
        portal.set_token_input("bad");

        let outcome = login(&mut portal, &api).await;

        assert_eq!(outcome, Some(LoadOutcome::Failed));
        assert_eq!(portal.view(), View::Auth);
        assert!(!portal.nav_visible());
        assert_eq!(
            portal.login_message(),
            Some("Login failed: Could not validate credentials")
        );
    }

    #[test]
    fn test_login_failure_texts() {
        let mut portal = Portal::new();
        portal.set_token_input("T");

        let request = portal.begin_login().unwrap();
        portal.finish_load(&request, Err(ApiFailure::Transport("offline".to_string())));
        assert_eq!(portal.login_message(), Some("Error: offline"));

        let request = portal.begin_login().unwrap();
        let failure = ApiFailure::Server {
            status: 403,
            detail: None,
        };
        portal.finish_load(&request, Err(failure));
        assert_eq!(portal.login_message(), Some(MSG_LOGIN_FAILED));
    }

    #[tokio::test]
    async fn test_back_returns_to_auth_and_keeps_forms() {
        let api = MockApi {
            fetch_result: Some(Ok(sample_events())),
            ..Default::default()
        };
        let mut portal = Portal::new();
        portal.set_name_input("billing");
        portal.set_token_input("T");
        login(&mut portal, &api).await;

        portal.show_auth();

        assert_eq!(portal.view(), View::Auth);
        assert!(!portal.nav_visible());
        assert_eq!(portal.active(), None);
        assert_eq!(portal.name_input(), "billing");
        assert_eq!(portal.token_input(), "T");
    }

    #[tokio::test]
    async fn test_refresh_reuses_active_token() {
        let api = MockApi {
            fetch_result: Some(Ok(sample_events())),
            ..Default::default()
        };
        let mut portal = Portal::new();
        portal.set_name_input("billing");
        portal.set_token_input("T");
        login(&mut portal, &api).await;

        // Edits to the login form do not affect the active application
        portal.set_token_input("other");
        portal.set_name_input("other-name");

        let outcome = refresh(&mut portal, &api).await;

        assert_eq!(outcome, Some(LoadOutcome::Rendered));
        assert_eq!(api.fetch_calls.borrow().as_slice(), ["T", "T"]);
        assert_eq!(portal.app_name(), Some("billing"));
        assert_eq!(portal.render_generation(), 2);
    }

    #[test]
    fn test_refresh_ignored_on_auth_view() {
        let mut portal = Portal::new();
        portal.set_token_input("T");

        assert!(portal.begin_refresh().is_none());
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_events_on_screen() {
        let mut portal = Portal::new();
        portal.set_token_input("T");
        let request = portal.begin_login().unwrap();
        portal.finish_load(&request, Ok(sample_events()));

        let api = MockApi {
            fetch_result: Some(Err(ApiFailure::Transport("offline".to_string()))),
            ..Default::default()
        };
        let outcome = refresh(&mut portal, &api).await;

        assert_eq!(outcome, Some(LoadOutcome::Failed));
        assert_eq!(portal.view(), View::Events);
        assert_eq!(portal.events().len(), 2);
        assert_eq!(portal.notice(), Some(MSG_REFRESH_FAILED));
        assert_eq!(portal.render_generation(), 1);
    }

    #[test]
    fn test_stale_load_is_discarded() {
        let mut portal = Portal::new();
        portal.set_token_input("first");
        let first = portal.begin_login().unwrap();
        portal.set_token_input("second");
        let second = portal.begin_login().unwrap();

        assert_eq!(
            portal.finish_load(&second, Ok(sample_events())),
            LoadOutcome::Rendered
        );
        assert_eq!(portal.finish_load(&first, Ok(Vec::new())), LoadOutcome::Stale);

        assert_eq!(portal.active().unwrap().token, "second");
        assert_eq!(portal.events().len(), 2);
    }

    #[test]
    fn test_back_discards_in_flight_load() {
        let mut portal = Portal::new();
        portal.set_token_input("T");
        let request = portal.begin_login().unwrap();

        portal.show_auth();

        assert_eq!(
            portal.finish_load(&request, Ok(sample_events())),
            LoadOutcome::Stale
        );
        assert_eq!(portal.view(), View::Auth);
        assert!(portal.events().is_empty());
    }
}
