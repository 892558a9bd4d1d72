//! Events View
//!
//! The active application's events as a list of collapsible cards.

use leptos::*;

use crate::state::{use_controller, EventRecord, Expansion};

#[component]
pub fn EventsView() -> impl IntoView {
    let portal = use_controller().portal();

    let app_name = create_memo(move |_| portal.with(|p| p.app_name().unwrap_or_default().to_string()));
    let notice = create_memo(move |_| portal.with(|p| p.notice().map(str::to_string)));

    // Keyed on the render generation so a refresh rebuilds the cards even
    // when the server returns the same events
    let rendered = create_memo(move |_| {
        portal.with(|p| (p.render_generation(), p.events().to_vec()))
    });
    let events = Signal::derive(move || rendered.get().1);

    view! {
        <section id="events-view" class="section">
            <div class="container">
                <h2 class="title is-4">
                    "Events for "
                    <span id="events-app-name">{app_name}</span>
                </h2>
                {move || notice.get().map(|text| view! {
                    <div class="notification is-warning is-light">{text}</div>
                })}
                <EventList events=events />
            </div>
        </section>
    }
}

/// One card per event, in the order given
#[component]
pub fn EventList(#[prop(into)] events: Signal<Vec<EventRecord>>) -> impl IntoView {
    view! {
        <div id="events-list">
            {move || {
                let events = events.get();
                if events.is_empty() {
                    view! { <p class="has-text-grey">"No events found."</p> }.into_view()
                } else {
                    events
                        .into_iter()
                        .map(|event| view! { <EventCard event=event /> })
                        .collect_view()
                }
            }}
        </div>
    }
}

/// Summary header plus collapsible JSON body. The toggle button sits inside
/// the header, so its click reaches the header's handler and flips once.
#[component]
fn EventCard(event: EventRecord) -> impl IntoView {
    let (expansion, set_expansion) = create_signal(Expansion::default());

    let id = event.id_text();
    let timestamp = event.timestamp_text();
    let event_type = event.type_text();
    let details = event.pretty_json();

    view! {
        <div class="card mb-3 event-item">
            <header
                class="card-header event-summary is-clickable"
                on:click=move |_| set_expansion.update(|e| *e = e.toggled())
            >
                <span class="card-header-title">
                    <b>"ID:"</b>" "<span class="event-id">{id}</span>" "
                    <b>"Timestamp:"</b>" "<span class="event-timestamp">{timestamp}</span>" "
                    <b>"Type:"</b>" "<span class="event-type">{event_type}</span>
                </span>
                <button
                    type="button"
                    class="button is-small is-link is-light event-toggle m-2"
                    aria-label="Expand/collapse event"
                    aria-expanded=move || expansion.get().is_expanded().to_string()
                >
                    {move || expansion.get().arrow()}
                </button>
            </header>
            <div
                class="card-content event-details has-background-light"
                style:display=move || (!expansion.get().is_expanded()).then_some("none")
            >
                <pre>{details}</pre>
            </div>
        </div>
    }
}
