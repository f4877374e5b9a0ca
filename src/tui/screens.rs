//! Screen components
//!
//! A screen owns its local input state (text fields, focus, cursors),
//! validates what the child typed, and turns keys into session events.
//! It never mutates the session itself: `Outcome::Submit` hands the
//! child's submission to the runtime and `submitted` reports how it went;
//! `Outcome::Dispatch` carries settings and navigation that need no reply.

mod mode_selector;
mod story_chat;
mod story_creator;
mod tutor_chat;
mod tutor_creator;

pub use mode_selector::ModeSelectorScreen;
pub use story_chat::StoryChatScreen;
pub use story_creator::StoryCreatorScreen;
pub use tutor_chat::TutorChatScreen;
pub use tutor_creator::TutorCreatorScreen;

use crate::api::ContentFilter;
use crate::runtime::DispatchError;
use crate::state_machine::{Event, SessionState};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a screen made of a key press
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Not for this screen; the app may apply a global binding
    Ignored,
    /// Local state changed; redraw
    Handled,
    /// Send these events in order, stopping at the first rejection
    Dispatch(Vec<Event>),
    /// Like `Dispatch`, but the screen hears back through `submitted`
    Submit(Vec<Event>),
}

impl Outcome {
    pub fn dispatch(event: Event) -> Self {
        Outcome::Dispatch(vec![event])
    }

    pub fn submit(event: Event) -> Self {
        Outcome::Submit(vec![event])
    }
}

/// Key hints shown in the footer
pub type KeyHints = &'static [(&'static str, &'static str)];

pub(crate) fn is_ctrl(key: &KeyEvent, c: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char(c)
}

/// Message for a rejected submission, if it should be shown inline
pub(crate) fn rejection_message(result: &Result<(), DispatchError>) -> Option<String> {
    match result {
        Ok(()) | Err(DispatchError::Stopped) => None,
        Err(DispatchError::Rejected(e)) => Some(e.to_string()),
    }
}

/// Fetch again whichever catalogs are still missing, clearing the old failure
pub(crate) fn retry_catalogs(state: &SessionState, with_subjects: bool) -> Outcome {
    let mut events = Vec::new();
    if state.filters.is_none() {
        events.push(Event::LoadFilters);
    }
    if with_subjects && state.subjects.is_none() {
        events.push(Event::LoadSubjects);
    }
    if events.is_empty() {
        return Outcome::Ignored;
    }
    events.insert(0, Event::ClearError);
    Outcome::Dispatch(events)
}

/// Filters offered by the service, or the built-in set before the catalog loads
pub(crate) fn filter_options(state: &SessionState) -> Vec<ContentFilter> {
    match &state.filters {
        Some(catalog) if !catalog.available_filters.is_empty() => {
            catalog.available_filters.clone()
        }
        _ => ContentFilter::ALL.to_vec(),
    }
}

pub(crate) fn filter_description(state: &SessionState, filter: ContentFilter) -> &str {
    state
        .filters
        .as_ref()
        .and_then(|catalog| catalog.description(filter))
        .unwrap_or(match filter {
            ContentFilter::Educational => "Stories and answers that teach something new",
            ContentFilter::MoralValues => "Positive values like kindness and sharing",
            ContentFilter::FunOnly => "Pure fun and entertainment",
        })
}
