//! Session state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;
pub mod validation;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use state::{ConfigPatch, Mode, SessionState, TutorSetup, View};
pub use transition::{transition, TransitionError};
pub use validation::ValidationError;
