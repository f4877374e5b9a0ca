//! Session runtime
//!
//! A single task owns the `SessionState`. Screens hold a `SessionHandle`:
//! they read snapshots from a watch channel and change the state only by
//! dispatching events. Service calls run as background tasks and report
//! back as response events.

mod executor;

#[cfg(test)]
pub mod testing;

pub use executor::SessionRuntime;

use crate::api::GenerationService;
use crate::state_machine::{ConfigPatch, Event, Mode, SessionState, TransitionError, TutorSetup};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

const EVENT_CHANNEL_CAPACITY: usize = 32;

/// An event plus an optional channel for the transition outcome
#[derive(Debug)]
pub struct Dispatch {
    pub event: Event,
    pub reply: Option<oneshot::Sender<Result<(), TransitionError>>>,
}

impl Dispatch {
    /// Response events from background requests; nobody waits on them
    pub fn internal(event: Event) -> Self {
        Self { event, reply: None }
    }
}

/// Why a dispatched action did not apply
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Rejected(#[from] TransitionError),
    #[error("Session runtime has stopped")]
    Stopped,
}

/// Start a session runtime on the current tokio runtime
pub fn spawn_session<G>(service: G) -> (SessionHandle, JoinHandle<()>)
where
    G: GenerationService + 'static,
{
    let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let (state_tx, state_rx) = watch::channel(SessionState::new());

    let runtime = SessionRuntime::new(
        SessionState::new(),
        service,
        event_rx,
        event_tx.downgrade(),
        state_tx,
    );
    let task = tokio::spawn(runtime.run());

    (SessionHandle { event_tx, state_rx }, task)
}

/// Handle to interact with a running session
#[derive(Clone)]
pub struct SessionHandle {
    event_tx: mpsc::Sender<Dispatch>,
    state_rx: watch::Receiver<SessionState>,
}

impl SessionHandle {
    /// Send an event and wait until the runtime has applied or rejected it
    pub async fn dispatch(&self, event: Event) -> Result<(), DispatchError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.event_tx
            .send(Dispatch {
                event,
                reply: Some(reply_tx),
            })
            .await
            .map_err(|_| DispatchError::Stopped)?;
        reply_rx.await.map_err(|_| DispatchError::Stopped)??;
        Ok(())
    }

    /// Latest state snapshot
    pub fn state(&self) -> SessionState {
        self.state_rx.borrow().clone()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_rx.clone()
    }

    /// Wait until no generation request is outstanding
    pub async fn settled(&self) -> Result<SessionState, DispatchError> {
        let mut rx = self.state_rx.clone();
        let state = rx
            .wait_for(|state| !state.is_generating)
            .await
            .map_err(|_| DispatchError::Stopped)?;
        Ok(state.clone())
    }

    pub async fn start_story(&self, prompt: impl Into<String>) -> Result<(), DispatchError> {
        self.dispatch(Event::StartStory {
            prompt: prompt.into(),
        })
        .await
    }

    pub async fn continue_story(&self, input: impl Into<String>) -> Result<(), DispatchError> {
        self.dispatch(Event::ContinueStory {
            input: input.into(),
        })
        .await
    }

    pub async fn start_tutor(&self, setup: TutorSetup) -> Result<(), DispatchError> {
        self.dispatch(Event::StartTutor(setup)).await
    }

    pub async fn ask_question(
        &self,
        question: impl Into<String>,
        subject: Option<String>,
    ) -> Result<(), DispatchError> {
        self.dispatch(Event::AskQuestion {
            question: question.into(),
            subject,
        })
        .await
    }

    pub async fn reset_session(&self) -> Result<(), DispatchError> {
        self.dispatch(Event::ResetSession).await
    }

    pub async fn set_config(&self, patch: ConfigPatch) -> Result<(), DispatchError> {
        self.dispatch(Event::SetConfig(patch)).await
    }

    pub async fn clear_error(&self) -> Result<(), DispatchError> {
        self.dispatch(Event::ClearError).await
    }

    pub async fn show_mode_selector(&self) -> Result<(), DispatchError> {
        self.dispatch(Event::ShowModeSelector).await
    }

    pub async fn dismiss_mode_selector(&self) -> Result<(), DispatchError> {
        self.dispatch(Event::DismissModeSelector).await
    }

    pub async fn select_mode(&self, mode: Mode) -> Result<(), DispatchError> {
        self.dispatch(Event::SelectMode(mode)).await
    }

    pub async fn load_filters(&self) -> Result<(), DispatchError> {
        self.dispatch(Event::LoadFilters).await
    }

    pub async fn load_subjects(&self) -> Result<(), DispatchError> {
        self.dispatch(Event::LoadSubjects).await
    }
}
