//! Session runtime executor

use super::Dispatch;
use crate::api::GenerationService;
use crate::state_machine::{transition, Effect, Event, SessionState, TransitionError};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

/// Owns the session state and runs the effects its transitions produce
pub struct SessionRuntime<G>
where
    G: GenerationService + 'static,
{
    state: SessionState,
    service: Arc<G>,
    event_rx: mpsc::Receiver<Dispatch>,
    /// Weak so the loop ends once every `SessionHandle` is dropped
    event_tx: mpsc::WeakSender<Dispatch>,
    state_tx: watch::Sender<SessionState>,
}

impl<G> SessionRuntime<G>
where
    G: GenerationService + 'static,
{
    pub fn new(
        state: SessionState,
        service: G,
        event_rx: mpsc::Receiver<Dispatch>,
        event_tx: mpsc::WeakSender<Dispatch>,
        state_tx: watch::Sender<SessionState>,
    ) -> Self {
        Self {
            state,
            service: Arc::new(service),
            event_rx,
            event_tx,
            state_tx,
        }
    }

    pub async fn run(mut self) {
        tracing::info!("Starting session runtime");

        while let Some(Dispatch { event, reply }) = self.event_rx.recv().await {
            let outcome = self.process_event(event);
            if let Some(reply) = reply {
                let _ = reply.send(outcome);
            }
        }

        tracing::info!("Session runtime stopped");
    }

    fn process_event(&mut self, event: Event) -> Result<(), TransitionError> {
        let event_name = event.name();

        let result = match transition(&self.state, event) {
            Ok(r) => r,
            Err(e @ TransitionError::StaleResponse { .. }) => {
                tracing::debug!(event = event_name, error = %e, "Discarding stale response");
                return Err(e);
            }
            Err(e) => {
                tracing::debug!(event = event_name, error = %e, "Event rejected");
                return Err(e);
            }
        };

        self.state = result.new_state;
        self.state_tx.send_replace(self.state.clone());

        for effect in result.effects {
            self.spawn_effect(effect);
        }

        Ok(())
    }

    fn spawn_effect(&self, effect: Effect) {
        let Some(event_tx) = self.event_tx.upgrade() else {
            tracing::debug!(effect = effect.name(), "No handles left, skipping effect");
            return;
        };
        let service = self.service.clone();
        let request_id = uuid::Uuid::new_v4();

        tokio::spawn(async move {
            tracing::info!(%request_id, effect = effect.name(), "Running request (background)");
            let event = execute_effect(service.as_ref(), effect).await;
            tracing::debug!(%request_id, event = event.name(), "Request finished");
            if event_tx.send(Dispatch::internal(event)).await.is_err() {
                tracing::debug!(%request_id, "Runtime stopped before response arrived");
            }
        });
    }
}

/// Run one service call and turn its outcome into the event that reports it
async fn execute_effect<G>(service: &G, effect: Effect) -> Event
where
    G: GenerationService + ?Sized,
{
    match effect {
        Effect::StartStory {
            generation,
            request,
        } => match service.start_story(&request).await {
            Ok(response) => Event::StoryStarted {
                generation,
                response,
            },
            Err(error) => Event::RequestFailed { generation, error },
        },

        Effect::ContinueStory {
            generation,
            request,
        } => match service.continue_story(&request).await {
            Ok(response) => Event::StoryContinued {
                generation,
                user_input: request.user_input,
                response,
            },
            Err(error) => Event::RequestFailed { generation, error },
        },

        Effect::StartTutor {
            generation,
            request,
        } => match service.start_tutor(&request).await {
            Ok(response) => Event::TutorStarted {
                generation,
                subject: request.subject,
                question: request.initial_question,
                response,
            },
            Err(error) => Event::RequestFailed { generation, error },
        },

        Effect::AskQuestion {
            generation,
            request,
        } => match service.ask_question(&request).await {
            Ok(response) => Event::QuestionAnswered {
                generation,
                question: request.question,
                response,
            },
            Err(error) => Event::RequestFailed { generation, error },
        },

        Effect::LoadFilters => match service.list_filters().await {
            Ok(catalog) => Event::FiltersLoaded(catalog),
            Err(error) => Event::CatalogFailed(error),
        },

        Effect::LoadSubjects => match service.list_subjects().await {
            Ok(catalog) => Event::SubjectsLoaded(catalog),
            Err(error) => Event::CatalogFailed(error),
        },
    }
}
