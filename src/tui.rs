//! Terminal interface
//!
//! `App` is the root view dispatcher: it reads the latest session snapshot,
//! mounts the one screen `View::of` selects, and forwards screen outcomes to
//! the session runtime.

mod layout;
pub mod screens;
mod widgets;

use crate::runtime::{DispatchError, SessionHandle};
use crate::state_machine::{Event, SessionState, View};
use crossterm::event::{
    Event as TermEvent, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
};
use futures::StreamExt;
use layout::{render_footer, render_header, AppLayout, PRODUCT_NAME};
use ratatui::{backend::Backend, backend::CrosstermBackend, Frame, Terminal};
use screens::{
    ModeSelectorScreen, Outcome, StoryChatScreen, StoryCreatorScreen, TutorChatScreen,
    TutorCreatorScreen,
};
use std::io::{self, Stdout};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

const SPINNER_UPDATE_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Error)]
pub enum TuiError {
    #[error("Terminal I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("Session runtime stopped unexpectedly")]
    SessionStopped,
}

/// Root of the interface: one screen per `View`, chosen on every draw
pub struct App {
    handle: SessionHandle,
    mode_selector: ModeSelectorScreen,
    story_creator: StoryCreatorScreen,
    story_chat: StoryChatScreen,
    tutor_creator: TutorCreatorScreen,
    tutor_chat: TutorChatScreen,
    last_view: Option<View>,
    tick: usize,
    should_quit: bool,
}

impl App {
    pub fn new(handle: SessionHandle) -> Self {
        Self {
            handle,
            mode_selector: ModeSelectorScreen::new(),
            story_creator: StoryCreatorScreen::new(),
            story_chat: StoryChatScreen::new(),
            tutor_creator: TutorCreatorScreen::new(),
            tutor_chat: TutorChatScreen::new(),
            last_view: None,
            tick: 0,
            should_quit: false,
        }
    }

    pub fn state(&self) -> SessionState {
        self.handle.state()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Advance the spinner. Returns true when a redraw is needed.
    pub fn on_tick(&mut self) -> bool {
        if self.handle.state().is_generating {
            self.tick = self.tick.wrapping_add(1);
            true
        } else {
            false
        }
    }

    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<(), TuiError> {
        let state = self.handle.state();
        let view = state.view();

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => {
                    info!("Quit requested");
                    self.should_quit = true;
                    return Ok(());
                }
                KeyCode::Char('e') => {
                    return self.dispatch_quietly(vec![Event::ClearError]).await;
                }
                _ => {}
            }
        }
        if key.code == KeyCode::Esc && view != View::ModeSelector {
            return self.dispatch_quietly(vec![Event::ShowModeSelector]).await;
        }

        let outcome = match view {
            View::ModeSelector => self.mode_selector.handle_key(key, &state),
            View::StoryCreator => self.story_creator.handle_key(key, &state),
            View::StoryChat => self.story_chat.handle_key(key, &state),
            View::TutorCreator => self.tutor_creator.handle_key(key, &state),
            View::TutorChat => self.tutor_chat.handle_key(key, &state),
        };

        let events = match outcome {
            Outcome::Ignored | Outcome::Handled => return Ok(()),
            Outcome::Dispatch(events) => return self.dispatch_quietly(events).await,
            Outcome::Submit(events) => events,
        };
        let result = self.dispatch_all(events).await;
        if result == Err(DispatchError::Stopped) {
            return Err(TuiError::SessionStopped);
        }
        match view {
            View::ModeSelector => {}
            View::StoryCreator => self.story_creator.submitted(&result),
            View::StoryChat => self.story_chat.submitted(&result),
            View::TutorCreator => self.tutor_creator.submitted(&result),
            View::TutorChat => self.tutor_chat.submitted(&result),
        }
        Ok(())
    }

    async fn dispatch_all(&self, events: Vec<Event>) -> Result<(), DispatchError> {
        for event in events {
            let name = event.name();
            if let Err(e) = self.handle.dispatch(event).await {
                debug!(event = name, error = %e, "Screen action rejected");
                return Err(e);
            }
        }
        Ok(())
    }

    /// Dispatch settings and navigation whose rejection needs no feedback
    async fn dispatch_quietly(&self, events: Vec<Event>) -> Result<(), TuiError> {
        match self.dispatch_all(events).await {
            Err(DispatchError::Stopped) => Err(TuiError::SessionStopped),
            _ => Ok(()),
        }
    }

    pub fn draw(&mut self, frame: &mut Frame) {
        let state = self.handle.state();
        let view = state.view();
        if self.last_view != Some(view) {
            debug!(?view, "Switching screen");
            if view == View::ModeSelector {
                self.mode_selector.sync(&state);
            }
            self.last_view = Some(view);
        }

        let layout = AppLayout::compute(frame.area());
        render_header(frame, layout.header, &state);

        let hints = match view {
            View::ModeSelector => {
                self.mode_selector.render(frame, layout.body);
                self.mode_selector.key_hints(&state)
            }
            View::StoryCreator => {
                self.story_creator.render(frame, layout.body, &state, self.tick);
                self.story_creator.key_hints()
            }
            View::StoryChat => {
                self.story_chat.render(frame, layout.body, &state, self.tick);
                self.story_chat.key_hints(&state)
            }
            View::TutorCreator => {
                self.tutor_creator.render(frame, layout.body, &state, self.tick);
                self.tutor_creator.key_hints()
            }
            View::TutorChat => {
                self.tutor_chat.render(frame, layout.body, &state, self.tick);
                self.tutor_chat.key_hints()
            }
        };
        render_footer(frame, layout.footer, &state, hints, self.tick);
    }

    /// Event loop: redraw on key presses, session changes and spinner ticks
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), TuiError> {
        info!("Starting TUI");
        let mut term_events = EventStream::new();
        let mut state_rx = self.handle.subscribe();
        let mut tick = tokio::time::interval(SPINNER_UPDATE_INTERVAL);
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut needs_redraw = true;

        while !self.should_quit {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
                needs_redraw = false;
            }

            tokio::select! {
                maybe_event = term_events.next() => match maybe_event {
                    Some(Ok(TermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                        self.handle_key(key).await?;
                        needs_redraw = true;
                    }
                    Some(Ok(TermEvent::Resize(..))) => needs_redraw = true,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => break,
                },
                changed = state_rx.changed() => {
                    if changed.is_err() {
                        return Err(TuiError::SessionStopped);
                    }
                    needs_redraw = true;
                }
                _ = tick.tick() => {
                    needs_redraw |= self.on_tick();
                }
            }
        }

        info!("TUI stopped");
        Ok(())
    }
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, SetTitle(PRODUCT_NAME))?;
    Terminal::new(CrosstermBackend::new(stdout))
}

/// Put the terminal back the way we found it
pub fn cleanup_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

/// Restore the terminal before the panic message prints
pub fn setup_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        cleanup_terminal();
        default_hook(panic_info);
    }));
}

/// Take over the terminal and run until the user quits
pub async fn run_tui(handle: SessionHandle) -> Result<(), TuiError> {
    let mut terminal = setup_terminal()?;
    let result = App::new(handle).run(&mut terminal).await;
    cleanup_terminal();
    terminal.show_cursor()?;
    result
}
