//! StoryBot - interactive stories and tutoring for kids in the terminal
//!
//! A session state machine drives which screen is shown; story and tutor
//! content comes from a remote generation service over HTTP.

mod api;
mod runtime;
mod state_machine;
mod tui;

use api::{ClientConfig, GenerationService, HttpGenerationService, LoggingService};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const HEALTH_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

fn log_file_path() -> PathBuf {
    std::env::var("STORYBOT_LOG_FILE").map_or_else(
        |_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(format!("{home}/.storybot/storybot.log"))
        },
        PathBuf::from,
    )
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // The terminal belongs to the UI, so logs go to a file
    let log_path = log_file_path();
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storybot=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_ansi(false)
                .with_writer(Mutex::new(log_file)),
        )
        .init();

    // Configuration
    let config = ClientConfig::from_env();
    let service = HttpGenerationService::new(&config)?;
    tracing::info!(
        base_url = %service.base_url(),
        api_key = config.api_key.is_some(),
        timeout_secs = ?config.request_timeout.map(|t| t.as_secs()),
        "Generation service configured"
    );
    let service = LoggingService::new(service);

    // An unreachable service is not fatal; requests report their own errors
    match tokio::time::timeout(HEALTH_PROBE_TIMEOUT, service.health()).await {
        Ok(Ok(health)) if health.is_healthy() => {
            tracing::info!(
                version = ?health.version,
                llm_provider = ?health.llm_provider,
                session_backend = ?health.session_backend,
                "Generation service healthy"
            );
        }
        Ok(Ok(health)) => {
            tracing::warn!(status = %health.status, "Generation service reports degraded health");
        }
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Generation service unreachable at startup");
        }
        Err(_) => {
            tracing::warn!("Generation service health probe timed out");
        }
    }

    let (handle, session_task) = runtime::spawn_session(service);

    tui::setup_panic_hook();
    let result = tui::run_tui(handle).await;

    // Requests still in flight have nobody left to report to
    session_task.abort();
    result?;
    tracing::info!("Goodbye");
    Ok(())
}
