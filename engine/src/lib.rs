//! Core engine for Anora - animation sequencing and waitlist form orchestration.
//!
//! This crate turns the pure types of `anora-types` into a running application
//! without any terminal dependencies: the intro animation plays on a tokio task,
//! form timers fire from [`App::tick`], and the one signup per cycle is handed to a
//! [`WaitlistBackend`] on its own task.

mod animation;
mod app;
mod sequencer;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

pub use animation::AnimationTask;
pub use app::{App, CURSOR_BLINK_INTERVAL, ClickTarget};
pub use sequencer::{FixedJitter, Jitter, Sequencer, ThreadJitter};

pub use anora_config::{AnoraConfig, EndpointSource, ResolvedEndpoint};
pub use anora_types::{
    AnimationConfig, CursorState, DraftInput, EditOp, Field, FormState, FormStep, FormTimings,
    IntroFade, Region, SequenceStep, SuccessPhase, TerminalView, UiOptions, Visibility,
    WaitlistForm,
};
pub use anora_waitlist::{
    ConsoleWaitlist, ConvexClient, MemoryWaitlist, WaitlistBackend, WaitlistError,
};

/// Everything the engine takes from configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppSettings {
    pub ui: UiOptions,
    pub animation: AnimationConfig,
    pub form: FormTimings,
}

impl AppSettings {
    #[must_use]
    pub fn from_config(config: Option<&AnoraConfig>) -> Self {
        match config {
            Some(config) => Self {
                ui: config.ui_options(),
                animation: config.animation_config(),
                form: config.form_timings(),
            },
            None => Self::default(),
        }
    }
}

/// Pick the collaborator for a resolved endpoint.
///
/// An unset endpoint yields [`ConsoleWaitlist`], which only logs signups.
pub fn select_backend(
    endpoint: &ResolvedEndpoint,
    timeout: Option<Duration>,
) -> anyhow::Result<Arc<dyn WaitlistBackend>> {
    if !endpoint.is_configured() {
        tracing::info!("No waitlist endpoint configured; signups will only be logged");
        return Ok(Arc::new(ConsoleWaitlist));
    }

    let client = ConvexClient::new(endpoint.url.clone(), timeout)
        .with_context(|| format!("failed to create waitlist client for {}", endpoint.url))?;
    tracing::info!(
        endpoint = %endpoint.url,
        source = %endpoint.source,
        "Using Convex waitlist backend"
    );
    Ok(Arc::new(client))
}
