//! Core domain types for Anora.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! The animation script, the waitlist form state machine, and the mapping from form
//! state to visible screen regions all live here so every layer can share them.

mod animation;
mod form;
mod input;
mod render;
mod waitlist;

pub use animation::{
    AnimationConfig, CursorState, IntroFade, SequenceStep, TYPE_VARIANCE, TerminalView,
    backspace_delay, eased_delay, normalized_progress,
};
pub use form::{
    FormEffect, FormEvent, FormState, FormStep, FormTimings, Reveal, SubmitTicket, SuccessPhase,
    TimerToken, Transition, WaitlistForm,
};
pub use input::{DraftInput, EditOp, Field};
pub use render::{Region, Visibility, render};
pub use waitlist::{EntryId, Signup, WaitlistEntry};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// NonEmpty String Types
// ============================================================================

/// A string guaranteed to be non-empty after trimming.
///
/// The stored value is the trimmed text: leading and trailing whitespace never
/// reaches the collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NonEmptyString(String);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("value must not be empty")]
pub struct EmptyStringError;

impl NonEmptyString {
    pub fn new(value: impl AsRef<str>) -> Result<Self, EmptyStringError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            Err(EmptyStringError)
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for NonEmptyString {
    type Error = EmptyStringError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for NonEmptyString {
    type Error = EmptyStringError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

impl std::ops::Deref for NonEmptyString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl AsRef<str> for NonEmptyString {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for NonEmptyString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// UI options
// ============================================================================

/// Presentation toggles resolved from `[app]` config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiOptions {
    pub ascii_only: bool,
    pub high_contrast: bool,
    /// Render fades as instant cuts and keep the cursor solid.
    pub reduced_motion: bool,
}
