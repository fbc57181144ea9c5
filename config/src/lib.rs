//! Configuration for Anora.
//!
//! Settings live in `~/.anora/config.toml` (override the path with `ANORA_CONFIG`).
//! Every section and field is optional; anything missing falls back to the
//! built-in defaults of [`AnimationConfig`] and [`FormTimings`].
//!
//! ```toml
//! [waitlist]
//! convex_url = "https://happy-animal-123.convex.cloud"
//! timeout_seconds = 30
//!
//! [animation]
//! command_text = "ssh anoralabs.shop"
//! type_speed_ms = 65
//!
//! [form]
//! success_display_ms = 3000
//!
//! [app]
//! reduced_motion = false
//! ```

mod endpoint;

pub use endpoint::{
    BUILD_TIME_ENDPOINT, ENDPOINT_ENV_VAR, EndpointError, EndpointSource, ResolvedEndpoint,
    persist_endpoint, resolve_endpoint, validate_endpoint,
};

use std::{
    env,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;

use anora_types::{AnimationConfig, FormTimings, UiOptions};

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV_VAR: &str = "ANORA_CONFIG";

#[derive(Debug, Default, Deserialize)]
pub struct AnoraConfig {
    pub app: Option<AppConfig>,
    pub waitlist: Option<WaitlistConfig>,
    pub animation: Option<AnimationSection>,
    pub form: Option<FormSection>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("failed to write config at {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("existing config at {} is not valid TOML: {source}", path.display())]
    Edit {
        path: PathBuf,
        source: toml_edit::TomlError,
    },
    #[error("`{key}` in config at {} is not a table", path.display())]
    NotATable { path: PathBuf, key: &'static str },
    #[error("could not determine config path")]
    NoPath,
    #[error(transparent)]
    Endpoint(#[from] EndpointError),
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Write { path, .. }
            | ConfigError::Edit { path, .. }
            | ConfigError::NotATable { path, .. } => Some(path),
            ConfigError::NoPath | ConfigError::Endpoint(_) => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Use ASCII-only glyphs for the cursor and controls.
    #[serde(default)]
    pub ascii_only: bool,
    /// Enable a high-contrast color palette.
    #[serde(default)]
    pub high_contrast: bool,
    /// Disable fades and cursor blinking.
    #[serde(default)]
    pub reduced_motion: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct WaitlistConfig {
    /// Convex deployment URL. Empty disables submissions.
    pub convex_url: Option<String>,
    /// Overall HTTP timeout in seconds. Unset or 0 waits indefinitely.
    pub timeout_seconds: Option<u64>,
}

/// `[animation]` overrides; durations in milliseconds.
#[derive(Debug, Default, Deserialize)]
pub struct AnimationSection {
    pub intro_text: Option<String>,
    pub command_text: Option<String>,
    pub type_speed_ms: Option<u64>,
    pub backspace_speed_ms: Option<u64>,
    pub intro_fade_in_ms: Option<u64>,
    pub intro_fade_out_ms: Option<u64>,
    pub intro_hold_ms: Option<u64>,
    pub command_hold_ms: Option<u64>,
    pub pause_before_type_ms: Option<u64>,
    pub pause_after_backspace_ms: Option<u64>,
    pub start_delay_ms: Option<u64>,
    pub type_variance: Option<f64>,
}

/// `[form]` overrides; durations in milliseconds.
#[derive(Debug, Default, Deserialize)]
pub struct FormSection {
    pub reveal_delay_ms: Option<u64>,
    pub step_delay_ms: Option<u64>,
    pub focus_delay_ms: Option<u64>,
    pub success_display_ms: Option<u64>,
}

fn millis_or(value: Option<u64>, default: Duration) -> Duration {
    value.map_or(default, Duration::from_millis)
}

impl AnimationSection {
    #[must_use]
    pub fn apply(&self, base: AnimationConfig) -> AnimationConfig {
        AnimationConfig {
            intro_text: self.intro_text.clone().unwrap_or(base.intro_text),
            command_text: self.command_text.clone().unwrap_or(base.command_text),
            type_speed: millis_or(self.type_speed_ms, base.type_speed),
            backspace_speed: millis_or(self.backspace_speed_ms, base.backspace_speed),
            intro_fade_in: millis_or(self.intro_fade_in_ms, base.intro_fade_in),
            intro_fade_out: millis_or(self.intro_fade_out_ms, base.intro_fade_out),
            intro_hold: millis_or(self.intro_hold_ms, base.intro_hold),
            command_hold: millis_or(self.command_hold_ms, base.command_hold),
            pause_before_type: millis_or(self.pause_before_type_ms, base.pause_before_type),
            pause_after_backspace: millis_or(
                self.pause_after_backspace_ms,
                base.pause_after_backspace,
            ),
            intro_lead_in: base.intro_lead_in,
            start_delay: millis_or(self.start_delay_ms, base.start_delay),
            type_variance: self
                .type_variance
                .map_or(base.type_variance, |v| v.clamp(0.0, 1.0)),
        }
    }
}

impl FormSection {
    #[must_use]
    pub fn apply(&self, base: FormTimings) -> FormTimings {
        FormTimings {
            reveal_delay: millis_or(self.reveal_delay_ms, base.reveal_delay),
            step_delay: millis_or(self.step_delay_ms, base.step_delay),
            focus_delay: millis_or(self.focus_delay_ms, base.focus_delay),
            success_display: millis_or(self.success_display_ms, base.success_display),
        }
    }
}

impl AnoraConfig {
    /// Load the config file, if any.
    ///
    /// Returns `Ok(None)` when no path can be determined or the file does not exist.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let Some(path) = config_path() else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(config),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        self.app.as_ref().map_or_else(UiOptions::default, |app| UiOptions {
            ascii_only: app.ascii_only,
            high_contrast: app.high_contrast,
            reduced_motion: app.reduced_motion,
        })
    }

    #[must_use]
    pub fn animation_config(&self) -> AnimationConfig {
        let base = AnimationConfig::default();
        match &self.animation {
            Some(section) => section.apply(base),
            None => base,
        }
    }

    #[must_use]
    pub fn form_timings(&self) -> FormTimings {
        let base = FormTimings::default();
        match &self.form {
            Some(section) => section.apply(base),
            None => base,
        }
    }

    #[must_use]
    pub fn convex_url(&self) -> Option<&str> {
        self.waitlist.as_ref()?.convex_url.as_deref()
    }

    /// HTTP timeout for collaborator calls; `None` waits for settlement indefinitely.
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.waitlist
            .as_ref()?
            .timeout_seconds
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

pub fn config_path() -> Option<PathBuf> {
    if let Ok(custom) = env::var(CONFIG_PATH_ENV_VAR)
        && !custom.trim().is_empty()
    {
        return Some(PathBuf::from(custom));
    }
    dirs::home_dir().map(|home| home.join(".anora").join("config.toml"))
}
