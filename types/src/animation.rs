//! Terminal intro animation: timing config, script steps, and the rendered view.

use std::time::Duration;

/// Relative spread applied to each typed character (±15%).
pub const TYPE_VARIANCE: f64 = 0.3;

/// Immutable timing and copy for the intro animation.
///
/// `Duration` keeps every timing non-negative by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationConfig {
    pub intro_text: String,
    pub command_text: String,
    pub type_speed: Duration,
    pub backspace_speed: Duration,
    pub intro_fade_in: Duration,
    pub intro_fade_out: Duration,
    pub intro_hold: Duration,
    pub command_hold: Duration,
    pub pause_before_type: Duration,
    pub pause_after_backspace: Duration,
    /// Gap between setting the intro text and starting its fade-in.
    pub intro_lead_in: Duration,
    /// Delay between start-up and the first cycle.
    pub start_delay: Duration,
    /// Jitter factor for typing, clamped to `[0, 1]` when used.
    pub type_variance: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            intro_text: "order your coffee via terminal".to_string(),
            command_text: "ssh anoralabs.shop".to_string(),
            type_speed: Duration::from_millis(65),
            backspace_speed: Duration::from_millis(35),
            intro_fade_in: Duration::from_millis(800),
            intro_fade_out: Duration::from_millis(600),
            intro_hold: Duration::from_millis(2000),
            command_hold: Duration::from_millis(5000),
            pause_before_type: Duration::from_millis(400),
            pause_after_backspace: Duration::from_millis(300),
            intro_lead_in: Duration::from_millis(50),
            start_delay: Duration::from_millis(300),
            type_variance: TYPE_VARIANCE,
        }
    }
}

/// One stage of the fixed animation script.
///
/// The script never branches: after `PauseAfterBackspace` it restarts at `ShowIntro`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceStep {
    ShowIntro,
    HoldIntro,
    HideIntro,
    PauseBeforeType,
    Type,
    HoldCommand,
    Backspace,
    PauseAfterBackspace,
}

impl SequenceStep {
    pub const ALL: [Self; 8] = [
        Self::ShowIntro,
        Self::HoldIntro,
        Self::HideIntro,
        Self::PauseBeforeType,
        Self::Type,
        Self::HoldCommand,
        Self::Backspace,
        Self::PauseAfterBackspace,
    ];

    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::ShowIntro => Self::HoldIntro,
            Self::HoldIntro => Self::HideIntro,
            Self::HideIntro => Self::PauseBeforeType,
            Self::PauseBeforeType => Self::Type,
            Self::Type => Self::HoldCommand,
            Self::HoldCommand => Self::Backspace,
            Self::Backspace => Self::PauseAfterBackspace,
            Self::PauseAfterBackspace => Self::ShowIntro,
        }
    }
}

/// Visibility of the intro line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntroFade {
    #[default]
    Hidden,
    FadingIn(Duration),
    Visible,
    FadingOut(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorState {
    #[default]
    Hidden,
    Solid,
    Blinking,
}

impl CursorState {
    #[must_use]
    pub const fn is_visible(self) -> bool {
        !matches!(self, Self::Hidden)
    }
}

/// Everything the terminal region shows at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TerminalView {
    pub intro: String,
    pub intro_fade: IntroFade,
    pub command: String,
    pub cursor: CursorState,
}

impl TerminalView {
    /// True when nothing from a previous cycle is left on screen.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.intro.is_empty()
            && self.intro_fade == IntroFade::Hidden
            && self.command.is_empty()
            && self.cursor == CursorState::Hidden
    }
}

pub fn normalized_progress(elapsed: Duration, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }

    let elapsed = elapsed.as_secs_f32();
    let total = duration.as_secs_f32();
    (elapsed / total).clamp(0.0, 1.0)
}

/// Nominal delay perturbed by `nominal * variance * (sample - 0.5)`.
///
/// `sample` is expected in `[0, 1)`; values outside are clamped.
#[must_use]
pub fn eased_delay(nominal: Duration, variance: f64, sample: f64) -> Duration {
    let variance = variance.clamp(0.0, 1.0);
    let sample = sample.clamp(0.0, 1.0);
    scale(nominal, 1.0 + variance * (sample - 0.5))
}

/// Delay after deleting a character when `remaining` of `total` were left before the
/// deletion. Scales from the full nominal speed down to 70% of it.
#[must_use]
pub fn backspace_delay(nominal: Duration, remaining: usize, total: usize) -> Duration {
    if total == 0 {
        return nominal;
    }
    let fraction = remaining.min(total) as f64 / total as f64;
    scale(nominal, 0.7 + fraction * 0.3)
}

// Rounded to whole nanoseconds so equal inputs give equal delays.
fn scale(nominal: Duration, factor: f64) -> Duration {
    let nanos = nominal.as_nanos() as f64 * factor.max(0.0);
    Duration::from_nanos(nanos.round() as u64)
}
