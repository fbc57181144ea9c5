//! Terminal intro script as a pure stepper.
//!
//! [`Sequencer::step`] applies exactly one change to the [`TerminalView`] and returns
//! how long to wait before the next call. Driving it on a timer (see
//! [`crate::AnimationTask`]) plays the animation; driving it in a loop replays the
//! script instantly for tests.

use std::time::Duration;

use unicode_segmentation::UnicodeSegmentation;

use anora_types::{
    AnimationConfig, CursorState, IntroFade, SequenceStep, TerminalView, backspace_delay,
    eased_delay,
};

/// Source of typing jitter samples in `[0, 1)`.
pub trait Jitter: Send {
    fn sample(&mut self) -> f64;
}

/// Uniform samples from the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadJitter;

impl Jitter for ThreadJitter {
    fn sample(&mut self) -> f64 {
        rand::random::<f64>()
    }
}

/// Always returns the same sample. `FixedJitter(0.5)` types at the nominal speed.
#[derive(Debug, Clone, Copy)]
pub struct FixedJitter(pub f64);

impl Jitter for FixedJitter {
    fn sample(&mut self) -> f64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cue {
    SetIntro,
    RevealIntro,
    HoldIntro,
    FadeOutIntro,
    ClearIntro,
    /// Append the grapheme at this index.
    Type(usize),
    HoldCommand,
    /// Delete one grapheme while this many remain.
    Backspace(usize),
    HideCursor,
}

impl Cue {
    const fn step(self) -> SequenceStep {
        match self {
            Self::SetIntro | Self::RevealIntro => SequenceStep::ShowIntro,
            Self::HoldIntro => SequenceStep::HoldIntro,
            Self::FadeOutIntro => SequenceStep::HideIntro,
            Self::ClearIntro => SequenceStep::PauseBeforeType,
            Self::Type(_) => SequenceStep::Type,
            Self::HoldCommand => SequenceStep::HoldCommand,
            Self::Backspace(_) => SequenceStep::Backspace,
            Self::HideCursor => SequenceStep::PauseAfterBackspace,
        }
    }
}

pub struct Sequencer {
    config: AnimationConfig,
    jitter: Box<dyn Jitter>,
    command: Vec<String>,
    next: Cue,
    current: SequenceStep,
    view: TerminalView,
    cycles: u64,
}

impl std::fmt::Debug for Sequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sequencer")
            .field("next", &self.next)
            .field("current", &self.current)
            .field("view", &self.view)
            .field("cycles", &self.cycles)
            .finish_non_exhaustive()
    }
}

impl Sequencer {
    pub fn new(config: AnimationConfig, jitter: impl Jitter + 'static) -> Self {
        let command = config
            .command_text
            .graphemes(true)
            .map(str::to_string)
            .collect();
        Self {
            config,
            jitter: Box::new(jitter),
            command,
            next: Cue::SetIntro,
            current: SequenceStep::PauseAfterBackspace,
            view: TerminalView::default(),
            cycles: 0,
        }
    }

    #[must_use]
    pub fn view(&self) -> &TerminalView {
        &self.view
    }

    /// Script step of the most recently applied change.
    #[must_use]
    pub fn current_step(&self) -> SequenceStep {
        self.current
    }

    /// Number of cycles played to the end.
    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Apply the next change and return the wait before the following one.
    pub fn step(&mut self) -> Duration {
        let cue = self.next;
        self.current = cue.step();
        let config = &self.config;

        let (wait, next) = match cue {
            Cue::SetIntro => {
                self.view.intro.clone_from(&config.intro_text);
                self.view.intro_fade = IntroFade::Hidden;
                (config.intro_lead_in, Cue::RevealIntro)
            }
            Cue::RevealIntro => {
                self.view.intro_fade = IntroFade::FadingIn(config.intro_fade_in);
                (config.intro_fade_in, Cue::HoldIntro)
            }
            Cue::HoldIntro => {
                self.view.intro_fade = IntroFade::Visible;
                (config.intro_hold, Cue::FadeOutIntro)
            }
            Cue::FadeOutIntro => {
                self.view.intro_fade = IntroFade::FadingOut(config.intro_fade_out);
                (config.intro_fade_out, Cue::ClearIntro)
            }
            Cue::ClearIntro => {
                self.view.intro.clear();
                self.view.intro_fade = IntroFade::Hidden;
                let next = if self.command.is_empty() {
                    Cue::HoldCommand
                } else {
                    Cue::Type(0)
                };
                (config.pause_before_type, next)
            }
            Cue::Type(index) => {
                self.view.cursor = CursorState::Solid;
                self.view.command.push_str(&self.command[index]);
                let wait = eased_delay(
                    config.type_speed,
                    config.type_variance,
                    self.jitter.sample(),
                );
                let next = if index + 1 < self.command.len() {
                    Cue::Type(index + 1)
                } else {
                    Cue::HoldCommand
                };
                (wait, next)
            }
            Cue::HoldCommand => {
                self.view.cursor = CursorState::Blinking;
                let next = if self.command.is_empty() {
                    Cue::HideCursor
                } else {
                    Cue::Backspace(self.command.len())
                };
                (config.command_hold, next)
            }
            Cue::Backspace(remaining) => {
                self.view.cursor = CursorState::Solid;
                let keep = remaining - 1;
                self.view.command = self.command[..keep].concat();
                let wait = backspace_delay(config.backspace_speed, remaining, self.command.len());
                let next = if keep == 0 {
                    Cue::HideCursor
                } else {
                    Cue::Backspace(keep)
                };
                (wait, next)
            }
            Cue::HideCursor => {
                self.view.cursor = CursorState::Hidden;
                self.cycles += 1;
                (config.pause_after_backspace, Cue::SetIntro)
            }
        };

        self.next = next;
        wait
    }
}
