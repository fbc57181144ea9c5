//! Application state: the form controller plus the latest terminal view.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::Instant;

use anora_types::{
    CursorState, EditOp, EntryId, Field, FormEffect, FormEvent, FormStep, IntroFade, Region, Signup,
    SubmitTicket, TerminalView, TimerToken, Transition, UiOptions, Visibility, WaitlistForm,
    normalized_progress, render,
};
use anora_waitlist::{WaitlistBackend, WaitlistError};

use crate::animation::AnimationTask;
use crate::sequencer::{Jitter, ThreadJitter};
use crate::AppSettings;


/// Half period of the blinking cursor.
pub const CURSOR_BLINK_INTERVAL: Duration = Duration::from_millis(530);

/// Cadence of [`App::tick_count`], independent of the render rate.
const UI_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Stand-in deadline for delays too large to represent, about 30 years out.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

fn deadline_after(base: Instant, after: Duration) -> Instant {
    base.checked_add(after)
        .or_else(|| base.checked_add(FAR_FUTURE))
        .unwrap_or(base)
}

/// Where a pointer click landed, as resolved by the UI's hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// A visible control or input of the waitlist widget.
    Control(Region),
    /// Inside the waitlist widget, but not on a control.
    Widget,
    /// Anywhere outside the waitlist widget.
    Outside,
}

#[derive(Debug, Clone, Copy)]
struct ArmedTimer {
    token: TimerToken,
    deadline: Instant,
}

#[derive(Debug)]
struct Settlement {
    ticket: SubmitTicket,
    signup: Signup,
    outcome: Result<EntryId, WaitlistError>,
}

pub struct App {
    form: WaitlistForm,
    timer: Option<ArmedTimer>,
    backend: Arc<dyn WaitlistBackend>,
    settled_tx: mpsc::UnboundedSender<Settlement>,
    settled_rx: mpsc::UnboundedReceiver<Settlement>,
    in_flight: usize,
    animation: AnimationTask,
    views: watch::Receiver<TerminalView>,
    view: TerminalView,
    fade_started: Instant,
    cursor_changed: Instant,
    options: UiOptions,
    ui_tick: usize,
    last_ui_tick: Instant,
    should_quit: bool,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("form", &self.form)
            .field("timer", &self.timer)
            .field("backend", &self.backend.describe())
            .field("in_flight", &self.in_flight)
            .field("view", &self.view)
            .field("should_quit", &self.should_quit)
            .finish_non_exhaustive()
    }
}

impl App {
    /// Create the app and start the intro animation. Must be called inside a tokio
    /// runtime.
    pub fn new(settings: AppSettings, backend: Arc<dyn WaitlistBackend>) -> Self {
        Self::with_jitter(settings, backend, ThreadJitter)
    }

    pub fn with_jitter(
        settings: AppSettings,
        backend: Arc<dyn WaitlistBackend>,
        jitter: impl Jitter + 'static,
    ) -> Self {
        let animation = AnimationTask::spawn(settings.animation, jitter);
        let views = animation.subscribe();
        let (settled_tx, settled_rx) = mpsc::unbounded_channel();
        Self {
            form: WaitlistForm::new(settings.form),
            timer: None,
            backend,
            settled_tx,
            settled_rx,
            in_flight: 0,
            animation,
            views,
            view: TerminalView::default(),
            fade_started: Instant::now(),
            cursor_changed: Instant::now(),
            options: settings.ui,
            ui_tick: 0,
            last_ui_tick: Instant::now(),
            should_quit: false,
        }
    }

    #[must_use]
    pub fn form(&self) -> &WaitlistForm {
        &self.form
    }

    #[must_use]
    pub fn step(&self) -> FormStep {
        self.form.step()
    }

    #[must_use]
    pub fn visibility(&self) -> Visibility {
        render(&self.form)
    }

    #[must_use]
    pub fn terminal_view(&self) -> &TerminalView {
        &self.view
    }

    #[must_use]
    pub fn options(&self) -> UiOptions {
        self.options
    }

    #[must_use]
    pub fn backend_label(&self) -> String {
        self.backend.describe()
    }

    /// Submissions handed to the backend that have not reported back yet.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// When the armed form timer is due, if any.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timer.map(|timer| timer.deadline)
    }

    /// Spinner frame counter, advanced about ten times a second by [`App::tick`].
    #[must_use]
    pub fn tick_count(&self) -> usize {
        self.ui_tick
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }

    /// Opacity of the intro line in `[0, 1]` at `now`.
    ///
    /// With reduced motion a fade is shown as its end state.
    #[must_use]
    pub fn intro_opacity(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.fade_started);
        match self.view.intro_fade {
            IntroFade::Hidden => 0.0,
            IntroFade::Visible => 1.0,
            IntroFade::FadingIn(_) if self.options.reduced_motion => 1.0,
            IntroFade::FadingOut(_) if self.options.reduced_motion => 0.0,
            IntroFade::FadingIn(duration) => normalized_progress(elapsed, duration),
            IntroFade::FadingOut(duration) => 1.0 - normalized_progress(elapsed, duration),
        }
    }

    /// Whether the terminal cursor is drawn at `now`.
    ///
    /// A blinking cursor starts visible and toggles every [`CURSOR_BLINK_INTERVAL`];
    /// with reduced motion it stays solid.
    #[must_use]
    pub fn cursor_visible(&self, now: Instant) -> bool {
        match self.view.cursor {
            CursorState::Hidden => false,
            CursorState::Solid => true,
            CursorState::Blinking if self.options.reduced_motion => true,
            CursorState::Blinking => {
                let elapsed = now.saturating_duration_since(self.cursor_changed);
                (elapsed.as_millis() / CURSOR_BLINK_INTERVAL.as_millis()) % 2 == 0
            }
        }
    }

    /// Advance to `now`: pick up the latest terminal view, apply settled submissions,
    /// and fire the form timer if it is due.
    pub fn tick(&mut self, now: Instant) {
        if now.saturating_duration_since(self.last_ui_tick) >= UI_TICK_INTERVAL {
            self.ui_tick = self.ui_tick.wrapping_add(1);
            self.last_ui_tick = now;
        }
        self.refresh_view(now);

        while let Ok(settlement) = self.settled_rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            self.settle(settlement, now);
        }

        // Chained timers are measured from the previous deadline so a slow frame
        // does not stretch the sequence.
        while let Some(timer) = self.timer
            && timer.deadline <= now
        {
            self.timer = None;
            self.dispatch_at(FormEvent::TimerFired(timer.token), timer.deadline);
        }
    }

    /// Enter key: activates the start button in Idle, otherwise confirm/submit.
    pub fn press_enter(&mut self) {
        let event = if self.form.step() == FormStep::Idle {
            FormEvent::Start
        } else {
            FormEvent::Confirm
        };
        self.dispatch(event);
    }

    /// Apply an editing keystroke to the focused input. Ignored when no input has focus.
    pub fn edit(&mut self, op: EditOp) {
        if let Some(field) = self.form.focused_field() {
            self.dispatch(FormEvent::Edit(field, op));
        }
    }

    /// Clear control of the input on screen.
    pub fn clear_input(&mut self) {
        if let Some(field) = self.form.visible_field() {
            self.dispatch(FormEvent::Clear(field));
        }
    }

    /// Abandon the form and return to the start button. No-op in Idle.
    pub fn dismiss(&mut self) {
        if self.form.step() == FormStep::Idle {
            return;
        }
        tracing::debug!(step = ?self.form.step(), "Waitlist form dismissed");
        self.timer = None;
        self.dispatch(FormEvent::ClickOutside);
    }

    pub fn click(&mut self, target: ClickTarget) {
        match target {
            ClickTarget::Outside => self.dismiss(),
            ClickTarget::Widget => {}
            ClickTarget::Control(region) => match region {
                Region::WaitlistButton => self.dispatch(FormEvent::Start),
                Region::NameClear => self.dispatch(FormEvent::Clear(Field::Name)),
                Region::EmailClear => self.dispatch(FormEvent::Clear(Field::Email)),
                Region::NameConfirm | Region::EmailSubmit => self.dispatch(FormEvent::Confirm),
                Region::NameInput | Region::EmailInput | Region::SuccessMessage => {}
            },
        }
    }

    /// Stop the intro animation.
    pub fn shutdown(&mut self) {
        self.animation.cancel();
    }

    fn dispatch(&mut self, event: FormEvent) {
        self.dispatch_at(event, Instant::now());
    }

    fn dispatch_at(&mut self, event: FormEvent, base: Instant) {
        let from = self.form.step();
        let Transition { form, effects } = std::mem::take(&mut self.form).apply(event);
        self.form = form;

        let to = self.form.step();
        if from != to {
            tracing::debug!(?from, ?to, "Form step changed");
        }

        for effect in effects {
            match effect {
                FormEffect::Schedule { token, after } => {
                    self.timer = Some(ArmedTimer {
                        token,
                        deadline: deadline_after(base, after),
                    });
                }
                FormEffect::Focus(field) => {
                    tracing::trace!(?field, "Input focused");
                }
                FormEffect::Submit { ticket, signup } => self.submit(ticket, signup),
            }
        }
    }

    fn submit(&mut self, ticket: SubmitTicket, signup: Signup) {
        let backend = Arc::clone(&self.backend);
        let settled = self.settled_tx.clone();
        self.in_flight += 1;
        tracing::debug!(backend = %backend.describe(), "Submitting waitlist signup");

        tokio::spawn(async move {
            let outcome = backend.add(signup.clone()).await;
            // The receiver lives as long as the app; a closed channel means shutdown.
            let _ = settled.send(Settlement {
                ticket,
                signup,
                outcome,
            });
        });
    }

    fn settle(&mut self, settlement: Settlement, now: Instant) {
        let Settlement {
            ticket,
            signup,
            outcome,
        } = settlement;

        match outcome {
            Ok(id) => tracing::info!(%id, email = %signup.email, "Waitlist signup recorded"),
            Err(error) => tracing::error!(
                %error,
                name = %signup.name,
                email = %signup.email,
                "Waitlist submission failed"
            ),
        }

        self.dispatch_at(FormEvent::Settled(ticket), now);
    }

    fn refresh_view(&mut self, now: Instant) {
        if !self.views.has_changed().unwrap_or(false) {
            return;
        }
        let view = self.views.borrow_and_update().clone();
        if view.intro_fade != self.view.intro_fade {
            self.fade_started = now;
        }
        if view.cursor != self.view.cursor {
            self.cursor_changed = now;
        }
        self.view = view;
    }
}
