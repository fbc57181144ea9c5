//! Waitlist form state machine.
//!
//! The form is a value: every event consumes it and yields the next form plus the
//! effects the caller must run (arm a timer, move focus, send the signup). Nothing
//! here sleeps or performs IO, so each transition can be checked in isolation.
//!
//! ```text
//! Idle --Start--> NameEntry --Confirm--> EmailEntry --Confirm--> Submitting
//!   ^                                                                |
//!   |                                                             Settled
//!   +---------------- (timers) ---------------- Success <-----------+
//!
//! any non-Idle state --ClickOutside--> Idle
//! ```
//!
//! Timer and submission events carry the token handed out with the effect that
//! requested them. A reset invalidates both, so a timer armed before an outside click
//! or a submission that settles after one cannot move the fresh form.

use std::time::Duration;

use crate::input::{DraftInput, EditOp, Field};
use crate::waitlist::Signup;
use crate::NonEmptyString;

/// Delays between the visual stages of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormTimings {
    /// Start button hidden -> name input shown.
    pub reveal_delay: Duration,
    /// Between hiding one stage and showing the next (name -> email, email -> success,
    /// success -> start button).
    pub step_delay: Duration,
    /// Input shown -> input focused.
    pub focus_delay: Duration,
    /// How long the success message stays up.
    pub success_display: Duration,
}

impl Default for FormTimings {
    fn default() -> Self {
        Self {
            reveal_delay: Duration::from_millis(100),
            step_delay: Duration::from_millis(150),
            focus_delay: Duration::from_millis(50),
            success_display: Duration::from_millis(3000),
        }
    }
}

/// Identifies one armed timer. Only the most recently armed token is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

/// Identifies one in-flight submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubmitTicket(u64);

/// Coarse step of the form, as seen by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormStep {
    Idle,
    NameEntry,
    EmailEntry,
    Submitting,
    Success,
}

/// Progress of an input stage between being requested and taking keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reveal {
    /// Previous stage hidden, input not shown yet.
    Pending,
    /// Input shown, focus not moved yet.
    Shown,
    Focused,
}

impl Reveal {
    const fn is_shown(self) -> bool {
        matches!(self, Self::Shown | Self::Focused)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuccessPhase {
    /// Email input hidden, message not shown yet.
    Entering,
    Showing,
    /// Message hidden, waiting to bring the start button back.
    Leaving,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Idle,
    NameEntry(Reveal),
    EmailEntry(Reveal),
    Submitting(SubmitTicket),
    Success(SuccessPhase),
}

impl FormState {
    #[must_use]
    pub const fn step(&self) -> FormStep {
        match self {
            Self::Idle => FormStep::Idle,
            Self::NameEntry(_) => FormStep::NameEntry,
            Self::EmailEntry(_) => FormStep::EmailEntry,
            Self::Submitting(_) => FormStep::Submitting,
            Self::Success(_) => FormStep::Success,
        }
    }
}

/// Input to the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    /// Start button activated.
    Start,
    Edit(Field, EditOp),
    /// Clear control of a field activated.
    Clear(Field),
    /// Confirm (name) or submit (email), by click or Enter.
    Confirm,
    TimerFired(TimerToken),
    /// The collaborator call for `ticket` finished, successfully or not.
    Settled(SubmitTicket),
    /// Pointer click outside the waitlist widget.
    ClickOutside,
}

/// Work requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEffect {
    /// Deliver `FormEvent::TimerFired(token)` after `after`. Replaces any armed timer.
    Schedule { token: TimerToken, after: Duration },
    Focus(Field),
    /// Send the signup and deliver `FormEvent::Settled(ticket)` once it settles.
    Submit { ticket: SubmitTicket, signup: Signup },
}

/// Result of applying one event.
#[derive(Debug)]
#[must_use]
pub struct Transition {
    pub form: WaitlistForm,
    pub effects: Vec<FormEffect>,
}

impl Transition {
    fn unchanged(form: WaitlistForm) -> Self {
        Self {
            form,
            effects: Vec::new(),
        }
    }
}

/// The three-step waitlist form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitlistForm {
    state: FormState,
    name: DraftInput,
    email: DraftInput,
    user_name: Option<NonEmptyString>,
    armed: Option<TimerToken>,
    next_id: u64,
    timings: FormTimings,
}

impl Default for WaitlistForm {
    fn default() -> Self {
        Self::new(FormTimings::default())
    }
}

impl WaitlistForm {
    #[must_use]
    pub fn new(timings: FormTimings) -> Self {
        Self {
            state: FormState::Idle,
            name: DraftInput::default(),
            email: DraftInput::default(),
            user_name: None,
            armed: None,
            next_id: 0,
            timings,
        }
    }

    #[must_use]
    pub fn state(&self) -> &FormState {
        &self.state
    }

    #[must_use]
    pub fn step(&self) -> FormStep {
        self.state.step()
    }

    #[must_use]
    pub fn input(&self, field: Field) -> &DraftInput {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
        }
    }

    /// Name confirmed at the first stage; cleared whenever the form returns to Idle.
    #[must_use]
    pub fn user_name(&self) -> Option<&NonEmptyString> {
        self.user_name.as_ref()
    }

    /// Field currently receiving keystrokes.
    #[must_use]
    pub fn focused_field(&self) -> Option<Field> {
        match self.state {
            FormState::NameEntry(Reveal::Focused) => Some(Field::Name),
            FormState::EmailEntry(Reveal::Focused) => Some(Field::Email),
            _ => None,
        }
    }

    /// Field whose input is on screen, focused or not.
    #[must_use]
    pub fn visible_field(&self) -> Option<Field> {
        match self.state {
            FormState::NameEntry(reveal) if reveal.is_shown() => Some(Field::Name),
            FormState::EmailEntry(reveal) if reveal.is_shown() => Some(Field::Email),
            FormState::Submitting(_) => Some(Field::Email),
            _ => None,
        }
    }

    /// True when the form looks exactly like it did on start-up.
    #[must_use]
    pub fn is_pristine(&self) -> bool {
        self.state == FormState::Idle
            && self.name.text().is_empty()
            && self.email.text().is_empty()
            && self.user_name.is_none()
            && self.armed.is_none()
    }

    pub fn apply(self, event: FormEvent) -> Transition {
        match event {
            FormEvent::Start => self.start(),
            FormEvent::Edit(field, op) => self.edit(field, &op),
            FormEvent::Clear(field) => self.clear(field),
            FormEvent::Confirm => self.confirm(),
            FormEvent::TimerFired(token) => self.timer_fired(token),
            FormEvent::Settled(ticket) => self.settled(ticket),
            FormEvent::ClickOutside => self.click_outside(),
        }
    }

    fn start(mut self) -> Transition {
        if self.state != FormState::Idle {
            return Transition::unchanged(self);
        }
        self.state = FormState::NameEntry(Reveal::Pending);
        let after = self.timings.reveal_delay;
        self.schedule(after)
    }

    fn edit(mut self, field: Field, op: &EditOp) -> Transition {
        if self.focused_field() == Some(field) {
            self.input_mut(field).apply(op);
        }
        Transition::unchanged(self)
    }

    fn clear(mut self, field: Field) -> Transition {
        let editable = match (&self.state, field) {
            (FormState::NameEntry(reveal), Field::Name)
            | (FormState::EmailEntry(reveal), Field::Email) => reveal.is_shown(),
            _ => false,
        };
        if !editable {
            return Transition::unchanged(self);
        }
        self.input_mut(field).clear();
        let effects = if self.focused_field() == Some(field) {
            Vec::new()
        } else {
            vec![FormEffect::Focus(field)]
        };
        Transition {
            form: self,
            effects,
        }
    }

    fn confirm(mut self) -> Transition {
        match self.state {
            FormState::NameEntry(reveal) if reveal.is_shown() => {
                let Ok(name) = NonEmptyString::new(self.name.text()) else {
                    return Transition::unchanged(self);
                };
                self.user_name = Some(name);
                self.state = FormState::EmailEntry(Reveal::Pending);
                let after = self.timings.step_delay;
                self.schedule(after)
            }
            FormState::EmailEntry(reveal) if reveal.is_shown() => {
                let Ok(email) = NonEmptyString::new(self.email.text()) else {
                    return Transition::unchanged(self);
                };
                let Some(name) = self.user_name.clone() else {
                    return Transition::unchanged(self);
                };
                let ticket = SubmitTicket(self.next_token_id());
                self.state = FormState::Submitting(ticket);
                self.armed = None;
                Transition {
                    form: self,
                    effects: vec![FormEffect::Submit {
                        ticket,
                        signup: Signup { name, email },
                    }],
                }
            }
            _ => Transition::unchanged(self),
        }
    }

    fn timer_fired(mut self, token: TimerToken) -> Transition {
        if self.armed != Some(token) {
            return Transition::unchanged(self);
        }
        self.armed = None;

        match self.state {
            FormState::NameEntry(Reveal::Pending) => {
                self.state = FormState::NameEntry(Reveal::Shown);
                let after = self.timings.focus_delay;
                self.schedule(after)
            }
            FormState::NameEntry(Reveal::Shown) => {
                self.state = FormState::NameEntry(Reveal::Focused);
                Transition {
                    form: self,
                    effects: vec![FormEffect::Focus(Field::Name)],
                }
            }
            FormState::EmailEntry(Reveal::Pending) => {
                self.state = FormState::EmailEntry(Reveal::Shown);
                let after = self.timings.focus_delay;
                self.schedule(after)
            }
            FormState::EmailEntry(Reveal::Shown) => {
                self.state = FormState::EmailEntry(Reveal::Focused);
                Transition {
                    form: self,
                    effects: vec![FormEffect::Focus(Field::Email)],
                }
            }
            FormState::Success(SuccessPhase::Entering) => {
                self.state = FormState::Success(SuccessPhase::Showing);
                let after = self.timings.success_display;
                self.schedule(after)
            }
            FormState::Success(SuccessPhase::Showing) => {
                self.state = FormState::Success(SuccessPhase::Leaving);
                let after = self.timings.step_delay;
                self.schedule(after)
            }
            FormState::Success(SuccessPhase::Leaving) => Transition::unchanged(self.reset()),
            FormState::Idle
            | FormState::NameEntry(Reveal::Focused)
            | FormState::EmailEntry(Reveal::Focused)
            | FormState::Submitting(_) => Transition::unchanged(self),
        }
    }

    fn settled(mut self, ticket: SubmitTicket) -> Transition {
        if self.state != FormState::Submitting(ticket) {
            return Transition::unchanged(self);
        }
        self.state = FormState::Success(SuccessPhase::Entering);
        let after = self.timings.step_delay;
        self.schedule(after)
    }

    fn click_outside(self) -> Transition {
        if self.state == FormState::Idle {
            return Transition::unchanged(self);
        }
        Transition::unchanged(self.reset())
    }

    /// Back to the start-up look. The id counter survives so outstanding tokens stay
    /// stale.
    fn reset(self) -> Self {
        Self {
            next_id: self.next_id,
            ..Self::new(self.timings)
        }
    }

    fn schedule(mut self, after: Duration) -> Transition {
        let token = TimerToken(self.next_token_id());
        self.armed = Some(token);
        Transition {
            form: self,
            effects: vec![FormEffect::Schedule { token, after }],
        }
    }

    fn next_token_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn input_mut(&mut self, field: Field) -> &mut DraftInput {
        match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
        }
    }
}
