//! Pure mapping from form state to the set of visible screen regions.

use crate::form::{FormState, Reveal, SuccessPhase, WaitlistForm};
use crate::input::Field;

/// Stable identifiers for the waitlist widget's regions.
///
/// The terminal block above the widget is not interactive; its intro and command lines
/// are addressed by layout rectangles instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    WaitlistButton,
    NameInput,
    NameClear,
    NameConfirm,
    EmailInput,
    EmailClear,
    EmailSubmit,
    SuccessMessage,
}

impl Region {
    pub const ALL: [Self; 8] = [
        Self::WaitlistButton,
        Self::NameInput,
        Self::NameClear,
        Self::NameConfirm,
        Self::EmailInput,
        Self::EmailClear,
        Self::EmailSubmit,
        Self::SuccessMessage,
    ];
}

/// Which form regions are on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Visibility {
    pub waitlist_button: bool,
    pub name_input: bool,
    /// Clear and confirm controls of the name input.
    pub name_actions: bool,
    pub email_input: bool,
    /// Clear and submit controls of the email input.
    pub email_actions: bool,
    /// Submit control shows its loading state.
    pub submit_loading: bool,
    pub success_message: bool,
}

impl Visibility {
    #[must_use]
    pub const fn contains(&self, region: Region) -> bool {
        match region {
            Region::WaitlistButton => self.waitlist_button,
            Region::NameInput => self.name_input,
            Region::NameClear | Region::NameConfirm => self.name_actions,
            Region::EmailInput => self.email_input,
            Region::EmailClear | Region::EmailSubmit => self.email_actions,
            Region::SuccessMessage => self.success_message,
        }
    }

    /// Visible form regions, in screen order.
    #[must_use]
    pub fn regions(&self) -> Vec<Region> {
        Region::ALL
            .into_iter()
            .filter(|region| self.contains(*region))
            .collect()
    }
}

/// Render the form into its visibility set.
///
/// Action controls are derived from the input contents, so clearing an input hides them
/// without any state change.
#[must_use]
pub fn render(form: &WaitlistForm) -> Visibility {
    let has_content = |field: Field| form.input(field).has_content();

    match form.state() {
        FormState::Idle => Visibility {
            waitlist_button: true,
            ..Visibility::default()
        },
        FormState::NameEntry(Reveal::Shown | Reveal::Focused) => Visibility {
            name_input: true,
            name_actions: has_content(Field::Name),
            ..Visibility::default()
        },
        FormState::EmailEntry(Reveal::Shown | Reveal::Focused) => Visibility {
            email_input: true,
            email_actions: has_content(Field::Email),
            ..Visibility::default()
        },
        FormState::Submitting(_) => Visibility {
            email_input: true,
            email_actions: true,
            submit_loading: true,
            ..Visibility::default()
        },
        FormState::Success(SuccessPhase::Showing) => Visibility {
            success_message: true,
            ..Visibility::default()
        },
        FormState::NameEntry(Reveal::Pending)
        | FormState::EmailEntry(Reveal::Pending)
        | FormState::Success(SuccessPhase::Entering | SuccessPhase::Leaving) => {
            Visibility::default()
        }
    }
}
