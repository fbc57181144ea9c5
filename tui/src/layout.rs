//! Screen geometry of the landing page and mouse hit-testing.
//!
//! The layout is a pure function of the terminal area and the form's
//! [`Visibility`], so drawing and hit-testing always agree without the app having
//! to remember where anything was painted.

use ratatui::layout::{Position, Rect};
use unicode_width::UnicodeWidthStr;

use anora_engine::ClickTarget;
use anora_types::{Region, Visibility};

pub const PANEL_MAX_WIDTH: u16 = 64;
/// Bordered terminal block: intro line, spacer, command line.
pub const TERMINAL_HEIGHT: u16 = 5;
/// Bordered inputs and buttons are one text row tall.
pub const WIDGET_HEIGHT: u16 = 3;
pub const ACTION_WIDTH: u16 = 5;
pub const BUTTON_LABEL: &str = "join the waitlist";

const GAP: u16 = 1;
const HINT_HEIGHT: u16 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandingLayout {
    pub terminal: Rect,
    pub intro: Rect,
    pub command: Rect,
    /// Bounds of the waitlist widget. Clicks outside it dismiss the form.
    pub widget: Rect,
    pub hints: Rect,
    controls: Vec<(Region, Rect)>,
}

impl LandingLayout {
    /// Rectangle of a visible control.
    #[must_use]
    pub fn control(&self, region: Region) -> Option<Rect> {
        self.controls
            .iter()
            .find(|(candidate, _)| *candidate == region)
            .map(|(_, rect)| *rect)
    }

    #[must_use]
    pub fn controls(&self) -> &[(Region, Rect)] {
        &self.controls
    }

    /// Resolve a click at a terminal cell.
    #[must_use]
    pub fn hit(&self, column: u16, row: u16) -> ClickTarget {
        let position = Position::new(column, row);
        if !self.widget.contains(position) {
            return ClickTarget::Outside;
        }
        self.controls
            .iter()
            .find(|(_, rect)| rect.contains(position))
            .map_or(ClickTarget::Widget, |(region, _)| {
                ClickTarget::Control(*region)
            })
    }
}

#[must_use]
pub fn landing_layout(area: Rect, visibility: &Visibility) -> LandingLayout {
    let width = area.width.min(PANEL_MAX_WIDTH);
    let x = area.x + (area.width - width) / 2;
    let total = TERMINAL_HEIGHT + GAP + WIDGET_HEIGHT + GAP + HINT_HEIGHT;
    let y = area.y + area.height.saturating_sub(total) / 2;

    let clip = |rect: Rect| rect.intersection(area);

    let terminal = clip(Rect::new(x, y, width, TERMINAL_HEIGHT));
    let inner_x = x.saturating_add(2);
    let inner_width = width.saturating_sub(4);
    let intro = clip(Rect::new(inner_x, y.saturating_add(1), inner_width, 1));
    let command = clip(Rect::new(inner_x, y.saturating_add(3), inner_width, 1));

    let widget_y = y.saturating_add(TERMINAL_HEIGHT + GAP);
    let widget = clip(Rect::new(x, widget_y, width, WIDGET_HEIGHT));
    let hints = clip(Rect::new(
        x,
        widget_y.saturating_add(WIDGET_HEIGHT + GAP),
        width,
        HINT_HEIGHT,
    ));

    let mut controls = Vec::new();
    if visibility.waitlist_button {
        let button_width = (BUTTON_LABEL.width() as u16 + 4).min(width);
        let button_x = x + (width - button_width) / 2;
        controls.push((
            Region::WaitlistButton,
            clip(Rect::new(button_x, widget_y, button_width, WIDGET_HEIGHT)),
        ));
    }

    let input_width = width.saturating_sub(ACTION_WIDTH * 2 + 1);
    let input = clip(Rect::new(x, widget_y, input_width, WIDGET_HEIGHT));
    let clear_x = x.saturating_add(input_width + 1);
    let clear = clip(Rect::new(clear_x, widget_y, ACTION_WIDTH, WIDGET_HEIGHT));
    let confirm = clip(Rect::new(
        clear_x.saturating_add(ACTION_WIDTH),
        widget_y,
        ACTION_WIDTH,
        WIDGET_HEIGHT,
    ));

    if visibility.name_input {
        controls.push((Region::NameInput, input));
    }
    if visibility.name_actions {
        controls.push((Region::NameClear, clear));
        controls.push((Region::NameConfirm, confirm));
    }
    if visibility.email_input {
        controls.push((Region::EmailInput, input));
    }
    if visibility.email_actions {
        controls.push((Region::EmailClear, clear));
        controls.push((Region::EmailSubmit, confirm));
    }
    if visibility.success_message {
        controls.push((Region::SuccessMessage, widget));
    }

    LandingLayout {
        terminal,
        intro,
        command,
        widget,
        hints,
        controls,
    }
}
