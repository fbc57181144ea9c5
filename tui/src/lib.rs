//! TUI rendering for Anora using ratatui.
//!
//! One screen: a terminal block playing the intro animation above the waitlist
//! widget. Geometry lives in [`layout`] so the input handler can hit-test clicks
//! against exactly what was drawn.

mod input;
pub mod layout;
mod theme;

pub use input::{InputPump, apply_event, handle_events};
pub use layout::{LandingLayout, landing_layout};
pub use theme::{Glyphs, Palette, blend, glyphs, palette, spinner_frame, styles};

use ratatui::{
    Frame,
    layout::{Alignment, Position, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Padding, Paragraph},
};
use tokio::time::Instant;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use anora_engine::{App, Field, FormStep, Region, Visibility};

/// Main draw function.
pub fn draw(frame: &mut Frame, app: &App) {
    draw_at(frame, app, Instant::now());
}

/// Draw the screen as it looks at `now`, which drives fades and the cursor blink.
pub fn draw_at(frame: &mut Frame, app: &App, now: Instant) {
    let options = app.options();
    let palette = palette(options);
    let glyphs = glyphs(options);

    let bg_block = Block::default().style(Style::default().bg(palette.bg_dark));
    frame.render_widget(bg_block, frame.area());

    let visibility = app.visibility();
    let layout = landing_layout(frame.area(), &visibility);

    draw_terminal(frame, app, now, &layout, &palette, &glyphs);
    draw_widget(frame, app, &visibility, &layout, &palette, &glyphs);
    draw_hints(frame, app, &layout, &palette);
}

fn draw_terminal(
    frame: &mut Frame,
    app: &App,
    now: Instant,
    layout: &LandingLayout,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.bg_border))
        .style(Style::default().bg(palette.bg_panel));
    frame.render_widget(block, layout.terminal);

    let view = app.terminal_view();

    let opacity = app.intro_opacity(now);
    if opacity > 0.0 && !view.intro.is_empty() {
        let color = blend(palette.bg_panel, palette.text_secondary, opacity);
        let intro = Paragraph::new(Line::from(view.intro.as_str()))
            .style(Style::default().fg(color).bg(palette.bg_panel));
        frame.render_widget(intro, layout.intro);
    }

    let mut spans = vec![
        Span::styled(glyphs.prompt, styles::prompt(palette)),
        Span::raw(" "),
        Span::styled(view.command.as_str(), styles::command(palette)),
    ];
    if app.cursor_visible(now) {
        spans.push(Span::styled(
            glyphs.cursor,
            Style::default().fg(palette.accent),
        ));
    }
    let command = Paragraph::new(Line::from(spans)).style(Style::default().bg(palette.bg_panel));
    frame.render_widget(command, layout.command);
}

fn draw_widget(
    frame: &mut Frame,
    app: &App,
    visibility: &Visibility,
    layout: &LandingLayout,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    if let Some(area) = layout.control(Region::WaitlistButton) {
        let button = Paragraph::new(Line::from(layout::BUTTON_LABEL))
            .alignment(Alignment::Center)
            .style(styles::button(palette))
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .border_style(styles::button(palette)),
            );
        frame.render_widget(button, area);
    }

    for (field, input_region, clear_region, confirm_region) in [
        (
            Field::Name,
            Region::NameInput,
            Region::NameClear,
            Region::NameConfirm,
        ),
        (
            Field::Email,
            Region::EmailInput,
            Region::EmailClear,
            Region::EmailSubmit,
        ),
    ] {
        if let Some(area) = layout.control(input_region) {
            draw_input(frame, app, field, area, palette);
        }
        if let Some(area) = layout.control(clear_region) {
            draw_action(frame, glyphs.clear, area, palette);
        }
        if let Some(area) = layout.control(confirm_region) {
            let label = match field {
                Field::Email if visibility.submit_loading => {
                    spinner_frame(app.tick_count(), app.options())
                }
                Field::Email => glyphs.submit,
                Field::Name => glyphs.confirm,
            };
            draw_action(frame, label, area, palette);
        }
    }

    if let Some(area) = layout.control(Region::SuccessMessage) {
        let message = match app.form().user_name() {
            Some(name) => format!("{} you're on the list, {name}", glyphs.success),
            None => format!("{} you're on the list", glyphs.success),
        };
        let success = Paragraph::new(Line::from(message))
            .alignment(Alignment::Center)
            .style(styles::success(palette))
            .block(Block::default().padding(Padding::vertical(1)));
        frame.render_widget(success, area);
    }
}

fn draw_input(frame: &mut Frame, app: &App, field: Field, area: Rect, palette: &Palette) {
    let focused = app.form().focused_field() == Some(field);
    let draft = app.form().input(field);
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(styles::input_border(palette, focused));
    let inner = block.inner(area);

    let (line, cursor_column) = if draft.text().is_empty() {
        (
            Line::from(Span::styled(field.placeholder(), styles::placeholder(palette))),
            0,
        )
    } else {
        let (visible, column) = input_window(draft.text(), draft.cursor(), inner.width as usize);
        (
            Line::from(Span::styled(visible, Style::default().fg(palette.text_primary))),
            column,
        )
    };

    frame.render_widget(Paragraph::new(line).block(block), area);

    if focused && inner.width > 0 && inner.height > 0 {
        frame.set_cursor_position(Position::new(
            inner.x.saturating_add(cursor_column as u16),
            inner.y,
        ));
    }
}

fn draw_action(frame: &mut Frame, label: &str, area: Rect, palette: &Palette) {
    let action = Paragraph::new(Line::from(label))
        .alignment(Alignment::Center)
        .style(styles::action(palette))
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(palette.bg_border)),
        );
    frame.render_widget(action, area);
}

fn draw_hints(frame: &mut Frame, app: &App, layout: &LandingLayout, palette: &Palette) {
    let hint = match app.step() {
        FormStep::Idle => "enter join · q quit",
        FormStep::NameEntry => "enter continue · esc back · ctrl+u clear",
        FormStep::EmailEntry => "enter submit · esc back · ctrl+u clear",
        FormStep::Submitting | FormStep::Success => "",
    };
    let hint = if app.options().ascii_only {
        hint.replace('·', "|")
    } else {
        hint.to_string()
    };
    let hints = Paragraph::new(Line::from(hint))
        .alignment(Alignment::Center)
        .style(styles::key_hint(palette));
    frame.render_widget(hints, layout.hints);
}

/// Slice of `text` that fits `width` cells with the cursor (a grapheme index) in
/// view, plus the cursor's column within that slice.
fn input_window(text: &str, cursor: usize, width: usize) -> (String, usize) {
    let graphemes: Vec<&str> = text.graphemes(true).collect();
    let cursor = cursor.min(graphemes.len());
    let span_width = |range: &[&str]| range.iter().map(|g| g.width()).sum::<usize>();

    // Keep one cell free for the cursor itself.
    let mut start = 0;
    while start < cursor && span_width(&graphemes[start..cursor]) >= width {
        start += 1;
    }

    let mut visible = String::new();
    let mut used = 0;
    for grapheme in &graphemes[start..] {
        let w = grapheme.width();
        if used + w > width {
            break;
        }
        visible.push_str(grapheme);
        used += w;
    }

    (visible, span_width(&graphemes[start..cursor]))
}
