//! Landing screen rendered through a virtual terminal.
//!
//! Events go through the same `apply_event` path the binary uses, and clicks are
//! aimed at wherever the text actually landed on screen.


use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::Terminal;
use ratatui::layout::{Position, Rect};
use tokio::time::Instant;

use anora_engine::{App, AppSettings, FixedJitter, FormStep, MemoryWaitlist, UiOptions};
use anora_tui::draw_at;
use vt100_backend::VirtualTerminal;

const WIDTH: u16 = 80;
const HEIGHT: u16 = 24;

struct Harness {
    app: App,
    terminal: Terminal<VirtualTerminal>,
    waitlist: Arc<MemoryWaitlist>,
}

impl Harness {
    async fn new(ui: UiOptions) -> Self {
        let waitlist = Arc::new(MemoryWaitlist::new());
        let settings = AppSettings {
            ui,
            ..AppSettings::default()
        };
        let app = App::with_jitter(settings, waitlist.clone(), FixedJitter(0.5));
        tokio::task::yield_now().await;
        Self {
            app,
            terminal: Terminal::new(VirtualTerminal::new(WIDTH, HEIGHT)).unwrap(),
            waitlist,
        }
    }

    fn area() -> Rect {
        Rect::new(0, 0, WIDTH, HEIGHT)
    }

    fn render(&mut self) -> &VirtualTerminal {
        let app = &self.app;
        self.terminal
            .draw(|frame| draw_at(frame, app, Instant::now()))
            .unwrap();
        self.terminal.backend()
    }

    fn send(&mut self, event: Event) {
        anora_tui::apply_event(&mut self.app, event, Self::area());
    }

    fn key(&mut self, code: KeyCode) {
        self.send(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.key(KeyCode::Char(c));
        }
    }

    fn click(&mut self, at: Position) {
        self.send(Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: at.x,
            row: at.y,
            modifiers: KeyModifiers::NONE,
        }));
    }

    async fn advance(&mut self, total: Duration) {
        let frame = Duration::from_millis(10);
        let mut elapsed = Duration::ZERO;
        while elapsed < total {
            tokio::time::advance(frame).await;
            tokio::task::yield_now().await;
            self.app.tick(Instant::now());
            elapsed += frame;
        }
    }
}

#[tokio::test(start_paused = true)]
async fn idle_screen_shows_prompt_button_and_hints() {
    let mut harness = Harness::new(UiOptions::default()).await;
    let screen = harness.render();

    let button = screen.find("join the waitlist").expect("button is drawn");
    let prompt = screen.find("$ ").expect("prompt is drawn");
    assert!(prompt.y < button.y);
    assert!(screen.contents().contains("enter join"));
}

#[tokio::test(start_paused = true)]
async fn clicking_the_drawn_button_opens_the_name_field() {
    let mut harness = Harness::new(UiOptions::default()).await;
    let button = harness.render().find("join the waitlist").unwrap();

    harness.click(button);
    assert_eq!(harness.app.step(), FormStep::NameEntry);

    harness.advance(Duration::from_millis(200)).await;
    let screen = harness.render();
    let placeholder = screen.find("your name").expect("name field is drawn");
    assert!(!screen.contents().contains("join the waitlist"));
    assert_eq!(screen.cursor().y, placeholder.y);
}

#[tokio::test(start_paused = true)]
async fn click_beside_the_widget_dismisses_the_form() {
    let mut harness = Harness::new(UiOptions::default()).await;
    harness.key(KeyCode::Enter);
    harness.advance(Duration::from_millis(200)).await;
    harness.type_text("Ada");

    harness.click(Position::new(0, HEIGHT - 1));
    harness.advance(Duration::from_millis(400)).await;

    assert_eq!(harness.app.step(), FormStep::Idle);
    assert!(harness.render().find("join the waitlist").is_some());
}

#[tokio::test(start_paused = true)]
async fn intro_fades_in_from_the_panel_color() {
    let mut harness = Harness::new(UiOptions::default()).await;

    harness.advance(Duration::from_millis(750)).await;
    let screen = harness.render();
    let intro = screen
        .find("order your coffee")
        .expect("intro is drawn mid-fade");
    let mid_fade = screen.foreground(intro);

    harness.advance(Duration::from_millis(700)).await;
    let full = harness.render().foreground(intro);

    assert_eq!(full, Some(vt100::Color::Rgb(200, 192, 147)));
    assert_ne!(mid_fade, full);
}

#[tokio::test(start_paused = true)]
async fn typed_signup_lands_in_the_waitlist() {
    let mut harness = Harness::new(UiOptions::default()).await;
    harness.key(KeyCode::Enter);
    harness.advance(Duration::from_millis(200)).await;
    harness.type_text("Ada");
    assert!(harness.render().find("Ada").is_some());

    harness.key(KeyCode::Enter);
    harness.advance(Duration::from_millis(250)).await;
    assert!(harness.render().find("your email").is_some());

    harness.type_text("ada@example.com");
    harness.key(KeyCode::Enter);
    harness.advance(Duration::from_millis(300)).await;

    assert!(
        harness
            .render()
            .find("you're on the list, Ada")
            .is_some()
    );
    assert_eq!(harness.waitlist.len(), 1);
    assert_eq!(harness.waitlist.snapshot()[0].email, "ada@example.com");
}

#[tokio::test(start_paused = true)]
async fn ascii_mode_draws_only_ascii_controls() {
    let mut harness = Harness::new(UiOptions {
        ascii_only: true,
        ..UiOptions::default()
    })
    .await;
    harness.key(KeyCode::Enter);
    harness.advance(Duration::from_millis(200)).await;
    harness.type_text("Ada");

    let screen = harness.render();
    let row = screen.find("Ada").unwrap().y;
    assert!(screen.row(row).contains(" x "));
    assert!(screen.row(row).contains(" > "));
    assert!(screen.row(row).chars().all(|c| c.is_ascii() || "╭╮╰╯│─".contains(c)));
}
