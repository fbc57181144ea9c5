//! Anora CLI - Binary entry point and terminal session management.
//!
//! # Architecture
//!
//! The CLI bridges [`anora_engine`] (application state) and [`anora_tui`] (rendering),
//! providing RAII-based terminal management with guaranteed cleanup.
//!
//! ```text
//! main() -> Cli::parse() -> run_tui() -> TerminalSession::new() -> run_app() -> App + TUI
//!                        \-> commands::run()   (waitlist / config subcommands)
//! ```
//!
//! # Event Loop
//!
//! The landing screen uses a fixed 8ms (~120 FPS) render cadence:
//!
//! 1. Wait for frame tick
//! 2. Drain input queue (non-blocking via [`anora_tui::InputPump`])
//! 3. Advance application state (`app.tick(now)`): animation view, form timers,
//!    settled submissions
//! 4. Render frame
//! 5. Check for quit

mod args;
mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use std::{
    fs::{self, OpenOptions},
    io::{Stdout, Write, stdout},
    path::PathBuf,
    sync::{Arc, Mutex},
    time::Duration,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use anora_config::{AnoraConfig, resolve_endpoint};
use anora_engine::{App, AppSettings, MemoryWaitlist, WaitlistBackend, select_backend};
use anora_tui::{InputPump, draw, handle_events};

use crate::args::Cli;

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Logging for the landing screen. The TUI owns stdout, so logs go to a file.
fn init_tracing() {
    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter())
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // If we can't open a log file, prefer "no logs" over corrupting the TUI
    // by writing to stdout/stderr.
    tracing_subscriber::registry().with(env_filter()).init();
}

/// Logging for subcommands, which own a plain terminal.
fn init_stderr_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter())
        .init();
}

fn open_log_file() -> (Option<(PathBuf, std::fs::File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&candidate)
        {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: next to the config file, ~/.anora/logs/anora.log
    if let Some(config_path) = AnoraConfig::path()
        && let Some(config_dir) = config_path.parent()
    {
        candidates.push(config_dir.join("logs").join("anora.log"));
    }

    // Fallback: ./.anora/logs/anora.log
    candidates.push(PathBuf::from(".anora").join("logs").join("anora.log"));

    candidates
}

/// RAII wrapper for terminal state with guaranteed cleanup on drop.
///
/// Enables raw mode, bracketed paste, mouse capture (for clicks on the form) and
/// the alternate screen. On drop, all terminal state is restored, so the terminal
/// stays usable after panics or early returns.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self> {
        enable_raw_mode()?;

        let mut out = stdout();
        if let Err(err) = execute!(
            out,
            EnterAlternateScreen,
            EnableBracketedPaste,
            EnableMouseCapture
        ) {
            restore_terminal(&mut out);
            return Err(err.into());
        }

        match Terminal::new(CrosstermBackend::new(out)) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(err) => {
                restore_terminal(&mut stdout());
                Err(err.into())
            }
        }
    }
}

fn restore_terminal(out: &mut impl Write) {
    let _ = disable_raw_mode();
    let _ = execute!(
        out,
        DisableMouseCapture,
        DisableBracketedPaste,
        LeaveAlternateScreen
    );
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        restore_terminal(self.terminal.backend_mut());
        let _ = self.terminal.show_cursor();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None => run_tui(cli.offline).await,
        Some(command) => {
            init_stderr_tracing();
            let config = AnoraConfig::load().ok().flatten();
            commands::run(command, config.as_ref()).await
        }
    }
}

async fn run_tui(offline: bool) -> Result<()> {
    init_tracing();

    let config = AnoraConfig::load().ok().flatten();
    let settings = AppSettings::from_config(config.as_ref());
    let backend: Arc<dyn WaitlistBackend> = if offline {
        tracing::info!("Offline mode: signups are kept in memory");
        Arc::new(MemoryWaitlist::new())
    } else {
        let endpoint = resolve_endpoint(config.as_ref());
        select_backend(
            &endpoint,
            config.as_ref().and_then(AnoraConfig::request_timeout),
        )?
    };

    let mut app = App::new(settings, backend);
    tracing::info!(backend = %app.backend_label(), "Landing screen starting");

    let result = {
        let mut session = TerminalSession::new().context("failed to set up the terminal")?;
        run_app(&mut session.terminal, &mut app).await
    };

    app.shutdown();
    if app.in_flight() > 0 {
        tracing::warn!(
            in_flight = app.in_flight(),
            "Exiting with waitlist submissions still in flight"
        );
    }

    if let Err(err) = &result {
        tracing::error!("{err:?}");
        eprintln!("Error: {err:?}");
    }
    result
}

const FRAME_DURATION: Duration = Duration::from_millis(8);

async fn run_app<B>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B: Backend,
    B::Error: Send + Sync + 'static,
{
    let mut input = InputPump::new();
    let mut frames = tokio::time::interval(FRAME_DURATION);
    frames.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut area = Rect::default();

    let result: Result<()> = loop {
        frames.tick().await;

        // Non-blocking input (drain queue only)
        let quit_now = match handle_events(app, &mut input, area) {
            Ok(q) => q,
            Err(e) => break Err(e),
        };
        if quit_now {
            break Ok(());
        }

        app.tick(tokio::time::Instant::now());

        if let Err(e) = terminal.draw(|frame| {
            area = frame.area();
            draw(frame, app);
        }) {
            break Err(e.into());
        }
    };

    input.shutdown().await;
    result
}
