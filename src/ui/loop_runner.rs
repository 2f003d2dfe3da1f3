//! Main event loop for the TUI.
//!
//! This module contains the core event loop that multiplexes terminal input,
//! background task events, and the frame tick that drives motion.

use crate::app::{App, AppEvent};
use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

use super::input::{handle_input, handle_mouse};
use super::render::render;

/// Frame interval while motion is running (~60 Hz).
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Frame interval while nothing moves; only status expiry needs it.
const IDLE_INTERVAL: Duration = Duration::from_millis(250);

/// Longest step fed to the springs; a stalled loop resumes smoothly.
const MAX_FRAME_STEP: Duration = Duration::from_millis(100);

/// Result of handling an input event.
///
/// Returned by input handlers to signal whether the application should
/// continue running or terminate gracefully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Continue the event loop and process more events.
    Continue,
    /// Exit the application and restore the terminal.
    Quit,
}

/// Runs the TUI application event loop.
///
/// Uses `tokio::select!` to multiplex these event sources:
/// - **Signals**: SIGTERM/SIGINT for graceful shutdown
/// - **Terminal input**: Keys, mouse, and resizes from crossterm's async event stream
/// - **Background tasks**: The mount timer via the `AppEvent` channel
/// - **Frame tick**: 16ms while motion runs, 250ms when idle; advances motion
///   and expires status messages
///
/// # Panic Safety
///
/// Installs a panic hook that restores terminal state before unwinding,
/// ensuring the terminal is not left in raw mode on panic.
pub async fn run(
    app: &mut App,
    event_tx: mpsc::Sender<AppEvent>,
    mut event_rx: mpsc::Receiver<AppEvent>,
) -> Result<()> {
    // Install panic hook BEFORE setting up terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let mut terminal = setup_terminal().context("Failed to set up terminal")?;
    let mut event_stream = crossterm::event::EventStream::new();

    let mut frame_interval = frame_timer(frame_period(app));
    let mut last_frame = Instant::now();

    // Mount: starts the ready timer (or opens the gate at once)
    app.start(&event_tx);

    // Signal handlers for graceful shutdown (Unix only)
    // On non-Unix platforms, these become pending futures that never complete
    #[cfg(unix)]
    let mut sigterm = signal(SignalKind::terminate())?;
    #[cfg(unix)]
    let mut sigint = signal(SignalKind::interrupt())?;

    loop {
        // Only render when state has changed
        if app.needs_redraw {
            terminal.draw(|f| render(f, app))?;
            app.needs_redraw = false;
        }

        // Drain pending app events before handling more input
        while let Ok(event) = event_rx.try_recv() {
            app.handle_event(event);
        }

        let period = frame_period(app);
        if frame_interval.period() != period {
            frame_interval = frame_timer(period);
            // Motion starts from now, not from the last idle tick
            last_frame = Instant::now();
        }

        // Platform-specific signal futures
        #[cfg(unix)]
        let sigterm_fut = sigterm.recv();
        #[cfg(not(unix))]
        let sigterm_fut = std::future::pending::<Option<()>>();

        #[cfg(unix)]
        let sigint_fut = sigint.recv();
        #[cfg(not(unix))]
        let sigint_fut = std::future::pending::<Option<()>>();

        tokio::select! {
            biased;  // Process in order listed for predictable behavior

            // Signal handlers for graceful shutdown (highest priority)
            _ = sigterm_fut => {
                tracing::info!("Received SIGTERM, shutting down gracefully");
                break;
            }

            _ = sigint_fut => {
                tracing::info!("Received SIGINT, shutting down gracefully");
                break;
            }

            // Terminal input events
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        app.needs_redraw = true;
                        if handle_input(app, key.code, key.modifiers) == Action::Quit {
                            break;
                        }
                    }
                    Some(Ok(Event::Mouse(mouse))) => {
                        if handle_mouse(app, mouse) == Action::Quit {
                            break;
                        }
                    }
                    Some(Ok(Event::Resize(..))) => app.needs_redraw = true,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::warn!(error = %e, "Terminal event stream error");
                    }
                    None => {
                        tracing::info!("Terminal event stream closed");
                        break;
                    }
                }
            }

            // Background task events (blocking recv for when queue was empty)
            Some(event) = event_rx.recv() => {
                app.handle_event(event);
            }

            _ = frame_interval.tick() => {
                handle_frame(app, &mut last_frame);
            }
        }
    }

    restore_terminal(terminal)?;
    Ok(())
}

/// Tick rate for the current state: full rate while motion runs.
fn frame_period(app: &App) -> Duration {
    if app.is_animating() {
        FRAME_INTERVAL
    } else {
        IDLE_INTERVAL
    }
}

fn frame_timer(period: Duration) -> tokio::time::Interval {
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

/// Advance motion by the real time since the last frame and expire status.
fn handle_frame(app: &mut App, last_frame: &mut Instant) {
    let now = Instant::now();
    let dt = now.duration_since(*last_frame).min(MAX_FRAME_STEP);
    *last_frame = now;

    if app.is_animating() && app.tick(dt) {
        app.needs_redraw = true;
    }

    // Clear expired status messages and trigger redraw if cleared
    if app.clear_expired_status() {
        app.needs_redraw = true;
    }
}

/// Set up the terminal for TUI rendering.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state.
fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    Ok(())
}
