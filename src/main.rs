//! Damped smooth scrolling with depth-weighted parallax, in the terminal.
//!
//! Run the binary to scroll the built-in demo page, or pass `--page FILE`
//! to scroll your own.  Run with `--write-config` to dump the effective
//! configuration to the config file.

mod app;
mod config;
mod core;
mod page;
mod ui;

use std::io::{self, stderr};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, widgets::Paragraph, Terminal};

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    handler,
    state::AppState,
};
use crate::core::FrameState;
use crate::page::Page;
use crate::ui::{layout::AppLayout, page_widget::PageWidget, spinner::FrameIndicator, theme::Theme};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Smooth-scrolling parallax page viewer")]
struct Cli {
    /// Page file to scroll (defaults to the built-in demo page).
    #[arg(long)]
    page: Option<PathBuf>,

    /// Smoothing factor in (0, 1); lower is smoother.
    #[arg(long)]
    ease: Option<f64>,

    /// Parallax offset in pixels for a full-depth block.
    #[arg(long)]
    max_offset: Option<f64>,

    /// Write the effective configuration to the config file and exit.
    #[arg(long = "write-config")]
    write_config: bool,
}

/// Build the status-bar line from the current engine state.
fn status_line(state: &AppState) -> String {
    if let Some(msg) = state.status_message.as_deref() {
        return msg.to_string();
    }
    let scroll = state.engine.state();
    let frame = match state.engine.frame_state() {
        FrameState::Idle => "idle".to_string(),
        FrameState::Scheduled(handle) => format!("frame #{}", handle.0),
    };
    format!(
        " raw {:.0}px | smooth {:.1}px | {} | {} | ↑↓ PgUp/PgDn scroll, r reload, q quit",
        scroll.end_scroll,
        scroll.current_scroll,
        state.layer_summary(),
        frame,
    )
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing (only when RUST_LOG is set).
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr) // never pollute stdout
        .init();

    let cli = Cli::parse();

    let mut config = config::AppConfig::load();
    if let Some(ease) = cli.ease {
        config.engine.ease = ease;
    }
    if let Some(max_offset) = cli.max_offset {
        config.engine.max_offset = max_offset;
    }
    config.engine = config.engine.validated();

    if cli.write_config {
        let path = config.save()?;
        println!("{}", path.display());
        return Ok(());
    }

    // ── load the page ─────────────────────────────────────────
    let page = match &cli.page {
        Some(path) => Page::load(path, config.row_px)?,
        None => Page::demo(config.row_px)?,
    };

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size().context("reading terminal size")?;
    let viewport_rows = AppLayout::viewport_rows(size.width, size.height);
    let mut state = AppState::new(page, config, cli.page.clone(), viewport_rows);

    let mut events = spawn_event_reader(Duration::from_millis(100));

    // ── event loop ────────────────────────────────────────────
    loop {
        terminal.draw(|frame| {
            let layout = AppLayout::from_area(frame.area());
            frame.render_widget(PageWidget::new(&state.page), layout.page_area);
            frame.render_widget(
                FrameIndicator {
                    visible: state.engine.is_animating(),
                    frame: state.frame_count,
                },
                layout.page_area,
            );
            let status = Paragraph::new(status_line(&state)).style(Theme::status_bar_style());
            frame.render_widget(status, layout.status_area);
        })?;

        // Idle engines wait on input alone.
        let deadline = state.frames.deadline();
        let sleep_until = tokio::time::Instant::from_std(
            deadline.unwrap_or_else(|| Instant::now() + Duration::from_secs(3600)),
        );

        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                // Any input replaces a transient message.
                state.status_message = None;
                match event {
                    AppEvent::Key(k) => handler::handle_key(&mut state, k),
                    AppEvent::Mouse(m) => handler::handle_mouse(&mut state, m),
                    AppEvent::Resize(cols, rows) => {
                        state.resize(AppLayout::viewport_rows(cols, rows));
                    }
                }
            }

            _ = tokio::time::sleep_until(sleep_until), if deadline.is_some() => {}

            else => break,
        }

        // Input bursts must not starve a frame that is already due.
        state.run_due_frame(Instant::now());

        if state.should_quit {
            break;
        }
    }

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}
