//! Central application state.
//!
//! The page, the engine driving it, and the frame facility live side by side
//! so a frame can borrow each of them independently.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::config::AppConfig;
use crate::core::metrics::LayoutMetrics;
use crate::core::{RequestKind, ScrollSurface, SmoothScroll};
use crate::page::{Page, PageError, PageNode};

use super::frame::TerminalFrames;

/// Top-level application state.
pub struct AppState {
    /// The document being scrolled.
    pub page: Page,
    pub engine: SmoothScroll<PageNode>,
    pub frames: TerminalFrames,
    pub config: AppConfig,
    /// Page file, if the page was loaded from disk (enables reload).
    pub page_source: Option<PathBuf>,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// Frames run so far (drives the activity spinner).
    pub frame_count: u64,
    /// Height of the page area in terminal rows.
    pub viewport_rows: u16,
}

impl AppState {
    /// Wire the engine to `page` and queue the first layout pass.
    pub fn new(mut page: Page, config: AppConfig, page_source: Option<PathBuf>, viewport_rows: u16) -> Self {
        page.set_viewport_rows(viewport_rows);
        // Blocks after a horizontal track only reach their final position once
        // the wrapper is sized; anchors must be taken after that.
        LayoutMetrics::recompute(&mut page);
        let engine = SmoothScroll::new(config.engine, page.nodes(), &page);
        let frames = TerminalFrames::new(Duration::from_millis(config.frame_interval_ms));

        let mut state = Self {
            page,
            engine,
            frames,
            config,
            page_source,
            should_quit: false,
            status_message: None,
            frame_count: 0,
            viewport_rows,
        };
        state.engine.notify(RequestKind::Resize, &mut state.frames);
        state
    }

    /// Move the raw scroll position and let the engine catch up.
    pub fn scroll_by(&mut self, dy: f64) {
        if self.page.scroll_by(dy) {
            self.engine.notify(RequestKind::Scroll, &mut self.frames);
        }
    }

    pub fn scroll_to(&mut self, y: f64) {
        if self.page.scroll_to(y) {
            self.engine.notify(RequestKind::Scroll, &mut self.frames);
        }
    }

    /// One viewport's worth of raw scroll, a little less for overlap.
    pub fn page_step(&self) -> f64 {
        let view = self.engine.state().metrics.view_height;
        (view * 0.9).max(self.config.wheel_step_px)
    }

    pub fn resize(&mut self, viewport_rows: u16) {
        self.viewport_rows = viewport_rows;
        self.page.set_viewport_rows(viewport_rows);
        self.engine.notify(RequestKind::Resize, &mut self.frames);
    }

    /// Run the pending frame if it is due.  Returns `true` when one ran.
    pub fn run_due_frame(&mut self, now: Instant) -> bool {
        if self.frames.take_due(now).is_none() {
            return false;
        }
        let current_time = self.frames.ms_at(now);
        self.engine.on_frame(current_time, &mut self.frames, &mut self.page);
        self.frame_count = self.frame_count.wrapping_add(1);
        true
    }

    /// Layer count and depth range for the status bar.
    pub fn layer_summary(&self) -> String {
        let items = self.engine.items();
        let Some(first) = items.first() else {
            return "no layers".to_string();
        };
        let (lo, hi) = items
            .iter()
            .fold((first.depth, first.depth), |(lo, hi), item| (lo.min(item.depth), hi.max(item.depth)));
        format!("{} layers, depth {lo}..{hi}", items.len())
    }

    /// Re-read the page file and re-register its parallax blocks.
    pub fn reload(&mut self) -> Result<(), PageError> {
        let Some(path) = self.page_source.clone() else {
            self.status_message = Some("Built-in page: nothing to reload".into());
            return Ok(());
        };

        let mut page = Page::load(&path, self.config.row_px)?;
        page.set_viewport_rows(self.viewport_rows);
        // The spacer bounds the raw scroll, so measure before restoring it.
        LayoutMetrics::recompute(&mut page);
        page.scroll_to(self.page.raw_scroll());
        page.set_target_translate(-self.engine.state().current_scroll);

        self.page = page;
        self.engine.rescan(self.page.nodes(), &self.page);
        self.engine.notify(RequestKind::Resize, &mut self.frames);
        self.status_message = Some(format!("Reloaded {}", path.display()));
        tracing::debug!(path = %path.display(), items = self.engine.items().len(), "page reloaded");
        Ok(())
    }
}
