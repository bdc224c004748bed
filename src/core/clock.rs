//! Frame scheduling: request coalescing across resize and scroll input.
//!
//! The host owns the actual "call me before the next repaint" facility; the
//! scheduler only decides *whether* a frame is wanted and guarantees at most
//! one is ever in flight.

/// Opaque id for a frame the host has promised to deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Host-side animation-frame facility.
pub trait FrameHost {
    /// Monotonic clock in milliseconds.
    fn now_ms(&self) -> f64;
    /// Ask for one frame callback.  The host later calls
    /// [`SmoothScroll::on_frame`](super::engine::SmoothScroll::on_frame).
    fn request_frame(&mut self) -> FrameHandle;
}

/// Which external notification arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Resize,
    Scroll,
}

/// Frame lifecycle.  Only [`FrameScheduler`] transitions between these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameState {
    #[default]
    Idle,
    Scheduled(FrameHandle),
}

/// Pending-work counters plus the single in-flight frame.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    state: FrameState,
    resize_request: u32,
    scroll_request: u32,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a notification.  Returns the timestamp to use as the last frame
    /// time when this call scheduled a fresh frame, `None` when it was
    /// coalesced into the one already pending.
    pub fn notify(&mut self, kind: RequestKind, host: &mut impl FrameHost) -> Option<f64> {
        match kind {
            RequestKind::Resize => self.resize_request = self.resize_request.saturating_add(1),
            RequestKind::Scroll => self.scroll_request = self.scroll_request.saturating_add(1),
        }

        if let FrameState::Scheduled(_) = self.state {
            return None;
        }

        let now = host.now_ms();
        self.state = FrameState::Scheduled(host.request_frame());
        Some(now)
    }

    /// Called after the integrator step.  Re-arms a frame while scroll work
    /// is outstanding, otherwise drops back to idle.
    pub fn finish_frame(&mut self, host: &mut impl FrameHost) -> FrameState {
        self.state = if self.scroll_request > 0 {
            FrameState::Scheduled(host.request_frame())
        } else {
            FrameState::Idle
        };
        self.state
    }

    /// Consume a pending resize.  Returns `true` when one was outstanding.
    pub fn take_resize(&mut self) -> bool {
        let pending = self.resize_request > 0;
        self.resize_request = 0;
        pending
    }

    /// Scroll input has been fully applied.
    pub fn clear_scroll(&mut self) {
        self.scroll_request = 0;
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    pub fn is_scheduled(&self) -> bool {
        matches!(self.state, FrameState::Scheduled(_))
    }

    #[cfg(test)]
    pub fn resize_request(&self) -> u32 {
        self.resize_request
    }

    #[cfg(test)]
    pub fn scroll_request(&self) -> u32 {
        self.scroll_request
    }
}
