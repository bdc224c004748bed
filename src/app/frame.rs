//! Terminal frame facility: animation frames for the event loop.
//!
//! A requested frame becomes a deadline `interval` from now; the main loop
//! sleeps until it and then hands the frame to the engine.

use std::time::{Duration, Instant};

use crate::core::{FrameHandle, FrameHost};

#[derive(Debug)]
pub struct TerminalFrames {
    start: Instant,
    interval: Duration,
    next_id: u64,
    pending: Option<(FrameHandle, Instant)>,
    /// When the last frame fired.  The clock never reads earlier than this.
    last_fired: Instant,
}

impl TerminalFrames {
    pub fn new(interval: Duration) -> Self {
        let start = Instant::now();
        Self {
            start,
            interval,
            next_id: 0,
            pending: None,
            last_fired: start,
        }
    }

    /// When the pending frame is due, if there is one.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|(_, at)| at)
    }

    /// Hand out the pending frame once its deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> Option<FrameHandle> {
        match self.pending {
            Some((handle, at)) if at <= now => {
                self.pending = None;
                self.last_fired = self.last_fired.max(now);
                Some(handle)
            }
            _ => None,
        }
    }

    fn clock(&self) -> Instant {
        Instant::now().max(self.last_fired)
    }

    /// Milliseconds since start for a given instant.
    pub fn ms_at(&self, at: Instant) -> f64 {
        at.saturating_duration_since(self.start).as_secs_f64() * 1000.0
    }
}

impl FrameHost for TerminalFrames {
    fn now_ms(&self) -> f64 {
        self.ms_at(self.clock())
    }

    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending = Some((handle, self.clock() + self.interval));
        handle
    }
}
