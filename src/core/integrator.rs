//! Scroll integrator: the per-frame update.
//!
//! Each frame turns elapsed wall-clock time into a time-corrected smoothing
//! factor `dt = 1 - (1 - ease)^(elapsed * target_fpms)` and moves the smoothed
//! scroll position and every parallax offset toward their targets by that
//! fraction.  Values within `end_threshold` of their target snap to it.

use super::metrics::{LayoutMetrics, LayoutSurface};
use super::parallax::{ParallaxItem, ParallaxNode};

/// Raw scroll input and the primary transform write.
pub trait ScrollSurface: LayoutSurface {
    /// Instantaneous scroll position of the scroll container.
    fn scroll_top(&self) -> f64;
    /// Write the vertical translation of the scrolled content.
    fn set_target_translate(&mut self, px: f64);
}

/// Tuning constants, fixed once the engine is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Smoothing factor in `(0, 1)`; the fraction covered per reference frame.
    pub ease: f64,
    /// Offset in pixels of a full-depth item one `max_distance` away.
    pub max_offset: f64,
    /// Depth that maps to a depth ratio of 1.
    pub max_depth: f64,
    pub end_threshold: f64,
    /// Upper bound on a single frame's elapsed time.
    pub max_elapsed_ms: f64,
    /// Reference frames per millisecond (0.06 = 60 fps).
    pub target_fpms: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ease: 0.1,
            max_offset: 500.0,
            max_depth: 10.0,
            end_threshold: 0.05,
            max_elapsed_ms: 100.0,
            target_fpms: 0.06,
        }
    }
}

impl EngineConfig {
    /// Pull every field back into a range the integrator can work with.
    pub fn validated(self) -> Self {
        let d = Self::default();
        let positive_or = |v: f64, fallback: f64| if v.is_finite() && v > 0.0 { v } else { fallback };
        Self {
            ease: if self.ease.is_finite() {
                self.ease.clamp(0.001, 0.999)
            } else {
                d.ease
            },
            max_offset: if self.max_offset.is_finite() {
                self.max_offset
            } else {
                d.max_offset
            },
            max_depth: positive_or(self.max_depth, d.max_depth),
            end_threshold: positive_or(self.end_threshold, d.end_threshold),
            max_elapsed_ms: positive_or(self.max_elapsed_ms, d.max_elapsed_ms),
            target_fpms: positive_or(self.target_fpms, d.target_fpms),
        }
    }
}

/// Mutable scroll state, owned by the integrator.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollState {
    /// Smoothed position.
    pub current_scroll: f64,
    /// Latest raw input.
    pub end_scroll: f64,
    pub metrics: LayoutMetrics,
    pub last_frame_time: f64,
}

/// What one frame did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOutcome {
    pub dt: f64,
    pub resized: bool,
    /// The smoothed scroll reached the raw input this frame.
    pub settled: bool,
}

/// Time-corrected exponential smoothing factor.
pub fn smoothing_factor(ease: f64, delta_time: f64) -> f64 {
    1.0 - (1.0 - ease).powf(delta_time)
}

/// Round to the nearest integer, halves toward positive infinity.
pub fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Move `current` toward `target` by `dt`, snapping inside `threshold`.
fn ease_toward(current: f64, target: f64, dt: f64, threshold: f64) -> f64 {
    let next = current + (target - current) * dt;
    if (target - next).abs() < threshold {
        target
    } else {
        next
    }
}

#[derive(Debug)]
pub struct ScrollIntegrator {
    config: EngineConfig,
    state: ScrollState,
}

impl ScrollIntegrator {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config: config.validated(),
            state: ScrollState::default(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> &ScrollState {
        &self.state
    }

    pub fn set_last_frame_time(&mut self, time: f64) {
        self.state.last_frame_time = time;
    }

    /// Smoothing factor for a frame arriving at `current_time`.
    pub fn frame_dt(&self, current_time: f64) -> f64 {
        let elapsed_ms = (current_time - self.state.last_frame_time).clamp(0.0, self.config.max_elapsed_ms);
        smoothing_factor(self.config.ease, elapsed_ms * self.config.target_fpms)
    }

    /// Advance one frame.
    ///
    /// `resized` forces a metrics recompute and an exact snap of the smoothed
    /// scroll to the raw input.  Item offsets also snap on the frame the
    /// scroll settles, so an idle engine leaves nothing mid-flight.
    pub fn step<N: ParallaxNode>(
        &mut self,
        current_time: f64,
        resized: bool,
        surface: &mut impl ScrollSurface,
        items: &mut [ParallaxItem<N>],
    ) -> FrameOutcome {
        let dt = self.frame_dt(current_time);
        let threshold = self.config.end_threshold;

        if resized {
            self.state.metrics = LayoutMetrics::recompute(surface);
        }

        let scroll_y = surface.scroll_top();
        self.state.end_scroll = scroll_y;

        let mut current = self.state.current_scroll + (scroll_y - self.state.current_scroll) * dt;
        let settled = (scroll_y - current).abs() < threshold || resized;
        if settled {
            current = scroll_y;
        }
        self.state.current_scroll = current;

        let metrics = self.state.metrics;
        let scroll_origin = current + metrics.half_view_height;
        surface.set_target_translate(-current);

        for item in items.iter_mut() {
            let distance = scroll_origin - item.top_anchor;
            let offset_ratio = if metrics.max_distance > 0.0 {
                distance / metrics.max_distance
            } else {
                0.0
            };
            item.end_offset = round_half_up(self.config.max_offset * item.depth_ratio * offset_ratio);
            item.current_offset = if settled {
                item.end_offset
            } else {
                ease_toward(item.current_offset, item.end_offset, dt, threshold)
            };

            if let Some(node) = item.target.upgrade() {
                node.set_translate_y(-round_half_up(item.current_offset));
            }
        }

        self.state.last_frame_time = current_time;

        tracing::trace!(dt, current, scroll_y, settled, "frame");

        FrameOutcome { dt, resized, settled }
    }
}
