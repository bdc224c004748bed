//! The engine facade: one scheduler, one integrator, one parallax registry.
//!
//! Hosts feed it notifications and frame callbacks; it never touches a clock
//! or a renderer directly.

use std::rc::Rc;

use super::clock::{FrameHost, FrameScheduler, FrameState, RequestKind};
use super::integrator::{EngineConfig, FrameOutcome, ScrollIntegrator, ScrollState, ScrollSurface};
use super::parallax::{ParallaxItem, ParallaxNode, ParallaxRegistry};

/// Damped scroll follower with depth-weighted parallax.
#[derive(Debug)]
pub struct SmoothScroll<N> {
    scheduler: FrameScheduler,
    integrator: ScrollIntegrator,
    registry: ParallaxRegistry<N>,
}

impl<N: ParallaxNode> SmoothScroll<N> {
    /// Build the engine and register every depth-tagged node in `nodes`.
    ///
    /// Nothing is scheduled yet; post a [`RequestKind::Resize`] to take the
    /// first measurement.
    pub fn new(config: EngineConfig, nodes: &[Rc<N>], surface: &impl ScrollSurface) -> Self {
        let integrator = ScrollIntegrator::new(config);
        let mut registry = ParallaxRegistry::default();
        registry.register(nodes, surface.scroll_top(), integrator.config().max_depth);
        Self {
            scheduler: FrameScheduler::new(),
            integrator,
            registry,
        }
    }

    /// Re-scan nodes, e.g. after the page content changed.  Offsets restart at zero.
    pub fn rescan(&mut self, nodes: &[Rc<N>], surface: &impl ScrollSurface) {
        let max_depth = self.integrator.config().max_depth;
        self.registry.register(nodes, surface.scroll_top(), max_depth);
    }

    /// External resize / scroll notification.
    pub fn notify(&mut self, kind: RequestKind, host: &mut impl FrameHost) {
        if let Some(now) = self.scheduler.notify(kind, host) {
            self.integrator.set_last_frame_time(now);
            tracing::trace!(?kind, now, "frame scheduled");
        }
    }

    /// Frame callback from the host.
    pub fn on_frame(
        &mut self,
        current_time: f64,
        host: &mut impl FrameHost,
        surface: &mut impl ScrollSurface,
    ) -> FrameOutcome {
        self.registry.prune();

        let resized = self.scheduler.take_resize();
        let outcome = self
            .integrator
            .step(current_time, resized, surface, self.registry.items_mut());

        if outcome.settled {
            self.scheduler.clear_scroll();
        }

        if self.scheduler.finish_frame(host) == FrameState::Idle {
            tracing::debug!(
                scroll = self.integrator.state().current_scroll,
                "scroll settled"
            );
        }

        outcome
    }

    pub fn state(&self) -> &ScrollState {
        self.integrator.state()
    }

    pub fn items(&self) -> &[ParallaxItem<N>] {
        self.registry.items()
    }

    pub fn frame_state(&self) -> FrameState {
        self.scheduler.state()
    }

    /// `true` while a frame is pending.
    pub fn is_animating(&self) -> bool {
        self.scheduler.is_scheduled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::tests::RecordingHost;
    use crate::core::integrator::tests::FakeSurface;
    use crate::core::parallax::tests::FakeNode;

    /// Pump frames until the engine goes idle; returns how many ran.
    fn run_until_idle(
        engine: &mut SmoothScroll<FakeNode>,
        host: &mut RecordingHost,
        surface: &mut FakeSurface,
    ) -> usize {
        let mut frames = 0;
        while engine.is_animating() {
            host.now += 16.0;
            engine.on_frame(host.now, host, surface);
            frames += 1;
            assert!(frames < 10_000, "engine never settled");
        }
        frames
    }

    #[test]
    fn starts_idle_until_notified() {
        let surface = FakeSurface::new(4000.0, 800.0);
        let nodes = vec![FakeNode::new(Some("3"), 1200.0)];
        let engine = SmoothScroll::new(EngineConfig::default(), &nodes, &surface);

        assert_eq!(engine.frame_state(), FrameState::Idle);
        assert_eq!(engine.items().len(), 1);
        assert_eq!(engine.state().current_scroll, 0.0);
    }

    #[test]
    fn first_resize_measures_and_settles_in_one_frame() {
        let mut host = RecordingHost::default();
        let mut surface = FakeSurface::new(4000.0, 800.0);
        let mut engine = SmoothScroll::<FakeNode>::new(EngineConfig::default(), &[], &surface);

        engine.notify(RequestKind::Resize, &mut host);
        assert_eq!(run_until_idle(&mut engine, &mut host, &mut surface), 1);
        assert_eq!(surface.layout.spacer, Some(4000.0));
        assert_eq!(engine.state().metrics.half_view_height, 400.0);
    }

    #[test]
    fn scroll_animates_then_stops_requesting_frames() {
        let mut host = RecordingHost::default();
        let mut surface = FakeSurface::new(8000.0, 800.0);
        let nodes = vec![FakeNode::new(Some("5"), 1000.0)];
        let mut engine = SmoothScroll::new(EngineConfig::default(), &nodes, &surface);
        engine.notify(RequestKind::Resize, &mut host);
        run_until_idle(&mut engine, &mut host, &mut surface);

        surface.scroll = 1000.0;
        engine.notify(RequestKind::Scroll, &mut host);
        engine.notify(RequestKind::Scroll, &mut host);
        let frames = run_until_idle(&mut engine, &mut host, &mut surface);
        assert!(frames > 1);
        assert_eq!(engine.state().current_scroll, 1000.0);
        assert_eq!(engine.items()[0].current_offset, 63.0);
        assert_eq!(nodes[0].translate.get(), -63.0);

        let requested = host.requested.len();
        host.now += 1000.0;
        assert!(!engine.is_animating());
        assert_eq!(host.requested.len(), requested);
    }

    #[test]
    fn resize_mid_animation_snaps() {
        let mut host = RecordingHost::default();
        let mut surface = FakeSurface::new(8000.0, 800.0);
        let mut engine = SmoothScroll::<FakeNode>::new(EngineConfig::default(), &[], &surface);
        engine.notify(RequestKind::Resize, &mut host);
        run_until_idle(&mut engine, &mut host, &mut surface);

        surface.scroll = 3000.0;
        engine.notify(RequestKind::Scroll, &mut host);
        host.now += 16.0;
        engine.on_frame(host.now, &mut host, &mut surface);
        assert!(engine.state().current_scroll < 3000.0);
        assert!(engine.is_animating());

        surface.layout.viewport = Some(600.0);
        engine.notify(RequestKind::Resize, &mut host);
        host.now += 16.0;
        let out = engine.on_frame(host.now, &mut host, &mut surface);
        assert!(out.resized);
        assert_eq!(engine.state().current_scroll, 3000.0);
        assert_eq!(engine.state().metrics.view_height, 600.0);
        assert!(!engine.is_animating());
    }

    #[test]
    fn dropped_nodes_leave_the_registry() {
        let mut host = RecordingHost::default();
        let mut surface = FakeSurface::new(8000.0, 800.0);
        let mut nodes = vec![FakeNode::new(Some("5"), 100.0), FakeNode::new(Some("2"), 900.0)];
        let mut engine = SmoothScroll::new(EngineConfig::default(), &nodes, &surface);

        nodes.truncate(1);
        engine.notify(RequestKind::Resize, &mut host);
        run_until_idle(&mut engine, &mut host, &mut surface);
        assert_eq!(engine.items().len(), 1);
        assert_eq!(engine.items()[0].depth, 5.0);
    }

    #[test]
    fn rescan_replaces_items() {
        let surface = FakeSurface::new(8000.0, 800.0);
        let first = vec![FakeNode::new(Some("5"), 100.0)];
        let mut engine = SmoothScroll::new(EngineConfig::default(), &first, &surface);

        let second = vec![FakeNode::new(Some("1"), 10.0), FakeNode::new(Some("9"), 20.0)];
        engine.rescan(&second, &surface);
        assert_eq!(engine.items().len(), 2);
        assert_eq!(engine.items()[1].depth_ratio, 0.9);
    }
}
