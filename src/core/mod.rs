//! Core engine: frame scheduling, layout metrics, parallax registry and the
//! per-frame scroll integrator.
//!
//! Nothing in this module depends on any TUI or rendering crate.  The host is
//! reached only through the traits re-exported here, and everything runs on
//! the host's UI thread.

pub mod clock;
pub mod engine;
pub mod integrator;
pub mod metrics;
pub mod parallax;

pub use clock::{FrameHandle, FrameHost, FrameState, RequestKind};
pub use engine::SmoothScroll;
pub use integrator::{EngineConfig, ScrollSurface};
pub use metrics::LayoutSurface;
pub use parallax::ParallaxNode;
