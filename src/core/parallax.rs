//! Parallax registry: the set of depth-tagged nodes and their smoothing history.
//!
//! Items keep only a [`Weak`] handle to their node; the page owns node
//! lifetimes.  A node that has been dropped is pruned on the next frame.

use std::rc::{Rc, Weak};

/// A renderable node the engine can offset vertically.
pub trait ParallaxNode {
    /// Raw value of the node's depth marker, `None` when it carries none.
    fn depth_attribute(&self) -> Option<&str>;
    /// Top edge relative to the viewport at the current scroll position.
    fn bounding_top(&self) -> f64;
    /// Write the node's vertical translation in pixels.
    fn set_translate_y(&self, px: f64);
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DepthError {
    #[error("depth attribute is empty")]
    Empty,
    #[error("depth attribute {0:?} is not a number")]
    NotANumber(String),
    #[error("depth attribute {0:?} is not finite")]
    NotFinite(String),
}

/// Parse an authored depth value.
pub fn parse_depth(raw: &str) -> Result<f64, DepthError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DepthError::Empty);
    }
    let depth: f64 = trimmed
        .parse()
        .map_err(|_| DepthError::NotANumber(raw.to_string()))?;
    if !depth.is_finite() {
        return Err(DepthError::NotFinite(raw.to_string()));
    }
    Ok(depth)
}

/// One tracked node.
#[derive(Debug)]
pub struct ParallaxItem<N> {
    pub target: Weak<N>,
    pub depth: f64,
    pub depth_ratio: f64,
    /// Absolute top captured at registration; never re-measured.
    pub top_anchor: f64,
    pub current_offset: f64,
    pub end_offset: f64,
}

/// Registration-ordered list of [`ParallaxItem`]s.
#[derive(Debug)]
pub struct ParallaxRegistry<N> {
    items: Vec<ParallaxItem<N>>,
}

impl<N> Default for ParallaxRegistry<N> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<N: ParallaxNode> ParallaxRegistry<N> {
    /// Scan `nodes` and track every one carrying a depth marker.
    ///
    /// `scroll_top` converts each node's viewport-relative top into an
    /// absolute anchor.  Replaces any previous registration.
    pub fn register(&mut self, nodes: &[Rc<N>], scroll_top: f64, max_depth: f64) {
        self.items.clear();

        for node in nodes {
            let Some(raw) = node.depth_attribute() else {
                continue;
            };
            let depth = parse_depth(raw).unwrap_or_else(|err| {
                tracing::warn!("ignoring parallax depth: {err}");
                0.0
            });

            self.items.push(ParallaxItem {
                target: Rc::downgrade(node),
                depth,
                depth_ratio: depth / max_depth,
                top_anchor: node.bounding_top() + scroll_top,
                current_offset: 0.0,
                end_offset: 0.0,
            });
        }

        tracing::debug!(count = self.items.len(), "parallax items registered");
    }
}

impl<N> ParallaxRegistry<N> {
    pub fn items(&self) -> &[ParallaxItem<N>] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut [ParallaxItem<N>] {
        &mut self.items
    }

    /// Drop entries whose node no longer exists.  Returns how many went.
    pub fn prune(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|item| item.target.strong_count() > 0);
        let removed = before - self.items.len();
        if removed > 0 {
            tracing::debug!(removed, "pruned dead parallax items");
        }
        removed
    }
}
