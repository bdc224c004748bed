//! In-memory page: a vertical stack of text blocks plus an optional
//! horizontal track, measured in pixels.
//!
//! [`Page`] is the engine's host surface.  It stores the raw scroll position,
//! the spacer height the engine writes on resize, and the content translation.

use std::cell::Cell;
use std::rc::Rc;

use crate::core::{LayoutSurface, ParallaxNode, ScrollSurface};

/// One text block.  Shared with the engine through `Rc`/`Weak`.
#[derive(Debug)]
pub struct PageNode {
    pub title: Option<String>,
    pub lines: Vec<String>,
    /// Raw depth marker, validated by the engine on registration.
    pub depth: Option<String>,
    /// Height in pixels.
    pub height: f64,
    /// Top edge within the unscrolled content.
    layout_top: Cell<f64>,
    /// Parallax translation written by the engine.
    translate: Cell<f64>,
    /// Content translation, shared by every node of a page.
    content_shift: Rc<Cell<f64>>,
}

impl PageNode {
    #[cfg(test)]
    pub fn layout_top(&self) -> f64 {
        self.layout_top.get()
    }

    /// Where the block is drawn, relative to the viewport top.
    pub fn screen_top(&self) -> f64 {
        self.layout_top.get() + self.content_shift.get() + self.translate.get()
    }
}

impl ParallaxNode for PageNode {
    fn depth_attribute(&self) -> Option<&str> {
        self.depth.as_deref()
    }

    /// Viewport-relative top, ignoring the node's own translation.
    fn bounding_top(&self) -> f64 {
        self.layout_top.get() + self.content_shift.get()
    }

    fn set_translate_y(&self, px: f64) {
        self.translate.set(px);
    }
}

/// Horizontal track: its wrapper reserves as much height as the track is wide.
#[derive(Debug, Clone, PartialEq)]
pub struct HorizontalTrack {
    pub width: f64,
    pub wrapper_height: f64,
    pub layout_top: f64,
}

#[derive(Debug)]
pub(crate) enum Section {
    Block(Rc<PageNode>),
    Track,
}

/// Block description before layout.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BlockSpec {
    pub title: Option<String>,
    pub lines: Vec<String>,
    pub depth: Option<String>,
}

#[derive(Debug)]
pub struct Page {
    sections: Vec<Section>,
    nodes: Vec<Rc<PageNode>>,
    track: Option<HorizontalTrack>,
    row_px: f64,
    content_height: f64,
    scroll_top: f64,
    viewport_height: f64,
    spacer_height: f64,
    content_shift: Rc<Cell<f64>>,
}

impl Page {
    /// Lay out `blocks` top to bottom.  `track = Some((at, width))` places a
    /// horizontal track `width` pixels wide before block index `at`.
    pub fn new(blocks: Vec<BlockSpec>, track: Option<(usize, f64)>, row_px: f64) -> Self {
        let content_shift = Rc::new(Cell::new(0.0));
        let mut sections = Vec::new();
        let mut nodes = Vec::new();

        for (i, spec) in blocks.into_iter().enumerate() {
            if matches!(track, Some((at, _)) if at == i) {
                sections.push(Section::Track);
            }
            // Border rows above and below the text.
            let rows = spec.lines.len() + 2;
            let node = Rc::new(PageNode {
                title: spec.title,
                lines: spec.lines,
                depth: spec.depth,
                height: rows as f64 * row_px,
                layout_top: Cell::new(0.0),
                translate: Cell::new(0.0),
                content_shift: Rc::clone(&content_shift),
            });
            nodes.push(Rc::clone(&node));
            sections.push(Section::Block(node));
        }
        if matches!(track, Some((at, _)) if at >= nodes.len()) {
            sections.push(Section::Track);
        }

        let mut page = Self {
            sections,
            nodes,
            track: track.map(|(_, width)| HorizontalTrack {
                width,
                wrapper_height: 0.0,
                layout_top: 0.0,
            }),
            row_px,
            content_height: 0.0,
            scroll_top: 0.0,
            viewport_height: 0.0,
            spacer_height: 0.0,
            content_shift,
        };
        page.relayout();
        page
    }

    fn relayout(&mut self) {
        let mut top = 0.0;
        for section in &self.sections {
            match section {
                Section::Block(node) => {
                    node.layout_top.set(top);
                    top += node.height;
                }
                Section::Track => {
                    if let Some(track) = self.track.as_mut() {
                        track.layout_top = top;
                        top += track.wrapper_height;
                    }
                }
            }
        }
        self.content_height = top;
    }

    pub fn nodes(&self) -> &[Rc<PageNode>] {
        &self.nodes
    }

    pub fn track(&self) -> Option<&HorizontalTrack> {
        self.track.as_ref()
    }

    pub fn row_px(&self) -> f64 {
        self.row_px
    }

    pub fn raw_scroll(&self) -> f64 {
        self.scroll_top
    }

    pub fn content_shift(&self) -> f64 {
        self.content_shift.get()
    }

    #[cfg(test)]
    pub fn spacer_height(&self) -> f64 {
        self.spacer_height
    }

    /// Largest raw scroll position the spacer allows.
    pub fn max_scroll(&self) -> f64 {
        (self.spacer_height - self.viewport_height).max(0.0)
    }

    /// Set the viewport from a terminal height in rows.
    pub fn set_viewport_rows(&mut self, rows: u16) {
        self.viewport_height = f64::from(rows) * self.row_px;
        self.scroll_top = self.scroll_top.clamp(0.0, self.max_scroll());
    }

    /// Move the raw scroll position.  Returns `true` if it changed.
    pub fn scroll_to(&mut self, y: f64) -> bool {
        let next = y.clamp(0.0, self.max_scroll());
        let changed = next != self.scroll_top;
        self.scroll_top = next;
        changed
    }

    pub fn scroll_by(&mut self, dy: f64) -> bool {
        self.scroll_to(self.scroll_top + dy)
    }
}

impl LayoutSurface for Page {
    fn content_height(&self) -> Option<f64> {
        Some(self.content_height)
    }

    fn viewport_height(&self) -> Option<f64> {
        (self.viewport_height > 0.0).then_some(self.viewport_height)
    }

    fn horizontal_track_width(&self) -> Option<f64> {
        self.track.as_ref().map(|t| t.width)
    }

    fn set_spacer_height(&mut self, px: f64) {
        self.spacer_height = px;
        self.scroll_top = self.scroll_top.clamp(0.0, self.max_scroll());
    }

    fn set_horizontal_wrapper_height(&mut self, px: f64) {
        if let Some(track) = self.track.as_mut() {
            track.wrapper_height = px;
        }
        self.relayout();
    }
}

impl ScrollSurface for Page {
    fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    fn set_target_translate(&mut self, px: f64) {
        self.content_shift.set(px);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(lines: usize, depth: Option<&str>) -> BlockSpec {
        BlockSpec {
            title: None,
            lines: vec!["x".to_string(); lines],
            depth: depth.map(str::to_string),
        }
    }

    #[test]
    fn stacks_blocks_with_border_rows() {
        let page = Page::new(vec![block(3, None), block(1, Some("4"))], None, 10.0);
        assert_eq!(page.nodes()[0].height, 50.0);
        assert_eq!(page.nodes()[1].layout_top(), 50.0);
        assert_eq!(page.content_height(), Some(80.0));
    }

    #[test]
    fn wrapper_height_pushes_later_blocks_down() {
        let mut page = Page::new(vec![block(1, None), block(1, None)], Some((1, 500.0)), 10.0);
        assert_eq!(page.horizontal_track_width(), Some(500.0));
        assert_eq!(page.nodes()[1].layout_top(), 30.0);

        page.set_horizontal_wrapper_height(500.0);
        assert_eq!(page.nodes()[1].layout_top(), 530.0);
        assert_eq!(page.content_height(), Some(560.0));
        assert_eq!(page.track().map(|t| t.layout_top), Some(30.0));
    }

    #[test]
    fn raw_scroll_is_clamped_to_spacer() {
        let mut page = Page::new(vec![block(98, None)], None, 1.0);
        page.set_viewport_rows(40);
        page.set_spacer_height(100.0);

        assert!(page.scroll_by(25.0));
        assert!(page.scroll_to(1_000.0));
        assert_eq!(page.raw_scroll(), 60.0);
        assert!(!page.scroll_by(5.0));
        assert!(page.scroll_to(-3.0));
        assert_eq!(page.raw_scroll(), 0.0);
    }

    #[test]
    fn nodes_follow_content_shift() {
        let mut page = Page::new(vec![block(1, None), block(1, Some("2"))], None, 10.0);
        page.set_target_translate(-12.0);
        let node = &page.nodes()[1];
        assert_eq!(node.bounding_top(), 18.0);

        node.set_translate_y(-5.0);
        assert_eq!(node.screen_top(), 13.0);
        assert_eq!(node.bounding_top(), 18.0);
    }
}
