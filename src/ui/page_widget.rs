//! Renders a [`Page`] at the positions the engine last wrote.
//!
//! Block positions are in pixels; one terminal row covers `row_px` pixels.
//! Blocks that straddle the viewport edge are drawn into a scratch buffer
//! and clipped row by row.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

use crate::page::{Page, PageNode};

use super::theme::Theme;

/// The page widget, created fresh each frame.
pub struct PageWidget<'a> {
    page: &'a Page,
}

impl<'a> PageWidget<'a> {
    pub fn new(page: &'a Page) -> Self {
        Self { page }
    }
}

/// Pixel offset to a (possibly negative) row.
fn to_row(px: f64, row_px: f64) -> i64 {
    (px / row_px).round() as i64
}

/// Copy rows of `scratch` into `buf` with the scratch's row 0 at `top`
/// (relative to `area`), dropping whatever falls outside `area`.
fn blit_clipped(scratch: &Buffer, area: Rect, top: i64, buf: &mut Buffer) {
    for r in 0..scratch.area.height {
        let y = top + i64::from(r);
        if y < 0 || y >= i64::from(area.height) {
            continue;
        }
        for x in 0..area.width.min(scratch.area.width) {
            if let (Some(src), Some(dst)) = (scratch.cell((x, r)), buf.cell_mut((area.x + x, area.y + y as u16))) {
                *dst = src.clone();
            }
        }
    }
}

fn is_visible(top: i64, height: u16, area: Rect) -> bool {
    top + i64::from(height) > 0 && top < i64::from(area.height)
}

fn render_node(node: &PageNode, area: Rect, top: i64, buf: &mut Buffer) {
    let height = u16::try_from(node.lines.len() + 2).unwrap_or(u16::MAX);
    if !is_visible(top, height, area) {
        return;
    }

    let mut title = node.title.clone().unwrap_or_default();
    let border = match node.depth.as_deref() {
        Some(depth) => {
            title = format!("{title} · depth {depth}");
            Theme::layer_border_style()
        }
        None => Theme::block_border_style(),
    };
    let block = Block::bordered()
        .title(Span::styled(format!(" {title} "), Theme::title_style()))
        .border_style(border);

    let lines: Vec<Line<'_>> = node
        .lines
        .iter()
        .map(|l| Line::styled(l.as_str(), Theme::text_style()))
        .collect();

    let scratch_area = Rect::new(0, 0, area.width, height);
    let mut scratch = Buffer::empty(scratch_area);
    Paragraph::new(lines).block(block).render(scratch_area, &mut scratch);
    blit_clipped(&scratch, area, top, buf);
}

fn render_track(page: &Page, area: Rect, buf: &mut Buffer) {
    let Some(track) = page.track() else {
        return;
    };
    let row_px = page.row_px();
    let top = to_row(track.layout_top + page.content_shift(), row_px);
    let height = u16::try_from(to_row(track.wrapper_height, row_px).max(0)).unwrap_or(u16::MAX);
    if height == 0 || !is_visible(top, height, area) {
        return;
    }

    let label = format!(" horizontal track · {:.0}px wide ", track.width);
    let middle = top + i64::from(height / 2);
    for r in 0..height {
        let y = top + i64::from(r);
        if y < 0 || y >= i64::from(area.height) {
            continue;
        }
        let row = area.y + y as u16;
        let fill = "·".repeat(usize::from(area.width));
        buf.set_stringn(area.x, row, &fill, usize::from(area.width), Theme::track_style());
        if y == middle {
            buf.set_stringn(area.x + 2, row, &label, usize::from(area.width.saturating_sub(2)), Theme::track_label_style());
        }
    }
}

impl Widget for PageWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        render_track(self.page, area, buf);

        let row_px = self.page.row_px();
        for node in self.page.nodes() {
            render_node(node, area, to_row(node.screen_top(), row_px), buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::parse::parse_page;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf.cell((x, y)).map_or(" ", |c| c.symbol()))
            .collect()
    }

    #[test]
    fn draws_blocks_at_their_rows() {
        let page = parse_page("@title first\nhello\n\n@title second\nworld\n", 1.0).expect("parse");
        let area = Rect::new(0, 0, 30, 10);
        let mut buf = Buffer::empty(area);
        PageWidget::new(&page).render(area, &mut buf);

        assert!(row_text(&buf, 0).contains("first"));
        assert!(row_text(&buf, 1).contains("hello"));
        assert!(row_text(&buf, 3).contains("second"));
        assert!(row_text(&buf, 4).contains("world"));
    }

    #[test]
    fn clips_blocks_above_the_viewport() {
        let mut page = parse_page("@title first\na\nb\nc\n", 1.0).expect("parse");
        crate::core::ScrollSurface::set_target_translate(&mut page, -2.0);

        let area = Rect::new(0, 0, 20, 6);
        let mut buf = Buffer::empty(area);
        PageWidget::new(&page).render(area, &mut buf);

        assert!(row_text(&buf, 0).contains('b'));
        assert!(row_text(&buf, 1).contains('c'));
        assert!(!row_text(&buf, 0).contains("first"));
    }

    #[test]
    fn depth_is_shown_in_title() {
        let page = parse_page("@title layer\n@depth 6\ntext\n", 1.0).expect("parse");
        let area = Rect::new(0, 0, 40, 4);
        let mut buf = Buffer::empty(area);
        PageWidget::new(&page).render(area, &mut buf);
        assert!(row_text(&buf, 0).contains("depth 6"));
    }
}
