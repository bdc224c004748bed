//! Animation indicator: a small spinner + label rendered in the top-right
//! corner of a given area while frames are being scheduled.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};

use super::theme::Theme;

/// Braille-dot spinner frames.  Advances once per engine frame.
const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// "easing…" indicator, invisible when `visible` is false.
pub struct FrameIndicator {
    pub visible: bool,
    /// Frames run so far.
    pub frame: u64,
}

impl Widget for FrameIndicator {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.visible || area.width < 14 || area.height == 0 {
            return;
        }

        let glyph = SPINNER_FRAMES[(self.frame % SPINNER_FRAMES.len() as u64) as usize];
        let label = format!(" {glyph} easing ");

        let label_width = label.chars().count() as u16;
        let x = area.x + area.width.saturating_sub(label_width + 1);

        let line = Line::from(Span::styled(label, Theme::indicator_style()));
        buf.set_line(x, area.y, &line, label_width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_indicator_draws_nothing() {
        let area = Rect::new(0, 0, 30, 2);
        let mut buf = Buffer::empty(area);
        FrameIndicator { visible: false, frame: 3 }.render(area, &mut buf);
        assert_eq!(buf, Buffer::empty(area));

        FrameIndicator { visible: true, frame: 3 }.render(area, &mut buf);
        assert_ne!(buf, Buffer::empty(area));
    }
}
