//! Layout metrics: viewport and content measurements, refreshed on resize.

/// Measurements and size writes the engine needs from its host.
///
/// Reads return `None` when the backing element is absent; the engine then
/// treats the measurement as zero instead of failing.
pub trait LayoutSurface {
    /// Rendered height of the scrolled content.
    fn content_height(&self) -> Option<f64>;
    /// Rendered height of the viewport.
    fn viewport_height(&self) -> Option<f64>;
    /// Rendered width of the horizontal track content, if one is configured.
    fn horizontal_track_width(&self) -> Option<f64> {
        None
    }
    /// Give the spacer the content's height so the container scrolls the right extent.
    fn set_spacer_height(&mut self, px: f64);
    /// Reserve vertical space for a width-driven horizontal track.
    fn set_horizontal_wrapper_height(&mut self, _px: f64) {}
}

/// Result of the last resize pass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayoutMetrics {
    pub scroll_height: f64,
    pub view_height: f64,
    pub half_view_height: f64,
    /// Distance over which a parallax item travels its full offset (2× viewport).
    pub max_distance: f64,
}

impl LayoutMetrics {
    /// Re-measure everything and push the derived sizes back to the host.
    pub fn recompute(surface: &mut impl LayoutSurface) -> Self {
        // The wrapper feeds into the content height, so size it first.
        if let Some(width) = surface.horizontal_track_width() {
            surface.set_horizontal_wrapper_height(sanitize(width));
        }

        let scroll_height = surface.content_height().map_or(0.0, sanitize);
        surface.set_spacer_height(scroll_height);

        let view_height = surface.viewport_height().map_or(0.0, sanitize);

        tracing::debug!(scroll_height, view_height, "layout metrics recomputed");

        Self {
            scroll_height,
            view_height,
            half_view_height: view_height / 2.0,
            max_distance: view_height * 2.0,
        }
    }
}

fn sanitize(px: f64) -> f64 {
    if px.is_finite() && px > 0.0 {
        px
    } else {
        0.0
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// In-memory stand-in for the page: plain fields for every read and write.
    #[derive(Debug, Default)]
    pub(crate) struct FakeLayout {
        pub content: Option<f64>,
        pub viewport: Option<f64>,
        pub track_width: Option<f64>,
        pub spacer: Option<f64>,
        pub wrapper: Option<f64>,
    }

    impl LayoutSurface for FakeLayout {
        fn content_height(&self) -> Option<f64> {
            self.content
        }

        fn viewport_height(&self) -> Option<f64> {
            self.viewport
        }

        fn horizontal_track_width(&self) -> Option<f64> {
            self.track_width
        }

        fn set_spacer_height(&mut self, px: f64) {
            self.spacer = Some(px);
        }

        fn set_horizontal_wrapper_height(&mut self, px: f64) {
            self.wrapper = Some(px);
        }
    }

    #[test]
    fn derives_half_and_double_view_height() {
        let mut layout = FakeLayout {
            content: Some(5000.0),
            viewport: Some(800.0),
            ..Default::default()
        };
        let m = LayoutMetrics::recompute(&mut layout);

        assert_eq!(m.scroll_height, 5000.0);
        assert_eq!(m.half_view_height, 400.0);
        assert_eq!(m.max_distance, 1600.0);
        assert_eq!(layout.spacer, Some(5000.0));
        assert_eq!(layout.wrapper, None);
    }

    #[test]
    fn mirrors_track_width_into_wrapper_height() {
        let mut layout = FakeLayout {
            content: Some(3000.0),
            viewport: Some(600.0),
            track_width: Some(2400.0),
            ..Default::default()
        };
        LayoutMetrics::recompute(&mut layout);
        assert_eq!(layout.wrapper, Some(2400.0));
    }

    #[test]
    fn missing_elements_collapse_to_zero() {
        let mut layout = FakeLayout {
            viewport: Some(f64::NAN),
            ..Default::default()
        };
        let m = LayoutMetrics::recompute(&mut layout);
        assert_eq!(m, LayoutMetrics::default());
        assert_eq!(layout.spacer, Some(0.0));
    }
}
