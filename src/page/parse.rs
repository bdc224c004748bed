//! Plain-text page format.
//!
//! Paragraphs are separated by blank lines and each becomes one block.  A
//! paragraph may open with directive lines:
//!
//! ```text
//! @title Heading text
//! @depth 5
//! @horizontal 1200
//! ```
//!
//! `@depth` is kept verbatim (the engine validates it).  `@horizontal`
//! declares the page's single horizontal track, placed before the paragraph's
//! block.  Lines starting with `#` are comments.

use std::path::{Path, PathBuf};

use super::document::{BlockSpec, Page};

#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("failed to read page {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: unknown directive @{name}")]
    UnknownDirective { line: usize, name: String },
    #[error("line {line}: horizontal track width {value:?} is not a positive number")]
    BadTrackWidth { line: usize, value: String },
    #[error("line {line}: page already has a horizontal track")]
    DuplicateTrack { line: usize },
}

const DEMO_PAGE: &str = "\
@title parallax-scroll
Scroll with the mouse wheel, arrow keys, j/k, PgUp/PgDn, Home/End.
The page follows your input with damped motion; tagged blocks drift
at a speed weighted by their depth.  Press q to quit.

@title depth 2
@depth 2
A shallow layer.  It moves only a little faster than the page.

@title plain block
No depth marker here, so this block is never offset.

@title depth 8
@depth 8
A deep layer.  Watch it lead the page as you scroll past.

@horizontal 1200
@title after the track
The horizontal track above reserves as much height as it is wide.

@title depth -4
@depth -4
Negative depths drift the other way.

@title broken marker
@depth deep
A malformed depth is treated as zero.

@title depth 10
@depth 10
Full depth: the maximum offset at two viewports of distance.

@title the end
That's all.
";

impl Page {
    /// The built-in demo page.
    pub fn demo(row_px: f64) -> Result<Self, PageError> {
        parse_page(DEMO_PAGE, row_px)
    }

    pub fn load(path: &Path, row_px: f64) -> Result<Self, PageError> {
        let text = std::fs::read_to_string(path).map_err(|source| PageError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        parse_page(&text, row_px)
    }
}

/// Parse page text into a laid-out [`Page`].
pub fn parse_page(text: &str, row_px: f64) -> Result<Page, PageError> {
    let mut parser = Parser::default();
    for (idx, raw) in text.lines().enumerate() {
        parser.line(idx + 1, raw.trim_end())?;
    }
    parser.flush();
    Ok(Page::new(parser.blocks, parser.track, row_px))
}

#[derive(Default)]
struct Parser {
    blocks: Vec<BlockSpec>,
    track: Option<(usize, f64)>,
    current: BlockSpec,
    has_content: bool,
    /// Directives are only recognised before the first text line.
    in_body: bool,
}

impl Parser {
    fn line(&mut self, line_no: usize, line: &str) -> Result<(), PageError> {
        if line.trim().is_empty() {
            self.flush();
            return Ok(());
        }
        if line.starts_with('#') {
            return Ok(());
        }

        if !self.in_body {
            if let Some(directive) = line.strip_prefix('@') {
                return self.directive(line_no, directive);
            }
        }

        self.in_body = true;
        self.has_content = true;
        self.current.lines.push(line.to_string());
        Ok(())
    }

    fn directive(&mut self, line_no: usize, directive: &str) -> Result<(), PageError> {
        let (name, value) = directive.split_once(' ').unwrap_or((directive, ""));
        let value = value.trim();
        match name {
            "title" => {
                self.current.title = Some(value.to_string());
                self.has_content = true;
            }
            "depth" => self.current.depth = Some(value.to_string()),
            "horizontal" => {
                if self.track.is_some() {
                    return Err(PageError::DuplicateTrack { line: line_no });
                }
                let width = value
                    .parse::<f64>()
                    .ok()
                    .filter(|w| w.is_finite() && *w > 0.0)
                    .ok_or_else(|| PageError::BadTrackWidth {
                        line: line_no,
                        value: value.to_string(),
                    })?;
                self.track = Some((self.blocks.len(), width));
            }
            other => {
                return Err(PageError::UnknownDirective {
                    line: line_no,
                    name: other.to_string(),
                })
            }
        }
        Ok(())
    }

    fn flush(&mut self) {
        let spec = std::mem::take(&mut self.current);
        if self.has_content {
            self.blocks.push(spec);
        }
        self.has_content = false;
        self.in_body = false;
    }
}
