//! Geometry primitives and the layout capability used by the coordinate mapper
//!
//! The mapper never talks to a rendering toolkit directly. It asks a
//! [`SegmentMeasure`] for rectangles, the way a browser answers range and
//! element bounding-box queries. [`MonospaceLayout`] is a self-contained
//! implementation used by the CLI and the tests.

use std::collections::HashMap;

use crate::config::LayoutMetrics;
use crate::editable::{Segment, SegmentId};
use crate::error::GeometryError;

/// Tab stop width in characters
pub const TABULATOR_WIDTH: usize = 4;

/// A point in pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// An axis-aligned rectangle in pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    /// Shift by `dx`, `dy`
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Smallest rect containing both
    pub fn union(&self, other: &Rect) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Self::new(
            x,
            y,
            self.right().max(other.right()) - x,
            self.bottom().max(other.bottom()) - y,
        )
    }
}

/// Layout queries the coordinate mapper needs from a renderer.
///
/// All rectangles are in viewport coordinates. `origin` is where the editor's
/// content box sits in the viewport and `scroll_offset` how far it is scrolled.
pub trait SegmentMeasure {
    /// Rects of a zero-width range at `offset` inside a text segment. A range
    /// sitting on a soft-wrap boundary yields one rect per visual line.
    fn client_rects(&self, id: SegmentId, offset: usize) -> Result<Vec<Rect>, GeometryError>;

    /// Bounding box of a rendered segment (the chip, for dropdowns)
    fn segment_bounds(&self, id: SegmentId) -> Option<Rect>;

    fn origin(&self) -> Point;

    fn scroll_offset(&self) -> Point;

    fn line_height(&self) -> f64;
}

// ============================================================================
// Monospace reference layout
// ============================================================================

/// Fixed-pitch layout of a segment list with soft wrapping and tab stops.
#[derive(Debug, Clone)]
pub struct MonospaceLayout {
    metrics: LayoutMetrics,
    origin: Point,
    scroll: Point,
    /// Per text segment, per offset: caret rects in content coordinates
    offsets: HashMap<SegmentId, Vec<Vec<Rect>>>,
    bounds: HashMap<SegmentId, Rect>,
    line_count: usize,
}

/// Pen position while laying out
struct Pen {
    x: f64,
    line: usize,
}

impl MonospaceLayout {
    pub fn new(segments: &[Segment], metrics: LayoutMetrics) -> Self {
        let mut layout = Self {
            metrics,
            origin: Point::default(),
            scroll: Point::default(),
            offsets: HashMap::new(),
            bounds: HashMap::new(),
            line_count: 1,
        };
        layout.lay_out(segments);
        layout
    }

    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    pub fn set_scroll(&mut self, scroll: Point) {
        self.scroll = scroll;
    }

    /// Total content height in pixels
    pub fn content_height(&self) -> f64 {
        self.line_count as f64 * self.metrics.line_height
    }

    /// Width of a chip showing `label`
    pub fn chip_width(&self, label: &str) -> f64 {
        label.chars().count() as f64 * self.metrics.char_width + 2.0 * self.metrics.chip_padding
    }

    fn caret_rect(&self, pen: &Pen) -> Rect {
        Rect::new(
            pen.x,
            pen.line as f64 * self.metrics.line_height,
            0.0,
            self.metrics.line_height,
        )
    }

    fn wrap(&self, pen: &mut Pen) {
        pen.x = 0.0;
        pen.line += 1;
    }

    fn needs_wrap(&self, pen: &Pen, width: f64) -> bool {
        pen.x > 0.0 && pen.x + width > self.metrics.wrap_width
    }

    fn advance(&self, ch: char, pen: &Pen) -> f64 {
        let cw = self.metrics.char_width;
        if ch == '\t' {
            let col = (pen.x / cw).round() as usize;
            (TABULATOR_WIDTH - col % TABULATOR_WIDTH) as f64 * cw
        } else {
            cw
        }
    }

    fn lay_out(&mut self, segments: &[Segment]) {
        let mut pen = Pen { x: 0.0, line: 0 };
        for segment in segments {
            match segment {
                Segment::Text(t) => {
                    let mut rects: Vec<Vec<Rect>> = vec![vec![self.caret_rect(&pen)]];
                    let mut bounds = rects[0][0];
                    for (k, ch) in t.value.chars().enumerate() {
                        if ch == '\n' {
                            self.wrap(&mut pen);
                        } else {
                            let width = self.advance(ch, &pen);
                            if self.needs_wrap(&pen, width) {
                                self.wrap(&mut pen);
                                let start = self.caret_rect(&pen);
                                rects[k].push(start);
                            }
                            pen.x += width;
                        }
                        let rect = self.caret_rect(&pen);
                        bounds = bounds.union(&rect);
                        rects.push(vec![rect]);
                    }
                    self.offsets.insert(t.id, rects);
                    self.bounds.insert(t.id, bounds);
                }
                Segment::Dropdown(d) => {
                    let width = self.chip_width(&d.selected);
                    if self.needs_wrap(&pen, width) {
                        self.wrap(&mut pen);
                    }
                    let chip = Rect::new(
                        pen.x,
                        pen.line as f64 * self.metrics.line_height,
                        width,
                        self.metrics.line_height,
                    );
                    self.bounds.insert(d.id, chip);
                    pen.x += width;
                }
            }
        }
        self.line_count = pen.line + 1;
    }

    fn to_viewport(&self, rect: Rect) -> Rect {
        rect.translate(self.origin.x - self.scroll.x, self.origin.y - self.scroll.y)
    }
}

impl SegmentMeasure for MonospaceLayout {
    fn client_rects(&self, id: SegmentId, offset: usize) -> Result<Vec<Rect>, GeometryError> {
        let Some(rects) = self.offsets.get(&id) else {
            return match self.bounds.get(&id) {
                Some(chip) => Ok(vec![self.to_viewport(*chip)]),
                None => Err(GeometryError::Detached(id)),
            };
        };
        let per_offset = rects
            .get(offset)
            .ok_or(GeometryError::OffsetOutOfRange {
                id,
                offset,
                len: rects.len() - 1,
            })?;
        Ok(per_offset.iter().map(|r| self.to_viewport(*r)).collect())
    }

    fn segment_bounds(&self, id: SegmentId) -> Option<Rect> {
        self.bounds.get(&id).map(|r| self.to_viewport(*r))
    }

    fn origin(&self) -> Point {
        self.origin
    }

    fn scroll_offset(&self) -> Point {
        self.scroll
    }

    fn line_height(&self) -> f64 {
        self.metrics.line_height
    }
}
