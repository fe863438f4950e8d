//! Coordinate mapping between segment positions and pixels
//!
//! Forward mapping places the caret overlay, reverse mapping resolves clicks,
//! and vertical targeting drives Up/Down navigation. All results are in the
//! editor's content-local coordinates (viewport minus origin plus scroll).

use crate::config::EditorConfig;
use crate::editable::{Segment, SegmentPosition};

use super::geometry::{Point, Rect, SegmentMeasure};

/// Binary narrowing stops once the window is this small
const NARROW_WINDOW: usize = 8;

/// Where the caret overlay is drawn, in content-local pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CaretGeometry {
    pub x: f64,
    pub y: f64,
    pub height: f64,
}

/// Direction of vertical caret navigation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerticalDirection {
    Up,
    Down,
}

/// Maps between [`SegmentPosition`]s and content-local pixels through a
/// [`SegmentMeasure`].
#[derive(Clone, Copy, Debug)]
pub struct CoordinateMapper {
    caret_gap: f64,
    linear_scan_limit: usize,
    coarse_samples: usize,
}

impl CoordinateMapper {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            caret_gap: config.caret_gap,
            linear_scan_limit: config.linear_scan_limit,
            coarse_samples: config.coarse_samples.max(2),
        }
    }

    // ========================================================================
    // Forward mapping
    // ========================================================================

    /// Caret geometry for `pos`, or `None` when the segment isn't rendered.
    ///
    /// An empty document puts the caret at the content origin.
    pub fn caret_geometry(
        &self,
        segments: &[Segment],
        pos: SegmentPosition,
        measure: &dyn SegmentMeasure,
    ) -> Option<CaretGeometry> {
        let line_height = measure.line_height();
        if segments.is_empty() {
            return Some(CaretGeometry {
                x: 0.0,
                y: 0.0,
                height: line_height,
            });
        }
        let pos = pos.clamped(segments);
        let segment = &segments[pos.segment_index];

        match segment {
            Segment::Text(t) => match measure.client_rects(t.id, pos.offset) {
                Ok(rects) if !rects.is_empty() => {
                    // At a soft wrap the last rect is the start of the next line
                    let rect = to_local(rects[rects.len() - 1], measure);
                    Some(CaretGeometry {
                        x: rect.x,
                        y: rect.y,
                        height: line_height,
                    })
                }
                result => {
                    if let Err(e) = result {
                        tracing::debug!("caret measure failed, using segment bounds: {}", e);
                    }
                    let bounds = to_local(measure.segment_bounds(t.id)?, measure);
                    let (x, y) = if pos.offset == 0 {
                        (bounds.x, bounds.y)
                    } else {
                        (bounds.right(), bounds.bottom() - line_height)
                    };
                    Some(CaretGeometry {
                        x,
                        y,
                        height: line_height,
                    })
                }
            },
            Segment::Dropdown(d) => {
                let chip = to_local(measure.segment_bounds(d.id)?, measure);
                Some(CaretGeometry {
                    x: chip.right() + self.caret_gap,
                    y: chip.y + (chip.height - line_height) / 2.0,
                    height: line_height,
                })
            }
        }
    }

    // ========================================================================
    // Reverse mapping
    // ========================================================================

    /// Resolve a viewport point to the nearest position.
    ///
    /// A point on a chip always resolves to offset 0 of that dropdown.
    pub fn hit_test(
        &self,
        segments: &[Segment],
        point: Point,
        measure: &dyn SegmentMeasure,
    ) -> Option<SegmentPosition> {
        let local = to_local_point(point, measure);

        for (index, segment) in segments.iter().enumerate() {
            if let Segment::Dropdown(d) = segment {
                if let Some(chip) = measure.segment_bounds(d.id) {
                    if to_local(chip, measure).contains(local) {
                        return Some(SegmentPosition::new(index, 0));
                    }
                }
            }
        }

        let mut best: Option<(f64, SegmentPosition)> = None;
        for (index, segment) in segments.iter().enumerate() {
            let Segment::Text(t) = segment else {
                continue;
            };
            let len = t.value.chars().count();
            let distance_at = |offset: usize| offset_distance(measure, segment, offset, local);
            let found = if len <= self.linear_scan_limit {
                closest_in(0, len, &distance_at)
            } else {
                self.search_long(len, local, segment, measure)
            };
            if let Some((distance, offset)) = found {
                if best.map_or(true, |(d, _)| distance < d) {
                    best = Some((distance, SegmentPosition::new(index, offset)));
                }
            }
        }

        let position = best.map(|(_, pos)| pos);
        tracing::trace!(x = point.x, y = point.y, ?position, "hit test");
        position
    }

    /// Coarse sampling, then binary narrowing, then a linear scan of the window
    fn search_long(
        &self,
        len: usize,
        local: Point,
        segment: &Segment,
        measure: &dyn SegmentMeasure,
    ) -> Option<(f64, usize)> {
        let distance_at = |offset: usize| offset_distance(measure, segment, offset, local);
        let step = (len / self.coarse_samples).max(1);
        let samples: Vec<usize> = (0..=len)
            .step_by(step)
            .chain(std::iter::once(len))
            .collect();

        let mut nearest: Option<(f64, usize)> = None;
        for (i, &offset) in samples.iter().enumerate() {
            if let Some(d) = distance_at(offset) {
                if nearest.map_or(true, |(best, _)| d < best) {
                    nearest = Some((d, i));
                }
            }
        }
        let Some((_, sample)) = nearest else {
            return closest_in(0, len, &distance_at);
        };

        let mut lo = samples[sample.saturating_sub(1)];
        let mut hi = samples[(sample + 1).min(samples.len() - 1)];

        // Offsets are laid out in reading order, so compare against the click
        while hi - lo > NARROW_WINDOW {
            let mid = lo + (hi - lo) / 2;
            let Some(rect) = first_rect(measure, segment, mid) else {
                break;
            };
            let before = local.y < rect.y || (local.y < rect.bottom() && local.x < rect.x);
            if before {
                hi = mid;
            } else {
                lo = mid;
            }
        }

        closest_in(lo, hi, &distance_at)
    }

    // ========================================================================
    // Vertical navigation
    // ========================================================================

    /// Position one line above or below `from`.
    ///
    /// `desired_x` is the column remembered from earlier vertical moves. Returns
    /// the target and the x to remember, or `None` when there is no such line.
    pub fn vertical_target(
        &self,
        segments: &[Segment],
        from: SegmentPosition,
        direction: VerticalDirection,
        desired_x: Option<f64>,
        measure: &dyn SegmentMeasure,
    ) -> Option<(SegmentPosition, f64)> {
        let caret = self.caret_geometry(segments, from, measure)?;
        let line_height = measure.line_height();
        let x = desired_x.unwrap_or(caret.x);
        let target_y = match direction {
            VerticalDirection::Up => caret.y - line_height,
            VerticalDirection::Down => caret.y + line_height,
        };
        let tolerance = line_height / 2.0;

        let mut best: Option<(f64, SegmentPosition)> = None;
        let mut consider = |score: f64, pos: SegmentPosition| {
            if best.map_or(true, |(s, _)| score < s) {
                best = Some((score, pos));
            }
        };

        for (index, segment) in segments.iter().enumerate() {
            match segment {
                Segment::Text(t) => {
                    for offset in 0..=t.value.chars().count() {
                        let Ok(rects) = measure.client_rects(t.id, offset) else {
                            continue;
                        };
                        for rect in rects.into_iter().map(|r| to_local(r, measure)) {
                            if (rect.y - target_y).abs() <= tolerance {
                                consider((rect.x - x).abs(), SegmentPosition::new(index, offset));
                            }
                        }
                    }
                }
                Segment::Dropdown(d) => {
                    let Some(chip) = measure.segment_bounds(d.id) else {
                        continue;
                    };
                    let chip = to_local(chip, measure);
                    let y = chip.y + (chip.height - line_height) / 2.0;
                    if (y - target_y).abs() > tolerance {
                        continue;
                    }
                    let score = if x >= chip.x && x <= chip.right() {
                        0.0
                    } else {
                        (chip.x - x).abs().min((chip.right() - x).abs())
                    };
                    consider(score, SegmentPosition::new(index, 0));
                }
            }
        }

        best.map(|(_, pos)| (pos, x))
    }
}

fn to_local(rect: Rect, measure: &dyn SegmentMeasure) -> Rect {
    let origin = measure.origin();
    let scroll = measure.scroll_offset();
    rect.translate(scroll.x - origin.x, scroll.y - origin.y)
}

fn to_local_point(point: Point, measure: &dyn SegmentMeasure) -> Point {
    let origin = measure.origin();
    let scroll = measure.scroll_offset();
    Point::new(point.x - origin.x + scroll.x, point.y - origin.y + scroll.y)
}

fn first_rect(measure: &dyn SegmentMeasure, segment: &Segment, offset: usize) -> Option<Rect> {
    let rects = measure.client_rects(segment.id(), offset).ok()?;
    rects.first().map(|r| to_local(*r, measure))
}

/// Distance from `local` to the caret at `offset`, nearest of its rects
fn offset_distance(
    measure: &dyn SegmentMeasure,
    segment: &Segment,
    offset: usize,
    local: Point,
) -> Option<f64> {
    let rects = measure.client_rects(segment.id(), offset).ok()?;
    rects
        .into_iter()
        .map(|r| {
            let r = to_local(r, measure);
            Point::new(r.x, r.center_y()).distance(local)
        })
        .min_by(|a, b| a.total_cmp(b))
}

/// Linear scan of offsets `lo..=hi`; earliest wins ties
fn closest_in(
    lo: usize,
    hi: usize,
    distance_at: &dyn Fn(usize) -> Option<f64>,
) -> Option<(f64, usize)> {
    let mut best: Option<(f64, usize)> = None;
    for offset in lo..=hi {
        if let Some(d) = distance_at(offset) {
            if best.map_or(true, |(b, _)| d < b) {
                best = Some((d, offset));
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutMetrics;
    use crate::editable::EditorState;
    use crate::view::MonospaceLayout;

    fn config() -> EditorConfig {
        EditorConfig {
            layout: LayoutMetrics {
                char_width: 10.0,
                line_height: 20.0,
                wrap_width: 100.0,
                chip_padding: 5.0,
            },
            caret_gap: 2.0,
            ..EditorConfig::default()
        }
    }

    fn layout(state: &EditorState) -> MonospaceLayout {
        MonospaceLayout::new(&state.segments, config().layout)
    }

    #[test]
    fn test_caret_in_text() {
        let state = EditorState::from_value("hello");
        let mapper = CoordinateMapper::new(&config());
        let geo = mapper
            .caret_geometry(&state.segments, SegmentPosition::new(0, 2), &layout(&state))
            .unwrap();
        assert_eq!((geo.x, geo.y, geo.height), (20.0, 0.0, 20.0));
    }

    #[test]
    fn test_caret_after_chip_uses_gap() {
        // "ab" then a chip 2*5 + 10 wide
        let state = EditorState::from_value("ab[[x]]");
        let mapper = CoordinateMapper::new(&config());
        let geo = mapper
            .caret_geometry(&state.segments, SegmentPosition::new(1, 0), &layout(&state))
            .unwrap();
        assert_eq!(geo.x, 20.0 + 20.0 + 2.0);
    }

    #[test]
    fn test_caret_at_wrap_uses_last_rect() {
        let state = EditorState::from_value("abcdefghijk");
        let mapper = CoordinateMapper::new(&config());
        let geo = mapper
            .caret_geometry(&state.segments, SegmentPosition::new(0, 10), &layout(&state))
            .unwrap();
        assert_eq!((geo.x, geo.y), (0.0, 20.0));
    }

    #[test]
    fn test_caret_accounts_for_scroll_and_origin() {
        let state = EditorState::from_value("a\nb\nc");
        let mut measure = layout(&state).with_origin(Point::new(30.0, 40.0));
        measure.set_scroll(Point::new(0.0, 20.0));
        let mapper = CoordinateMapper::new(&config());
        let geo = mapper
            .caret_geometry(&state.segments, SegmentPosition::new(0, 4), &measure)
            .unwrap();
        // Content-local coordinates are independent of scroll and origin
        assert_eq!((geo.x, geo.y), (0.0, 40.0));
    }

    #[test]
    fn test_empty_document_caret_at_origin() {
        let mapper = CoordinateMapper::new(&config());
        let measure = MonospaceLayout::new(&[], config().layout);
        let geo = mapper
            .caret_geometry(&[], SegmentPosition::zero(), &measure)
            .unwrap();
        assert_eq!((geo.x, geo.y), (0.0, 0.0));
    }

    #[test]
    fn test_click_on_chip_resolves_to_offset_zero() {
        let state = EditorState::from_value("ab[[xyz]] c");
        let mapper = CoordinateMapper::new(&config());
        let measure = layout(&state);
        // Chip spans x 20..60
        for x in [21.0, 39.0, 41.0, 59.0] {
            let pos = mapper
                .hit_test(&state.segments, Point::new(x, 10.0), &measure)
                .unwrap();
            assert_eq!(pos, SegmentPosition::new(1, 0));
        }
    }

    #[test]
    fn test_click_in_text_picks_nearest_offset() {
        let state = EditorState::from_value("hello");
        let mapper = CoordinateMapper::new(&config());
        let pos = mapper
            .hit_test(&state.segments, Point::new(24.0, 10.0), &layout(&state))
            .unwrap();
        assert_eq!(pos, SegmentPosition::new(0, 2));
    }

    #[test]
    fn test_click_in_long_segment_matches_linear_scan() {
        let text = "word ".repeat(40);
        let state = EditorState::from_value(&text);
        let measure = layout(&state);
        let fast = CoordinateMapper::new(&config());
        let slow = CoordinateMapper::new(&EditorConfig {
            linear_scan_limit: usize::MAX,
            ..config()
        });
        for point in [
            Point::new(33.0, 5.0),
            Point::new(71.0, 65.0),
            Point::new(5.0, 150.0),
            Point::new(95.0, 390.0),
        ] {
            assert_eq!(
                fast.hit_test(&state.segments, point, &measure),
                slow.hit_test(&state.segments, point, &measure)
            );
        }
    }

    #[test]
    fn test_vertical_down_keeps_column() {
        let state = EditorState::from_value("abcdef\nabcdef");
        let mapper = CoordinateMapper::new(&config());
        let (pos, x) = mapper
            .vertical_target(
                &state.segments,
                SegmentPosition::new(0, 3),
                VerticalDirection::Down,
                None,
                &layout(&state),
            )
            .unwrap();
        assert_eq!(pos, SegmentPosition::new(0, 10));
        assert_eq!(x, 30.0);
    }

    #[test]
    fn test_vertical_up_from_first_line_is_none() {
        let state = EditorState::from_value("abc");
        let mapper = CoordinateMapper::new(&config());
        assert!(mapper
            .vertical_target(
                &state.segments,
                SegmentPosition::new(0, 1),
                VerticalDirection::Up,
                None,
                &layout(&state),
            )
            .is_none());
    }

    #[test]
    fn test_vertical_prefers_chip_under_column() {
        let state = EditorState::from_value("abcdef\nab[[xyz]]");
        let mapper = CoordinateMapper::new(&config());
        let (pos, _) = mapper
            .vertical_target(
                &state.segments,
                SegmentPosition::new(0, 4),
                VerticalDirection::Down,
                None,
                &layout(&state),
            )
            .unwrap();
        assert_eq!(pos, SegmentPosition::new(1, 0));
    }
}
