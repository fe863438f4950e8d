//! View layer: geometry primitives and coordinate mapping
//!
//! Rendering itself belongs to the host toolkit. This module only needs to
//! ask a rendered layout for rectangles through [`SegmentMeasure`].

pub mod geometry;
pub mod hit_test;

pub use geometry::{MonospaceLayout, Point, Rect, SegmentMeasure, TABULATOR_WIDTH};
pub use hit_test::{CaretGeometry, CoordinateMapper, VerticalDirection};
