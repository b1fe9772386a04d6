//! Bounded data series and their display attributes.

use crate::datasource::{BoundedData, BufferUpdate};
use crate::error::Result;
use crate::geom::Point;
use crate::render::LineStyle;

/// Handle to a series owned by a [`Graph`](crate::graph::Graph).
///
/// Handles are issued densely in creation order and stay valid for the
/// lifetime of the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeriesId(pub(crate) usize);

impl SeriesId {
    /// Position of the series in creation order.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A bounded line series.
#[derive(Debug, Clone)]
pub struct Series {
    id: SeriesId,
    style: LineStyle,
    data: BoundedData,
    generation: u64,
}

impl Series {
    pub(crate) fn new(
        id: SeriesId,
        style: LineStyle,
        capacity: usize,
        initial: impl IntoIterator<Item = Point>,
    ) -> Result<Self> {
        Ok(Self {
            id,
            style,
            data: BoundedData::from_points(capacity, initial)?,
            generation: 0,
        })
    }

    /// Access the series handle.
    pub fn id(&self) -> SeriesId {
        self.id
    }

    /// Display attributes, passed through to renderers untouched.
    pub fn style(&self) -> LineStyle {
        self.style
    }

    /// Replace the display attributes.
    pub fn set_style(&mut self, style: LineStyle) {
        self.style = style;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Maximum number of retained points.
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Number of retained points.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the series holds no points.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterate retained points from oldest to newest.
    pub fn points(&self) -> impl ExactSizeIterator<Item = &Point> + DoubleEndedIterator + '_ {
        self.data.iter()
    }

    /// Retained points as two contiguous runs, oldest first.
    pub fn as_slices(&self) -> (&[Point], &[Point]) {
        self.data.as_slices()
    }

    /// Most recently appended point.
    pub fn last(&self) -> Option<Point> {
        self.data.last()
    }

    /// Counter bumped by every mutation, for render caches.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn push(&mut self, point: Point) -> BufferUpdate {
        self.generation = self.generation.wrapping_add(1);
        self.data.push(point)
    }

    pub(crate) fn clear(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.data.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Color;

    #[test]
    fn mutations_bump_generation() {
        let initial = [Point::new(0.0, 0.0), Point::new(1.0, 1.0)];
        let mut series = Series::new(SeriesId(0), LineStyle::default(), 2, initial).unwrap();
        assert_eq!(series.generation(), 0);
        assert_eq!(series.push(Point::new(2.0, 2.0)), BufferUpdate::Shifted);
        series.clear();
        assert_eq!(series.generation(), 2);
        assert!(series.is_empty());
        assert_eq!(series.capacity(), 2);
    }

    #[test]
    fn style_is_replaced() {
        let mut series =
            Series::new(SeriesId(4), LineStyle::default(), 1, std::iter::empty()).unwrap();
        let style = LineStyle::new(Color::rgb(0.1, 0.2, 0.3), 3.0);
        series.set_style(style);
        assert_eq!(series.style(), style);
        assert_eq!(series.id().index(), 4);
    }
}
