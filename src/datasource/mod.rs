//! Bounded point storage.
//!
//! Each series keeps at most `capacity` points. Appending to a full buffer
//! evicts the oldest point first, so the buffer always holds the most recent
//! `capacity` points in insertion order.

use std::collections::VecDeque;
use std::num::NonZeroUsize;

use crate::error::{GraphError, Result};
use crate::geom::Point;

/// What an append did to the buffer layout.
///
/// Renderers that mirror the buffer on the GPU can use this to choose between
/// a single-element upload and a full re-upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferUpdate {
    /// The point was written at `index`; earlier points did not move.
    Appended {
        /// Index of the new point.
        index: usize,
    },
    /// The oldest point was evicted and every remaining point shifted down.
    Shifted,
}

impl BufferUpdate {
    /// Whether the whole buffer must be re-uploaded.
    pub fn requires_full_upload(&self) -> bool {
        matches!(self, Self::Shifted)
    }
}

/// FIFO point buffer with a fixed capacity.
#[derive(Debug, Clone)]
pub struct BoundedData {
    points: VecDeque<Point>,
    capacity: NonZeroUsize,
}

impl BoundedData {
    /// Create an empty buffer. Zero capacity is rejected.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let capacity = NonZeroUsize::new(capacity).ok_or(GraphError::InvalidCapacity)?;
        Ok(Self {
            points: VecDeque::with_capacity(capacity.get().min(4096)),
            capacity,
        })
    }

    /// Create a buffer seeded with points; only the newest `capacity` survive.
    pub fn from_points<I>(capacity: usize, points: I) -> Result<Self>
    where
        I: IntoIterator<Item = Point>,
    {
        let mut data = Self::with_capacity(capacity)?;
        for point in points {
            data.push(point);
        }
        Ok(data)
    }

    /// Append a point, evicting the oldest one if the buffer is full.
    pub fn push(&mut self, point: Point) -> BufferUpdate {
        if self.points.len() >= self.capacity.get() {
            self.points.pop_front();
            self.points.push_back(point);
            BufferUpdate::Shifted
        } else {
            self.points.push_back(point);
            BufferUpdate::Appended {
                index: self.points.len() - 1,
            }
        }
    }

    /// Remove every point; the capacity is kept.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Maximum number of retained points.
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Number of points stored.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if there are no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether the next push will evict.
    pub fn is_full(&self) -> bool {
        self.points.len() >= self.capacity.get()
    }

    /// Iterate points from oldest to newest.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Point> + DoubleEndedIterator + '_ {
        self.points.iter()
    }

    /// Stored points as two contiguous runs, oldest first.
    pub fn as_slices(&self) -> (&[Point], &[Point]) {
        self.points.as_slices()
    }

    /// Access a single point by index, oldest at zero.
    pub fn point(&self, index: usize) -> Option<Point> {
        self.points.get(index).copied()
    }

    /// Most recently appended point.
    pub fn last(&self) -> Option<Point> {
        self.points.back().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xs(data: &BoundedData) -> Vec<f64> {
        data.iter().map(|point| point.x).collect()
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert_eq!(
            BoundedData::with_capacity(0).unwrap_err(),
            GraphError::InvalidCapacity
        );
    }

    #[test]
    fn push_reports_index_until_full() {
        let mut data = BoundedData::with_capacity(2).unwrap();
        assert_eq!(
            data.push(Point::new(0.0, 0.0)),
            BufferUpdate::Appended { index: 0 }
        );
        assert_eq!(
            data.push(Point::new(1.0, 0.0)),
            BufferUpdate::Appended { index: 1 }
        );
        assert!(data.is_full());
        assert_eq!(data.push(Point::new(2.0, 0.0)), BufferUpdate::Shifted);
        assert!(BufferUpdate::Shifted.requires_full_upload());
    }

    #[test]
    fn every_overflow_evicts_oldest() {
        let mut data = BoundedData::with_capacity(4).unwrap();
        for i in 0..50 {
            data.push(Point::new(i as f64, 0.0));
            assert!(data.len() <= 4);
            let expected: Vec<f64> = ((i - 3).max(0)..=i).map(|x| x as f64).collect();
            assert_eq!(xs(&data), expected);
        }
    }

    #[test]
    fn capacity_one_keeps_latest() {
        let mut data = BoundedData::with_capacity(1).unwrap();
        data.push(Point::new(1.0, 1.0));
        data.push(Point::new(2.0, 2.0));
        assert_eq!(data.len(), 1);
        assert_eq!(data.last(), Some(Point::new(2.0, 2.0)));
    }

    #[test]
    fn seeded_buffer_keeps_newest() {
        let data =
            BoundedData::from_points(2, (0..5).map(|i| Point::new(i as f64, 0.0))).unwrap();
        assert_eq!(xs(&data), vec![3.0, 4.0]);
        let (head, tail) = data.as_slices();
        assert_eq!(head.len() + tail.len(), 2);
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut data = BoundedData::with_capacity(3).unwrap();
        data.push(Point::new(0.0, 0.0));
        data.clear();
        assert!(data.is_empty());
        assert_eq!(data.capacity(), 3);
        assert_eq!(data.point(0), None);
    }
}
