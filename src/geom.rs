//! Geometric primitives used by the plotting pipeline.
//!
//! [`Point`] is a data-space coordinate. [`PixelPoint`] and [`ViewportSize`]
//! describe the logical pixel space gestures and renderers work in.

use serde::{Deserialize, Serialize};

/// A point in data space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X value in data coordinates.
    pub x: f64,
    /// Y value in data coordinates.
    pub y: f64,
}

impl Point {
    /// Create a new data point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Check whether both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// A position in logical pixels, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelPoint {
    /// Horizontal position in pixels.
    pub x: f32,
    /// Vertical position in pixels, growing downward.
    pub y: f32,
}

impl PixelPoint {
    /// Create a new pixel position.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Logical size of the plot viewport in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportSize {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl ViewportSize {
    /// Create a new viewport size.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Check whether the viewport has positive area.
    pub fn is_valid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }
}

/// A rectangle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PixelRect {
    /// Top-left corner.
    pub(crate) min: PixelPoint,
    /// Bottom-right corner.
    pub(crate) max: PixelPoint,
}

impl PixelRect {
    /// Rectangle covering a whole viewport.
    pub(crate) fn from_size(size: ViewportSize) -> Self {
        Self {
            min: PixelPoint::new(0.0, 0.0),
            max: PixelPoint::new(size.width, size.height),
        }
    }

    /// Check whether the rectangle contains a point, edges included.
    pub(crate) fn contains(&self, point: PixelPoint) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }
}
