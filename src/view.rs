//! View modes, data ranges and the global extrema tracker.

use serde::{Deserialize, Serialize};

use crate::geom::Point;

/// Numeric range with inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    /// Minimum value.
    pub min: f64,
    /// Maximum value.
    pub max: f64,
}

impl Range {
    /// Create a new range, swapping bounds if needed.
    pub fn new(mut min: f64, mut max: f64) -> Self {
        if min > max {
            std::mem::swap(&mut min, &mut max);
        }
        Self { min, max }
    }

    /// A zero-span range at a single value.
    pub fn point(value: f64) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    /// Span of the range.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Check whether both bounds are finite.
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Check whether the range has positive span and finite bounds.
    pub fn is_valid(&self) -> bool {
        self.is_finite() && self.span() > 0.0
    }

    /// Check whether a value lies inside the range.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Expand the range to include a value.
    pub fn expand_to_include(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    /// Pad both ends by `frac` of the span, using `basis` as the minimum span.
    ///
    /// A collapsed range still receives `frac * basis` on each side.
    pub fn padded(&self, frac: f64, basis: f64) -> Self {
        let padding = frac * self.span().abs().max(basis);
        Self {
            min: self.min - padding,
            max: self.max + padding,
        }
    }
}

/// Visible data ranges on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// X axis range.
    pub x: Range,
    /// Y axis range.
    pub y: Range,
}

impl Viewport {
    /// Create a viewport from X and Y ranges.
    pub fn new(x: Range, y: Range) -> Self {
        Self { x, y }
    }

    /// Check whether both axes are valid.
    pub fn is_valid(&self) -> bool {
        self.x.is_valid() && self.y.is_valid()
    }

    /// Check whether a data point is visible.
    pub fn contains(&self, point: Point) -> bool {
        self.x.contains(point.x) && self.y.contains(point.y)
    }
}

/// The active view policy of a graph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum ViewMode {
    /// Keep every observed point visible (default).
    #[default]
    FreeformAutoScale,
    /// Pin the X axis to a trailing window behind the newest point.
    ManualFollowWindow {
        /// Window width in data units.
        width: f64,
    },
    /// Only explicit gestures or setters move the viewport.
    ManualFixed,
}

impl ViewMode {
    /// Check whether the mode is one of the manual variants.
    pub fn is_manual(&self) -> bool {
        !matches!(self, Self::FreeformAutoScale)
    }

    /// Follow window width, if following.
    pub fn follow_width(&self) -> Option<f64> {
        match self {
            Self::ManualFollowWindow { width } => Some(*width),
            _ => None,
        }
    }
}

/// Running min/max of every point observed since the last clear.
///
/// Eviction from a series never shrinks the extrema.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Extrema {
    bounds: Option<Viewport>,
}

impl Extrema {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a point into the extrema.
    ///
    /// The first point after construction or [`reset`](Self::reset) seeds all
    /// four values. Non-finite coordinates are ignored.
    pub fn observe(&mut self, point: Point) {
        if !point.is_finite() {
            return;
        }
        match self.bounds.as_mut() {
            None => {
                self.bounds = Some(Viewport::new(Range::point(point.x), Range::point(point.y)));
            }
            Some(bounds) => {
                bounds.x.expand_to_include(point.x);
                bounds.y.expand_to_include(point.y);
            }
        }
    }

    /// Forget every observed point.
    pub fn reset(&mut self) {
        self.bounds = None;
    }

    /// Whether any point has been observed.
    pub fn has_points(&self) -> bool {
        self.bounds.is_some()
    }

    /// Observed extrema, if any point exists.
    pub fn bounds(&self) -> Option<Viewport> {
        self.bounds
    }
}
