//! Coordinate transforms between data, normalized device and pixel space.
//!
//! Data maps to normalized device coordinates as `data * zoom + offset` on
//! each axis. The visible rectangle is the preimage of `[-1, 1] x [-1, 1]` and
//! is always obtained by inverting the affine map behind
//! [`ViewTransform::matrix`].

use glam::{DMat4, DVec3};

use crate::config::GraphConfig;
use crate::error::{GraphError, Result};
use crate::geom::{PixelPoint, Point, ViewportSize};
use crate::view::{Range, Viewport};

/// Plot axis selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal axis.
    X,
    /// Vertical axis.
    Y,
}

/// Pan/zoom state mapping data coordinates into the normalized viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    offset_x: f64,
    offset_y: f64,
    zoom_x: f64,
    zoom_y: f64,
    min_zoom: f64,
}

impl ViewTransform {
    /// Create a transform, rejecting degenerate zoom or non-finite offsets.
    pub fn new(offset: (f64, f64), zoom: (f64, f64), min_zoom: f64) -> Result<Self> {
        let min_zoom = if min_zoom.is_finite() && min_zoom > 0.0 {
            min_zoom
        } else {
            f64::MIN_POSITIVE
        };
        let transform = Self {
            offset_x: offset.0,
            offset_y: offset.1,
            zoom_x: zoom.0,
            zoom_y: zoom.1,
            min_zoom,
        };
        if !transform.zoom_ok(zoom.0)
            || !transform.zoom_ok(zoom.1)
            || !offset.0.is_finite()
            || !offset.1.is_finite()
        {
            return Err(GraphError::DegenerateTransform);
        }
        Ok(transform)
    }

    /// Create the initial transform described by a configuration.
    pub fn from_config(config: &GraphConfig) -> Result<Self> {
        Self::new(config.initial_offset, config.initial_zoom(), config.min_zoom)
    }

    /// Normalized translation `(x, y)`.
    pub fn offset(&self) -> (f64, f64) {
        (self.offset_x, self.offset_y)
    }

    /// Per-axis scale `(x, y)`.
    pub fn zoom(&self) -> (f64, f64) {
        (self.zoom_x, self.zoom_y)
    }

    /// Smallest accepted zoom magnitude.
    pub fn min_zoom(&self) -> f64 {
        self.min_zoom
    }

    /// Orthographic projection followed by the pan and zoom.
    pub fn matrix(&self) -> DMat4 {
        DMat4::orthographic_rh_gl(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0)
            * DMat4::from_translation(DVec3::new(self.offset_x, self.offset_y, 0.0))
            * DMat4::from_scale(DVec3::new(self.zoom_x, self.zoom_y, 1.0))
    }

    /// Column-major single precision matrix for GPU uniforms.
    pub fn gpu_matrix(&self) -> [[f32; 4]; 4] {
        self.matrix().as_mat4().to_cols_array_2d()
    }

    /// Data rectangle currently mapped onto the normalized viewport.
    ///
    /// The corners `(-1, 1)` and `(1, -1)` are taken through the inverse of
    /// the affine map in closed form, so edges set by [`fit`](Self::fit) come
    /// back without round-off from a general matrix inversion.
    pub fn visible_bounds(&self) -> Result<Viewport> {
        if !self.zoom_ok(self.zoom_x) || !self.zoom_ok(self.zoom_y) {
            return Err(GraphError::DegenerateTransform);
        }
        let bounds = Viewport::new(
            Range::new(
                unproject(-1.0, self.offset_x, self.zoom_x),
                unproject(1.0, self.offset_x, self.zoom_x),
            ),
            Range::new(
                unproject(-1.0, self.offset_y, self.zoom_y),
                unproject(1.0, self.offset_y, self.zoom_y),
            ),
        );
        if !bounds.x.is_finite() || !bounds.y.is_finite() {
            return Err(GraphError::DegenerateTransform);
        }
        Ok(bounds)
    }

    /// Map a data point into normalized device coordinates.
    pub fn data_to_normalized(&self, point: Point) -> Point {
        Point::new(
            point.x * self.zoom_x + self.offset_x,
            point.y * self.zoom_y + self.offset_y,
        )
    }

    /// Map a normalized device coordinate back into data space.
    pub fn normalized_to_data(&self, point: Point) -> Result<Point> {
        if !self.zoom_ok(self.zoom_x) || !self.zoom_ok(self.zoom_y) {
            return Err(GraphError::DegenerateTransform);
        }
        Ok(Point::new(
            (point.x - self.offset_x) / self.zoom_x,
            (point.y - self.offset_y) / self.zoom_y,
        ))
    }

    /// Map a data point to pixels in a viewport of the given size.
    pub fn data_to_pixel(&self, point: Point, size: ViewportSize) -> Result<PixelPoint> {
        normalized_to_pixel(self.data_to_normalized(point), size)
    }

    /// Map a pixel position to data space.
    pub fn pixel_to_data(&self, pixel: PixelPoint, size: ViewportSize) -> Result<Point> {
        self.normalized_to_data(pixel_to_normalized(pixel, size)?)
    }

    /// Set both zoom factors. Either being degenerate rejects both.
    pub fn set_zoom(&mut self, zoom_x: f64, zoom_y: f64) -> Result<()> {
        if !self.zoom_ok(zoom_x) || !self.zoom_ok(zoom_y) {
            return Err(GraphError::DegenerateTransform);
        }
        self.zoom_x = zoom_x;
        self.zoom_y = zoom_y;
        Ok(())
    }

    /// Set the zoom of one axis.
    pub fn set_axis_zoom(&mut self, axis: Axis, zoom: f64) -> Result<()> {
        if !self.zoom_ok(zoom) {
            return Err(GraphError::DegenerateTransform);
        }
        *self.zoom_mut(axis) = zoom;
        Ok(())
    }

    /// Set both offsets.
    pub fn set_offset(&mut self, offset_x: f64, offset_y: f64) -> Result<()> {
        if !offset_x.is_finite() || !offset_y.is_finite() {
            return Err(GraphError::DegenerateTransform);
        }
        self.offset_x = offset_x;
        self.offset_y = offset_y;
        Ok(())
    }

    /// Set the offset of one axis.
    pub fn set_axis_offset(&mut self, axis: Axis, offset: f64) -> Result<()> {
        if !offset.is_finite() {
            return Err(GraphError::DegenerateTransform);
        }
        *self.offset_mut(axis) = offset;
        Ok(())
    }

    /// Translate by a normalized delta.
    pub(crate) fn pan(&mut self, dx: f64, dy: f64) {
        if dx.is_finite() {
            self.offset_x += dx;
        }
        if dy.is_finite() {
            self.offset_y += dy;
        }
    }

    /// Move the lower edge of `axis` to `value`, keeping the upper edge.
    ///
    /// Returns `false` and leaves the transform untouched when `value` is not
    /// below the current upper edge.
    pub fn adjust_min(&mut self, axis: Axis, value: f64) -> bool {
        let Ok(bounds) = self.visible_bounds() else {
            return false;
        };
        let max = axis_range(bounds, axis).max;
        if !value.is_finite() || max <= value {
            return false;
        }
        self.fit(axis, Range { min: value, max })
    }

    /// Move the upper edge of `axis` to `value`, keeping the lower edge.
    ///
    /// Returns `false` and leaves the transform untouched when `value` is not
    /// above the current lower edge.
    pub fn adjust_max(&mut self, axis: Axis, value: f64) -> bool {
        let Ok(bounds) = self.visible_bounds() else {
            return false;
        };
        let min = axis_range(bounds, axis).min;
        if !value.is_finite() || value <= min {
            return false;
        }
        self.fit(axis, Range { min, max: value })
    }

    /// Make `range` fill `axis`. Requires a valid range.
    ///
    /// The visible edges always enclose `range`; when round-off would put an
    /// edge inside it, the fitted range is widened by a few ulps.
    pub fn fit(&mut self, axis: Axis, range: Range) -> bool {
        if !range.is_valid() {
            return false;
        }
        let scale = range.min.abs().max(range.max.abs()).max(range.span());
        let mut target = range;
        let mut pad = 0.0;
        let mut fitted = None;
        for _ in 0..64 {
            let zoom = 2.0 / target.span();
            let offset = -1.0 - target.min * zoom;
            if !self.zoom_ok(zoom) || !offset.is_finite() {
                break;
            }
            fitted = Some((zoom, offset));
            if unproject(-1.0, offset, zoom) <= range.min
                && unproject(1.0, offset, zoom) >= range.max
            {
                break;
            }
            pad = if pad == 0.0 { scale * f64::EPSILON } else { pad * 2.0 };
            target = Range {
                min: range.min - pad,
                max: range.max + pad,
            };
        }
        let Some((zoom, offset)) = fitted else {
            return false;
        };
        *self.zoom_mut(axis) = zoom;
        *self.offset_mut(axis) = offset;
        true
    }

    fn zoom_ok(&self, zoom: f64) -> bool {
        zoom.is_finite() && zoom.abs() >= self.min_zoom
    }

    fn zoom_mut(&mut self, axis: Axis) -> &mut f64 {
        match axis {
            Axis::X => &mut self.zoom_x,
            Axis::Y => &mut self.zoom_y,
        }
    }

    fn offset_mut(&mut self, axis: Axis) -> &mut f64 {
        match axis {
            Axis::X => &mut self.offset_x,
            Axis::Y => &mut self.offset_y,
        }
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        let config = GraphConfig::default();
        let (zoom_x, zoom_y) = config.initial_zoom();
        Self {
            offset_x: config.initial_offset.0,
            offset_y: config.initial_offset.1,
            zoom_x,
            zoom_y,
            min_zoom: config.min_zoom,
        }
    }
}

/// Data coordinate that maps to `normalized` on one axis.
fn unproject(normalized: f64, offset: f64, zoom: f64) -> f64 {
    (normalized - offset) / zoom
}

/// Select one axis of a viewport.
pub fn axis_range(viewport: Viewport, axis: Axis) -> Range {
    match axis {
        Axis::X => viewport.x,
        Axis::Y => viewport.y,
    }
}

/// Convert a pixel position into normalized device coordinates.
///
/// Pixel Y grows downward while normalized Y grows upward.
pub fn pixel_to_normalized(pixel: PixelPoint, size: ViewportSize) -> Result<Point> {
    if !size.is_valid() {
        return Err(GraphError::InvalidViewportSize);
    }
    Ok(Point::new(
        2.0 * pixel.x as f64 / size.width as f64 - 1.0,
        1.0 - 2.0 * pixel.y as f64 / size.height as f64,
    ))
}

/// Convert normalized device coordinates into a pixel position.
pub fn normalized_to_pixel(point: Point, size: ViewportSize) -> Result<PixelPoint> {
    if !size.is_valid() {
        return Err(GraphError::InvalidViewportSize);
    }
    let x = (point.x + 1.0) * 0.5 * size.width as f64;
    let y = (1.0 - point.y) * 0.5 * size.height as f64;
    Ok(PixelPoint::new(x as f32, y as f32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec4;

    const EPS: f64 = 1e-9;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= EPS * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn default_bounds_follow_grid() {
        let bounds = ViewTransform::default().visible_bounds().unwrap();
        assert!(close(bounds.x.min, 0.0));
        assert!(close(bounds.x.max, 20_000.0));
        assert!(close(bounds.y.min, -50.0));
        assert!(close(bounds.y.max, 150.0));
    }

    #[test]
    fn bounds_roundtrip_to_normalized_corners() {
        let states = [
            ((-1.0, -0.5), (1e-4, 0.01)),
            ((0.3, -0.7), (2.5, -0.25)),
            ((12.0, 4.0), (1e-6, 3e3)),
        ];
        for (offset, zoom) in states {
            let transform = ViewTransform::new(offset, zoom, 1e-12).unwrap();
            let bounds = transform.visible_bounds().unwrap();
            let corners = [
                (Point::new(bounds.x.min, bounds.y.min), (-1.0, -1.0)),
                (Point::new(bounds.x.max, bounds.y.max), (1.0, 1.0)),
            ];
            for (corner, expected) in corners {
                let mut n = transform.data_to_normalized(corner);
                if zoom.0 < 0.0 {
                    n.x = -n.x;
                }
                if zoom.1 < 0.0 {
                    n.y = -n.y;
                }
                assert!(close(n.x, expected.0), "{n:?} vs {expected:?}");
                assert!(close(n.y, expected.1), "{n:?} vs {expected:?}");
            }
        }
    }

    #[test]
    fn matrix_agrees_with_forward_mapping() {
        let transform = ViewTransform::new((0.25, -0.5), (0.5, 2.0), 1e-12).unwrap();
        let point = Point::new(3.0, -1.5);
        let mapped = transform.matrix() * DVec4::new(point.x, point.y, 0.0, 1.0);
        let expected = transform.data_to_normalized(point);
        assert!(close(mapped.x, expected.x));
        assert!(close(mapped.y, expected.y));
        let gpu = transform.gpu_matrix();
        assert_eq!(gpu[0][0], 0.5);
        assert_eq!(gpu[3][0], 0.25);
    }

    #[test]
    fn adjust_min_x_sets_edge_and_keeps_max() {
        let mut transform = ViewTransform::default();
        assert!(transform.adjust_min(Axis::X, 5_000.0));
        let (zoom_x, _) = transform.zoom();
        assert!(close(zoom_x, 2.0 / 15_000.0));
        assert!(close(transform.offset().0, -1.0 - 5_000.0 * zoom_x));
        let bounds = transform.visible_bounds().unwrap();
        assert!(close(bounds.x.min, 5_000.0));
        assert!(close(bounds.x.max, 20_000.0));
    }

    #[test]
    fn adjust_max_y_keeps_min() {
        let mut transform = ViewTransform::default();
        assert!(transform.adjust_max(Axis::Y, 10.0));
        let bounds = transform.visible_bounds().unwrap();
        assert!(close(bounds.y.min, -50.0));
        assert!(close(bounds.y.max, 10.0));
    }

    #[test]
    fn fitted_edges_enclose_target() {
        let ranges = [
            Range::new(0.0, 5.0),
            Range::new(5.0, 7.3),
            Range::new(-4.4, 11.9),
            Range::new(1e6, 1e6 + 0.3),
            Range::new(-2.02, -1.98),
        ];
        for range in ranges {
            for axis in [Axis::X, Axis::Y] {
                let mut transform = ViewTransform::default();
                assert!(transform.fit(axis, range));
                let visible = axis_range(transform.visible_bounds().unwrap(), axis);
                assert!(visible.contains(range.min), "{visible:?} vs {range:?}");
                assert!(visible.contains(range.max), "{visible:?} vs {range:?}");
                assert!(close(visible.min, range.min));
                assert!(close(visible.max, range.max));
            }
        }
    }

    #[test]
    fn inverted_adjustments_are_noops() {
        let mut transform = ViewTransform::default();
        let before = transform;
        assert!(!transform.adjust_min(Axis::X, 20_000.0));
        assert!(!transform.adjust_min(Axis::X, 30_000.0));
        assert!(!transform.adjust_max(Axis::X, 0.0));
        assert!(!transform.adjust_max(Axis::Y, -60.0));
        assert!(!transform.adjust_min(Axis::Y, f64::NAN));
        assert_eq!(transform, before);
    }

    #[test]
    fn degenerate_zoom_is_rejected() {
        let mut transform = ViewTransform::default();
        let before = transform;
        assert_eq!(
            transform.set_axis_zoom(Axis::X, 0.0),
            Err(GraphError::DegenerateTransform)
        );
        assert_eq!(
            transform.set_zoom(1.0, f64::INFINITY),
            Err(GraphError::DegenerateTransform)
        );
        assert_eq!(
            transform.set_axis_offset(Axis::Y, f64::NAN),
            Err(GraphError::DegenerateTransform)
        );
        assert_eq!(transform, before);
        assert!(ViewTransform::new((0.0, 0.0), (0.0, 1.0), 1e-12).is_err());
    }

    #[test]
    fn pixel_roundtrip() {
        let transform = ViewTransform::new((0.1, -0.2), (0.5, 0.25), 1e-12).unwrap();
        let size = ViewportSize::new(800.0, 600.0);
        let pixel = PixelPoint::new(200.0, 450.0);
        let data = transform.pixel_to_data(pixel, size).unwrap();
        let back = transform.data_to_pixel(data, size).unwrap();
        assert!((back.x - pixel.x).abs() < 1e-3);
        assert!((back.y - pixel.y).abs() < 1e-3);
    }

    #[test]
    fn pixel_conversion_rejects_empty_viewport() {
        let result = pixel_to_normalized(PixelPoint::new(1.0, 1.0), ViewportSize::new(0.0, 10.0));
        assert_eq!(result, Err(GraphError::InvalidViewportSize));
    }
}
