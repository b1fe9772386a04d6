//! Rendering primitives and frame building.
//!
//! These types are backend-agnostic: [`build_frame`] turns the graph state
//! into pixel-space line segments clipped to the viewport, and a backend
//! (such as the GPUI one) only has to stroke them.

use serde::{Deserialize, Serialize};

use crate::geom::{PixelPoint, PixelRect, Point, ViewportSize};
use crate::graph::{Frame, Graph};
use crate::style::Theme;
use crate::view::Range;

/// RGBA color in linear space.
///
/// All components are expected to be in the 0.0..=1.0 range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl Color {
    /// Create a new color.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from RGB components.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
}

/// Line stroke styling.
///
/// The width is expressed in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    /// Stroke color.
    pub color: Color,
    /// Stroke width in pixels.
    pub width: f32,
}

impl LineStyle {
    /// Create a line style.
    pub fn new(color: Color, width: f32) -> Self {
        Self { color, width }
    }
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            width: 1.0,
        }
    }
}

/// A line segment in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    /// Segment start.
    pub start: PixelPoint,
    /// Segment end.
    pub end: PixelPoint,
}

impl LineSegment {
    /// Create a new line segment.
    pub fn new(start: PixelPoint, end: PixelPoint) -> Self {
        Self { start, end }
    }
}

/// Single drawing instruction.
#[derive(Debug, Clone)]
pub enum RenderCommand {
    /// Fill the whole viewport.
    Clear(Color),
    /// Draw line segments.
    LineSegments {
        /// Segments to draw.
        segments: Vec<LineSegment>,
        /// Styling for the segments.
        style: LineStyle,
    },
}

/// Ordered render commands for one frame.
#[derive(Debug, Default, Clone)]
pub struct RenderList {
    commands: Vec<RenderCommand>,
}

impl RenderList {
    /// Create an empty render list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a render command.
    pub fn push(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }

    /// Access all render commands.
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    fn push_segments(&mut self, segments: Vec<LineSegment>, style: LineStyle) {
        if !segments.is_empty() {
            self.push(RenderCommand::LineSegments { segments, style });
        }
    }
}

/// Build the grid, zero axes and series polylines for a prepared frame.
///
/// Returns an empty list when the viewport has no area.
pub fn build_frame(graph: &Graph, frame: &Frame, theme: &Theme, size: ViewportSize) -> RenderList {
    let mut render = RenderList::new();
    if !size.is_valid() {
        return render;
    }
    render.push(RenderCommand::Clear(theme.background));

    let clip = PixelRect::from_size(size);
    let bounds = frame.bounds;
    let config = graph.config();
    let mut segments = Vec::new();

    for x in grid_lines(bounds.x, config.grid_x, config.max_grid_lines) {
        push_data_segment(
            frame,
            size,
            clip,
            Point::new(x, bounds.y.min),
            Point::new(x, bounds.y.max),
            &mut segments,
        );
    }
    for y in grid_lines(bounds.y, config.grid_y, config.max_grid_lines) {
        push_data_segment(
            frame,
            size,
            clip,
            Point::new(bounds.x.min, y),
            Point::new(bounds.x.max, y),
            &mut segments,
        );
    }
    render.push_segments(std::mem::take(&mut segments), theme.grid);

    if bounds.x.contains(0.0) {
        push_data_segment(
            frame,
            size,
            clip,
            Point::new(0.0, bounds.y.min),
            Point::new(0.0, bounds.y.max),
            &mut segments,
        );
    }
    if bounds.y.contains(0.0) {
        push_data_segment(
            frame,
            size,
            clip,
            Point::new(bounds.x.min, 0.0),
            Point::new(bounds.x.max, 0.0),
            &mut segments,
        );
    }
    render.push_segments(std::mem::take(&mut segments), theme.axis);

    for series in graph.series() {
        build_line_segments(series.points().copied(), frame, size, clip, &mut segments);
        render.push_segments(std::mem::take(&mut segments), series.style());
    }

    render
}

/// Project a polyline into pixel space and clip it to `clip`.
pub(crate) fn build_line_segments(
    points: impl IntoIterator<Item = Point>,
    frame: &Frame,
    size: ViewportSize,
    clip: PixelRect,
    out: &mut Vec<LineSegment>,
) {
    out.clear();
    let mut previous: Option<Point> = None;
    for point in points {
        if !point.is_finite() {
            previous = None;
            continue;
        }
        if let Some(start) = previous {
            push_data_segment(frame, size, clip, start, point, out);
        }
        previous = Some(point);
    }
}

/// Multiples of `step` inside `range`, or nothing when there would be more
/// than `max_lines` of them.
pub(crate) fn grid_lines(range: Range, step: f64, max_lines: usize) -> Vec<f64> {
    if !step.is_finite() || step <= 0.0 || !range.is_finite() {
        return Vec::new();
    }
    let first = (range.min / step).ceil() * step;
    let count = ((range.max - first) / step).floor() + 1.0;
    if !count.is_finite() || count < 1.0 || count > max_lines as f64 {
        return Vec::new();
    }
    (0..count as usize)
        .map(|i| first + step * i as f64)
        .filter(|value| *value <= range.max)
        .collect()
}

fn push_data_segment(
    frame: &Frame,
    size: ViewportSize,
    clip: PixelRect,
    start: Point,
    end: Point,
    out: &mut Vec<LineSegment>,
) {
    let (Ok(start), Ok(end)) = (
        frame.transform.data_to_pixel(start, size),
        frame.transform.data_to_pixel(end, size),
    ) else {
        return;
    };
    if let Some((start, end)) = clip_segment(start, end, clip) {
        out.push(LineSegment::new(start, end));
    }
}

fn clip_segment(
    mut start: PixelPoint,
    mut end: PixelPoint,
    rect: PixelRect,
) -> Option<(PixelPoint, PixelPoint)> {
    const LEFT: u8 = 1;
    const RIGHT: u8 = 2;
    const TOP: u8 = 4;
    const BOTTOM: u8 = 8;

    let mut out_start = region_code(start, rect, LEFT, RIGHT, TOP, BOTTOM);
    let mut out_end = region_code(end, rect, LEFT, RIGHT, TOP, BOTTOM);

    loop {
        if (out_start | out_end) == 0 {
            return Some((start, end));
        }
        if (out_start & out_end) != 0 {
            return None;
        }

        let out_code = if out_start != 0 { out_start } else { out_end };
        let (mut x, mut y) = (0.0_f32, 0.0_f32);

        if (out_code & TOP) != 0 {
            x = start.x + (end.x - start.x) * (rect.min.y - start.y) / (end.y - start.y);
            y = rect.min.y;
        } else if (out_code & BOTTOM) != 0 {
            x = start.x + (end.x - start.x) * (rect.max.y - start.y) / (end.y - start.y);
            y = rect.max.y;
        } else if (out_code & RIGHT) != 0 {
            y = start.y + (end.y - start.y) * (rect.max.x - start.x) / (end.x - start.x);
            x = rect.max.x;
        } else if (out_code & LEFT) != 0 {
            y = start.y + (end.y - start.y) * (rect.min.x - start.x) / (end.x - start.x);
            x = rect.min.x;
        }

        let clipped = PixelPoint::new(x, y);
        if out_code == out_start {
            start = clipped;
            out_start = region_code(start, rect, LEFT, RIGHT, TOP, BOTTOM);
        } else {
            end = clipped;
            out_end = region_code(end, rect, LEFT, RIGHT, TOP, BOTTOM);
        }
    }
}

fn region_code(
    point: PixelPoint,
    rect: PixelRect,
    left: u8,
    right: u8,
    top: u8,
    bottom: u8,
) -> u8 {
    if rect.contains(point) {
        return 0;
    }
    let mut code = 0;
    if point.x < rect.min.x {
        code |= left;
    } else if point.x > rect.max.x {
        code |= right;
    }
    if point.y < rect.min.y {
        code |= top;
    } else if point.y > rect.max.y {
        code |= bottom;
    }
    code
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;

    fn rect(size: f32) -> PixelRect {
        PixelRect::from_size(ViewportSize::new(size, size))
    }

    #[test]
    fn clip_segment_inside() {
        let start = PixelPoint::new(2.0, 2.0);
        let end = PixelPoint::new(8.0, 8.0);
        let clipped = clip_segment(start, end, rect(10.0)).expect("segment should clip");
        assert_eq!(clipped, (start, end));
    }

    #[test]
    fn clip_segment_crossing_edge() {
        let clipped = clip_segment(
            PixelPoint::new(5.0, 5.0),
            PixelPoint::new(15.0, 5.0),
            rect(10.0),
        )
        .expect("segment should clip");
        assert_eq!(clipped.1, PixelPoint::new(10.0, 5.0));

        let outside = clip_segment(
            PixelPoint::new(11.0, 1.0),
            PixelPoint::new(12.0, 9.0),
            rect(10.0),
        );
        assert!(outside.is_none());
    }

    #[test]
    fn grid_lines_cover_range() {
        assert_eq!(
            grid_lines(Range::new(-150.0, 120.0), 100.0, 16),
            vec![-100.0, 0.0, 100.0]
        );
        assert!(grid_lines(Range::new(0.0, 1e9), 1.0, 16).is_empty());
        assert!(grid_lines(Range::new(0.0, 1.0), 0.0, 16).is_empty());
    }

    #[test]
    fn frame_contains_series_segments() {
        let mut graph = Graph::new();
        let id = graph
            .add_series(
                [
                    Point::new(0.0, 0.0),
                    Point::new(1.0, 1.0),
                    Point::new(2.0, 0.5),
                ],
                LineStyle::new(Color::rgb(1.0, 0.0, 0.0), 2.0),
                16,
            )
            .unwrap();
        let frame = graph.prepare_frame().unwrap();
        let size = ViewportSize::new(200.0, 100.0);
        let list = build_frame(&graph, &frame, &Theme::default(), size);
        let style = graph.series_by_id(id).unwrap().style();
        let series_segments = list.commands().iter().find_map(|command| match command {
            RenderCommand::LineSegments { segments, style: s } if *s == style => {
                Some(segments.len())
            }
            _ => None,
        });
        assert_eq!(series_segments, Some(2));
        assert!(matches!(list.commands()[0], RenderCommand::Clear(_)));
    }

    #[test]
    fn empty_viewport_builds_nothing() {
        let mut graph = Graph::new();
        let frame = graph.prepare_frame().unwrap();
        let size = ViewportSize::new(0.0, 10.0);
        let list = build_frame(&graph, &frame, &Theme::default(), size);
        assert!(list.commands().is_empty());
    }
}
