use gpui::{BorderStyle, Bounds, Corners, Edges, PathBuilder, Pixels, Window, point, px, quad};

use crate::geom::PixelPoint;
use crate::render::{Color, LineSegment, LineStyle, RenderCommand, RenderList};

/// Render list plus the canvas origin its pixel coordinates are relative to.
pub(crate) struct GraphFrame {
    pub(crate) render: RenderList,
    pub(crate) bounds: Bounds<Pixels>,
}

pub(crate) fn paint_frame(frame: &GraphFrame, window: &mut Window) {
    let origin = PixelPoint::new(
        f32::from(frame.bounds.origin.x),
        f32::from(frame.bounds.origin.y),
    );
    for command in frame.render.commands() {
        match command {
            RenderCommand::Clear(color) => {
                window.paint_quad(quad(
                    frame.bounds,
                    Corners::all(px(0.0)),
                    to_rgba(*color),
                    Edges::all(px(0.0)),
                    to_rgba(*color),
                    BorderStyle::default(),
                ));
            }
            RenderCommand::LineSegments { segments, style } => {
                paint_lines(window, origin, segments, *style);
            }
        }
    }
}

fn paint_lines(
    window: &mut Window,
    origin: PixelPoint,
    segments: &[LineSegment],
    style: LineStyle,
) {
    if segments.is_empty() {
        return;
    }
    let width = style.width.max(0.5);
    let mut builder = PathBuilder::stroke(px(width));
    for segment in segments {
        builder.move_to(point(
            px(origin.x + segment.start.x),
            px(origin.y + segment.start.y),
        ));
        builder.line_to(point(
            px(origin.x + segment.end.x),
            px(origin.y + segment.end.y),
        ));
    }
    if let Ok(path) = builder.build() {
        window.paint_path(path, to_rgba(style.color));
    }
}

fn to_rgba(color: Color) -> gpui::Rgba {
    gpui::Rgba {
        r: color.r,
        g: color.g,
        b: color.b,
        a: color.a,
    }
}

pub(crate) fn to_hsla(color: Color) -> gpui::Hsla {
    gpui::Hsla::from(to_rgba(color))
}
