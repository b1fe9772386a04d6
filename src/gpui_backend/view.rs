use std::sync::{Arc, PoisonError, RwLock};

use gpui::prelude::*;
use gpui::{
    Bounds, Modifiers, MouseButton, MouseDownEvent, MouseMoveEvent, MouseUpEvent, Pixels, Point,
    ScrollWheelEvent, Window, canvas, div, px,
};
use tracing::warn;

use crate::geom::{PixelPoint, ViewportSize};
use crate::graph::Graph;
use crate::interaction::{AxisModifier, GestureState};
use crate::render::{RenderList, build_frame};
use crate::state::GraphEvent;
use crate::style::Theme;

use super::paint::{GraphFrame, paint_frame, to_hsla};

type EventListener = Arc<dyn Fn(GraphEvent) + Send + Sync>;

/// A GPUI view that renders a [`Graph`] and drives its gestures.
///
/// Left-drag pans, the wheel zooms about the cursor. Holding control limits
/// the zoom to X, holding shift limits it to Y.
#[derive(Clone)]
pub struct GpuiGraphView {
    graph: Arc<RwLock<Graph>>,
    canvas: Arc<RwLock<Option<Bounds<Pixels>>>>,
    theme: Theme,
    listener: Option<EventListener>,
}

impl GpuiGraphView {
    /// Create a view for the given graph with the default theme.
    pub fn new(graph: Graph) -> Self {
        Self::with_theme(graph, Theme::default())
    }

    /// Create a view with a custom theme.
    pub fn with_theme(graph: Graph, theme: Theme) -> Self {
        Self {
            graph: Arc::new(RwLock::new(graph)),
            canvas: Arc::new(RwLock::new(None)),
            theme,
            listener: None,
        }
    }

    /// Deliver graph notifications to `listener` after each frame is prepared.
    ///
    /// Without a listener the notifications stay queued on the graph and can
    /// be drained through the handle.
    pub fn on_event(mut self, listener: impl Fn(GraphEvent) + Send + Sync + 'static) -> Self {
        self.listener = Some(Arc::new(listener));
        self
    }

    /// Get a handle for mutating the underlying graph.
    ///
    /// This is useful for streaming points from async tasks.
    pub fn graph_handle(&self) -> GraphHandle {
        GraphHandle {
            graph: Arc::clone(&self.graph),
        }
    }

    fn canvas_bounds(&self) -> Option<Bounds<Pixels>> {
        *self.canvas.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn local_point(&self, position: Point<Pixels>) -> Option<(PixelPoint, ViewportSize)> {
        let bounds = self.canvas_bounds()?;
        let pos = PixelPoint::new(
            f32::from(position.x - bounds.origin.x),
            f32::from(position.y - bounds.origin.y),
        );
        Some((pos, viewport_size(bounds)))
    }

    fn on_mouse_down(&mut self, ev: &MouseDownEvent, cx: &mut Context<Self>) {
        let Some((pos, _)) = self.local_point(ev.position) else {
            return;
        };
        self.graph_handle().write(|graph| graph.on_primary_press(pos));
        cx.notify();
    }

    fn on_mouse_move(&mut self, ev: &MouseMoveEvent, cx: &mut Context<Self>) {
        let Some((pos, size)) = self.local_point(ev.position) else {
            return;
        };
        let dragging = self.graph_handle().write(|graph| {
            graph.on_pointer_move(pos, size);
            graph.gesture_state() != GestureState::Idle
        });
        if dragging {
            cx.notify();
        }
    }

    fn on_mouse_up(&mut self, _ev: &MouseUpEvent, cx: &mut Context<Self>) {
        self.graph_handle().write(|graph| graph.on_primary_release());
        cx.notify();
    }

    fn on_scroll(&mut self, ev: &ScrollWheelEvent, _window: &Window, cx: &mut Context<Self>) {
        let Some((pos, size)) = self.local_point(ev.position) else {
            return;
        };
        let line_height = px(16.0);
        let delta = f32::from(ev.delta.pixel_delta(line_height).y);
        let modifier = axis_modifier(&ev.modifiers);
        self.graph_handle()
            .write(|graph| graph.on_wheel(pos, delta, modifier, size));
        cx.notify();
    }
}

impl Render for GpuiGraphView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let graph = Arc::clone(&self.graph);
        let canvas_bounds = Arc::clone(&self.canvas);
        let theme = self.theme.clone();
        let listener = self.listener.clone();

        div()
            .size_full()
            .bg(to_hsla(self.theme.background))
            .child(
                canvas(
                    move |bounds, _window, _| {
                        *canvas_bounds
                            .write()
                            .unwrap_or_else(PoisonError::into_inner) = Some(bounds);
                        let (render, events) = {
                            let mut graph = graph.write().unwrap_or_else(PoisonError::into_inner);
                            graph.mark_initialized();
                            let render = match graph.prepare_frame() {
                                Ok(frame) => {
                                    build_frame(&graph, &frame, &theme, viewport_size(bounds))
                                }
                                Err(err) => {
                                    warn!(%err, "frame skipped");
                                    RenderList::new()
                                }
                            };
                            let events = if listener.is_some() {
                                graph.take_events()
                            } else {
                                Vec::new()
                            };
                            (render, events)
                        };
                        if let Some(listener) = &listener {
                            for event in events {
                                listener(event);
                            }
                        }
                        GraphFrame { render, bounds }
                    },
                    move |_, frame, window, _| {
                        paint_frame(&frame, window);
                    },
                )
                .size_full(),
            )
            .on_mouse_down(
                MouseButton::Left,
                cx.listener(|this, ev, _, cx| {
                    this.on_mouse_down(ev, cx);
                }),
            )
            .on_mouse_move(cx.listener(|this, ev, _, cx| {
                this.on_mouse_move(ev, cx);
            }))
            .on_mouse_up(
                MouseButton::Left,
                cx.listener(|this, ev, _, cx| {
                    this.on_mouse_up(ev, cx);
                }),
            )
            .on_scroll_wheel(cx.listener(|this, ev, window, cx| {
                this.on_scroll(ev, window, cx);
            }))
    }
}

/// A handle for mutating a [`Graph`] held inside a `GpuiGraphView`.
///
/// The handle clones cheaply and can be moved into async tasks.
#[derive(Clone)]
pub struct GraphHandle {
    graph: Arc<RwLock<Graph>>,
}

impl GraphHandle {
    /// Read the graph state.
    ///
    /// The graph is locked for the duration of the callback.
    pub fn read<R>(&self, f: impl FnOnce(&Graph) -> R) -> R {
        let graph = self.graph.read().unwrap_or_else(PoisonError::into_inner);
        f(&graph)
    }

    /// Mutate the graph state.
    ///
    /// The graph is locked for the duration of the callback.
    pub fn write<R>(&self, f: impl FnOnce(&mut Graph) -> R) -> R {
        let mut graph = self.graph.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut graph)
    }
}

fn viewport_size(bounds: Bounds<Pixels>) -> ViewportSize {
    ViewportSize::new(
        f32::from(bounds.size.width),
        f32::from(bounds.size.height),
    )
}

fn axis_modifier(modifiers: &Modifiers) -> AxisModifier {
    if modifiers.control {
        AxisModifier::XOnly
    } else if modifiers.shift {
        AxisModifier::YOnly
    } else {
        AxisModifier::Both
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_limits_zoom_to_x_and_shift_to_y() {
        let control = Modifiers {
            control: true,
            ..Default::default()
        };
        let shift = Modifiers {
            shift: true,
            ..Default::default()
        };
        assert_eq!(axis_modifier(&control), AxisModifier::XOnly);
        assert_eq!(axis_modifier(&shift), AxisModifier::YOnly);
        assert_eq!(axis_modifier(&Modifiers::default()), AxisModifier::Both);
    }
}
