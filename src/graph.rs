//! The graph widget core and its builder.

use glam::DMat4;
use tracing::{debug, trace, warn};

use crate::config::GraphConfig;
use crate::datasource::BufferUpdate;
use crate::error::{GraphError, Result};
use crate::geom::{PixelPoint, Point, ViewportSize};
use crate::interaction::{AxisModifier, GestureController, GestureState};
use crate::render::LineStyle;
use crate::series::{Series, SeriesId};
use crate::state::{GraphEvent, ViewState};
use crate::transform::{Axis, ViewTransform};
use crate::view::{ViewMode, Viewport};

/// Snapshot handed to a renderer at the start of a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Transform in effect for the frame.
    pub transform: ViewTransform,
    /// Visible data rectangle.
    pub bounds: Viewport,
}

impl Frame {
    /// Orthographic pan/zoom matrix.
    pub fn matrix(&self) -> DMat4 {
        self.transform.matrix()
    }

    /// Matrix as column-major `f32` for GPU uniforms.
    pub fn gpu_matrix(&self) -> [[f32; 4]; 4] {
        self.transform.gpu_matrix()
    }
}

/// Live line graph: bounded series, view state and gesture handling.
///
/// All operations are synchronous. Notifications are queued and retrieved
/// with [`take_events`](Self::take_events).
#[derive(Debug, Clone)]
pub struct Graph {
    config: GraphConfig,
    view: ViewState,
    series: Vec<Series>,
    gestures: GestureController,
    initialized: bool,
}

impl Graph {
    /// Create a graph with default configuration.
    pub fn new() -> Self {
        let config = GraphConfig::default();
        Self {
            gestures: GestureController::new(config.zoom_step),
            config,
            view: ViewState::default(),
            series: Vec::new(),
            initialized: false,
        }
    }

    /// Create a graph from a configuration.
    pub fn with_config(config: GraphConfig) -> Result<Self> {
        let transform = ViewTransform::from_config(&config)?;
        Ok(Self {
            gestures: GestureController::new(config.zoom_step),
            config,
            view: ViewState::new(transform),
            series: Vec::new(),
            initialized: false,
        })
    }

    /// Start building a graph with custom configuration.
    pub fn builder() -> GraphBuilder {
        GraphBuilder::default()
    }

    /// Access the configuration.
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Access the view state.
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Active view mode.
    pub fn view_mode(&self) -> ViewMode {
        self.view.mode
    }

    /// Whether freeform auto-scaling is active.
    pub fn is_auto_scale(&self) -> bool {
        self.view.mode == ViewMode::FreeformAutoScale
    }

    /// Current pan/zoom transform.
    pub fn transform(&self) -> &ViewTransform {
        &self.view.transform
    }

    /// Visible data rectangle.
    pub fn visible_bounds(&self) -> Result<Viewport> {
        self.view.visible_bounds()
    }

    /// Extrema of every point observed since the last clear.
    pub fn extrema(&self) -> Option<Viewport> {
        self.view.extrema.bounds()
    }

    /// Whether any point was observed since the last clear.
    pub fn has_points(&self) -> bool {
        self.view.extrema.has_points()
    }

    /// Drag state of the gesture controller.
    pub fn gesture_state(&self) -> GestureState {
        self.gestures.state()
    }

    /// Access all series in creation order.
    pub fn series(&self) -> &[Series] {
        &self.series
    }

    /// Look up a series by handle.
    pub fn series_by_id(&self, id: SeriesId) -> Option<&Series> {
        self.series.get(id.0)
    }

    /// Create a series seeded with `initial` points.
    ///
    /// Only the newest `capacity` initial points are retained, but all of
    /// them contribute to the extrema.
    pub fn add_series<I>(
        &mut self,
        initial: I,
        style: LineStyle,
        capacity: usize,
    ) -> Result<SeriesId>
    where
        I: IntoIterator<Item = Point>,
    {
        let initial: Vec<Point> = initial.into_iter().collect();
        let id = SeriesId(self.series.len());
        let series = Series::new(id, style, capacity, initial.iter().copied())?;
        self.series.push(series);
        debug!(series = id.0, capacity, points = initial.len(), "series added");

        if !initial.is_empty() {
            for point in &initial {
                self.view.extrema.observe(*point);
            }
            self.view.reconcile(&self.config);
        }
        Ok(id)
    }

    /// Create an empty series with the configured default capacity.
    pub fn add_series_default(&mut self, style: LineStyle) -> Result<SeriesId> {
        self.add_series(std::iter::empty(), style, self.config.default_capacity)
    }

    /// Replace the display attributes of a series.
    pub fn set_series_style(&mut self, id: SeriesId, style: LineStyle) -> Result<()> {
        let series = self.series_mut(id)?;
        series.set_style(style);
        Ok(())
    }

    /// Append a point to a series.
    ///
    /// A full series evicts its oldest point first. Extrema and the viewport
    /// are reconciled before this returns.
    pub fn append_point(&mut self, id: SeriesId, point: Point) -> Result<BufferUpdate> {
        let update = self.series_mut(id)?.push(point);
        self.view.extrema.observe(point);
        self.view.reconcile(&self.config);
        trace!(series = id.0, x = point.x, y = point.y, ?update, "point appended");
        Ok(update)
    }

    /// Append several points to a series.
    ///
    /// Reports [`BufferUpdate::Shifted`] if any point was evicted, otherwise
    /// the index of the first new point.
    pub fn extend_points<I>(&mut self, id: SeriesId, points: I) -> Result<BufferUpdate>
    where
        I: IntoIterator<Item = Point>,
    {
        let series = self.series_mut(id)?;
        let mut summary = BufferUpdate::Appended {
            index: series.len(),
        };
        let mut observed = Vec::new();
        for point in points {
            if series.push(point) == BufferUpdate::Shifted {
                summary = BufferUpdate::Shifted;
            }
            observed.push(point);
        }
        for point in observed {
            self.view.extrema.observe(point);
            self.view.reconcile(&self.config);
        }
        Ok(summary)
    }

    /// Empty every series and forget the extrema.
    ///
    /// Capacities and styles are kept and the view returns to auto-scale.
    pub fn clear(&mut self) {
        for series in &mut self.series {
            series.clear();
        }
        self.view.extrema.reset();
        self.view.mode = ViewMode::FreeformAutoScale;
        self.view.mark_dirty();
        debug!(series = self.series.len(), "graph cleared");
    }

    /// Switch freeform auto-scaling on or off.
    ///
    /// Turning it on refits all bounds immediately when data exists.
    pub fn set_auto_scale(&mut self, enabled: bool) {
        if enabled {
            self.view.mode = ViewMode::FreeformAutoScale;
            self.view.reconcile(&self.config);
        } else if self.view.mode == ViewMode::FreeformAutoScale {
            self.view.mode = ViewMode::ManualFixed;
        }
        debug!(mode = ?self.view.mode, "auto-scale set");
    }

    /// Keep the X axis on a trailing window of `width` data units.
    pub fn set_follow_window(&mut self, width: f64) -> Result<()> {
        if !width.is_finite() || width <= 0.0 {
            warn!(width, "rejected follow window");
            return Err(GraphError::InvalidWindow(width));
        }
        self.view.mode = ViewMode::ManualFollowWindow { width };
        self.view.reconcile(&self.config);
        debug!(width, "following latest window");
        Ok(())
    }

    /// Follow the latest data with the configured window width.
    pub fn follow_latest(&mut self) -> Result<()> {
        self.set_follow_window(self.config.follow_window)
    }

    /// Let follow mode auto-scale the Y axis.
    pub fn set_auto_scale_y(&mut self, enabled: bool) {
        self.view.auto_scale_y = enabled;
        if enabled && self.view.follows_x() {
            self.view.reconcile_y(&self.config);
        }
    }

    /// Set both zoom factors.
    pub fn set_zoom(&mut self, zoom_x: f64, zoom_y: f64) -> Result<()> {
        self.manual_edit(|transform| transform.set_zoom(zoom_x, zoom_y))
    }

    /// Set the X zoom factor.
    pub fn set_zoom_x(&mut self, zoom: f64) -> Result<()> {
        self.manual_edit(|transform| transform.set_axis_zoom(Axis::X, zoom))
    }

    /// Set the Y zoom factor.
    pub fn set_zoom_y(&mut self, zoom: f64) -> Result<()> {
        self.manual_edit(|transform| transform.set_axis_zoom(Axis::Y, zoom))
    }

    /// Set both offsets.
    pub fn set_offset(&mut self, offset_x: f64, offset_y: f64) -> Result<()> {
        self.manual_edit(|transform| transform.set_offset(offset_x, offset_y))
    }

    /// Set the X offset.
    pub fn set_offset_x(&mut self, offset: f64) -> Result<()> {
        self.manual_edit(|transform| transform.set_axis_offset(Axis::X, offset))
    }

    /// Set the Y offset.
    pub fn set_offset_y(&mut self, offset: f64) -> Result<()> {
        self.manual_edit(|transform| transform.set_axis_offset(Axis::Y, offset))
    }

    /// Move the left edge to `value`, keeping the right edge.
    ///
    /// Skipped silently unless `value` is below the right edge. Returns
    /// whether the edge moved.
    pub fn adjust_min_x(&mut self, value: f64) -> bool {
        self.manual_adjust(|transform| transform.adjust_min(Axis::X, value))
    }

    /// Move the right edge to `value`, keeping the left edge.
    pub fn adjust_max_x(&mut self, value: f64) -> bool {
        self.manual_adjust(|transform| transform.adjust_max(Axis::X, value))
    }

    /// Move the bottom edge to `value`, keeping the top edge.
    pub fn adjust_min_y(&mut self, value: f64) -> bool {
        self.manual_adjust(|transform| transform.adjust_min(Axis::Y, value))
    }

    /// Move the top edge to `value`, keeping the bottom edge.
    pub fn adjust_max_y(&mut self, value: f64) -> bool {
        self.manual_adjust(|transform| transform.adjust_max(Axis::Y, value))
    }

    /// Primary button pressed at `pos`.
    pub fn on_primary_press(&mut self, pos: PixelPoint) {
        self.gestures.on_primary_press(pos);
    }

    /// Primary button released.
    pub fn on_primary_release(&mut self) {
        self.gestures.on_primary_release();
    }

    /// Pointer moved to `pos` in a viewport of `size`.
    pub fn on_pointer_move(&mut self, pos: PixelPoint, size: ViewportSize) {
        if let Err(err) = self.gestures.on_pointer_move(&mut self.view, pos, size) {
            debug!(%err, "pointer move ignored");
        }
    }

    /// Wheel turned at `pos`; `raw_delta` sign selects zoom in or out.
    pub fn on_wheel(
        &mut self,
        pos: PixelPoint,
        raw_delta: f32,
        modifier: AxisModifier,
        size: ViewportSize,
    ) {
        if let Err(err) = self
            .gestures
            .on_wheel(&mut self.view, pos, raw_delta, modifier, size)
        {
            debug!(%err, "wheel zoom ignored");
        }
    }

    /// Record that the render backend finished its setup.
    ///
    /// Only the first call queues [`GraphEvent::Initialized`].
    pub fn mark_initialized(&mut self) {
        if !self.initialized {
            self.initialized = true;
            self.view.events.push(GraphEvent::Initialized);
        }
    }

    /// Snapshot the transform for a new frame.
    ///
    /// Queues [`GraphEvent::BoundsChanged`] if the bounds changed since the
    /// previous frame.
    pub fn prepare_frame(&mut self) -> Result<Frame> {
        let bounds = self.view.flush_bounds()?;
        Ok(Frame {
            transform: self.view.transform,
            bounds,
        })
    }

    /// Drain queued notifications in the order they occurred.
    pub fn take_events(&mut self) -> Vec<GraphEvent> {
        std::mem::take(&mut self.view.events)
    }

    fn series_mut(&mut self, id: SeriesId) -> Result<&mut Series> {
        match self.series.get_mut(id.0) {
            Some(series) => Ok(series),
            None => {
                warn!(series = id.0, "unknown series handle, operation skipped");
                Err(GraphError::InvalidHandle(id))
            }
        }
    }

    fn manual_edit(
        &mut self,
        edit: impl FnOnce(&mut ViewTransform) -> Result<()>,
    ) -> Result<()> {
        let mut next = self.view.transform;
        if let Err(err) = edit(&mut next) {
            warn!(%err, "transform setter rejected");
            return Err(err);
        }
        self.view.demote_to_manual();
        self.view.transform = next;
        self.view.mark_dirty();
        Ok(())
    }

    fn manual_adjust(&mut self, adjust: impl FnOnce(&mut ViewTransform) -> bool) -> bool {
        let applied = adjust(&mut self.view.transform);
        if applied {
            self.view.demote_to_manual();
        }
        self.view.mark_dirty();
        applied
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for configuring a graph before construction.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    config: GraphConfig,
    follow_window: Option<f64>,
    auto_scale_y: bool,
}

impl GraphBuilder {
    /// Set the configuration.
    pub fn config(mut self, config: GraphConfig) -> Self {
        self.config = config;
        self
    }

    /// Start in follow mode with the given window width.
    pub fn follow_window(mut self, width: f64) -> Self {
        self.follow_window = Some(width);
        self
    }

    /// Auto-scale Y while following.
    pub fn auto_scale_y(mut self, enabled: bool) -> Self {
        self.auto_scale_y = enabled;
        self
    }

    /// Build the graph.
    pub fn build(self) -> Result<Graph> {
        let mut graph = Graph::with_config(self.config)?;
        graph.view.auto_scale_y = self.auto_scale_y;
        if let Some(width) = self.follow_window {
            graph.set_follow_window(width)?;
        }
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::Range;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn unknown_handle_is_skipped() {
        let mut graph = Graph::new();
        let before = *graph.transform();
        let result = graph.append_point(SeriesId(3), Point::new(1.0, 1.0));
        assert_eq!(result, Err(GraphError::InvalidHandle(SeriesId(3))));
        assert!(!graph.has_points());
        assert_eq!(*graph.transform(), before);
        assert!(graph.set_series_style(SeriesId(0), LineStyle::default()).is_err());
    }

    #[test]
    fn zero_capacity_creates_nothing() {
        let mut graph = Graph::new();
        let result = graph.add_series([Point::new(0.0, 0.0)], LineStyle::default(), 0);
        assert_eq!(result, Err(GraphError::InvalidCapacity));
        assert!(graph.series().is_empty());
        assert!(!graph.has_points());
    }

    #[test]
    fn handles_are_dense() {
        let mut graph = Graph::new();
        let a = graph.add_series_default(LineStyle::default()).unwrap();
        let b = graph.add_series_default(LineStyle::default()).unwrap();
        assert_eq!((a.index(), b.index()), (0, 1));
        assert_eq!(
            graph.series_by_id(b).unwrap().capacity(),
            GraphConfig::default().default_capacity
        );
    }

    #[test]
    fn initial_points_feed_extrema_and_view() {
        let mut graph = Graph::new();
        graph
            .add_series(
                [Point::new(-4.0, 1.0), Point::new(0.0, 9.0), Point::new(6.0, 2.0)],
                LineStyle::default(),
                2,
            )
            .unwrap();
        assert_eq!(graph.series()[0].len(), 2);
        let extrema = graph.extrema().unwrap();
        assert_eq!(extrema.x, Range::new(-4.0, 6.0));
        let bounds = graph.visible_bounds().unwrap();
        assert!(close(bounds.x.min, -4.0));
        assert!(close(bounds.x.max, 6.0));
    }

    #[test]
    fn setters_demote_and_reject_degenerate_values() {
        let mut graph = Graph::new();
        assert_eq!(graph.set_zoom_x(0.0), Err(GraphError::DegenerateTransform));
        assert!(graph.is_auto_scale());
        graph.set_zoom(0.5, 0.25).unwrap();
        graph.set_offset_y(0.1).unwrap();
        assert_eq!(graph.view_mode(), ViewMode::ManualFixed);
        assert_eq!(graph.transform().zoom(), (0.5, 0.25));
        assert_eq!(graph.transform().offset().1, 0.1);
        assert_eq!(graph.take_events(), vec![GraphEvent::AutoScaleCleared]);
    }

    #[test]
    fn explicit_adjust_demotes_only_when_applied() {
        let mut graph = Graph::new();
        let before = *graph.transform();
        assert!(!graph.adjust_min_x(1e9));
        assert_eq!(*graph.transform(), before);
        assert!(graph.is_auto_scale());
        assert!(graph.adjust_max_y(10.0));
        assert_eq!(graph.view_mode(), ViewMode::ManualFixed);
    }

    #[test]
    fn auto_scale_toggle_refits() {
        let mut graph = Graph::new();
        let id = graph.add_series_default(LineStyle::default()).unwrap();
        graph.set_auto_scale(false);
        graph.append_point(id, Point::new(10.0, 10.0)).unwrap();
        graph.append_point(id, Point::new(20.0, 30.0)).unwrap();
        let manual = graph.visible_bounds().unwrap();
        assert!(close(manual.x.max, 20_000.0));

        graph.set_auto_scale(true);
        let bounds = graph.visible_bounds().unwrap();
        assert!(close(bounds.x.min, 10.0));
        assert!(close(bounds.x.max, 20.0));
        assert!(close(bounds.y.min, 10.0 - 0.4));
        assert!(close(bounds.y.max, 30.0 + 0.4));
        assert!(graph.take_events().is_empty());
    }

    #[test]
    fn auto_scale_without_points_keeps_bounds() {
        let mut graph = Graph::new();
        let before = *graph.transform();
        graph.set_auto_scale(false);
        graph.set_auto_scale(true);
        assert_eq!(*graph.transform(), before);
    }

    #[test]
    fn follow_window_validation_and_tracking() {
        let mut graph = Graph::new();
        assert_eq!(
            graph.set_follow_window(-1.0),
            Err(GraphError::InvalidWindow(-1.0))
        );
        let id = graph.add_series_default(LineStyle::default()).unwrap();
        graph.set_follow_window(5.0).unwrap();
        graph.set_auto_scale_y(true);
        for i in 0..=20 {
            graph
                .append_point(id, Point::new(i as f64, (i % 3) as f64))
                .unwrap();
        }
        let bounds = graph.visible_bounds().unwrap();
        assert!(close(bounds.x.min, 15.0));
        assert!(close(bounds.x.max, 20.0));
        assert!(close(bounds.y.min, -0.04));
        assert!(close(bounds.y.max, 2.04));
    }

    #[test]
    fn frame_notifies_bounds_once() {
        let mut graph = Graph::new();
        graph.mark_initialized();
        graph.mark_initialized();
        let frame = graph.prepare_frame().unwrap();
        graph.prepare_frame().unwrap();
        let events = graph.take_events();
        assert_eq!(
            events,
            vec![GraphEvent::Initialized, GraphEvent::BoundsChanged(frame.bounds)]
        );
        assert!((frame.gpu_matrix()[0][0] - 1e-4).abs() < 1e-9);
    }

    #[test]
    fn builder_starts_in_follow_mode() {
        let graph = Graph::builder()
            .config(GraphConfig {
                follow_window: 2.0,
                ..GraphConfig::default()
            })
            .follow_window(3.0)
            .auto_scale_y(true)
            .build()
            .unwrap();
        assert_eq!(graph.view_mode(), ViewMode::ManualFollowWindow { width: 3.0 });
        assert!(graph.view().auto_scales_y());
    }
}
