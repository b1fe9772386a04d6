//! Shared mutable view state and the notifications it produces.

use tracing::debug;

use crate::autoscale;
use crate::config::GraphConfig;
use crate::error::Result;
use crate::transform::ViewTransform;
use crate::view::{Extrema, ViewMode, Viewport};

/// Notification produced by a graph mutation.
///
/// Events are queued and handed out by
/// [`Graph::take_events`](crate::graph::Graph::take_events); nothing is
/// called back while the graph is being mutated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GraphEvent {
    /// The render backend finished its setup.
    Initialized,
    /// The visible bounds changed since the previous frame.
    BoundsChanged(Viewport),
    /// Auto-scaling was switched off by a gesture or a manual setter.
    AutoScaleCleared,
}

/// Transform, extrema and view policy of one graph.
///
/// Every component operation borrows this exclusively; there is no other
/// place view state lives.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub(crate) transform: ViewTransform,
    pub(crate) extrema: Extrema,
    pub(crate) mode: ViewMode,
    pub(crate) auto_scale_y: bool,
    pub(crate) bounds_dirty: bool,
    pub(crate) events: Vec<GraphEvent>,
}

impl ViewState {
    /// Create a view state with the given initial transform.
    pub fn new(transform: ViewTransform) -> Self {
        Self {
            transform,
            extrema: Extrema::new(),
            mode: ViewMode::default(),
            auto_scale_y: false,
            bounds_dirty: true,
            events: Vec::new(),
        }
    }

    /// Current pan/zoom transform.
    pub fn transform(&self) -> &ViewTransform {
        &self.transform
    }

    /// Extrema of every point observed since the last clear.
    pub fn extrema(&self) -> &Extrema {
        &self.extrema
    }

    /// Active view policy.
    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Whether follow mode also auto-scales Y.
    pub fn auto_scale_y(&self) -> bool {
        self.auto_scale_y
    }

    /// Whether bounds changed since the last frame.
    pub fn bounds_dirty(&self) -> bool {
        self.bounds_dirty
    }

    /// Visible data rectangle.
    pub fn visible_bounds(&self) -> Result<Viewport> {
        self.transform.visible_bounds()
    }

    /// X is pinned by follow mode and must not be panned.
    pub fn follows_x(&self) -> bool {
        matches!(self.mode, ViewMode::ManualFollowWindow { .. })
    }

    /// Y is auto-scaled by follow mode and must not be panned.
    pub fn auto_scales_y(&self) -> bool {
        self.follows_x() && self.auto_scale_y
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.bounds_dirty = true;
    }

    /// Leave auto-scale for manual control.
    ///
    /// Queues [`GraphEvent::AutoScaleCleared`] only on the actual transition,
    /// so repeated gestures produce a single notification.
    pub(crate) fn demote_to_manual(&mut self) {
        if self.mode == ViewMode::FreeformAutoScale {
            self.mode = ViewMode::ManualFixed;
            self.events.push(GraphEvent::AutoScaleCleared);
            debug!("auto-scale cleared, view is now manual");
        }
    }

    /// Apply the active view policy to the current extrema.
    pub(crate) fn reconcile(&mut self, config: &GraphConfig) {
        if autoscale::reconcile(
            &mut self.transform,
            &self.extrema,
            self.mode,
            self.auto_scale_y,
            config,
        ) {
            self.mark_dirty();
        }
    }

    pub(crate) fn reconcile_y(&mut self, config: &GraphConfig) {
        if autoscale::reconcile_y(&mut self.transform, &self.extrema, config) {
            self.mark_dirty();
        }
    }

    /// Hand out the bounds change for this frame, if any.
    pub(crate) fn flush_bounds(&mut self) -> Result<Viewport> {
        let bounds = self.transform.visible_bounds()?;
        if self.bounds_dirty {
            self.bounds_dirty = false;
            self.events.push(GraphEvent::BoundsChanged(bounds));
        }
        Ok(bounds)
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(ViewTransform::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demotion_notifies_once() {
        let mut state = ViewState::default();
        state.demote_to_manual();
        state.demote_to_manual();
        assert_eq!(state.mode(), ViewMode::ManualFixed);
        assert_eq!(state.events, vec![GraphEvent::AutoScaleCleared]);
    }

    #[test]
    fn follow_mode_is_not_demoted() {
        let mut state = ViewState::default();
        state.mode = ViewMode::ManualFollowWindow { width: 1.0 };
        state.demote_to_manual();
        assert!(state.events.is_empty());
        assert!(state.follows_x());
        assert!(!state.auto_scales_y());
    }

    #[test]
    fn bounds_flush_once_per_dirty_period() {
        let mut state = ViewState::default();
        state.flush_bounds().unwrap();
        state.flush_bounds().unwrap();
        assert_eq!(state.events.len(), 1);
        state.mark_dirty();
        state.flush_bounds().unwrap();
        assert_eq!(state.events.len(), 2);
    }
}
