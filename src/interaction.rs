//! Pointer gestures for panning and zooming.
//!
//! Input backends decode their native events into the calls below. Pixel
//! positions use a top-left origin with Y growing downward.

use crate::error::Result;
use crate::geom::{PixelPoint, ViewportSize};
use crate::state::ViewState;
use crate::transform::pixel_to_normalized;

/// Drag state of the primary button.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    /// No button held.
    #[default]
    Idle,
    /// Primary button held.
    Dragging {
        /// Position of the press.
        anchor: PixelPoint,
        /// Position of the previous move event.
        last: PixelPoint,
    },
}

/// Which zoom factors a wheel event scales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisModifier {
    /// Scale both axes.
    #[default]
    Both,
    /// Scale only X.
    XOnly,
    /// Scale only Y.
    YOnly,
}

/// Translates drag and wheel input into transform updates.
#[derive(Debug, Clone)]
pub struct GestureController {
    state: GestureState,
    zoom_step: f64,
}

impl GestureController {
    /// Create a controller that zooms by `zoom_step` per wheel notch.
    pub fn new(zoom_step: f64) -> Self {
        let zoom_step = if zoom_step.is_finite() && zoom_step > 1.0 {
            zoom_step
        } else {
            1.1
        };
        Self {
            state: GestureState::Idle,
            zoom_step,
        }
    }

    /// Current drag state.
    pub fn state(&self) -> GestureState {
        self.state
    }

    /// Start dragging from `pos`.
    pub fn on_primary_press(&mut self, pos: PixelPoint) {
        self.state = GestureState::Dragging {
            anchor: pos,
            last: pos,
        };
    }

    /// Stop dragging.
    pub fn on_primary_release(&mut self) {
        self.state = GestureState::Idle;
    }

    /// Pan by the pointer delta since the previous event while dragging.
    ///
    /// X is left alone while follow mode pins it, Y while follow mode
    /// auto-scales it.
    pub fn on_pointer_move(
        &mut self,
        view: &mut ViewState,
        pos: PixelPoint,
        size: ViewportSize,
    ) -> Result<()> {
        let GestureState::Dragging { anchor, last } = self.state else {
            return Ok(());
        };
        let origin = pixel_to_normalized(last, size)?;
        let current = pixel_to_normalized(pos, size)?;
        view.demote_to_manual();

        let dx = if view.follows_x() {
            0.0
        } else {
            current.x - origin.x
        };
        let dy = if view.auto_scales_y() {
            0.0
        } else {
            current.y - origin.y
        };
        view.transform.pan(dx, dy);
        view.mark_dirty();
        self.state = GestureState::Dragging { anchor, last: pos };
        Ok(())
    }

    /// Zoom one notch about the data point under `pos`.
    ///
    /// A positive `raw_delta` zooms in, a negative one zooms out and zero is
    /// ignored. A zoom that would leave the usable range is rejected and the
    /// transform and view mode kept as they were.
    pub fn on_wheel(
        &mut self,
        view: &mut ViewState,
        pos: PixelPoint,
        raw_delta: f32,
        modifier: AxisModifier,
        size: ViewportSize,
    ) -> Result<()> {
        if raw_delta == 0.0 || raw_delta.is_nan() {
            return Ok(());
        }
        let cursor = pixel_to_normalized(pos, size)?;
        let cursor_data = view.transform.normalized_to_data(cursor)?;
        let factor = if raw_delta > 0.0 {
            self.zoom_step
        } else {
            self.zoom_step.recip()
        };
        let (zoom_x, zoom_y) = view.transform.zoom();
        let (scale_x, scale_y) = match modifier {
            AxisModifier::Both => (factor, factor),
            AxisModifier::XOnly => (factor, 1.0),
            AxisModifier::YOnly => (1.0, factor),
        };
        let (new_zoom_x, new_zoom_y) = (zoom_x * scale_x, zoom_y * scale_y);

        let mut next = view.transform;
        next.set_zoom(new_zoom_x, new_zoom_y)?;
        next.set_offset(
            cursor.x - cursor_data.x * new_zoom_x,
            cursor.y - cursor_data.y * new_zoom_y,
        )?;
        view.demote_to_manual();
        view.transform = next;
        view.mark_dirty();
        Ok(())
    }
}

impl Default for GestureController {
    fn default() -> Self {
        Self::new(1.1)
    }
}
