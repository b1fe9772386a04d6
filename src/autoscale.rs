//! Automatic viewport fitting for the three view modes.

use crate::config::GraphConfig;
use crate::transform::{Axis, ViewTransform, axis_range};
use crate::view::{Extrema, Range, ViewMode, Viewport};

/// Relative overshoot of a fitted edge still treated as on target.
const FIT_TOLERANCE: f64 = 1e-12;

/// Y range that keeps all data visible with proportional padding.
pub fn padded_y(extrema: Viewport, config: &GraphConfig) -> Range {
    extrema
        .y
        .padded(config.y_padding_frac, config.y_padding_basis)
}

/// Trailing X window of `width` behind the newest X value.
///
/// Until the data spans more than `width`, the window starts at the oldest X.
pub fn follow_range(extrema_x: Range, width: f64) -> Range {
    if extrema_x.span() > width {
        Range::new(extrema_x.max - width, extrema_x.max)
    } else {
        Range::new(extrema_x.min, extrema_x.min + width)
    }
}

/// Recompute the automatically managed bounds for `mode`.
///
/// Returns `true` when at least one bound adjustment was attempted.
pub(crate) fn reconcile(
    transform: &mut ViewTransform,
    extrema: &Extrema,
    mode: ViewMode,
    auto_scale_y: bool,
    config: &GraphConfig,
) -> bool {
    let Some(data) = extrema.bounds() else {
        return false;
    };
    match mode {
        ViewMode::FreeformAutoScale => {
            let x = fit_axis(transform, Axis::X, data.x);
            let y = fit_axis(transform, Axis::Y, padded_y(data, config));
            x || y
        }
        ViewMode::ManualFollowWindow { width } => {
            let x = fit_axis(transform, Axis::X, follow_range(data.x, width));
            let y = auto_scale_y && fit_axis(transform, Axis::Y, padded_y(data, config));
            x || y
        }
        ViewMode::ManualFixed => false,
    }
}

/// Refit only the Y axis, used when Y auto-scaling is switched on.
pub(crate) fn reconcile_y(
    transform: &mut ViewTransform,
    extrema: &Extrema,
    config: &GraphConfig,
) -> bool {
    match extrema.bounds() {
        Some(data) => fit_axis(transform, Axis::Y, padded_y(data, config)),
        None => false,
    }
}

/// Move both edges of `axis` onto `target`.
///
/// A collapsed target cannot be fitted directly, so the upper edge is moved
/// onto it, or the lower edge when the upper one cannot move.
fn fit_axis(transform: &mut ViewTransform, axis: Axis, target: Range) -> bool {
    if let Ok(current) = transform.visible_bounds()
        && encloses_tightly(axis_range(current, axis), target)
    {
        return false;
    }
    if !transform.fit(axis, target) && !transform.adjust_max(axis, target.max) {
        transform.adjust_min(axis, target.min);
    }
    true
}

/// `current` contains `target` and overshoots it by round-off at most.
fn encloses_tightly(current: Range, target: Range) -> bool {
    let slack = FIT_TOLERANCE * target.min.abs().max(target.max.abs()).max(target.span());
    current.min <= target.min
        && current.max >= target.max
        && target.min - current.min <= slack
        && current.max - target.max <= slack
}
