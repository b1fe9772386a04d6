//! Tunable graph parameters.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Configuration for a [`Graph`](crate::graph::Graph).
///
/// Every field has a default, so partial JSON documents are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Grid line spacing on X, in data units.
    pub grid_x: f64,
    /// Grid line spacing on Y, in data units.
    pub grid_y: f64,
    /// Normalized offset applied before any data arrives.
    pub initial_offset: (f64, f64),
    /// Zoom multiplier per wheel notch.
    pub zoom_step: f64,
    /// Smallest accepted zoom magnitude.
    pub min_zoom: f64,
    /// Y padding as a fraction of the data span.
    pub y_padding_frac: f64,
    /// Minimum span used to compute Y padding.
    pub y_padding_basis: f64,
    /// Follow window width used by [`Graph::follow_latest`](crate::graph::Graph::follow_latest).
    pub follow_window: f64,
    /// Capacity used by [`Graph::add_series_default`](crate::graph::Graph::add_series_default).
    pub default_capacity: usize,
    /// Grid lines per axis above which the grid is skipped.
    pub max_grid_lines: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            grid_x: 10_000.0,
            grid_y: 100.0,
            initial_offset: (-1.0, -0.5),
            zoom_step: 1.1,
            min_zoom: 1e-12,
            y_padding_frac: 0.02,
            y_padding_basis: 1.0,
            follow_window: 10_000.0,
            default_capacity: 100_000,
            max_grid_lines: 256,
        }
    }
}

impl GraphConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Initial zoom: one grid cell spans half the normalized viewport.
    pub fn initial_zoom(&self) -> (f64, f64) {
        (1.0 / self.grid_x, 1.0 / self.grid_y)
    }
}
