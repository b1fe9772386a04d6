//! Plot theming.

use crate::render::{Color, LineStyle};

/// Visual theme for the plot background, grid and zero axes.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Background fill.
    pub background: Color,
    /// Grid line stroke.
    pub grid: LineStyle,
    /// Stroke of the lines through the data origin.
    pub axis: LineStyle,
}

impl Theme {
    /// Create the default theme.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::BLACK,
            grid: LineStyle {
                color: Color::new(0.7, 0.7, 0.7, 1.0),
                width: 0.7,
            },
            axis: LineStyle {
                color: Color::WHITE,
                width: 2.0,
            },
        }
    }
}
