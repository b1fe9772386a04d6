//! livegraph is the core of a live line graph for streaming telemetry.
//! Series keep a bounded window of recent points while the viewport
//! auto-scales, follows the newest data, or stays under manual pan and zoom.

#![forbid(unsafe_code)]

pub mod autoscale;
pub mod config;
pub mod datasource;
pub mod error;
pub mod geom;
pub mod graph;
pub mod interaction;
pub mod render;
pub mod series;
pub mod state;
pub mod style;
pub mod transform;
pub mod view;

#[cfg(feature = "gpui")]
pub mod gpui_backend;

pub use config::GraphConfig;
pub use datasource::{BoundedData, BufferUpdate};
pub use error::{GraphError, Result};
#[cfg(feature = "gpui")]
pub use gpui_backend::{GpuiGraphView, GraphHandle};
pub use geom::{PixelPoint, Point, ViewportSize};
pub use graph::{Frame, Graph, GraphBuilder};
pub use interaction::{AxisModifier, GestureController, GestureState};
pub use render::{Color, LineSegment, LineStyle, RenderCommand, RenderList, build_frame};
pub use series::{Series, SeriesId};
pub use state::{GraphEvent, ViewState};
pub use style::Theme;
pub use transform::{Axis, ViewTransform};
pub use view::{Extrema, Range, ViewMode, Viewport};
