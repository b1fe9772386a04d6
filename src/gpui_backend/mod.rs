//! GPUI integration for livegraph.
//!
//! This module provides a GPUI view that renders a [`Graph`](crate::graph::Graph)
//! and forwards mouse drag and wheel input to its gesture controller.

mod paint;
mod view;

pub use view::{GpuiGraphView, GraphHandle};
