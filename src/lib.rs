//! Calendar heatmap layout engine
//!
//! Maps dated values onto a week-aligned grid and derives view-box
//! geometry, labels and per-cell classes for painting.

pub mod heatmap;
pub mod logging;
pub mod services;
pub mod tui;
pub mod types;

pub use heatmap::{compute_layout, Heatmap};
