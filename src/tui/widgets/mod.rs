//! TUI widgets

pub mod heatmap;
