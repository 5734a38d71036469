//! Utility modules for rrt_connect

pub mod viewer;
pub mod visualization;

pub use viewer::*;
pub use visualization::{colors, project, PathStyle, PointStyle, Visualizer};
