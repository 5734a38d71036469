//! rrt_connect - bidirectional sampling-based motion planning
//!
//! This crate provides an RRT-Connect planner for configuration spaces of
//! arbitrary dimension, extended with goal bias, dynamic-domain rejection
//! sampling, a joint-weighted nearest-neighbor metric and exhaustion-aware
//! randomized k-nearest selection.

// Core modules
pub mod common;
pub mod utils;

// Planner and reference models
pub mod path_planning;
pub mod models;

// Re-export common types for convenience
pub use common::{Configuration, Path, TreeRole, VertexId};
pub use common::{ConfigurationSpace, Viewer, Visualizable};
pub use common::{PlanningError, PlanningResult};
pub use path_planning::{PlanSystem, PlannerConfig, RrtConnectPlanner, SearchReport, SearchStatus, Strategy};
