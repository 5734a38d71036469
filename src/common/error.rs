//! Error types for rrt_connect

use std::time::Duration;

use thiserror::Error;

/// Main error type for motion planning
#[derive(Debug, Error)]
pub enum PlanningError {
    /// The search deadline elapsed before the two trees met
    #[error(
        "Planning error: no path found after {elapsed:?} \
         ({start_vertices} start-tree / {goal_vertices} goal-tree vertices)"
    )]
    NoPathFound {
        elapsed: Duration,
        start_vertices: usize,
        goal_vertices: usize,
    },
    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// Configuration has the wrong number of degrees of freedom
    #[error("Dimension mismatch: expected {expected} degrees of freedom, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    /// Start or goal configuration is in collision
    #[error("Colliding configuration: {0}")]
    CollidingConfiguration(String),
    /// Rejection sampling for a free configuration gave up
    #[error("Sampling error: no collision-free configuration after {attempts} attempts")]
    SamplingExhausted { attempts: usize },
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Planner configuration could not be parsed
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
    /// Visualization error
    #[error("Visualization error: {0}")]
    Visualization(String),
}

/// Result type alias for planning operations
pub type PlanningResult<T> = Result<T, PlanningError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PlanningError::DimensionMismatch { expected: 2, actual: 3 };
        assert_eq!(
            format!("{}", err),
            "Dimension mismatch: expected 2 degrees of freedom, got 3"
        );
    }

    #[test]
    fn test_no_path_display_mentions_tree_sizes() {
        let err = PlanningError::NoPathFound {
            elapsed: Duration::from_millis(5),
            start_vertices: 12,
            goal_vertices: 7,
        };
        let msg = err.to_string();
        assert!(msg.contains("12 start-tree"));
        assert!(msg.contains("7 goal-tree"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PlanningError = io_err.into();
        assert!(matches!(err, PlanningError::Io(_)));
    }
}
