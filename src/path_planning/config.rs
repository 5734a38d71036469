//! Planner configuration
//!
//! Every tunable of the bidirectional search lives here, including the
//! constants that earlier planner variants hard-coded differently (boundary
//! radius multiplier, rejection attempt cap, exhaustion limit).

use std::path::Path as FsPath;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::common::{PlanningError, PlanningResult};
use crate::path_planning::sampler::DistributionType;

/// Independently toggleable search extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Strategy {
    /// Dynamic-domain rejection sampling around boundary vertices
    pub dynamic_domain: bool,
    /// Rank nearest-neighbor candidates with the joint-weighted metric
    pub weighted_metric: bool,
    /// Occasionally target the opposite tree's root directly
    pub goal_bias: bool,
    /// Skip vertices whose extension failed too often
    pub exhaustion: bool,
    /// Pick uniformly among the k nearest instead of the single nearest
    pub k_nearest: bool,
}

impl Default for Strategy {
    fn default() -> Self {
        Self {
            dynamic_domain: true,
            weighted_metric: true,
            goal_bias: true,
            exhaustion: true,
            k_nearest: true,
        }
    }
}

impl Strategy {
    /// Plain RRT-Connect with every extension disabled
    pub fn baseline() -> Self {
        Self {
            dynamic_domain: false,
            weighted_metric: false,
            goal_bias: false,
            exhaustion: false,
            k_nearest: false,
        }
    }
}

/// Configuration for the RRT-Connect planner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Fixed step length of the connect stepper
    pub delta: f64,
    /// Wall-clock time budget of one search
    #[serde(with = "duration_secs")]
    pub duration: Duration,
    /// Optional cap on outer iterations, checked next to the deadline
    pub max_iterations: Option<u64>,
    /// Distribution of free-space samples
    pub distribution: DistributionType,
    /// Enabled search extensions
    pub strategy: Strategy,
    /// Probability of sampling the opposite root when goal bias is on
    pub goal_bias_probability: f64,
    /// Boundary radius as a multiple of `delta`
    pub boundary_radius_factor: f64,
    /// Rejection-loop attempts before a candidate is accepted unconditionally
    pub rejection_attempts: usize,
    /// Failures after which a vertex counts as exhausted
    pub exhaustion_limit: u32,
    /// k = max(1, ceil(vertex_count / k_nearest_divisor))
    pub k_nearest_divisor: usize,
    /// Tolerance under which two configurations count as equal
    pub equality_epsilon: f64,
    /// Seed for the sampler; entropy when absent
    pub seed: Option<u64>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            delta: 1.0_f64.to_radians(),
            duration: Duration::from_secs(10),
            max_iterations: None,
            distribution: DistributionType::Normal,
            strategy: Strategy::default(),
            goal_bias_probability: 0.05,
            boundary_radius_factor: 10.0,
            rejection_attempts: 30,
            exhaustion_limit: 10,
            k_nearest_divisor: 100,
            equality_epsilon: 1e-6,
            seed: None,
        }
    }
}

impl PlannerConfig {
    /// Radius assigned to boundary vertices
    pub fn boundary_radius(&self) -> f64 {
        self.boundary_radius_factor * self.delta
    }

    pub fn from_json_str(json: &str) -> PlanningResult<Self> {
        let config: PlannerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<FsPath>>(path: P) -> PlanningResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_file<P: AsRef<FsPath>>(&self, path: P) -> PlanningResult<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Reject values the search cannot run with
    pub fn validate(&self) -> PlanningResult<()> {
        if !(self.delta.is_finite() && self.delta > 0.0) {
            return Err(PlanningError::InvalidParameter(format!(
                "delta must be positive and finite, got {}",
                self.delta
            )));
        }
        if self.duration.is_zero() {
            return Err(PlanningError::InvalidParameter(
                "duration must be non-zero".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.goal_bias_probability) {
            return Err(PlanningError::InvalidParameter(format!(
                "goal_bias_probability must be in [0, 1], got {}",
                self.goal_bias_probability
            )));
        }
        if !(self.boundary_radius_factor.is_finite() && self.boundary_radius_factor > 0.0) {
            return Err(PlanningError::InvalidParameter(format!(
                "boundary_radius_factor must be positive, got {}",
                self.boundary_radius_factor
            )));
        }
        if self.rejection_attempts == 0 {
            return Err(PlanningError::InvalidParameter(
                "rejection_attempts must be at least 1".to_string(),
            ));
        }
        if self.k_nearest_divisor == 0 {
            return Err(PlanningError::InvalidParameter(
                "k_nearest_divisor must be at least 1".to_string(),
            ));
        }
        if !(self.equality_epsilon >= 0.0) {
            return Err(PlanningError::InvalidParameter(format!(
                "equality_epsilon must be non-negative, got {}",
                self.equality_epsilon
            )));
        }
        Ok(())
    }
}

/// Durations as fractional seconds in JSON
mod duration_secs {
    use std::time::Duration;

    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(d.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(D::Error::custom)
    }
}
