//! Planar serial arm among circular obstacles
//!
//! Joint space is the configuration space; collisions are checked in the
//! workspace. Links are line segments of finite thickness, chained from a
//! base at the origin, each angle relative to the previous link.

use nalgebra::Point2;

use crate::common::{Configuration, ConfigurationSpace, PlanningError, PlanningResult};

/// Circle obstacle in the arm's workspace
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleObstacle {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

impl CircleObstacle {
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        Self { x, y, radius }
    }

    pub fn center(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }
}

#[derive(Debug, Clone)]
pub struct PlanarArm {
    link_lengths: Vec<f64>,
    lower: Configuration,
    upper: Configuration,
    link_radius: f64,
    obstacles: Vec<CircleObstacle>,
    position: Configuration,
    joints: Vec<Point2<f64>>,
}

impl PlanarArm {
    /// Arm with one revolute joint per link, each limited to `[-pi, pi]`
    pub fn new(link_lengths: Vec<f64>) -> PlanningResult<Self> {
        let dof = link_lengths.len();
        let lower = Configuration::from_element(dof, -std::f64::consts::PI);
        let upper = Configuration::from_element(dof, std::f64::consts::PI);
        Self::with_limits(link_lengths, lower, upper)
    }

    pub fn with_limits(
        link_lengths: Vec<f64>,
        lower: Configuration,
        upper: Configuration,
    ) -> PlanningResult<Self> {
        if link_lengths.is_empty() {
            return Err(PlanningError::InvalidParameter("arm needs at least one link".to_string()));
        }
        if link_lengths.iter().any(|l| !l.is_finite() || *l <= 0.0) {
            return Err(PlanningError::InvalidParameter(
                "link lengths must be positive".to_string(),
            ));
        }
        for limit in [&lower, &upper] {
            if limit.len() != link_lengths.len() {
                return Err(PlanningError::DimensionMismatch {
                    expected: link_lengths.len(),
                    actual: limit.len(),
                });
            }
        }

        let position = Configuration::zeros(link_lengths.len());
        let joints = forward_kinematics(&link_lengths, &position);
        Ok(PlanarArm {
            link_lengths,
            lower,
            upper,
            link_radius: 0.0,
            obstacles: Vec::new(),
            position,
            joints,
        })
    }

    /// Treat every link as a capsule of the given radius
    pub fn with_link_radius(mut self, radius: f64) -> Self {
        self.link_radius = radius.max(0.0);
        self
    }

    pub fn with_obstacle(mut self, obstacle: CircleObstacle) -> Self {
        self.obstacles.push(obstacle);
        self
    }

    pub fn obstacles(&self) -> &[CircleObstacle] {
        &self.obstacles
    }

    pub fn link_lengths(&self) -> &[f64] {
        &self.link_lengths
    }

    /// Base, every joint and the end effector for configuration `q`
    pub fn joint_positions(&self, q: &Configuration) -> Vec<Point2<f64>> {
        forward_kinematics(&self.link_lengths, q)
    }

    pub fn end_effector(&self, q: &Configuration) -> Point2<f64> {
        self.joint_positions(q)
            .last()
            .copied()
            .unwrap_or_else(Point2::origin)
    }

    /// Workspace points of the last `update_state`
    pub fn frames(&self) -> &[Point2<f64>] {
        &self.joints
    }

    fn within_limits(&self, q: &Configuration) -> bool {
        q.iter()
            .zip(self.lower.iter().zip(self.upper.iter()))
            .all(|(x, (lo, hi))| *x >= *lo && *x <= *hi)
    }

    fn links_hit_obstacle(&self, joints: &[Point2<f64>]) -> bool {
        joints.windows(2).any(|link| {
            self.obstacles.iter().any(|o| {
                segment_point_distance(&link[0], &link[1], &o.center()) <= o.radius + self.link_radius
            })
        })
    }

    /// Collision test that leaves the model state untouched
    pub fn is_free(&self, q: &Configuration) -> bool {
        self.within_limits(q) && !self.links_hit_obstacle(&self.joint_positions(q))
    }
}

impl ConfigurationSpace for PlanarArm {
    fn dof(&self) -> usize {
        self.link_lengths.len()
    }

    fn lower_bound(&self) -> &Configuration {
        &self.lower
    }

    fn upper_bound(&self) -> &Configuration {
        &self.upper
    }

    fn distance(&self, a: &Configuration, b: &Configuration) -> f64 {
        (a - b).norm()
    }

    fn set_position(&mut self, q: &Configuration) {
        self.position.copy_from(q);
    }

    fn update_state(&mut self) {
        self.joints = forward_kinematics(&self.link_lengths, &self.position);
    }

    fn is_colliding(&mut self) -> bool {
        !self.within_limits(&self.position) || self.links_hit_obstacle(&self.joints)
    }
}

fn forward_kinematics(link_lengths: &[f64], q: &Configuration) -> Vec<Point2<f64>> {
    let mut points = Vec::with_capacity(link_lengths.len() + 1);
    let mut current = Point2::origin();
    let mut theta = 0.0;
    points.push(current);
    for (length, angle) in link_lengths.iter().zip(q.iter()) {
        theta += angle;
        current = Point2::new(current.x + length * theta.cos(), current.y + length * theta.sin());
        points.push(current);
    }
    points
}

/// Distance from `p` to the segment `[a, b]`
fn segment_point_distance(a: &Point2<f64>, b: &Point2<f64>, p: &Point2<f64>) -> f64 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq == 0.0 {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).norm()
}
