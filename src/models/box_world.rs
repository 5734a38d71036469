//! Euclidean box configuration space with box and sphere obstacles
//!
//! The simplest model the planner can run against: the configuration is a
//! point, the joint limits form an axis-aligned box, and obstacles are
//! axis-aligned boxes or balls in the same space.

use crate::common::{Configuration, ConfigurationSpace};

/// Axis-aligned box obstacle `[min, max]`
#[derive(Debug, Clone, PartialEq)]
pub struct BoxObstacle {
    pub min: Configuration,
    pub max: Configuration,
}

impl BoxObstacle {
    pub fn new(min: Configuration, max: Configuration) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, q: &Configuration) -> bool {
        q.iter()
            .zip(self.min.iter().zip(self.max.iter()))
            .all(|(x, (lo, hi))| *x >= *lo && *x <= *hi)
    }
}

/// Ball obstacle (center, radius)
#[derive(Debug, Clone, PartialEq)]
pub struct SphereObstacle {
    pub center: Configuration,
    pub radius: f64,
}

impl SphereObstacle {
    pub fn new(center: Configuration, radius: f64) -> Self {
        Self { center, radius }
    }

    pub fn contains(&self, q: &Configuration) -> bool {
        (q - &self.center).norm() <= self.radius
    }
}

/// Point robot in an N-dimensional box
#[derive(Debug, Clone)]
pub struct BoxWorld {
    lower: Configuration,
    upper: Configuration,
    boxes: Vec<BoxObstacle>,
    spheres: Vec<SphereObstacle>,
    position: Configuration,
    collision_queries: usize,
}

impl BoxWorld {
    /// Obstacle-free space with limits `[lower, upper]`
    pub fn new(lower: Configuration, upper: Configuration) -> Self {
        let position = lower.clone();
        BoxWorld {
            lower,
            upper,
            boxes: Vec::new(),
            spheres: Vec::new(),
            position,
            collision_queries: 0,
        }
    }

    pub fn with_box(mut self, min: Configuration, max: Configuration) -> Self {
        self.add_box(min, max);
        self
    }

    pub fn with_sphere(mut self, center: Configuration, radius: f64) -> Self {
        self.add_sphere(center, radius);
        self
    }

    pub fn add_box(&mut self, min: Configuration, max: Configuration) {
        self.boxes.push(BoxObstacle::new(min, max));
    }

    pub fn add_sphere(&mut self, center: Configuration, radius: f64) {
        self.spheres.push(SphereObstacle::new(center, radius));
    }

    pub fn boxes(&self) -> &[BoxObstacle] {
        &self.boxes
    }

    pub fn spheres(&self) -> &[SphereObstacle] {
        &self.spheres
    }

    pub fn position(&self) -> &Configuration {
        &self.position
    }

    /// Number of `is_colliding` calls so far
    pub fn collision_queries(&self) -> usize {
        self.collision_queries
    }

    fn within_limits(&self, q: &Configuration) -> bool {
        q.iter()
            .zip(self.lower.iter().zip(self.upper.iter()))
            .all(|(x, (lo, hi))| *x >= *lo && *x <= *hi)
    }

    /// Collision test that leaves the model state untouched
    pub fn is_free(&self, q: &Configuration) -> bool {
        self.within_limits(q)
            && !self.boxes.iter().any(|b| b.contains(q))
            && !self.spheres.iter().any(|s| s.contains(q))
    }
}

impl ConfigurationSpace for BoxWorld {
    fn dof(&self) -> usize {
        self.lower.len()
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

    fn is_colliding(&mut self) -> bool {
        self.collision_queries += 1;
        !self.is_free(&self.position)
    }
}
