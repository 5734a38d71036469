//! Common types used throughout rrt_connect

use nalgebra::DVector;

use crate::common::traits::ConfigurationSpace;

/// A point in the robot's configuration space, one value per degree of freedom
pub type Configuration = DVector<f64>;

/// Identity of a vertex within its tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub usize);

impl VertexId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Which of the two search trees a value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TreeRole {
    /// Tree rooted at the start configuration
    Start,
    /// Tree rooted at the goal configuration
    Goal,
}

impl TreeRole {
    pub fn index(&self) -> usize {
        match self {
            TreeRole::Start => 0,
            TreeRole::Goal => 1,
        }
    }

    pub fn other(&self) -> TreeRole {
        match self {
            TreeRole::Start => TreeRole::Goal,
            TreeRole::Goal => TreeRole::Start,
        }
    }
}

/// Path represented as a sequence of configurations from start to goal
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    pub configurations: Vec<Configuration>,
}

impl Path {
    pub fn new() -> Self {
        Self { configurations: Vec::new() }
    }

    pub fn from_configurations(configurations: Vec<Configuration>) -> Self {
        Self { configurations }
    }

    pub fn push(&mut self, q: Configuration) {
        self.configurations.push(q);
    }

    pub fn len(&self) -> usize {
        self.configurations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configurations.is_empty()
    }

    pub fn first(&self) -> Option<&Configuration> {
        self.configurations.first()
    }

    pub fn last(&self) -> Option<&Configuration> {
        self.configurations.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Configuration> {
        self.configurations.iter()
    }

    /// Sum of model distances between consecutive configurations
    pub fn total_length<M: ConfigurationSpace + ?Sized>(&self, model: &M) -> f64 {
        self.configurations
            .windows(2)
            .map(|w| model.distance(&w[0], &w[1]))
            .sum()
    }

    /// Re-interpolate every segment so that consecutive configurations
    /// are at most `max_step` apart under the model's metric.
    pub fn subdivide<M: ConfigurationSpace + ?Sized>(&self, model: &M, max_step: f64) -> Path {
        let mut dense = Path::new();
        let Some(first) = self.configurations.first() else {
            return dense;
        };
        dense.push(first.clone());

        for w in self.configurations.windows(2) {
            let d = model.distance(&w[0], &w[1]);
            let n_steps = ((d / max_step).ceil() as usize).max(1);
            for i in 1..=n_steps {
                let t = i as f64 / n_steps as f64;
                dense.push(model.interpolate(&w[0], &w[1], t));
            }
        }

        dense
    }
}

impl FromIterator<Configuration> for Path {
    fn from_iter<I: IntoIterator<Item = Configuration>>(iter: I) -> Self {
        Self { configurations: iter.into_iter().collect() }
    }
}
