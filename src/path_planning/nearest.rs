//! Nearest-neighbor selection
//!
//! Linear scans over a tree. Candidates are ranked either with the model's
//! transformed distance or with a joint-weighted Euclidean metric, but the
//! distance handed back is always the model's true distance, because that
//! is what the connect stepper sizes its steps with.

use itertools::Itertools;
use ordered_float::OrderedFloat;

use crate::common::{Configuration, ConfigurationSpace, VertexId};
use crate::path_planning::sampler::Sampler;
use crate::path_planning::tree::Tree;

/// Ranking metric for nearest-neighbor candidates
#[derive(Debug, Clone, PartialEq)]
pub enum Metric {
    /// The model's transformed distance
    Unweighted,
    /// `sqrt(sum(w[i] * (a[i] - b[i])^2))`
    Weighted(Configuration),
}

impl Metric {
    /// Metric with the default joint weights for `dof` joints
    pub fn weighted(dof: usize) -> Self {
        Metric::Weighted(joint_weights(dof))
    }

    fn rank<M: ConfigurationSpace + ?Sized>(&self, model: &M, a: &Configuration, b: &Configuration) -> f64 {
        match self {
            Metric::Unweighted => model.transformed_distance(a, b),
            Metric::Weighted(weights) => weighted_distance(weights, a, b),
        }
    }
}

/// Weights decreasing linearly from the base joint (1.0) towards the end
/// effector (1/dof).
pub fn joint_weights(dof: usize) -> Configuration {
    Configuration::from_fn(dof, |i, _| (dof - i) as f64 / dof as f64)
}

pub fn weighted_distance(weights: &Configuration, a: &Configuration, b: &Configuration) -> f64 {
    weights
        .iter()
        .zip(a.iter().zip(b.iter()))
        .map(|(w, (x, y))| w * (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Result of a nearest-neighbor query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub vertex: VertexId,
    /// True model distance from the query to `vertex`
    pub distance: f64,
}

/// Nearest-neighbor selector
#[derive(Debug, Clone)]
pub struct NearestNeighbor {
    metric: Metric,
    /// Skip vertices with at least this many failures
    exhaustion_limit: Option<u32>,
    /// Pick among the `ceil(n / divisor)` nearest
    k_nearest_divisor: Option<usize>,
}

impl NearestNeighbor {
    pub fn new(metric: Metric) -> Self {
        Self {
            metric,
            exhaustion_limit: None,
            k_nearest_divisor: None,
        }
    }

    pub fn with_exhaustion_limit(mut self, limit: u32) -> Self {
        self.exhaustion_limit = Some(limit);
        self
    }

    pub fn with_k_nearest(mut self, divisor: usize) -> Self {
        self.k_nearest_divisor = Some(divisor.max(1));
        self
    }

    pub fn metric(&self) -> &Metric {
        &self.metric
    }

    /// Number of candidates the randomized pick chooses from
    pub fn k_for(&self, vertex_count: usize) -> usize {
        match self.k_nearest_divisor {
            Some(divisor) => vertex_count.div_ceil(divisor).max(1),
            None => 1,
        }
    }

    /// Find the vertex of `tree` to extend towards `query`
    pub fn nearest<M: ConfigurationSpace + ?Sized>(
        &self,
        tree: &Tree,
        model: &M,
        query: &Configuration,
        sampler: &mut Sampler,
    ) -> Neighbor {
        let candidates = self.candidates(tree);
        let k = self.k_for(tree.len()).min(candidates.len());

        let chosen = if k <= 1 {
            self.best(tree, model, query, &candidates)
        } else {
            let ranked: Vec<(OrderedFloat<f64>, VertexId)> = candidates
                .iter()
                .map(|&id| (OrderedFloat(self.metric.rank(model, query, tree.configuration(id))), id))
                .k_smallest(k)
                .collect();
            ranked[sampler.choose_index(ranked.len())].1
        };

        Neighbor {
            vertex: chosen,
            distance: model.distance(query, tree.configuration(chosen)),
        }
    }

    /// Non-exhausted vertices, or every vertex if all of them are exhausted
    fn candidates(&self, tree: &Tree) -> Vec<VertexId> {
        let all = || tree.iter().map(|(v, _)| v.id).collect::<Vec<_>>();
        match self.exhaustion_limit {
            None => all(),
            Some(limit) => {
                let fresh: Vec<VertexId> = tree
                    .iter()
                    .filter(|(v, _)| v.fail_count < limit)
                    .map(|(v, _)| v.id)
                    .collect();
                if fresh.is_empty() {
                    all()
                } else {
                    fresh
                }
            }
        }
    }

    fn best<M: ConfigurationSpace + ?Sized>(
        &self,
        tree: &Tree,
        model: &M,
        query: &Configuration,
        candidates: &[VertexId],
    ) -> VertexId {
        let mut min_dist = f64::INFINITY;
        let mut min_id = tree.root();

        for &id in candidates {
            let d = self.metric.rank(model, query, tree.configuration(id));
            if d < min_dist {
                min_dist = d;
                min_id = id;
            }
        }

        min_id
    }
}
