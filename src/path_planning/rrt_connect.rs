//! RRT-Connect (bidirectional Rapidly-exploring Random Trees)
//!
//! Two trees, rooted at the start and goal configurations, take turns
//! growing towards random targets. Each growth step is a *connect*: the
//! tree advances from its nearest vertex towards the target in steps of
//! `delta` until it arrives or collides. Whenever one tree gains a vertex,
//! the other tree tries to connect to it; if it gets there, the trees have
//! met and the path is read off both trees.
//!
//! Layered on top, each individually switchable through [`Strategy`]:
//! goal bias, dynamic-domain rejection sampling, the joint-weighted metric,
//! and exhaustion filtering with a randomized k-nearest pick.
//!
//! [`Strategy`]: crate::path_planning::config::Strategy

use std::time::{Duration, Instant};

use log::{debug, info, trace};

use crate::common::{Configuration, ConfigurationSpace, Path, TreeRole, VertexId, Viewer};
use crate::path_planning::config::PlannerConfig;
use crate::path_planning::dynamic_domain::DynamicDomain;
use crate::path_planning::nearest::{Metric, NearestNeighbor, Neighbor};
use crate::path_planning::sampler::Sampler;
use crate::path_planning::tree::Tree;
use crate::utils::NoopViewer;

/// Below this distance the near vertex already coincides with the target
pub const MIN_STEP_DISTANCE: f64 = 1e-6;

/// One stepper increment from `from` towards `target`, which is
/// `distance` away. Lands exactly on `target` once it is within `delta`.
pub fn step_towards<M: ConfigurationSpace + ?Sized>(
    model: &M,
    from: &Configuration,
    target: &Configuration,
    distance: f64,
    delta: f64,
) -> Configuration {
    if distance <= delta {
        target.clone()
    } else {
        model.interpolate(from, target, delta / distance)
    }
}

/// Every configuration the stepper visits going from `from` to `to`,
/// excluding `from` and including `to`.
pub fn stepper_configurations<M: ConfigurationSpace + ?Sized>(
    model: &M,
    from: &Configuration,
    to: &Configuration,
    delta: f64,
) -> Vec<Configuration> {
    let mut steps = Vec::new();
    let mut current = from.clone();
    loop {
        let distance = model.distance(&current, to);
        if distance < MIN_STEP_DISTANCE {
            break;
        }
        current = step_towards(model, &current, to, distance, delta);
        steps.push(current.clone());
        if distance <= delta {
            break;
        }
    }
    steps
}

/// Outcome of one connect attempt
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Extension {
    /// A new vertex was appended; `reached` is false if a collision
    /// stopped the stepper short of the target
    Extended { vertex: VertexId, reached: bool },
    /// The near vertex already sits on the target; nothing was added
    Coincident(VertexId),
    /// The very first step collided; nothing was added
    Blocked,
}

impl Extension {
    /// The vertex created by the attempt, if any
    pub fn new_vertex(&self) -> Option<VertexId> {
        match self {
            Extension::Extended { vertex, .. } => Some(*vertex),
            Extension::Coincident(_) | Extension::Blocked => None,
        }
    }
}

/// How a search ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    /// The trees met at `start_end` (start tree) and `goal_end` (goal tree)
    Solved { start_end: VertexId, goal_end: VertexId },
    /// The time budget elapsed
    TimedOut,
    /// `max_iterations` outer iterations ran without the trees meeting
    IterationLimit,
}

/// Counters collected during a search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Outer iterations (each gives both trees one turn)
    pub iterations: u64,
    /// Candidate targets drawn
    pub samples: u64,
    /// Candidates that were the opposite tree's root
    pub goal_samples: u64,
    /// Candidates discarded by the dynamic-domain rejection loop
    pub rejected_samples: u64,
    /// Connect steps that ended in collision
    pub collisions: u64,
    /// Vertices added by connect
    pub extensions: u64,
}

/// State of one bidirectional search.
///
/// Borrows the model, the sampler and the viewer for the duration of the
/// search and owns both trees and the dynamic domain.
pub struct BidirectionalSearch<'a, M: ConfigurationSpace + ?Sized, V: Viewer + ?Sized> {
    config: &'a PlannerConfig,
    model: &'a mut M,
    sampler: &'a mut Sampler,
    viewer: &'a mut V,
    trees: [Tree; 2],
    domain: DynamicDomain,
    selector: NearestNeighbor,
    stats: SearchStats,
    started: Instant,
}

impl<'a, M: ConfigurationSpace + ?Sized, V: Viewer + ?Sized> BidirectionalSearch<'a, M, V> {
    /// Seed both trees and start the clock
    pub fn new(
        config: &'a PlannerConfig,
        model: &'a mut M,
        sampler: &'a mut Sampler,
        viewer: &'a mut V,
        start: Configuration,
        goal: Configuration,
    ) -> Self {
        let strategy = config.strategy;

        let metric = if strategy.weighted_metric {
            Metric::weighted(model.dof())
        } else {
            Metric::Unweighted
        };
        let mut selector = NearestNeighbor::new(metric);
        if strategy.exhaustion {
            selector = selector.with_exhaustion_limit(config.exhaustion_limit);
        }
        if strategy.k_nearest {
            selector = selector.with_k_nearest(config.k_nearest_divisor);
        }

        viewer.reset();
        viewer.draw_configuration_vertex(&start);
        viewer.draw_configuration_vertex(&goal);

        BidirectionalSearch {
            config,
            model,
            sampler,
            viewer,
            trees: [
                Tree::with_root(TreeRole::Start, start),
                Tree::with_root(TreeRole::Goal, goal),
            ],
            domain: DynamicDomain::new(config.boundary_radius()),
            selector,
            stats: SearchStats::default(),
            started: Instant::now(),
        }
    }

    pub fn tree(&self, role: TreeRole) -> &Tree {
        &self.trees[role.index()]
    }

    pub fn domain(&self) -> &DynamicDomain {
        &self.domain
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Draw one candidate target for `role`'s tree
    pub fn choose(&mut self, role: TreeRole) -> Configuration {
        let strategy = self.config.strategy;
        self.stats.samples += 1;

        if strategy.goal_bias && self.sampler.bernoulli(self.config.goal_bias_probability) {
            self.stats.goal_samples += 1;
            return self.trees[role.other().index()].root_configuration().clone();
        }

        let lower = self.model.lower_bound();
        let upper = self.model.upper_bound();
        if strategy.dynamic_domain {
            if let Some(q) = self.domain.sample(self.sampler, lower, upper) {
                return q;
            }
        }
        self.sampler.generate(lower, upper)
    }

    /// Nearest vertex of `role`'s tree to `q`
    pub fn nearest(&mut self, role: TreeRole, q: &Configuration) -> Neighbor {
        self.selector
            .nearest(&self.trees[role.index()], &*self.model, q, self.sampler)
    }

    /// Dynamic-domain rejection loop: redraw while the nearest vertex is a
    /// boundary vertex farther away than its radius, up to
    /// `rejection_attempts` draws; the last draw is always accepted.
    pub fn sample_target(&mut self, role: TreeRole) -> (Configuration, Neighbor) {
        let mut attempts = 0;
        loop {
            let candidate = self.choose(role);
            let neighbor = self.nearest(role, &candidate);
            attempts += 1;

            if !self.config.strategy.dynamic_domain || self.within_domain(role, &neighbor) {
                return (candidate, neighbor);
            }
            if attempts >= self.config.rejection_attempts {
                trace!("rejection cap of {} reached, accepting sample", attempts);
                return (candidate, neighbor);
            }
            self.stats.rejected_samples += 1;
        }
    }

    fn within_domain(&self, role: TreeRole, neighbor: &Neighbor) -> bool {
        // Non-boundary vertices carry an infinite radius
        neighbor.distance <= self.trees[role.index()].vertex(neighbor.vertex).boundary_radius
    }

    /// Mark `v` as boundary and grow the sampling box around it
    pub fn mark_boundary(&mut self, role: TreeRole, v: VertexId) {
        if !self.config.strategy.dynamic_domain {
            return;
        }
        if !self.domain.has_boundary_nodes() {
            debug!("first boundary vertex in {:?} tree, sampling from dynamic domain", role);
        }
        let tree = &mut self.trees[role.index()];
        tree.mark_boundary(v, self.domain.radius());
        self.domain.expand(tree.configuration(v));
    }

    fn record_collision(&mut self, role: TreeRole, near: VertexId) {
        self.stats.collisions += 1;
        self.mark_boundary(role, near);
        self.trees[role.index()].record_failure(near);
        trace!("{:?} tree blocked extending from vertex {}", role, near.index());
    }

    fn step_blocked(&mut self, q: &Configuration) -> bool {
        self.model.set_position(q);
        self.model.update_state();
        self.model.is_colliding()
    }

    /// Advance `role`'s tree from `neighbor` towards `target` in steps of
    /// at most `delta`, collision-checking every step.
    pub fn connect(&mut self, role: TreeRole, neighbor: Neighbor, target: &Configuration) -> Extension {
        let delta = self.config.delta;
        let mut distance = neighbor.distance;

        if distance < MIN_STEP_DISTANCE {
            return Extension::Coincident(neighbor.vertex);
        }

        let near_q = self.trees[role.index()].configuration(neighbor.vertex).clone();
        let mut last: Option<Configuration> = None;

        let reached = loop {
            let from = last.as_ref().unwrap_or(&near_q);
            let next = step_towards(&*self.model, from, target, distance, delta);

            if self.step_blocked(&next) {
                self.record_collision(role, neighbor.vertex);
                if last.is_none() {
                    return Extension::Blocked;
                }
                break false;
            }

            let within_step = distance <= delta;
            let current = last.insert(next);
            if within_step {
                break true;
            }

            distance = self.model.distance(current, target);
            if distance < MIN_STEP_DISTANCE {
                break true;
            }
        };

        let Some(last) = last else {
            return Extension::Blocked;
        };
        let tree = &mut self.trees[role.index()];
        let vertex = tree.add_child(neighbor.vertex, last);
        self.viewer.draw_configuration_vertex(tree.configuration(vertex));
        self.viewer
            .draw_configuration_edge(tree.configuration(neighbor.vertex), tree.configuration(vertex));
        self.stats.extensions += 1;

        Extension::Extended { vertex, reached }
    }

    fn are_equal(&self, a: &Configuration, b: &Configuration) -> bool {
        self.model.distance(a, b) <= self.config.equality_epsilon
    }

    /// One turn of `active`: sample, extend it, then try to pull the other
    /// tree onto the new vertex. Returns `(active_end, other_end)` if the
    /// trees met.
    pub fn step(&mut self, active: TreeRole) -> Option<(VertexId, VertexId)> {
        let other = active.other();

        let (target, neighbor) = self.sample_target(active);
        let new_active = self.connect(active, neighbor, &target).new_vertex()?;

        let q = self.trees[active.index()].configuration(new_active).clone();
        let other_neighbor = self.nearest(other, &q);

        match self.connect(other, other_neighbor, &q) {
            Extension::Coincident(end) => Some((new_active, end)),
            Extension::Extended { vertex, .. }
                if self.are_equal(&q, self.trees[other.index()].configuration(vertex)) =>
            {
                Some((new_active, vertex))
            }
            _ => None,
        }
    }

    /// Alternate the trees until they meet or the budget runs out
    pub fn run(&mut self) -> SearchStatus {
        let deadline = self.started + self.config.duration;
        let mut active = TreeRole::Start;

        while Instant::now() < deadline {
            if let Some(max) = self.config.max_iterations {
                if self.stats.iterations >= max {
                    return SearchStatus::IterationLimit;
                }
            }
            self.stats.iterations += 1;

            for _ in 0..2 {
                if let Some((active_end, other_end)) = self.step(active) {
                    let (start_end, goal_end) = match active {
                        TreeRole::Start => (active_end, other_end),
                        TreeRole::Goal => (other_end, active_end),
                    };
                    debug!(
                        "trees met after {} iterations at start vertex {} / goal vertex {}",
                        self.stats.iterations,
                        start_end.index(),
                        goal_end.index()
                    );
                    return SearchStatus::Solved { start_end, goal_end };
                }
                active = active.other();
            }
        }

        SearchStatus::TimedOut
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Finish the search, handing over the trees for inspection
    pub fn into_report(self, status: SearchStatus) -> SearchReport {
        let elapsed = self.started.elapsed();
        SearchReport {
            status,
            trees: self.trees,
            dynamic_domain: self.domain,
            stats: self.stats,
            elapsed,
        }
    }
}

/// Everything a finished search leaves behind
#[derive(Debug, Clone)]
pub struct SearchReport {
    pub status: SearchStatus,
    /// Start tree at index 0, goal tree at index 1
    pub trees: [Tree; 2],
    pub dynamic_domain: DynamicDomain,
    pub stats: SearchStats,
    pub elapsed: Duration,
}

impl SearchReport {
    pub fn is_solved(&self) -> bool {
        matches!(self.status, SearchStatus::Solved { .. })
    }

    pub fn tree(&self, role: TreeRole) -> &Tree {
        &self.trees[role.index()]
    }

    pub fn vertex_count(&self) -> usize {
        self.trees.iter().map(Tree::len).sum()
    }

    /// Start-to-goal path through the meeting point, if solved
    pub fn path(&self) -> Option<Path> {
        let SearchStatus::Solved { start_end, goal_end } = self.status else {
            return None;
        };
        let start_tree = self.tree(TreeRole::Start);
        let goal_tree = self.tree(TreeRole::Goal);

        let mut path: Path = start_tree
            .path_to_root(start_end)
            .into_iter()
            .rev()
            .map(|id| start_tree.configuration(id).clone())
            .collect();

        // The goal-side end duplicates the meeting configuration
        for id in goal_tree.path_to_root(goal_end).into_iter().skip(1) {
            path.push(goal_tree.configuration(id).clone());
        }

        Some(path)
    }

    /// The solution path with every intermediate configuration the stepper
    /// checked while building its edges, so consecutive entries are at
    /// most `delta` apart.
    pub fn densified_path<M: ConfigurationSpace + ?Sized>(&self, model: &M, delta: f64) -> Option<Path> {
        let SearchStatus::Solved { start_end, goal_end } = self.status else {
            return None;
        };
        let start_tree = self.tree(TreeRole::Start);
        let goal_tree = self.tree(TreeRole::Goal);

        let mut dense = Path::new();
        dense.push(start_tree.root_configuration().clone());

        // Start-tree edges are walked parent to child
        let start_ids: Vec<VertexId> = start_tree.path_to_root(start_end).into_iter().rev().collect();
        for w in start_ids.windows(2) {
            let (parent, child) = (start_tree.configuration(w[0]), start_tree.configuration(w[1]));
            dense.configurations.extend(stepper_configurations(model, parent, child, delta));
        }

        // Goal-tree edges were stepped from the parent; replay and reverse
        let goal_ids = goal_tree.path_to_root(goal_end);
        for w in goal_ids.windows(2) {
            let (child, parent) = (goal_tree.configuration(w[0]), goal_tree.configuration(w[1]));
            let mut steps = stepper_configurations(model, parent, child, delta);
            steps.pop();
            steps.reverse();
            dense.configurations.extend(steps);
            dense.push(parent.clone());
        }

        Some(dense)
    }
}

/// RRT-Connect planner with dynamic-domain sampling
#[derive(Debug, Clone)]
pub struct RrtConnectPlanner {
    config: PlannerConfig,
    sampler: Sampler,
}

impl RrtConnectPlanner {
    /// Create a planner; fails if the configuration does not validate
    pub fn new(config: PlannerConfig) -> crate::common::PlanningResult<Self> {
        config.validate()?;
        let sampler = Sampler::new(config.distribution, config.seed);
        Ok(Self { config, sampler })
    }

    pub fn name(&self) -> &'static str {
        "RRT-Connect"
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn sampler_mut(&mut self) -> &mut Sampler {
        &mut self.sampler
    }

    /// Search for a path from `start` to `goal`
    pub fn solve<M: ConfigurationSpace + ?Sized>(
        &mut self,
        model: &mut M,
        start: &Configuration,
        goal: &Configuration,
    ) -> SearchReport {
        self.solve_with_viewer(model, start, goal, &mut NoopViewer)
    }

    /// Like [`solve`](Self::solve), reporting every new vertex to `viewer`
    pub fn solve_with_viewer<M: ConfigurationSpace + ?Sized, V: Viewer + ?Sized>(
        &mut self,
        model: &mut M,
        start: &Configuration,
        goal: &Configuration,
        viewer: &mut V,
    ) -> SearchReport {
        if let Some(seed) = self.config.seed {
            self.sampler.seed(seed);
        }
        info!(
            "{} start: dof = {}, delta = {}, budget = {:?}, strategy = {:?}",
            self.name(),
            model.dof(),
            self.config.delta,
            self.config.duration,
            self.config.strategy
        );

        let mut search = BidirectionalSearch::new(
            &self.config,
            model,
            &mut self.sampler,
            viewer,
            start.clone(),
            goal.clone(),
        );
        let status = search.run();
        let report = search.into_report(status);

        info!(
            "{} finished with {:?} in {:?}: {} iterations, {} + {} vertices, {} collisions",
            self.name(),
            report.status,
            report.elapsed,
            report.stats.iterations,
            report.tree(TreeRole::Start).len(),
            report.tree(TreeRole::Goal).len(),
            report.stats.collisions
        );
        report
    }
}

impl Default for RrtConnectPlanner {
    fn default() -> Self {
        let config = PlannerConfig::default();
        let sampler = Sampler::new(config.distribution, config.seed);
        Self { config, sampler }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path_planning::config::Strategy;
    use crate::path_planning::sampler::DistributionType;
    use crate::models::BoxWorld;
    use crate::utils::RecordingViewer;
    use approx::assert_relative_eq;
    use nalgebra::DVector;

    fn q(x: f64, y: f64) -> Configuration {
        DVector::from_vec(vec![x, y])
    }

    fn open_world() -> BoxWorld {
        BoxWorld::new(q(-10.0, -10.0), q(10.0, 10.0))
    }

    fn test_config() -> PlannerConfig {
        PlannerConfig {
            delta: 1.0,
            duration: Duration::from_secs(5),
            distribution: DistributionType::Uniform,
            seed: Some(17),
            ..Default::default()
        }
    }

    #[test]
    fn test_extension_new_vertex() {
        let e = Extension::Extended { vertex: VertexId(3), reached: false };
        assert_eq!(e.new_vertex(), Some(VertexId(3)));
        assert_eq!(Extension::Blocked.new_vertex(), None);
        assert_eq!(Extension::Coincident(VertexId(0)).new_vertex(), None);
    }

    #[test]
    fn test_connect_reaches_target_in_free_space() {
        let config = test_config();
        let mut world = open_world();
        let mut sampler = Sampler::new(config.distribution, config.seed);
        let mut viewer = RecordingViewer::new();
        let mut search = BidirectionalSearch::new(
            &config, &mut world, &mut sampler, &mut viewer, q(0.0, 0.0), q(9.0, 9.0),
        );

        let target = q(5.0, 0.0);
        let neighbor = search.nearest(TreeRole::Start, &target);
        let outcome = search.connect(TreeRole::Start, neighbor, &target);

        let Extension::Extended { vertex, reached } = outcome else {
            panic!("expected an extension, got {:?}", outcome);
        };
        assert!(reached);
        let tree = search.tree(TreeRole::Start);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.parent(vertex), Some(tree.root()));
        assert_relative_eq!(tree.configuration(vertex)[0], 5.0, epsilon = 1e-12);
        assert_eq!(search.stats().extensions, 1);
        drop(search);

        // One collision query per unit step
        assert_eq!(world.collision_queries(), 5);
        // Two roots plus the new vertex
        assert_eq!(viewer.vertices.len(), 3);
        assert_eq!(viewer.edges.len(), 1);
    }

    #[test]
    fn test_connect_coincident_target_adds_nothing() {
        let config = test_config();
        let mut world = open_world();
        let mut sampler = Sampler::new(config.distribution, config.seed);
        let mut viewer = NoopViewer;
        let mut search = BidirectionalSearch::new(
            &config, &mut world, &mut sampler, &mut viewer, q(1.0, 1.0), q(9.0, 9.0),
        );

        let target = q(1.0, 1.0 + 1e-9);
        let neighbor = search.nearest(TreeRole::Start, &target);
        assert_eq!(
            search.connect(TreeRole::Start, neighbor, &target),
            Extension::Coincident(VertexId(0))
        );
        assert_eq!(search.tree(TreeRole::Start).len(), 1);
        drop(search);
        assert_eq!(world.collision_queries(), 0);
    }

    #[test]
    fn test_connect_blocked_on_first_step_marks_boundary() {
        let config = test_config();
        let mut world = open_world().with_box(q(0.5, -1.0), q(1.5, 1.0));
        let mut sampler = Sampler::new(config.distribution, config.seed);
        let mut viewer = NoopViewer;
        let mut search = BidirectionalSearch::new(
            &config, &mut world, &mut sampler, &mut viewer, q(0.0, 0.0), q(9.0, 9.0),
        );

        let target = q(5.0, 0.0);
        let neighbor = search.nearest(TreeRole::Start, &target);
        assert_eq!(search.connect(TreeRole::Start, neighbor, &target), Extension::Blocked);

        let tree = search.tree(TreeRole::Start);
        assert_eq!(tree.len(), 1);
        let root = tree.vertex(tree.root());
        assert_eq!(root.fail_count, 1);
        assert_eq!(root.boundary_radius, config.boundary_radius());

        let (min, max) = search.domain().bounds().unwrap();
        assert_eq!(min, &q(-10.0, -10.0));
        assert_eq!(max, &q(10.0, 10.0));
        assert_eq!(search.stats().collisions, 1);
    }

    #[test]
    fn test_connect_stops_before_obstacle() {
        let config = test_config();
        let mut world = open_world().with_box(q(2.5, -1.0), q(3.5, 1.0));
        let mut sampler = Sampler::new(config.distribution, config.seed);
        let mut viewer = NoopViewer;
        let mut search = BidirectionalSearch::new(
            &config, &mut world, &mut sampler, &mut viewer, q(0.0, 0.0), q(9.0, 9.0),
        );

        let target = q(5.0, 0.0);
        let neighbor = search.nearest(TreeRole::Start, &target);
        let outcome = search.connect(TreeRole::Start, neighbor, &target);
        let Extension::Extended { vertex, reached } = outcome else {
            panic!("expected a partial extension, got {:?}", outcome);
        };

        assert!(!reached);
        let tree = search.tree(TreeRole::Start);
        assert_relative_eq!(tree.configuration(vertex)[0], 2.0, epsilon = 1e-12);
        // The near vertex pays for the collision, the new vertex does not
        assert_eq!(tree.vertex(tree.root()).fail_count, 1);
        assert!(tree.vertex(tree.root()).is_boundary());
        assert_eq!(tree.vertex(vertex).fail_count, 0);
        assert!(!tree.vertex(vertex).is_boundary());
    }

    #[test]
    fn test_collision_without_dynamic_domain_only_counts_failure() {
        let config = PlannerConfig {
            strategy: Strategy { dynamic_domain: false, ..Strategy::default() },
            ..test_config()
        };
        let mut world = open_world().with_box(q(0.5, -1.0), q(1.5, 1.0));
        let mut sampler = Sampler::new(config.distribution, config.seed);
        let mut viewer = NoopViewer;
        let mut search = BidirectionalSearch::new(
            &config, &mut world, &mut sampler, &mut viewer, q(0.0, 0.0), q(9.0, 9.0),
        );

        let target = q(5.0, 0.0);
        let neighbor = search.nearest(TreeRole::Start, &target);
        assert_eq!(search.connect(TreeRole::Start, neighbor, &target), Extension::Blocked);

        let root = search.tree(TreeRole::Start).vertex(VertexId(0)).clone();
        assert_eq!(root.fail_count, 1);
        assert!(!root.is_boundary());
        assert!(!search.domain().has_boundary_nodes());
    }

    #[test]
    fn test_goal_bias_targets_opposite_root() {
        let config = PlannerConfig {
            goal_bias_probability: 1.0,
            ..test_config()
        };
        let mut world = open_world();
        let mut sampler = Sampler::new(config.distribution, config.seed);
        let mut viewer = NoopViewer;
        let mut search = BidirectionalSearch::new(
            &config, &mut world, &mut sampler, &mut viewer, q(0.0, 0.0), q(9.0, 9.0),
        );

        assert_eq!(search.choose(TreeRole::Start), q(9.0, 9.0));
        assert_eq!(search.choose(TreeRole::Goal), q(0.0, 0.0));
        assert_eq!(search.stats().goal_samples, 2);
        assert_eq!(search.stats().samples, 2);
    }

    #[test]
    fn test_goal_bias_disabled_never_samples_root() {
        let config = PlannerConfig {
            goal_bias_probability: 1.0,
            strategy: Strategy { goal_bias: false, ..Strategy::default() },
            ..test_config()
        };
        let mut world = open_world();
        let mut sampler = Sampler::new(config.distribution, config.seed);
        let mut viewer = NoopViewer;
        let mut search = BidirectionalSearch::new(
            &config, &mut world, &mut sampler, &mut viewer, q(0.0, 0.0), q(9.0, 9.0),
        );

        for _ in 0..100 {
            assert_ne!(search.choose(TreeRole::Start), q(9.0, 9.0));
        }
        assert_eq!(search.stats().goal_samples, 0);
    }

    #[test]
    fn test_rejection_loop_accepts_within_radius_or_at_cap() {
        let config = PlannerConfig {
            delta: 0.01,
            rejection_attempts: 30,
            strategy: Strategy { goal_bias: false, ..Strategy::default() },
            ..test_config()
        };
        let mut world = BoxWorld::new(q(0.0, 0.0), q(10.0, 10.0));
        let mut sampler = Sampler::new(config.distribution, config.seed);
        let mut viewer = NoopViewer;
        let mut search = BidirectionalSearch::new(
            &config, &mut world, &mut sampler, &mut viewer, q(0.0, 0.0), q(9.0, 9.0),
        );
        // Box [0, 0.1]^2 around the root; its corners lie outside the radius
        search.mark_boundary(TreeRole::Start, VertexId(0));

        for _ in 0..200 {
            let before = search.stats().rejected_samples;
            let (_, neighbor) = search.sample_target(TreeRole::Start);
            let rejected = search.stats().rejected_samples - before;
            assert!(rejected < config.rejection_attempts as u64);

            if rejected + 1 < config.rejection_attempts as u64 {
                let vertex = search.tree(TreeRole::Start).vertex(neighbor.vertex);
                assert!(!vertex.is_boundary() || neighbor.distance <= vertex.boundary_radius);
            }
        }
        assert!(search.stats().rejected_samples > 0);
    }

    #[test]
    fn test_rejection_cap_of_one_accepts_first_draw() {
        let config = PlannerConfig {
            delta: 0.01,
            rejection_attempts: 1,
            ..test_config()
        };
        let mut world = BoxWorld::new(q(0.0, 0.0), q(10.0, 10.0));
        let mut sampler = Sampler::new(config.distribution, config.seed);
        let mut viewer = NoopViewer;
        let mut search = BidirectionalSearch::new(
            &config, &mut world, &mut sampler, &mut viewer, q(0.0, 0.0), q(9.0, 9.0),
        );
        search.mark_boundary(TreeRole::Start, VertexId(0));

        for _ in 0..50 {
            search.sample_target(TreeRole::Start);
        }
        assert_eq!(search.stats().rejected_samples, 0);
        assert_eq!(search.stats().samples, 50);
    }

    #[test]
    fn test_solve_open_space() {
        let mut planner = RrtConnectPlanner::new(test_config()).unwrap();
        let mut world = open_world();
        let start = q(-8.0, -8.0);
        let goal = q(8.0, 8.0);

        let report = planner.solve(&mut world, &start, &goal);
        assert!(report.is_solved());

        let path = report.path().unwrap();
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&goal));
        for w in path.configurations.windows(2) {
            assert!(world.distance(&w[0], &w[1]) > 0.0);
        }
    }

    #[test]
    fn test_solve_around_obstacle() {
        let mut planner = RrtConnectPlanner::new(test_config()).unwrap();
        let mut world = open_world().with_box(q(-1.0, -10.0), q(1.0, 6.0));
        let start = q(-5.0, 0.0);
        let goal = q(5.0, 0.0);

        let report = planner.solve(&mut world, &start, &goal);
        assert!(report.is_solved());

        let path = report.path().unwrap();
        let dense = report.densified_path(&world, 1.0).unwrap();
        assert_eq!(dense.first(), path.first());
        assert_eq!(dense.last(), path.last());
        assert!(dense.len() >= path.len());
        assert!(dense.iter().all(|c| world.is_free(c)));
        for w in dense.configurations.windows(2) {
            assert!(world.distance(&w[0], &w[1]) <= 1.0 + 1e-9);
        }
        assert!(report.stats.collisions > 0);
    }

    #[test]
    fn test_stepper_configurations() {
        let world = open_world();
        let steps = stepper_configurations(&world, &q(0.0, 0.0), &q(2.5, 0.0), 1.0);
        assert_eq!(steps, vec![q(1.0, 0.0), q(2.0, 0.0), q(2.5, 0.0)]);
        assert!(stepper_configurations(&world, &q(1.0, 1.0), &q(1.0, 1.0), 1.0).is_empty());
    }

    #[test]
    fn test_viewer_sees_every_vertex() {
        let mut planner = RrtConnectPlanner::new(test_config()).unwrap();
        let mut world = open_world().with_box(q(-1.0, -10.0), q(1.0, 6.0));
        let mut viewer = RecordingViewer::new();

        let report = planner.solve_with_viewer(&mut world, &q(-5.0, 0.0), &q(5.0, 0.0), &mut viewer);
        assert_eq!(viewer.vertices.len(), report.vertex_count());
        assert_eq!(viewer.edges.len(), report.vertex_count() - 2);
        assert!(viewer.vertices.iter().all(|c| world.is_free(c)));
    }

    #[test]
    fn test_iteration_limit() {
        let config = PlannerConfig {
            max_iterations: Some(25),
            ..test_config()
        };
        let mut planner = RrtConnectPlanner::new(config).unwrap();
        let mut world = open_world().with_box(q(-1.0, -10.0), q(1.0, 10.0));

        let report = planner.solve(&mut world, &q(-5.0, 0.0), &q(5.0, 0.0));
        assert_eq!(report.status, SearchStatus::IterationLimit);
        assert_eq!(report.stats.iterations, 25);
        assert!(report.path().is_none());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = PlannerConfig { delta: -1.0, ..Default::default() };
        assert!(RrtConnectPlanner::new(config).is_err());
    }
}
