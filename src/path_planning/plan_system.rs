//! Planning facade
//!
//! `PlanSystem` owns a model, a planner and the query endpoints, checks the
//! query before running the search and turns a failed search into an error.

use log::warn;

use crate::common::{Configuration, ConfigurationSpace, Path, PlanningError, PlanningResult, TreeRole, Viewer};
use crate::path_planning::config::PlannerConfig;
use crate::path_planning::rrt_connect::{RrtConnectPlanner, SearchReport};
use crate::utils::NoopViewer;

pub struct PlanSystem<M: ConfigurationSpace> {
    model: M,
    planner: RrtConnectPlanner,
    start: Option<Configuration>,
    goal: Option<Configuration>,
    last_report: Option<SearchReport>,
}

impl<M: ConfigurationSpace> PlanSystem<M> {
    pub fn new(model: M, config: PlannerConfig) -> PlanningResult<Self> {
        Ok(Self {
            model,
            planner: RrtConnectPlanner::new(config)?,
            start: None,
            goal: None,
            last_report: None,
        })
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    pub fn planner(&self) -> &RrtConnectPlanner {
        &self.planner
    }

    pub fn start(&self) -> Option<&Configuration> {
        self.start.as_ref()
    }

    pub fn goal(&self) -> Option<&Configuration> {
        self.goal.as_ref()
    }

    pub fn set_start(&mut self, q: Configuration) -> PlanningResult<()> {
        self.check_dimension(&q)?;
        self.start = Some(q);
        Ok(())
    }

    pub fn set_goal(&mut self, q: Configuration) -> PlanningResult<()> {
        self.check_dimension(&q)?;
        self.goal = Some(q);
        Ok(())
    }

    fn check_dimension(&self, q: &Configuration) -> PlanningResult<()> {
        let expected = self.model.dof();
        if q.len() != expected {
            return Err(PlanningError::DimensionMismatch {
                expected,
                actual: q.len(),
            });
        }
        Ok(())
    }

    /// Collision query through the model's stateful interface
    pub fn is_colliding(&mut self, q: &Configuration) -> bool {
        self.model.set_position(q);
        self.model.update_state();
        self.model.is_colliding()
    }

    fn endpoints(&mut self) -> PlanningResult<(Configuration, Configuration)> {
        let start = self
            .start
            .clone()
            .ok_or_else(|| PlanningError::InvalidParameter("start configuration not set".to_string()))?;
        let goal = self
            .goal
            .clone()
            .ok_or_else(|| PlanningError::InvalidParameter("goal configuration not set".to_string()))?;

        for (role, q) in [(TreeRole::Start, &start), (TreeRole::Goal, &goal)] {
            self.check_dimension(q)?;
            if self.is_colliding(q) {
                return Err(PlanningError::CollidingConfiguration(format!(
                    "{:?} configuration {:?} is in collision",
                    role,
                    q.as_slice()
                )));
            }
        }
        Ok((start, goal))
    }

    /// Plan from the start to the goal configuration
    pub fn plan(&mut self) -> PlanningResult<Path> {
        self.plan_with_viewer(&mut NoopViewer)
    }

    pub fn plan_with_viewer<V: Viewer + ?Sized>(&mut self, viewer: &mut V) -> PlanningResult<Path> {
        let (start, goal) = self.endpoints()?;
        let report = self.planner.solve_with_viewer(&mut self.model, &start, &goal, viewer);
        let path = report.path();
        let outcome = path.ok_or_else(|| {
            warn!("no path found within {:?}", report.elapsed);
            PlanningError::NoPathFound {
                elapsed: report.elapsed,
                start_vertices: report.tree(TreeRole::Start).len(),
                goal_vertices: report.tree(TreeRole::Goal).len(),
            }
        });
        self.last_report = Some(report);
        outcome
    }

    /// Sample from the planner's distribution over the joint limits
    pub fn random_configuration(&mut self) -> Configuration {
        let lower = self.model.lower_bound();
        let upper = self.model.upper_bound();
        self.planner.sampler_mut().generate(lower, upper)
    }

    /// Draw until a collision-free configuration comes up
    pub fn random_free_configuration(&mut self, max_attempts: usize) -> PlanningResult<Configuration> {
        for _ in 0..max_attempts {
            let q = self.random_configuration();
            if !self.is_colliding(&q) {
                return Ok(q);
            }
        }
        Err(PlanningError::SamplingExhausted {
            attempts: max_attempts,
        })
    }

    /// Report of the most recent `plan` call
    pub fn last_report(&self) -> Option<&SearchReport> {
        self.last_report.as_ref()
    }

    /// Forget the query and the previous result
    pub fn reset(&mut self) {
        self.start = None;
        self.goal = None;
        self.last_report = None;
    }
}
