//! Common traits defining the collaborators of the planner

use crate::common::types::Configuration;

/// Configuration-space model queried by the planner.
///
/// The model is stateful: `set_position` selects the configuration that
/// `is_colliding` tests, and `update_state` refreshes whatever derived data
/// (frames, link poses) the collision test depends on. The planner calls it
/// from a single thread only.
pub trait ConfigurationSpace {
    /// Number of degrees of freedom
    fn dof(&self) -> usize;

    /// Lower joint limits
    fn lower_bound(&self) -> &Configuration;

    /// Upper joint limits
    fn upper_bound(&self) -> &Configuration;

    /// True distance between two configurations
    fn distance(&self, a: &Configuration, b: &Configuration) -> f64;

    /// Monotone transform of `distance` that is cheaper to compute
    fn transformed_distance(&self, a: &Configuration, b: &Configuration) -> f64 {
        (a - b).norm_squared()
    }

    /// Maps a `transformed_distance` value back to distance units
    fn inverse_of_transformed_distance(&self, d: f64) -> f64 {
        d.sqrt()
    }

    /// Straight-line interpolation from `a` (fraction 0) to `b` (fraction 1)
    fn interpolate(&self, a: &Configuration, b: &Configuration, fraction: f64) -> Configuration {
        a + (b - a) * fraction
    }

    /// Clamp a configuration into the joint limits
    fn clip(&self, q: &mut Configuration) {
        let lower = self.lower_bound();
        let upper = self.upper_bound();
        for i in 0..q.len() {
            q[i] = q[i].clamp(lower[i], upper[i]);
        }
    }

    /// Select the configuration subsequent collision queries refer to
    fn set_position(&mut self, q: &Configuration);

    /// Refresh cached kinematic state after `set_position`
    fn update_state(&mut self) {}

    /// Whether the currently set position is in collision
    fn is_colliding(&mut self) -> bool;
}

/// Observer notified about tree growth. Never influences planning.
pub trait Viewer {
    /// Called once for every vertex added to either tree
    fn draw_configuration_vertex(&mut self, q: &Configuration);

    /// Called once for every edge added to either tree
    fn draw_configuration_edge(&mut self, _from: &Configuration, _to: &Configuration) {}

    /// Called when a new search starts
    fn reset(&mut self) {}
}

/// Trait for things that can be drawn into a 2D plot
pub trait Visualizable {
    /// Draw current state to visualizer
    fn visualize(&self, vis: &mut crate::utils::Visualizer);
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DVector;

    // Minimal model relying on every default method
    struct Line {
        lower: Configuration,
        upper: Configuration,
        position: f64,
    }

    impl ConfigurationSpace for Line {
        fn dof(&self) -> usize {
            1
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
            self.position = q[0];
        }

        fn is_colliding(&mut self) -> bool {
            self.position > 5.0
        }
    }

    fn line() -> Line {
        Line {
            lower: DVector::from_vec(vec![0.0]),
            upper: DVector::from_vec(vec![10.0]),
            position: 0.0,
        }
    }

    #[test]
    fn test_default_transformed_distance_round_trip() {
        let model = line();
        let a = DVector::from_vec(vec![1.0]);
        let b = DVector::from_vec(vec![4.0]);
        let t = model.transformed_distance(&a, &b);
        assert_eq!(t, 9.0);
        assert_eq!(model.inverse_of_transformed_distance(t), model.distance(&a, &b));
    }

    #[test]
    fn test_default_interpolate_and_clip() {
        let mut model = line();
        let a = DVector::from_vec(vec![2.0]);
        let b = DVector::from_vec(vec![6.0]);
        assert_eq!(model.interpolate(&a, &b, 0.25)[0], 3.0);

        let mut q = DVector::from_vec(vec![12.0]);
        model.clip(&mut q);
        assert_eq!(q[0], 10.0);

        model.set_position(&q);
        model.update_state();
        assert!(model.is_colliding());
    }
}
