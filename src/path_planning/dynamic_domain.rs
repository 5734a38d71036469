//! Dynamic-domain bounding box
//!
//! Every boundary vertex contributes an axis-aligned box of half-width
//! `radius` centered at its configuration. The tracker keeps the union's
//! bounding box, which only ever grows during a search. Once it exists,
//! free-space samples are drawn from it instead of the whole space.

use crate::common::Configuration;
use crate::path_planning::sampler::Sampler;

/// Bounding box of all boundary domains of a search
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicDomain {
    radius: f64,
    bounds: Option<(Configuration, Configuration)>,
}

impl DynamicDomain {
    pub fn new(radius: f64) -> Self {
        Self { radius, bounds: None }
    }

    /// Radius given to boundary vertices
    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn has_boundary_nodes(&self) -> bool {
        self.bounds.is_some()
    }

    /// `(min, max)` corners, if any boundary vertex exists
    pub fn bounds(&self) -> Option<(&Configuration, &Configuration)> {
        self.bounds.as_ref().map(|(min, max)| (min, max))
    }

    /// Fold the box of half-width `radius` around `q` into the bounding box
    pub fn expand(&mut self, q: &Configuration) {
        let lo = q.add_scalar(-self.radius);
        let hi = q.add_scalar(self.radius);
        self.bounds = Some(match self.bounds.take() {
            None => (lo, hi),
            Some((min, max)) => (min.zip_map(&lo, f64::min), max.zip_map(&hi, f64::max)),
        });
    }

    /// Uniform sample from the bounding box intersected with the joint
    /// limits, or `None` while no boundary vertex exists.
    pub fn sample(
        &self,
        sampler: &mut Sampler,
        lower: &Configuration,
        upper: &Configuration,
    ) -> Option<Configuration> {
        let (min, max) = self.bounds.as_ref()?;
        let min = min.zip_map(lower, f64::max);
        let max = max.zip_map(upper, f64::min);
        Some(sampler.generate_in_box(&min, &max))
    }

    /// Forget every boundary vertex
    pub fn reset(&mut self, radius: f64) {
        self.radius = radius;
        self.bounds = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path_planning::sampler::DistributionType;
    use nalgebra::DVector;

    fn q(x: f64, y: f64) -> Configuration {
        DVector::from_vec(vec![x, y])
    }

    #[test]
    fn test_first_expand_initializes_box() {
        let mut domain = DynamicDomain::new(1.0);
        assert!(!domain.has_boundary_nodes());
        assert!(domain.bounds().is_none());

        domain.expand(&q(3.0, 4.0));
        let (min, max) = domain.bounds().unwrap();
        assert_eq!(min, &q(2.0, 3.0));
        assert_eq!(max, &q(4.0, 5.0));
    }

    #[test]
    fn test_box_grows_monotonically() {
        let mut domain = DynamicDomain::new(0.5);
        let centers = [q(1.0, 1.0), q(5.0, 0.0), q(2.0, 2.0), q(-3.0, 9.0), q(2.0, 2.0)];
        let mut previous: Option<(Configuration, Configuration)> = None;

        for c in &centers {
            domain.expand(c);
            let (min, max) = domain.bounds().unwrap();
            for i in 0..2 {
                assert!(min[i] <= max[i]);
                assert!(min[i] <= c[i] - 0.5 && max[i] >= c[i] + 0.5);
            }
            if let Some((pmin, pmax)) = &previous {
                for i in 0..2 {
                    assert!(min[i] <= pmin[i]);
                    assert!(max[i] >= pmax[i]);
                }
            }
            previous = Some((min.clone(), max.clone()));
        }

        let (min, max) = domain.bounds().unwrap();
        assert_eq!(min, &q(-3.5, -0.5));
        assert_eq!(max, &q(5.5, 9.5));
    }

    #[test]
    fn test_sample_stays_in_box_and_limits() {
        let mut domain = DynamicDomain::new(2.0);
        let mut sampler = Sampler::new(DistributionType::Uniform, Some(9));
        let lower = q(0.0, 0.0);
        let upper = q(10.0, 10.0);
        assert!(domain.sample(&mut sampler, &lower, &upper).is_none());

        domain.expand(&q(1.0, 5.0));
        for _ in 0..500 {
            let s = domain.sample(&mut sampler, &lower, &upper).unwrap();
            assert!(s[0] >= 0.0 && s[0] <= 3.0);
            assert!(s[1] >= 3.0 && s[1] <= 7.0);
        }
    }

    #[test]
    fn test_reset_clears_box() {
        let mut domain = DynamicDomain::new(1.0);
        domain.expand(&q(0.0, 0.0));
        domain.reset(3.0);
        assert!(!domain.has_boundary_nodes());
        assert_eq!(domain.radius(), 3.0);
    }
}
