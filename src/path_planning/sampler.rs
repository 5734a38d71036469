//! Random configuration sampling
//!
//! The sampler owns the only random number generator of a search. Every
//! random decision the planner makes (free-space samples, dynamic-domain
//! samples, goal bias, k-nearest picks) is drawn from it, so a fixed seed
//! reproduces a search exactly.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::common::Configuration;

/// Mean of the normal distribution in normalized joint units
const NORMAL_MEAN: f64 = 0.5;
/// Standard deviation of the normal distribution in normalized joint units
const NORMAL_STD_DEV: f64 = 0.15;

/// Probability distribution of free-space samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributionType {
    /// Each joint uniform over its limits
    Uniform,
    /// Each joint normal about the middle of its limits, clamped to them
    Normal,
}

/// Seedable configuration sampler
#[derive(Debug, Clone)]
pub struct Sampler {
    distribution: DistributionType,
    rng: StdRng,
}

impl Sampler {
    /// Create a sampler; `seed == None` seeds from OS entropy
    pub fn new(distribution: DistributionType, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(value) => StdRng::seed_from_u64(value),
            None => StdRng::from_entropy(),
        };
        Self { distribution, rng }
    }

    pub fn distribution(&self) -> DistributionType {
        self.distribution
    }

    /// Restart the random stream deterministically
    pub fn seed(&mut self, value: u64) {
        self.rng = StdRng::seed_from_u64(value);
    }

    /// Draw a configuration within `[lower, upper]`
    pub fn generate(&mut self, lower: &Configuration, upper: &Configuration) -> Configuration {
        match self.distribution {
            DistributionType::Uniform => self.generate_in_box(lower, upper),
            DistributionType::Normal => Configuration::from_fn(lower.len(), |i, _| {
                let z: f64 = self.rng.sample(StandardNormal);
                let unit = (NORMAL_MEAN + NORMAL_STD_DEV * z).clamp(0.0, 1.0);
                lower[i] + unit * (upper[i] - lower[i])
            }),
        }
    }

    /// Draw a configuration uniformly from the axis-aligned box `[min, max]`
    pub fn generate_in_box(&mut self, min: &Configuration, max: &Configuration) -> Configuration {
        Configuration::from_fn(min.len(), |i, _| {
            let t: f64 = self.rng.gen();
            min[i] + t * (max[i] - min[i])
        })
    }

    /// True with probability `p`
    pub fn bernoulli(&mut self, p: f64) -> bool {
        self.rng.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Uniform index in `0..len`; `len` must be non-zero
    pub fn choose_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}
