use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

use crate::models::errors::MagnetometerError;

/// Functionality to add some Gaussian noise.
#[derive(Clone)]
pub(super) struct GaussianNoise {
    normal: Normal<f32>,
}

impl GaussianNoise {
    /// Creates new distribution from mean and stdev
    /// Returns a Trace error unless `mean` is finite and `stdev` finite and non-negative.
    pub(super) fn new(mean: f32, stdev: f32) -> Result<Self, MagnetometerError> {
        if !mean.is_finite() || !stdev.is_finite() || stdev < 0.0 {
            return Err(MagnetometerError::Trace(format!(
                "invalid noise: mean {}, stdev {}",
                mean, stdev
            )));
        }
        let normal = Normal::new(mean, stdev)
            .map_err(|e| MagnetometerError::Trace(format!("invalid noise: {}", e)))?;
        Ok(Self { normal })
    }

    /// Sample from distribution
    pub(super) fn draw_sample(&self, rng: &mut StdRng) -> f32 {
        self.normal.sample(rng)
    }

    // Adds noise to every value
    pub(super) fn add_noise(&self, rng: &mut StdRng, data: [f32; 3]) -> [f32; 3] {
        data.map(|d| d + self.draw_sample(rng))
    }
}
