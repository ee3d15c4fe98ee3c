//! Range-only sensing with distance-proportional noise.
//!
//! A measurement perturbs the landmark position with an axis-wise
//! Gaussian whose standard deviation grows with the true range, then
//! reports the distance to the perturbed point. The noise therefore
//! correlates with geometry rather than being a plain scalar jitter on
//! the range, and distant landmarks are measured less precisely.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::core::math::sanitize_range;
use crate::core::types::{Point2D, WorldBounds};

/// Configuration for the range sensor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeSensorConfig {
    /// Noise gain: the perturbation standard deviation is
    /// `noise_scale * true_distance / world_width`.
    pub noise_scale: f32,

    /// Random seed for deterministic measurements (0 for time-derived).
    pub seed: u64,
}

impl Default for RangeSensorConfig {
    fn default() -> Self {
        Self {
            noise_scale: 10.0,
            seed: 0,
        }
    }
}

impl RangeSensorConfig {
    /// Create a noiseless configuration (exact ranges).
    pub fn noiseless() -> Self {
        Self {
            noise_scale: 0.0,
            ..Default::default()
        }
    }
}

/// Noisy range sensor shared by the agent team.
#[derive(Debug)]
pub struct RangeSensor {
    config: RangeSensorConfig,
    world_width: f32,
    rng: StdRng,
}

impl RangeSensor {
    /// Create a new sensor scaled to the given world.
    pub fn new(config: RangeSensorConfig, bounds: &WorldBounds) -> Self {
        let seed = if config.seed == 0 {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(12345)
        } else {
            config.seed
        };

        Self {
            config,
            world_width: bounds.width,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &RangeSensorConfig {
        &self.config
    }

    /// Measure the range from an agent to a landmark.
    ///
    /// The returned range is always finite and non-negative: readings
    /// corrupted by pathological draws are clamped to zero so they can
    /// never poison a cost update.
    ///
    /// # Arguments
    /// * `agent_position` - True agent position
    /// * `landmark` - True landmark position
    ///
    /// # Returns
    /// Noisy observed range in pixels.
    pub fn measure(&mut self, agent_position: &Point2D, landmark: &Point2D) -> f32 {
        let true_distance = landmark.distance(agent_position);
        let sigma = self.config.noise_scale * true_distance / self.world_width;

        if sigma <= 0.0 {
            // Zero true distance or a noiseless configuration
            // degenerates to an exact reading.
            return sanitize_range(true_distance);
        }

        let perturbed = match Normal::new(0.0, sigma) {
            Ok(noise) => Point2D::new(
                landmark.x + noise.sample(&mut self.rng),
                landmark.y + noise.sample(&mut self.rng),
            ),
            Err(_) => *landmark,
        };

        sanitize_range(agent_position.distance(&perturbed))
    }
}
