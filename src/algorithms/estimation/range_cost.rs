//! Quadratic residual cost over a single range observation.
//!
//! Each agent keeps one [`RangeCost`] per landmark. The cost measures
//! the squared discrepancy between the distance implied by the current
//! estimate and the most recently observed range:
//!
//! ```text
//! cost = 0.5 * (‖p − x‖ − d)²
//! ```
//!
//! where `x` is the landmark estimate, `p` the agent position at
//! observation time, and `d` the observed range. The cost is re-derived
//! after every mutation; no stale value is ever observable.

use serde::{Deserialize, Serialize};

use crate::core::types::Point2D;

/// Residual magnitudes below this are treated as degenerate: the
/// gradient direction is undefined at ‖p − x‖ = 0.
const MIN_RESIDUAL_RANGE: f32 = 1e-6;

/// Configuration for the gradient update of a range cost.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeCostConfig {
    /// Fixed gradient-descent step size.
    /// One un-damped step is taken per tick; there is no inner solve.
    pub step_size: f32,
}

impl Default for RangeCostConfig {
    fn default() -> Self {
        Self { step_size: 0.1 }
    }
}

/// Outcome of a single gradient step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The estimate moved along the negative gradient.
    Applied,
    /// The residual range was degenerate; the estimate was left
    /// untouched instead of absorbing a non-finite update.
    SkippedDegenerate,
}

/// Per-(agent, landmark) landmark-position estimator.
///
/// Holds the evolving estimate together with the latest observation it
/// is being fit against. Mutation happens through exactly three
/// operations: [`ingest`](Self::ingest) (new observation),
/// [`overwrite_estimate`](Self::overwrite_estimate) (consensus write),
/// and [`step`](Self::step) (one gradient update).
#[derive(Debug, Clone)]
pub struct RangeCost {
    config: RangeCostConfig,
    /// Current landmark position estimate.
    estimate: Point2D,
    /// Agent position at the time of the latest observation.
    observed_position: Point2D,
    /// Latest observed range.
    observed_distance: f32,
    /// Number of observations ingested so far. Incremented on every
    /// ingest but does not influence the step size.
    observation_count: u64,
    /// Derived residual cost, refreshed after every mutation.
    cost: f32,
}

impl RangeCost {
    /// Create a new cost with the given initial estimate.
    ///
    /// The cost value is derived immediately but only becomes
    /// meaningful once the first observation is ingested.
    pub fn new(initial_estimate: Point2D, config: RangeCostConfig) -> Self {
        let mut cost = Self {
            config,
            estimate: initial_estimate,
            observed_position: Point2D::default(),
            observed_distance: 0.0,
            observation_count: 0,
            cost: 0.0,
        };
        cost.refresh_cost();
        cost
    }

    /// Current landmark position estimate.
    #[inline]
    pub fn estimate(&self) -> Point2D {
        self.estimate
    }

    /// Agent position recorded with the latest observation.
    #[inline]
    pub fn observed_position(&self) -> Point2D {
        self.observed_position
    }

    /// Latest observed range.
    #[inline]
    pub fn observed_distance(&self) -> f32 {
        self.observed_distance
    }

    /// Number of observations ingested.
    #[inline]
    pub fn observation_count(&self) -> u64 {
        self.observation_count
    }

    /// Current residual cost.
    #[inline]
    pub fn cost(&self) -> f32 {
        self.cost
    }

    /// Record a new range observation taken from `position`.
    pub fn ingest(&mut self, position: Point2D, distance: f32) {
        self.observed_position = position;
        self.observed_distance = distance;
        self.observation_count += 1;
        self.refresh_cost();
    }

    /// Replace the estimate with a consensus value.
    ///
    /// The cost is re-derived against the existing observation.
    pub fn overwrite_estimate(&mut self, estimate: Point2D) {
        self.estimate = estimate;
        self.refresh_cost();
    }

    /// Take one fixed-step gradient-descent update on the estimate.
    ///
    /// With `r = ‖p − x‖`, the update is
    /// `x ← x − step_size * (x − p) * (1 − d / r)`.
    ///
    /// When `r` is degenerate the gradient direction is undefined; the
    /// estimate is left unchanged and
    /// [`StepOutcome::SkippedDegenerate`] is returned.
    pub fn step(&mut self) -> StepOutcome {
        let r = self.observed_position.distance(&self.estimate);
        if r < MIN_RESIDUAL_RANGE {
            return StepOutcome::SkippedDegenerate;
        }

        let scale = 1.0 - self.observed_distance / r;
        let gradient = self.estimate.sub(&self.observed_position).scale(scale);
        self.estimate = self.estimate.sub(&gradient.scale(self.config.step_size));
        self.refresh_cost();
        StepOutcome::Applied
    }

    /// Re-derive the cost from the current estimate and observation.
    fn refresh_cost(&mut self) {
        let implied = self.observed_position.distance(&self.estimate);
        let residual = implied - self.observed_distance;
        self.cost = 0.5 * residual * residual;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn expected_cost(cost: &RangeCost) -> f32 {
        let implied = cost.observed_position().distance(&cost.estimate());
        let residual = implied - cost.observed_distance();
        0.5 * residual * residual
    }

    #[test]
    fn test_cost_derived_after_ingest() {
        let mut cost = RangeCost::new(Point2D::new(10.0, 0.0), RangeCostConfig::default());
        cost.ingest(Point2D::new(0.0, 0.0), 5.0);

        // implied = 10, observed = 5, residual = 5
        assert_relative_eq!(cost.cost(), 12.5);
        assert_relative_eq!(cost.cost(), expected_cost(&cost));
    }

    #[test]
    fn test_cost_derived_after_overwrite() {
        let mut cost = RangeCost::new(Point2D::new(10.0, 0.0), RangeCostConfig::default());
        cost.ingest(Point2D::new(0.0, 0.0), 5.0);
        cost.overwrite_estimate(Point2D::new(5.0, 0.0));

        // implied = 5, observed = 5, residual = 0
        assert_relative_eq!(cost.cost(), 0.0);
        assert_relative_eq!(cost.cost(), expected_cost(&cost));
    }

    #[test]
    fn test_cost_derived_after_step() {
        let mut cost = RangeCost::new(Point2D::new(7.0, 3.0), RangeCostConfig::default());
        cost.ingest(Point2D::new(1.0, 1.0), 4.0);
        assert_eq!(cost.step(), StepOutcome::Applied);
        assert_relative_eq!(cost.cost(), expected_cost(&cost));
    }

    #[test]
    fn test_gradient_step_exact_value() {
        // True range 10, observed 5: the estimate must move toward the
        // observer by exactly step_size * (10,0) * (1 - 5/10) = (0.5, 0).
        let mut cost = RangeCost::new(Point2D::new(10.0, 0.0), RangeCostConfig::default());
        cost.ingest(Point2D::new(0.0, 0.0), 5.0);

        assert_eq!(cost.step(), StepOutcome::Applied);
        assert_relative_eq!(cost.estimate().x, 9.5, epsilon = 1e-6);
        assert_relative_eq!(cost.estimate().y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_gradient_step_moves_outward_when_too_close() {
        // Implied range 2 < observed 5: the estimate must move away
        // from the observer.
        let mut cost = RangeCost::new(Point2D::new(2.0, 0.0), RangeCostConfig::default());
        cost.ingest(Point2D::new(0.0, 0.0), 5.0);

        assert_eq!(cost.step(), StepOutcome::Applied);
        assert!(cost.estimate().x > 2.0);
        assert_relative_eq!(cost.estimate().y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_degenerate_residual_is_noop() {
        let position = Point2D::new(3.0, 4.0);
        let mut cost = RangeCost::new(position, RangeCostConfig::default());
        cost.ingest(position, 2.0);

        assert_eq!(cost.step(), StepOutcome::SkippedDegenerate);
        assert_relative_eq!(cost.estimate().x, 3.0);
        assert_relative_eq!(cost.estimate().y, 4.0);
        assert!(cost.estimate().is_finite());
        assert!(cost.cost().is_finite());
    }

    #[test]
    fn test_overwrite_is_idempotent() {
        let mut cost = RangeCost::new(Point2D::new(10.0, 0.0), RangeCostConfig::default());
        cost.ingest(Point2D::new(0.0, 0.0), 5.0);

        let target = Point2D::new(4.0, 2.0);
        cost.overwrite_estimate(target);
        let first_estimate = cost.estimate();
        let first_cost = cost.cost();

        cost.overwrite_estimate(target);
        assert_relative_eq!(cost.estimate().x, first_estimate.x);
        assert_relative_eq!(cost.estimate().y, first_estimate.y);
        assert_relative_eq!(cost.cost(), first_cost);
    }

    #[test]
    fn test_observation_count_monotonic() {
        let mut cost = RangeCost::new(Point2D::default(), RangeCostConfig::default());
        assert_eq!(cost.observation_count(), 0);
        for i in 1..=5 {
            cost.ingest(Point2D::new(i as f32, 0.0), 1.0);
            assert_eq!(cost.observation_count(), i);
        }
    }

    #[test]
    fn test_step_size_is_fixed_across_observations() {
        // The observation count must not shrink the update: two costs
        // with identical state but different counts step identically.
        let mut seasoned = RangeCost::new(Point2D::new(10.0, 0.0), RangeCostConfig::default());
        for _ in 0..100 {
            seasoned.ingest(Point2D::new(0.0, 0.0), 5.0);
        }
        let mut fresh = RangeCost::new(Point2D::new(10.0, 0.0), RangeCostConfig::default());
        fresh.ingest(Point2D::new(0.0, 0.0), 5.0);

        seasoned.step();
        fresh.step();
        assert_relative_eq!(seasoned.estimate().x, fresh.estimate().x);
        assert_relative_eq!(seasoned.estimate().y, fresh.estimate().y);
    }

    #[test]
    fn test_repeated_steps_converge_on_observed_circle() {
        let mut cost = RangeCost::new(Point2D::new(10.0, 0.0), RangeCostConfig::default());
        cost.ingest(Point2D::new(0.0, 0.0), 5.0);

        for _ in 0..200 {
            cost.step();
        }
        // The estimate should settle on the circle of radius 5 around
        // the observer, driving the cost to zero.
        assert_relative_eq!(
            cost.estimate().distance(&Point2D::new(0.0, 0.0)),
            5.0,
            epsilon = 1e-3
        );
        assert!(cost.cost() < 1e-6);
    }
}
