//! A single mobile agent and its landmark beliefs.

use rand::Rng;

use crate::algorithms::consensus::{
    consensus_estimate, ConsensusConfig, ConsensusError, EstimateSnapshot,
};
use crate::algorithms::estimation::{RangeCost, RangeCostConfig, StepOutcome};
use crate::algorithms::sensing::RangeSensor;
use crate::core::types::{AgentId, MotionCommand, Point2D, WorldBounds};

/// A mobile agent.
///
/// The agent owns its ground-truth position (mutated only by the
/// external driver), a driver-owned motion command, and one
/// [`RangeCost`] per landmark, index-aligned with the shared landmark
/// list. Estimation state is mutated exclusively through the per-tick
/// sense / communicate / optimize operations.
#[derive(Debug, Clone)]
pub struct Agent {
    id: AgentId,
    /// Ground-truth position. Written by the external driver; the core
    /// only reads it when sensing.
    pub position: Point2D,
    /// Motion intent for the next driver movement.
    pub command: MotionCommand,
    costs: Vec<RangeCost>,
}

impl Agent {
    /// Create an agent at a position with uniformly random initial
    /// estimates for every landmark.
    pub fn new<R: Rng>(
        id: AgentId,
        position: Point2D,
        num_landmarks: usize,
        bounds: &WorldBounds,
        cost_config: RangeCostConfig,
        rng: &mut R,
    ) -> Self {
        let costs = (0..num_landmarks)
            .map(|_| RangeCost::new(bounds.sample_uniform(rng), cost_config))
            .collect();

        Self {
            id,
            position,
            command: MotionCommand::hold(),
            costs,
        }
    }

    /// This agent's stable identifier.
    #[inline]
    pub fn id(&self) -> AgentId {
        self.id
    }

    /// Landmark costs, index-aligned with the landmark list.
    #[inline]
    pub fn costs(&self) -> &[RangeCost] {
        &self.costs
    }

    /// Test fixture access: estimation state is otherwise mutated only
    /// through sense / communicate / optimize.
    #[cfg(test)]
    pub(crate) fn costs_mut(&mut self) -> &mut [RangeCost] {
        &mut self.costs
    }

    /// Take a noisy range reading of every landmark and fold it into
    /// the matching cost.
    pub fn sense(&mut self, landmarks: &[Point2D], sensor: &mut RangeSensor) {
        for (landmark, cost) in landmarks.iter().zip(self.costs.iter_mut()) {
            let observed = sensor.measure(&self.position, landmark);
            cost.ingest(self.position, observed);
        }
    }

    /// Blend each landmark estimate with the peer mean from the
    /// pre-round snapshot.
    pub fn communicate(
        &mut self,
        config: &ConsensusConfig,
        snapshot: &EstimateSnapshot,
    ) -> Result<(), ConsensusError> {
        for (landmark, cost) in self.costs.iter_mut().enumerate() {
            let blended = consensus_estimate(config, self.id, landmark, snapshot)?;
            cost.overwrite_estimate(blended);
        }
        Ok(())
    }

    /// Take one gradient step on every landmark cost.
    ///
    /// Returns the number of degenerate residuals that were skipped.
    pub fn optimize(&mut self) -> u32 {
        let mut skipped = 0;
        for cost in &mut self.costs {
            if cost.step() == StepOutcome::SkippedDegenerate {
                skipped += 1;
            }
        }
        skipped
    }

    /// Apply the current motion command, clamped to the world.
    ///
    /// Driver helper: the core never calls this on its own.
    pub fn advance(&mut self, speed: f32, bounds: &WorldBounds) {
        let margin = bounds.width / 50.0;
        let moved = Point2D::new(
            self.position.x + speed * self.command.dx,
            self.position.y + speed * self.command.dy,
        );
        self.position = bounds.clamp(&moved, margin);
    }
}
