//! Estimation error computation against ground-truth landmarks.
//!
//! Diagnostics for drivers and tests: how far the team's estimates sit
//! from the true landmark positions, and how much the agents still
//! disagree among themselves.

use crate::core::types::Point2D;
use crate::engine::Agent;

/// Error of one agent's estimate for one landmark.
#[derive(Debug, Clone, Copy)]
pub struct EstimationError {
    /// Euclidean distance from the estimate to the true landmark.
    pub position_error: f32,
    /// Residual cost held by the agent for this landmark.
    pub cost: f32,
}

impl EstimationError {
    /// Check whether the estimate is within a distance threshold of
    /// the true landmark.
    pub fn converged(&self, threshold: f32) -> bool {
        self.position_error <= threshold
    }
}

/// Team-level error summary for one tick.
#[derive(Debug, Clone)]
pub struct EstimationErrorStats {
    /// Root-mean-square position error across all (agent, landmark)
    /// pairs.
    pub rmse: f32,
    /// Worst single position error.
    pub max_error: f32,
    /// Mean position error.
    pub mean_error: f32,
    /// Largest pairwise distance between two agents' estimates of the
    /// same landmark (inter-agent disagreement).
    pub max_disagreement: f32,
}

/// Compute the error of one agent's estimate against the true
/// landmark position.
pub fn compute_estimation_error(
    agent: &Agent,
    landmark_index: usize,
    truth: &Point2D,
) -> EstimationError {
    let cost = &agent.costs()[landmark_index];
    EstimationError {
        position_error: cost.estimate().distance(truth),
        cost: cost.cost(),
    }
}

/// Summarize the whole team's error against the true landmark list.
///
/// # Arguments
/// * `agents` - The agent team
/// * `landmarks` - Ground-truth landmark positions, index-aligned with
///   each agent's cost list
pub fn compute_team_error(agents: &[Agent], landmarks: &[Point2D]) -> EstimationErrorStats {
    let mut sum_sq = 0.0f64;
    let mut sum = 0.0f64;
    let mut max_error = 0.0f32;
    let mut count = 0usize;

    for agent in agents {
        for (i, truth) in landmarks.iter().enumerate() {
            let error = compute_estimation_error(agent, i, truth).position_error;
            sum_sq += f64::from(error) * f64::from(error);
            sum += f64::from(error);
            max_error = max_error.max(error);
            count += 1;
        }
    }

    let mut max_disagreement = 0.0f32;
    for i in 0..landmarks.len() {
        for (a, agent_a) in agents.iter().enumerate() {
            for agent_b in agents.iter().skip(a + 1) {
                let gap = agent_a.costs()[i]
                    .estimate()
                    .distance(&agent_b.costs()[i].estimate());
                max_disagreement = max_disagreement.max(gap);
            }
        }
    }

    let n = count.max(1) as f64;
    EstimationErrorStats {
        rmse: (sum_sq / n).sqrt() as f32,
        max_error,
        mean_error: (sum / n) as f32,
        max_disagreement,
    }
}
