//! Peer consensus averaging over landmark estimates.
//!
//! Once per tick every agent blends its own estimate of each landmark
//! with the unweighted mean of its peers' estimates:
//!
//! ```text
//! x_i ← w * x_i + (1 − w) * mean(x_j, j ≠ i)
//! ```
//!
//! The blend strongly favors the peer mean (`w` defaults to 0.1). The
//! weighting assumes every agent hears every other agent each tick; no
//! other topology is supported.
//!
//! All reads go through an [`EstimateSnapshot`] captured before any
//! agent applies its consensus value, so a round behaves synchronously
//! regardless of the order agents are processed in.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::algorithms::estimation::RangeCost;
use crate::core::types::{AgentId, Point2D};

/// Consensus errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsensusError {
    /// Peer averaging divides by `agents − 1`; a team of fewer than
    /// two agents has no peers to average.
    #[error("consensus requires at least 2 agents, got {agents}")]
    InsufficientPeers { agents: usize },
}

/// Configuration for the consensus blend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsensusConfig {
    /// Weight kept on the agent's own estimate; the remainder goes to
    /// the unweighted peer mean.
    pub self_weight: f32,
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self { self_weight: 0.1 }
    }
}

/// Frozen view of every agent's per-landmark estimates.
///
/// Captured once at the start of the communicate phase; consensus
/// computations can only read this snapshot, which makes it impossible
/// for one agent to observe another agent's same-tick update.
#[derive(Debug, Clone)]
pub struct EstimateSnapshot {
    /// Estimates indexed by `[agent][landmark]`.
    estimates: Vec<Vec<Point2D>>,
}

impl EstimateSnapshot {
    /// Capture the current estimates of every agent's cost set.
    pub fn capture<'a, I>(agents: I) -> Self
    where
        I: IntoIterator<Item = &'a [RangeCost]>,
    {
        let estimates = agents
            .into_iter()
            .map(|costs| costs.iter().map(|c| c.estimate()).collect())
            .collect();
        Self { estimates }
    }

    /// Number of agents in the snapshot.
    #[inline]
    pub fn num_agents(&self) -> usize {
        self.estimates.len()
    }

    /// Estimate held by `agent` for `landmark` at capture time.
    #[inline]
    pub fn estimate(&self, agent: AgentId, landmark: usize) -> Point2D {
        self.estimates[agent.index()][landmark]
    }
}

/// Compute one agent's post-consensus estimate for one landmark.
///
/// Returns `self_weight * own + (1 − self_weight) * mean(others)`,
/// where `others` ranges over every agent in the snapshot except
/// `self_id`.
///
/// # Arguments
/// * `config` - Blend weighting
/// * `self_id` - The agent applying the consensus value
/// * `landmark` - Landmark index
/// * `snapshot` - Pre-round estimates of the full team
///
/// # Errors
/// [`ConsensusError::InsufficientPeers`] when the snapshot holds fewer
/// than two agents.
pub fn consensus_estimate(
    config: &ConsensusConfig,
    self_id: AgentId,
    landmark: usize,
    snapshot: &EstimateSnapshot,
) -> Result<Point2D, ConsensusError> {
    let n = snapshot.num_agents();
    if n < 2 {
        return Err(ConsensusError::InsufficientPeers { agents: n });
    }

    let mut peer_sum = Point2D::default();
    for peer in 0..n {
        if peer == self_id.index() {
            continue;
        }
        peer_sum = peer_sum.add(&snapshot.estimate(AgentId(peer), landmark));
    }
    let peer_mean = peer_sum.scale(1.0 / (n - 1) as f32);

    let own = snapshot.estimate(self_id, landmark);
    Ok(own
        .scale(config.self_weight)
        .add(&peer_mean.scale(1.0 - config.self_weight)))
}
