//! Top-level tick orchestration for the agent team.
//!
//! One discrete time step runs three strictly ordered phases over the
//! full team:
//!
//! 1. **sense** - every agent takes a noisy range reading of every
//!    landmark (agents are independent within the phase),
//! 2. **communicate** - every agent blends its estimates with the peer
//!    mean, reading a snapshot captured before any agent applied its
//!    blend,
//! 3. **optimize** - every (agent, landmark) cost takes one gradient
//!    step (pairs are independent within the phase).
//!
//! The simulation owns all mutable estimation state; the external
//! driver owns agent motion and consumes estimates/costs for display.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::algorithms::consensus::{ConsensusConfig, ConsensusError, EstimateSnapshot};
use crate::algorithms::estimation::RangeCostConfig;
use crate::algorithms::sensing::{RangeSensor, RangeSensorConfig};
use crate::core::types::{default_landmarks, AgentId, Point2D, WorldBounds};

use super::agent::Agent;

/// Simulation construction and runtime errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    /// Consensus averaging needs at least two agents.
    #[error("simulation requires at least 2 agents, got {agents}")]
    InsufficientAgents { agents: usize },

    /// There is nothing to estimate without landmarks.
    #[error("simulation requires at least one landmark")]
    NoLandmarks,

    /// Consensus failure surfaced during the communicate phase.
    #[error(transparent)]
    Consensus(#[from] ConsensusError),
}

/// Full simulation configuration.
///
/// The component configs nest here the same way they are written in
/// the TOML config file of the daemon binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of agents in the team. Must be at least 2.
    pub num_agents: usize,

    /// Fixed landmark positions, shared read-only by every agent.
    /// Must be non-empty.
    pub landmarks: Vec<Point2D>,

    /// World extent used for noise scaling, placement, and clamping.
    pub bounds: WorldBounds,

    /// Distance an agent covers per unit of motion command.
    pub agent_speed: f32,

    /// Master random seed (0 for time-derived). Agent placement,
    /// initial estimates, and the sensor stream all derive from it.
    pub seed: u64,

    /// Range sensor configuration.
    pub sensor: RangeSensorConfig,

    /// Consensus blend configuration.
    pub consensus: ConsensusConfig,

    /// Gradient update configuration.
    pub cost: RangeCostConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let bounds = WorldBounds::default();
        Self {
            num_agents: 3,
            landmarks: default_landmarks(&bounds),
            bounds,
            agent_speed: 2.0,
            seed: 0,
            sensor: RangeSensorConfig::default(),
            consensus: ConsensusConfig::default(),
            cost: RangeCostConfig::default(),
        }
    }
}

/// Cooperative landmark estimation simulation.
#[derive(Debug)]
pub struct Simulation {
    bounds: WorldBounds,
    landmarks: Vec<Point2D>,
    agents: Vec<Agent>,
    sensor: RangeSensor,
    consensus: ConsensusConfig,
    agent_speed: f32,
    ticks: u64,
    degenerate_skips: u64,
}

impl Simulation {
    /// Build a simulation from configuration.
    ///
    /// Structural preconditions (team size, landmark count) are
    /// validated here once; the per-tick operations assume them.
    ///
    /// # Errors
    /// [`SimulationError::InsufficientAgents`] for a team smaller than
    /// two, [`SimulationError::NoLandmarks`] for an empty landmark
    /// list.
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        if config.num_agents < 2 {
            return Err(SimulationError::InsufficientAgents {
                agents: config.num_agents,
            });
        }
        if config.landmarks.is_empty() {
            return Err(SimulationError::NoLandmarks);
        }

        let master_seed = resolve_seed(config.seed);
        let mut rng = StdRng::seed_from_u64(master_seed);

        let margin = config.bounds.width / 50.0;
        let agents = (0..config.num_agents)
            .map(|i| {
                let position = config.bounds.sample_inset(&mut rng, margin);
                Agent::new(
                    AgentId(i),
                    position,
                    config.landmarks.len(),
                    &config.bounds,
                    config.cost,
                    &mut rng,
                )
            })
            .collect();

        // The sensor stream gets its own seed derived from the master
        // unless one was pinned explicitly.
        let sensor_config = if config.sensor.seed == 0 {
            RangeSensorConfig {
                seed: master_seed.wrapping_add(1),
                ..config.sensor
            }
        } else {
            config.sensor
        };
        let sensor = RangeSensor::new(sensor_config, &config.bounds);

        log::info!(
            "simulation initialized: {} agents, {} landmarks, seed {}",
            config.num_agents,
            config.landmarks.len(),
            master_seed
        );

        Ok(Self {
            bounds: config.bounds,
            landmarks: config.landmarks,
            agents,
            sensor,
            consensus: config.consensus,
            agent_speed: config.agent_speed,
            ticks: 0,
            degenerate_skips: 0,
        })
    }

    /// The agent team.
    #[inline]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Mutable access for the driver (positions, motion commands).
    #[inline]
    pub fn agents_mut(&mut self) -> &mut [Agent] {
        &mut self.agents
    }

    /// The shared landmark list.
    #[inline]
    pub fn landmarks(&self) -> &[Point2D] {
        &self.landmarks
    }

    /// World extent.
    #[inline]
    pub fn bounds(&self) -> &WorldBounds {
        &self.bounds
    }

    /// Number of completed ticks.
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Total gradient steps skipped because of degenerate residuals.
    #[inline]
    pub fn degenerate_skips(&self) -> u64 {
        self.degenerate_skips
    }

    /// Sense phase: every agent reads every landmark.
    pub fn sense_all(&mut self) {
        for agent in &mut self.agents {
            agent.sense(&self.landmarks, &mut self.sensor);
        }
    }

    /// Communicate phase: snapshot, then apply every agent's blend.
    ///
    /// Capturing the snapshot first guarantees no agent observes a
    /// peer's same-tick consensus update, independent of processing
    /// order.
    pub fn communicate_all(&mut self) -> Result<(), SimulationError> {
        let snapshot = EstimateSnapshot::capture(self.agents.iter().map(|a| a.costs()));
        for agent in &mut self.agents {
            agent.communicate(&self.consensus, &snapshot)?;
        }
        Ok(())
    }

    /// Optimize phase: one gradient step per (agent, landmark) pair.
    pub fn optimize_all(&mut self) {
        for agent in &mut self.agents {
            self.degenerate_skips += u64::from(agent.optimize());
        }
    }

    /// Run one full tick: sense, communicate, optimize.
    pub fn tick(&mut self) -> Result<(), SimulationError> {
        self.sense_all();
        self.communicate_all()?;
        self.optimize_all();
        self.ticks += 1;
        Ok(())
    }

    /// Driver helper: apply every agent's motion command.
    pub fn advance_agents(&mut self) {
        for agent in &mut self.agents {
            agent.advance(self.agent_speed, &self.bounds);
        }
    }
}

/// Resolve a configured seed, deriving one from the clock when unset.
fn resolve_seed(seed: u64) -> u64 {
    if seed != 0 {
        return seed;
    }
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(12345)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn seeded_config(seed: u64) -> SimulationConfig {
        SimulationConfig {
            seed,
            ..Default::default()
        }
    }

    #[test]
    fn test_rejects_single_agent() {
        let config = SimulationConfig {
            num_agents: 1,
            ..seeded_config(1)
        };
        assert_eq!(
            Simulation::new(config).err(),
            Some(SimulationError::InsufficientAgents { agents: 1 })
        );
    }

    #[test]
    fn test_rejects_empty_landmarks() {
        let config = SimulationConfig {
            landmarks: Vec::new(),
            ..seeded_config(1)
        };
        assert_eq!(Simulation::new(config).err(), Some(SimulationError::NoLandmarks));
    }

    #[test]
    fn test_agents_placed_inside_bounds() {
        let sim = Simulation::new(seeded_config(42)).unwrap();
        for agent in sim.agents() {
            assert!(sim.bounds().contains(&agent.position));
        }
    }

    #[test]
    fn test_tick_advances_observation_counts() {
        let mut sim = Simulation::new(seeded_config(42)).unwrap();
        for _ in 0..5 {
            sim.tick().unwrap();
        }
        assert_eq!(sim.ticks(), 5);
        for agent in sim.agents() {
            for cost in agent.costs() {
                assert_eq!(cost.observation_count(), 5);
            }
        }
    }

    #[test]
    fn test_same_seed_is_deterministic() {
        let mut a = Simulation::new(seeded_config(77)).unwrap();
        let mut b = Simulation::new(seeded_config(77)).unwrap();
        for _ in 0..20 {
            a.tick().unwrap();
            b.tick().unwrap();
        }
        for (agent_a, agent_b) in a.agents().iter().zip(b.agents()) {
            for (cost_a, cost_b) in agent_a.costs().iter().zip(agent_b.costs()) {
                assert_eq!(cost_a.estimate().x, cost_b.estimate().x);
                assert_eq!(cost_a.estimate().y, cost_b.estimate().y);
                assert_eq!(cost_a.cost(), cost_b.cost());
            }
        }
    }

    #[test]
    fn test_consensus_is_order_independent() {
        // Two identical teams, communicate applied in opposite agent
        // orders, must land on identical estimates: the snapshot makes
        // the round synchronous.
        let sim = Simulation::new(seeded_config(9)).unwrap();
        let consensus = ConsensusConfig::default();

        let mut forward: Vec<Agent> = sim.agents().to_vec();
        let mut backward: Vec<Agent> = sim.agents().to_vec();

        let snapshot = EstimateSnapshot::capture(forward.iter().map(|a| a.costs()));
        for agent in forward.iter_mut() {
            agent.communicate(&consensus, &snapshot).unwrap();
        }

        let snapshot = EstimateSnapshot::capture(backward.iter().map(|a| a.costs()));
        for agent in backward.iter_mut().rev() {
            agent.communicate(&consensus, &snapshot).unwrap();
        }

        for (f, b) in forward.iter().zip(&backward) {
            for (cf, cb) in f.costs().iter().zip(b.costs()) {
                assert_eq!(cf.estimate().x, cb.estimate().x);
                assert_eq!(cf.estimate().y, cb.estimate().y);
            }
        }
    }

    #[test]
    fn test_degenerate_skip_is_counted() {
        let mut sim = Simulation::new(seeded_config(13)).unwrap();

        // Park agent 0 exactly on its own first estimate so the
        // residual range collapses to zero.
        let estimate = sim.agents()[0].costs()[0].estimate();
        sim.agents_mut()[0].position = estimate;

        sim.sense_all();
        sim.optimize_all();

        assert!(sim.degenerate_skips() >= 1);
        let cost = &sim.agents()[0].costs()[0];
        assert!(cost.estimate().is_finite());
        assert_relative_eq!(cost.estimate().x, estimate.x);
        assert_relative_eq!(cost.estimate().y, estimate.y);
    }

    #[test]
    fn test_advance_agents_moves_by_speed() {
        let mut sim = Simulation::new(seeded_config(21)).unwrap();
        sim.agents_mut()[0].position = Point2D::new(400.0, 300.0);
        sim.agents_mut()[0].command = crate::core::types::MotionCommand::new(1.0, 0.0);
        sim.advance_agents();
        let moved = sim.agents()[0].position;
        assert_relative_eq!(moved.x, 402.0, epsilon = 1e-6);
        assert_relative_eq!(moved.y, 300.0);
    }
}
