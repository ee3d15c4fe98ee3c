//! SanghaMap - Cooperative range-only landmark estimation for
//! multi-robot teams.
//!
//! A team of mobile agents estimates the positions of fixed landmarks
//! from noisy range (distance) measurements. Each agent refines its
//! own per-landmark estimate with fixed-step gradient descent on a
//! quadratic range residual, and once per tick blends it with the
//! unweighted mean of its peers' estimates so the team converges
//! toward a shared value.
//!
//! # Architecture
//!
//! The crate is organized into 4 logical layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                      bin                            │  ← Headless daemon
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                    engine/                          │  ← Orchestration
//! │               (agents, tick phases)                 │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                  algorithms/                        │  ← Core algorithms
//! │          (estimation, sensing, consensus)           │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                     core/                           │  ← Foundation
//! │                 (types, math)                       │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Tick cycle
//!
//! One discrete time step runs three strictly ordered phases:
//!
//! 1. **sense** - every agent takes a noisy range reading of every
//!    landmark and folds it into the matching cost,
//! 2. **communicate** - every agent blends each estimate with the
//!    unweighted mean of its peers' estimates, read from a snapshot
//!    taken before any agent applied its blend,
//! 3. **optimize** - every (agent, landmark) cost takes one fixed-step
//!    gradient update against its latest observation.
//!
//! Rendering, input handling, and real-time pacing belong to the
//! external driver: it writes agent positions and motion commands,
//! calls the tick phases, and reads estimates and costs back for
//! display.
//!
//! # Example
//!
//! ```
//! use sangha_map::{Simulation, SimulationConfig};
//!
//! let config = SimulationConfig {
//!     seed: 42,
//!     ..Default::default()
//! };
//! let mut sim = Simulation::new(config)?;
//!
//! for _ in 0..100 {
//!     sim.tick()?;
//! }
//!
//! let first = &sim.agents()[0].costs()[0];
//! println!("estimate {:?} at cost {}", first.estimate(), first.cost());
//! # Ok::<(), sangha_map::SimulationError>(())
//! ```

// ============================================================================
// Layer 1: Core foundation (no internal deps)
// ============================================================================
pub mod core;

// ============================================================================
// Layer 2: Algorithms (depends on core)
// ============================================================================
pub mod algorithms;

// ============================================================================
// Layer 3: Engine (depends on core, algorithms)
// ============================================================================
pub mod engine;

// ============================================================================
// Evaluation and tooling support
// ============================================================================
pub mod metrics;
pub mod utils;

// ============================================================================
// Convenience re-exports (flat namespace for common use)
// ============================================================================

// Core types
pub use core::types::{default_landmarks, AgentId, MotionCommand, Point2D, WorldBounds};

// Algorithms - Estimation
pub use algorithms::estimation::{RangeCost, RangeCostConfig, StepOutcome};

// Algorithms - Sensing
pub use algorithms::sensing::{RangeSensor, RangeSensorConfig};

// Algorithms - Consensus
pub use algorithms::consensus::{
    consensus_estimate, ConsensusConfig, ConsensusError, EstimateSnapshot,
};

// Engine
pub use engine::{Agent, Simulation, SimulationConfig, SimulationError};

// Metrics
pub use metrics::{
    compute_estimation_error, compute_team_error, EstimationError, EstimationErrorStats,
};
