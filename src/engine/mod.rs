//! Simulation engine layer.
//!
//! Orchestrates the per-tick sense → communicate → optimize cycle over
//! the agent team.
//!
//! # Contents
//!
//! - [`Agent`]: one mobile agent with its landmark beliefs
//! - [`Simulation`]: tick driver and phase barriers

mod agent;
mod simulation;

pub use agent::Agent;
pub use simulation::{Simulation, SimulationConfig, SimulationError};
