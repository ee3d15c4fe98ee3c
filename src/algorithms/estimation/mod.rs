//! Landmark-position estimation from range observations.
//!
//! # Components
//!
//! - [`RangeCost`]: quadratic residual cost with a fixed-step gradient
//!   update, one instance per (agent, landmark) pair

mod range_cost;

pub use range_cost::{RangeCost, RangeCostConfig, StepOutcome};
