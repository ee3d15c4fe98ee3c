//! Metrics for evaluating estimation quality.
//!
//! Provides tools for measuring:
//! - Estimate accuracy against ground-truth landmark positions
//! - Inter-agent disagreement (consensus progress)

pub mod estimation_error;

pub use estimation_error::{
    compute_estimation_error, compute_team_error, EstimationError, EstimationErrorStats,
};
