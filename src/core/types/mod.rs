//! Core data types for cooperative landmark estimation.
//!
//! - [`Point2D`]: 2D point in window pixels
//! - [`AgentId`]: stable per-agent identifier
//! - [`MotionCommand`]: driver-owned motion intent
//! - [`WorldBounds`]: explicit world extent (no ambient globals)

mod point;
mod world;

pub use point::{AgentId, MotionCommand, Point2D};
pub use world::{default_landmarks, WorldBounds};
