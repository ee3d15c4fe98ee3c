//! Point and identity types for the estimation core.

use serde::{Deserialize, Serialize};

/// A 2D point in window pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    /// X coordinate in pixels
    pub x: f32,
    /// Y coordinate in pixels
    pub y: f32,
}

impl Point2D {
    /// Create a new point.
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Squared distance to another point (avoids sqrt).
    #[inline]
    pub fn distance_squared(&self, other: &Point2D) -> f32 {
        crate::core::math::distance_squared(self.x, self.y, other.x, other.y)
    }

    /// Distance to another point.
    #[inline]
    pub fn distance(&self, other: &Point2D) -> f32 {
        crate::core::math::euclidean_distance(self.x, self.y, other.x, other.y)
    }

    /// Component-wise sum with another point.
    #[inline]
    pub fn add(&self, other: &Point2D) -> Point2D {
        Point2D::new(self.x + other.x, self.y + other.y)
    }

    /// Component-wise difference from another point.
    #[inline]
    pub fn sub(&self, other: &Point2D) -> Point2D {
        Point2D::new(self.x - other.x, self.y - other.y)
    }

    /// Scale both components by a factor.
    #[inline]
    pub fn scale(&self, factor: f32) -> Point2D {
        Point2D::new(self.x * factor, self.y * factor)
    }

    /// True when both coordinates are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Default for Point2D {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

/// Stable identifier for an agent within one simulation.
///
/// Self/peer discrimination during the consensus phase compares these
/// identifiers; the identity of the backing allocation is never used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub usize);

impl AgentId {
    /// Index into agent-ordered collections.
    #[inline]
    pub fn index(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "agent{}", self.0)
    }
}

/// Motion intent for one agent, written by the external driver.
///
/// Components are direction multipliers (the source of truth for how
/// far an agent moves per tick is the simulation's agent speed).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MotionCommand {
    /// X direction multiplier (typically -1, 0, or 1)
    pub dx: f32,
    /// Y direction multiplier (typically -1, 0, or 1)
    pub dy: f32,
}

impl MotionCommand {
    /// Create a new motion command.
    #[inline]
    pub fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    /// The zero command (agent holds position).
    #[inline]
    pub fn hold() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_point_distance() {
        let a = Point2D::new(0.0, 0.0);
        let b = Point2D::new(3.0, 4.0);
        assert_relative_eq!(a.distance(&b), 5.0);
        assert_relative_eq!(a.distance_squared(&b), 25.0);
    }

    #[test]
    fn test_point_arithmetic() {
        let a = Point2D::new(1.0, 2.0);
        let b = Point2D::new(3.0, -1.0);
        let sum = a.add(&b);
        assert_relative_eq!(sum.x, 4.0);
        assert_relative_eq!(sum.y, 1.0);
        let diff = a.sub(&b);
        assert_relative_eq!(diff.x, -2.0);
        assert_relative_eq!(diff.y, 3.0);
        let scaled = a.scale(2.5);
        assert_relative_eq!(scaled.x, 2.5);
        assert_relative_eq!(scaled.y, 5.0);
    }

    #[test]
    fn test_point_finite_check() {
        assert!(Point2D::new(1.0, 2.0).is_finite());
        assert!(!Point2D::new(f32::NAN, 2.0).is_finite());
        assert!(!Point2D::new(1.0, f32::INFINITY).is_finite());
    }

    #[test]
    fn test_agent_id_ordering() {
        assert!(AgentId(0) < AgentId(1));
        assert_eq!(AgentId(3).index(), 3);
        assert_eq!(format!("{}", AgentId(2)), "agent2");
    }

    #[test]
    fn test_motion_command_hold() {
        let cmd = MotionCommand::hold();
        assert_eq!(cmd.dx, 0.0);
        assert_eq!(cmd.dy, 0.0);
    }
}
