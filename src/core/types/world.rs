//! World extent shared by every component.
//!
//! The window bounds are passed explicitly to whatever needs them
//! (noise scaling, placement, clamping) instead of living in ambient
//! globals.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::point::Point2D;

/// Rectangular world extent in window pixels, origin at the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    /// World width in pixels
    pub width: f32,
    /// World height in pixels
    pub height: f32,
}

impl WorldBounds {
    /// Create new bounds.
    #[inline]
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Clamp a point into the bounds, inset by `margin` on every side.
    #[inline]
    pub fn clamp(&self, point: &Point2D, margin: f32) -> Point2D {
        Point2D::new(
            point.x.clamp(margin, self.width - margin),
            point.y.clamp(margin, self.height - margin),
        )
    }

    /// True when the point lies inside the bounds.
    #[inline]
    pub fn contains(&self, point: &Point2D) -> bool {
        (0.0..=self.width).contains(&point.x) && (0.0..=self.height).contains(&point.y)
    }

    /// Sample a uniform point anywhere inside the bounds.
    pub fn sample_uniform<R: Rng>(&self, rng: &mut R) -> Point2D {
        Point2D::new(
            rng.random_range(0.0..self.width),
            rng.random_range(0.0..self.height),
        )
    }

    /// Sample a uniform point inset by `margin` on every side.
    ///
    /// Used for agent placement so a body of that radius stays fully
    /// inside the world.
    pub fn sample_inset<R: Rng>(&self, rng: &mut R, margin: f32) -> Point2D {
        Point2D::new(
            rng.random_range(margin..self.width - margin),
            rng.random_range(margin..self.height - margin),
        )
    }
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// Default landmark layout: one at two-thirds of the world, one at
/// one-third.
pub fn default_landmarks(bounds: &WorldBounds) -> Vec<Point2D> {
    vec![
        Point2D::new(2.0 * bounds.width / 3.0, 2.0 * bounds.height / 3.0),
        Point2D::new(bounds.width / 3.0, bounds.height / 3.0),
    ]
}
