//! Range-only sensing.
//!
//! # Components
//!
//! - [`RangeSensor`]: noisy range measurements with
//!   distance-proportional, position-correlated noise

mod range_sensor;

pub use range_sensor::{RangeSensor, RangeSensorConfig};
