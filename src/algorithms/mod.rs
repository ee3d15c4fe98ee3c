//! Core estimation algorithms layer.
//!
//! This layer contains the algorithmic building blocks for cooperative
//! landmark estimation.
//!
//! # Contents
//!
//! - [`estimation`]: Quadratic range costs with gradient updates
//! - [`sensing`]: Noisy range measurement model
//! - [`consensus`]: Peer averaging over a synchronous-round snapshot

pub mod consensus;
pub mod estimation;
pub mod sensing;
