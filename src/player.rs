//! Playback state and the engine that keeps it in step with the hardware.
//!
//! `PlaybackStore` is the single source of truth consumers read;
//! `PlaybackEngine` is the public action surface that mutates it and
//! drives the transport, the scheduler and the visualizer surfaces.

mod engine;
mod queue;
mod store;

pub use engine::PlaybackEngine;
pub use queue::{Direction, adjacent, index_of};
pub use store::{PlaybackState, PlaybackStore};

#[cfg(test)]
mod tests;
