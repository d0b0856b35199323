//! The seams between the engine and the hardware playback resource.
//!
//! `MediaHandle` is the imperative transport API; only `MediaTransport`
//! calls it. `AnalysisTarget` is the narrow capability the visualization
//! registry needs to build its one tap.

use std::time::Duration;

use crate::error::MediaError;
use crate::viz::AnalyserNode;

use super::types::{HandleId, LoadId, MediaEvent};

pub trait MediaHandle {
    fn id(&self) -> HandleId;

    /// Locator of the most recently requested source, if any.
    fn source(&self) -> Option<&str>;

    /// Start loading `locator`. Completion is announced later through
    /// `poll_events` as `Ready` or `Failed` tagged with `load`. A new load
    /// aborts any load still in flight.
    fn load(&mut self, locator: &str, load: LoadId);

    /// Start output. May be rejected by the platform.
    fn play(&mut self) -> Result<(), MediaError>;

    fn pause(&mut self);

    fn is_paused(&self) -> bool;

    fn position(&self) -> Duration;

    fn seek(&mut self, position: Duration) -> Result<(), MediaError>;

    /// Drain the events that arrived since the last call.
    fn poll_events(&mut self) -> Vec<MediaEvent>;
}

pub trait AnalysisTarget {
    fn target_id(&self) -> HandleId;

    /// Route the handle's output through a new analyser node. A handle
    /// accepts this once; later attempts fail with `MediaError::TapExists`.
    fn attach_tap(&mut self, size: usize) -> Result<AnalyserNode, MediaError>;
}
