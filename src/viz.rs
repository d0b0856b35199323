//! Live signal visualization.
//!
//! The audio graph (tap → analyser → passthrough) is built once per handle
//! by the `GraphRegistry`. Surfaces come and go with the views that show
//! them; each one samples the shared analyser on its own scheduler tick.

mod analyser;
mod frames;
mod registry;
mod render;
mod surface;

pub use analyser::AnalyserNode;
pub use frames::{CENTER, Frame, Visualizer, downsample};
pub use registry::GraphRegistry;
pub use render::{Viewport, bar_heights, rasterize};
pub use surface::Surface;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub(crate) u64);
