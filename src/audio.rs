//! Hardware playback: the handle seam, its rodio implementation and the
//! transport that bridges it to the playback store.

mod device;
mod handle;
mod sink;
mod transport;
mod types;

pub use device::RodioHandle;
pub use handle::{AnalysisTarget, MediaHandle};
pub use transport::MediaTransport;
pub use types::{HandleId, LoadId, MediaEvent};

#[cfg(test)]
pub(crate) mod fake;
