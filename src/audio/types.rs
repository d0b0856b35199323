//! Identity tokens and the hardware event stream.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Process-unique identity of a hardware playback handle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(u64);

impl HandleId {
    /// Allocate a fresh id. Every handle constructor calls this once.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity of one `load` request. Events carry it so that completions of
/// superseded loads can recognise themselves as stale.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadId(pub(crate) u64);

impl fmt::Display for LoadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "load-{}", self.0)
    }
}

/// Notifications emitted by a hardware playback handle.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// The source for `load` is decoded and can start.
    Ready {
        load: LoadId,
        duration: Option<Duration>,
    },
    /// The source for `load` could not be opened or decoded.
    Failed { load: LoadId, reason: String },
    /// The source for `load` played to its end.
    Ended { load: LoadId },
    /// The platform paused output on its own (device change, focus loss...).
    Paused,
    /// The platform resumed output on its own.
    Resumed,
    /// Position notification pushed by the platform.
    TimeUpdate { load: LoadId, position: Duration },
}
