//! Error types shared by the playback engine and the catalog loaders.
//!
//! None of these are fatal to the process: the engine recovers from every
//! `MediaError` locally and the runtime falls back to an empty catalog on
//! `CatalogError`.

use std::path::PathBuf;

use thiserror::Error;

use crate::audio::HandleId;

/// Failures reported by a hardware playback handle.
#[derive(Error, Debug)]
pub enum MediaError {
    /// The source locator could not be opened.
    #[error("failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source opened but could not be decoded.
    #[error("failed to decode {path:?}: {reason}")]
    Decode { path: PathBuf, reason: String },

    /// `play` was requested before any source became ready.
    #[error("no source is ready for playback")]
    NotReady,

    /// Seeking inside the current source failed.
    #[error("seek failed: {0}")]
    Seek(String),

    /// A second analysis tap was requested for the same handle.
    #[error("handle {0} already has an analysis tap attached")]
    TapExists(HandleId),

    /// No audio output device could be opened.
    #[error("audio output unavailable: {0}")]
    Output(String),
}

/// Failures while building the track catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to read catalog {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid catalog {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("track id {0:?} appears more than once")]
    DuplicateId(String),

    #[error("track {index} has an empty id")]
    EmptyId { index: usize },
}
