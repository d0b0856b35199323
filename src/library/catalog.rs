//! TOML track catalogs.
//!
//! A catalog file is a list of `[[tracks]]` tables:
//!
//! ```toml
//! [[tracks]]
//! id = "night-drive"
//! title = "Night Drive"
//! artist = "Someone"
//! source = "audio/night-drive.mp3"
//! duration_seconds = 240
//! bpm = 96
//! ```
//!
//! Relative `source` paths are resolved against the catalog's directory.

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::CatalogError;

use super::model::Track;

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    tracks: Vec<CatalogEntry>,
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    id: String,
    title: String,
    #[serde(default)]
    artist: Option<String>,
    source: String,
    #[serde(default)]
    duration_seconds: f64,
    #[serde(default)]
    bpm: Option<u32>,
}

/// Read and validate a catalog file.
pub fn load_catalog(path: &Path) -> Result<Vec<Track>, CatalogError> {
    let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_catalog(&text, path)
}

/// Parse catalog `text` that was read from `path`.
pub(super) fn parse_catalog(text: &str, path: &Path) -> Result<Vec<Track>, CatalogError> {
    let file: CatalogFile = toml::from_str(text).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));

    let mut seen = HashSet::new();
    let mut tracks = Vec::with_capacity(file.tracks.len());
    for (index, entry) in file.tracks.into_iter().enumerate() {
        let id = entry.id.trim().to_string();
        if id.is_empty() {
            return Err(CatalogError::EmptyId { index });
        }
        if !seen.insert(id.clone()) {
            return Err(CatalogError::DuplicateId(id));
        }

        tracks.push(Track {
            id,
            title: entry.title,
            artist: entry.artist.filter(|a| !a.trim().is_empty()),
            source: resolve_source(base, &entry.source),
            duration: nominal_duration(entry.duration_seconds),
            bpm: entry.bpm,
        });
    }
    Ok(tracks)
}

fn resolve_source(base: &Path, source: &str) -> String {
    let path = super::model::source_path(source);
    if path.is_absolute() || base.as_os_str().is_empty() {
        source.to_string()
    } else {
        base.join(path).display().to_string()
    }
}

/// Negative, non-finite or out of range lengths count as unknown.
fn nominal_duration(seconds: f64) -> Duration {
    Duration::try_from_secs_f64(seconds).unwrap_or_default()
}
