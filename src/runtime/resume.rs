//! Remembers the last played track across runs.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config;

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
struct LastPlayed {
    track_id: Option<String>,
}

/// `$XDG_STATE_HOME/encore/last_played.toml`.
pub fn default_path() -> Option<PathBuf> {
    config::state_dir().map(|d| d.join("last_played.toml"))
}

/// Read the remembered track id. Missing or unreadable files mean "none".
pub fn load(path: &Path) -> Option<String> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read last played track");
            return None;
        }
    };
    match toml::from_str::<LastPlayed>(&text) {
        Ok(last) => last.track_id.filter(|id| !id.trim().is_empty()),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring malformed last played file");
            None
        }
    }
}

/// Persist `track_id` (or clear it) at `path`.
pub fn save(path: &Path, track_id: Option<&str>) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let last = LastPlayed {
        track_id: track_id.map(str::to_string),
    };
    let text = toml::to_string(&last).map_err(io::Error::other)?;
    fs::write(path, text)?;
    debug!(path = %path.display(), ?track_id, "last played track saved");
    Ok(())
}
