//! Track catalog: the read-only list of playable items supplied at startup.
//!
//! Tracks come either from a TOML catalog file or from scanning a music
//! directory. Either way the result is a plain `Vec<Track>` handed to the
//! playback engine's `set_queue`.

mod catalog;
mod model;
mod scan;

use std::path::Path;

pub use catalog::load_catalog;
pub use model::{Track, source_path};
pub use scan::scan;

use crate::config::LibrarySettings;
use crate::error::CatalogError;

/// Load tracks from `location`: a catalog file when it ends in `.toml`,
/// otherwise a directory to scan.
pub fn load(location: &Path, settings: &LibrarySettings) -> Result<Vec<Track>, CatalogError> {
    let is_catalog = location
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("toml"));

    if is_catalog {
        load_catalog(location)
    } else {
        Ok(scan(location, settings))
    }
}
