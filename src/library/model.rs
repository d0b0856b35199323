use std::path::PathBuf;
use std::time::Duration;

/// One playable item from the catalog. Built once at startup and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: Option<String>,
    /// Where the audio lives: a filesystem path, optionally `file://`-prefixed.
    pub source: String,
    /// Nominal length. The decoded length reported by the handle takes precedence.
    pub duration: Duration,
    pub bpm: Option<u32>,
}

impl Track {
    /// `Artist - Title`, or just the title when the artist is blank.
    pub fn display(&self) -> String {
        match self.artist.as_deref().map(str::trim) {
            Some(a) if !a.is_empty() => format!("{} - {}", a, self.title),
            _ => self.title.clone(),
        }
    }

    /// Filesystem path behind `source`.
    pub fn path(&self) -> PathBuf {
        source_path(&self.source)
    }
}

pub fn source_path(source: &str) -> PathBuf {
    PathBuf::from(source.strip_prefix("file://").unwrap_or(source))
}
