use std::time::Duration;

use tracing::{debug, info, warn};

use crate::library::Track;

use super::queue::{self, Direction};

/// Observable playback state. Consumers only ever see it through `&`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackState {
    pub queue: Vec<Track>,
    pub current_track_id: Option<String>,
    pub is_playing: bool,
    pub position: Duration,
}

impl PlaybackState {
    pub fn position_seconds(&self) -> f64 {
        self.position.as_secs_f64()
    }
}

/// Single source of truth for queue, selection, play flag and position.
///
/// Every mutation is synchronous. Selection and seek requests bump counters
/// that the transport compares against what it has already applied, so
/// unrelated changes never cause a reload.
#[derive(Debug, Default)]
pub struct PlaybackStore {
    state: PlaybackState,
    /// Length reported by the decoder for the current track, when known.
    decoded_duration: Option<Duration>,
    selection: u64,
    seek: u64,
}

impl PlaybackStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn current_track(&self) -> Option<&Track> {
        let id = self.state.current_track_id.as_deref()?;
        self.state.queue.iter().find(|t| t.id == id)
    }

    /// Resolved duration of the current track: decoded length when known,
    /// otherwise the catalog's nominal length. Zero without a current track.
    pub fn duration(&self) -> Duration {
        match self.current_track() {
            Some(track) => self.decoded_duration.unwrap_or(track.duration),
            None => Duration::ZERO,
        }
    }

    /// Replace the queue. Never selects anything; drops the selection when
    /// the current track is not part of the new queue.
    pub fn set_queue(&mut self, tracks: Vec<Track>) {
        info!(tracks = tracks.len(), "queue replaced");
        self.state.queue = tracks;

        let still_queued = self
            .state
            .current_track_id
            .as_deref()
            .is_some_and(|id| queue::index_of(&self.state.queue, id).is_some());
        if self.state.current_track_id.is_some() && !still_queued {
            debug!("current track left the queue, clearing selection");
            self.state.current_track_id = None;
            self.state.is_playing = false;
            self.state.position = Duration::ZERO;
            self.decoded_duration = None;
            self.selection += 1;
        }
    }

    /// Select `id` and play it from the start. Unknown ids are ignored.
    pub fn play_track(&mut self, id: &str) -> bool {
        if queue::index_of(&self.state.queue, id).is_none() {
            warn!(track = id, "play requested for a track that is not queued");
            return false;
        }
        self.select(id.to_string());
        true
    }

    pub fn pause(&mut self) {
        if self.state.current_track_id.is_none() {
            debug!("pause ignored: nothing selected");
            return;
        }
        self.state.is_playing = false;
    }

    pub fn resume(&mut self) {
        if self.state.current_track_id.is_none() {
            debug!("resume ignored: nothing selected");
            return;
        }
        self.state.is_playing = true;
    }

    pub fn next(&mut self) {
        self.step(Direction::Forward);
    }

    pub fn prev(&mut self) {
        self.step(Direction::Backward);
    }

    /// Move to `seconds`, clamped to `[0, duration]`.
    pub fn seek(&mut self, seconds: f64) {
        if self.state.current_track_id.is_none() {
            debug!("seek ignored: nothing selected");
            return;
        }
        self.state.position = clamp_seconds(seconds, self.duration());
        self.seek += 1;
    }

    fn step(&mut self, direction: Direction) {
        let target = queue::adjacent(
            &self.state.queue,
            self.state.current_track_id.as_deref(),
            direction,
        )
        .map(|t| t.id.clone());

        match target {
            Some(id) => self.select(id),
            None => debug!(?direction, "step ignored: queue is empty"),
        }
    }

    fn select(&mut self, id: String) {
        if self.state.current_track_id.as_deref() != Some(id.as_str()) {
            self.decoded_duration = None;
        }
        info!(track = %id, "track selected");
        self.state.current_track_id = Some(id);
        self.state.position = Duration::ZERO;
        self.state.is_playing = true;
        self.selection += 1;
    }

    // Transport-facing mutations.

    pub(crate) fn selection_seq(&self) -> u64 {
        self.selection
    }

    pub(crate) fn seek_seq(&self) -> u64 {
        self.seek
    }

    /// Record the decoder's length for the current track. Zero lengths are
    /// treated as unknown.
    pub(crate) fn resolve_duration(&mut self, duration: Option<Duration>) {
        self.decoded_duration = duration.filter(|d| !d.is_zero());
        self.state.position = self.state.position.min(self.duration());
    }

    pub(crate) fn report_position(&mut self, position: Duration) {
        if self.state.current_track_id.is_none() {
            return;
        }
        self.state.position = position.min(self.duration());
    }

    /// Write the handle's actual play state back.
    pub(crate) fn sync_playing(&mut self, playing: bool) {
        self.state.is_playing = playing && self.state.current_track_id.is_some();
    }
}

fn clamp_seconds(seconds: f64, max: Duration) -> Duration {
    if seconds.is_nan() || seconds <= 0.0 {
        return Duration::ZERO;
    }
    if seconds >= max.as_secs_f64() {
        return max;
    }
    Duration::try_from_secs_f64(seconds).map_or(max, |d| d.min(max))
}
