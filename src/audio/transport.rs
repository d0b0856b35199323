//! The media transport: the only code that commands the playback handle.
//!
//! It reconciles the store's declarative state (selected track, play flag,
//! seek requests) with the handle's imperative API, and maps each hardware
//! event back onto exactly one store mutation.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::player::PlaybackStore;
use crate::scheduler::{Scheduler, Tick, TickControl, TickId};

use super::handle::{AnalysisTarget, MediaHandle};
use super::types::{LoadId, MediaEvent};

/// One-shot "source ready" listener for the newest load.
#[derive(Debug)]
struct PendingLoad {
    load: LoadId,
    track_id: String,
    locator: String,
}

/// The source currently sitting in the handle.
#[derive(Debug)]
struct LoadedSource {
    load: LoadId,
    track_id: String,
    ended: bool,
}

pub struct MediaTransport<H> {
    handle: H,
    next_load: u64,
    applied_selection: u64,
    applied_seek: u64,
    pending: Option<PendingLoad>,
    loaded: Option<LoadedSource>,
    position_tick: Option<TickId>,
}

impl<H: MediaHandle> MediaTransport<H> {
    pub fn new(handle: H) -> Self {
        Self {
            handle,
            next_load: 0,
            applied_selection: 0,
            applied_seek: 0,
            pending: None,
            loaded: None,
            position_tick: None,
        }
    }

    /// True while a load has been issued and its ready event has not arrived.
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn position_loop_running(&self) -> bool {
        self.position_tick.is_some()
    }

    pub fn poll_events(&mut self) -> Vec<MediaEvent> {
        self.handle.poll_events()
    }

    /// Bring the handle in line with the store.
    pub fn reconcile(&mut self, store: &mut PlaybackStore, scheduler: &mut Scheduler<Tick>) {
        if store.selection_seq() != self.applied_selection {
            self.applied_selection = store.selection_seq();
            self.apply_selection(store);
        }
        if store.seek_seq() != self.applied_seek {
            self.applied_seek = store.seek_seq();
            self.apply_seek(store);
        }
        self.mirror_playing(store);
        self.sync_position_loop(store, scheduler);
    }

    /// Map one hardware event onto the store, then reconcile.
    pub fn handle_event(
        &mut self,
        event: MediaEvent,
        store: &mut PlaybackStore,
        scheduler: &mut Scheduler<Tick>,
    ) {
        match event {
            MediaEvent::Ready { load, duration } => self.on_ready(load, duration, store),
            MediaEvent::Failed { load, reason } => {
                match self.pending.take_if(|p| p.load == load) {
                    Some(p) => {
                        warn!(track = %p.track_id, %load, %reason, "source failed to load");
                        store.sync_playing(false);
                    }
                    None => debug!(%load, "ignoring failure of a superseded load"),
                }
            }
            MediaEvent::Ended { load } => {
                let current = self
                    .loaded
                    .as_mut()
                    .filter(|l| l.load == load && self.pending.is_none());
                match current {
                    Some(loaded) => {
                        info!(track = %loaded.track_id, "track ended, advancing");
                        loaded.ended = true;
                        self.cancel_position_loop(scheduler);
                        store.next();
                    }
                    None => debug!(%load, "ignoring end of a superseded load"),
                }
            }
            MediaEvent::Paused => {
                if store.state().is_playing {
                    debug!("platform paused output");
                    store.sync_playing(false);
                }
            }
            MediaEvent::Resumed => {
                if !store.state().is_playing && self.is_ready() {
                    debug!("platform resumed output");
                    store.sync_playing(true);
                }
            }
            MediaEvent::TimeUpdate { load, position } => {
                // The position tick is the canonical writer; pushed updates
                // only fill in while it is not running.
                let current = self.loaded.as_ref().is_some_and(|l| l.load == load);
                if current && self.position_tick.is_none() {
                    store.report_position(position);
                }
            }
        }
        self.reconcile(store, scheduler);
    }

    /// One position-reporting tick.
    pub fn report_position(&mut self, store: &mut PlaybackStore) -> TickControl {
        if !self.is_ready() || self.handle.is_paused() || !store.state().is_playing {
            self.position_tick = None;
            return TickControl::Stop;
        }
        store.report_position(self.handle.position());
        TickControl::Continue
    }

    /// Stop loops and listeners. The handle itself stays alive.
    pub fn shutdown(&mut self, scheduler: &mut Scheduler<Tick>) {
        self.cancel_position_loop(scheduler);
        if let Some(p) = self.pending.take() {
            debug!(load = %p.load, "dropping pending load listener");
        }
        if !self.handle.is_paused() {
            self.handle.pause();
        }
    }

    fn is_ready(&self) -> bool {
        self.pending.is_none() && self.loaded.is_some()
    }

    fn apply_selection(&mut self, store: &mut PlaybackStore) {
        let Some(track) = store.current_track() else {
            if let Some(p) = self.pending.take() {
                debug!(load = %p.load, "selection cleared, dropping pending load");
            }
            if !self.handle.is_paused() {
                self.handle.pause();
            }
            return;
        };
        let track_id = track.id.clone();
        let locator = track.source.clone();

        if let Some(pending) = self.pending.as_mut() {
            if pending.locator == locator {
                // Same source still loading; its ready event starts it from 0.
                pending.track_id = track_id;
                return;
            }
            debug!(load = %pending.load, "superseding pending load");
        }

        let restartable = self.is_ready()
            && self.handle.source() == Some(locator.as_str())
            && self.loaded.as_ref().is_some_and(|l| !l.ended);
        if restartable {
            debug!(track = %track_id, "source unchanged, restarting in place");
            if let Err(e) = self.handle.seek(Duration::ZERO) {
                warn!(error = %e, "restart seek failed");
            }
            if let Some(loaded) = self.loaded.as_mut() {
                loaded.track_id = track_id;
            }
            store.report_position(Duration::ZERO);
            return;
        }

        self.issue_load(track_id, locator);
    }

    fn issue_load(&mut self, track_id: String, locator: String) {
        let load = LoadId(self.next_load);
        self.next_load += 1;
        info!(track = %track_id, %load, source = %locator, "loading source");
        self.loaded = None;
        // The listener is in place before the load is issued.
        let pending = self.pending.insert(PendingLoad {
            load,
            track_id,
            locator,
        });
        self.handle.load(&pending.locator, load);
    }

    /// A failed load leaves the selection without a source. Asking to play
    /// it again retries the load.
    fn retry_failed_load(&mut self, store: &PlaybackStore) {
        if self.pending.is_some() || self.loaded.is_some() {
            return;
        }
        let Some(track) = store.current_track() else {
            return;
        };
        debug!(track = %track.id, "retrying load after failure");
        self.issue_load(track.id.clone(), track.source.clone());
    }

    fn apply_seek(&mut self, store: &PlaybackStore) {
        if !self.is_ready() {
            debug!("seek deferred: source not ready");
            return;
        }
        let target = store.state().position;
        if let Err(e) = self.handle.seek(target) {
            warn!(error = %e, ?target, "seek failed");
        }
    }

    fn on_ready(&mut self, load: LoadId, duration: Option<Duration>, store: &mut PlaybackStore) {
        let Some(pending) = self.pending.take_if(|p| p.load == load) else {
            debug!(%load, "ignoring ready from a superseded load");
            return;
        };

        info!(track = %pending.track_id, %load, ?duration, "source ready");
        self.loaded = Some(LoadedSource {
            load,
            track_id: pending.track_id,
            ended: false,
        });
        if let Err(e) = self.handle.seek(Duration::ZERO) {
            debug!(error = %e, "could not rewind fresh source");
        }
        store.resolve_duration(duration);
        store.report_position(Duration::ZERO);

        if store.state().is_playing {
            self.start(store);
        }
    }

    fn mirror_playing(&mut self, store: &mut PlaybackStore) {
        let want = store.state().is_playing;
        if !self.is_ready() {
            if want {
                self.retry_failed_load(store);
            }
            return;
        }
        let paused = self.handle.is_paused();
        if want && paused {
            self.start(store);
        } else if !want && !paused {
            self.handle.pause();
        }
    }

    fn start(&mut self, store: &mut PlaybackStore) {
        if let Err(e) = self.handle.play() {
            // Stay consistent with what the hardware is actually doing; the
            // next explicit resume tries again.
            warn!(error = %e, "playback start rejected");
            store.sync_playing(false);
        }
    }

    fn sync_position_loop(&mut self, store: &PlaybackStore, scheduler: &mut Scheduler<Tick>) {
        let running = self.is_ready() && store.state().is_playing && !self.handle.is_paused();
        match (running, self.position_tick) {
            (true, None) => self.position_tick = Some(scheduler.subscribe(Tick::Position)),
            (false, Some(_)) => self.cancel_position_loop(scheduler),
            _ => {}
        }
    }

    fn cancel_position_loop(&mut self, scheduler: &mut Scheduler<Tick>) {
        if let Some(id) = self.position_tick.take() {
            scheduler.cancel(id);
        }
    }

    #[cfg(test)]
    pub(crate) fn handle(&self) -> &H {
        &self.handle
    }

    #[cfg(test)]
    pub(crate) fn handle_mut(&mut self) -> &mut H {
        &mut self.handle
    }
}

impl<H: MediaHandle + AnalysisTarget> MediaTransport<H> {
    /// The tap capability of the handle, for the graph registry. Transport
    /// commands stay private to this type.
    pub fn analysis_target(&mut self) -> &mut dyn AnalysisTarget {
        &mut self.handle
    }
}
