use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::audio::{AnalysisTarget, MediaHandle, MediaTransport};
use crate::config::{AudioSettings, VisualizerSettings};
use crate::library::Track;
use crate::scheduler::{Scheduler, Tick, TickControl, TickId};
use crate::viz::{AnalyserNode, Frame, GraphRegistry, Surface, SurfaceId, Viewport, Visualizer};

use super::store::{PlaybackState, PlaybackStore};

struct MountedSurface {
    surface: Surface,
    tick: TickId,
}

/// Process-lifetime owner of the playback subsystem.
///
/// Views come and go around it; the store, the handle (inside the
/// transport) and the graph registry live as long as the engine does. All
/// methods run on the UI thread; `tick` is the one scheduler tick.
pub struct PlaybackEngine<H> {
    store: PlaybackStore,
    transport: MediaTransport<H>,
    graphs: GraphRegistry,
    scheduler: Scheduler<Tick>,
    surfaces: BTreeMap<SurfaceId, MountedSurface>,
    next_surface: u64,
    analyser_size: usize,
    viz: VisualizerSettings,
}

impl<H: MediaHandle + AnalysisTarget> PlaybackEngine<H> {
    pub fn new(handle: H, audio: &AudioSettings, viz: &VisualizerSettings) -> Self {
        info!(handle = %handle.id(), "playback engine started");
        Self {
            store: PlaybackStore::new(),
            transport: MediaTransport::new(handle),
            graphs: GraphRegistry::new(),
            scheduler: Scheduler::new(),
            surfaces: BTreeMap::new(),
            next_surface: 0,
            analyser_size: audio.analyser_size,
            viz: viz.clone(),
        }
    }

    pub fn state(&self) -> &PlaybackState {
        self.store.state()
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.store.current_track()
    }

    /// Resolved duration of the current track.
    pub fn duration(&self) -> std::time::Duration {
        self.store.duration()
    }

    pub fn is_loading(&self) -> bool {
        self.transport.is_loading()
    }

    pub fn set_queue(&mut self, tracks: Vec<Track>) {
        self.store.set_queue(tracks);
        self.sync();
    }

    pub fn play_track(&mut self, id: &str) -> bool {
        let accepted = self.store.play_track(id);
        self.sync();
        accepted
    }

    pub fn pause(&mut self) {
        self.store.pause();
        self.sync();
    }

    pub fn resume(&mut self) {
        self.store.resume();
        self.sync();
    }

    pub fn toggle(&mut self) {
        if self.store.state().is_playing {
            self.pause();
        } else {
            self.resume();
        }
    }

    pub fn next(&mut self) {
        self.store.next();
        self.sync();
    }

    pub fn prev(&mut self) {
        self.store.prev();
        self.sync();
    }

    pub fn seek(&mut self, seconds: f64) {
        self.store.seek(seconds);
        self.sync();
    }

    /// Seek relative to the current position.
    pub fn seek_by(&mut self, delta_seconds: f64) {
        let target = self.store.state().position_seconds() + delta_seconds;
        self.seek(target);
    }

    /// Deliver pending hardware events, then run one scheduler tick.
    pub fn tick(&mut self) {
        for event in self.transport.poll_events() {
            self.transport
                .handle_event(event, &mut self.store, &mut self.scheduler);
        }

        let playing = self.store.state().is_playing;
        self.scheduler.run_tick(|_, task| match task {
            Tick::Position => self.transport.report_position(&mut self.store),
            Tick::Frame(id) => match self.surfaces.get_mut(&id) {
                Some(mounted) => {
                    mounted.surface.advance(playing);
                    TickControl::Continue
                }
                None => TickControl::Stop,
            },
        });
    }

    /// Mount a visualizer surface of the given size. The audio graph is
    /// built on the first mount and reused afterwards.
    pub fn mount_visualizer(&mut self, width: u16, height: u16) -> SurfaceId {
        let node = match self
            .graphs
            .get_or_create(self.transport.analysis_target(), self.analyser_size)
        {
            Ok(node) => node,
            Err(e) => {
                // Draw the idle baseline rather than fail the view.
                warn!(error = %e, "analysis graph unavailable, visualizer stays idle");
                AnalyserNode::new(self.analyser_size)
            }
        };

        let id = SurfaceId(self.next_surface);
        self.next_surface += 1;

        let visualizer = Visualizer::new(node, self.viz.bars, self.viz.idle_level);
        let idle = Frame::idle(self.viz.bars, self.viz.idle_level);
        let surface = Surface::new(visualizer, Viewport::new(width, height), idle);
        let tick = self.scheduler.subscribe(Tick::Frame(id));
        self.surfaces.insert(id, MountedSurface { surface, tick });

        debug!(surface = ?id, width, height, "visualizer mounted");
        id
    }

    /// Cancel a surface's tick and drop it. The graph stays cached.
    pub fn unmount_visualizer(&mut self, id: SurfaceId) -> bool {
        match self.surfaces.remove(&id) {
            Some(mounted) => {
                self.scheduler.cancel(mounted.tick);
                debug!(surface = ?id, "visualizer unmounted");
                true
            }
            None => false,
        }
    }

    pub fn set_surface_visible(&mut self, id: SurfaceId, visible: bool) {
        if let Some(mounted) = self.surfaces.get_mut(&id) {
            mounted.surface.set_visible(visible);
        }
    }

    pub fn resize_visualizer(&mut self, id: SurfaceId, width: u16, height: u16) {
        if let Some(mounted) = self.surfaces.get_mut(&id) {
            mounted.surface.resize(Viewport::new(width, height));
        }
    }

    pub fn surface(&self, id: SurfaceId) -> Option<&Surface> {
        self.surfaces.get(&id).map(|m| &m.surface)
    }

    pub fn graphs(&self) -> &GraphRegistry {
        &self.graphs
    }

    /// Stop every loop and listener. Handle and graph are left in place.
    pub fn shutdown(&mut self) {
        self.transport.shutdown(&mut self.scheduler);
        for (_, mounted) in std::mem::take(&mut self.surfaces) {
            self.scheduler.cancel(mounted.tick);
        }
        info!("playback engine stopped");
    }

    fn sync(&mut self) {
        self.transport.reconcile(&mut self.store, &mut self.scheduler);
    }

    #[cfg(test)]
    pub(crate) fn handle(&self) -> &H {
        self.transport.handle()
    }

    #[cfg(test)]
    pub(crate) fn handle_mut(&mut self) -> &mut H {
        self.transport.handle_mut()
    }

    #[cfg(test)]
    pub(crate) fn scheduler(&self) -> &Scheduler<Tick> {
        &self.scheduler
    }

    #[cfg(test)]
    pub(crate) fn position_loop_running(&self) -> bool {
        self.transport.position_loop_running()
    }
}
