//! Scripted in-memory handle for engine and transport tests.
//!
//! Loads never complete on their own: tests decide when (and in which
//! order) `Ready`, `Failed` and `Ended` arrive. Unlike a real device it
//! also delivers `Ready` for superseded loads, so stale-event handling in
//! the transport gets exercised.

use std::collections::VecDeque;
use std::time::Duration;

use crate::error::MediaError;
use crate::viz::AnalyserNode;

use super::handle::{AnalysisTarget, MediaHandle};
use super::types::{HandleId, LoadId, MediaEvent};

#[derive(Debug)]
pub(crate) struct FakeHandle {
    id: HandleId,
    source: Option<String>,
    paused: bool,
    position: Duration,
    ready: Option<LoadId>,
    tap: Option<AnalyserNode>,
    events: VecDeque<MediaEvent>,

    /// Every load issued, in order.
    pub loads: Vec<(LoadId, String)>,
    /// Source that was audible each time `play` succeeded.
    pub started: Vec<String>,
    pub play_calls: usize,
    pub pause_calls: usize,
    pub seeks: Vec<Duration>,
    pub taps_attached: usize,
    /// When set, `play` fails the way a blocked autoplay does.
    pub reject_play: bool,
}

impl FakeHandle {
    pub(crate) fn new() -> Self {
        Self {
            id: HandleId::next(),
            source: None,
            paused: true,
            position: Duration::ZERO,
            ready: None,
            tap: None,
            events: VecDeque::new(),
            loads: Vec::new(),
            started: Vec::new(),
            play_calls: 0,
            pause_calls: 0,
            seeks: Vec::new(),
            taps_attached: 0,
            reject_play: false,
        }
    }

    /// Most recent load issued for `locator`.
    pub(crate) fn load_for(&self, locator: &str) -> Option<LoadId> {
        self.loads
            .iter()
            .rev()
            .find(|(_, l)| l == locator)
            .map(|(id, _)| *id)
    }

    pub(crate) fn last_load(&self) -> Option<LoadId> {
        self.loads.last().map(|(id, _)| *id)
    }

    /// Announce that `load` finished decoding.
    pub(crate) fn finish_load(&mut self, load: LoadId, duration: Option<Duration>) {
        if Some(load) == self.last_load() {
            self.ready = Some(load);
            self.position = Duration::ZERO;
        }
        self.events.push_back(MediaEvent::Ready { load, duration });
    }

    pub(crate) fn fail_load(&mut self, load: LoadId, reason: &str) {
        if Some(load) == self.last_load() {
            self.source = None;
        }
        self.events.push_back(MediaEvent::Failed {
            load,
            reason: reason.to_string(),
        });
    }

    /// Play the ready source to its end.
    pub(crate) fn finish_playback(&mut self) {
        if let Some(load) = self.ready {
            self.paused = true;
            self.events.push_back(MediaEvent::Ended { load });
        }
    }

    /// Let the audible source progress by `by`.
    pub(crate) fn advance(&mut self, by: Duration) {
        if !self.paused {
            self.position += by;
        }
    }

    /// The platform pauses on its own and reports it.
    pub(crate) fn interrupt(&mut self) {
        self.paused = true;
        self.events.push_back(MediaEvent::Paused);
    }

    pub(crate) fn push_event(&mut self, event: MediaEvent) {
        self.events.push_back(event);
    }

    pub(crate) fn tap(&self) -> Option<&AnalyserNode> {
        self.tap.as_ref()
    }
}

impl MediaHandle for FakeHandle {
    fn id(&self) -> HandleId {
        self.id
    }

    fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    fn load(&mut self, locator: &str, load: LoadId) {
        self.source = Some(locator.to_string());
        self.paused = true;
        self.position = Duration::ZERO;
        self.ready = None;
        self.loads.push((load, locator.to_string()));
    }

    fn play(&mut self) -> Result<(), MediaError> {
        self.play_calls += 1;
        if self.reject_play {
            return Err(MediaError::Output("start refused by the platform".to_string()));
        }
        if self.ready.is_none() {
            return Err(MediaError::NotReady);
        }
        self.paused = false;
        if let Some(source) = &self.source {
            self.started.push(source.clone());
        }
        Ok(())
    }

    fn pause(&mut self) {
        self.pause_calls += 1;
        self.paused = true;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn position(&self) -> Duration {
        self.position
    }

    fn seek(&mut self, position: Duration) -> Result<(), MediaError> {
        if self.ready.is_none() {
            return Err(MediaError::NotReady);
        }
        self.position = position;
        self.seeks.push(position);
        Ok(())
    }

    fn poll_events(&mut self) -> Vec<MediaEvent> {
        self.events.drain(..).collect()
    }
}

impl AnalysisTarget for FakeHandle {
    fn target_id(&self) -> HandleId {
        self.id
    }

    fn attach_tap(&mut self, size: usize) -> Result<AnalyserNode, MediaError> {
        if self.tap.is_some() {
            return Err(MediaError::TapExists(self.id));
        }
        let node = AnalyserNode::new(size);
        self.tap = Some(node.clone());
        self.taps_attached += 1;
        Ok(node)
    }
}
