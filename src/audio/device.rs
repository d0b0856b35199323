//! The rodio-backed hardware playback handle.
//!
//! One `OutputStream` and one `Sink` for the whole process. Loads decode on
//! a short-lived worker thread and report back through a channel that
//! `poll_events` drains on the UI thread; only the newest load may reach
//! the sink.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, OnceLock};
use std::thread;
use std::time::Duration;

use rodio::cpal::StreamError;
use rodio::{OutputStream, OutputStreamBuilder, Sink, Source};
use tracing::{debug, warn};

use crate::error::MediaError;
use crate::viz::AnalyserNode;

use super::handle::{AnalysisTarget, MediaHandle};
use super::sink::{DecodedSource, TapSlot, TappedSource, open_source};
use super::types::{HandleId, LoadId, MediaEvent};

struct Prepared {
    load: LoadId,
    result: Result<DecodedSource, MediaError>,
}

pub struct RodioHandle {
    id: HandleId,
    // Dropping the stream silences the sink; keep it alive with the handle.
    _stream: OutputStream,
    sink: Sink,
    source: Option<String>,
    /// Newest load requested.
    requested: Option<LoadId>,
    /// Load whose source currently sits in the sink.
    loaded: Option<LoadId>,
    ended_reported: bool,
    /// Pushed notifications not yet handed out by `poll_events`.
    events: Vec<MediaEvent>,
    tap: TapSlot,
    prepared_tx: Sender<Prepared>,
    prepared_rx: Receiver<Prepared>,
    stream_errors: Receiver<String>,
}

impl RodioHandle {
    /// Open the default output device.
    pub fn open() -> Result<Self, MediaError> {
        // Device failures arrive on the audio thread; `poll_events` turns
        // them into a platform pause.
        let (error_tx, stream_errors) = mpsc::channel();
        let mut stream = OutputStreamBuilder::from_default_device()
            .map_err(|e| MediaError::Output(e.to_string()))?
            .with_error_callback(move |e: StreamError| {
                let _ = error_tx.send(e.to_string());
            })
            .open_stream_or_fallback()
            .map_err(|e| MediaError::Output(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);

        let sink = Sink::connect_new(stream.mixer());
        sink.pause();

        let (prepared_tx, prepared_rx) = mpsc::channel();
        Ok(Self {
            id: HandleId::next(),
            _stream: stream,
            sink,
            source: None,
            requested: None,
            loaded: None,
            ended_reported: false,
            events: Vec::new(),
            tap: Arc::new(OnceLock::new()),
            prepared_tx,
            prepared_rx,
            stream_errors,
        })
    }

    fn install(&mut self, load: LoadId, decoded: DecodedSource) -> Option<Duration> {
        let duration = decoded.total_duration();
        self.sink.clear();
        self.sink
            .append(TappedSource::new(decoded, Arc::clone(&self.tap)));
        self.sink.pause();
        self.loaded = Some(load);
        self.ended_reported = false;
        duration
    }
}

impl MediaHandle for RodioHandle {
    fn id(&self) -> HandleId {
        self.id
    }

    fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    fn load(&mut self, locator: &str, load: LoadId) {
        // Abort whatever is playing or pending; `clear` also pauses.
        self.sink.clear();
        self.source = Some(locator.to_string());
        self.requested = Some(load);
        self.loaded = None;

        let tx = self.prepared_tx.clone();
        let locator = locator.to_string();
        thread::spawn(move || {
            let result = open_source(&locator);
            // The receiver only disappears with the handle.
            let _ = tx.send(Prepared { load, result });
        });
    }

    fn play(&mut self) -> Result<(), MediaError> {
        if self.loaded.is_none() {
            return Err(MediaError::NotReady);
        }
        self.sink.play();
        Ok(())
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn is_paused(&self) -> bool {
        self.sink.is_paused()
    }

    fn position(&self) -> Duration {
        if self.loaded.is_some() {
            self.sink.get_pos()
        } else {
            Duration::ZERO
        }
    }

    fn seek(&mut self, position: Duration) -> Result<(), MediaError> {
        if self.loaded.is_none() {
            return Err(MediaError::NotReady);
        }
        self.sink
            .try_seek(position)
            .map_err(|e| MediaError::Seek(e.to_string()))?;
        if let Some(load) = self.loaded {
            self.events.push(MediaEvent::TimeUpdate {
                load,
                position: self.sink.get_pos(),
            });
        }
        Ok(())
    }

    fn poll_events(&mut self) -> Vec<MediaEvent> {
        let mut events = std::mem::take(&mut self.events);

        let mut stream_failed = false;
        while let Ok(reason) = self.stream_errors.try_recv() {
            warn!(%reason, "audio output error");
            stream_failed = true;
        }
        if stream_failed && !self.sink.is_paused() {
            self.sink.pause();
            events.push(MediaEvent::Paused);
        }

        while let Ok(prepared) = self.prepared_rx.try_recv() {
            if Some(prepared.load) != self.requested {
                debug!(load = %prepared.load, "dropping decoded source of an aborted load");
                continue;
            }
            match prepared.result {
                Ok(decoded) => {
                    let duration = self.install(prepared.load, decoded);
                    events.push(MediaEvent::Ready {
                        load: prepared.load,
                        duration,
                    });
                }
                Err(e) => {
                    warn!(load = %prepared.load, error = %e, "source failed to load");
                    self.source = None;
                    events.push(MediaEvent::Failed {
                        load: prepared.load,
                        reason: e.to_string(),
                    });
                }
            }
        }

        if let Some(load) = self.loaded {
            if !self.ended_reported && !self.sink.is_paused() && self.sink.empty() {
                self.ended_reported = true;
                events.push(MediaEvent::Ended { load });
            }
        }

        events
    }
}

impl AnalysisTarget for RodioHandle {
    fn target_id(&self) -> HandleId {
        self.id
    }

    fn attach_tap(&mut self, size: usize) -> Result<AnalyserNode, MediaError> {
        let node = AnalyserNode::new(size);
        self.tap
            .set(node.clone())
            .map_err(|_| MediaError::TapExists(self.id))?;
        Ok(node)
    }
}
