//! Source preparation for the rodio device.
//!
//! Opening and decoding happen off the UI thread; the decoded source is
//! wrapped in a `TappedSource` so the analyser sees exactly what the sink
//! plays.

use std::fs::File;
use std::io::BufReader;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use rodio::source::SeekError;
use rodio::{ChannelCount, Decoder, SampleRate, Source};

use crate::error::MediaError;
use crate::library::source_path;
use crate::viz::AnalyserNode;

/// Shared slot holding the handle's one analyser. Empty until the
/// visualization registry attaches a tap; set at most once.
pub(super) type TapSlot = Arc<OnceLock<AnalyserNode>>;

pub(super) type DecodedSource = Decoder<BufReader<File>>;

/// Open and decode `locator`.
pub(super) fn open_source(locator: &str) -> Result<DecodedSource, MediaError> {
    let path = source_path(locator);
    let file = File::open(&path).map_err(|source| MediaError::Open {
        path: path.clone(),
        source,
    })?;

    Decoder::new(BufReader::new(file)).map_err(|e| MediaError::Decode {
        path,
        reason: e.to_string(),
    })
}

/// Passthrough source that copies the first channel of every frame into the
/// tap's analyser, once one is attached.
pub(super) struct TappedSource<S> {
    inner: S,
    tap: TapSlot,
    channel: ChannelCount,
}

impl<S> TappedSource<S>
where
    S: Source,
{
    pub(super) fn new(inner: S, tap: TapSlot) -> Self {
        Self {
            inner,
            tap,
            channel: 0,
        }
    }
}

impl<S> Iterator for TappedSource<S>
where
    S: Source,
{
    type Item = S::Item;

    fn next(&mut self) -> Option<S::Item> {
        let sample = self.inner.next()?;

        if self.channel == 0 {
            if let Some(node) = self.tap.get() {
                node.push(sample);
            }
        }
        self.channel = (self.channel + 1) % self.inner.channels().max(1);

        Some(sample)
    }
}

impl<S> Source for TappedSource<S>
where
    S: Source,
{
    fn current_span_len(&self) -> Option<usize> {
        self.inner.current_span_len()
    }

    fn channels(&self) -> ChannelCount {
        self.inner.channels()
    }

    fn sample_rate(&self) -> SampleRate {
        self.inner.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        self.inner.total_duration()
    }

    fn try_seek(&mut self, pos: Duration) -> Result<(), SeekError> {
        self.channel = 0;
        self.inner.try_seek(pos)
    }
}
