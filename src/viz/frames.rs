//! Waveform sampling: time-domain samples in, per-bar magnitudes out.

use super::analyser::AnalyserNode;

/// Baseline of float PCM: silence sits at zero.
pub const CENTER: f32 = 0.0;

/// One rendered frame: a magnitude in `0.0..=1.0` per display bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub bars: Vec<f32>,
    /// False for the idle baseline drawn while nothing plays.
    pub live: bool,
}

impl Frame {
    pub fn idle(bars: usize, level: f32) -> Self {
        Self {
            bars: vec![level; bars],
            live: false,
        }
    }
}

/// Reduce `samples` to `bars` magnitudes by taking every Nth sample and
/// measuring its distance from the center line.
pub fn downsample(samples: &[f32], bars: usize) -> Vec<f32> {
    if bars == 0 {
        return Vec::new();
    }
    let stride = (samples.len() / bars).max(1);

    let mut out: Vec<f32> = samples
        .iter()
        .step_by(stride)
        .take(bars)
        .map(|s| (s - CENTER).abs().min(1.0))
        .collect();
    out.resize(bars, 0.0);
    out
}

/// Pulls frames from an analyser node.
#[derive(Debug)]
pub struct Visualizer {
    node: AnalyserNode,
    bars: usize,
    idle_level: f32,
    scratch: Vec<f32>,
}

impl Visualizer {
    pub fn new(node: AnalyserNode, bars: usize, idle_level: f32) -> Self {
        let scratch = vec![0.0; node.size()];
        Self {
            node,
            bars,
            idle_level,
            scratch,
        }
    }

    #[cfg(test)]
    pub fn node(&self) -> &AnalyserNode {
        &self.node
    }

    /// Next frame. Inactive frames are the idle baseline and leave the
    /// analyser untouched.
    pub fn frame(&mut self, active: bool) -> Frame {
        if !active {
            return Frame::idle(self.bars, self.idle_level);
        }
        self.node.time_domain(&mut self.scratch);
        Frame {
            bars: downsample(&self.scratch, self.bars),
            live: true,
        }
    }

    /// Endless lazy stream of frames; `active` is asked once per frame.
    /// Surfaces pull one frame per tick from a fresh stream, which picks up
    /// from the same node.
    pub fn frames<'a, F>(&'a mut self, mut active: F) -> impl Iterator<Item = Frame> + 'a
    where
        F: FnMut() -> bool + 'a,
    {
        std::iter::from_fn(move || Some(self.frame(active())))
    }
}
