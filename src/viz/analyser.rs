use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// The analysis node of the audio graph: a bounded ring of the most recent
/// mono samples that passed through the tap.
///
/// Clones share the same ring. The audio thread writes with `push`, the UI
/// thread reads with `time_domain`.
#[derive(Debug, Clone)]
pub struct AnalyserNode {
    ring: Arc<Mutex<VecDeque<f32>>>,
    size: usize,
}

impl AnalyserNode {
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            ring: Arc::new(Mutex::new(VecDeque::with_capacity(size))),
            size,
        }
    }

    /// Number of samples handed out per read.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Record one sample. Never blocks: on contention the sample is dropped
    /// rather than stalling the audio thread.
    pub fn push(&self, sample: f32) {
        if let Ok(mut ring) = self.ring.try_lock() {
            if ring.len() >= self.size {
                ring.pop_front();
            }
            ring.push_back(sample);
        }
    }

    /// Copy the newest `out.len()` samples into `out`, oldest first. Missing
    /// history is filled with silence. Returns how many real samples were copied.
    pub fn time_domain(&self, out: &mut [f32]) -> usize {
        out.fill(0.0);
        let Ok(ring) = self.ring.lock() else {
            return 0;
        };

        let n = ring.len().min(out.len());
        let offset = out.len() - n;
        for (dst, src) in out[offset..].iter_mut().zip(ring.iter().skip(ring.len() - n)) {
            *dst = *src;
        }
        n
    }

    /// True when both values are handles to the same ring.
    pub fn same_node(&self, other: &AnalyserNode) -> bool {
        Arc::ptr_eq(&self.ring, &other.ring)
    }
}
