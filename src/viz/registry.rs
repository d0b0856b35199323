use std::collections::HashMap;

use tracing::{debug, info};

use crate::audio::{AnalysisTarget, HandleId};
use crate::error::MediaError;

use super::analyser::AnalyserNode;

/// Process-lifetime cache of audio graphs, keyed by handle identity.
///
/// A handle gets its tap the first time a visualizer needs it; every later
/// mount reuses the cached node.
#[derive(Debug, Default)]
pub struct GraphRegistry {
    graphs: HashMap<HandleId, AnalyserNode>,
    created: usize,
}

impl GraphRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_create<T>(&mut self, target: &mut T, size: usize) -> Result<AnalyserNode, MediaError>
    where
        T: AnalysisTarget + ?Sized,
    {
        let id = target.target_id();
        if let Some(node) = self.graphs.get(&id) {
            debug!(handle = %id, "reusing analysis graph");
            return Ok(node.clone());
        }

        let node = target.attach_tap(size)?;
        info!(handle = %id, size, "analysis graph created");
        self.graphs.insert(id, node.clone());
        self.created += 1;
        Ok(node)
    }

    /// How many graphs were ever built.
    pub fn created(&self) -> usize {
        self.created
    }
}
