//! Cooperative tick scheduler.
//!
//! Loops are subscriptions: each tick runs every active subscription once,
//! and a subscription stays registered for the next tick only while its
//! callback returns `TickControl::Continue`. Cancelling is removing the
//! subscription by id; nothing runs on its own between ticks.

use std::collections::BTreeMap;

use crate::viz::SurfaceId;

/// Work the playback engine schedules.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Tick {
    /// Copy the handle's position into the store.
    Position,
    /// Render the next frame of a visualizer surface.
    Frame(SurfaceId),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickId(u64);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Stop,
}

#[derive(Debug)]
pub struct Scheduler<T> {
    next_id: u64,
    active: BTreeMap<TickId, T>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            active: BTreeMap::new(),
        }
    }
}

impl<T: Copy> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `task` to run on every tick from the next one on.
    pub fn subscribe(&mut self, task: T) -> TickId {
        let id = TickId(self.next_id);
        self.next_id += 1;
        self.active.insert(id, task);
        id
    }

    /// Deregister a subscription. Returns false if it was not active.
    pub fn cancel(&mut self, id: TickId) -> bool {
        self.active.remove(&id).is_some()
    }

    #[cfg(test)]
    pub fn is_active(&self, id: TickId) -> bool {
        self.active.contains_key(&id)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Run one tick. Subscriptions registered before the tick run in
    /// registration order; those answering `Stop` are dropped.
    pub fn run_tick(&mut self, mut run: impl FnMut(TickId, T) -> TickControl) {
        let due: Vec<(TickId, T)> = self.active.iter().map(|(id, task)| (*id, *task)).collect();
        for (id, task) in due {
            if !self.active.contains_key(&id) {
                continue;
            }
            if run(id, task) == TickControl::Stop {
                self.active.remove(&id);
            }
        }
    }
}
