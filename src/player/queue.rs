//! Queue selection helpers.
//!
//! Pure functions over the queue slice: no hidden cursor, so wraparound can
//! be checked in isolation from the store.

use crate::library::Track;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Position of the track with `id` in `queue`.
pub fn index_of(queue: &[Track], id: &str) -> Option<usize> {
    queue.iter().position(|t| t.id == id)
}

/// The neighbour of `from` in `direction`, wrapping around both ends.
///
/// When `from` is `None` or not in the queue, forward resolves to the first
/// track and backward to the last. Returns `None` only for an empty queue.
pub fn adjacent<'a>(queue: &'a [Track], from: Option<&str>, direction: Direction) -> Option<&'a Track> {
    if queue.is_empty() {
        return None;
    }
    let len = queue.len();

    let pos = from.and_then(|id| index_of(queue, id));
    let next = match (pos, direction) {
        (Some(p), Direction::Forward) => (p + 1) % len,
        (Some(p), Direction::Backward) => (p + len - 1) % len,
        (None, Direction::Forward) => 0,
        (None, Direction::Backward) => len - 1,
    };
    queue.get(next)
}
