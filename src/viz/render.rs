//! Rasterizing frames into text rows for the terminal.

use super::frames::Frame;

const FULL: char = '█';

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Height of each bar in rows. Every bar keeps at least one row so the
/// baseline stays visible.
pub fn bar_heights(frame: &Frame, height: u16) -> Vec<u16> {
    if height == 0 {
        return vec![0; frame.bars.len()];
    }
    frame
        .bars
        .iter()
        .map(|m| ((m.clamp(0.0, 1.0) * f32::from(height)).round() as u16).clamp(1, height))
        .collect()
}

/// Draw `frame` into `viewport.height` rows of `viewport.width` cells, top
/// row first. Bars are stretched (or sampled) across the full width.
pub fn rasterize(frame: &Frame, viewport: Viewport) -> Vec<String> {
    let Viewport { width, height } = viewport;
    if width == 0 || height == 0 || frame.bars.is_empty() {
        return Vec::new();
    }

    let heights = bar_heights(frame, height);
    let bars = heights.len();
    let columns: Vec<u16> = (0..usize::from(width))
        .map(|x| heights[x * bars / usize::from(width)])
        .collect();

    (0..height)
        .map(|row| {
            let level = height - row;
            columns
                .iter()
                .map(|&h| if h >= level { FULL } else { ' ' })
                .collect()
        })
        .collect()
}
