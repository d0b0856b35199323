use super::frames::{Frame, Visualizer};
use super::render::{Viewport, rasterize};

/// A mounted visualization: its sampler, the area it draws into and the
/// last frame it drew.
#[derive(Debug)]
pub struct Surface {
    visualizer: Visualizer,
    viewport: Viewport,
    visible: bool,
    last: Frame,
    rows: Vec<String>,
    frames_rendered: u64,
}

impl Surface {
    pub(crate) fn new(visualizer: Visualizer, viewport: Viewport, idle: Frame) -> Self {
        let rows = rasterize(&idle, viewport);
        Self {
            visualizer,
            viewport,
            visible: true,
            last: idle,
            rows,
            frames_rendered: 0,
        }
    }

    /// Sample and draw the next frame. Hidden surfaces skip sampling.
    pub(crate) fn advance(&mut self, active: bool) {
        if !self.visible {
            return;
        }
        let Some(frame) = self.visualizer.frames(|| active).next() else {
            return;
        };
        self.rows = rasterize(&frame, self.viewport);
        self.last = frame;
        self.frames_rendered += 1;
    }

    /// Redraw the last frame at new dimensions.
    pub(crate) fn resize(&mut self, viewport: Viewport) {
        if viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        self.rows = rasterize(&self.last, viewport);
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn frame(&self) -> &Frame {
        &self.last
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }
}
