//! Application model types: `App` and `View`.
//!
//! The `App` struct holds the view-side state of the terminal host: which
//! view is shown, the library cursor and the player bar mode. Playback
//! state itself lives in the engine and is only read from here.

use crate::audio::{AnalysisTarget, MediaHandle};
use crate::player::PlaybackEngine;
use crate::viz::SurfaceId;

/// Player bar height in rows, borders included.
const PLAYER_BAR_FULL: u16 = 5;
const PLAYER_BAR_MINIMIZED: u16 = 1;

/// Default size for a freshly mounted visualizer; the first draw resizes it.
const INITIAL_SURFACE: (u16, u16) = (48, 8);

/// The views the host can navigate between.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Library,
    NowPlaying,
    Visualizer,
}

impl View {
    pub fn next(self) -> Self {
        match self {
            Self::Library => Self::NowPlaying,
            Self::NowPlaying => Self::Visualizer,
            Self::Visualizer => Self::Library,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Library => Self::Visualizer,
            Self::NowPlaying => Self::Library,
            Self::Visualizer => Self::NowPlaying,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Library => " library ",
            Self::NowPlaying => " now playing ",
            Self::Visualizer => " visualizer ",
        }
    }
}

/// The main application model.
#[derive(Debug)]
pub struct App {
    pub view: View,
    /// Cursor into the engine's queue.
    pub selected: usize,
    /// Cursor jumps to the playing track whenever it changes.
    pub follow_playback: bool,
    /// Collapsed player bar. The bar height is derived from this flag only.
    pub minimized: bool,
    /// Where the library came from (directory or catalog file).
    pub source: Option<String>,
    visualizer: Option<SurfaceId>,
    last_followed: Option<String>,
}

impl App {
    pub fn new(minimized: bool) -> Self {
        Self {
            view: View::Library,
            selected: 0,
            follow_playback: true,
            minimized,
            source: None,
            visualizer: None,
            last_followed: None,
        }
    }

    pub fn set_source(&mut self, source: String) {
        self.source = Some(source);
    }

    pub fn toggle_minimized(&mut self) {
        self.minimized = !self.minimized;
    }

    pub fn player_bar_height(&self) -> u16 {
        if self.minimized {
            PLAYER_BAR_MINIMIZED
        } else {
            PLAYER_BAR_FULL
        }
    }

    /// The surface mounted for the visualizer view, if that view is shown.
    pub fn visualizer(&self) -> Option<SurfaceId> {
        self.visualizer
    }

    /// Switch to `view`. Entering the visualizer mounts a surface; leaving
    /// it unmounts the surface. The engine and its audio are untouched.
    pub fn navigate<H>(&mut self, view: View, engine: &mut PlaybackEngine<H>)
    where
        H: MediaHandle + AnalysisTarget,
    {
        if view == self.view {
            return;
        }
        if let Some(id) = self.visualizer.take() {
            engine.unmount_visualizer(id);
        }
        if view == View::Visualizer {
            let (w, h) = INITIAL_SURFACE;
            self.visualizer = Some(engine.mount_visualizer(w, h));
        }
        self.view = view;
    }

    /// Move the cursor down, wrapping to the top.
    pub fn next(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1) % len;
    }

    /// Move the cursor up, wrapping to the bottom.
    pub fn prev(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
            return;
        }
        self.selected = match self.selected {
            0 => len - 1,
            i if i >= len => len - 1,
            i => i - 1,
        };
    }

    pub fn follow_playback_on(&mut self) {
        self.follow_playback = true;
    }

    pub fn follow_playback_off(&mut self) {
        self.follow_playback = false;
    }

    /// Put the cursor on the current track when it changed since the last
    /// call and following is enabled.
    pub fn follow<H>(&mut self, engine: &PlaybackEngine<H>)
    where
        H: MediaHandle + AnalysisTarget,
    {
        let state = engine.state();
        if state.current_track_id == self.last_followed {
            return;
        }
        self.last_followed = state.current_track_id.clone();
        if !self.follow_playback {
            return;
        }
        let index = state
            .current_track_id
            .as_deref()
            .and_then(|id| crate::player::index_of(&state.queue, id));
        if let Some(i) = index {
            self.selected = i;
        }
    }
}
