use std::env;
use std::path::{Path, PathBuf};

use crossterm::event::{DisableFocusChange, EnableFocusChange};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::App;
use crate::audio::{AnalysisTarget, MediaHandle, RodioHandle};
use crate::config::Settings;
use crate::library::{self, Track};
use crate::player::PlaybackEngine;

mod event_loop;
mod logging;
mod resume;
mod settings;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, config_problem) = settings::load_settings();
    let log_file = logging::init(&settings.logging);
    if let Some(problem) = config_problem {
        warn!(%problem, "using default settings");
    }
    info!(log = ?log_file, "encore starting");

    let location = env::args().nth(1).map(PathBuf::from).unwrap_or_else(|| {
        env::current_dir().unwrap_or_else(|_| PathBuf::from("Music"))
    });
    let tracks = load_tracks(&location, &settings);

    let handle = RodioHandle::open()?;
    let mut engine = PlaybackEngine::new(handle, &settings.audio, &settings.visualizer);
    engine.set_queue(tracks);

    let mut app = App::new(settings.ui.start_minimized);
    app.set_source(location.display().to_string());

    let resume_path = resume::default_path();
    apply_startup_playback(&mut engine, &settings, resume_path.as_deref());

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &settings, &mut app, &mut engine);

    if let Some(path) = &resume_path {
        let current = engine.state().current_track_id.as_deref();
        if let Err(e) = resume::save(path, current) {
            warn!(path = %path.display(), error = %e, "failed to save last played track");
        }
    }
    engine.shutdown();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableFocusChange, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}

/// Build the catalog. A broken catalog leaves the library empty rather
/// than stopping the app.
fn load_tracks(location: &Path, settings: &Settings) -> Vec<Track> {
    match library::load(location, &settings.library) {
        Ok(tracks) => {
            info!(location = %location.display(), tracks = tracks.len(), "catalog loaded");
            tracks
        }
        Err(e) => {
            warn!(location = %location.display(), error = %e, "catalog unavailable");
            Vec::new()
        }
    }
}

/// Autoplay starts the first track; otherwise the last played track is
/// cued (selected and paused) when resuming is enabled.
fn apply_startup_playback<H>(
    engine: &mut PlaybackEngine<H>,
    settings: &Settings,
    resume_path: Option<&Path>,
) where
    H: MediaHandle + AnalysisTarget,
{
    if settings.playback.autoplay {
        engine.next();
        return;
    }
    if !settings.playback.resume_last {
        return;
    }
    let Some(id) = resume_path.and_then(resume::load) else {
        return;
    };
    if engine.play_track(&id) {
        engine.pause();
        info!(track = %id, "resumed last played track");
    }
}
