use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::{AnalysisTarget, MediaHandle};
use crate::config;
use crate::player::PlaybackEngine;
use crate::ui;

/// What a key press asks the loop to do next.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Main terminal event loop: one engine tick per iteration, then draw, then
/// wait up to one tick interval for input. Returns `Ok(())` when shutdown
/// is requested.
pub fn run<H>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    engine: &mut PlaybackEngine<H>,
) -> Result<(), Box<dyn std::error::Error>>
where
    H: MediaHandle + AnalysisTarget,
{
    let tick = Duration::from_millis(settings.audio.tick_ms);

    loop {
        engine.tick();
        app.follow(engine);

        terminal.draw(|f| ui::draw(f, app, engine, settings))?;

        if event::poll(tick)? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if handle_key_event(key, settings, app, engine) == Flow::Quit {
                        return Ok(());
                    }
                }
                Event::FocusLost => {
                    if let Some(id) = app.visualizer() {
                        engine.set_surface_visible(id, false);
                    }
                }
                Event::FocusGained => {
                    if let Some(id) = app.visualizer() {
                        engine.set_surface_visible(id, true);
                    }
                }
                _ => {}
            }
        }
    }
}

/// Apply one key press to the app and the engine.
pub fn handle_key_event<H>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    engine: &mut PlaybackEngine<H>,
) -> Flow
where
    H: MediaHandle + AnalysisTarget,
{
    let len = engine.state().queue.len();
    let scrub = settings.controls.scrub_seconds as f64;

    match key.code {
        KeyCode::Char('q') => return Flow::Quit,
        KeyCode::Tab => app.navigate(app.view.next(), engine),
        KeyCode::BackTab => app.navigate(app.view.prev(), engine),
        KeyCode::Char('j') | KeyCode::Down => {
            app.follow_playback_off();
            app.next(len);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.follow_playback_off();
            app.prev(len);
        }
        KeyCode::Enter => {
            let id = engine.state().queue.get(app.selected).map(|t| t.id.clone());
            if let Some(id) = id {
                app.follow_playback_on();
                engine.play_track(&id);
            }
        }
        KeyCode::Char(' ') | KeyCode::Char('p') => engine.toggle(),
        KeyCode::Char('l') => {
            app.follow_playback_on();
            engine.next();
        }
        KeyCode::Char('h') => {
            app.follow_playback_on();
            engine.prev();
        }
        KeyCode::Char('L') => engine.seek_by(scrub),
        KeyCode::Char('H') => engine.seek_by(-scrub),
        KeyCode::Char('m') => app.toggle_minimized(),
        _ => {}
    }
    Flow::Continue
}
