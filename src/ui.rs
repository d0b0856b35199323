//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, LineGauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock, time::Duration};

use crate::app::{App, View};
use crate::audio::{AnalysisTarget, MediaHandle};
use crate::config::Settings;
use crate::player::PlaybackEngine;

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("tab", "switch view");
    map.insert("j/k", "up/down");
    map.insert("enter", "play selected song");
    map.insert("space/p", "play/pause");
    map.insert("h/l", "prev/next song");
    // H/L is filled dynamically from config.
    map.insert("m", "minimize");
    map.insert("q", "quit");
    map
});

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    // Keep the rendered order stable and human-friendly.
    let order = ["tab", "j/k", "h/l", "H/L", "enter", "space/p", "m", "q"];
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] scrub -/+{}s", scrub_seconds))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn progress_ratio(position: Duration, total: Duration) -> f64 {
    if total.is_zero() {
        return 0.0;
    }
    (position.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0)
}

fn state_glyph<H: MediaHandle + AnalysisTarget>(engine: &PlaybackEngine<H>) -> &'static str {
    if engine.is_loading() {
        "…"
    } else if engine.state().is_playing {
        "▶"
    } else {
        "⏸"
    }
}

/// Render the entire UI. Takes the engine mutably so the visualizer surface
/// can follow the size of the area it is drawn into.
pub fn draw<H>(frame: &mut Frame, app: &App, engine: &mut PlaybackEngine<H>, settings: &Settings)
where
    H: MediaHandle + AnalysisTarget,
{
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(app.player_bar_height()),
        ])
        .split(frame.area());

    let header = Paragraph::new(settings.ui.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" encore ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    match app.view {
        View::Library => draw_library(frame, app, engine, chunks[1]),
        View::NowPlaying => draw_now_playing(frame, engine, chunks[1]),
        View::Visualizer => draw_visualizer(frame, app, engine, chunks[1]),
    }

    if app.minimized {
        draw_player_line(frame, engine, chunks[2]);
    } else {
        draw_player_bar(frame, engine, settings, chunks[2]);
    }
}

fn draw_library<H>(frame: &mut Frame, app: &App, engine: &PlaybackEngine<H>, area: Rect)
where
    H: MediaHandle + AnalysisTarget,
{
    let state = engine.state();
    let current = state.current_track_id.as_deref();

    // Center the selected item when possible by creating a visible window.
    // Only build ListItems for the visible window.
    let total = state.queue.len();
    let list_height = area.height.saturating_sub(2) as usize;
    let sel_pos = app.selected.min(total.saturating_sub(1));
    let (start, end, selected_pos_in_visible) = if total <= list_height || list_height == 0 {
        (0, total, sel_pos)
    } else {
        let half = list_height / 2;
        let mut start = sel_pos.saturating_sub(half);
        if start + list_height > total {
            start = total - list_height;
        }
        (start, start + list_height, sel_pos - start)
    };

    let items: Vec<ListItem> = state.queue[start..end]
        .iter()
        .map(|track| {
            let marker = if Some(track.id.as_str()) == current {
                "♪ "
            } else {
                "  "
            };
            ListItem::new(format!(
                "{marker}{}  [{}]",
                track.display(),
                format_mmss(track.duration)
            ))
        })
        .collect();

    let title = match &app.source {
        Some(source) => format!(" library: {source} "),
        None => View::Library.title().to_string(),
    };
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut list_state = ListState::default();
    if total > 0 {
        list_state.select(Some(selected_pos_in_visible));
    }
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn draw_now_playing<H>(frame: &mut Frame, engine: &PlaybackEngine<H>, area: Rect)
where
    H: MediaHandle + AnalysisTarget,
{
    let block = Block::bordered()
        .title(View::NowPlaying.title())
        .padding(Padding::horizontal(1));

    let Some(track) = engine.current_track() else {
        frame.render_widget(Paragraph::new("Nothing selected").block(block), area);
        return;
    };

    let state = engine.state();
    let total = engine.duration();
    let mut lines = vec![
        Line::from(format!("Title:  {}", track.title)),
        Line::from(format!("Artist: {}", track.artist.as_deref().unwrap_or("-"))),
        Line::from(format!(
            "BPM:    {}",
            track.bpm.map_or_else(|| "-".to_string(), |b| b.to_string())
        )),
        Line::from(format!("File:   {}", track.path().display())),
        Line::from(""),
        Line::from(format!(
            "{} {} / {}",
            state_glyph(engine),
            format_mmss(state.position),
            format_mmss(total)
        )),
    ];
    if engine.is_loading() {
        lines.push(Line::from("loading…"));
    }

    let inner = block.inner(area);
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );

    if inner.height > 8 {
        let gauge_area = Rect {
            y: inner.y + inner.height - 1,
            height: 1,
            ..inner
        };
        let gauge = LineGauge::default().ratio(progress_ratio(state.position, total));
        frame.render_widget(gauge, gauge_area);
    }
}

fn draw_visualizer<H>(frame: &mut Frame, app: &App, engine: &mut PlaybackEngine<H>, area: Rect)
where
    H: MediaHandle + AnalysisTarget,
{
    let block = Block::bordered();
    let inner = block.inner(area);

    let Some(id) = app.visualizer() else {
        frame.render_widget(block.title(View::Visualizer.title()), area);
        return;
    };
    engine.resize_visualizer(id, inner.width, inner.height);
    let Some(surface) = engine.surface(id) else {
        frame.render_widget(block.title(View::Visualizer.title()), area);
        return;
    };

    let title = if surface.frame().live {
        " visualizer: live "
    } else {
        " visualizer: idle "
    };
    let lines: Vec<Line> = surface.rows().iter().map(|r| Line::from(r.as_str())).collect();
    frame.render_widget(Paragraph::new(lines).block(block.title(title)), area);
}

fn player_line<H>(engine: &PlaybackEngine<H>) -> String
where
    H: MediaHandle + AnalysisTarget,
{
    match engine.current_track() {
        Some(track) => format!(
            "{} {}  {} / {}",
            state_glyph(engine),
            track.display(),
            format_mmss(engine.state().position),
            format_mmss(engine.duration())
        ),
        None => "Stopped".to_string(),
    }
}

fn draw_player_line<H>(frame: &mut Frame, engine: &PlaybackEngine<H>, area: Rect)
where
    H: MediaHandle + AnalysisTarget,
{
    frame.render_widget(Paragraph::new(player_line(engine)), area);
}

fn draw_player_bar<H>(frame: &mut Frame, engine: &PlaybackEngine<H>, settings: &Settings, area: Rect)
where
    H: MediaHandle + AnalysisTarget,
{
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" player ")
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        });
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    frame.render_widget(Paragraph::new(player_line(engine)), rows[0]);
    let gauge = LineGauge::default().ratio(progress_ratio(engine.state().position, engine.duration()));
    frame.render_widget(gauge, rows[1]);
    frame.render_widget(
        Paragraph::new(controls_text(settings.controls.scrub_seconds)),
        rows[2],
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mmss_formats_minutes_and_seconds() {
        assert_eq!(format_mmss(Duration::from_secs(0)), "00:00");
        assert_eq!(format_mmss(Duration::from_secs(241)), "04:01");
    }

    #[test]
    fn progress_ratio_is_bounded() {
        assert_eq!(progress_ratio(Duration::from_secs(5), Duration::ZERO), 0.0);
        assert_eq!(progress_ratio(Duration::from_secs(60), Duration::from_secs(240)), 0.25);
        assert_eq!(progress_ratio(Duration::from_secs(300), Duration::from_secs(240)), 1.0);
    }

    #[test]
    fn controls_text_includes_scrub_step() {
        let text = controls_text(7);
        assert!(text.contains("[H/L] scrub -/+7s"));
        assert!(text.starts_with("[tab] switch view"));
        assert!(text.ends_with("[q] quit"));
    }
}
