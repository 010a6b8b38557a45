//! Full-screen player overlay

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Gauge, Padding, Paragraph, Wrap},
    Frame,
};

use crate::player::PlaybackSnapshot;

use super::utils::{format_duration, Palette};

pub fn render_full_player(frame: &mut Frame, playback: &PlaybackSnapshot, palette: &Palette) {
    let area = frame.area();
    let popup_width = area.width.saturating_sub(8).max(40);
    let popup_height = area.height.saturating_sub(4).max(12);
    let popup_area = Rect {
        x: area.width.saturating_sub(popup_width) / 2,
        y: area.height.saturating_sub(popup_height) / 2,
        width: popup_width,
        height: popup_height,
    };

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Now Playing (Esc to close) ")
        .title_style(
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        )
        .border_style(Style::default().fg(palette.accent))
        .style(Style::default().bg(palette.bg))
        .padding(Padding::uniform(1));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let Some(track) = playback.current_track() else {
        let empty = Paragraph::new("Nothing is loaded. Pick a track from the library.")
            .style(Style::default().fg(palette.dim));
        frame.render_widget(empty, inner);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title, artist, genre
            Constraint::Min(0),    // Lyrics
            Constraint::Length(3), // Progress
            Constraint::Length(1), // Hints
        ])
        .split(inner);

    let mut info_lines = vec![
        Line::styled(
            track.title.clone(),
            Style::default()
                .fg(palette.fg)
                .add_modifier(Modifier::BOLD),
        ),
        Line::styled(track.artist.clone(), Style::default().fg(palette.fg)),
    ];
    if let Some(genre) = &track.genre {
        info_lines.push(Line::styled(
            genre.clone(),
            Style::default().fg(palette.dim),
        ));
    }
    frame.render_widget(Paragraph::new(info_lines), chunks[0]);

    let lyrics = match &track.lyrics {
        Some(text) => Paragraph::new(text.as_str())
            .style(Style::default().fg(palette.fg))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Lyrics ")
                    .border_style(Style::default().fg(palette.dim)),
            ),
        None => Paragraph::new("No lyrics for this track.")
            .style(Style::default().fg(palette.dim))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(palette.dim)),
            ),
    };
    frame.render_widget(lyrics, chunks[1]);

    let progress_ratio = if playback.duration_secs() > 0.0 {
        (playback.position_secs() / playback.duration_secs()).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let time_str = format!(
        "{} / {}",
        format_duration(playback.position_secs()),
        format_duration(playback.duration_secs())
    );
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(palette.accent))
        .ratio(progress_ratio)
        .label(time_str);
    frame.render_widget(gauge, chunks[2]);

    let state = if playback.is_playing() { "▶" } else { "⏸" };
    let hints = Paragraph::new(format!(
        "{}  Space play/pause | n/p skip | ←→ seek | s shuffle | r repeat | +/- volume",
        state
    ))
    .style(Style::default().fg(palette.dim));
    frame.render_widget(hints, chunks[3]);
}
