//! Play queue listing

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Padding},
    Frame,
};

use crate::model::UiState;
use crate::player::PlaybackSnapshot;

use super::utils::{format_duration, truncate_string, Palette};

pub fn render_queue(
    frame: &mut Frame,
    area: Rect,
    playback: &PlaybackSnapshot,
    ui_state: &UiState,
    palette: &Palette,
) {
    let playing_id = playback.current_track().map(|t| t.id.as_str());
    let content_width = area.width.saturating_sub(4) as usize;
    let title_width = (content_width * 45 / 100).max(12);
    let artist_width = (content_width * 30 / 100).max(10);

    let items: Vec<ListItem> = playback
        .queue
        .iter()
        .enumerate()
        .map(|(i, track)| {
            let marker = if playing_id == Some(track.id.as_str()) {
                "♪"
            } else {
                " "
            };
            let text = format!(
                " {:>3}. {} {} {} {:>6}",
                i + 1,
                marker,
                truncate_string(&track.title, title_width),
                truncate_string(&track.artist, artist_width),
                format_duration(track.duration_secs),
            );

            let style = if i == ui_state.queue_selected {
                Style::default()
                    .fg(palette.highlight_fg)
                    .bg(palette.highlight_bg)
                    .add_modifier(Modifier::BOLD)
            } else if playing_id == Some(track.id.as_str()) {
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(palette.fg)
            };
            ListItem::new(text).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Queue (Shift+↑↓ move, Del remove, Enter play) ")
            .border_style(Style::default().fg(palette.dim))
            .padding(Padding::horizontal(1)),
    );

    let mut list_state = ListState::default();
    if !playback.queue.is_empty() {
        list_state.select(Some(ui_state.queue_selected.min(playback.queue.len() - 1)));
    }

    frame.render_stateful_widget(list, area, &mut list_state);
}
