//! Track catalog listing

use std::collections::HashMap;

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Padding},
    Frame,
};

use crate::model::{Track, UiState};
use crate::player::PlaybackSnapshot;

use super::utils::{format_duration, stars, truncate_string, Palette};

pub fn render_library(
    frame: &mut Frame,
    area: Rect,
    catalog: &[Track],
    playback: &PlaybackSnapshot,
    ui_state: &UiState,
    ratings: &HashMap<String, u8>,
    palette: &Palette,
) {
    let playing_id = playback.current_track().map(|t| t.id.as_str());
    let content_width = area.width.saturating_sub(4) as usize;
    let title_width = (content_width * 35 / 100).max(12);
    let artist_width = (content_width * 25 / 100).max(10);

    let items: Vec<ListItem> = catalog
        .iter()
        .enumerate()
        .map(|(i, track)| {
            let marker = if playing_id == Some(track.id.as_str()) {
                "♪"
            } else {
                " "
            };
            let rating = stars(ratings.get(&track.id).copied());
            let text = format!(
                " {} {} {} {} {:>6}",
                marker,
                truncate_string(&track.title, title_width),
                truncate_string(&track.artist, artist_width),
                format!("{} {}", rating, truncate_string(track.genre.as_deref().unwrap_or(""), 10)),
                format_duration(track.duration_secs),
            );

            let style = if i == ui_state.library_selected {
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
            .title(" Library (Enter play, 1-5 rate, i import) ")
            .border_style(Style::default().fg(palette.dim))
            .padding(Padding::horizontal(1)),
    );

    let mut list_state = ListState::default();
    list_state.select(Some(ui_state.library_selected));

    frame.render_stateful_widget(list, area, &mut list_state);
}
