//! View module - UI rendering
//!
//! This module handles all UI rendering for the application using ratatui.
//! It is organized into submodules by component type:
//!
//! - `utils`: Shared utility functions (palette, formatting)
//! - `layout`: Top bar (title, view tabs, status badges)
//! - `library`: Track catalog listing
//! - `queue`: Play queue listing
//! - `chat`: AI DJ transcript and input
//! - `progress`: Mini-player bar
//! - `player`: Full-screen player overlay
//! - `overlays`: Modal overlays (error, help)

mod chat;
mod layout;
mod library;
mod overlays;
mod player;
mod progress;
mod queue;
mod utils;

use std::collections::HashMap;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::model::{ActiveView, ChatMessage, Track, UiState};
use crate::player::PlaybackSnapshot;

use utils::Palette;

pub struct AppView;

impl AppView {
    pub fn render(
        frame: &mut Frame,
        catalog: &[Track],
        playback: &PlaybackSnapshot,
        ui_state: &UiState,
        chat: &[ChatMessage],
        ratings: &HashMap<String, u8>,
    ) {
        let palette = Palette::for_theme(ui_state.theme);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title + view tabs + status
                Constraint::Min(0),    // Active view
                Constraint::Length(3), // Mini-player bar
            ])
            .split(frame.area());

        layout::render_top_bar(frame, chunks[0], ui_state, &palette);

        match ui_state.active_view {
            ActiveView::Library => library::render_library(
                frame, chunks[1], catalog, playback, ui_state, ratings, &palette,
            ),
            ActiveView::Queue => {
                queue::render_queue(frame, chunks[1], playback, ui_state, &palette)
            }
            ActiveView::AiDj => chat::render_chat(frame, chunks[1], ui_state, chat, &palette),
        }

        progress::render_mini_player(frame, chunks[2], playback, &palette);

        // Full player covers everything below the top bar
        if ui_state.player_open {
            player::render_full_player(frame, playback, &palette);
        }

        // Error notification overlay (if there's an error)
        if ui_state.error_message.is_some() {
            overlays::render_error_notification(frame, ui_state);
        }

        // Help popup overlay (if open)
        if ui_state.show_help_popup {
            overlays::render_help_popup(frame, &palette);
        }
    }
}
