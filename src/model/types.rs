//! Core type definitions for the application

use std::time::Instant;

use chrono::{DateTime, Local};

use super::catalog::Track;

/// Which view fills the main area
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveView {
    Library,
    Queue,
    AiDj,
}

impl ActiveView {
    pub fn next(self) -> Self {
        match self {
            ActiveView::Library => ActiveView::Queue,
            ActiveView::Queue => ActiveView::AiDj,
            ActiveView::AiDj => ActiveView::Library,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ActiveView::Library => ActiveView::AiDj,
            ActiveView::Queue => ActiveView::Library,
            ActiveView::AiDj => ActiveView::Queue,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ActiveView::Library => "Library",
            ActiveView::Queue => "Queue",
            ActiveView::AiDj => "AI DJ",
        }
    }
}

/// Color scheme, persisted under the `theme` key as "dark"/"light"
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            _ => None,
        }
    }
}

/// Who authored a chat message
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

/// One entry in the AI DJ transcript. Append-only within a session.
#[derive(Clone, Debug)]
pub struct ChatMessage {
    pub id: u64,
    pub role: ChatRole,
    pub text: String,
    pub recommended: Vec<Track>,
    pub sent_at: DateTime<Local>,
}

/// UI state for the application
#[derive(Clone)]
pub struct UiState {
    pub active_view: ActiveView,
    pub theme: Theme,
    pub player_open: bool,
    pub library_selected: usize,
    pub queue_selected: usize,
    pub chat_input: String,
    pub dj_pending: bool,
    pub is_online: bool,
    pub error_message: Option<String>,
    pub error_timestamp: Option<Instant>,
    pub show_help_popup: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            active_view: ActiveView::Library,
            theme: Theme::Dark,
            player_open: false,
            library_selected: 0,
            queue_selected: 0,
            chat_input: String::new(),
            dj_pending: false,
            is_online: false,
            error_message: None,
            error_timestamp: None,
            show_help_popup: false,
        }
    }
}
