//! Central application model
//!
//! Everything the views render and the controller mutates lives here behind
//! async accessors. Playback state is the one exception: the engine owns it
//! and publishes snapshots separately.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Local;
use tokio::sync::Mutex;

use super::catalog::{Catalog, Track};
use super::dj::{DjClient, Recommendation};
use super::ratings::RatingStore;
use super::store::KvStore;
use super::types::{ChatMessage, ChatRole, Theme, UiState};

const THEME_KEY: &str = "theme";
const ERROR_DISPLAY_SECS: u64 = 5;

pub struct AppModel {
    dj: DjClient,
    catalog: Arc<Mutex<Catalog>>,
    ratings: RatingStore,
    store: Arc<dyn KvStore>,
    ui_state: Arc<Mutex<UiState>>,
    chat: Arc<Mutex<Vec<ChatMessage>>>,
    next_message_id: Arc<Mutex<u64>>,
    should_quit: Arc<Mutex<bool>>,
}

impl AppModel {
    pub fn new(store: Arc<dyn KvStore>, dj: DjClient) -> Self {
        let mut ui_state = UiState::default();
        if let Some(theme) = store.get(THEME_KEY).and_then(|raw| Theme::parse(&raw)) {
            ui_state.theme = theme;
        }

        let greeting = ChatMessage {
            id: 0,
            role: ChatRole::Assistant,
            text: "Hey! Tell me your mood and I'll line up some tracks for you.".to_string(),
            recommended: Vec::new(),
            sent_at: Local::now(),
        };

        Self {
            dj,
            catalog: Arc::new(Mutex::new(Catalog::with_sample_tracks())),
            ratings: RatingStore::load(store.clone()),
            store,
            ui_state: Arc::new(Mutex::new(ui_state)),
            chat: Arc::new(Mutex::new(vec![greeting])),
            next_message_id: Arc::new(Mutex::new(1)),
            should_quit: Arc::new(Mutex::new(false)),
        }
    }

    pub fn dj_client(&self) -> DjClient {
        self.dj.clone()
    }

    // -- catalog --------------------------------------------------------

    pub async fn catalog_tracks(&self) -> Vec<Track> {
        self.catalog.lock().await.tracks().to_vec()
    }

    pub async fn catalog_len(&self) -> usize {
        self.catalog.lock().await.len()
    }

    pub async fn track_at(&self, index: usize) -> Option<Track> {
        self.catalog.lock().await.tracks().get(index).cloned()
    }

    pub async fn append_catalog(&self, tracks: Vec<Track>) {
        self.catalog.lock().await.append(tracks);
    }

    // -- ratings --------------------------------------------------------

    pub async fn rating_snapshot(&self) -> HashMap<String, u8> {
        self.ratings.snapshot().await
    }

    /// Ratings only attach to tracks the catalog knows about.
    pub async fn set_rating(&self, track_id: &str, rating: u8) {
        if self.catalog.lock().await.get(track_id).is_none() {
            tracing::warn!(track_id, "Ignoring rating for unknown track");
            return;
        }
        self.ratings.set(track_id, rating).await;
    }

    // -- ui state -------------------------------------------------------

    pub async fn get_ui_state(&self) -> UiState {
        self.ui_state.lock().await.clone()
    }

    pub async fn cycle_view_forward(&self) {
        let mut ui = self.ui_state.lock().await;
        ui.active_view = ui.active_view.next();
    }

    pub async fn cycle_view_backward(&self) {
        let mut ui = self.ui_state.lock().await;
        ui.active_view = ui.active_view.prev();
    }

    pub async fn open_player(&self) {
        self.ui_state.lock().await.player_open = true;
    }

    pub async fn close_player(&self) {
        self.ui_state.lock().await.player_open = false;
    }

    pub async fn is_player_open(&self) -> bool {
        self.ui_state.lock().await.player_open
    }

    pub async fn library_move_up(&self) {
        let mut ui = self.ui_state.lock().await;
        ui.library_selected = ui.library_selected.saturating_sub(1);
    }

    pub async fn library_move_down(&self) {
        let catalog = self.catalog.lock().await;
        if catalog.is_empty() {
            return;
        }
        let last = catalog.len() - 1;
        drop(catalog);
        let mut ui = self.ui_state.lock().await;
        if ui.library_selected < last {
            ui.library_selected += 1;
        }
    }

    pub async fn library_selected(&self) -> usize {
        self.ui_state.lock().await.library_selected
    }

    pub async fn queue_move_up(&self) {
        let mut ui = self.ui_state.lock().await;
        ui.queue_selected = ui.queue_selected.saturating_sub(1);
    }

    pub async fn queue_move_down(&self, queue_len: usize) {
        let mut ui = self.ui_state.lock().await;
        if queue_len > 0 && ui.queue_selected < queue_len - 1 {
            ui.queue_selected += 1;
        }
    }

    pub async fn queue_selected(&self) -> usize {
        self.ui_state.lock().await.queue_selected
    }

    pub async fn set_queue_selected(&self, index: usize) {
        self.ui_state.lock().await.queue_selected = index;
    }

    /// Keeps the selection inside the queue after removals.
    pub async fn clamp_queue_selection(&self, queue_len: usize) {
        let mut ui = self.ui_state.lock().await;
        if queue_len == 0 {
            ui.queue_selected = 0;
        } else if ui.queue_selected >= queue_len {
            ui.queue_selected = queue_len - 1;
        }
    }

    pub async fn chat_input_push(&self, c: char) {
        self.ui_state.lock().await.chat_input.push(c);
    }

    pub async fn chat_input_backspace(&self) {
        self.ui_state.lock().await.chat_input.pop();
    }

    pub async fn chat_input_clear(&self) {
        self.ui_state.lock().await.chat_input.clear();
    }

    /// Clears the input box and returns its trimmed content.
    pub async fn take_chat_input(&self) -> String {
        let mut ui = self.ui_state.lock().await;
        let text = ui.chat_input.trim().to_string();
        ui.chat_input.clear();
        text
    }

    pub async fn is_dj_pending(&self) -> bool {
        self.ui_state.lock().await.dj_pending
    }

    pub async fn set_dj_pending(&self, pending: bool) {
        self.ui_state.lock().await.dj_pending = pending;
    }

    pub async fn is_online(&self) -> bool {
        self.ui_state.lock().await.is_online
    }

    pub async fn set_online(&self, online: bool) {
        let mut ui = self.ui_state.lock().await;
        if ui.is_online != online {
            tracing::info!(online, "Connectivity changed");
        }
        ui.is_online = online;
    }

    pub async fn toggle_theme(&self) {
        let mut ui = self.ui_state.lock().await;
        ui.theme = ui.theme.toggled();
        self.store.set(THEME_KEY, ui.theme.as_str());
    }

    // -- errors and overlays ----------------------------------------------

    pub async fn set_error(&self, message: String) {
        tracing::error!(message, "Displaying error to the user");
        let mut ui = self.ui_state.lock().await;
        ui.error_message = Some(message);
        ui.error_timestamp = Some(Instant::now());
    }

    pub async fn clear_error(&self) {
        let mut ui = self.ui_state.lock().await;
        ui.error_message = None;
        ui.error_timestamp = None;
    }

    pub async fn has_error(&self) -> bool {
        self.ui_state.lock().await.error_message.is_some()
    }

    pub async fn auto_clear_old_errors(&self) {
        let mut ui = self.ui_state.lock().await;
        if let Some(at) = ui.error_timestamp {
            if at.elapsed() > Duration::from_secs(ERROR_DISPLAY_SECS) {
                ui.error_message = None;
                ui.error_timestamp = None;
            }
        }
    }

    pub async fn show_help(&self) {
        self.ui_state.lock().await.show_help_popup = true;
    }

    pub async fn hide_help(&self) {
        self.ui_state.lock().await.show_help_popup = false;
    }

    pub async fn is_help_open(&self) -> bool {
        self.ui_state.lock().await.show_help_popup
    }

    pub async fn should_quit(&self) -> bool {
        *self.should_quit.lock().await
    }

    pub async fn set_should_quit(&self) {
        *self.should_quit.lock().await = true;
    }

    // -- chat -------------------------------------------------------------

    pub async fn push_chat(&self, role: ChatRole, text: String, recommended: Vec<Track>) {
        let id = {
            let mut next = self.next_message_id.lock().await;
            let id = *next;
            *next += 1;
            id
        };
        self.chat.lock().await.push(ChatMessage {
            id,
            role,
            text,
            recommended,
            sent_at: Local::now(),
        });
    }

    pub async fn push_recommendation(&self, rec: Recommendation) {
        self.push_chat(ChatRole::Assistant, rec.text, rec.tracks).await;
    }

    pub async fn chat_snapshot(&self) -> Vec<ChatMessage> {
        self.chat.lock().await.clone()
    }

    /// Nth track of the most recent assistant recommendation, if any.
    pub async fn latest_recommendation(&self, index: usize) -> Option<Track> {
        let chat = self.chat.lock().await;
        chat.iter()
            .rev()
            .find(|m| m.role == ChatRole::Assistant && !m.recommended.is_empty())
            .and_then(|m| m.recommended.get(index).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::store::FileKvStore;
    use crate::model::ActiveView;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn model() -> AppModel {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        let dir: PathBuf = std::env::temp_dir().join(format!("moodplay-model-{nanos}"));
        AppModel::new(Arc::new(FileKvStore::open(dir)), DjClient::new(None))
    }

    #[tokio::test]
    async fn view_cycling_wraps_both_ways() {
        let model = model();
        assert_eq!(model.get_ui_state().await.active_view, ActiveView::Library);
        model.cycle_view_forward().await;
        assert_eq!(model.get_ui_state().await.active_view, ActiveView::Queue);
        model.cycle_view_backward().await;
        model.cycle_view_backward().await;
        assert_eq!(model.get_ui_state().await.active_view, ActiveView::AiDj);
    }

    #[tokio::test]
    async fn library_selection_is_clamped_to_the_catalog() {
        let model = model();
        model.library_move_up().await;
        assert_eq!(model.library_selected().await, 0);
        for _ in 0..20 {
            model.library_move_down().await;
        }
        assert_eq!(model.library_selected().await, model.catalog_len().await - 1);
    }

    #[tokio::test]
    async fn ratings_attach_only_to_known_tracks() {
        let model = model();
        model.set_rating("9", 4).await;
        assert!(!model.rating_snapshot().await.contains_key("9"));

        model.set_rating("1", 4).await;
        assert_eq!(model.rating_snapshot().await.get("1"), Some(&4));
    }

    #[tokio::test]
    async fn take_chat_input_trims_and_clears() {
        let model = model();
        for c in "  chill vibes  ".chars() {
            model.chat_input_push(c).await;
        }
        assert_eq!(model.take_chat_input().await, "chill vibes");
        assert!(model.get_ui_state().await.chat_input.is_empty());
    }

    #[tokio::test]
    async fn latest_recommendation_skips_plain_messages() {
        let model = model();
        let tracks = model.catalog_tracks().await;
        model
            .push_chat(ChatRole::Assistant, "old".to_string(), vec![tracks[0].clone()])
            .await;
        model
            .push_chat(ChatRole::User, "more please".to_string(), vec![])
            .await;
        let found = model.latest_recommendation(0).await;
        assert_eq!(found.map(|t| t.id), Some(tracks[0].id.clone()));
        assert!(model.latest_recommendation(5).await.is_none());
    }

    #[tokio::test]
    async fn theme_toggle_persists_across_models() {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        let dir: PathBuf = std::env::temp_dir().join(format!("moodplay-theme-{nanos}"));
        let store = Arc::new(FileKvStore::open(dir));

        let model = AppModel::new(store.clone(), DjClient::new(None));
        assert_eq!(model.get_ui_state().await.theme, Theme::Dark);
        model.toggle_theme().await;

        let reopened = AppModel::new(store, DjClient::new(None));
        assert_eq!(reopened.get_ui_state().await.theme, Theme::Light);
    }

    #[tokio::test]
    async fn errors_clear_after_the_display_window() {
        let model = model();
        model.set_error("something broke".to_string()).await;
        assert!(model.has_error().await);
        model.auto_clear_old_errors().await;
        assert!(model.has_error().await);
        model.clear_error().await;
        assert!(!model.has_error().await);
    }
}
