//! Transport and queue control methods

use crate::model::tracks_from_files;
use crate::model::Track;

use super::AppController;

const VOLUME_STEP: f32 = 0.05;

impl AppController {
    /// Space bar semantics: pause when playing, otherwise resume (or start
    /// the queue from the top if nothing has played yet).
    pub async fn toggle_playback(&self) {
        let snapshot = self.player.snapshot();
        if snapshot.is_playing() {
            self.player.pause();
        } else {
            self.player.play(None);
        }
    }

    pub fn play_track(&self, track: Track) {
        self.player.play(Some(track));
    }

    pub async fn play_selected_library(&self) {
        let selected = {
            let model = self.model.lock().await;
            let index = model.library_selected().await;
            model.track_at(index).await
        };
        if let Some(track) = selected {
            self.play_track(track);
        }
    }

    pub async fn play_selected_queue(&self) {
        let index = self.model.lock().await.queue_selected().await;
        let snapshot = self.player.snapshot();
        if let Some(track) = snapshot.queue.get(index).cloned() {
            self.play_track(track);
        }
    }

    pub fn next_track(&self) {
        self.player.next();
    }

    pub fn previous_track(&self) {
        self.player.prev();
    }

    pub fn seek_by(&self, delta_secs: f64) {
        let snapshot = self.player.snapshot();
        if snapshot.current_track().is_some() {
            self.player.seek(snapshot.position_secs() + delta_secs);
        }
    }

    pub fn toggle_shuffle(&self) {
        self.player.toggle_shuffle();
    }

    pub fn toggle_repeat(&self) {
        self.player.toggle_repeat();
    }

    pub fn volume_up(&self) {
        let snapshot = self.player.snapshot();
        self.player.set_volume(snapshot.volume + VOLUME_STEP);
    }

    pub fn volume_down(&self) {
        let snapshot = self.player.snapshot();
        self.player.set_volume(snapshot.volume - VOLUME_STEP);
    }

    /// Swaps the selected queue entry with its neighbor and follows it with
    /// the selection. The edit itself runs inside the engine so it cannot
    /// lose a queue change (an import's append, say) that lands after this
    /// snapshot.
    pub async fn queue_move_selected(&self, up: bool) {
        let index = self.model.lock().await.queue_selected().await;
        let len = self.player.snapshot().queue.len();
        let target = if up {
            index.checked_sub(1)
        } else {
            (index + 1 < len).then_some(index + 1)
        };
        let Some(target) = target else {
            return;
        };
        if index >= len {
            return;
        }
        self.player.move_queue_item(index, target);
        self.model.lock().await.set_queue_selected(target).await;
    }

    pub async fn queue_remove_selected(&self) {
        let index = self.model.lock().await.queue_selected().await;
        let len = self.player.snapshot().queue.len();
        if index >= len {
            return;
        }
        self.player.remove_queue_item(index);
        self.model
            .lock()
            .await
            .clamp_queue_selection(len - 1)
            .await;
    }

    pub async fn rate_selected(&self, rating: u8) {
        let model = self.model.lock().await;
        let index = model.library_selected().await;
        if let Some(track) = model.track_at(index).await {
            model.set_rating(&track.id, rating).await;
        }
    }

    /// Opens the native file picker and appends the chosen files to both the
    /// catalog and the play queue.
    pub async fn import_music(&self) {
        let picked = rfd::AsyncFileDialog::new()
            .add_filter("audio", &["mp3", "flac", "wav", "ogg", "m4a"])
            .set_title("Import music")
            .pick_files()
            .await;

        let Some(handles) = picked else {
            return;
        };
        let paths: Vec<_> = handles.iter().map(|h| h.path().to_path_buf()).collect();
        let tracks = tracks_from_files(&paths);
        if tracks.is_empty() {
            return;
        }
        tracing::info!(count = tracks.len(), "Imported local files");

        self.model.lock().await.append_catalog(tracks.clone()).await;
        self.player.append(tracks);
    }

    pub fn shutdown_player(&self) {
        self.player.shutdown();
    }
}
