//! AI DJ conversation flow

use crate::model::ChatRole;

use super::AppController;

impl AppController {
    /// Sends the current input box content to the AI DJ.
    ///
    /// Single-flight: while a request is pending the input is locked and
    /// further sends are ignored, so the transcript stays strictly
    /// request/response ordered.
    pub async fn send_mood(&self) {
        let (mood, dj, catalog) = {
            let model = self.model.lock().await;
            if model.is_dj_pending().await || !model.is_online().await {
                return;
            }
            let mood = model.take_chat_input().await;
            if mood.is_empty() {
                return;
            }
            model.push_chat(ChatRole::User, mood.clone(), vec![]).await;
            model.set_dj_pending(true).await;
            (mood, model.dj_client(), model.catalog_tracks().await)
        };

        let model = self.model.clone();
        tokio::spawn(async move {
            let recommendation = dj.recommend(&mood, &catalog).await;
            let model = model.lock().await;
            model.push_recommendation(recommendation).await;
            model.set_dj_pending(false).await;
        });
    }

    /// Plays the nth track of the most recent recommendation.
    pub async fn play_recommended(&self, index: usize) {
        let track = self.model.lock().await.latest_recommendation(index).await;
        if let Some(track) = track {
            self.play_track(track);
        }
    }
}
