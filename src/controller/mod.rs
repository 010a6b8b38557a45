//! Controller module - Application logic and event handling
//!
//! The controller routes user input to the model and the playback engine.
//! It is organized into submodules by responsibility:
//!
//! - `input`: Key event handling
//! - `playback`: Transport and queue control methods
//! - `chat`: AI DJ conversation flow

mod chat;
mod input;
mod playback;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::model::AppModel;
use crate::player::PlayerHandle;

const CONNECTIVITY_PROBE_HOST: &str = "generativelanguage.googleapis.com:443";
const CONNECTIVITY_PROBE_INTERVAL: Duration = Duration::from_secs(15);
const CONNECTIVITY_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Clone)]
pub struct AppController {
    pub(crate) model: Arc<Mutex<AppModel>>,
    pub(crate) player: PlayerHandle,
}

impl AppController {
    pub fn new(model: Arc<Mutex<AppModel>>, player: PlayerHandle) -> Self {
        Self { model, player }
    }

    /// Background connectivity probe. The AI DJ input is disabled while
    /// offline, so the probe runs for the whole session and flips the flag
    /// as the network comes and goes.
    pub fn start_connectivity_monitor(&self) {
        let controller = self.clone();
        tokio::spawn(async move {
            loop {
                let online = probe_network().await;
                {
                    let model = controller.model.lock().await;
                    if model.should_quit().await {
                        break;
                    }
                    model.set_online(online).await;
                }
                tokio::time::sleep(CONNECTIVITY_PROBE_INTERVAL).await;
            }
        });
    }
}

async fn probe_network() -> bool {
    let connect = tokio::net::TcpStream::connect(CONNECTIVITY_PROBE_HOST);
    matches!(
        tokio::time::timeout(CONNECTIVITY_PROBE_TIMEOUT, connect).await,
        Ok(Ok(_))
    )
}
