//! Engine task and the handle the rest of the app talks through
//!
//! One tokio task owns the `PlayerCore`. Everything reaches it over a single
//! unbounded channel, so user commands and media-output notifications are
//! applied in the order they were issued. Snapshots go out over a watch
//! channel that views read without ever touching the core.

use tokio::sync::{mpsc, watch};

use crate::model::Track;

use super::core::{PlaybackSnapshot, PlayerCore};
use super::{EngineMessage, MediaOutput, OutputCommand, OutputEvent, PlayerCommand};

/// Cloneable handle to the engine task.
#[derive(Clone)]
pub struct PlayerHandle {
    tx: mpsc::UnboundedSender<EngineMessage>,
    state: watch::Receiver<PlaybackSnapshot>,
}

impl PlayerHandle {
    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.state.borrow().clone()
    }

    pub fn play(&self, track: Option<Track>) {
        self.send(PlayerCommand::Play(track));
    }

    pub fn pause(&self) {
        self.send(PlayerCommand::Pause);
    }

    pub fn seek(&self, secs: f64) {
        self.send(PlayerCommand::Seek(secs));
    }

    pub fn set_volume(&self, volume: f32) {
        self.send(PlayerCommand::SetVolume(volume));
    }

    pub fn next(&self) {
        self.send(PlayerCommand::Next);
    }

    pub fn prev(&self) {
        self.send(PlayerCommand::Prev);
    }

    pub fn toggle_shuffle(&self) {
        self.send(PlayerCommand::ToggleShuffle);
    }

    pub fn toggle_repeat(&self) {
        self.send(PlayerCommand::ToggleRepeat);
    }

    pub fn reorder_queue(&self, queue: Vec<Track>) {
        self.send(PlayerCommand::ReorderQueue(queue));
    }

    pub fn move_queue_item(&self, from: usize, to: usize) {
        self.send(PlayerCommand::MoveQueueItem { from, to });
    }

    pub fn remove_queue_item(&self, index: usize) {
        self.send(PlayerCommand::RemoveQueueItem(index));
    }

    pub fn append(&self, tracks: Vec<Track>) {
        self.send(PlayerCommand::Append(tracks));
    }

    pub fn shutdown(&self) {
        if self.tx.send(EngineMessage::Shutdown).is_err() {
            tracing::debug!("Engine already stopped");
        }
    }

    fn send(&self, command: PlayerCommand) {
        if self.tx.send(EngineMessage::Command(command)).is_err() {
            tracing::warn!("Engine channel closed, command dropped");
        }
    }
}

/// The engine's input channel. Created ahead of `spawn` so the media output
/// can hold the sender before the task exists.
pub fn channel() -> (
    mpsc::UnboundedSender<EngineMessage>,
    mpsc::UnboundedReceiver<EngineMessage>,
) {
    mpsc::unbounded_channel()
}

/// Starts the engine task. Returns its handle plus a receiver of
/// user-facing failure notices (play requests refused for the current
/// track), which the caller surfaces as transient errors.
pub fn spawn<O: MediaOutput>(
    output: O,
    tx: mpsc::UnboundedSender<EngineMessage>,
    mut rx: mpsc::UnboundedReceiver<EngineMessage>,
    initial_queue: Vec<Track>,
    initial_volume: f32,
) -> (PlayerHandle, mpsc::UnboundedReceiver<String>) {
    let mut core = PlayerCore::new(initial_queue, initial_volume);
    let (state_tx, state_rx) = watch::channel(core.snapshot());
    let (notice_tx, notice_rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        output.send(OutputCommand::SetVolume {
            volume: initial_volume.clamp(0.0, 1.0),
        });

        loop {
            let message = match rx.recv().await {
                Some(m) => m,
                None => break,
            };
            let effects = match message {
                EngineMessage::Command(command) => {
                    tracing::debug!(?command, "Applying player command");
                    core.apply_command(command)
                }
                EngineMessage::Output(event) => {
                    // Failures for the track the user is actually on are
                    // worth telling them about; stale ones are not.
                    if let OutputEvent::PlayFailed { track_id, message } = &event {
                        let snapshot = core.snapshot();
                        if let Some(track) = snapshot
                            .current_track()
                            .filter(|t| t.id == *track_id)
                        {
                            let _ = notice_tx
                                .send(format!("Can't play \"{}\": {}", track.title, message));
                        }
                    }
                    core.apply_event(event)
                }
                EngineMessage::Shutdown => break,
            };
            for effect in effects {
                output.send(effect);
            }
            if state_tx.send(core.snapshot()).is_err() {
                break;
            }
        }

        // One media output per engine lifetime: tear it down on every exit
        // path.
        output.send(OutputCommand::Shutdown);
        tracing::info!("Playback engine stopped");
    });

    (
        PlayerHandle {
            tx,
            state: state_rx,
        },
        notice_rx,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::OutputEvent;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Clone)]
    struct RecordingOutput {
        sent: Arc<Mutex<Vec<OutputCommand>>>,
    }

    impl MediaOutput for RecordingOutput {
        fn send(&self, command: OutputCommand) {
            if let Ok(mut sent) = self.sent.lock() {
                sent.push(command);
            }
        }
    }

    fn track(id: &str) -> Track {
        Track {
            id: id.to_string(),
            title: format!("Track {id}"),
            artist: "Tester".to_string(),
            cover: String::new(),
            source: format!("/music/{id}.mp3"),
            duration_secs: 180.0,
            genre: None,
            lyrics: None,
        }
    }

    async fn settle(handle: &mut PlayerHandle) {
        // The engine publishes after each message; wait for the watch to
        // move so assertions read post-apply state.
        let _ = tokio::time::timeout(Duration::from_secs(1), handle.state.changed()).await;
    }

    #[tokio::test]
    async fn commands_flow_through_to_the_output_and_snapshot() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let output = RecordingOutput { sent: sent.clone() };
        let (tx, rx) = channel();
        let (mut handle, _notices) = spawn(output, tx, rx, vec![track("1"), track("2")], 0.8);

        handle.play(Some(track("1")));
        settle(&mut handle).await;

        let snap = handle.snapshot();
        assert_eq!(snap.current_track().map(|t| t.id.as_str()), Some("1"));
        let recorded = sent.lock().unwrap().clone();
        assert!(recorded.contains(&OutputCommand::Load {
            track_id: "1".to_string(),
            source: "/music/1.mp3".to_string(),
        }));
        assert!(recorded.contains(&OutputCommand::Play));

        handle.shutdown();
    }

    #[tokio::test]
    async fn stale_output_events_do_not_corrupt_the_snapshot() {
        let output = RecordingOutput {
            sent: Arc::new(Mutex::new(Vec::new())),
        };
        let (tx, rx) = channel();
        let events = tx.clone();
        let (mut handle, _notices) = spawn(output, tx, rx, vec![track("1"), track("2")], 1.0);

        handle.play(Some(track("1")));
        settle(&mut handle).await;
        handle.play(Some(track("2")));
        settle(&mut handle).await;

        // Late acknowledgment for the abandoned track.
        events
            .send(EngineMessage::Output(OutputEvent::PlayStarted {
                track_id: "1".to_string(),
            }))
            .unwrap();
        settle(&mut handle).await;
        assert!(!handle.snapshot().is_playing());

        events
            .send(EngineMessage::Output(OutputEvent::PlayStarted {
                track_id: "2".to_string(),
            }))
            .unwrap();
        settle(&mut handle).await;
        let snap = handle.snapshot();
        assert!(snap.is_playing());
        assert_eq!(snap.current_track().map(|t| t.id.as_str()), Some("2"));

        handle.shutdown();
    }

    #[tokio::test]
    async fn play_failures_for_the_current_track_surface_a_notice() {
        let output = RecordingOutput {
            sent: Arc::new(Mutex::new(Vec::new())),
        };
        let (tx, rx) = channel();
        let events = tx.clone();
        let (mut handle, mut notices) = spawn(output, tx, rx, vec![track("1"), track("2")], 1.0);

        handle.play(Some(track("1")));
        settle(&mut handle).await;
        events
            .send(EngineMessage::Output(OutputEvent::PlayFailed {
                track_id: "1".to_string(),
                message: "decode failed".to_string(),
            }))
            .unwrap();

        let notice = tokio::time::timeout(Duration::from_secs(1), notices.recv())
            .await
            .expect("notice should arrive")
            .expect("channel open");
        assert!(notice.contains("Track 1"));
        assert!(notice.contains("decode failed"));

        // A failure for a track the user already left produces nothing.
        handle.play(Some(track("2")));
        settle(&mut handle).await;
        events
            .send(EngineMessage::Output(OutputEvent::PlayFailed {
                track_id: "1".to_string(),
                message: "decode failed".to_string(),
            }))
            .unwrap();
        settle(&mut handle).await;
        assert!(notices.try_recv().is_err());

        handle.shutdown();
    }

    #[tokio::test]
    async fn queue_edits_round_trip_through_the_engine() {
        let output = RecordingOutput {
            sent: Arc::new(Mutex::new(Vec::new())),
        };
        let (tx, rx) = channel();
        let (mut handle, _notices) =
            spawn(output, tx, rx, vec![track("1"), track("2"), track("3")], 1.0);

        handle.move_queue_item(0, 2);
        settle(&mut handle).await;
        let order: Vec<String> = handle
            .snapshot()
            .queue
            .iter()
            .map(|t| t.id.clone())
            .collect();
        assert_eq!(order, ["3", "2", "1"]);

        handle.remove_queue_item(1);
        settle(&mut handle).await;
        assert_eq!(handle.snapshot().queue.len(), 2);

        handle.shutdown();
    }

    #[tokio::test]
    async fn shutdown_reaches_the_output() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let output = RecordingOutput { sent: sent.clone() };
        let (tx, rx) = channel();
        let (handle, _notices) = spawn(output, tx, rx, vec![], 1.0);

        handle.shutdown();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(sent.lock().unwrap().contains(&OutputCommand::Shutdown));
    }
}
