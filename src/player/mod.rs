//! Playback engine - the single authority over "what is playing"
//!
//! User commands and media-output notifications share one channel and are
//! applied to the state machine in issuance order. Output notifications are
//! tagged with the track id they apply to and dropped once stale, so a late
//! acknowledgment for a track the user already skipped never corrupts state.
//!
//! - `core`: pure state machine (queue, transport state, shuffle/repeat)
//! - `engine`: the task wiring the core to a media output and publishing
//!   snapshots for the views

mod core;
mod engine;

pub use core::{PlaybackSnapshot, PlayerState};
pub use engine::{channel, spawn, PlayerHandle};

use crate::model::Track;

/// Imperative control surface accepted by the engine.
#[derive(Clone, Debug)]
pub enum PlayerCommand {
    Play(Option<Track>),
    Pause,
    Seek(f64),
    SetVolume(f32),
    Next,
    Prev,
    ToggleShuffle,
    ToggleRepeat,
    ReorderQueue(Vec<Track>),
    /// Swap two queue slots in place. Index-based edits run inside the
    /// engine so they cannot clobber a queue change that landed after the
    /// caller's last snapshot.
    MoveQueueItem { from: usize, to: usize },
    RemoveQueueItem(usize),
    Append(Vec<Track>),
}

/// Notifications from the media output, each tagged with the track it
/// concerns.
#[derive(Clone, Debug)]
pub enum OutputEvent {
    /// The source resolved its real length (relevant for imported files
    /// whose duration is unknown at construction time).
    Loaded { track_id: String, duration_secs: f64 },
    /// Asynchronous acknowledgment of a play request.
    PlayStarted { track_id: String },
    /// The output refused or could not decode the source.
    PlayFailed { track_id: String, message: String },
    Position { track_id: String, secs: f64 },
    TrackEnded { track_id: String },
}

/// Requests the engine issues to the media output.
#[derive(Clone, Debug, PartialEq)]
pub enum OutputCommand {
    Load { track_id: String, source: String },
    Play,
    Pause,
    Seek { secs: f64 },
    SetVolume { volume: f32 },
    Shutdown,
}

/// The platform capability that decodes and renders audio.
///
/// Commands execute asynchronously; results come back as `OutputEvent`s on
/// the engine's input channel.
pub trait MediaOutput: Send + 'static {
    fn send(&self, command: OutputCommand);
}

/// Messages carried by the engine's single input channel.
#[derive(Debug)]
pub enum EngineMessage {
    Command(PlayerCommand),
    Output(OutputEvent),
    Shutdown,
}
