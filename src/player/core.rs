//! Pure playback state machine
//!
//! `PlayerCore` owns the queue and the transport state, applies commands and
//! output events one at a time, and answers with the output commands that
//! realize each transition. It performs no I/O, which keeps every transition
//! unit-testable.

use rand::Rng;

use crate::model::Track;

use super::{OutputCommand, OutputEvent, PlayerCommand};

/// How far into a track `prev` still jumps back instead of restarting.
/// Accidental back-taps near a track's start should not strand the user.
const RESTART_THRESHOLD_SECS: f64 = 3.0;

/// Transport state.
///
/// `Empty` only ever occurs before the first play; once a track has been
/// loaded, normal operation never clears it (there is no stop state distinct
/// from "paused").
#[derive(Clone, Debug, PartialEq)]
pub enum PlayerState {
    Empty,
    Loaded {
        track: Track,
        is_playing: bool,
        position_secs: f64,
        duration_secs: f64,
    },
}

/// Read-only snapshot handed to every view.
#[derive(Clone, Debug)]
pub struct PlaybackSnapshot {
    pub state: PlayerState,
    pub volume: f32,
    pub shuffle: bool,
    pub repeat: bool,
    pub queue: Vec<Track>,
}

impl PlaybackSnapshot {
    pub fn current_track(&self) -> Option<&Track> {
        match &self.state {
            PlayerState::Loaded { track, .. } => Some(track),
            PlayerState::Empty => None,
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.state, PlayerState::Loaded { is_playing: true, .. })
    }

    pub fn position_secs(&self) -> f64 {
        match &self.state {
            PlayerState::Loaded { position_secs, .. } => *position_secs,
            PlayerState::Empty => 0.0,
        }
    }

    pub fn duration_secs(&self) -> f64 {
        match &self.state {
            PlayerState::Loaded { duration_secs, .. } => *duration_secs,
            PlayerState::Empty => 0.0,
        }
    }
}

pub struct PlayerCore {
    state: PlayerState,
    queue: Vec<Track>,
    volume: f32,
    shuffle: bool,
    repeat: bool,
}

impl PlayerCore {
    pub fn new(queue: Vec<Track>, volume: f32) -> Self {
        Self {
            state: PlayerState::Empty,
            queue,
            volume: volume.clamp(0.0, 1.0),
            shuffle: false,
            repeat: false,
        }
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            state: self.state.clone(),
            volume: self.volume,
            shuffle: self.shuffle,
            repeat: self.repeat,
            queue: self.queue.clone(),
        }
    }

    pub fn apply_command(&mut self, command: PlayerCommand) -> Vec<OutputCommand> {
        match command {
            PlayerCommand::Play(Some(track)) => self.play_track(track),
            PlayerCommand::Play(None) => self.play_resume(),
            PlayerCommand::Pause => self.pause(),
            PlayerCommand::Seek(secs) => self.seek(secs),
            PlayerCommand::SetVolume(volume) => self.set_volume(volume),
            PlayerCommand::Next => self.next(),
            PlayerCommand::Prev => self.prev(),
            PlayerCommand::ToggleShuffle => {
                self.shuffle = !self.shuffle;
                vec![]
            }
            PlayerCommand::ToggleRepeat => {
                self.repeat = !self.repeat;
                vec![]
            }
            PlayerCommand::ReorderQueue(queue) => {
                // Wholesale replacement; current track and transport state
                // stay untouched even if the track no longer appears in the
                // new order.
                self.queue = queue;
                vec![]
            }
            PlayerCommand::MoveQueueItem { from, to } => {
                if from < self.queue.len() && to < self.queue.len() {
                    self.queue.swap(from, to);
                }
                vec![]
            }
            PlayerCommand::RemoveQueueItem(index) => {
                if index < self.queue.len() {
                    self.queue.remove(index);
                }
                vec![]
            }
            PlayerCommand::Append(mut tracks) => {
                self.queue.append(&mut tracks);
                vec![]
            }
        }
    }

    pub fn apply_event(&mut self, event: OutputEvent) -> Vec<OutputCommand> {
        match event {
            OutputEvent::Position { track_id, secs } => {
                if let PlayerState::Loaded {
                    track,
                    position_secs,
                    duration_secs,
                    ..
                } = &mut self.state
                {
                    if track.id == track_id {
                        *position_secs = if *duration_secs > 0.0 {
                            secs.clamp(0.0, *duration_secs)
                        } else {
                            secs.max(0.0)
                        };
                    }
                }
                vec![]
            }
            OutputEvent::Loaded {
                track_id,
                duration_secs: reported,
            } => {
                if let PlayerState::Loaded {
                    track,
                    duration_secs,
                    position_secs,
                    ..
                } = &mut self.state
                {
                    if track.id == track_id {
                        *duration_secs = reported;
                        *position_secs = position_secs.min(reported);
                    } else {
                        tracing::debug!(track_id, "Discarding stale metadata");
                    }
                }
                vec![]
            }
            OutputEvent::PlayStarted { track_id } => {
                if let PlayerState::Loaded {
                    track, is_playing, ..
                } = &mut self.state
                {
                    if track.id == track_id {
                        *is_playing = true;
                    } else {
                        tracing::debug!(track_id, "Discarding stale play acknowledgment");
                    }
                }
                vec![]
            }
            OutputEvent::PlayFailed { track_id, message } => {
                // Stay Loaded-Paused for the failed track; never auto-advance.
                if self.current_id() == Some(track_id.as_str()) {
                    tracing::warn!(track_id, message, "Playback request failed");
                    if let PlayerState::Loaded { is_playing, .. } = &mut self.state {
                        *is_playing = false;
                    }
                } else {
                    tracing::debug!(track_id, "Discarding stale play failure");
                }
                vec![]
            }
            OutputEvent::TrackEnded { track_id } => {
                if self.current_id() == Some(track_id.as_str()) {
                    self.next()
                } else {
                    tracing::debug!(track_id, "Discarding stale end-of-track");
                    vec![]
                }
            }
        }
    }

    fn current_id(&self) -> Option<&str> {
        match &self.state {
            PlayerState::Loaded { track, .. } => Some(track.id.as_str()),
            PlayerState::Empty => None,
        }
    }

    fn current_index(&self) -> Option<usize> {
        let id = self.current_id()?;
        self.queue.iter().position(|t| t.id == id)
    }

    fn play_track(&mut self, track: Track) -> Vec<OutputCommand> {
        if self.current_id() == Some(track.id.as_str()) {
            // Same track: behaves as a resume.
            return vec![OutputCommand::Play];
        }
        let load = OutputCommand::Load {
            track_id: track.id.clone(),
            source: track.source.clone(),
        };
        let duration_secs = track.duration_secs;
        self.state = PlayerState::Loaded {
            track,
            is_playing: false,
            position_secs: 0.0,
            duration_secs,
        };
        vec![load, OutputCommand::Play]
    }

    fn play_resume(&mut self) -> Vec<OutputCommand> {
        match &self.state {
            PlayerState::Loaded { .. } => vec![OutputCommand::Play],
            PlayerState::Empty => match self.queue.first().cloned() {
                Some(first) => self.play_track(first),
                None => vec![],
            },
        }
    }

    fn pause(&mut self) -> Vec<OutputCommand> {
        match &mut self.state {
            PlayerState::Loaded { is_playing, .. } => {
                *is_playing = false;
                vec![OutputCommand::Pause]
            }
            PlayerState::Empty => vec![],
        }
    }

    fn seek(&mut self, secs: f64) -> Vec<OutputCommand> {
        match &mut self.state {
            PlayerState::Loaded {
                position_secs,
                duration_secs,
                ..
            } => {
                // Optimistic: reflect the target immediately, the output's
                // own position reports take over from there.
                let target = if *duration_secs > 0.0 {
                    secs.clamp(0.0, *duration_secs)
                } else {
                    secs.max(0.0)
                };
                *position_secs = target;
                vec![OutputCommand::Seek { secs: target }]
            }
            PlayerState::Empty => vec![],
        }
    }

    fn set_volume(&mut self, volume: f32) -> Vec<OutputCommand> {
        self.volume = volume.clamp(0.0, 1.0);
        vec![OutputCommand::SetVolume {
            volume: self.volume,
        }]
    }

    /// Advances through the queue. Always wraps at the end; the repeat flag
    /// is a user-visible toggle and does not gate wrap-around.
    fn next(&mut self) -> Vec<OutputCommand> {
        if self.queue.is_empty() || matches!(self.state, PlayerState::Empty) {
            return vec![];
        }
        let n = self.queue.len();
        let index = if self.shuffle && n > 1 {
            // Exclude the current index so shuffle never repeats the track
            // that just played.
            let current = self.current_index();
            let mut rng = rand::rng();
            loop {
                let candidate = rng.random_range(0..n);
                if Some(candidate) != current {
                    break candidate;
                }
            }
        } else {
            match self.current_index() {
                Some(i) => (i + 1) % n,
                // Current track no longer in the queue: restart at the head.
                None => 0,
            }
        };
        let track = self.queue[index].clone();
        self.play_track(track)
    }

    fn prev(&mut self) -> Vec<OutputCommand> {
        if self.queue.is_empty() || matches!(self.state, PlayerState::Empty) {
            return vec![];
        }
        if let PlayerState::Loaded { position_secs, .. } = &self.state {
            if *position_secs > RESTART_THRESHOLD_SECS {
                return self.seek(0.0);
            }
        }
        let n = self.queue.len();
        let index = match self.current_index() {
            Some(i) => (i + n - 1) % n,
            None => 0,
        };
        let track = self.queue[index].clone();
        self.play_track(track)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: &str) -> Track {
        Track {
            id: id.to_string(),
            title: format!("Track {id}"),
            artist: "Tester".to_string(),
            cover: String::new(),
            source: format!("/music/{id}.mp3"),
            duration_secs: 200.0,
            genre: None,
            lyrics: None,
        }
    }

    fn core_with_queue(ids: &[&str]) -> PlayerCore {
        PlayerCore::new(ids.iter().map(|id| track(id)).collect(), 1.0)
    }

    fn current_id(core: &PlayerCore) -> Option<String> {
        core.snapshot().current_track().map(|t| t.id.clone())
    }

    fn start_playing(core: &mut PlayerCore, id: &str) {
        core.apply_command(PlayerCommand::Play(Some(track(id))));
        core.apply_event(OutputEvent::PlayStarted {
            track_id: id.to_string(),
        });
    }

    #[test]
    fn play_loads_then_requests_playback() {
        let mut core = core_with_queue(&["1", "2"]);
        let effects = core.apply_command(PlayerCommand::Play(Some(track("1"))));
        assert_eq!(
            effects,
            vec![
                OutputCommand::Load {
                    track_id: "1".to_string(),
                    source: "/music/1.mp3".to_string(),
                },
                OutputCommand::Play,
            ]
        );
        // Playing only once the output acknowledges.
        assert!(!core.snapshot().is_playing());
        core.apply_event(OutputEvent::PlayStarted {
            track_id: "1".to_string(),
        });
        assert!(core.snapshot().is_playing());
    }

    #[test]
    fn play_same_track_is_a_resume() {
        let mut core = core_with_queue(&["1", "2"]);
        start_playing(&mut core, "1");
        core.apply_event(OutputEvent::Position {
            track_id: "1".to_string(),
            secs: 42.0,
        });
        let effects = core.apply_command(PlayerCommand::Play(Some(track("1"))));
        assert_eq!(effects, vec![OutputCommand::Play]);
        assert_eq!(core.snapshot().position_secs(), 42.0);
    }

    #[test]
    fn play_without_argument_on_empty_state_starts_queue_head() {
        let mut core = core_with_queue(&["1", "2", "3"]);
        core.apply_command(PlayerCommand::Play(None));
        assert_eq!(current_id(&core).as_deref(), Some("1"));
    }

    #[test]
    fn play_without_argument_on_empty_queue_is_a_no_op() {
        let mut core = core_with_queue(&[]);
        let effects = core.apply_command(PlayerCommand::Play(None));
        assert!(effects.is_empty());
        assert_eq!(core.snapshot().state, PlayerState::Empty);
    }

    #[test]
    fn pause_is_idempotent_and_a_no_op_when_empty() {
        let mut core = core_with_queue(&["1"]);
        assert!(core.apply_command(PlayerCommand::Pause).is_empty());

        start_playing(&mut core, "1");
        assert_eq!(
            core.apply_command(PlayerCommand::Pause),
            vec![OutputCommand::Pause]
        );
        assert!(!core.snapshot().is_playing());
        assert_eq!(
            core.apply_command(PlayerCommand::Pause),
            vec![OutputCommand::Pause]
        );
        assert!(!core.snapshot().is_playing());
    }

    #[test]
    fn next_wraps_to_the_start_of_the_queue() {
        let mut core = core_with_queue(&["1", "2", "3"]);
        start_playing(&mut core, "2");
        core.apply_command(PlayerCommand::Next);
        assert_eq!(current_id(&core).as_deref(), Some("3"));
        core.apply_command(PlayerCommand::Next);
        assert_eq!(current_id(&core).as_deref(), Some("1"));
    }

    #[test]
    fn next_n_times_returns_to_the_starting_index() {
        let mut core = core_with_queue(&["1", "2", "3", "4"]);
        start_playing(&mut core, "3");
        for _ in 0..4 {
            core.apply_command(PlayerCommand::Next);
        }
        assert_eq!(current_id(&core).as_deref(), Some("3"));
    }

    #[test]
    fn next_is_a_no_op_when_empty_or_queue_empty() {
        let mut core = core_with_queue(&["1"]);
        assert!(core.apply_command(PlayerCommand::Next).is_empty());

        let mut core = core_with_queue(&[]);
        core.apply_command(PlayerCommand::Play(Some(track("x"))));
        assert!(core.apply_command(PlayerCommand::Next).is_empty());
        assert_eq!(current_id(&core).as_deref(), Some("x"));
    }

    #[test]
    fn prev_early_in_a_track_moves_back_with_wraparound() {
        let mut core = core_with_queue(&["1", "2", "3"]);
        start_playing(&mut core, "1");
        core.apply_event(OutputEvent::Position {
            track_id: "1".to_string(),
            secs: 2.0,
        });
        core.apply_command(PlayerCommand::Prev);
        assert_eq!(current_id(&core).as_deref(), Some("3"));
    }

    #[test]
    fn prev_past_three_seconds_restarts_the_current_track() {
        let mut core = core_with_queue(&["1", "2", "3"]);
        start_playing(&mut core, "2");
        core.apply_event(OutputEvent::Position {
            track_id: "2".to_string(),
            secs: 10.0,
        });
        let effects = core.apply_command(PlayerCommand::Prev);
        assert_eq!(effects, vec![OutputCommand::Seek { secs: 0.0 }]);
        assert_eq!(current_id(&core).as_deref(), Some("2"));
        assert_eq!(core.snapshot().position_secs(), 0.0);
    }

    #[test]
    fn seek_clamps_to_known_duration_and_ignores_empty_state() {
        let mut core = core_with_queue(&["1"]);
        assert!(core.apply_command(PlayerCommand::Seek(30.0)).is_empty());

        start_playing(&mut core, "1");
        let effects = core.apply_command(PlayerCommand::Seek(999.0));
        assert_eq!(effects, vec![OutputCommand::Seek { secs: 200.0 }]);
        assert_eq!(core.snapshot().position_secs(), 200.0);

        let effects = core.apply_command(PlayerCommand::Seek(-5.0));
        assert_eq!(effects, vec![OutputCommand::Seek { secs: 0.0 }]);
    }

    #[test]
    fn volume_is_clamped_to_unit_range() {
        let mut core = core_with_queue(&["1"]);
        core.apply_command(PlayerCommand::SetVolume(1.7));
        assert_eq!(core.snapshot().volume, 1.0);
        core.apply_command(PlayerCommand::SetVolume(-0.3));
        assert_eq!(core.snapshot().volume, 0.0);
    }

    #[test]
    fn toggles_are_involutions_and_leave_playback_alone() {
        let mut core = core_with_queue(&["1", "2"]);
        start_playing(&mut core, "1");
        core.apply_event(OutputEvent::Position {
            track_id: "1".to_string(),
            secs: 7.0,
        });
        let before = core.snapshot();

        core.apply_command(PlayerCommand::ToggleShuffle);
        assert!(core.snapshot().shuffle);
        core.apply_command(PlayerCommand::ToggleShuffle);
        assert!(!core.snapshot().shuffle);

        core.apply_command(PlayerCommand::ToggleRepeat);
        assert!(core.snapshot().repeat);
        core.apply_command(PlayerCommand::ToggleRepeat);
        assert!(!core.snapshot().repeat);

        let after = core.snapshot();
        assert_eq!(after.state, before.state);
    }

    #[test]
    fn reorder_never_touches_current_track_or_playing_flag() {
        let mut core = core_with_queue(&["1", "2", "3"]);
        start_playing(&mut core, "2");

        let effects = core.apply_command(PlayerCommand::ReorderQueue(vec![
            track("3"),
            track("1"),
        ]));
        assert!(effects.is_empty());
        let snap = core.snapshot();
        assert_eq!(snap.current_track().map(|t| t.id.as_str()), Some("2"));
        assert!(snap.is_playing());

        // Dangling current track: traversal restarts at the queue head.
        core.apply_command(PlayerCommand::Next);
        assert_eq!(current_id(&core).as_deref(), Some("3"));
    }

    #[test]
    fn queue_edits_apply_in_place_and_spare_playback() {
        let mut core = core_with_queue(&["1", "2", "3"]);
        start_playing(&mut core, "2");

        assert!(core
            .apply_command(PlayerCommand::MoveQueueItem { from: 0, to: 1 })
            .is_empty());
        let snap = core.snapshot();
        let order: Vec<&str> = snap.queue.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(order, ["2", "1", "3"]);
        assert_eq!(snap.current_track().map(|t| t.id.as_str()), Some("2"));
        assert!(snap.is_playing());

        core.apply_command(PlayerCommand::RemoveQueueItem(1));
        let order: Vec<String> = core
            .snapshot()
            .queue
            .iter()
            .map(|t| t.id.clone())
            .collect();
        assert_eq!(order, ["2", "3"]);
        assert!(core.snapshot().is_playing());
    }

    #[test]
    fn out_of_bounds_queue_edits_are_no_ops() {
        let mut core = core_with_queue(&["1", "2"]);
        core.apply_command(PlayerCommand::MoveQueueItem { from: 1, to: 5 });
        core.apply_command(PlayerCommand::RemoveQueueItem(9));
        assert_eq!(core.snapshot().queue.len(), 2);
        assert_eq!(core.snapshot().queue[1].id, "2");
    }

    #[test]
    fn appended_tracks_survive_interleaved_queue_edits() {
        // An append that lands before an index edit must not be lost.
        let mut core = core_with_queue(&["1", "2"]);
        core.apply_command(PlayerCommand::Append(vec![track("3")]));
        core.apply_command(PlayerCommand::MoveQueueItem { from: 0, to: 1 });
        let snap = core.snapshot();
        let order: Vec<&str> = snap.queue.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(order, ["2", "1", "3"]);
    }

    #[test]
    fn shuffle_never_repeats_the_current_track() {
        let mut core = core_with_queue(&["1", "2", "3", "4"]);
        start_playing(&mut core, "1");
        core.apply_command(PlayerCommand::ToggleShuffle);
        for _ in 0..50 {
            let before = current_id(&core);
            core.apply_command(PlayerCommand::Next);
            let after = current_id(&core);
            assert_ne!(before, after);
            assert!(core
                .snapshot()
                .queue
                .iter()
                .any(|t| Some(t.id.clone()) == after));
        }
    }

    #[test]
    fn stale_play_acknowledgments_are_discarded() {
        let mut core = core_with_queue(&["1", "2"]);
        core.apply_command(PlayerCommand::Play(Some(track("1"))));
        core.apply_command(PlayerCommand::Play(Some(track("2"))));

        // The late acknowledgment for "1" must not flip is_playing.
        core.apply_event(OutputEvent::PlayStarted {
            track_id: "1".to_string(),
        });
        assert!(!core.snapshot().is_playing());

        core.apply_event(OutputEvent::PlayStarted {
            track_id: "2".to_string(),
        });
        assert!(core.snapshot().is_playing());
    }

    #[test]
    fn play_failure_keeps_the_track_loaded_and_paused() {
        let mut core = core_with_queue(&["1", "2"]);
        core.apply_command(PlayerCommand::Play(Some(track("1"))));
        let effects = core.apply_event(OutputEvent::PlayFailed {
            track_id: "1".to_string(),
            message: "decode failed".to_string(),
        });
        // No auto-advance on failure.
        assert!(effects.is_empty());
        assert_eq!(current_id(&core).as_deref(), Some("1"));
        assert!(!core.snapshot().is_playing());
    }

    #[test]
    fn end_of_track_advances_like_next() {
        let mut core = core_with_queue(&["1", "2"]);
        start_playing(&mut core, "1");
        let effects = core.apply_event(OutputEvent::TrackEnded {
            track_id: "1".to_string(),
        });
        assert!(!effects.is_empty());
        assert_eq!(current_id(&core).as_deref(), Some("2"));

        // A stale end-of-track for a track already left behind is ignored.
        let effects = core.apply_event(OutputEvent::TrackEnded {
            track_id: "1".to_string(),
        });
        assert!(effects.is_empty());
        assert_eq!(current_id(&core).as_deref(), Some("2"));
    }

    #[test]
    fn metadata_back_fills_duration_for_the_matching_track_only() {
        let mut core = core_with_queue(&["1", "2"]);
        let mut imported = track("local-1");
        imported.duration_secs = 0.0;
        core.apply_command(PlayerCommand::Play(Some(imported)));
        assert_eq!(core.snapshot().duration_secs(), 0.0);

        core.apply_event(OutputEvent::Loaded {
            track_id: "other".to_string(),
            duration_secs: 99.0,
        });
        assert_eq!(core.snapshot().duration_secs(), 0.0);

        core.apply_event(OutputEvent::Loaded {
            track_id: "local-1".to_string(),
            duration_secs: 187.5,
        });
        assert_eq!(core.snapshot().duration_secs(), 187.5);
    }

    #[test]
    fn position_updates_are_clamped_and_id_guarded() {
        let mut core = core_with_queue(&["1", "2"]);
        start_playing(&mut core, "1");

        core.apply_event(OutputEvent::Position {
            track_id: "2".to_string(),
            secs: 50.0,
        });
        assert_eq!(core.snapshot().position_secs(), 0.0);

        core.apply_event(OutputEvent::Position {
            track_id: "1".to_string(),
            secs: 500.0,
        });
        assert_eq!(core.snapshot().position_secs(), 200.0);
    }

    #[test]
    fn append_grows_the_queue_without_touching_playback() {
        let mut core = core_with_queue(&["1"]);
        start_playing(&mut core, "1");
        core.apply_command(PlayerCommand::Append(vec![track("6"), track("7")]));
        let snap = core.snapshot();
        assert_eq!(snap.queue.len(), 3);
        assert_eq!(snap.current_track().map(|t| t.id.as_str()), Some("1"));
        assert!(snap.is_playing());
    }
}
