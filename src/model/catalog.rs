//! Track catalog: the built-in sample library plus locally imported files

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// A playable library entry.
///
/// Immutable once constructed except `duration_secs`, which may be
/// back-filled once the media output reports the real length of an
/// imported file.
#[derive(Clone, Debug, PartialEq)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub cover: String,
    pub source: String,
    pub duration_secs: f64,
    pub genre: Option<String>,
    pub lyrics: Option<String>,
}

/// Ordered, append-only collection of every track the app knows about.
pub struct Catalog {
    tracks: Vec<Track>,
}

impl Catalog {
    pub fn with_sample_tracks() -> Self {
        Self {
            tracks: sample_tracks(),
        }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn get(&self, id: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn append(&mut self, mut tracks: Vec<Track>) {
        self.tracks.append(&mut tracks);
    }
}

const LOCAL_COVER: &str = "assets/covers/local.png";

/// Synthesize tracks for locally selected audio files.
///
/// The title is the filename with its extension stripped; duration stays 0
/// until the media output reports the real value after loading.
pub fn tracks_from_files(paths: &[PathBuf]) -> Vec<Track> {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);

    paths
        .iter()
        .enumerate()
        .map(|(n, path)| {
            let title = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "Untitled".to_string());

            Track {
                id: format!("local-{}-{}", nanos, n),
                title,
                artist: "Local Track".to_string(),
                cover: LOCAL_COVER.to_string(),
                source: path.to_string_lossy().into_owned(),
                duration_secs: 0.0,
                genre: Some("Local".to_string()),
                lyrics: None,
            }
        })
        .collect()
}

fn sample_tracks() -> Vec<Track> {
    vec![
        Track {
            id: "1".to_string(),
            title: "Neon Horizon".to_string(),
            artist: "Synthwave Boy".to_string(),
            cover: "assets/covers/neon-horizon.png".to_string(),
            source: "assets/audio/neon-horizon.mp3".to_string(),
            duration_secs: 372.0,
            genre: Some("Electronic".to_string()),
            lyrics: None,
        },
        Track {
            id: "2".to_string(),
            title: "Midnight Rain".to_string(),
            artist: "Lofi Chill".to_string(),
            cover: "assets/covers/midnight-rain.png".to_string(),
            source: "assets/audio/midnight-rain.mp3".to_string(),
            duration_secs: 425.0,
            genre: Some("Lofi".to_string()),
            lyrics: Some(
                "Rain on the window, low light on the wall\n\
                 The city hums softly, no hurry at all\n\n\
                 Midnight keeps falling, slow as it goes\n\
                 The kettle is singing a song no one knows"
                    .to_string(),
            ),
        },
        Track {
            id: "3".to_string(),
            title: "Urban Jungle".to_string(),
            artist: "The Beats".to_string(),
            cover: "assets/covers/urban-jungle.png".to_string(),
            source: "assets/audio/urban-jungle.mp3".to_string(),
            duration_secs: 350.0,
            genre: Some("Hip Hop".to_string()),
            lyrics: None,
        },
        Track {
            id: "4".to_string(),
            title: "Acoustic Soul".to_string(),
            artist: "Jane Doe".to_string(),
            cover: "assets/covers/acoustic-soul.png".to_string(),
            source: "assets/audio/acoustic-soul.mp3".to_string(),
            duration_secs: 312.0,
            genre: Some("Acoustic".to_string()),
            lyrics: Some(
                "Strings in the morning, coffee gone cold\n\
                 A melody older than stories retold"
                    .to_string(),
            ),
        },
        Track {
            id: "5".to_string(),
            title: "Techno Dreams".to_string(),
            artist: "Rave Master".to_string(),
            cover: "assets/covers/techno-dreams.png".to_string(),
            source: "assets/audio/techno-dreams.mp3".to_string(),
            duration_secs: 290.0,
            genre: Some("Techno".to_string()),
            lyrics: None,
        },
    ]
}
