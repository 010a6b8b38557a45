//! Star ratings (1-5), persisted through the key-value store

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::store::KvStore;

const RATINGS_KEY: &str = "track_ratings";

/// Sparse track-id → rating map. An absent entry means "unrated" and is
/// never rendered as 0.
#[derive(Clone)]
pub struct RatingStore {
    store: Arc<dyn KvStore>,
    ratings: Arc<RwLock<HashMap<String, u8>>>,
}

impl RatingStore {
    /// Loads once, best-effort: corrupt or missing persisted data yields an
    /// empty map.
    pub fn load(store: Arc<dyn KvStore>) -> Self {
        let ratings = match store.get(RATINGS_KEY) {
            Some(raw) => match serde_json::from_str::<HashMap<String, u8>>(&raw) {
                Ok(map) => map,
                Err(e) => {
                    tracing::warn!(error = %e, "Stored ratings unreadable, starting empty");
                    HashMap::new()
                }
            },
            None => HashMap::new(),
        };
        Self {
            store,
            ratings: Arc::new(RwLock::new(ratings)),
        }
    }

    pub async fn get(&self, track_id: &str) -> Option<u8> {
        self.ratings.read().await.get(track_id).copied()
    }

    /// Merges one entry and persists the whole map. Persistence is
    /// fire-and-forget: a failed write is logged and the in-memory update
    /// stands.
    pub async fn set(&self, track_id: &str, rating: u8) {
        let rating = rating.clamp(1, 5);
        let mut map = self.ratings.write().await;
        map.insert(track_id.to_string(), rating);
        match serde_json::to_string(&*map) {
            Ok(raw) => self.store.set(RATINGS_KEY, &raw),
            Err(e) => tracing::warn!(error = %e, "Failed to encode ratings"),
        }
    }

    pub async fn snapshot(&self) -> HashMap<String, u8> {
        self.ratings.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::store::FileKvStore;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn scratch_store(name: &str) -> Arc<FileKvStore> {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        let dir: PathBuf = std::env::temp_dir().join(format!("moodplay-ratings-{name}-{nanos}"));
        Arc::new(FileKvStore::open(dir))
    }

    #[tokio::test]
    async fn set_then_get_returns_the_rating() {
        let ratings = RatingStore::load(scratch_store("setget"));
        for r in 1..=5u8 {
            ratings.set("1", r).await;
            assert_eq!(ratings.get("1").await, Some(r));
        }
    }

    #[tokio::test]
    async fn unrated_track_is_absent_not_zero() {
        let ratings = RatingStore::load(scratch_store("absent"));
        assert_eq!(ratings.get("never-rated").await, None);
    }

    #[tokio::test]
    async fn ratings_survive_a_reload() {
        let store = scratch_store("reload");
        let ratings = RatingStore::load(store.clone());
        ratings.set("3", 4).await;

        let reloaded = RatingStore::load(store);
        assert_eq!(reloaded.get("3").await, Some(4));
    }

    #[tokio::test]
    async fn corrupt_persisted_map_starts_empty() {
        let store = scratch_store("corrupt");
        store.set(RATINGS_KEY, "{not json");
        let ratings = RatingStore::load(store);
        assert!(ratings.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn out_of_range_ratings_are_clamped() {
        let ratings = RatingStore::load(scratch_store("clamp"));
        ratings.set("1", 0).await;
        assert_eq!(ratings.get("1").await, Some(1));
        ratings.set("1", 9).await;
        assert_eq!(ratings.get("1").await, Some(5));
    }
}
