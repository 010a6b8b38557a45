//! Key-value persistence for the rating map and theme preference

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

/// Synchronous string-keyed storage.
///
/// Implementations degrade rather than fail: a missing or unreadable value
/// is `None`, a failed write is logged and dropped. In-memory state stays
/// the source of truth for the running session.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

/// File-backed store, one file per key under the cache directory.
///
/// Falls back to in-memory-only operation when the directory cannot be
/// created or a write is refused.
pub struct FileKvStore {
    dir: Option<PathBuf>,
    mem: Mutex<HashMap<String, String>>,
}

impl FileKvStore {
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let dir = match fs::create_dir_all(&dir) {
            Ok(()) => Some(dir),
            Err(e) => {
                tracing::warn!(error = %e, "Cache directory unavailable, storage is in-memory only");
                None
            }
        };
        Self {
            dir,
            mem: Mutex::new(HashMap::new()),
        }
    }

    fn path_for(&self, key: &str) -> Option<PathBuf> {
        self.dir.as_ref().map(|d| d.join(format!("{key}.json")))
    }
}

impl KvStore for FileKvStore {
    fn get(&self, key: &str) -> Option<String> {
        if let Ok(mem) = self.mem.lock() {
            if let Some(value) = mem.get(key) {
                return Some(value.clone());
            }
        }
        let path = self.path_for(key)?;
        fs::read_to_string(path).ok()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut mem) = self.mem.lock() {
            mem.insert(key.to_string(), value.to_string());
        }
        if let Some(path) = self.path_for(key) {
            if let Err(e) = fs::write(&path, value) {
                tracing::warn!(key, error = %e, "Failed to persist value, keeping it in memory");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn scratch_dir(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        std::env::temp_dir().join(format!("moodplay-{name}-{nanos}"))
    }

    #[test]
    fn set_then_get_round_trips() {
        let store = FileKvStore::open(scratch_dir("roundtrip"));
        store.set("theme", "light");
        assert_eq!(store.get("theme").as_deref(), Some("light"));
    }

    #[test]
    fn values_survive_reopening_the_directory() {
        let dir = scratch_dir("reopen");
        let store = FileKvStore::open(&dir);
        store.set("theme", "dark");
        drop(store);

        let reopened = FileKvStore::open(&dir);
        assert_eq!(reopened.get("theme").as_deref(), Some("dark"));
    }

    #[test]
    fn missing_key_is_none() {
        let store = FileKvStore::open(scratch_dir("missing"));
        assert_eq!(store.get("never_set"), None);
    }

    #[test]
    fn unusable_directory_degrades_to_memory() {
        // /dev/null is a file, so nothing can be created under it.
        let store = FileKvStore::open("/dev/null/moodplay");
        store.set("theme", "dark");
        assert_eq!(store.get("theme").as_deref(), Some("dark"));
    }
}
