//! Application model: catalog, ratings, AI DJ gateway, persistence, and the
//! shared UI state

mod app_model;
pub mod catalog;
mod dj;
mod ratings;
mod store;
mod types;

pub use app_model::AppModel;
pub use catalog::{tracks_from_files, Catalog, Track};
pub use dj::{DjClient, Recommendation};
pub use ratings::RatingStore;
pub use store::{FileKvStore, KvStore};
pub use types::{ActiveView, ChatMessage, ChatRole, Theme, UiState};
