//! Local persistence
//!
//! - `store`: string key-value backends (in-memory, one file per key on
//!   native, LocalStorage in the browser)
//! - `progress`: typed load/save of the player's progress on top of any backend

pub mod progress;
pub mod store;

pub use progress::{CURRENT_LEVEL_KEY, LEVELS_KEY, PROFILE_KEY, ProgressStore};
#[cfg(not(target_arch = "wasm32"))]
pub use store::FileStore;
#[cfg(target_arch = "wasm32")]
pub use store::LocalStorage;
pub use store::{KeyValueStore, MemoryStore};

/// Persistence failures
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not serialize value: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
