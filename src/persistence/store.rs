//! Key-value backends
//!
//! Values are opaque strings (JSON written by the progress store). A missing
//! key reads as `None`; backends never interpret the values.

use std::collections::HashMap;

use super::StoreError;

/// Minimal string store, shaped after browser LocalStorage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// Volatile store for tests and demo runs
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::FileStore;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::fs::{self, File};
    use std::io::{BufWriter, ErrorKind, Write};
    use std::path::{Path, PathBuf};

    use log::{debug, warn};

    use super::{KeyValueStore, StoreError};

    /// One `<key>.json` file per key inside a data directory
    #[derive(Debug, Clone)]
    pub struct FileStore {
        data_dir: PathBuf,
    }

    impl FileStore {
        /// Open (and create if needed) the data directory
        pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
            let data_dir = data_dir.into();
            fs::create_dir_all(&data_dir)?;
            debug!("Data directory: {data_dir:?}");
            Ok(Self { data_dir })
        }

        pub fn data_dir(&self) -> &Path {
            &self.data_dir
        }

        fn path_for(&self, key: &str) -> PathBuf {
            self.data_dir.join(format!("{key}.json"))
        }
    }

    impl KeyValueStore for FileStore {
        fn get(&self, key: &str) -> Option<String> {
            match fs::read_to_string(self.path_for(key)) {
                Ok(value) => Some(value),
                Err(error) if error.kind() == ErrorKind::NotFound => None,
                Err(error) => {
                    warn!("Could not read {key}: {error}");
                    None
                }
            }
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
            let file = File::create(self.path_for(key))?;
            let mut writer = BufWriter::new(file);
            writer.write_all(value.as_bytes())?;
            writer.flush()?;
            Ok(())
        }

        fn remove(&mut self, key: &str) -> Result<(), StoreError> {
            match fs::remove_file(self.path_for(key)) {
                Err(error) if error.kind() != ErrorKind::NotFound => Err(error.into()),
                _ => Ok(()),
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::LocalStorage;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{KeyValueStore, StoreError};

    /// The window's LocalStorage
    pub struct LocalStorage {
        storage: web_sys::Storage,
    }

    impl LocalStorage {
        pub fn open() -> Result<Self, StoreError> {
            let storage = web_sys::window()
                .and_then(|w| w.local_storage().ok())
                .flatten()
                .ok_or_else(|| StoreError::Unavailable("window.localStorage".to_string()))?;
            Ok(Self { storage })
        }
    }

    impl KeyValueStore for LocalStorage {
        fn get(&self, key: &str) -> Option<String> {
            self.storage.get_item(key).ok().flatten()
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
            self.storage
                .set_item(key, value)
                .map_err(|err| StoreError::Unavailable(format!("{err:?}")))
        }

        fn remove(&mut self, key: &str) -> Result<(), StoreError> {
            self.storage
                .remove_item(key)
                .map_err(|err| StoreError::Unavailable(format!("{err:?}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("k"), None);
        store.set("k", "1").unwrap();
        store.set("k", "2").unwrap();
        assert_eq!(store.get("k").as_deref(), Some("2"));
        assert_eq!(store.len(), 1);
        store.remove("k").unwrap();
        assert!(store.is_empty());
        // Removing a missing key is fine
        store.remove("k").unwrap();
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_store_roundtrip() {
        let dir = std::env::temp_dir().join(format!("sportmind-store-{}", std::process::id()));
        let mut store = FileStore::open(&dir).unwrap();
        assert_eq!(store.get("sm_profile"), None);

        store.set("sm_profile", r#"{"nickname":"Ada"}"#).unwrap();
        assert_eq!(
            store.get("sm_profile").as_deref(),
            Some(r#"{"nickname":"Ada"}"#)
        );
        assert!(store.data_dir().join("sm_profile.json").exists());

        store.remove("sm_profile").unwrap();
        store.remove("sm_profile").unwrap();
        assert_eq!(store.get("sm_profile"), None);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
