//! Persistence for the three state containers.
//!
//! Each container is stored as one JSON blob under a fixed key in a
//! key-value store. Containers themselves know nothing about storage:
//! [`Persisted`] wraps one and writes it back after every mutation.

pub mod backup;
mod config;
pub mod database;

pub use backup::Backup;
pub use config::{BackupConfig, Config, LogConfig, TimerConfig};
pub use database::Database;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::rc::Rc;

use crate::error::{ConfigError, CoreError, Result};

/// Version stamped into every stored blob.
pub const BLOB_VERSION: u32 = 0;

/// Returns the data directory, creating it if needed.
///
/// `PETFOCUS_DATA_DIR` wins when set. Otherwise `~/.config/petfocus[-dev]/`,
/// with the `-dev` suffix when `PETFOCUS_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("PETFOCUS_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("PETFOCUS_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("petfocus-dev")
            } else {
                base_dir.join("petfocus")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}

/// Synchronous key-value store holding serialized container state.
pub trait StateStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

impl<T: StateStore + ?Sized> StateStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

impl<T: StateStore + ?Sized> StateStore for Rc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// In-memory store. Used by tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// A container that can be stored under a fixed key.
pub trait Snapshot: Serialize + DeserializeOwned + Default {
    const KEY: &'static str;
}

#[derive(Serialize)]
struct BlobRef<'a, C> {
    state: &'a C,
    version: u32,
}

#[derive(Deserialize)]
struct Blob<C> {
    state: C,
    #[allow(dead_code)]
    #[serde(default)]
    version: u32,
}

/// Serialize a container into its stored blob.
pub fn encode_blob<C: Snapshot>(state: &C) -> Result<String> {
    Ok(serde_json::to_string(&BlobRef {
        state,
        version: BLOB_VERSION,
    })?)
}

/// Decode a stored blob. Corruption is reported, never repaired.
pub fn decode_blob<C: Snapshot>(blob: &str) -> Result<C> {
    serde_json::from_str::<Blob<C>>(blob)
        .map(|b| b.state)
        .map_err(|e| CoreError::CorruptState {
            key: C::KEY.to_string(),
            message: e.to_string(),
        })
}

/// A container bound to a store, saved after every [`apply`](Self::apply).
#[derive(Debug)]
pub struct Persisted<C, S> {
    state: C,
    store: S,
}

impl<C: Snapshot, S: StateStore> Persisted<C, S> {
    /// Hydrate from the store. A missing key yields the default container.
    ///
    /// # Errors
    /// Returns [`CoreError::CorruptState`] if the stored blob cannot be decoded.
    pub fn load(store: S) -> Result<Self> {
        let state = match store.get(C::KEY)? {
            Some(blob) => decode_blob(&blob)?,
            None => C::default(),
        };
        tracing::debug!(key = C::KEY, "state loaded");
        Ok(Self { state, store })
    }

    pub fn get(&self) -> &C {
        &self.state
    }

    /// Run a mutation, then write the new state back.
    ///
    /// # Errors
    /// Returns an error if the write fails. The in-memory change is kept.
    pub fn apply<R>(&mut self, f: impl FnOnce(&mut C) -> R) -> Result<R> {
        let out = f(&mut self.state);
        self.save()?;
        Ok(out)
    }

    pub fn save(&self) -> Result<()> {
        self.store.set(C::KEY, &encode_blob(&self.state)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pet::{PetRegistry, Species};

    #[test]
    fn missing_key_loads_default() {
        let store = MemoryStore::new();
        let pets: Persisted<PetRegistry, _> = Persisted::load(&store).unwrap();
        assert!(pets.get().pets().is_empty());
    }

    #[test]
    fn apply_writes_through() {
        let store = MemoryStore::new();
        let mut pets: Persisted<PetRegistry, _> = Persisted::load(&store).unwrap();
        let id = pets.apply(|p| p.adopt_pet("Rex", Species::Dog).id).unwrap();

        let blob = store.get("pet-store").unwrap().unwrap();
        assert!(blob.contains("\"version\":0"));

        let reloaded: Persisted<PetRegistry, _> = Persisted::load(&store).unwrap();
        assert_eq!(reloaded.get().active_pet_id(), Some(id.as_str()));
    }

    #[test]
    fn corrupt_blob_is_fatal() {
        let store = MemoryStore::new();
        store.set("pet-store", "{\"state\": 12").unwrap();
        let err = Persisted::<PetRegistry, _>::load(&store).unwrap_err();
        assert!(matches!(err, CoreError::CorruptState { ref key, .. } if key == "pet-store"));
    }

    #[test]
    fn data_dir_honors_override() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("nested");
        std::env::set_var("PETFOCUS_DATA_DIR", &target);
        let dir = data_dir().unwrap();
        std::env::remove_var("PETFOCUS_DATA_DIR");
        assert_eq!(dir, target);
        assert!(target.is_dir());
    }
}
