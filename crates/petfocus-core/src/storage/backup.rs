//! Whole-app backup file.
//!
//! A backup bundles the three stored blobs verbatim, so the nested fields
//! are JSON strings inside JSON. Restoring replaces the stored blobs only;
//! containers already loaded in memory keep their state until reloaded.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{decode_blob, Snapshot, StateStore};
use crate::error::{ImportError, Result};
use crate::pet::PetRegistry;
use crate::task::TaskRegistry;
use crate::timer::FocusTimer;
use crate::EXPORT_VERSION;

const KEYS: [&str; 3] = [PetRegistry::KEY, TaskRegistry::KEY, FocusTimer::KEY];

/// Backup document: `{pets, tasks, timer, exportedAt, version}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    pub pets: Option<String>,
    pub tasks: Option<String>,
    pub timer: Option<String>,
    pub exported_at: DateTime<Utc>,
    pub version: String,
}

impl Backup {
    /// Collect the current blobs from `store`.
    pub fn export(store: &impl StateStore) -> Result<Self> {
        let backup = Self {
            pets: store.get(PetRegistry::KEY)?,
            tasks: store.get(TaskRegistry::KEY)?,
            timer: store.get(FocusTimer::KEY)?,
            exported_at: Utc::now(),
            version: EXPORT_VERSION.to_string(),
        };
        tracing::info!("backup exported");
        Ok(backup)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Parse and validate a backup file without touching any store.
    pub fn parse(data: &str) -> Result<Self, ImportError> {
        let value: serde_json::Value =
            serde_json::from_str(data).map_err(ImportError::InvalidJson)?;
        match value.get("version").and_then(serde_json::Value::as_str) {
            Some(EXPORT_VERSION) => {}
            Some(other) => {
                return Err(ImportError::UnsupportedVersion {
                    found: other.to_string(),
                })
            }
            None => {
                return Err(ImportError::UnsupportedVersion {
                    found: value
                        .get("version")
                        .map(|v| v.to_string())
                        .unwrap_or_else(|| "missing".into()),
                })
            }
        }
        let backup: Backup = serde_json::from_value(value)
            .map_err(|e| ImportError::MalformedPayload(e.to_string()))?;

        check_blob::<PetRegistry>(backup.pets.as_deref())?;
        check_blob::<TaskRegistry>(backup.tasks.as_deref())?;
        check_blob::<FocusTimer>(backup.timer.as_deref())?;
        Ok(backup)
    }

    /// Write every blob present in the backup into `store`.
    pub fn restore(&self, store: &impl StateStore) -> Result<()> {
        let blobs = [
            (PetRegistry::KEY, &self.pets),
            (TaskRegistry::KEY, &self.tasks),
            (FocusTimer::KEY, &self.timer),
        ];
        for (key, blob) in blobs {
            if let Some(blob) = blob {
                store.set(key, blob)?;
            }
        }
        tracing::info!(exported_at = %self.exported_at, "backup restored");
        Ok(())
    }

    /// `petfocus-backup-YYYY-MM-DD.json`
    pub fn file_name(date: NaiveDate) -> String {
        format!("petfocus-backup-{}.json", date.format("%Y-%m-%d"))
    }
}

fn check_blob<C: Snapshot>(blob: Option<&str>) -> Result<(), ImportError> {
    match blob {
        Some(blob) => decode_blob::<C>(blob)
            .map(|_| ())
            .map_err(|e| ImportError::MalformedPayload(e.to_string())),
        None => Ok(()),
    }
}

/// Parse `data` and, if valid, replace the stored blobs. A restart (or
/// reload of every container) is needed for the new state to show.
pub fn import_all(store: &impl StateStore, data: &str) -> Result<Backup> {
    let backup = Backup::parse(data)?;
    backup.restore(store)?;
    Ok(backup)
}

/// Remove all three stored blobs.
pub fn clear_all(store: &impl StateStore) -> Result<()> {
    for key in KEYS {
        store.remove(key)?;
    }
    tracing::info!("all stored data cleared");
    Ok(())
}

/// Size of the stored blobs in KiB, rounded to two decimals.
pub fn data_size_kb(store: &impl StateStore) -> Result<f64> {
    let mut total = 0usize;
    for key in KEYS {
        total += store.get(key)?.map(|b| b.len()).unwrap_or(0);
    }
    Ok((total as f64 / 1024.0 * 100.0).round() / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::pet::Species;
    use crate::storage::{MemoryStore, Persisted};
    use crate::task::{NewTask, Priority};

    fn seeded_store() -> MemoryStore {
        let store = MemoryStore::new();
        {
            let mut pets: Persisted<PetRegistry, _> = Persisted::load(&store).unwrap();
            pets.apply(|p| p.adopt_pet("Rex", Species::Dog)).unwrap();
            let mut tasks: Persisted<TaskRegistry, _> = Persisted::load(&store).unwrap();
            tasks
                .apply(|t| t.add_task(NewTask::new("Write", Priority::High)))
                .unwrap();
        }
        store
    }

    #[test]
    fn backup_nests_raw_blobs() {
        let store = seeded_store();
        let backup = Backup::export(&store).unwrap();
        assert_eq!(backup.version, "1.0.0");
        assert_eq!(backup.pets, store.get("pet-store").unwrap());
        assert!(backup.timer.is_none());

        let json: serde_json::Value = serde_json::from_str(&backup.to_json().unwrap()).unwrap();
        assert!(json["pets"].is_string());
        assert!(json["exportedAt"].is_string());
    }

    #[test]
    fn import_replaces_blobs() {
        let source = seeded_store();
        let file = Backup::export(&source).unwrap().to_json().unwrap();

        let target = MemoryStore::new();
        import_all(&target, &file).unwrap();
        assert_eq!(target.get("pet-store").unwrap(), source.get("pet-store").unwrap());
        assert_eq!(target.get("task-store").unwrap(), source.get("task-store").unwrap());
        assert!(target.get("timer-store").unwrap().is_none());

        let pets: Persisted<PetRegistry, _> = Persisted::load(&target).unwrap();
        assert_eq!(pets.get().pets()[0].name, "Rex");
    }

    #[test]
    fn wrong_version_is_rejected_and_store_untouched() {
        let source = seeded_store();
        let mut backup = Backup::export(&source).unwrap();
        backup.version = "2.0.0".into();
        let file = backup.to_json().unwrap();

        let target = MemoryStore::new();
        let err = import_all(&target, &file).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Import(ImportError::UnsupportedVersion { ref found }) if found == "2.0.0"
        ));
        assert!(target.get("pet-store").unwrap().is_none());
    }

    #[test]
    fn unparseable_or_corrupt_payloads_are_rejected() {
        let target = MemoryStore::new();
        assert!(matches!(
            import_all(&target, "not json"),
            Err(CoreError::Import(ImportError::InvalidJson(_)))
        ));
        assert!(matches!(
            import_all(&target, r#"{"exportedAt": "2026-01-01T00:00:00Z"}"#),
            Err(CoreError::Import(ImportError::UnsupportedVersion { .. }))
        ));
        let bad_blob = r#"{"pets": "{oops", "tasks": null, "timer": null,
            "exportedAt": "2026-01-01T00:00:00Z", "version": "1.0.0"}"#;
        assert!(matches!(
            import_all(&target, bad_blob),
            Err(CoreError::Import(ImportError::MalformedPayload(_)))
        ));
        assert!(target.get("pet-store").unwrap().is_none());
    }

    #[test]
    fn clear_and_size() {
        let store = seeded_store();
        assert!(data_size_kb(&store).unwrap() > 0.0);
        clear_all(&store).unwrap();
        assert_eq!(data_size_kb(&store).unwrap(), 0.0);
    }

    #[test]
    fn file_name_uses_date() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        assert_eq!(Backup::file_name(date), "petfocus-backup-2026-10-16.json");
    }
}
