//! Durable storage for the user-chosen timezone and hour mode.
//!
//! The record is a small JSON file:
//!
//! ```json
//! { "timezone": "Asia/Dhaka", "hour_mode": 12 }
//! ```
//!
//! Loading is deliberately permissive. A missing file, malformed JSON, a
//! missing key, an unknown zone, or an hour mode other than 12/24 all
//! degrade to the built-in defaults (field by field where possible) so the
//! clock always boots into a usable state.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::timezone::{is_valid_timezone, DEFAULT_TIMEZONE};
use crate::types::HourMode;

/// Errors that can occur reading or writing the persisted record.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// Reading, writing, or renaming the file failed.
    #[error("config file I/O failed for {path}: {source}")]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// The record could not be encoded or decoded.
    #[error("config file is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// The persisted timezone / hour-mode record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedConfig {
    /// IANA zone identifier.
    pub timezone: String,
    /// Display hour mode.
    pub hour_mode: HourMode,
}

impl Default for PersistedConfig {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_owned(),
            hour_mode: HourMode::default(),
        }
    }
}

/// On-disk shape before validation. Every field is optional and untyped so
/// one bad value does not discard the others.
#[derive(Debug, Default, Deserialize)]
struct RawRecord {
    #[serde(default)]
    timezone: Option<serde_json::Value>,
    #[serde(default)]
    hour_mode: Option<serde_json::Value>,
}

impl RawRecord {
    fn validate(self) -> PersistedConfig {
        let timezone = match self.timezone.as_ref().and_then(serde_json::Value::as_str) {
            Some(name) if is_valid_timezone(name) => name.to_owned(),
            other => {
                warn!(stored = ?other, "persisted timezone unusable, using default");
                DEFAULT_TIMEZONE.to_owned()
            }
        };

        let hour_mode = match self
            .hour_mode
            .as_ref()
            .and_then(serde_json::Value::as_i64)
            .map(HourMode::try_from)
        {
            Some(Ok(mode)) => mode,
            other => {
                warn!(stored = ?self.hour_mode, parsed = ?other, "persisted hour mode unusable, using default");
                HourMode::default()
            }
        };

        PersistedConfig {
            timezone,
            hour_mode,
        }
    }
}

/// File-backed store for [`PersistedConfig`].
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Create a store backed by the file at `path`. Nothing is read yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the record, substituting defaults for anything unusable.
    pub fn load(&self) -> PersistedConfig {
        match self.read_raw() {
            Ok(raw) => raw.validate(),
            Err(PersistError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "no persisted config, using defaults");
                PersistedConfig::default()
            }
            Err(e) => {
                warn!(error = %e, "failed to read persisted config, using defaults");
                PersistedConfig::default()
            }
        }
    }

    /// Write the record.
    ///
    /// The new content goes to a sibling temporary file which is then
    /// renamed over the old one, so a failed save leaves the previous
    /// record intact.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Io`] if the temporary file cannot be written
    /// or renamed into place.
    pub fn save(&self, config: &PersistedConfig) -> Result<(), PersistError> {
        let body = serde_json::to_vec_pretty(config)?;
        let tmp = self.tmp_path();

        fs::write(&tmp, body).map_err(|source| PersistError::Io {
            path: tmp.clone(),
            source,
        })?;

        if let Err(source) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(PersistError::Io {
                path: self.path.clone(),
                source,
            });
        }

        Ok(())
    }

    fn read_raw(&self) -> Result<RawRecord, PersistError> {
        let contents = fs::read_to_string(&self.path).map_err(|source| PersistError::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn scratch_path() -> PathBuf {
        std::env::temp_dir().join(format!("ledclock-store-{}.json", uuid::Uuid::new_v4()))
    }

    #[test]
    fn missing_file_yields_defaults() {
        let store = ConfigStore::new(scratch_path());
        let config = store.load();
        assert_eq!(config.timezone, "Europe/Paris");
        assert_eq!(config.hour_mode, HourMode::TwentyFour);
    }

    #[test]
    fn save_then_load() {
        let path = scratch_path();
        let store = ConfigStore::new(&path);
        let config = PersistedConfig {
            timezone: String::from("Asia/Dhaka"),
            hour_mode: HourMode::Twelve,
        };
        store.save(&config).unwrap();

        let reloaded = ConfigStore::new(&path).load();
        assert_eq!(reloaded, config);
        assert!(!store.tmp_path().exists());

        fs::remove_file(path).unwrap();
    }

    #[test]
    fn corrupt_file_yields_defaults() {
        let path = scratch_path();
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(ConfigStore::new(&path).load(), PersistedConfig::default());
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn unknown_timezone_falls_back_but_keeps_hour_mode() {
        let path = scratch_path();
        fs::write(&path, r#"{"timezone": "Not/AZone", "hour_mode": 12}"#).unwrap();
        let config = ConfigStore::new(&path).load();
        assert_eq!(config.timezone, "Europe/Paris");
        assert_eq!(config.hour_mode, HourMode::Twelve);
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn bad_hour_mode_falls_back_but_keeps_timezone() {
        let path = scratch_path();
        fs::write(&path, r#"{"timezone": "Asia/Dhaka", "hour_mode": 13}"#).unwrap();
        let config = ConfigStore::new(&path).load();
        assert_eq!(config.timezone, "Asia/Dhaka");
        assert_eq!(config.hour_mode, HourMode::TwentyFour);
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn missing_keys_yield_defaults() {
        let path = scratch_path();
        fs::write(&path, "{}").unwrap();
        assert_eq!(ConfigStore::new(&path).load(), PersistedConfig::default());
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn save_into_missing_directory_fails_without_panicking() {
        let path = std::env::temp_dir()
            .join(format!("ledclock-missing-{}", uuid::Uuid::new_v4()))
            .join("config.json");
        let result = ConfigStore::new(&path).save(&PersistedConfig::default());
        assert!(matches!(result, Err(PersistError::Io { .. })));
    }

    #[test]
    fn failed_save_keeps_previous_record() {
        let path = scratch_path();
        let store = ConfigStore::new(&path);
        let original = PersistedConfig {
            timezone: String::from("Asia/Dhaka"),
            hour_mode: HourMode::Twelve,
        };
        store.save(&original).unwrap();

        // A directory squatting on the temp name makes the write fail.
        fs::create_dir(store.tmp_path()).unwrap();
        assert!(store.save(&PersistedConfig::default()).is_err());
        assert_eq!(store.load(), original);

        fs::remove_dir(store.tmp_path()).unwrap();
        fs::remove_file(path).unwrap();
    }
}
