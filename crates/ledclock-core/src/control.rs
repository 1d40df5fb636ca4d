//! Named control operations over the clock.
//!
//! [`ClockControl`] is what the API layer calls. Each operation is
//! synchronous and touches [`ClockState`] only for a single field read or
//! write, so none of them ever waits on the sampling loop.
//!
//! Timezone and hour-mode changes are validated before anything is
//! mutated, then written to the shared state and persisted. A failed save
//! is logged and otherwise ignored: the in-memory value stays authoritative
//! for the rest of the process lifetime. The setters write the settings
//! file, so async callers run them on a blocking thread.

use std::sync::Arc;

use tracing::{info, warn};

use crate::state::ClockState;
use crate::store::{ConfigStore, PersistedConfig};
use crate::timezone::is_valid_timezone;
use crate::types::{ClockSnapshot, HourMode};

/// Rejections a control operation can return. Neither mutates state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ControlError {
    /// A required field was missing, empty, or out of range.
    #[error("{0}")]
    InvalidInput(String),

    /// The string is not a recognized IANA zone.
    #[error("Invalid timezone '{0}' (use IANA format like 'Asia/Dhaka')")]
    InvalidTimezone(String),
}

/// Control surface over the shared clock and its persisted settings.
#[derive(Debug, Clone)]
pub struct ClockControl {
    state: Arc<ClockState>,
    store: ConfigStore,
}

impl ClockControl {
    /// Wrap the shared state and the store its settings persist to.
    pub const fn new(state: Arc<ClockState>, store: ConfigStore) -> Self {
        Self { state, store }
    }

    /// A consistent copy of every clock field.
    pub fn get_time(&self) -> ClockSnapshot {
        self.state.snapshot()
    }

    /// Show the time on the display from the next tick on.
    pub fn start(&self) {
        self.state.set_running(true);
        info!("display started");
    }

    /// Blank the display from the next tick on.
    pub fn stop(&self) {
        self.state.set_running(false);
        info!("display stopped");
    }

    /// Current IANA zone identifier.
    pub fn timezone(&self) -> String {
        self.state.timezone()
    }

    /// Validate, apply, and persist a new zone. Surrounding whitespace is
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::InvalidInput`] if the name is blank, or
    /// [`ControlError::InvalidTimezone`] if it is not a known IANA zone.
    pub fn set_timezone(&self, requested: &str) -> Result<String, ControlError> {
        let name = requested.trim();
        if name.is_empty() {
            return Err(ControlError::InvalidInput(
                "Missing 'timezone' field".to_owned(),
            ));
        }
        if !is_valid_timezone(name) {
            return Err(ControlError::InvalidTimezone(name.to_owned()));
        }

        self.state.set_timezone(name);
        self.persist();
        info!(timezone = name, "timezone set");
        Ok(name.to_owned())
    }

    /// Current display hour mode.
    pub fn hour_mode(&self) -> HourMode {
        self.state.hour_mode()
    }

    /// Validate, apply, and persist a new hour mode.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::InvalidInput`] unless `mode` is 12 or 24.
    pub fn set_hour_mode(&self, mode: i64) -> Result<HourMode, ControlError> {
        let mode = HourMode::try_from(mode).map_err(|e| ControlError::InvalidInput(e.to_string()))?;

        self.state.set_hour_mode(mode);
        self.persist();
        info!(hour_mode = %mode, "hour mode set");
        Ok(mode)
    }

    fn persist(&self) {
        let snap = self.state.snapshot();
        let record = PersistedConfig {
            timezone: snap.timezone,
            hour_mode: snap.hour_mode,
        };
        if let Err(e) = self.store.save(&record) {
            warn!(error = %e, path = %self.store.path().display(), "failed to persist clock settings");
        }
    }
}
