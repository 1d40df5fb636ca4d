//! The shared clock record.
//!
//! [`ClockState`] is wrapped in [`Arc`](std::sync::Arc) and shared between
//! the sampling loop and the API handlers. Every read and write goes
//! through one [`Mutex`] so a reader can never see, say, the hour from
//! one tick paired with the second from the next.
//!
//! Critical sections are a handful of field assignments and never span a
//! display call, a file write, or an `.await`, so a plain `std` mutex is
//! used rather than an async one.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::types::{ClockSnapshot, HourMode, TimeSample};

/// Settings the sampler needs after publishing a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriveDirective {
    /// Whether the display should show the time.
    pub running: bool,
    /// How the hour should be presented.
    pub hour_mode: HourMode,
}

/// Lock-guarded clock record shared across the process.
#[derive(Debug)]
pub struct ClockState {
    inner: Mutex<ClockSnapshot>,
}

impl ClockState {
    /// Create the record for the given zone and hour mode, running, with
    /// zeroed time fields until the first tick.
    pub fn new(timezone: impl Into<String>, hour_mode: HourMode) -> Self {
        Self {
            inner: Mutex::new(ClockSnapshot::initial(timezone.into(), hour_mode)),
        }
    }

    /// A consistent copy of every field.
    pub fn snapshot(&self) -> ClockSnapshot {
        self.lock().clone()
    }

    /// Current IANA zone identifier.
    pub fn timezone(&self) -> String {
        self.lock().timezone.clone()
    }

    /// Current display hour mode.
    pub fn hour_mode(&self) -> HourMode {
        self.lock().hour_mode
    }

    /// Whether the display should be showing the time.
    pub fn is_running(&self) -> bool {
        self.lock().running
    }

    /// Set the run/stop flag. Takes effect on the next tick.
    pub fn set_running(&self, running: bool) {
        self.lock().running = running;
    }

    /// Replace the zone identifier. Callers validate first.
    pub fn set_timezone(&self, timezone: impl Into<String>) {
        self.lock().timezone = timezone.into();
    }

    /// Replace the hour mode.
    pub fn set_hour_mode(&self, hour_mode: HourMode) {
        self.lock().hour_mode = hour_mode;
    }

    /// Publish a sample and read back the drive settings in the same
    /// critical section.
    pub fn record_sample(&self, sample: &TimeSample) -> DriveDirective {
        let mut guard = self.lock();
        guard.apply(sample);
        DriveDirective {
            running: guard.running,
            hour_mode: guard.hour_mode,
        }
    }

    // Every critical section assigns whole fields, so a poisoned lock
    // still guards a coherent record.
    fn lock(&self) -> MutexGuard<'_, ClockSnapshot> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
