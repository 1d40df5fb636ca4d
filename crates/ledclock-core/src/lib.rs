//! Clock state, sampling loop, and persisted settings for the LED matrix clock.
//!
//! This crate owns everything between the wall clock and the display
//! peripheral. The HTTP surface lives in `ledclock-api`; process wiring
//! lives in `ledclock-engine`.
//!
//! # Modules
//!
//! - [`types`] -- [`HourMode`], [`ClockSnapshot`], and [`TimeSample`].
//! - [`timezone`] -- IANA zone validation and resolution with fallback.
//! - [`store`] -- The persisted timezone / hour-mode record.
//! - [`state`] -- [`ClockState`], the single lock-guarded shared record.
//! - [`display`] -- [`DisplayAdapter`] trait and the log-only adapter.
//! - [`sampler`] -- The once-per-second sampling loop.
//! - [`control`] -- Named control operations used by the API layer.
//! - [`config`] -- Service configuration loaded from YAML.
//!
//! [`HourMode`]: types::HourMode
//! [`ClockSnapshot`]: types::ClockSnapshot
//! [`TimeSample`]: types::TimeSample
//! [`ClockState`]: state::ClockState
//! [`DisplayAdapter`]: display::DisplayAdapter

pub mod config;
pub mod control;
pub mod display;
pub mod sampler;
pub mod state;
pub mod store;
pub mod timezone;
pub mod types;

pub use control::{ClockControl, ControlError};
pub use display::{DisplayAdapter, DisplayError};
pub use state::ClockState;
pub use store::{ConfigStore, PersistedConfig};
pub use types::{ClockSnapshot, HourMode};
