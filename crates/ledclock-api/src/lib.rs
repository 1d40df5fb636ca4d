//! HTTP control API for the LED matrix clock.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **Clock endpoints** for reading the current time and starting or
//!   stopping the display
//! - **Settings endpoints** for reading and changing the timezone and the
//!   12/24-hour mode, which persist across restarts
//! - **Minimal HTML control page** (`GET /`) driving the JSON endpoints
//!
//! # Architecture
//!
//! Handlers call [`ClockControl`], which reads and writes the shared
//! [`ClockState`] under its lock for a single field at a time. No handler
//! ever waits on the sampling loop. Failures are reported as
//! `{"ok": false, "error": "..."}`; panics inside a handler are caught and
//! reported the same way.
//!
//! [`ClockControl`]: ledclock_core::ClockControl
//! [`ClockState`]: ledclock_core::ClockState

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

// Re-export primary types for convenience.
pub use router::build_router;
pub use server::{start_server, ServerConfig, ServerError};
pub use state::AppState;
