//! Shared application state for the control API.

use ledclock_core::ClockControl;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`](std::sync::Arc) and injected via Axum's `State`
/// extractor. The control handle shares its [`ClockState`] with the
/// sampling loop; the loop's display adapter is never reachable from here.
///
/// [`ClockState`]: ledclock_core::ClockState
#[derive(Debug, Clone)]
pub struct AppState {
    /// Control operations over the shared clock.
    pub control: ClockControl,
}

impl AppState {
    /// Create the application state around a control handle.
    pub const fn new(control: ClockControl) -> Self {
        Self { control }
    }
}
