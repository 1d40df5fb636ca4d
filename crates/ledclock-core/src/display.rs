//! Display adapter trait and the log-only adapter.
//!
//! The sampling loop pushes the time to the peripheral through a
//! [`DisplayAdapter`]. The adapter could be a socket bridge to the LED
//! matrix microcontroller, a terminal renderer, or a test recorder.
//! Adapters report failures as [`DisplayError`]; the loop logs them and
//! keeps ticking.

use tracing::info;

/// Errors a display adapter can report.
#[derive(Debug, thiserror::Error)]
pub enum DisplayError {
    /// The transport to the peripheral failed.
    #[error("display I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A request could not be encoded.
    #[error("display request encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),

    /// The peripheral is not reachable (e.g. not yet connected).
    #[error("display unavailable: {message}")]
    Unavailable {
        /// Description of why the peripheral is unavailable.
        message: String,
    },
}

/// A sink that can show a time or go dark.
///
/// Calls are fire-and-forget from the caller's point of view: nothing is
/// read back from the peripheral.
pub trait DisplayAdapter: Send {
    /// Show `hour:minute:second`. The hour is already mapped for the
    /// active hour mode.
    ///
    /// # Errors
    ///
    /// Returns [`DisplayError`] if the peripheral could not be driven.
    fn render(&mut self, hour: u8, minute: u8, second: u8) -> Result<(), DisplayError>;

    /// Blank the display.
    ///
    /// # Errors
    ///
    /// Returns [`DisplayError`] if the peripheral could not be driven.
    fn clear(&mut self) -> Result<(), DisplayError>;
}

impl<D: DisplayAdapter + ?Sized> DisplayAdapter for Box<D> {
    fn render(&mut self, hour: u8, minute: u8, second: u8) -> Result<(), DisplayError> {
        (**self).render(hour, minute, second)
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        (**self).clear()
    }
}

/// An adapter with no hardware behind it; every call becomes a log line.
///
/// Used when no display bridge is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDisplay;

impl LogDisplay {
    /// Create a new log-only adapter.
    pub const fn new() -> Self {
        Self
    }
}

impl DisplayAdapter for LogDisplay {
    fn render(&mut self, hour: u8, minute: u8, second: u8) -> Result<(), DisplayError> {
        tracing::debug!("display {hour:02}:{minute:02}:{second:02}");
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        info!("display cleared");
        Ok(())
    }
}
