//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during startup and shutdown. Nothing that happens while
//! the clock is running surfaces here; those failures are logged and
//! recovered where they occur.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Service configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ledclock_core::config::ServiceConfigError,
    },

    /// The control API failed to bind or serve.
    #[error("server error: {source}")]
    Server {
        /// The underlying server error.
        #[from]
        source: ledclock_api::ServerError,
    },

    /// The sampling loop task panicked.
    #[error("sampling loop error: {source}")]
    Sampler {
        /// The underlying join error.
        #[from]
        source: tokio::task::JoinError,
    },

    /// Logging could not be initialised.
    #[error("logging error: {message}")]
    Logging {
        /// Description of the failure.
        message: String,
    },
}
