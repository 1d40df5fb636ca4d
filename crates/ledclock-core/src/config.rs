//! Service configuration for the clock daemon.
//!
//! The file is `ledclock-config.yaml` in the working directory; every field
//! has a default so the file is optional. This is distinct from the
//! persisted timezone / hour-mode record in [`store`](crate::store), which
//! the API rewrites at runtime.
//!
//! Environment variables override file values:
//! - `LEDCLOCK_HOST` overrides `server.host`
//! - `LEDCLOCK_PORT` overrides `server.port`
//! - `LEDCLOCK_STATE_PATH` overrides `clock.state_path`
//! - `LEDCLOCK_BRIDGE_SOCKET` overrides `display.bridge_socket`

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Errors that can occur when loading the service configuration.
#[derive(Debug, thiserror::Error)]
pub enum ServiceConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is unusable.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong.
        reason: String,
    },
}

impl From<serde_yml::Error> for ServiceConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level service configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ServiceConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerSection,

    /// Sampling loop and persisted-settings location.
    #[serde(default)]
    pub clock: ClockSection,

    /// Display peripheral connection.
    #[serde(default)]
    pub display: DisplaySection,

    /// Log verbosity.
    #[serde(default)]
    pub logging: LoggingSection,
}

impl ServiceConfig {
    /// Load configuration from a YAML file and apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceConfigError::Io`] if the file cannot be read,
    /// [`ServiceConfigError::Yaml`] if it is not valid YAML, or
    /// [`ServiceConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ServiceConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string and apply environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceConfigError::Yaml`] if the string is not valid YAML,
    /// or [`ServiceConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ServiceConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults with environment overrides applied.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceConfigError::Invalid`] if an override is malformed.
    pub fn from_env() -> Result<Self, ServiceConfigError> {
        Self::parse("")
    }

    /// Override file values with `LEDCLOCK_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceConfigError::Invalid`] if `LEDCLOCK_PORT` is not a
    /// port number.
    pub fn apply_env_overrides(&mut self) -> Result<(), ServiceConfigError> {
        if let Ok(val) = std::env::var("LEDCLOCK_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("LEDCLOCK_PORT") {
            self.server.port = val.parse().map_err(|e| ServiceConfigError::Invalid {
                reason: format!("LEDCLOCK_PORT={val}: {e}"),
            })?;
        }
        if let Ok(val) = std::env::var("LEDCLOCK_STATE_PATH") {
            self.clock.state_path = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("LEDCLOCK_BRIDGE_SOCKET") {
            self.display.bridge_socket = Some(PathBuf::from(val));
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ServiceConfigError> {
        if self.clock.tick_interval_ms == 0 {
            return Err(ServiceConfigError::Invalid {
                reason: "clock.tick_interval_ms must be at least 1".to_owned(),
            });
        }
        Ok(())
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSection {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Sampling loop settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClockSection {
    /// Pause between ticks in milliseconds.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Where the timezone / hour-mode record lives.
    #[serde(default = "default_state_path")]
    pub state_path: PathBuf,
}

impl ClockSection {
    /// The tick interval as a [`Duration`].
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for ClockSection {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            state_path: default_state_path(),
        }
    }
}

/// Display peripheral settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DisplaySection {
    /// Unix socket of the display bridge. Without one, display calls are
    /// only logged.
    #[serde(default)]
    pub bridge_socket: Option<PathBuf>,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingSection {
    /// Filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_port() -> u16 {
    8080
}

const fn default_tick_interval_ms() -> u64 {
    1_000
}

fn default_state_path() -> PathBuf {
    PathBuf::from("config.json")
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    // Parsing tests assume no LEDCLOCK_* variables in the test environment.

    #[test]
    fn default_config() {
        let config = ServiceConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.clock.tick_interval(), Duration::from_secs(1));
        assert_eq!(config.clock.state_path, PathBuf::from("config.json"));
        assert!(config.display.bridge_socket.is_none());
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
server:
  host: "127.0.0.1"
  port: 9090

clock:
  tick_interval_ms: 500
  state_path: "/var/lib/ledclock/config.json"

display:
  bridge_socket: "/var/run/arduino-router.sock"

logging:
  level: "debug"
  json: true
"#;
        let config = ServiceConfig::parse(yaml).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.clock.tick_interval_ms, 500);
        assert_eq!(
            config.clock.state_path,
            PathBuf::from("/var/lib/ledclock/config.json")
        );
        assert_eq!(
            config.display.bridge_socket,
            Some(PathBuf::from("/var/run/arduino-router.sock"))
        );
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = ServiceConfig::parse("server:\n  port: 7000\n").unwrap();
        assert_eq!(config.server.port, 7000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.clock.tick_interval_ms, 1_000);
    }

    #[test]
    fn parse_empty_yaml() {
        assert_eq!(ServiceConfig::parse("").unwrap(), ServiceConfig::default());
    }

    #[test]
    fn zero_tick_interval_is_rejected() {
        let result = ServiceConfig::parse("clock:\n  tick_interval_ms: 0\n");
        assert!(matches!(result, Err(ServiceConfigError::Invalid { .. })));
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let result = ServiceConfig::parse("server: [unclosed");
        assert!(matches!(result, Err(ServiceConfigError::Yaml { .. })));
    }
}
