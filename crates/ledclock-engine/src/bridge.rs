//! Socket bridge to the LED matrix microcontroller.
//!
//! Requests are newline-delimited JSON written to a Unix stream socket:
//!
//! ```text
//! {"method":"updateTime","params":[14,5,9]}
//! {"method":"clearMatrix","params":[]}
//! ```
//!
//! Nothing is read back. The connection is opened on first use and
//! dropped on any write failure or timeout; the next call reconnects.

use std::io::Write;
use std::os::unix::net::UnixStream;
use std::path::PathBuf;
use std::time::Duration;

use ledclock_core::{DisplayAdapter, DisplayError};
use serde::Serialize;
use tracing::info;

/// A bridge that stops reading fails the call after this long.
const WRITE_TIMEOUT: Duration = Duration::from_millis(500);

/// One request on the wire.
#[derive(Debug, Serialize)]
struct BridgeCall<'a> {
    method: &'a str,
    params: &'a [u8],
}

/// [`DisplayAdapter`] that forwards calls over a Unix socket.
#[derive(Debug)]
pub struct BridgeDisplay {
    socket_path: PathBuf,
    stream: Option<UnixStream>,
}

impl BridgeDisplay {
    /// Create an adapter for the bridge listening at `socket_path`. No
    /// connection is made until the first call.
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
            stream: None,
        }
    }

    fn call(&mut self, method: &str, params: &[u8]) -> Result<(), DisplayError> {
        let mut line = serde_json::to_vec(&BridgeCall { method, params })?;
        line.push(b'\n');

        if self.stream.is_none() {
            let stream = UnixStream::connect(&self.socket_path)?;
            stream.set_write_timeout(Some(WRITE_TIMEOUT))?;
            info!(socket = %self.socket_path.display(), "connected to display bridge");
            self.stream = Some(stream);
        }
        let Some(stream) = self.stream.as_mut() else {
            return Err(DisplayError::Unavailable {
                message: format!("no connection to {}", self.socket_path.display()),
            });
        };

        if let Err(e) = stream.write_all(&line).and_then(|()| stream.flush()) {
            self.stream = None;
            return Err(e.into());
        }
        Ok(())
    }
}

impl DisplayAdapter for BridgeDisplay {
    fn render(&mut self, hour: u8, minute: u8, second: u8) -> Result<(), DisplayError> {
        self.call("updateTime", &[hour, minute, second])
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.call("clearMatrix", &[])
    }
}
