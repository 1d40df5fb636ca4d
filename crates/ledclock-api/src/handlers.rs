//! REST API endpoint handlers.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML control page |
//! | `GET` | `/api/time` | Current time fields, run flag, zone, hour mode |
//! | `POST` | `/api/start` | Show the time on the display |
//! | `POST` | `/api/stop` | Blank the display |
//! | `GET` | `/api/timezone` | Current IANA zone |
//! | `POST` | `/api/timezone` | Change the zone (`{"timezone": "..."}`) |
//! | `GET` | `/api/hour_mode` | Current hour mode |
//! | `POST` | `/api/hour_mode` | Change the hour mode (`{"mode": 12}`) |

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::{Html, IntoResponse};
use axum::Json;
use ledclock_core::{ClockSnapshot, ControlError, HourMode};

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/timezone`.
#[derive(Debug, serde::Deserialize)]
pub struct SetTimezoneRequest {
    /// IANA zone identifier, e.g. `Asia/Dhaka`.
    #[serde(default)]
    pub timezone: Option<String>,
}

/// Request body for `POST /api/hour_mode`.
#[derive(Debug, serde::Deserialize)]
pub struct SetHourModeRequest {
    /// `12` or `24`.
    #[serde(default)]
    pub mode: Option<i64>,
}

/// Bare success response.
#[derive(Debug, serde::Serialize)]
struct OkResponse {
    ok: bool,
}

/// Response for `GET /api/timezone`.
#[derive(Debug, serde::Serialize)]
struct TimezoneResponse {
    timezone: String,
}

/// Response for a successful `POST /api/timezone`.
#[derive(Debug, serde::Serialize)]
struct TimezoneSetResponse {
    ok: bool,
    timezone: String,
}

/// Response for `GET /api/hour_mode`.
#[derive(Debug, serde::Serialize)]
struct HourModeResponse {
    hour_mode: HourMode,
}

/// Response for a successful `POST /api/hour_mode`.
#[derive(Debug, serde::Serialize)]
struct HourModeSetResponse {
    ok: bool,
    hour_mode: HourMode,
}

// ---------------------------------------------------------------------------
// GET /api/time
// ---------------------------------------------------------------------------

/// Return a consistent snapshot of the clock.
///
/// `h` is always the 0-23 hour; `hour_mode` says how the display maps it.
pub async fn get_time(State(state): State<Arc<AppState>>) -> Json<ClockSnapshot> {
    Json(state.control.get_time())
}

// ---------------------------------------------------------------------------
// POST /api/start, POST /api/stop
// ---------------------------------------------------------------------------

/// Show the time on the display from the next tick on.
pub async fn start(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.control.start();
    Json(OkResponse { ok: true })
}

/// Blank the display from the next tick on.
pub async fn stop(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.control.stop();
    Json(OkResponse { ok: true })
}

// ---------------------------------------------------------------------------
// GET/POST /api/timezone
// ---------------------------------------------------------------------------

/// Return the current zone.
pub async fn get_timezone(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(TimezoneResponse {
        timezone: state.control.timezone(),
    })
}

/// Change the zone. Blank or unknown zones are rejected and nothing
/// changes.
pub async fn set_timezone(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SetTimezoneRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body?;
    let control = state.control.clone();
    let requested = body.timezone.unwrap_or_default();
    let timezone = persisting(move || control.set_timezone(&requested)).await?;

    Ok(Json(TimezoneSetResponse { ok: true, timezone }))
}

// ---------------------------------------------------------------------------
// GET/POST /api/hour_mode
// ---------------------------------------------------------------------------

/// Return the current hour mode.
pub async fn get_hour_mode(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HourModeResponse {
        hour_mode: state.control.hour_mode(),
    })
}

/// Change the hour mode. Anything but 12 or 24 is rejected and nothing
/// changes.
pub async fn set_hour_mode(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SetHourModeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body?;
    let mode = body
        .mode
        .ok_or_else(|| ControlError::InvalidInput("Missing 'mode' field".to_owned()))?;
    let control = state.control.clone();
    let hour_mode = persisting(move || control.set_hour_mode(mode)).await?;

    Ok(Json(HourModeSetResponse {
        ok: true,
        hour_mode,
    }))
}

/// Run a settings change on the blocking pool; it writes the settings file.
async fn persisting<T, F>(change: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, ControlError> + Send + 'static,
{
    tokio::task::spawn_blocking(change)
        .await
        .map_err(|e| ApiError::Internal(format!("settings update failed: {e}")))?
        .map_err(ApiError::from)
}

// ---------------------------------------------------------------------------
// GET / -- minimal HTML control page
// ---------------------------------------------------------------------------

/// Serve a minimal control page that polls `/api/time` and posts to the
/// control endpoints.
pub async fn index() -> impl IntoResponse {
    Html(INDEX_HTML)
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>LED Matrix Clock</title>
    <style>
        body {
            background: #0d1117;
            color: #c9d1d9;
            font-family: 'Cascadia Code', 'Fira Code', 'Consolas', monospace;
            padding: 2rem;
            max-width: 640px;
            margin: 0 auto;
        }
        h1 { color: #58a6ff; margin-bottom: 0.25rem; }
        .clock { font-size: 3rem; color: #58a6ff; margin: 1rem 0; }
        .meta { color: #8b949e; }
        button, input, select {
            background: #161b22;
            color: #c9d1d9;
            border: 1px solid #30363d;
            border-radius: 6px;
            padding: 0.4rem 0.8rem;
            margin: 0.25rem 0.25rem 0.25rem 0;
            font-family: inherit;
        }
        .error { color: #f85149; min-height: 1.2rem; }
        hr { border: none; border-top: 1px solid #30363d; margin: 1.5rem 0; }
    </style>
</head>
<body>
    <h1>LED Matrix Clock</h1>
    <div class="clock" id="clock">--:--:--</div>
    <div class="meta" id="meta"></div>

    <p>
        <button onclick="post('/api/start')">Start</button>
        <button onclick="post('/api/stop')">Stop</button>
    </p>

    <hr>

    <p>
        <input id="tz" placeholder="Asia/Dhaka">
        <button onclick="post('/api/timezone', {timezone: document.getElementById('tz').value})">Set timezone</button>
    </p>
    <p>
        <select id="mode">
            <option value="24">24-hour</option>
            <option value="12">12-hour</option>
        </select>
        <button onclick="post('/api/hour_mode', {mode: Number(document.getElementById('mode').value)})">Set hour mode</button>
    </p>
    <p class="error" id="error"></p>

    <script>
        const pad = (n) => String(n).padStart(2, '0');

        async function refresh() {
            try {
                const t = await (await fetch('/api/time')).json();
                document.getElementById('clock').textContent = `${pad(t.h)}:${pad(t.m)}:${pad(t.s)}`;
                document.getElementById('meta').textContent =
                    `${t.y}-${pad(t.mo)}-${pad(t.d)} ${t.timezone} | ${t.hour_mode}h | ${t.running ? 'running' : 'stopped'}`;
            } catch (e) {
                document.getElementById('error').textContent = String(e);
            }
        }

        async function post(path, body) {
            const res = await fetch(path, {
                method: 'POST',
                headers: {'content-type': 'application/json'},
                body: JSON.stringify(body || {}),
            });
            const json = await res.json();
            document.getElementById('error').textContent = json.ok === false ? json.error : '';
            refresh();
        }

        refresh();
        setInterval(refresh, 1000);
    </script>
</body>
</html>
"#;
