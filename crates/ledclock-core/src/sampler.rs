//! The once-per-second sampling loop.
//!
//! Each tick reads the wall clock in the configured zone, publishes the
//! fields to [`ClockState`], and drives the [`DisplayAdapter`]:
//!
//! - **running**: render the time, hour mapped for the active
//!   [`HourMode`](crate::types::HourMode)
//! - **stopped, display lit**: clear once and remember the display is dark
//! - **stopped, display dark**: nothing
//!
//! The interval is not drift-corrected: the loop sleeps a full interval
//! after each tick's work.
//!
//! The loop runs until its shutdown signal fires. [`spawn_sampler`] puts
//! it on a background Tokio task and returns a [`SamplerHandle`] holding
//! that signal. Adapter calls happen on the blocking pool, never on an
//! async worker thread.

use std::sync::Arc;
use std::time::Duration;

use jiff::Timestamp;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error, info};

use crate::display::DisplayAdapter;
use crate::state::ClockState;
use crate::timezone::resolve_timezone;
use crate::types::TimeSample;

/// Default pause between ticks.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// What a single tick did to the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The time was sent to the display (hour already mapped).
    Rendered {
        /// Displayed hour.
        hour: u8,
        /// Minute.
        minute: u8,
        /// Second.
        second: u8,
    },
    /// The display was cleared on this tick.
    Cleared,
    /// Stopped and already dark; the display was not touched.
    Idle,
}

/// Drives the display from the shared clock record.
///
/// Owns the display adapter and the record of whether the display is
/// currently lit; neither is reachable from the API side.
pub struct Sampler<D> {
    state: Arc<ClockState>,
    display: D,
    /// Whether the last tick left the display showing the time. Starts
    /// `true` because the display's state at boot is unknown.
    display_on: bool,
    interval: Duration,
}

impl<D: DisplayAdapter> Sampler<D> {
    /// Create a sampler over `state` driving `display`, ticking every
    /// [`DEFAULT_TICK_INTERVAL`].
    pub const fn new(state: Arc<ClockState>, display: D) -> Self {
        Self {
            state,
            display,
            display_on: true,
            interval: DEFAULT_TICK_INTERVAL,
        }
    }

    /// Override the pause between ticks.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Whether the display is believed to be showing the time.
    pub const fn display_on(&self) -> bool {
        self.display_on
    }

    /// Run one tick sampling the wall clock at `now`.
    pub fn tick(&mut self, now: Timestamp) -> TickOutcome {
        let zone = resolve_timezone(&self.state.timezone());
        let sample = TimeSample::from_zoned(&now.to_zoned(zone));
        let directive = self.state.record_sample(&sample);

        if directive.running {
            self.display_on = true;
            let hour = directive.hour_mode.display_hour(sample.hour);
            match self.display.render(hour, sample.minute, sample.second) {
                Ok(()) => debug!(
                    hour,
                    minute = sample.minute,
                    second = sample.second,
                    hour_mode = %directive.hour_mode,
                    "time sent to display"
                ),
                Err(e) => error!(error = %e, "display render failed"),
            }
            return TickOutcome::Rendered {
                hour,
                minute: sample.minute,
                second: sample.second,
            };
        }

        if !self.display_on {
            return TickOutcome::Idle;
        }

        match self.display.clear() {
            Ok(()) => info!("display cleared"),
            Err(e) => error!(error = %e, "display clear failed"),
        }
        // A failed clear is not retried; the next clear happens on the
        // next running -> stopped edge.
        self.display_on = false;
        TickOutcome::Cleared
    }
}

impl<D: DisplayAdapter + 'static> Sampler<D> {
    /// Tick forever, sleeping the interval after each tick, until
    /// `shutdown` becomes `true`.
    ///
    /// Each tick runs on Tokio's blocking pool, so an adapter that blocks
    /// on I/O never holds an async worker the API needs. If every
    /// shutdown sender is dropped the loop keeps ticking for the rest of
    /// the process lifetime.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let interval = self.interval;
        info!(
            interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX),
            "sampling loop starting"
        );

        let mut sampler = self;
        let mut listening = true;
        loop {
            sampler = match tokio::task::spawn_blocking(move || {
                sampler.tick(Timestamp::now());
                sampler
            })
            .await
            {
                Ok(sampler) => sampler,
                Err(e) => {
                    error!(error = %e, "sampling tick panicked, loop stopped");
                    return;
                }
            };

            if listening {
                tokio::select! {
                    () = tokio::time::sleep(interval) => {}
                    stopped = async { shutdown.wait_for(|stop| *stop).await.is_ok() } => {
                        if stopped {
                            break;
                        }
                        listening = false;
                    }
                }
            } else {
                tokio::time::sleep(interval).await;
            }
        }

        info!("sampling loop stopped");
    }
}

/// Handle to a sampling loop running on a background task.
#[derive(Debug)]
pub struct SamplerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SamplerHandle {
    /// Signal the loop to stop after its current tick or sleep.
    pub fn stop(&self) {
        self.shutdown.send_replace(true);
    }

    /// Whether the background task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Signal the loop to stop and wait for it to exit.
    ///
    /// # Errors
    ///
    /// Returns [`JoinError`] if the task panicked or was aborted.
    pub async fn shutdown(self) -> Result<(), JoinError> {
        self.stop();
        self.task.await
    }
}

/// Spawn `sampler` on a background Tokio task. Its ticks run on the
/// blocking pool.
pub fn spawn_sampler<D>(sampler: Sampler<D>) -> SamplerHandle
where
    D: DisplayAdapter + 'static,
{
    let (shutdown, rx) = watch::channel(false);
    let task = tokio::spawn(sampler.run(rx));
    SamplerHandle { shutdown, task }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::display::DisplayError;
    use crate::types::HourMode;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Call {
        Render(u8, u8, u8),
        Clear,
    }

    /// Records calls into a shared log; optionally fails every call.
    #[derive(Clone, Default)]
    struct RecordingDisplay {
        calls: Arc<Mutex<Vec<Call>>>,
        fail: bool,
    }

    impl RecordingDisplay {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn clears(&self) -> usize {
            self.calls().iter().filter(|c| **c == Call::Clear).count()
        }

        fn record(&self, call: Call) -> Result<(), DisplayError> {
            self.calls.lock().unwrap().push(call);
            if self.fail {
                return Err(DisplayError::Unavailable {
                    message: String::from("unplugged"),
                });
            }
            Ok(())
        }
    }

    impl DisplayAdapter for RecordingDisplay {
        fn render(&mut self, hour: u8, minute: u8, second: u8) -> Result<(), DisplayError> {
            self.record(Call::Render(hour, minute, second))
        }

        fn clear(&mut self) -> Result<(), DisplayError> {
            self.record(Call::Clear)
        }
    }

    // 13:05:09 UTC is 19:05:09 in Dhaka (UTC+6, no DST).
    fn instant() -> Timestamp {
        "2024-01-15T13:05:09Z".parse().unwrap()
    }

    fn setup(hour_mode: HourMode) -> (Arc<ClockState>, RecordingDisplay, Sampler<RecordingDisplay>) {
        let state = Arc::new(ClockState::new("Asia/Dhaka", hour_mode));
        let display = RecordingDisplay::default();
        let sampler = Sampler::new(Arc::clone(&state), display.clone());
        (state, display, sampler)
    }

    #[test]
    fn running_tick_renders_and_publishes() {
        let (state, display, mut sampler) = setup(HourMode::TwentyFour);

        let outcome = sampler.tick(instant());
        assert_eq!(
            outcome,
            TickOutcome::Rendered {
                hour: 19,
                minute: 5,
                second: 9
            }
        );
        assert_eq!(display.calls(), vec![Call::Render(19, 5, 9)]);

        let snap = state.snapshot();
        assert_eq!((snap.hour, snap.minute, snap.second), (19, 5, 9));
        assert_eq!((snap.year, snap.month, snap.day), (2024, 1, 15));
    }

    #[test]
    fn twelve_hour_mode_maps_display_but_not_state() {
        let (state, display, mut sampler) = setup(HourMode::Twelve);
        sampler.tick(instant());
        assert_eq!(display.calls(), vec![Call::Render(7, 5, 9)]);
        assert_eq!(state.snapshot().hour, 19);
    }

    #[test]
    fn timezone_change_applies_on_next_tick() {
        let (state, display, mut sampler) = setup(HourMode::TwentyFour);
        state.set_timezone("UTC");
        sampler.tick(instant());
        assert_eq!(display.calls(), vec![Call::Render(13, 5, 9)]);
    }

    #[test]
    fn unresolvable_timezone_falls_back_to_default() {
        let (state, display, mut sampler) = setup(HourMode::TwentyFour);
        state.set_timezone("Not/AZone");
        sampler.tick(instant());
        // Europe/Paris in January is UTC+1.
        assert_eq!(display.calls(), vec![Call::Render(14, 5, 9)]);
    }

    #[test]
    fn stop_clears_exactly_once() {
        let (state, display, mut sampler) = setup(HourMode::TwentyFour);
        sampler.tick(instant());

        state.set_running(false);
        assert_eq!(sampler.tick(instant()), TickOutcome::Cleared);
        for _ in 0..10 {
            assert_eq!(sampler.tick(instant()), TickOutcome::Idle);
        }
        assert_eq!(display.clears(), 1);
        assert!(!sampler.display_on());
    }

    #[test]
    fn each_stop_edge_clears_again() {
        let (state, display, mut sampler) = setup(HourMode::TwentyFour);

        for _ in 0..3 {
            state.set_running(true);
            sampler.tick(instant());
            state.set_running(false);
            sampler.tick(instant());
            sampler.tick(instant());
        }
        assert_eq!(display.clears(), 3);
    }

    #[test]
    fn boot_while_stopped_clears_once() {
        let (state, display, mut sampler) = setup(HourMode::TwentyFour);
        state.set_running(false);
        sampler.tick(instant());
        sampler.tick(instant());
        assert_eq!(display.calls(), vec![Call::Clear]);
    }

    #[test]
    fn display_failures_do_not_stop_ticking() {
        let state = Arc::new(ClockState::new("Asia/Dhaka", HourMode::TwentyFour));
        let display = RecordingDisplay::failing();
        let mut sampler = Sampler::new(Arc::clone(&state), display.clone());

        sampler.tick(instant());
        sampler.tick(instant());
        state.set_running(false);
        assert_eq!(sampler.tick(instant()), TickOutcome::Cleared);
        // Failed clear still counts; no retry while stopped.
        assert_eq!(sampler.tick(instant()), TickOutcome::Idle);
        assert_eq!(display.calls().len(), 3);
    }

    /// Blocks the calling thread for the whole of every render.
    struct SlowDisplay(Duration);

    impl DisplayAdapter for SlowDisplay {
        fn render(&mut self, _hour: u8, _minute: u8, _second: u8) -> Result<(), DisplayError> {
            std::thread::sleep(self.0);
            Ok(())
        }

        fn clear(&mut self) -> Result<(), DisplayError> {
            Ok(())
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn slow_display_does_not_stall_the_runtime() {
        let state = Arc::new(ClockState::new("UTC", HourMode::TwentyFour));
        let handle = spawn_sampler(Sampler::new(
            Arc::clone(&state),
            SlowDisplay(Duration::from_secs(2)),
        ));

        // Let the first render get under way.
        tokio::time::sleep(Duration::from_millis(100)).await;

        let mut worst = Duration::ZERO;
        for _ in 0..10 {
            let reader = Arc::clone(&state);
            let started = std::time::Instant::now();
            tokio::spawn(async move { reader.snapshot() }).await.unwrap();
            worst = worst.max(started.elapsed());
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert!(
            worst < Duration::from_millis(500),
            "worker stalled for {worst:?} behind a display call"
        );

        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn spawned_loop_ticks_until_shutdown() {
        let (_state, display, sampler) = setup(HourMode::TwentyFour);
        let handle = spawn_sampler(sampler.with_interval(Duration::from_secs(1)));

        tokio::time::sleep(Duration::from_millis(3_500)).await;
        assert!(!handle.is_finished());

        handle.shutdown().await.unwrap();
        let renders = display.calls().len();
        assert!((3..=5).contains(&renders), "unexpected render count {renders}");

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(display.calls().len(), renders);
    }
}
