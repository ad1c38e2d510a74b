//! TimeLab Driver - tick loop and host event handling

use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;

use timelab_core::{DisplayBoard, Instant, TimeLabError, TimeLabResult};
use timelab_time::TimeLabEngine;

use crate::RuntimeResult;

/// Events raised by the host outside the tick cadence
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostEvent {
    /// Main clock zone changed; `"local"` or an IANA identifier
    TimezoneChanged(String),
    /// Countdown form submitted
    CountdownSubmitted { date: String, time: Option<String> },
    /// Stop the loop
    Shutdown,
}

/// Blocking user notification (an alert dialog in a browser host)
pub trait Notifier: Send {
    fn alert(&self, message: &str);
}

/// Notifier that only logs
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn alert(&self, message: &str) {
        tracing::warn!(alert = message, "user alert");
    }
}

/// Source of the instant captured at each tick
pub trait InstantSource: Send {
    fn now(&self) -> Instant;
}

/// Host wall clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl InstantSource for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

impl<F> InstantSource for F
where
    F: Fn() -> Instant + Send,
{
    fn now(&self) -> Instant {
        self()
    }
}

#[derive(Clone, Debug, Default)]
pub struct RuntimeStats {
    pub ticks: u64,
    pub events: u64,
    pub user_errors: u64,
    pub last_tick_duration: Duration,
}

/// Owns the engine and renders into a shared board
pub struct TimeLabDriver<B: DisplayBoard + Send> {
    engine: TimeLabEngine,
    board: Arc<Mutex<B>>,
    notifier: Box<dyn Notifier>,
    clock: Box<dyn InstantSource>,
    stats: RuntimeStats,
    rendered: watch::Sender<u64>,
}

impl<B: DisplayBoard + Send> TimeLabDriver<B> {
    pub fn new(engine: TimeLabEngine, board: Arc<Mutex<B>>) -> Self {
        let (rendered, _) = watch::channel(0);
        TimeLabDriver {
            engine,
            board,
            notifier: Box::new(LogNotifier),
            clock: Box::new(SystemClock),
            stats: RuntimeStats::default(),
            rendered,
        }
    }

    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    pub fn with_clock(mut self, clock: impl InstantSource + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Shared board the engine renders into
    pub fn board(&self) -> Arc<Mutex<B>> {
        Arc::clone(&self.board)
    }

    /// Receives the tick count after every completed render
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.rendered.subscribe()
    }

    pub fn engine(&self) -> &TimeLabEngine {
        &self.engine
    }

    pub fn stats(&self) -> &RuntimeStats {
        &self.stats
    }

    /// Render once at the current instant
    pub fn tick(&mut self) -> TimeLabResult<()> {
        let now = self.clock.now();
        let started = std::time::Instant::now();
        {
            let mut board = self.board.lock();
            self.engine.tick(now, &mut *board)?;
        }
        self.stats.ticks += 1;
        self.stats.last_tick_duration = started.elapsed();
        self.rendered.send_replace(self.stats.ticks);
        Ok(())
    }

    /// Apply one host event. User input errors are alerted and swallowed;
    /// anything else is returned
    pub fn handle_event(&mut self, event: HostEvent) -> TimeLabResult<ControlFlow<()>> {
        self.stats.events += 1;
        match event {
            HostEvent::TimezoneChanged(value) => {
                self.engine.select_timezone(value.as_str());
                self.tick()?;
            }
            HostEvent::CountdownSubmitted { date, time } => {
                match self.engine.submit_countdown(&date, time.as_deref()) {
                    Ok(_) => self.tick()?,
                    Err(e) if e.is_user_error() => self.report(&e),
                    Err(e) => return Err(e),
                }
            }
            HostEvent::Shutdown => return Ok(ControlFlow::Break(())),
        }
        Ok(ControlFlow::Continue(()))
    }

    fn report(&mut self, error: &TimeLabError) {
        self.stats.user_errors += 1;
        tracing::warn!(%error, "countdown submission rejected");
        self.notifier.alert(&error.to_string());
    }

    /// Render immediately, then every tick interval and after every event,
    /// until `Shutdown` arrives or all senders are dropped.
    /// A render failure ends the loop with that error
    pub async fn run(mut self, mut events: mpsc::Receiver<HostEvent>) -> RuntimeResult<RuntimeStats> {
        let period = self.engine.config().tick_interval;
        tracing::info!(?period, "time lab driver started");

        self.tick().map_err(|e| self.fail(e))?;

        let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.tick().map_err(|e| self.fail(e))?;
                }
                event = events.recv() => {
                    let Some(event) = event else { break };
                    let flow = self.handle_event(event).map_err(|e| self.fail(e))?;
                    if flow.is_break() {
                        break;
                    }
                }
            }
        }

        tracing::info!(ticks = self.stats.ticks, "time lab driver stopped");
        Ok(self.stats)
    }

    fn fail(&self, error: TimeLabError) -> crate::RuntimeError {
        tracing::error!(%error, ticks = self.stats.ticks, "render failed");
        error.into()
    }
}
