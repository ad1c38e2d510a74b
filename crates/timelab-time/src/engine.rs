//! Time Lab Engine - orchestrates clocks, progress bars and the countdown

use std::time::Duration;

use chrono_tz::Tz;

use timelab_core::{DisplayBoard, Instant, TimeLabResult, TimezoneSelector, WorldZoneEntry};

use crate::{ClockRenderer, CountdownTracker, Formatter, HostZone, ProgressTracker};

/// Time Lab Engine configuration
#[derive(Clone, Debug)]
pub struct TimeLabConfig {
    /// Zone treated as local
    pub host_zone: HostZone,
    /// World clocks, rendered in order
    pub world_zones: Vec<WorldZoneEntry>,
    /// Tick interval for drivers
    pub tick_interval: Duration,
}

impl Default for TimeLabConfig {
    fn default() -> Self {
        TimeLabConfig {
            host_zone: HostZone::System,
            world_zones: WorldZoneEntry::defaults(),
            tick_interval: Duration::from_secs(1),
        }
    }
}

impl TimeLabConfig {
    /// Configuration pinned to a fixed host zone, for headless hosts
    pub fn fixed_host(zone: Tz) -> Self {
        TimeLabConfig {
            host_zone: HostZone::Fixed(zone),
            ..Default::default()
        }
    }
}

/// Time Lab Engine - owns the selected zone and the countdown target
pub struct TimeLabEngine {
    /// Main clock and world clocks
    clock: ClockRenderer,
    /// Day and year bars
    progress: ProgressTracker,
    /// Countdown target
    countdown: CountdownTracker,
    /// Zone of the main clock
    selector: TimezoneSelector,
    formatter: Formatter,
    ticks: u64,
    config: TimeLabConfig,
}

impl TimeLabEngine {
    /// Create a new engine with default configuration
    pub fn new() -> Self {
        Self::with_config(TimeLabConfig::default())
    }

    /// Create a new engine with custom configuration
    pub fn with_config(config: TimeLabConfig) -> Self {
        let formatter = Formatter::new(config.host_zone);
        TimeLabEngine {
            clock: ClockRenderer::new(formatter),
            progress: ProgressTracker::new(config.host_zone),
            countdown: CountdownTracker::new(config.host_zone),
            selector: TimezoneSelector::Local,
            formatter,
            ticks: 0,
            config,
        }
    }

    /// Render everything for `now`.
    ///
    /// Order: main clock, world clocks, progress, countdown. A formatting
    /// failure aborts the tick and is returned to the caller
    pub fn tick(&mut self, now: Instant, board: &mut dyn DisplayBoard) -> TimeLabResult<()> {
        self.clock.render_main(board, now, &self.selector)?;
        self.clock
            .render_world(board, now, &self.config.world_zones)?;
        self.progress.render(board, now)?;
        self.countdown.render(board, now);

        self.ticks += 1;
        tracing::debug!(ticks = self.ticks, now = ?now, "tick rendered");
        Ok(())
    }

    /// Change the main clock's zone. Takes effect on the next tick
    pub fn select_timezone(&mut self, selector: impl Into<TimezoneSelector>) {
        self.selector = selector.into();
        tracing::info!(selector = %self.selector, "timezone selected");
    }

    pub fn selector(&self) -> &TimezoneSelector {
        &self.selector
    }

    /// Set the countdown target from submitted form values
    pub fn submit_countdown(&mut self, date: &str, time: Option<&str>) -> TimeLabResult<Instant> {
        self.countdown.set_target(date, time)
    }

    pub fn countdown(&self) -> &CountdownTracker {
        &self.countdown
    }

    pub fn progress(&self) -> &ProgressTracker {
        &self.progress
    }

    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    /// Number of completed ticks
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn config(&self) -> &TimeLabConfig {
        &self.config
    }
}

impl Default for TimeLabEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use timelab_core::{targets, MemoryBoard, TimeLabError};

    fn engine() -> TimeLabEngine {
        TimeLabEngine::with_config(TimeLabConfig::fixed_host(Tz::Asia__Shanghai))
    }

    fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> Instant {
        Instant::from_datetime(&Tz::Asia__Shanghai.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap())
    }

    #[test]
    fn test_tick_fills_board() {
        let mut engine = engine();
        let mut board = MemoryBoard::standard();
        engine.tick(local(2024, 12, 31, 23, 0, 0), &mut board).unwrap();

        assert_eq!(board.text(targets::CLOCK_TIME), Some("23:00:00"));
        assert_eq!(board.text(targets::CLOCK_DATE), Some("2024/12/31周二 23:00:00"));
        assert_eq!(board.text(targets::TIME_LONDON), Some("15:00:00"));
        assert_eq!(board.width(targets::DAY_PROGRESS_BAR), Some("95.83%"));
        assert_eq!(board.text(targets::DAY_PROGRESS_TEXT), Some("今天已过去 95.8%"));
        assert!(board.text(targets::YEAR_PROGRESS_TEXT).is_some());
        // No countdown until a target is submitted
        assert_eq!(board.text(targets::COUNTDOWN_LABEL), None);
        assert_eq!(engine.ticks(), 1);
    }

    #[test]
    fn test_countdown_lifecycle() {
        let mut engine = engine();
        let mut board = MemoryBoard::standard();
        let now = local(2024, 12, 31, 23, 0, 0);

        engine.submit_countdown("2025-01-01", Some("00:00")).unwrap();
        engine.tick(now, &mut board).unwrap();
        assert_eq!(
            board.text(targets::COUNTDOWN_DETAIL),
            Some("0 天 1 小时 0 分钟 0 秒")
        );

        // A rejected submission leaves target and display alone
        assert_eq!(engine.submit_countdown("", None), Err(TimeLabError::EmptyDate));
        let before = board.clone();
        engine.tick(now, &mut board).unwrap();
        assert_eq!(board, before);
    }

    #[test]
    fn test_timezone_selection() {
        let mut engine = engine();
        let mut board = MemoryBoard::standard();
        engine.select_timezone("Asia/Tokyo");
        engine.tick(local(2024, 12, 31, 23, 0, 0), &mut board).unwrap();
        assert_eq!(board.text(targets::CLOCK_TIME), Some("00:00:00"));
        // World clocks ignore the selector
        assert_eq!(board.text(targets::TIME_BEIJING), Some("23:00:00"));

        engine.select_timezone("local");
        assert_eq!(engine.selector(), &TimezoneSelector::Local);
    }

    #[test]
    fn test_unsupported_timezone_aborts_tick() {
        let mut engine = engine();
        let mut board = MemoryBoard::standard();
        engine.select_timezone("Moon/Tranquility");
        let err = engine
            .tick(local(2025, 1, 1, 0, 0, 0), &mut board)
            .unwrap_err();
        assert_eq!(err, TimeLabError::UnsupportedTimezone("Moon/Tranquility".into()));
        assert_eq!(engine.ticks(), 0);
        assert_eq!(board, MemoryBoard::standard());
    }

    #[test]
    fn test_unsupported_world_zone_aborts_tick() {
        let mut config = TimeLabConfig::fixed_host(Tz::Asia__Shanghai);
        config
            .world_zones
            .push(WorldZoneEntry::new("time-bad", "Nowhere/Land"));
        let mut engine = TimeLabEngine::with_config(config);
        let mut board = MemoryBoard::standard();
        board.register("time-bad");
        assert!(engine.tick(local(2025, 1, 1, 0, 0, 0), &mut board).is_err());
    }

    #[test]
    fn test_tick_is_idempotent() {
        let mut engine = engine();
        engine.submit_countdown("2025-06-15", None).unwrap();
        let now = local(2025, 3, 1, 8, 15, 30);
        let mut first = MemoryBoard::standard();
        let mut second = MemoryBoard::standard();
        engine.tick(now, &mut first).unwrap();
        engine.tick(now, &mut second).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_default_config() {
        let config = TimeLabConfig::default();
        assert_eq!(config.host_zone, HostZone::System);
        assert_eq!(config.world_zones.len(), 4);
        assert_eq!(config.tick_interval, Duration::from_secs(1));
    }
}
