//! Day and year progress
//!
//! Periods are bounded by host-local midnights, so a day is 23 or 25 hours
//! long across a DST transition.

use chrono::{Datelike, NaiveDate};

use timelab_core::{targets, DisplayBoard, Instant, TimeLabError, TimeLabResult};

use crate::zone::HostZone;

pub const DAY_LABEL: &str = "今天已过去";
pub const YEAR_LABEL: &str = "今年已过去";

/// Fraction converted to a percentage clamped to [0, 100]
pub fn to_percent(fraction: f64) -> f64 {
    (fraction * 100.0).clamp(0.0, 100.0)
}

/// Fixed-point decimal string, rounding exact ties away from zero.
///
/// `format!` rounds exact ties to even (`0.125` -> `"0.12"`); the widget
/// contract is `"0.13"`.
pub fn to_fixed(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return format!("{}", value);
    }
    // 64 extra digits hold the full expansion of any tie at this scale
    let exact = format!("{:.*}", digits + 64, value);
    let tail = &exact[exact.len() - 64..];
    if tail.starts_with('5') && tail[1..].bytes().all(|b| b == b'0') {
        format!("{:.*}", digits, f64::from_bits(value.to_bits() + 1))
    } else {
        format!("{:.*}", digits, value)
    }
}

/// A rendered progress bar
#[derive(Clone, Debug, PartialEq)]
pub struct ProgressBar {
    /// Clamped percentage
    pub percent: f64,
    /// Bar width, two decimals, e.g. `"42.50%"`
    pub width: String,
    /// Label text, one decimal, e.g. `"今天已过去 42.5%"`
    pub label: String,
}

impl ProgressBar {
    pub fn new(fraction: f64, label: &str) -> Self {
        let percent = to_percent(fraction);
        ProgressBar {
            percent,
            width: format!("{}%", to_fixed(percent, 2)),
            label: format!("{} {}%", label, to_fixed(percent, 1)),
        }
    }

    /// Write to a bar/text pair; nothing is written unless both exist
    pub fn render(&self, board: &mut dyn DisplayBoard, bar_id: &str, text_id: &str) -> bool {
        if !board.has_target(bar_id) || !board.has_target(text_id) {
            tracing::trace!(bar_id, text_id, "progress targets missing");
            return false;
        }
        board.write_width(bar_id, &self.width);
        board.write_text(text_id, &self.label);
        true
    }
}

/// Computes and renders day/year elapsed fractions
#[derive(Clone, Copy, Debug, Default)]
pub struct ProgressTracker {
    host: HostZone,
}

impl ProgressTracker {
    pub fn new(host: HostZone) -> Self {
        ProgressTracker { host }
    }

    /// Elapsed fraction of the host-local calendar day
    pub fn day_progress(&self, instant: Instant) -> TimeLabResult<f64> {
        let today = self.host.wall_clock(instant)?.date();
        let tomorrow = today
            .succ_opt()
            .ok_or(TimeLabError::InstantOutOfRange(instant.as_millis()))?;
        self.fraction(instant, today, tomorrow)
    }

    /// Elapsed fraction of the host-local calendar year
    pub fn year_progress(&self, instant: Instant) -> TimeLabResult<f64> {
        let year = self.host.wall_clock(instant)?.year();
        let out_of_range = || TimeLabError::InstantOutOfRange(instant.as_millis());
        let start = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(out_of_range)?;
        let end = NaiveDate::from_ymd_opt(year + 1, 1, 1).ok_or_else(out_of_range)?;
        self.fraction(instant, start, end)
    }

    fn fraction(&self, instant: Instant, start: NaiveDate, end: NaiveDate) -> TimeLabResult<f64> {
        let start = self.host.resolve_local(start.and_time(chrono::NaiveTime::MIN))?;
        let end = self.host.resolve_local(end.and_time(chrono::NaiveTime::MIN))?;
        let elapsed = instant.millis_since(start) as f64;
        let total = end.millis_since(start) as f64;
        Ok(elapsed / total)
    }

    /// Render both bars
    pub fn render(&self, board: &mut dyn DisplayBoard, instant: Instant) -> TimeLabResult<()> {
        let day = ProgressBar::new(self.day_progress(instant)?, DAY_LABEL);
        let year = ProgressBar::new(self.year_progress(instant)?, YEAR_LABEL);
        day.render(board, targets::DAY_PROGRESS_BAR, targets::DAY_PROGRESS_TEXT);
        year.render(board, targets::YEAR_PROGRESS_BAR, targets::YEAR_PROGRESS_TEXT);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDateTime, TimeZone};
    use chrono_tz::Tz;
    use proptest::prelude::*;
    use timelab_core::MemoryBoard;

    fn tracker(tz: Tz) -> ProgressTracker {
        ProgressTracker::new(HostZone::Fixed(tz))
    }

    fn local(tz: Tz, y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> Instant {
        Instant::from_datetime(&tz.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap())
    }

    #[test]
    fn test_day_progress_at_midnight() {
        let t = tracker(Tz::Asia__Shanghai);
        let midnight = local(Tz::Asia__Shanghai, 2025, 3, 1, 0, 0, 0);
        assert_eq!(t.day_progress(midnight).unwrap(), 0.0);
    }

    #[test]
    fn test_day_progress_noon() {
        let t = tracker(Tz::Asia__Shanghai);
        let noon = local(Tz::Asia__Shanghai, 2025, 3, 1, 12, 0, 0);
        assert_eq!(t.day_progress(noon).unwrap(), 0.5);
    }

    #[test]
    fn test_day_progress_rounding_boundary() {
        let t = tracker(Tz::Asia__Shanghai);
        let next_midnight = local(Tz::Asia__Shanghai, 2025, 3, 2, 0, 0, 0);
        let almost = Instant::from_millis(next_midnight.as_millis() - 1);
        let fraction = t.day_progress(almost).unwrap();
        assert!(fraction < 1.0);
        assert!((fraction - 86_399_999.0 / 86_400_000.0).abs() < 1e-15);

        // 99.9999988% rounds up at both precisions
        let bar = ProgressBar::new(fraction, DAY_LABEL);
        assert_eq!(bar.width, "100.00%");
        assert_eq!(bar.label, "今天已过去 100.0%");

        // Five seconds earlier the bar still reads 99.99
        let earlier = Instant::from_millis(next_midnight.as_millis() - 5_000);
        let bar = ProgressBar::new(t.day_progress(earlier).unwrap(), DAY_LABEL);
        assert_eq!(bar.width, "99.99%");
        assert_eq!(bar.label, "今天已过去 100.0%");
    }

    #[test]
    fn test_day_progress_dst_day() {
        // 2024-03-10 in New York is 23 hours long
        let t = tracker(Tz::America__New_York);
        let noon = local(Tz::America__New_York, 2024, 3, 10, 12, 0, 0);
        let fraction = t.day_progress(noon).unwrap();
        assert!((fraction - 11.0 / 23.0).abs() < 1e-12);
    }

    #[test]
    fn test_year_progress() {
        let t = tracker(Tz::Asia__Shanghai);
        let new_year = local(Tz::Asia__Shanghai, 2025, 1, 1, 0, 0, 0);
        assert_eq!(t.year_progress(new_year).unwrap(), 0.0);

        // 2024 has 366 days; July 2 00:00 is exactly half way
        let half = local(Tz::Asia__Shanghai, 2024, 7, 2, 0, 0, 0);
        assert!((t.year_progress(half).unwrap() - 183.0 / 366.0).abs() < 1e-12);
    }

    #[test]
    fn test_to_fixed_ties_round_up() {
        assert_eq!(to_fixed(0.125, 2), "0.13");
        assert_eq!(to_fixed(12.25, 1), "12.3");
        assert_eq!(to_fixed(2.5, 0), "3");
        // 1.005 is stored below the tie
        assert_eq!(to_fixed(1.005, 2), "1.00");
        assert_eq!(to_fixed(42.0, 2), "42.00");
        assert_eq!(to_fixed(0.0, 1), "0.0");
    }

    #[test]
    fn test_percent_clamped() {
        assert_eq!(to_percent(-0.01), 0.0);
        assert_eq!(to_percent(1.2), 100.0);
        let bar = ProgressBar::new(1.0001, YEAR_LABEL);
        assert_eq!(bar.width, "100.00%");
        assert_eq!(bar.label, "今年已过去 100.0%");
    }

    #[test]
    fn test_render_is_idempotent() {
        let t = tracker(Tz::Asia__Shanghai);
        let now = local(Tz::Asia__Shanghai, 2025, 3, 1, 6, 0, 0);
        let mut board = MemoryBoard::standard();
        t.render(&mut board, now).unwrap();
        let first = board.clone();
        t.render(&mut board, now).unwrap();
        assert_eq!(board, first);
        assert_eq!(board.width(targets::DAY_PROGRESS_BAR), Some("25.00%"));
        assert_eq!(board.text(targets::DAY_PROGRESS_TEXT), Some("今天已过去 25.0%"));
    }

    #[test]
    fn test_render_needs_both_targets() {
        let t = tracker(Tz::Asia__Shanghai);
        let now = local(Tz::Asia__Shanghai, 2025, 3, 1, 6, 0, 0);
        let mut board = MemoryBoard::standard();
        board.remove(targets::YEAR_PROGRESS_TEXT);
        t.render(&mut board, now).unwrap();
        assert_eq!(board.width(targets::YEAR_PROGRESS_BAR), None);
        assert!(board.width(targets::DAY_PROGRESS_BAR).is_some());
    }

    fn parse_width(width: &str) -> f64 {
        width.trim_end_matches('%').parse().unwrap()
    }

    proptest! {
        #[test]
        fn prop_progress_in_unit_range(millis in 0i64..4_102_444_800_000) {
            let t = tracker(Tz::America__New_York);
            let instant = Instant::from_millis(millis);
            let day = t.day_progress(instant).unwrap();
            let year = t.year_progress(instant).unwrap();
            prop_assert!((0.0..1.0).contains(&day));
            prop_assert!((0.0..1.0).contains(&year));
        }

        #[test]
        fn prop_percent_monotonic(a in -0.5f64..1.5, b in -0.5f64..1.5) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let lo_bar = ProgressBar::new(lo, DAY_LABEL);
            let hi_bar = ProgressBar::new(hi, DAY_LABEL);
            prop_assert!(lo_bar.percent <= hi_bar.percent);
            prop_assert!(parse_width(&lo_bar.width) <= parse_width(&hi_bar.width));
            prop_assert!((0.0..=100.0).contains(&parse_width(&hi_bar.width)));
        }
    }

    #[test]
    fn test_midnight_is_zero_everywhere() {
        let t = tracker(Tz::Europe__London);
        for day in 1..=28 {
            let naive = NaiveDateTime::new(
                NaiveDate::from_ymd_opt(2024, 10, day).unwrap(),
                chrono::NaiveTime::MIN,
            );
            let midnight = HostZone::Fixed(Tz::Europe__London)
                .resolve_local(naive)
                .unwrap();
            assert_eq!(t.day_progress(midnight).unwrap(), 0.0);
        }
    }
}
