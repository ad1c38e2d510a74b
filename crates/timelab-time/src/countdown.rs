//! Countdown to (or since) a user-chosen instant
//!
//! Input parsing is deliberately permissive: every date/time component is
//! coerced numerically and a zero, empty or unparsable month, day, hour or
//! minute silently takes its default (1, 1, 0, 0). Only an empty date or an
//! unusable year is rejected.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use timelab_core::{targets, DisplayBoard, Instant, TimeLabError, TimeLabResult};

use crate::zone::HostZone;

pub const UNTIL_LABEL: &str = "距离那一刻还有：";
pub const SINCE_LABEL: &str = "那一刻已经过去：";

/// Time used when none is submitted
pub const DEFAULT_TIME: &str = "00:00";

const SECS_PER_DAY: i64 = 86_400;
const SECS_PER_HOUR: i64 = 3_600;
const SECS_PER_MINUTE: i64 = 60;

/// Whether the target is still ahead or already behind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CountdownDirection {
    Until,
    Since,
}

impl CountdownDirection {
    pub fn label(self) -> &'static str {
        match self {
            CountdownDirection::Until => UNTIL_LABEL,
            CountdownDirection::Since => SINCE_LABEL,
        }
    }
}

/// Signed distance to the target decomposed into whole units
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CountdownReading {
    pub direction: CountdownDirection,
    /// `target - now` in milliseconds
    pub diff_millis: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl CountdownReading {
    pub fn between(target: Instant, now: Instant) -> Self {
        let diff_millis = target.millis_since(now);
        let direction = if diff_millis >= 0 {
            CountdownDirection::Until
        } else {
            CountdownDirection::Since
        };
        let total = (diff_millis.unsigned_abs() / 1000) as i64;
        CountdownReading {
            direction,
            diff_millis,
            days: total / SECS_PER_DAY,
            hours: (total % SECS_PER_DAY) / SECS_PER_HOUR,
            minutes: (total % SECS_PER_HOUR) / SECS_PER_MINUTE,
            seconds: total % SECS_PER_MINUTE,
        }
    }

    /// Whole seconds covered by the decomposition
    pub fn total_seconds(&self) -> i64 {
        self.days * SECS_PER_DAY
            + self.hours * SECS_PER_HOUR
            + self.minutes * SECS_PER_MINUTE
            + self.seconds
    }

    pub fn label(&self) -> &'static str {
        self.direction.label()
    }

    pub fn detail(&self) -> String {
        format!(
            "{} 天 {} 小时 {} 分钟 {} 秒",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

/// Holds the single countdown target
#[derive(Clone, Debug, Default)]
pub struct CountdownTracker {
    host: HostZone,
    target: Option<Instant>,
}

impl CountdownTracker {
    pub fn new(host: HostZone) -> Self {
        CountdownTracker { host, target: None }
    }

    pub fn target(&self) -> Option<Instant> {
        self.target
    }

    pub fn has_target(&self) -> bool {
        self.target.is_some()
    }

    /// Parse `date` (`YYYY-MM-DD`) and `time` (`HH:MM`, midnight if absent)
    /// as host-local wall-clock time and replace the target.
    /// On error the previous target is kept
    pub fn set_target(&mut self, date: &str, time: Option<&str>) -> TimeLabResult<Instant> {
        let naive = parse_wall_clock(date, time)?;
        let target = self.host.resolve_local(naive)?;
        tracing::info!(%naive, instant = ?target, "countdown target set");
        self.target = Some(target);
        Ok(target)
    }

    /// Current reading, if a target is set
    pub fn snapshot(&self, now: Instant) -> Option<CountdownReading> {
        self.target
            .map(|target| CountdownReading::between(target, now))
    }

    /// Write label and detail. Without a target, or if either display
    /// target is missing, the board is left untouched
    pub fn render(&self, board: &mut dyn DisplayBoard, now: Instant) -> bool {
        let Some(reading) = self.snapshot(now) else {
            return false;
        };
        if !board.has_target(targets::COUNTDOWN_LABEL)
            || !board.has_target(targets::COUNTDOWN_DETAIL)
        {
            tracing::trace!("countdown targets missing");
            return false;
        }
        board.write_text(targets::COUNTDOWN_LABEL, reading.label());
        board.write_text(targets::COUNTDOWN_DETAIL, &reading.detail());
        true
    }
}

/// Numeric coercion of one split component: absent is NaN
fn coerce(component: Option<&str>) -> f64 {
    component.map_or(f64::NAN, to_number)
}

/// Script-style `Number(text)`.
///
/// Blank text is zero. Besides plain decimals only the exact spellings
/// `Infinity`/`+Infinity`/`-Infinity` and unsigned `0x`, `0o` or `0b`
/// literals are numbers; anything else is NaN.
fn to_number(text: &str) -> f64 {
    let text = text.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    match text {
        "" => return 0.0,
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    let radix = match text.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return radix_literal(&text[2..], radix);
    }
    // Keeps `inf`, `nan` and friends away from the float parser
    let decimal = text
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));
    if decimal {
        text.parse().unwrap_or(f64::NAN)
    } else {
        f64::NAN
    }
}

fn radix_literal(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    digits
        .chars()
        .try_fold(0.0, |acc: f64, c| {
            c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
        })
        .unwrap_or(f64::NAN)
}

/// Zero and NaN fall back to `default`
fn or_default(value: f64, default: f64) -> f64 {
    if value == 0.0 || value.is_nan() {
        default
    } else {
        value
    }
}

/// Truncate toward zero, `None` if the value has no whole-number reading
fn whole(value: f64) -> Option<i64> {
    (value.is_finite() && value.abs() < i64::MAX as f64).then(|| value.trunc() as i64)
}

/// Build the wall-clock reading for a submitted date and time.
///
/// Out-of-range month/day/hour/minute values roll over into the next unit
/// (month 13 is January of the following year). Years 0-99 are read as
/// 1900-1999. Results outside chrono's calendar are `InvalidDate`.
pub fn parse_wall_clock(date: &str, time: Option<&str>) -> TimeLabResult<NaiveDateTime> {
    if date.is_empty() {
        return Err(TimeLabError::EmptyDate);
    }
    let time = time.filter(|t| !t.is_empty()).unwrap_or(DEFAULT_TIME);
    let invalid = || TimeLabError::InvalidDate(format!("{} {}", date, time));

    let mut date_parts = date.split('-');
    let year = coerce(date_parts.next());
    // Offset applied before truncation, so 0.5 is still January
    let month0 = or_default(coerce(date_parts.next()), 1.0) - 1.0;
    let day = or_default(coerce(date_parts.next()), 1.0);

    let mut time_parts = time.split(':');
    let hour = or_default(coerce(time_parts.next()), 0.0);
    let minute = or_default(coerce(time_parts.next()), 0.0);

    let mut year = whole(year).ok_or_else(invalid)?;
    if (0..=99).contains(&year) {
        year += 1900;
    }
    let month0 = whole(month0).ok_or_else(invalid)?;
    let day = whole(day).ok_or_else(invalid)?;
    let hour = whole(hour).ok_or_else(invalid)?;
    let minute = whole(minute).ok_or_else(invalid)?;

    let year = year
        .checked_add(month0.div_euclid(12))
        .and_then(|y| i32::try_from(y).ok())
        .ok_or_else(invalid)?;
    let month = (month0.rem_euclid(12) + 1) as u32;

    // Day, hour and minute may cancel out, so they are summed before the
    // range check
    let minutes = (i128::from(day) - 1) * 1440 + i128::from(hour) * 60 + i128::from(minute);
    let offset = i64::try_from(minutes)
        .ok()
        .and_then(chrono::Duration::try_minutes)
        .ok_or_else(invalid)?;

    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|first| first.and_time(NaiveTime::MIN))
        .and_then(|dt| dt.checked_add_signed(offset))
        .ok_or_else(invalid)
}
