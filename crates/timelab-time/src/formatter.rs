//! Localized time and date formatting
//!
//! Output follows zh-CN conventions: `2024/12/31周二 23:00:00` for a full
//! date-time, `23:00:00` for the default time-only fields.

use chrono::{Datelike, NaiveDateTime, Timelike};

use timelab_core::{Instant, TimeLabResult};

use crate::zone::{resolve_zone, wall_clock_in, HostZone};

const WEEKDAYS_SHORT: [&str; 7] = ["周一", "周二", "周三", "周四", "周五", "周六", "周日"];

/// Which fields appear in formatted output
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FormatFields {
    pub year: bool,
    pub month: bool,
    pub day: bool,
    pub weekday: bool,
    pub hour: bool,
    pub minute: bool,
    pub second: bool,
    /// 12-hour clock with 上午/下午 prefix
    pub hour12: bool,
}

impl FormatFields {
    /// Hour, minute, second on a 24-hour clock
    pub const fn time() -> Self {
        FormatFields {
            year: false,
            month: false,
            day: false,
            weekday: false,
            hour: true,
            minute: true,
            second: true,
            hour12: false,
        }
    }

    /// Time fields plus year, month, day and short weekday
    pub const fn date_time() -> Self {
        Self::time().with_date().with_weekday()
    }

    pub const fn with_date(mut self) -> Self {
        self.year = true;
        self.month = true;
        self.day = true;
        self
    }

    pub const fn with_weekday(mut self) -> Self {
        self.weekday = true;
        self
    }

    pub const fn with_hour12(mut self, hour12: bool) -> Self {
        self.hour12 = hour12;
        self
    }

    pub const fn without_time(mut self) -> Self {
        self.hour = false;
        self.minute = false;
        self.second = false;
        self
    }

    fn has_date(&self) -> bool {
        self.year || self.month || self.day
    }

    fn has_time(&self) -> bool {
        self.hour || self.minute || self.second
    }
}

impl Default for FormatFields {
    fn default() -> Self {
        Self::time()
    }
}

/// Formats instants in the host zone or a named zone
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Formatter {
    host: HostZone,
}

impl Formatter {
    pub fn new(host: HostZone) -> Self {
        Formatter { host }
    }

    pub fn host(&self) -> HostZone {
        self.host
    }

    /// Format `instant` in `zone` (host zone if `None`).
    /// Unknown zone identifiers are an error, never a fallback
    pub fn format(
        &self,
        instant: Instant,
        zone: Option<&str>,
        fields: &FormatFields,
    ) -> TimeLabResult<String> {
        let wall = match zone {
            None => self.host.wall_clock(instant)?,
            Some(id) => {
                let tz = resolve_zone(id)?;
                wall_clock_in(&tz, &instant.to_utc()?)
            }
        };
        Ok(render_fields(&wall, fields))
    }

    /// Default time-only output
    pub fn format_time(&self, instant: Instant, zone: Option<&str>) -> TimeLabResult<String> {
        self.format(instant, zone, &FormatFields::time())
    }
}

fn render_fields(wall: &NaiveDateTime, fields: &FormatFields) -> String {
    let mut out = String::new();

    if fields.has_date() {
        let mut parts = Vec::with_capacity(3);
        if fields.year {
            parts.push(wall.year().to_string());
        }
        if fields.month {
            parts.push(format!("{:02}", wall.month()));
        }
        if fields.day {
            parts.push(format!("{:02}", wall.day()));
        }
        out.push_str(&parts.join("/"));
    }

    if fields.weekday {
        out.push_str(WEEKDAYS_SHORT[wall.weekday().num_days_from_monday() as usize]);
    }

    if fields.has_time() {
        if !out.is_empty() {
            out.push(' ');
        }
        let mut parts = Vec::with_capacity(3);
        if fields.hour {
            let hour = if fields.hour12 {
                let (pm, h12) = wall.hour12();
                out.push_str(if pm { "下午" } else { "上午" });
                h12
            } else {
                wall.hour()
            };
            parts.push(format!("{:02}", hour));
        }
        if fields.minute {
            parts.push(format!("{:02}", wall.minute()));
        }
        if fields.second {
            parts.push(format!("{:02}", wall.second()));
        }
        out.push_str(&parts.join(":"));
    }

    out
}
