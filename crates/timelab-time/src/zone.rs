//! Zone resolution
//!
//! Named zones come from the compiled IANA database in `chrono-tz`. The
//! host zone is either the operating system's local zone or a fixed named
//! zone, which keeps headless hosts and tests deterministic.

use chrono::{DateTime, LocalResult, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

use timelab_core::{Instant, TimeLabError, TimeLabResult, LOCAL_SELECTION};

/// Selection value for the operating system zone in configuration files
pub const SYSTEM_ZONE: &str = "system";

/// Resolve an IANA identifier, ignoring case, failing on anything unknown
pub fn resolve_zone(id: &str) -> TimeLabResult<Tz> {
    id.parse::<Tz>()
        .or_else(|_| Tz::from_str_insensitive(id))
        .map_err(|_| TimeLabError::UnsupportedTimezone(id.to_string()))
}

/// The zone treated as "local"
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum HostZone {
    /// Operating system local zone
    #[default]
    System,
    /// Fixed zone standing in for the host
    Fixed(Tz),
}

impl HostZone {
    /// `"system"` or `"local"` select the OS zone, anything else must be
    /// an IANA identifier
    pub fn parse(value: &str) -> TimeLabResult<Self> {
        let value = value.trim();
        if value == SYSTEM_ZONE || value == LOCAL_SELECTION {
            Ok(HostZone::System)
        } else {
            resolve_zone(value).map(HostZone::Fixed)
        }
    }

    /// Wall-clock reading of `instant` in this zone
    pub fn wall_clock(&self, instant: Instant) -> TimeLabResult<NaiveDateTime> {
        let utc = instant.to_utc()?;
        Ok(match self {
            HostZone::System => wall_clock_in(&chrono::Local, &utc),
            HostZone::Fixed(tz) => wall_clock_in(tz, &utc),
        })
    }

    /// Instant at which this zone's wall clock reads `naive`
    pub fn resolve_local(&self, naive: NaiveDateTime) -> TimeLabResult<Instant> {
        match self {
            HostZone::System => resolve_in(&chrono::Local, naive),
            HostZone::Fixed(tz) => resolve_in(tz, naive),
        }
    }

    pub fn name(&self) -> String {
        match self {
            HostZone::System => SYSTEM_ZONE.to_string(),
            HostZone::Fixed(tz) => tz.name().to_string(),
        }
    }
}

pub(crate) fn wall_clock_in<T: TimeZone>(tz: &T, utc: &DateTime<Utc>) -> NaiveDateTime {
    utc.with_timezone(tz).naive_local()
}

/// Ambiguous readings (clocks turned back) take the earlier instant.
/// Readings inside a gap (clocks turned forward) use the offset in effect
/// before the gap, which lands the same distance past it.
pub(crate) fn resolve_in<T: TimeZone>(tz: &T, naive: NaiveDateTime) -> TimeLabResult<Instant> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(Instant::from_datetime(&dt)),
        LocalResult::Ambiguous(earliest, _) => Ok(Instant::from_datetime(&earliest)),
        LocalResult::None => {
            let out_of_range = || TimeLabError::InvalidDate(naive.to_string());
            let probe = naive
                .checked_sub_signed(chrono::Duration::days(1))
                .ok_or_else(out_of_range)?;
            let offset = tz
                .offset_from_local_datetime(&probe)
                .earliest()
                .ok_or_else(out_of_range)?
                .fix();
            let utc = naive
                .checked_sub_signed(chrono::Duration::seconds(i64::from(
                    offset.local_minus_utc(),
                )))
                .ok_or_else(out_of_range)?;
            Ok(Instant::from_datetime(&Utc.from_utc_datetime(&utc)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn naive(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    fn utc_millis(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> i64 {
        Utc.from_utc_datetime(&naive(y, mo, d, h, mi))
            .timestamp_millis()
    }

    #[test]
    fn test_resolve_zone() {
        assert_eq!(resolve_zone("Asia/Tokyo").unwrap(), Tz::Asia__Tokyo);
        assert_eq!(resolve_zone("asia/tokyo").unwrap(), Tz::Asia__Tokyo);
        assert_eq!(resolve_zone("AMERICA/NEW_YORK").unwrap(), Tz::America__New_York);
        assert_eq!(
            resolve_zone("Mars/Olympus_Mons"),
            Err(TimeLabError::UnsupportedTimezone("Mars/Olympus_Mons".into()))
        );
    }

    #[test]
    fn test_host_zone_parse() {
        assert_eq!(HostZone::parse("system").unwrap(), HostZone::System);
        assert_eq!(HostZone::parse("local").unwrap(), HostZone::System);
        assert_eq!(
            HostZone::parse("Europe/London").unwrap(),
            HostZone::Fixed(Tz::Europe__London)
        );
        assert!(HostZone::parse("Nowhere").is_err());
        assert_eq!(HostZone::Fixed(Tz::Asia__Tokyo).name(), "Asia/Tokyo");
    }

    #[test]
    fn test_wall_clock_roundtrip() {
        let host = HostZone::Fixed(Tz::Asia__Shanghai);
        let instant = host.resolve_local(naive(2025, 6, 15, 0, 0)).unwrap();
        assert_eq!(instant.as_millis(), utc_millis(2025, 6, 14, 16, 0));
        assert_eq!(host.wall_clock(instant).unwrap(), naive(2025, 6, 15, 0, 0));
    }

    #[test]
    fn test_resolve_in_dst_gap() {
        // 02:30 does not exist on 2024-03-10 in New York; it becomes 03:30 EDT
        let host = HostZone::Fixed(Tz::America__New_York);
        let instant = host.resolve_local(naive(2024, 3, 10, 2, 30)).unwrap();
        assert_eq!(instant.as_millis(), utc_millis(2024, 3, 10, 7, 30));
        assert_eq!(host.wall_clock(instant).unwrap(), naive(2024, 3, 10, 3, 30));
    }

    #[test]
    fn test_resolve_ambiguous_takes_earlier() {
        // 01:30 happens twice on 2024-11-03 in New York
        let host = HostZone::Fixed(Tz::America__New_York);
        let instant = host.resolve_local(naive(2024, 11, 3, 1, 30)).unwrap();
        assert_eq!(instant.as_millis(), utc_millis(2024, 11, 3, 5, 30));
    }
}
