//! Time primitives for TimeLab
//!
//! Every tick captures a single [`Instant`] from the host clock; all
//! rendering for that tick is derived from it.

use std::ops::{Add, Sub};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};

use crate::{TimeLabError, TimeLabResult};

/// Absolute point in time.
/// Represented as milliseconds since the Unix epoch
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Instant(pub i64);

impl Instant {
    pub const EPOCH: Instant = Instant(0);

    /// Capture the current host clock
    pub fn now() -> Self {
        Instant(Utc::now().timestamp_millis())
    }

    #[inline]
    pub fn from_millis(millis: i64) -> Self {
        Instant(millis)
    }

    #[inline]
    pub fn from_secs(secs: i64) -> Self {
        Instant(secs * 1000)
    }

    #[inline]
    pub fn as_millis(self) -> i64 {
        self.0
    }

    #[inline]
    pub fn from_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> Self {
        Instant(dt.timestamp_millis())
    }

    /// Convert to a UTC date-time
    pub fn to_utc(self) -> TimeLabResult<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp_millis(self.0)
            .ok_or(TimeLabError::InstantOutOfRange(self.0))
    }

    /// Signed distance from `earlier` to `self` in milliseconds
    #[inline]
    pub fn millis_since(self, earlier: Instant) -> i64 {
        self.0.saturating_sub(earlier.0)
    }

    #[inline]
    pub fn saturating_add(self, duration: Duration) -> Self {
        Instant(self.0.saturating_add(clamp_millis(duration)))
    }

    #[inline]
    pub fn saturating_sub(self, duration: Duration) -> Self {
        Instant(self.0.saturating_sub(clamp_millis(duration)))
    }
}

fn clamp_millis(duration: Duration) -> i64 {
    i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
}

impl Add<Duration> for Instant {
    type Output = Instant;

    #[inline]
    fn add(self, rhs: Duration) -> Self::Output {
        self.saturating_add(rhs)
    }
}

impl Sub<Duration> for Instant {
    type Output = Instant;

    #[inline]
    fn sub(self, rhs: Duration) -> Self::Output {
        self.saturating_sub(rhs)
    }
}

impl Sub<Instant> for Instant {
    type Output = Duration;

    /// Unsigned elapsed duration, zero if `rhs` is later
    #[inline]
    fn sub(self, rhs: Instant) -> Self::Output {
        let diff = self.millis_since(rhs);
        if diff >= 0 {
            Duration::from_millis(diff as u64)
        } else {
            Duration::ZERO
        }
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Instant {
    fn from(dt: DateTime<Tz>) -> Self {
        Instant::from_datetime(&dt)
    }
}

impl std::fmt::Debug for Instant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match DateTime::<Utc>::from_timestamp_millis(self.0) {
            Some(dt) => write!(f, "Instant({})", dt.format("%Y-%m-%dT%H:%M:%S%.3fZ")),
            None => write!(f, "Instant({}ms)", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instant_utc_conversion() {
        let dt = Utc.with_ymd_and_hms(2024, 12, 31, 23, 0, 0).unwrap();
        let instant = Instant::from_datetime(&dt);
        assert_eq!(instant.as_millis(), 1_735_686_000_000);
        assert_eq!(instant.to_utc().unwrap(), dt);
    }

    #[test]
    fn test_instant_out_of_range() {
        assert_eq!(
            Instant(i64::MAX).to_utc(),
            Err(TimeLabError::InstantOutOfRange(i64::MAX))
        );
    }

    #[test]
    fn test_instant_arithmetic() {
        let a = Instant::from_secs(10);
        let b = a + Duration::from_millis(1500);
        assert_eq!(b.as_millis(), 11_500);
        assert_eq!(b - a, Duration::from_millis(1500));
        // Unsigned subtraction saturates at zero
        assert_eq!(a - b, Duration::ZERO);
        assert_eq!(a.millis_since(b), -1500);
        assert_eq!(b.saturating_sub(Duration::from_millis(1500)), a);
    }

    #[test]
    fn test_duration_arithmetic_saturates() {
        let huge = Duration::from_secs(u64::MAX);
        assert_eq!(Instant::from_secs(1) + huge, Instant(i64::MAX));
        assert_eq!(Instant::from_secs(-1) - huge, Instant(i64::MIN));
        assert_eq!(Instant(i64::MAX - 1) + Duration::from_millis(5), Instant(i64::MAX));
    }

    proptest::proptest! {
        #[test]
        fn prop_unsigned_sub_agrees_with_signed(a in -1_000_000_000_000i64..1_000_000_000_000, b in -1_000_000_000_000i64..1_000_000_000_000) {
            let (a, b) = (Instant(a), Instant(b));
            let signed = a.millis_since(b);
            let unsigned = (a - b).as_millis() as i64;
            proptest::prop_assert_eq!(unsigned, signed.max(0));
            proptest::prop_assert_eq!(b.millis_since(a), -signed);
        }
    }

    #[test]
    fn test_instant_debug() {
        assert_eq!(
            format!("{:?}", Instant::from_millis(1)),
            "Instant(1970-01-01T00:00:00.001Z)"
        );
    }
}
