//! Simulated time.
//!
//! `Time` is an opaque point on the simulated timeline and `Duration` a
//! signed delta between two points. Both count whole seconds, which is
//! finer than anything the delivery network needs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub};

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 60 * SECONDS_PER_MINUTE;

/// A signed span of simulated time.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Duration(i64);

impl Duration {
    /// The empty span.
    pub const ZERO: Self = Duration(0);

    /// Create a duration from whole minutes.
    pub const fn minutes(minutes: i64) -> Self {
        Duration(minutes * SECONDS_PER_MINUTE)
    }

    /// Create a duration from whole hours.
    pub const fn hours(hours: i64) -> Self {
        Duration(hours * SECONDS_PER_HOUR)
    }

    /// Create a duration from fractional hours, rounded to the nearest second.
    pub fn from_hours_f64(hours: f64) -> Self {
        Duration((hours * SECONDS_PER_HOUR as f64).round() as i64)
    }

    /// Express the duration in (fractional) hours.
    pub fn as_hours_f64(&self) -> f64 {
        self.0 as f64 / SECONDS_PER_HOUR as f64
    }

    /// Check if this is the empty span.
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Check if this span points backwards in time.
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Add two spans, or `None` if the result does not fit.
    pub fn checked_add(self, rhs: Duration) -> Option<Duration> {
        self.0.checked_add(rhs.0).map(Duration)
    }
}

impl Add for Duration {
    type Output = Duration;

    fn add(self, rhs: Duration) -> Duration {
        Duration(self.0 + rhs.0)
    }
}

impl AddAssign for Duration {
    fn add_assign(&mut self, rhs: Duration) {
        self.0 += rhs.0;
    }
}

impl Sub for Duration {
    type Output = Duration;

    fn sub(self, rhs: Duration) -> Duration {
        Duration(self.0 - rhs.0)
    }
}

impl Neg for Duration {
    type Output = Duration;

    fn neg(self) -> Duration {
        Duration(-self.0)
    }
}

impl Sum for Duration {
    fn sum<I: Iterator<Item = Duration>>(iter: I) -> Duration {
        iter.fold(Duration::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Duration> for Duration {
    fn sum<I: Iterator<Item = &'a Duration>>(iter: I) -> Duration {
        iter.copied().sum()
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let total = self.0.unsigned_abs();
        let hours = total / SECONDS_PER_HOUR as u64;
        let minutes = (total % SECONDS_PER_HOUR as u64) / SECONDS_PER_MINUTE as u64;
        if minutes == 0 {
            write!(f, "{sign}{hours}h")
        } else {
            write!(f, "{sign}{hours}h{minutes:02}m")
        }
    }
}

/// A point on the simulated timeline.
///
/// Only differences between points are meaningful; a run usually starts
/// at [`Time::EPOCH`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Time(i64);

impl Time {
    /// Start of the simulated timeline.
    pub const EPOCH: Self = Time(0);

    /// Move forward by `delta`, or `None` if the timeline would overflow.
    pub fn checked_add(self, delta: Duration) -> Option<Time> {
        self.0.checked_add(delta.0).map(Time)
    }
}

impl Add<Duration> for Time {
    type Output = Time;

    fn add(self, rhs: Duration) -> Time {
        Time(self.0 + rhs.0)
    }
}

impl AddAssign<Duration> for Time {
    fn add_assign(&mut self, rhs: Duration) {
        self.0 += rhs.0;
    }
}

impl Sub<Duration> for Time {
    type Output = Time;

    fn sub(self, rhs: Duration) -> Time {
        Time(self.0 - rhs.0)
    }
}

impl Sub for Time {
    type Output = Duration;

    fn sub(self, rhs: Time) -> Duration {
        Duration(self.0 - rhs.0)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let total = self.0.unsigned_abs();
        let hours = total / SECONDS_PER_HOUR as u64;
        let minutes = (total % SECONDS_PER_HOUR as u64) / SECONDS_PER_MINUTE as u64;
        write!(f, "{sign}{hours:02}:{minutes:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_arithmetic() {
        let start = Time::EPOCH;
        let later = start + Duration::hours(5);

        assert!(later > start);
        assert_eq!(later - start, Duration::hours(5));
        assert_eq!(start - later, -Duration::hours(5));
        assert_eq!(later - Duration::hours(5), start);
    }

    #[test]
    fn test_checked_add_detects_overflow() {
        let far = Time::EPOCH + Duration::from_hours_f64(2e15);
        assert_eq!(
            Time::EPOCH.checked_add(Duration::hours(1)),
            Some(Time::EPOCH + Duration::hours(1))
        );
        assert_eq!(far.checked_add(Duration::from_hours_f64(2e15)), None);
        assert_eq!(
            Duration::from_hours_f64(2e15).checked_add(Duration::from_hours_f64(2e15)),
            None
        );
    }

    #[test]
    fn test_duration_sum_of_empty_is_zero() {
        let none: Vec<Duration> = Vec::new();
        assert_eq!(none.iter().sum::<Duration>(), Duration::ZERO);

        let legs = [Duration::hours(1), Duration::hours(4)];
        assert_eq!(legs.iter().sum::<Duration>(), Duration::hours(5));
    }

    #[test]
    fn test_fractional_hours() {
        assert_eq!(Duration::from_hours_f64(1.5), Duration::minutes(90));
        assert_eq!(Duration::minutes(90).as_hours_f64(), 1.5);
        assert!(Duration::hours(-1).is_negative());
    }

    #[test]
    fn test_display() {
        assert_eq!(Duration::hours(6).to_string(), "6h");
        assert_eq!(Duration::minutes(75).to_string(), "1h15m");
        assert_eq!((Time::EPOCH + Duration::hours(29)).to_string(), "29:00");
        assert_eq!((Time::EPOCH + Duration::minutes(5)).to_string(), "00:05");
    }
}
