//! Harness configuration
//!
//! Holds the time zone every library works in, the clock that "now" is read
//! from, and the first day of the week used by start/end-of-week.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{Error, Result};

/// Default zone, matching the ja-JP setup the comparison was written for
pub const DEFAULT_TIME_ZONE: &str = "Asia/Tokyo";

/// Source of the "current" instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clock {
    /// Read the system clock on every call
    System,
    /// Frozen at a fixed instant, in milliseconds since the Unix epoch
    Fixed(i64),
}

impl Clock {
    /// Freeze the clock at an RFC 3339 instant such as `2024-11-20T09:30:00Z`
    pub fn fixed_at(instant: &str) -> Result<Self> {
        let parsed = DateTime::parse_from_rfc3339(instant.trim())
            .map_err(|e| Error::InvalidInstant(format!("{}: {}", instant, e)))?;
        Ok(Clock::Fixed(parsed.timestamp_millis()))
    }

    /// Current instant in milliseconds since the Unix epoch
    pub fn now_millis(&self) -> i64 {
        match self {
            Clock::System => Utc::now().timestamp_millis(),
            Clock::Fixed(millis) => *millis,
        }
    }
}

/// First day of the week for start/end-of-week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeekStart {
    /// Weeks run Sunday..Saturday (ja-JP, en-US)
    #[default]
    Sunday,
    /// Weeks run Monday..Sunday (ISO 8601)
    Monday,
}

impl FromStr for WeekStart {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sunday" | "sun" => Ok(WeekStart::Sunday),
            "monday" | "mon" => Ok(WeekStart::Monday),
            _ => Err(Error::UnknownName {
                kind: "week start",
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for WeekStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeekStart::Sunday => f.write_str("sunday"),
            WeekStart::Monday => f.write_str("monday"),
        }
    }
}

/// Settings shared by every library adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// IANA time zone name, e.g. `Asia/Tokyo`
    pub time_zone: String,
    /// Where "now" comes from
    pub clock: Clock,
    /// First day of the week
    pub week_start: WeekStart,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            time_zone: DEFAULT_TIME_ZONE.to_string(),
            clock: Clock::System,
            week_start: WeekStart::default(),
        }
    }
}

impl HarnessConfig {
    /// Resolve the configured zone through the chrono-tz database
    pub fn tz(&self) -> Result<Tz> {
        parse_tz(&self.time_zone)
    }

    /// UTC offset of the configured zone at the clock's current instant
    ///
    /// Used by libraries that only understand fixed offsets.
    pub fn utc_offset_seconds(&self) -> Result<i32> {
        let tz = self.tz()?;
        let millis = self.clock.now_millis();
        let at = DateTime::from_timestamp_millis(millis)
            .ok_or_else(|| Error::OutOfRange(format!("{} ms since epoch", millis)))?;
        Ok(tz.offset_from_utc_datetime(&at.naive_utc()).fix().local_minus_utc())
    }
}

/// Parse an IANA zone name (case-sensitive, as in the tz database)
pub fn parse_tz(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| Error::InvalidTimeZone(name.to_string()))
}
