//! Date library adapters
//!
//! Each adapter wraps one third-party date library behind [`DateLibrary`], so
//! the example blocks can run the same operation against all of them.

pub mod functional;
pub mod wrapper;
pub mod zoned;

pub use functional::FunctionalLibrary;
pub use wrapper::WrapperLibrary;
pub use zoned::ZonedLibrary;

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Calendar fields read from a value (month is 1-based in every library)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fields {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

/// Period used by start/end-of and same-period queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Year,
    Month,
    Week,
    Day,
}

/// Fixed output layouts, each expressed in the library's own pattern syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// `2021-01-01`
    Date,
    /// `2021-01-01T12:00:00`
    DateTime,
    /// ja-JP numeric date: `2021/1/1`
    Localized,
}

/// An immutable, comparable point in time produced by a date library
pub trait DateLibrary {
    /// The library's date/time value
    type Value: Clone + Ord + fmt::Debug;
    /// The library's time-of-day value
    type Time: fmt::Display;

    /// Short label used in block names
    fn name(&self) -> &'static str;

    /// Current instant in the configured zone
    fn now(&self) -> Result<Self::Value>;

    /// Move forward by calendar days, keeping the wall-clock time
    fn add_days(&self, value: &Self::Value, days: i64) -> Result<Self::Value>;

    /// Move backward by calendar days, keeping the wall-clock time
    fn subtract_days(&self, value: &Self::Value, days: i64) -> Result<Self::Value>;

    /// Read calendar fields
    fn fields(&self, value: &Self::Value) -> Fields;

    /// Parse `YYYY-MM-DD` as the start of that day in the configured zone
    fn parse_date(&self, input: &str) -> Result<Self::Value>;

    /// Parse `HH:MM:SS`
    fn parse_time(&self, input: &str) -> Result<Self::Time>;

    /// Parse `YYYY-MM-DDTHH:MM:SS` as a wall-clock time in the configured zone
    fn parse_datetime(&self, input: &str) -> Result<Self::Value>;

    /// First instant of the period containing `value`
    fn start_of(&self, value: &Self::Value, period: Period) -> Result<Self::Value>;

    /// Last millisecond of the period containing `value`
    fn end_of(&self, value: &Self::Value, period: Period) -> Result<Self::Value>;

    /// Format with one of the fixed layouts
    fn format(&self, value: &Self::Value, layout: Layout) -> Result<String>;

    /// The library's canonical string form
    fn render(&self, value: &Self::Value) -> Result<String>;

    /// Signed difference `a - b` in milliseconds
    fn diff_millis(&self, a: &Self::Value, b: &Self::Value) -> i64;

    /// Whether both values fall in the same period
    fn is_same(&self, a: &Self::Value, b: &Self::Value, period: Period) -> Result<bool> {
        Ok(self.start_of(a, period)? == self.start_of(b, period)?)
    }
}

/// Selectable library, in report order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryKind {
    Jiff,
    Chrono,
    Time,
}

impl LibraryKind {
    /// Every library, in report order
    pub const ALL: [LibraryKind; 3] = [LibraryKind::Jiff, LibraryKind::Chrono, LibraryKind::Time];

    pub fn name(&self) -> &'static str {
        match self {
            LibraryKind::Jiff => zoned::NAME,
            LibraryKind::Chrono => wrapper::NAME,
            LibraryKind::Time => functional::NAME,
        }
    }
}

impl FromStr for LibraryKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        LibraryKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownName {
                kind: "library",
                name: s.to_string(),
            })
    }
}

impl fmt::Display for LibraryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
