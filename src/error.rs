//! Error types for the date comparison harness

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the date comparison harness
#[derive(Error, Debug)]
pub enum Error {
    /// Error raised by jiff (parsing, arithmetic, time zone lookup)
    #[error("jiff error: {0}")]
    Jiff(#[from] jiff::Error),

    /// chrono parsing error
    #[error("chrono parse error: {0}")]
    ChronoParse(#[from] chrono::ParseError),

    /// time parsing error
    #[error("time parse error: {0}")]
    TimeParse(#[from] time::error::Parse),

    /// time formatting error
    #[error("time format error: {0}")]
    TimeFormat(#[from] time::error::Format),

    /// time component out of range
    #[error("time component out of range: {0}")]
    TimeRange(#[from] time::error::ComponentRange),

    /// IO error while writing the report
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Unknown IANA time zone name
    #[error("Unknown time zone: {0}")]
    InvalidTimeZone(String),

    /// Malformed instant used to freeze the clock
    #[error("Invalid instant: {0}")]
    InvalidInstant(String),

    /// Date arithmetic left the supported range
    #[error("Date arithmetic out of range: {0}")]
    OutOfRange(String),

    /// Wall-clock time skipped by a time zone transition
    #[error("Local time {0} does not exist in {1}")]
    NonexistentLocalTime(String, String),

    /// Unknown library or category name
    #[error("Unknown {kind}: {name}")]
    UnknownName { kind: &'static str, name: String },
}
