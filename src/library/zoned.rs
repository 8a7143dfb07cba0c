//! Time-zone-aware calendar adapter backed by jiff
//!
//! Values are `Zoned`: a timestamp plus an IANA time zone from jiff's bundled
//! tz database, so arithmetic and period boundaries follow the zone's rules.

use jiff::civil::{Date, DateTime, Time};
use jiff::fmt::strtime;
use jiff::tz::TimeZone;
use jiff::{Span, Timestamp, Zoned};

use super::{DateLibrary, Fields, Layout, Period};
use crate::config::{Clock, HarnessConfig, WeekStart};
use crate::error::{Error, Result};

pub const NAME: &str = "jiff";

/// jiff adapter
#[derive(Debug, Clone)]
pub struct ZonedLibrary {
    tz: TimeZone,
    clock: Clock,
    week_start: WeekStart,
}

impl ZonedLibrary {
    pub fn new(config: &HarnessConfig) -> Result<Self> {
        let tz = TimeZone::get(config.time_zone.trim())
            .map_err(|_| Error::InvalidTimeZone(config.time_zone.clone()))?;
        Ok(Self {
            tz,
            clock: config.clock,
            week_start: config.week_start,
        })
    }

    /// Civil date on which the period containing `date` begins
    fn period_start(&self, date: Date, period: Period) -> Result<Date> {
        let start = match period {
            Period::Year => Date::new(date.year(), 1, 1)?,
            Period::Month => Date::new(date.year(), date.month(), 1)?,
            Period::Week => {
                let back = match self.week_start {
                    WeekStart::Sunday => date.weekday().to_sunday_zero_offset(),
                    WeekStart::Monday => date.weekday().to_monday_zero_offset(),
                };
                date.checked_sub(Span::new().days(back))?
            }
            Period::Day => date,
        };
        Ok(start)
    }
}

fn period_length(period: Period) -> Span {
    match period {
        Period::Year => Span::new().years(1),
        Period::Month => Span::new().months(1),
        Period::Week => Span::new().weeks(1),
        Period::Day => Span::new().days(1),
    }
}

impl DateLibrary for ZonedLibrary {
    type Value = Zoned;
    type Time = Time;

    fn name(&self) -> &'static str {
        NAME
    }

    fn now(&self) -> Result<Zoned> {
        let timestamp = match self.clock {
            Clock::System => Timestamp::now(),
            Clock::Fixed(millis) => Timestamp::from_millisecond(millis)?,
        };
        Ok(timestamp.to_zoned(self.tz.clone()))
    }

    fn add_days(&self, value: &Zoned, days: i64) -> Result<Zoned> {
        Ok(value.checked_add(Span::new().try_days(days)?)?)
    }

    fn subtract_days(&self, value: &Zoned, days: i64) -> Result<Zoned> {
        Ok(value.checked_sub(Span::new().try_days(days)?)?)
    }

    fn fields(&self, value: &Zoned) -> Fields {
        Fields {
            year: i32::from(value.year()),
            month: value.month() as u8,
            day: value.day() as u8,
            hour: value.hour() as u8,
            minute: value.minute() as u8,
            second: value.second() as u8,
        }
    }

    fn parse_date(&self, input: &str) -> Result<Zoned> {
        let date: Date = input.trim().parse()?;
        Ok(date.to_zoned(self.tz.clone())?)
    }

    fn parse_time(&self, input: &str) -> Result<Time> {
        Ok(input.trim().parse()?)
    }

    fn parse_datetime(&self, input: &str) -> Result<Zoned> {
        let datetime: DateTime = input.trim().parse()?;
        Ok(datetime.to_zoned(self.tz.clone())?)
    }

    fn start_of(&self, value: &Zoned, period: Period) -> Result<Zoned> {
        let start = self.period_start(value.date(), period)?;
        Ok(start.to_zoned(value.time_zone().clone())?)
    }

    fn end_of(&self, value: &Zoned, period: Period) -> Result<Zoned> {
        let start = self.period_start(value.date(), period)?;
        let next = start.checked_add(period_length(period))?;
        let next = next.to_zoned(value.time_zone().clone())?;
        Ok(next.checked_sub(Span::new().milliseconds(1))?)
    }

    fn format(&self, value: &Zoned, layout: Layout) -> Result<String> {
        let pattern = match layout {
            Layout::Date => "%Y-%m-%d",
            Layout::DateTime => "%Y-%m-%dT%H:%M:%S",
            Layout::Localized => "%Y/%-m/%-d",
        };
        Ok(strtime::format(pattern, value)?)
    }

    fn render(&self, value: &Zoned) -> Result<String> {
        Ok(value.to_string())
    }

    fn diff_millis(&self, a: &Zoned, b: &Zoned) -> i64 {
        a.timestamp().as_millisecond() - b.timestamp().as_millisecond()
    }
}
