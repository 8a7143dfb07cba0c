//! Function-style adapter backed by the time crate
//!
//! Values are `OffsetDateTime` at a fixed UTC offset. The offset is the
//! configured zone's offset at the clock's instant; later DST transitions are
//! not applied, the same way utilities over a raw native timestamp behave.

use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, Duration, Month, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

use super::{DateLibrary, Fields, Layout, Period};
use crate::config::{Clock, HarnessConfig, WeekStart};
use crate::error::{Error, Result};

pub const NAME: &str = "time";

/// time adapter
#[derive(Debug, Clone)]
pub struct FunctionalLibrary {
    offset: UtcOffset,
    clock: Clock,
    week_start: WeekStart,
}

impl FunctionalLibrary {
    pub fn new(config: &HarnessConfig) -> Result<Self> {
        let offset = UtcOffset::from_whole_seconds(config.utc_offset_seconds()?)?;
        Ok(Self {
            offset,
            clock: config.clock,
            week_start: config.week_start,
        })
    }

    fn period_start(&self, date: Date, period: Period) -> Result<Date> {
        let start = match period {
            Period::Year => Date::from_calendar_date(date.year(), Month::January, 1)?,
            Period::Month => Date::from_calendar_date(date.year(), date.month(), 1)?,
            Period::Week => {
                let back = match self.week_start {
                    WeekStart::Sunday => date.weekday().number_days_from_sunday(),
                    WeekStart::Monday => date.weekday().number_days_from_monday(),
                };
                date.checked_sub(Duration::days(i64::from(back)))
                    .ok_or_else(|| Error::OutOfRange(format!("start of week of {}", date)))?
            }
            Period::Day => date,
        };
        Ok(start)
    }
}

fn next_period_start(start: Date, period: Period) -> Result<Date> {
    let next = match period {
        Period::Year => Date::from_calendar_date(start.year() + 1, Month::January, 1)?,
        Period::Month => {
            if start.month() == Month::December {
                Date::from_calendar_date(start.year() + 1, Month::January, 1)?
            } else {
                Date::from_calendar_date(start.year(), start.month().next(), 1)?
            }
        }
        Period::Week => start
            .checked_add(Duration::days(7))
            .ok_or_else(|| Error::OutOfRange(format!("week after {}", start)))?,
        Period::Day => start
            .next_day()
            .ok_or_else(|| Error::OutOfRange(format!("day after {}", start)))?,
    };
    Ok(next)
}

/// `days` as a duration, or `None` when the seconds overflow
fn whole_days(days: i64) -> Option<Duration> {
    days.checked_mul(86_400).map(Duration::seconds)
}

impl DateLibrary for FunctionalLibrary {
    type Value = OffsetDateTime;
    type Time = Time;

    fn name(&self) -> &'static str {
        NAME
    }

    fn now(&self) -> Result<OffsetDateTime> {
        let nanos = i128::from(self.clock.now_millis()) * 1_000_000;
        Ok(OffsetDateTime::from_unix_timestamp_nanos(nanos)?.to_offset(self.offset))
    }

    fn add_days(&self, value: &OffsetDateTime, days: i64) -> Result<OffsetDateTime> {
        whole_days(days)
            .and_then(|duration| value.checked_add(duration))
            .ok_or_else(|| Error::OutOfRange(format!("{} + {} days", value, days)))
    }

    fn subtract_days(&self, value: &OffsetDateTime, days: i64) -> Result<OffsetDateTime> {
        whole_days(days)
            .and_then(|duration| value.checked_sub(duration))
            .ok_or_else(|| Error::OutOfRange(format!("{} - {} days", value, days)))
    }

    fn fields(&self, value: &OffsetDateTime) -> Fields {
        Fields {
            year: value.year(),
            month: u8::from(value.month()),
            day: value.day(),
            hour: value.hour(),
            minute: value.minute(),
            second: value.second(),
        }
    }

    fn parse_date(&self, input: &str) -> Result<OffsetDateTime> {
        let date = Date::parse(input.trim(), &format_description!("[year]-[month]-[day]"))?;
        Ok(PrimitiveDateTime::new(date, Time::MIDNIGHT).assume_offset(self.offset))
    }

    fn parse_time(&self, input: &str) -> Result<Time> {
        Ok(Time::parse(input.trim(), &format_description!("[hour]:[minute]:[second]"))?)
    }

    fn parse_datetime(&self, input: &str) -> Result<OffsetDateTime> {
        let datetime = PrimitiveDateTime::parse(
            input.trim(),
            &format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
        )?;
        Ok(datetime.assume_offset(self.offset))
    }

    fn start_of(&self, value: &OffsetDateTime, period: Period) -> Result<OffsetDateTime> {
        let start = self.period_start(value.date(), period)?;
        Ok(value.replace_date(start).replace_time(Time::MIDNIGHT))
    }

    fn end_of(&self, value: &OffsetDateTime, period: Period) -> Result<OffsetDateTime> {
        let next = next_period_start(self.period_start(value.date(), period)?, period)?;
        value
            .replace_date(next)
            .replace_time(Time::MIDNIGHT)
            .checked_sub(Duration::milliseconds(1))
            .ok_or_else(|| Error::OutOfRange(format!("end of period of {}", value)))
    }

    fn format(&self, value: &OffsetDateTime, layout: Layout) -> Result<String> {
        let formatted = match layout {
            Layout::Date => value.format(&format_description!("[year]-[month]-[day]"))?,
            Layout::DateTime => value.format(&format_description!(
                "[year]-[month]-[day]T[hour]:[minute]:[second]"
            ))?,
            Layout::Localized => value.format(&format_description!(
                "[year]/[month padding:none]/[day padding:none]"
            ))?,
        };
        Ok(formatted)
    }

    fn render(&self, value: &OffsetDateTime) -> Result<String> {
        Ok(value.format(&Rfc3339)?)
    }

    fn diff_millis(&self, a: &OffsetDateTime, b: &OffsetDateTime) -> i64 {
        (*a - *b).whole_milliseconds() as i64
    }
}
