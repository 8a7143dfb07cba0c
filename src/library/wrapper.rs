//! Timestamp-wrapper adapter backed by chrono
//!
//! Values are `DateTime<Tz>`: a UTC instant wrapped with a chrono-tz zone.
//! Rendering goes through UTC with millisecond precision, the way wrapper
//! libraries report their ISO string.

use chrono::{
    DateTime, Datelike, Days, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime,
    SecondsFormat, TimeZone, Timelike, Utc,
};
use chrono_tz::Tz;

use super::{DateLibrary, Fields, Layout, Period};
use crate::config::{Clock, HarnessConfig, WeekStart};
use crate::error::{Error, Result};

pub const NAME: &str = "chrono";

/// chrono adapter
#[derive(Debug, Clone)]
pub struct WrapperLibrary {
    tz: Tz,
    clock: Clock,
    week_start: WeekStart,
}

impl WrapperLibrary {
    pub fn new(config: &HarnessConfig) -> Result<Self> {
        Ok(Self {
            tz: config.tz()?,
            clock: config.clock,
            week_start: config.week_start,
        })
    }

    /// Attach the zone to a wall-clock time, taking the earlier of two
    /// candidates during a fold
    fn localize(&self, naive: NaiveDateTime) -> Result<DateTime<Tz>> {
        self.tz
            .from_local_datetime(&naive)
            .earliest()
            .ok_or_else(|| Error::NonexistentLocalTime(naive.to_string(), self.tz.to_string()))
    }

    /// Attach the zone to a local midnight
    ///
    /// Zones that skip midnight on their DST day resolve to the first instant
    /// after the gap: midnight read with the offset of the day before.
    fn localize_midnight(&self, date: NaiveDate) -> Result<DateTime<Tz>> {
        let naive = date.and_time(NaiveTime::MIN);
        if let Some(datetime) = self.tz.from_local_datetime(&naive).earliest() {
            return Ok(datetime);
        }

        date.pred_opt()
            .and_then(|day_before| {
                self.tz
                    .from_local_datetime(&day_before.and_time(NaiveTime::MIN))
                    .earliest()
            })
            .and_then(|day_before| day_before.checked_add_signed(Duration::days(1)))
            .ok_or_else(|| Error::NonexistentLocalTime(naive.to_string(), self.tz.to_string()))
    }

    /// Civil date on which the period containing `date` begins
    fn period_start(&self, date: NaiveDate, period: Period) -> Option<NaiveDate> {
        match period {
            Period::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1),
            Period::Month => date.with_day(1),
            Period::Week => {
                let back = match self.week_start {
                    WeekStart::Sunday => date.weekday().num_days_from_sunday(),
                    WeekStart::Monday => date.weekday().num_days_from_monday(),
                };
                date.checked_sub_days(Days::new(u64::from(back)))
            }
            Period::Day => Some(date),
        }
    }
}

/// Civil date on which the period after the one starting at `start` begins
fn next_period_start(start: NaiveDate, period: Period) -> Option<NaiveDate> {
    match period {
        Period::Year => NaiveDate::from_ymd_opt(start.year() + 1, 1, 1),
        Period::Month => start.checked_add_months(Months::new(1)),
        Period::Week => start.checked_add_days(Days::new(7)),
        Period::Day => start.succ_opt(),
    }
}

fn out_of_range(what: &str, value: &DateTime<Tz>) -> Error {
    Error::OutOfRange(format!("{} from {}", what, value))
}

impl DateLibrary for WrapperLibrary {
    type Value = DateTime<Tz>;
    type Time = NaiveTime;

    fn name(&self) -> &'static str {
        NAME
    }

    fn now(&self) -> Result<DateTime<Tz>> {
        let millis = self.clock.now_millis();
        let utc = DateTime::from_timestamp_millis(millis)
            .ok_or_else(|| Error::OutOfRange(format!("{} ms since epoch", millis)))?;
        Ok(utc.with_timezone(&self.tz))
    }

    fn add_days(&self, value: &DateTime<Tz>, days: i64) -> Result<DateTime<Tz>> {
        let moved = if days >= 0 {
            value.checked_add_days(Days::new(days.unsigned_abs()))
        } else {
            value.checked_sub_days(Days::new(days.unsigned_abs()))
        };
        moved.ok_or_else(|| out_of_range(&format!("{} days", days), value))
    }

    fn subtract_days(&self, value: &DateTime<Tz>, days: i64) -> Result<DateTime<Tz>> {
        let moved = if days >= 0 {
            value.checked_sub_days(Days::new(days.unsigned_abs()))
        } else {
            value.checked_add_days(Days::new(days.unsigned_abs()))
        };
        moved.ok_or_else(|| out_of_range(&format!("-{} days", days), value))
    }

    fn fields(&self, value: &DateTime<Tz>) -> Fields {
        Fields {
            year: value.year(),
            month: value.month() as u8,
            day: value.day() as u8,
            hour: value.hour() as u8,
            minute: value.minute() as u8,
            second: value.second() as u8,
        }
    }

    fn parse_date(&self, input: &str) -> Result<DateTime<Tz>> {
        let date = NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")?;
        self.localize_midnight(date)
    }

    fn parse_time(&self, input: &str) -> Result<NaiveTime> {
        Ok(NaiveTime::parse_from_str(input.trim(), "%H:%M:%S")?)
    }

    fn parse_datetime(&self, input: &str) -> Result<DateTime<Tz>> {
        let datetime = NaiveDateTime::parse_from_str(input.trim(), "%Y-%m-%dT%H:%M:%S")?;
        self.localize(datetime)
    }

    fn start_of(&self, value: &DateTime<Tz>, period: Period) -> Result<DateTime<Tz>> {
        let start = self
            .period_start(value.date_naive(), period)
            .ok_or_else(|| out_of_range("start of period", value))?;
        self.localize_midnight(start)
    }

    fn end_of(&self, value: &DateTime<Tz>, period: Period) -> Result<DateTime<Tz>> {
        let next = self
            .period_start(value.date_naive(), period)
            .and_then(|start| next_period_start(start, period))
            .ok_or_else(|| out_of_range("end of period", value))?;
        let next = self.localize_midnight(next)?;
        next.checked_sub_signed(Duration::milliseconds(1))
            .ok_or_else(|| out_of_range("end of period", value))
    }

    fn format(&self, value: &DateTime<Tz>, layout: Layout) -> Result<String> {
        let pattern = match layout {
            Layout::Date => "%Y-%m-%d",
            Layout::DateTime => "%Y-%m-%dT%H:%M:%S",
            Layout::Localized => "%Y/%-m/%-d",
        };
        Ok(value.format(pattern).to_string())
    }

    fn render(&self, value: &DateTime<Tz>) -> Result<String> {
        Ok(value.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    fn diff_millis(&self, a: &DateTime<Tz>, b: &DateTime<Tz>) -> i64 {
        a.signed_duration_since(*b).num_milliseconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library(time_zone: &str) -> WrapperLibrary {
        let config = HarnessConfig {
            time_zone: time_zone.to_string(),
            clock: Clock::fixed_at("2024-11-20T09:30:00Z").unwrap(),
            ..HarnessConfig::default()
        };
        WrapperLibrary::new(&config).unwrap()
    }

    #[test]
    fn test_render_is_utc_with_millis() {
        let lib = library("Asia/Tokyo");
        let now = lib.now().unwrap();
        assert_eq!(lib.render(&now).unwrap(), "2024-11-20T09:30:00.000Z");
        assert_eq!(lib.fields(&now).hour, 18);
    }

    #[test]
    fn test_parse_date_is_local_midnight() {
        let lib = library("Asia/Tokyo");
        let value = lib.parse_date("2021-01-01").unwrap();
        assert_eq!(lib.render(&value).unwrap(), "2020-12-31T15:00:00.000Z");
        assert_eq!(lib.format(&value, Layout::Date).unwrap(), "2021-01-01");
    }

    #[test]
    fn test_subtract_negative_days_adds() {
        let lib = library("Asia/Tokyo");
        let now = lib.now().unwrap();
        let forward = lib.subtract_days(&now, -2).unwrap();
        assert_eq!(lib.format(&forward, Layout::Date).unwrap(), "2024-11-22");
    }

    #[test]
    fn test_add_days_keeps_wall_clock_across_dst() {
        // Europe/Paris leaves DST on 2024-10-27
        let lib = library("Europe/Paris");
        let value = lib.parse_datetime("2024-10-26T12:00:00").unwrap();
        let next = lib.add_days(&value, 1).unwrap();
        assert_eq!(lib.format(&next, Layout::DateTime).unwrap(), "2024-10-27T12:00:00");
        assert_eq!(lib.diff_millis(&next, &value), 25 * 3600 * 1000);
    }

    #[test]
    fn test_nonexistent_local_time() {
        // 02:30 is skipped when Paris enters DST on 2024-03-31
        let lib = library("Europe/Paris");
        let result = lib.parse_datetime("2024-03-31T02:30:00");
        assert!(matches!(result, Err(Error::NonexistentLocalTime(_, _))));
    }

    #[test]
    fn test_period_bounds_across_skipped_midnight() {
        // Havana jumps from 00:00 to 01:00 on 2024-03-10
        let config = HarnessConfig {
            time_zone: "America/Havana".to_string(),
            clock: Clock::fixed_at("2024-03-09T12:00:00Z").unwrap(),
            ..HarnessConfig::default()
        };
        let lib = WrapperLibrary::new(&config).unwrap();
        let now = lib.now().unwrap();

        let end = lib.end_of(&now, Period::Day).unwrap();
        assert_eq!(lib.render(&end).unwrap(), "2024-03-10T04:59:59.999Z");
        let end = lib.end_of(&now, Period::Week).unwrap();
        assert_eq!(lib.render(&end).unwrap(), "2024-03-10T04:59:59.999Z");

        let later = lib.parse_datetime("2024-03-10T12:00:00").unwrap();
        let start = lib.start_of(&later, Period::Day).unwrap();
        assert_eq!(lib.format(&start, Layout::DateTime).unwrap(), "2024-03-10T01:00:00");
        assert_eq!(lib.render(&start).unwrap(), "2024-03-10T05:00:00.000Z");

        let parsed = lib.parse_date("2024-03-10").unwrap();
        assert_eq!(parsed, start);
    }

    #[test]
    fn test_end_of_year() {
        let lib = library("Asia/Tokyo");
        let now = lib.now().unwrap();
        let end = lib.end_of(&now, Period::Year).unwrap();
        assert_eq!(lib.format(&end, Layout::DateTime).unwrap(), "2024-12-31T23:59:59");
        assert_eq!(lib.render(&end).unwrap(), "2024-12-31T14:59:59.999Z");
    }

    #[test]
    fn test_parse_time() {
        let lib = library("Asia/Tokyo");
        assert_eq!(lib.parse_time("12:00:00").unwrap().to_string(), "12:00:00");
        assert!(lib.parse_time("noon").is_err());
    }
}
