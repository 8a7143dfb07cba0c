//! Example blocks
//!
//! One body per operation category, generic over [`DateLibrary`] so every
//! library runs exactly the same example. [`Suite`] runs them category by
//! category, each library in turn, under labels like `jiff:parse`.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use crate::config::HarnessConfig;
use crate::error::{Error, Result};
use crate::harness::{Harness, Record};
use crate::library::{
    DateLibrary, FunctionalLibrary, Layout, LibraryKind, Period, WrapperLibrary, ZonedLibrary,
};

/// Literal parsed by the `parse` and `query` blocks
pub const SAMPLE_DATE: &str = "2021-01-01";
/// Literal parsed by the `parse` block
pub const SAMPLE_TIME: &str = "12:00:00";
/// Literal parsed by the `parse` block
pub const SAMPLE_DATETIME: &str = "2021-01-01T12:00:00";
/// Second target of the `query` block, one day after [`SAMPLE_DATE`]
pub const SAMPLE_NEXT_DATE: &str = "2021-01-02";

/// Operation category, in report order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Immutable,
    AddSub,
    Get,
    Parse,
    StartEnd,
    Format,
    Query,
    FormatYmd,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Immutable,
        Category::AddSub,
        Category::Get,
        Category::Parse,
        Category::StartEnd,
        Category::Format,
        Category::Query,
        Category::FormatYmd,
    ];

    /// Name accepted on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Category::Immutable => "immutable",
            Category::AddSub => "add-sub",
            Category::Get => "get",
            Category::Parse => "parse",
            Category::StartEnd => "start-end",
            Category::Format => "format",
            Category::Query => "query",
            Category::FormatYmd => "format-ymd",
        }
    }

    /// Label printed in block markers
    pub fn label(&self) -> &'static str {
        match self {
            Category::Immutable => "immutable",
            Category::AddSub => "add/sub",
            Category::Get => "get",
            Category::Parse => "parse",
            Category::StartEnd => "startOf/endOf",
            Category::Format => "format",
            Category::Query => "query",
            Category::FormatYmd => "format - YYYY-MM-DD",
        }
    }

    /// Run this category's example against one library
    pub fn records<L: DateLibrary>(&self, lib: &L) -> Result<Vec<Record>> {
        match self {
            Category::Immutable => immutable(lib),
            Category::AddSub => add_sub(lib),
            Category::Get => get(lib),
            Category::Parse => parse(lib),
            Category::StartEnd => start_end(lib),
            Category::Format => format_localized(lib),
            Category::Query => query(lib),
            Category::FormatYmd => format_ymd(lib),
        }
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Category::ALL
            .into_iter()
            .find(|category| category.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownName {
                kind: "category",
                name: s.to_string(),
            })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn immutable<L: DateLibrary>(lib: &L) -> Result<Vec<Record>> {
    let current = lib.now()?;
    let snapshot = current.clone();
    let next = lib.add_days(&current, 1)?;

    Ok(vec![Record::new()
        .text("current", lib.render(&current)?)
        .text("next", lib.render(&next)?)
        .bool("unchanged", current == snapshot && next != snapshot)])
}

fn add_sub<L: DateLibrary>(lib: &L) -> Result<Vec<Record>> {
    let current = lib.now()?;
    let added = lib.add_days(&current, 1)?;
    let subed = lib.subtract_days(&current, 1)?;

    Ok(vec![
        Record::new()
            .text("current", lib.render(&current)?)
            .text("added", lib.render(&added)?),
        Record::new()
            .text("current", lib.render(&current)?)
            .text("subed", lib.render(&subed)?),
    ])
}

fn get<L: DateLibrary>(lib: &L) -> Result<Vec<Record>> {
    let fields = lib.fields(&lib.now()?);

    Ok(vec![Record::new()
        .int("year", fields.year)
        .int("month", fields.month)
        .int("day", fields.day)
        .int("hour", fields.hour)
        .int("minute", fields.minute)
        .int("second", fields.second)])
}

fn parse<L: DateLibrary>(lib: &L) -> Result<Vec<Record>> {
    let parsed_date = lib.parse_date(SAMPLE_DATE)?;
    let parsed_time = lib.parse_time(SAMPLE_TIME)?;
    let parsed_datetime = lib.parse_datetime(SAMPLE_DATETIME)?;

    Ok(vec![Record::new()
        .text("parsedDate", lib.render(&parsed_date)?)
        .text("parsedTime", parsed_time.to_string())
        .text("parsedDateTime", lib.render(&parsed_datetime)?)
        .text("reformatted", lib.format(&parsed_date, Layout::Date)?)])
}

fn start_end<L: DateLibrary>(lib: &L) -> Result<Vec<Record>> {
    let current = lib.now()?;
    let boundary = |period: Period, end: bool| -> Result<String> {
        let value = if end {
            lib.end_of(&current, period)?
        } else {
            lib.start_of(&current, period)?
        };
        lib.render(&value)
    };

    Ok(vec![Record::new()
        .text("startOfYear", boundary(Period::Year, false)?)
        .text("endOfYear", boundary(Period::Year, true)?)
        .text("startOfMonth", boundary(Period::Month, false)?)
        .text("endOfMonth", boundary(Period::Month, true)?)
        .text("startOfWeek", boundary(Period::Week, false)?)
        .text("endOfWeek", boundary(Period::Week, true)?)
        .text("startOfDay", boundary(Period::Day, false)?)
        .text("endOfDay", boundary(Period::Day, true)?)])
}

fn format_localized<L: DateLibrary>(lib: &L) -> Result<Vec<Record>> {
    let current = lib.now()?;
    Ok(vec![Record::new().text("formatted", lib.format(&current, Layout::Localized)?)])
}

fn query<L: DateLibrary>(lib: &L) -> Result<Vec<Record>> {
    let current = lib.now()?;
    let target1 = lib.parse_date(SAMPLE_DATE)?;
    let target2 = lib.parse_date(SAMPLE_NEXT_DATE)?;

    Ok(vec![Record::new()
        .bool("isSameDay", lib.is_same(&current, &target1, Period::Day)?)
        .bool("isSameYear", lib.is_same(&current, &target1, Period::Year)?)
        .bool("isSameMonth", lib.is_same(&current, &target1, Period::Month)?)
        // Every value here is Gregorian, so calendar-aware equality matches the above
        .bool("isEqualDay", lib.is_same(&current, &target1, Period::Day)?)
        .bool("isEqualMonth", lib.is_same(&current, &target1, Period::Month)?)
        .int("compare", current.cmp(&target1) as i64)
        .int("diff", lib.diff_millis(&current, &target1))
        .int("compare2", target1.cmp(&target2) as i64)
        .int("diff2", lib.diff_millis(&target1, &target2))])
}

fn format_ymd<L: DateLibrary>(lib: &L) -> Result<Vec<Record>> {
    let current = lib.now()?;
    Ok(vec![Record::new().text("formatted", lib.format(&current, Layout::Date)?)])
}

/// Run one category against one library inside a labeled group
pub fn run_block<L: DateLibrary, W: Write>(
    harness: &mut Harness<W>,
    lib: &L,
    category: Category,
) -> Result<()> {
    let label = format!("{}:{}", lib.name(), category.label());
    harness.group(&label, |h| {
        for record in category.records(lib)? {
            h.log(record)?;
        }
        Ok(())
    })
}

/// The selected libraries and categories, ready to run
#[derive(Debug, Clone)]
pub struct Suite {
    zoned: Option<ZonedLibrary>,
    wrapper: Option<WrapperLibrary>,
    functional: Option<FunctionalLibrary>,
    categories: Vec<Category>,
}

impl Suite {
    /// Build the adapters for `libraries`
    ///
    /// Empty selections mean "everything".
    pub fn new(
        config: &HarnessConfig,
        libraries: &[LibraryKind],
        categories: &[Category],
    ) -> Result<Self> {
        let wanted = |kind: LibraryKind| libraries.is_empty() || libraries.contains(&kind);

        let zoned = if wanted(LibraryKind::Jiff) {
            Some(ZonedLibrary::new(config)?)
        } else {
            None
        };
        let wrapper = if wanted(LibraryKind::Chrono) {
            Some(WrapperLibrary::new(config)?)
        } else {
            None
        };
        let functional = if wanted(LibraryKind::Time) {
            Some(FunctionalLibrary::new(config)?)
        } else {
            None
        };

        let categories = if categories.is_empty() {
            Category::ALL.to_vec()
        } else {
            Category::ALL
                .into_iter()
                .filter(|category| categories.contains(category))
                .collect()
        };

        Ok(Self {
            zoned,
            wrapper,
            functional,
            categories,
        })
    }

    /// Run every selected block in report order, stopping at the first failure
    pub fn run<W: Write>(&self, harness: &mut Harness<W>) -> Result<()> {
        for &category in &self.categories {
            if let Some(lib) = &self.zoned {
                run_block(harness, lib, category)?;
            }
            if let Some(lib) = &self.wrapper {
                run_block(harness, lib, category)?;
            }
            if let Some(lib) = &self.functional {
                run_block(harness, lib, category)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Clock;
    use crate::harness::FieldValue;

    fn frozen() -> HarnessConfig {
        HarnessConfig {
            clock: Clock::fixed_at("2024-11-20T09:30:00Z").unwrap(),
            ..HarnessConfig::default()
        }
    }

    fn text(record: &Record, key: &str) -> String {
        match record.get(key) {
            Some(FieldValue::Text(s)) => s.clone(),
            other => panic!("Expected text for {}, got {:?}", key, other),
        }
    }

    #[test]
    fn test_parse_category() {
        assert_eq!("add-sub".parse::<Category>().unwrap(), Category::AddSub);
        assert_eq!("FORMAT-YMD".parse::<Category>().unwrap(), Category::FormatYmd);
        assert!("add/sub".parse::<Category>().is_err());
    }

    #[test]
    fn test_immutable_block() {
        let lib = ZonedLibrary::new(&frozen()).unwrap();
        let records = Category::Immutable.records(&lib).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(text(&records[0], "next"), "2024-11-21T18:30:00+09:00[Asia/Tokyo]");
        assert_eq!(records[0].get("unchanged"), Some(&FieldValue::Bool(true)));
        assert_ne!(text(&records[0], "current"), text(&records[0], "next"));
    }

    #[test]
    fn test_get_block() {
        let lib = WrapperLibrary::new(&frozen()).unwrap();
        let records = Category::Get.records(&lib).unwrap();
        assert_eq!(records[0].get("year"), Some(&FieldValue::Int(2024)));
        assert_eq!(records[0].get("month"), Some(&FieldValue::Int(11)));
        assert_eq!(records[0].get("hour"), Some(&FieldValue::Int(18)));
    }

    #[test]
    fn test_parse_block_reformats_literal() {
        let lib = FunctionalLibrary::new(&frozen()).unwrap();
        let records = Category::Parse.records(&lib).unwrap();
        assert_eq!(text(&records[0], "reformatted"), SAMPLE_DATE);
        assert_eq!(text(&records[0], "parsedDateTime"), "2021-01-01T12:00:00+09:00");
    }

    #[test]
    fn test_query_block() {
        let lib = ZonedLibrary::new(&frozen()).unwrap();
        let record = &Category::Query.records(&lib).unwrap()[0];
        assert_eq!(record.get("isSameDay"), Some(&FieldValue::Bool(false)));
        assert_eq!(record.get("isEqualDay"), Some(&FieldValue::Bool(false)));
        assert_eq!(record.get("isEqualMonth"), Some(&FieldValue::Bool(false)));
        assert_eq!(record.get("compare"), Some(&FieldValue::Int(1)));
        assert_eq!(record.get("compare2"), Some(&FieldValue::Int(-1)));
        assert_eq!(record.get("diff2"), Some(&FieldValue::Int(-86_400_000)));
    }

    #[test]
    fn test_query_block_same_day() {
        // Clock on the sample date in Tokyo
        let config = HarnessConfig {
            clock: Clock::fixed_at("2021-01-01T09:00:00+09:00").unwrap(),
            ..HarnessConfig::default()
        };
        let lib = WrapperLibrary::new(&config).unwrap();
        let record = &Category::Query.records(&lib).unwrap()[0];
        assert_eq!(record.get("isSameDay"), Some(&FieldValue::Bool(true)));
        assert_eq!(record.get("isEqualDay"), Some(&FieldValue::Bool(true)));
        assert_eq!(record.get("isEqualMonth"), Some(&FieldValue::Bool(true)));
        assert_eq!(record.get("compare"), Some(&FieldValue::Int(1)));
    }

    #[test]
    fn test_format_blocks() {
        let lib = WrapperLibrary::new(&frozen()).unwrap();
        let localized = &Category::Format.records(&lib).unwrap()[0];
        assert_eq!(text(localized, "formatted"), "2024/11/20");
        let ymd = &Category::FormatYmd.records(&lib).unwrap()[0];
        assert_eq!(text(ymd, "formatted"), "2024-11-20");
    }

    #[test]
    fn test_suite_filters_and_orders() {
        let suite = Suite::new(
            &frozen(),
            &[LibraryKind::Time, LibraryKind::Jiff],
            &[Category::Get, Category::Immutable],
        )
        .unwrap();
        let mut harness = Harness::new(Vec::new());
        suite.run(&mut harness).unwrap();

        let out = String::from_utf8(harness.into_inner()).unwrap();
        let labels: Vec<&str> = out
            .lines()
            .filter_map(|line| line.strip_prefix("begin "))
            .collect();
        assert_eq!(labels, vec!["jiff:immutable", "time:immutable", "jiff:get", "time:get"]);
    }

    #[test]
    fn test_suite_rejects_unknown_zone() {
        let config = HarnessConfig {
            time_zone: "Nowhere/Special".to_string(),
            ..frozen()
        };
        assert!(Suite::new(&config, &[], &[]).is_err());
    }
}
