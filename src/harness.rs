//! Named block runner
//!
//! Writes grouped key/value output: `begin <label>`, the block's records
//! indented one level, then `end <label>`. A failing block returns its error
//! straight away and its end marker is never written.

use std::fmt;
use std::io::Write;

use crate::error::Result;

const INDENT: &str = "  ";

/// A single printed value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Int(i64),
    Bool(bool),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => write!(f, "'{}'", text),
            FieldValue::Int(n) => write!(f, "{}", n),
            FieldValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Ordered key/value record, printed as one object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(&'static str, FieldValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.fields.push((key, FieldValue::Text(value.into())));
        self
    }

    pub fn int(mut self, key: &'static str, value: impl Into<i64>) -> Self {
        self.fields.push((key, FieldValue::Int(value.into())));
        self
    }

    pub fn bool(mut self, key: &'static str, value: bool) -> Self {
        self.fields.push((key, FieldValue::Bool(value)));
        self
    }

    /// Look up a field by key
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Runs labeled blocks against an output stream
pub struct Harness<W: Write> {
    out: W,
    depth: usize,
}

impl<W: Write> Harness<W> {
    pub fn new(out: W) -> Self {
        Self { out, depth: 0 }
    }

    /// Run `action` inside a labeled group
    pub fn group<F>(&mut self, label: &str, action: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        log::debug!("running block {}", label);
        self.line(&format!("begin {}", label))?;

        self.depth += 1;
        let outcome = action(self);
        self.depth -= 1;
        outcome?;

        self.line(&format!("end {}", label))
    }

    /// Print one record at the current indent
    pub fn log(&mut self, record: Record) -> Result<()> {
        if record.is_empty() {
            return self.line("{}");
        }

        self.line("{")?;
        self.depth += 1;
        for (key, value) in &record.fields {
            self.line(&format!("{}: {}", key, value))?;
        }
        self.depth -= 1;
        self.line("}")
    }

    /// Give back the underlying writer
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{}{}", INDENT.repeat(self.depth), text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn output(harness: Harness<Vec<u8>>) -> String {
        String::from_utf8(harness.into_inner()).unwrap()
    }

    #[test]
    fn test_group_wraps_records() {
        let mut harness = Harness::new(Vec::new());
        harness
            .group("jiff:get", |h| h.log(Record::new().int("year", 2024).bool("leap", true)))
            .unwrap();

        assert_eq!(
            output(harness),
            "begin jiff:get\n  {\n    year: 2024\n    leap: true\n  }\nend jiff:get\n"
        );
    }

    #[test]
    fn test_text_values_are_quoted() {
        let mut harness = Harness::new(Vec::new());
        harness.log(Record::new().text("formatted", "2021-01-01")).unwrap();
        assert_eq!(output(harness), "{\n  formatted: '2021-01-01'\n}\n");
    }

    #[test]
    fn test_empty_record() {
        let mut harness = Harness::new(Vec::new());
        harness.log(Record::new()).unwrap();
        assert_eq!(output(harness), "{}\n");
    }

    #[test]
    fn test_nested_groups_indent() {
        let mut harness = Harness::new(Vec::new());
        harness
            .group("outer", |h| h.group("inner", |h| h.log(Record::new().int("n", 1))))
            .unwrap();

        assert_eq!(
            output(harness),
            "begin outer\n  begin inner\n    {\n      n: 1\n    }\n  end inner\nend outer\n"
        );
    }

    #[test]
    fn test_failure_propagates_without_end_marker() {
        let mut harness = Harness::new(Vec::new());
        let result = harness.group("chrono:parse", |h| {
            h.log(Record::new().text("input", "bad"))?;
            Err(Error::InvalidInstant("bad".to_string()))
        });

        assert!(matches!(result, Err(Error::InvalidInstant(_))));
        let text = output(harness);
        assert!(text.starts_with("begin chrono:parse\n"));
        assert!(!text.contains("end chrono:parse"));
    }

    #[test]
    fn test_indent_restored_after_failure() {
        let mut harness = Harness::new(Vec::new());
        let _ = harness.group("failing", |_| Err(Error::InvalidInstant("x".to_string())));
        harness.log(Record::new().int("n", 1)).unwrap();
        assert!(output(harness).ends_with("{\n  n: 1\n}\n"));
    }

    #[test]
    fn test_record_get() {
        let record = Record::new().int("compare", -1).text("formatted", "x");
        assert_eq!(record.get("compare"), Some(&FieldValue::Int(-1)));
        assert_eq!(record.get("missing"), None);
    }
}
