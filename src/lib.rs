//! Date Compare Library
//!
//! Runs equivalent date/time operations against three date libraries and
//! prints the results side by side. This library provides:
//! - A common [`library::DateLibrary`] trait with adapters for jiff, chrono and time
//! - Example blocks per operation category (add/sub, parse, start/end of period, ...)
//! - A named block runner that groups output under labels
//! - Configuration for time zone, clock and week start
//!
//! # Example
//!
//! ```no_run
//! use date_compare::blocks::Suite;
//! use date_compare::config::HarnessConfig;
//! use date_compare::harness::Harness;
//!
//! let suite = Suite::new(&HarnessConfig::default(), &[], &[]).expect("Failed to set up");
//! let mut harness = Harness::new(std::io::stdout());
//! suite.run(&mut harness).expect("Block failed");
//! ```

pub mod blocks;
pub mod config;
pub mod error;
pub mod harness;
pub mod library;

// Re-export commonly used items
pub use error::{Error, Result};
