//! Date comparison CLI tool
//!
//! Prints the same date/time operations performed with jiff, chrono and time,
//! grouped per library and category, for side-by-side comparison.

use std::io::{self, BufWriter, Write};
use std::process;

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;

use date_compare::blocks::{Category, Suite};
use date_compare::config::{Clock, HarnessConfig, WeekStart, DEFAULT_TIME_ZONE};
use date_compare::harness::Harness;
use date_compare::library::LibraryKind;

/// Date Compare - Run equivalent date operations across date libraries
#[derive(Parser)]
#[command(name = "date-compare")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Run every block against every library
    date-compare

    # Freeze the clock so output is reproducible
    date-compare --now 2024-11-20T09:30:00Z

    # Only parsing and formatting, jiff against chrono, in Paris
    date-compare --tz Europe/Paris --library jiff --library chrono --category parse --category format")]
struct Cli {
    /// IANA time zone every library works in
    #[arg(long, env = "DATE_COMPARE_TZ", default_value = DEFAULT_TIME_ZONE)]
    tz: String,

    /// Freeze "now" at an RFC 3339 instant (e.g. 2024-11-20T09:30:00Z)
    #[arg(long, env = "DATE_COMPARE_NOW")]
    now: Option<String>,

    /// First day of the week for start/end of week (sunday or monday)
    #[arg(long, default_value = "sunday")]
    week_start: WeekStart,

    /// Library to run (jiff, chrono, time); repeat for several, default all
    #[arg(long = "library", value_name = "LIBRARY")]
    libraries: Vec<LibraryKind>,

    /// Category to run; repeat for several, default all (see --list)
    #[arg(long = "category", value_name = "CATEGORY")]
    categories: Vec<Category>,

    /// List category names and exit
    #[arg(long)]
    list: bool,

    /// Log progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

/// `RUST_LOG` wins over the verbose flag
fn init_logging(verbose: bool) {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    if cli.list {
        for category in Category::ALL {
            println!("{:<12} {}", category.name(), category.label());
        }
        return Ok(());
    }

    let clock = match cli.now.as_deref() {
        Some(instant) => Clock::fixed_at(instant).context("Invalid --now")?,
        None => Clock::System,
    };

    let config = HarnessConfig {
        time_zone: cli.tz,
        clock,
        week_start: cli.week_start,
    };
    log::info!(
        "time zone {}, clock {:?}, week starts {}",
        config.time_zone,
        config.clock,
        config.week_start
    );

    let suite = Suite::new(&config, &cli.libraries, &cli.categories)
        .with_context(|| format!("Failed to set up libraries for {}", config.time_zone))?;

    let stdout = io::stdout();
    let mut harness = Harness::new(BufWriter::new(stdout.lock()));
    let outcome = suite.run(&mut harness);

    // Flush what completed blocks printed, even when a later block failed
    harness.into_inner().flush().context("Failed to write output")?;
    outcome.context("Block failed")?;

    Ok(())
}
