//! Logging setup for harness runs.
//!
//! Builds a `tracing` subscriber with up to three outputs:
//! - an ANSI-colored console layer, only when `LOG_CLI=true`
//! - a plain-text file at `<latest report dir>/logs.log`
//! - a second plain-text copy under the timestamped archive when
//!   `SAVE_HISTORICAL_REPORTS=true`
//!
//! The level comes from `LOG_LEVEL` using the original harness level names
//! (`DEBUG`, `INFO`, `WARNING`, `ERROR`, `CRITICAL`); an unknown name is a
//! configuration error. Initializing twice is tolerated, the first
//! subscriber wins.

use std::fs::File;
use std::sync::Arc;

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::report::ReportRun;

/// Filename for the run log inside a report directory
pub const LOG_FILENAME: &str = "logs.log";

/// Map a configured level name onto a `tracing` level.
///
/// Accepts the original harness names and the native `tracing` spellings.
pub fn parse_level(name: &str) -> Result<Level> {
    match name.trim().to_ascii_uppercase().as_str() {
        "TRACE" => Ok(Level::TRACE),
        "DEBUG" => Ok(Level::DEBUG),
        "INFO" => Ok(Level::INFO),
        "WARNING" | "WARN" => Ok(Level::WARN),
        "ERROR" | "CRITICAL" => Ok(Level::ERROR),
        _ => Err(Error::Config(format!("invalid LOG_LEVEL: '{name}'"))),
    }
}

/// Install the global subscriber for this run.
///
/// Pass the report run once its directories exist so file logging lands in
/// them; `None` sets up console-only logging (used by library consumers and
/// early startup).
pub fn init(config: &Config, report: Option<&ReportRun>) -> Result<()> {
    let level = parse_level(&config.logging.level)?;
    let filter = EnvFilter::new(level.to_string().to_ascii_lowercase());

    let console_layer = config
        .logging
        .log_cli
        .then(|| fmt::layer().with_ansi(true).with_target(false));

    let latest_file_layer = match report {
        Some(run) => Some(file_layer(File::create(run.latest_dir.join(LOG_FILENAME))?)),
        None => None,
    };

    let timestamped_file_layer = match report.and_then(|run| run.timestamped_dir.as_ref()) {
        Some(dir) => Some(file_layer(File::create(dir.join(LOG_FILENAME))?)),
        None => None,
    };

    // A subscriber may already be installed (repeat init in tests); keep the
    // first one rather than erroring the run.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(latest_file_layer)
        .with(timestamped_file_layer)
        .try_init();

    Ok(())
}

/// Build a plain-text fmt layer writing to `file`.
fn file_layer<S>(file: File) -> fmt::Layer<S, fmt::format::DefaultFields, fmt::format::Format, Arc<File>>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(Arc::new(file))
}
