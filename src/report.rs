//! Report and screenshot directory lifecycle.
//!
//! Each run writes into `<reports>/latest/`, which is wiped and recreated at
//! the start of the run. When `SAVE_HISTORICAL_REPORTS=true` a timestamped
//! sibling directory is also created and the rendered report is copied into
//! it after the run; timestamped directories are never deleted, so history
//! survives any number of later runs.
//!
//! The run context is an explicit value passed by reference (fresh one per
//! test via [`ReportRun::with_timestamp`]), with a process-wide cached
//! instance for the run wrapper. `RUN_TIMESTAMP` and the directory variables
//! are honored as inputs when already set and exported to the spawned runner
//! via [`ReportRun::env_vars`].

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chrono::Local;
use tracing::{info, warn};

use crate::config::{self, Config};
use crate::error::Result;

/// Filename of the rendered HTML report inside a report directory
pub const REPORT_FILENAME: &str = "test_report.html";

/// Subdirectory for screenshots inside a report directory
pub const SCREENSHOTS_DIRNAME: &str = "screenshots";

/// Name of the `latest` report directory
pub const LATEST_DIRNAME: &str = "latest";

/// Environment variable carrying the cached run timestamp
pub const ENV_RUN_TIMESTAMP: &str = "RUN_TIMESTAMP";

/// Environment variable for the latest report directory
pub const ENV_LATEST_REPORT_DIR: &str = "LATEST_REPORT_DIR";

/// Environment variable for the latest screenshot directory
pub const ENV_LATEST_SCREENSHOT_DIR: &str = "LATEST_SCREENSHOT_DIR";

/// Environment variable for the timestamped report directory
pub const ENV_TIMESTAMPED_REPORT_DIR: &str = "TIMESTAMPED_REPORT_DIR";

/// Environment variable for the timestamped screenshot directory
pub const ENV_TIMESTAMPED_SCREENSHOT_DIR: &str = "TIMESTAMPED_SCREENSHOT_DIR";

static CURRENT: OnceLock<ReportRun> = OnceLock::new();

/// Get the process-wide report run (initialized from environment on first access)
pub fn current() -> &'static ReportRun {
    CURRENT.get_or_init(|| ReportRun::from_env(config::get()))
}

/// Directory layout for a single test run
#[derive(Debug, Clone)]
pub struct ReportRun {
    /// Sortable second-precision timestamp identifying this run
    pub timestamp: String,
    /// Report directory wiped and reused every run
    pub latest_dir: PathBuf,
    /// Screenshot directory under the latest report directory
    pub latest_screenshot_dir: PathBuf,
    /// Archive directory for this run, if archiving is enabled
    pub timestamped_dir: Option<PathBuf>,
    /// Screenshot directory under the archive directory
    pub timestamped_screenshot_dir: Option<PathBuf>,
}

impl ReportRun {
    /// Build the run context from configuration and environment overrides.
    ///
    /// A `RUN_TIMESTAMP` already present in the environment is reused, so a
    /// parent process and its children agree on the archive directory.
    pub fn from_env(config: &Config) -> Self {
        let timestamp = env::var(ENV_RUN_TIMESTAMP).unwrap_or_else(|_| generate_timestamp());
        let base = PathBuf::from(&config.run.reports_dir);

        let latest_dir = env::var(ENV_LATEST_REPORT_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| base.join(LATEST_DIRNAME));
        let latest_screenshot_dir = env::var(ENV_LATEST_SCREENSHOT_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| latest_dir.join(SCREENSHOTS_DIRNAME));

        let (timestamped_dir, timestamped_screenshot_dir) = if config.run.save_historical_reports
        {
            let dir = env::var(ENV_TIMESTAMPED_REPORT_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|_| base.join(&timestamp));
            let screenshot_dir = env::var(ENV_TIMESTAMPED_SCREENSHOT_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|_| dir.join(SCREENSHOTS_DIRNAME));
            (Some(dir), Some(screenshot_dir))
        } else {
            (None, None)
        };

        Self {
            timestamp,
            latest_dir,
            latest_screenshot_dir,
            timestamped_dir,
            timestamped_screenshot_dir,
        }
    }

    /// Build a run context under `base` with an explicit timestamp.
    ///
    /// Ignores the environment entirely, which keeps tests isolated.
    pub fn with_timestamp(base: &Path, timestamp: impl Into<String>, archive: bool) -> Self {
        let timestamp = timestamp.into();
        let latest_dir = base.join(LATEST_DIRNAME);
        let latest_screenshot_dir = latest_dir.join(SCREENSHOTS_DIRNAME);
        let (timestamped_dir, timestamped_screenshot_dir) = if archive {
            let dir = base.join(&timestamp);
            let screenshot_dir = dir.join(SCREENSHOTS_DIRNAME);
            (Some(dir), Some(screenshot_dir))
        } else {
            (None, None)
        };

        Self {
            timestamp,
            latest_dir,
            latest_screenshot_dir,
            timestamped_dir,
            timestamped_screenshot_dir,
        }
    }

    /// Build a run context under `base` with a freshly generated timestamp.
    pub fn new_in(base: &Path, archive: bool) -> Self {
        Self::with_timestamp(base, generate_timestamp(), archive)
    }

    /// Path of the rendered HTML report for this run.
    pub fn report_file(&self) -> PathBuf {
        self.latest_dir.join(REPORT_FILENAME)
    }

    /// Create the directory tree for this run.
    ///
    /// The `latest` tree is deleted and recreated so it only ever holds
    /// artifacts from the current run. The timestamped tree is created
    /// without touching any sibling from an earlier run.
    pub fn prepare(&self) -> Result<()> {
        if self.latest_dir.exists() {
            fs::remove_dir_all(&self.latest_dir)?;
        }
        fs::create_dir_all(&self.latest_screenshot_dir)?;

        if let Some(screenshot_dir) = &self.timestamped_screenshot_dir {
            fs::create_dir_all(screenshot_dir)?;
        }
        Ok(())
    }

    /// Copy the rendered report into the timestamped archive, if enabled.
    ///
    /// Archiving is cosmetic: a missing or uncopyable report logs a warning
    /// and the run's outcome is unaffected.
    pub fn archive_report(&self) {
        let Some(timestamped_dir) = &self.timestamped_dir else {
            return;
        };

        let report = self.report_file();
        if !report.exists() {
            warn!("no report found at {} to archive", report.display());
            return;
        }

        let destination = timestamped_dir.join(REPORT_FILENAME);
        match fs::copy(&report, &destination) {
            Ok(_) => info!("archived report to {}", destination.display()),
            Err(err) => warn!("failed to archive report to {}: {err}", destination.display()),
        }
    }

    /// Variables to export into the spawned runner's environment.
    pub fn env_vars(&self) -> Vec<(String, String)> {
        let mut vars = vec![
            (ENV_RUN_TIMESTAMP.to_string(), self.timestamp.clone()),
            (
                ENV_LATEST_REPORT_DIR.to_string(),
                self.latest_dir.display().to_string(),
            ),
            (
                ENV_LATEST_SCREENSHOT_DIR.to_string(),
                self.latest_screenshot_dir.display().to_string(),
            ),
        ];
        if let Some(dir) = &self.timestamped_dir {
            vars.push((
                ENV_TIMESTAMPED_REPORT_DIR.to_string(),
                dir.display().to_string(),
            ));
        }
        if let Some(dir) = &self.timestamped_screenshot_dir {
            vars.push((
                ENV_TIMESTAMPED_SCREENSHOT_DIR.to_string(),
                dir.display().to_string(),
            ));
        }
        vars
    }
}

/// Generate a sortable second-precision run timestamp
fn generate_timestamp() -> String {
    Local::now().format("%Y-%m-%d_%H-%M-%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_prepare_wipes_latest() {
        let base = tempdir().unwrap();
        let run = ReportRun::with_timestamp(base.path(), "2026-01-01_00-00-00", false);

        run.prepare().unwrap();
        fs::write(run.report_file(), "<html>first run</html>").unwrap();
        fs::write(run.latest_screenshot_dir.join("shot.png"), [0u8; 4]).unwrap();

        run.prepare().unwrap();
        assert!(!run.report_file().exists());
        assert!(run.latest_screenshot_dir.exists());
        assert!(fs::read_dir(&run.latest_screenshot_dir).unwrap().next().is_none());
    }

    #[test]
    fn test_archive_preserves_earlier_runs() {
        let base = tempdir().unwrap();

        let first = ReportRun::with_timestamp(base.path(), "2026-01-01_00-00-00", true);
        first.prepare().unwrap();
        fs::write(first.report_file(), "<html>first</html>").unwrap();
        first.archive_report();

        let second = ReportRun::with_timestamp(base.path(), "2026-01-01_00-00-01", true);
        second.prepare().unwrap();
        fs::write(second.report_file(), "<html>second</html>").unwrap();
        second.archive_report();

        let first_archived = base.path().join("2026-01-01_00-00-00").join(REPORT_FILENAME);
        let second_archived = base.path().join("2026-01-01_00-00-01").join(REPORT_FILENAME);
        assert_eq!(fs::read_to_string(first_archived).unwrap(), "<html>first</html>");
        assert_eq!(fs::read_to_string(second_archived).unwrap(), "<html>second</html>");
        // The latest tree only reflects the second run.
        assert_eq!(
            fs::read_to_string(second.report_file()).unwrap(),
            "<html>second</html>"
        );
    }

    #[test]
    fn test_archive_missing_report_is_not_fatal() {
        let base = tempdir().unwrap();
        let run = ReportRun::with_timestamp(base.path(), "2026-01-01_00-00-00", true);
        run.prepare().unwrap();
        // No report was rendered; archiving should be a no-op.
        run.archive_report();
        assert!(!run.timestamped_dir.as_ref().unwrap().join(REPORT_FILENAME).exists());
    }

    #[test]
    fn test_no_archive_dirs_when_disabled() {
        let base = tempdir().unwrap();
        let run = ReportRun::with_timestamp(base.path(), "2026-01-01_00-00-00", false);
        run.prepare().unwrap();
        assert!(run.timestamped_dir.is_none());
        assert_eq!(fs::read_dir(base.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_env_vars_cover_layout() {
        let base = tempdir().unwrap();
        let run = ReportRun::with_timestamp(base.path(), "2026-01-01_00-00-00", true);
        let vars = run.env_vars();
        let names: Vec<&str> = vars.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                ENV_RUN_TIMESTAMP,
                ENV_LATEST_REPORT_DIR,
                ENV_LATEST_SCREENSHOT_DIR,
                ENV_TIMESTAMPED_REPORT_DIR,
                ENV_TIMESTAMPED_SCREENSHOT_DIR,
            ]
        );
    }

    #[test]
    fn test_generate_timestamp_is_sortable() {
        let ts = generate_timestamp();
        // YYYY-MM-DD_HH-MM-SS
        assert_eq!(ts.len(), 19);
        assert_eq!(&ts[4..5], "-");
        assert_eq!(&ts[10..11], "_");
    }
}
