//! Configuration management with environment variable support.
//!
//! This module provides centralized configuration for the harness, supporting:
//! - Environment variables for all configurable values
//! - Sensible defaults for local runs
//! - A process-wide cached accessor plus per-test fresh construction
//!
//! # Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HEADLESS` | Run browsers without a visible window | `false` |
//! | `QUIET` | Add quiet/short-traceback flags to the runner | `false` |
//! | `PARALLEL` | Request parallel workers from the runner | `false` |
//! | `SAVE_HISTORICAL_REPORTS` | Archive reports under a timestamped dir | `false` |
//! | `SKIP_SECRETS` | Skip tests that require credentials | `true` |
//! | `DISPLAY_PRINTS` | Let the runner show captured output | `false` |
//! | `LOG_CLI` | Emit logs to the console | `false` |
//! | `LOG_LEVEL` | Minimum level to log | `WARNING` |
//! | `DEFAULT_WAIT_TIMEOUT` | Explicit wait budget in seconds | `10` |
//! | `BROWSER` | Browser to drive | `chrome` |
//! | `WEBDRIVER_URL` | WebDriver endpoint | `http://localhost:4444/wd/hub` |
//! | `BROWSER_WIDTH` | Window width | `1920` |
//! | `BROWSER_HEIGHT` | Window height | `1080` |
//! | `REPORTS_DIR` | Base directory for report output | `reports` |
//!
//! # Example
//!
//! ```bash
//! export HEADLESS=true
//! export QUIET=true
//! export LOG_LEVEL=DEBUG
//! ```

use std::env;
use std::sync::OnceLock;
use std::time::Duration;

// ============================================================================
// Default Values
// ============================================================================

/// Default explicit wait budget (seconds)
pub const DEFAULT_WAIT_TIMEOUT_SECS: u64 = 10;

/// Default poll interval for explicit waits (milliseconds)
pub const DEFAULT_WAIT_INTERVAL_MS: u64 = 500;

/// Default log level name (Python-style level names)
pub const DEFAULT_LOG_LEVEL: &str = "WARNING";

/// Default browser name
pub const DEFAULT_BROWSER: &str = "chrome";

/// Default WebDriver endpoint
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:4444/wd/hub";

/// Default browser window width (pixels)
pub const DEFAULT_BROWSER_WIDTH: u32 = 1920;

/// Default browser window height (pixels)
pub const DEFAULT_BROWSER_HEIGHT: u32 = 1080;

/// Default base directory for report output
pub const DEFAULT_REPORTS_DIR: &str = "reports";

// ============================================================================
// Environment Variable Names
// ============================================================================

/// Environment variable for headless mode
pub const ENV_HEADLESS: &str = "HEADLESS";

/// Environment variable for quiet runner output
pub const ENV_QUIET: &str = "QUIET";

/// Environment variable for parallel runner workers
pub const ENV_PARALLEL: &str = "PARALLEL";

/// Environment variable for timestamped report archiving
pub const ENV_SAVE_HISTORICAL_REPORTS: &str = "SAVE_HISTORICAL_REPORTS";

/// Environment variable for skipping credential-gated tests
pub const ENV_SKIP_SECRETS: &str = "SKIP_SECRETS";

/// Environment variable for displaying captured output
pub const ENV_DISPLAY_PRINTS: &str = "DISPLAY_PRINTS";

/// Environment variable for console logging
pub const ENV_LOG_CLI: &str = "LOG_CLI";

/// Environment variable for the log level name
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";

/// Environment variable for the explicit wait budget (seconds)
pub const ENV_DEFAULT_WAIT_TIMEOUT: &str = "DEFAULT_WAIT_TIMEOUT";

/// Environment variable for the browser name
pub const ENV_BROWSER: &str = "BROWSER";

/// Environment variable for the WebDriver endpoint
pub const ENV_WEBDRIVER_URL: &str = "WEBDRIVER_URL";

/// Environment variable for the browser window width
pub const ENV_BROWSER_WIDTH: &str = "BROWSER_WIDTH";

/// Environment variable for the browser window height
pub const ENV_BROWSER_HEIGHT: &str = "BROWSER_HEIGHT";

/// Environment variable for the report base directory
pub const ENV_REPORTS_DIR: &str = "REPORTS_DIR";

// ============================================================================
// Configuration Getters (with caching)
// ============================================================================

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Get the global configuration (initialized from environment on first access)
pub fn get() -> &'static Config {
    CONFIG.get_or_init(Config::from_env)
}

/// Centralized configuration for the harness
#[derive(Debug, Clone)]
pub struct Config {
    /// Run configuration forwarded to the test runner
    pub run: RunSettings,
    /// Browser session configuration
    pub browser: BrowserSettings,
    /// Logging configuration
    pub logging: LogSettings,
    /// Explicit wait defaults
    pub waits: WaitSettings,
}

/// Settings that shape the test-runner invocation and report lifecycle
#[derive(Debug, Clone)]
pub struct RunSettings {
    /// Add quiet/short-traceback flags to the runner
    pub quiet: bool,
    /// Request automatic parallel workers from the runner
    pub parallel: bool,
    /// Keep a timestamped archive of each run's report
    pub save_historical_reports: bool,
    /// Skip tests that require credentials
    pub skip_secrets: bool,
    /// Let the runner display captured output
    pub display_prints: bool,
    /// Base directory for report output
    pub reports_dir: String,
}

/// Browser-related settings
#[derive(Debug, Clone)]
pub struct BrowserSettings {
    /// Browser name (chrome, firefox, edge)
    pub name: String,
    /// Run browsers without a visible window
    pub headless: bool,
    /// WebDriver endpoint URL
    pub webdriver_url: String,
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
}

/// Logging-related settings
#[derive(Debug, Clone)]
pub struct LogSettings {
    /// Emit logs to the console
    pub log_cli: bool,
    /// Minimum level name to log (DEBUG, INFO, WARNING, ERROR, CRITICAL)
    pub level: String,
}

/// Explicit wait defaults
#[derive(Debug, Clone)]
pub struct WaitSettings {
    /// Maximum time to wait for a condition
    pub timeout: Duration,
    /// How often to re-evaluate a condition
    pub interval: Duration,
}

impl Config {
    /// Create configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            run: RunSettings::from_env(),
            browser: BrowserSettings::from_env(),
            logging: LogSettings::from_env(),
            waits: WaitSettings::from_env(),
        }
    }

    /// Create configuration with all defaults (ignoring environment)
    pub fn defaults() -> Self {
        Self {
            run: RunSettings::defaults(),
            browser: BrowserSettings::defaults(),
            logging: LogSettings::defaults(),
            waits: WaitSettings::defaults(),
        }
    }

    /// Variables to export explicitly into the spawned runner's environment.
    ///
    /// The child inherits the process environment anyway; exporting these
    /// makes the effective defaults visible to it even when unset here.
    pub fn child_env(&self) -> Vec<(String, String)> {
        vec![
            (ENV_SKIP_SECRETS.into(), self.run.skip_secrets.to_string()),
            (ENV_DISPLAY_PRINTS.into(), self.run.display_prints.to_string()),
            (ENV_HEADLESS.into(), self.browser.headless.to_string()),
        ]
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

impl RunSettings {
    /// Create run settings from environment variables
    pub fn from_env() -> Self {
        Self {
            quiet: env_bool(ENV_QUIET, false),
            parallel: env_bool(ENV_PARALLEL, false),
            save_historical_reports: env_bool(ENV_SAVE_HISTORICAL_REPORTS, false),
            skip_secrets: env_bool(ENV_SKIP_SECRETS, true),
            display_prints: env_bool(ENV_DISPLAY_PRINTS, false),
            reports_dir: env::var(ENV_REPORTS_DIR)
                .unwrap_or_else(|_| DEFAULT_REPORTS_DIR.to_string()),
        }
    }

    /// Create run settings with defaults
    pub fn defaults() -> Self {
        Self {
            quiet: false,
            parallel: false,
            save_historical_reports: false,
            skip_secrets: true,
            display_prints: false,
            reports_dir: DEFAULT_REPORTS_DIR.to_string(),
        }
    }
}

impl BrowserSettings {
    /// Create browser settings from environment variables
    pub fn from_env() -> Self {
        Self {
            name: env::var(ENV_BROWSER).unwrap_or_else(|_| DEFAULT_BROWSER.to_string()),
            headless: env_bool(ENV_HEADLESS, false),
            webdriver_url: env::var(ENV_WEBDRIVER_URL)
                .unwrap_or_else(|_| DEFAULT_WEBDRIVER_URL.to_string()),
            width: env_parse(ENV_BROWSER_WIDTH, DEFAULT_BROWSER_WIDTH),
            height: env_parse(ENV_BROWSER_HEIGHT, DEFAULT_BROWSER_HEIGHT),
        }
    }

    /// Create browser settings with defaults
    pub fn defaults() -> Self {
        Self {
            name: DEFAULT_BROWSER.to_string(),
            headless: false,
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            width: DEFAULT_BROWSER_WIDTH,
            height: DEFAULT_BROWSER_HEIGHT,
        }
    }
}

impl LogSettings {
    /// Create logging settings from environment variables
    pub fn from_env() -> Self {
        Self {
            log_cli: env_bool(ENV_LOG_CLI, false),
            level: env::var(ENV_LOG_LEVEL).unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string()),
        }
    }

    /// Create logging settings with defaults
    pub fn defaults() -> Self {
        Self {
            log_cli: false,
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl WaitSettings {
    /// Create wait settings from environment variables
    pub fn from_env() -> Self {
        Self {
            timeout: Duration::from_secs(env_parse(
                ENV_DEFAULT_WAIT_TIMEOUT,
                DEFAULT_WAIT_TIMEOUT_SECS,
            )),
            interval: Duration::from_millis(DEFAULT_WAIT_INTERVAL_MS),
        }
    }

    /// Create wait settings with defaults
    pub fn defaults() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_WAIT_TIMEOUT_SECS),
            interval: Duration::from_millis(DEFAULT_WAIT_INTERVAL_MS),
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Read a case-insensitive "true"/"false" environment variable
fn env_bool(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(value) => value.trim().eq_ignore_ascii_case("true"),
        Err(_) => default,
    }
}

/// Read and parse an environment variable, falling back to a default
fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
