//! Browser session construction.
//!
//! Builds WebDriver capabilities from [`BrowserSettings`] and opens a session
//! against the configured endpoint. Driver binaries and their lifecycle are
//! the WebDriver server's problem, not this crate's.

use std::fmt;
use std::str::FromStr;

use thirtyfour_sync::{DesiredCapabilities, WebDriver, WebDriverCommands};
use tracing::{info, warn};

use crate::config::BrowserSettings;
use crate::error::{Error, Result};

/// Browsers the harness knows how to configure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Browser {
    Chrome,
    Firefox,
    Edge,
}

impl FromStr for Browser {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "chrome" => Ok(Browser::Chrome),
            "firefox" => Ok(Browser::Firefox),
            "edge" => Ok(Browser::Edge),
            _ => Err(Error::Config(format!("unsupported browser: '{name}'"))),
        }
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Browser::Chrome => write!(f, "chrome"),
            Browser::Firefox => write!(f, "firefox"),
            Browser::Edge => write!(f, "edge"),
        }
    }
}

/// Open a WebDriver session described by `settings`.
///
/// Headless mode gets the extra arguments CI environments usually need.
/// Headful sessions are maximized after connecting, mirroring what a tester
/// would see locally.
pub fn connect(settings: &BrowserSettings) -> Result<WebDriver> {
    let browser: Browser = settings.name.parse()?;

    let driver = match browser {
        Browser::Chrome => {
            let mut caps = DesiredCapabilities::chrome();
            if settings.headless {
                caps.set_headless()?;
                caps.add_chrome_arg("--disable-gpu")?;
                caps.add_chrome_arg("--no-sandbox")?;
                caps.add_chrome_arg("--disable-dev-shm-usage")?;
                caps.add_chrome_arg(&format!(
                    "--window-size={},{}",
                    settings.width, settings.height
                ))?;
            }
            WebDriver::new(&settings.webdriver_url, &caps)?
        }
        Browser::Firefox => {
            let mut caps = DesiredCapabilities::firefox();
            if settings.headless {
                caps.set_headless()?;
                for arg in firefox_geometry_args(settings) {
                    caps.add_firefox_arg(&arg)?;
                }
            }
            WebDriver::new(&settings.webdriver_url, &caps)?
        }
        Browser::Edge => {
            let caps = DesiredCapabilities::edge();
            if settings.headless {
                warn!("headless flags for edge must be configured on the WebDriver server side");
            }
            WebDriver::new(&settings.webdriver_url, &caps)?
        }
    };

    if !settings.headless {
        driver.maximize_window()?;
    }
    info!("opened {browser} session at {}", settings.webdriver_url);
    Ok(driver)
}

/// Window-geometry arguments for a headless firefox session.
///
/// Headless firefox ignores window-management commands, so the configured
/// size has to go in as command-line arguments.
fn firefox_geometry_args(settings: &BrowserSettings) -> [String; 2] {
    [
        format!("--width={}", settings.width),
        format!("--height={}", settings.height),
    ]
}
