//! DOM capture for debugging failed page interactions.
//!
//! When a page never reaches its expected state, the rendered DOM at the
//! moment of failure is usually the fastest way to see why. These helpers
//! write `document.documentElement.outerHTML` under `<report dir>/dom/`.
//! Dumps land only in the `latest` tree; they are not copied into the
//! timestamped archive.

use std::fs;
use std::path::{Path, PathBuf};

use thirtyfour_sync::{WebDriver, WebDriverCommands};
use tracing::{info, warn};

use crate::error::Result;

/// Subdirectory for DOM dumps inside a report directory
pub const DOM_DIRNAME: &str = "dom";

/// Script returning the full rendered DOM
const OUTER_HTML_SCRIPT: &str = "return document.documentElement.outerHTML;";

/// Path a dump named `filename` would be written to under `report_dir`.
pub fn dom_path(report_dir: &Path, filename: &str) -> PathBuf {
    report_dir.join(DOM_DIRNAME).join(filename)
}

/// Save the current DOM to `<report_dir>/dom/<filename>`.
pub fn save_dom(driver: &WebDriver, report_dir: &Path, filename: &str) -> Result<PathBuf> {
    let ret = driver.execute_script(OUTER_HTML_SCRIPT)?;
    let html = script_result_html(ret.value());

    let path = dom_path(report_dir, filename);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, html)?;
    info!("DOM saved to {}", path.display());
    Ok(path)
}

/// The dump content for whatever the DOM script returned.
///
/// The script normally yields a string, but if the driver hands back
/// something else the raw JSON goes into the dump instead of an empty file.
fn script_result_html(value: &serde_json::Value) -> String {
    match value.as_str() {
        Some(html) => html.to_string(),
        None => {
            warn!("DOM script returned a non-string value: {value}");
            value.to_string()
        }
    }
}

/// Run `op`, saving a DOM dump if it fails.
///
/// The dump is best effort: a failure to capture or write it is logged at
/// warn level and the original error from `op` is returned either way.
pub fn with_dom_dump<T>(
    driver: &WebDriver,
    report_dir: &Path,
    filename: &str,
    op: impl FnOnce() -> Result<T>,
) -> Result<T> {
    match op() {
        Ok(value) => Ok(value),
        Err(err) => {
            if let Err(dump_err) = save_dom(driver, report_dir, filename) {
                warn!("failed to save DOM dump '{filename}': {dump_err}");
            }
            Err(err)
        }
    }
}
