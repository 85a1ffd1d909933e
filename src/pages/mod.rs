//! Page-object support.
//!
//! A page object wraps one browser-rendered page behind named element
//! lookups and high-level actions, so tests never touch raw locators. The
//! [`Page`] trait supplies the shared machinery: locator resolution,
//! load verification with explicit waits, and DOM dumps when a page never
//! reaches its expected state.

pub mod craigslist;
pub mod wikipedia;

use std::path::PathBuf;

use thirtyfour_sync::{By, WebDriver, WebDriverCommands, WebElement};

use crate::dom;
use crate::error::{Error, Result};
use crate::timing::{self, WaitPolicy};

/// Shared behavior for page objects.
///
/// Implementors provide the driver handle, a page name used in debug
/// artifacts, and whichever of URL fragment, title fragment, and locator
/// table the page defines. Everything else has a default.
pub trait Page {
    /// The WebDriver session this page drives.
    fn driver(&self) -> &WebDriver;

    /// Page name, used in DOM dump filenames.
    fn name(&self) -> &'static str;

    /// URL fragment the browser URL must contain once loaded.
    fn url(&self) -> Option<&str> {
        None
    }

    /// Title fragment the page title must contain once loaded.
    fn title(&self) -> Option<&str> {
        None
    }

    /// Named locator table for this page.
    fn locators(&self) -> &[(&'static str, By<'static>)] {
        &[]
    }

    /// Report directory for DOM dumps on load failure, if any.
    fn dump_dir(&self) -> Option<PathBuf> {
        None
    }

    /// Wait policy for this page's load checks.
    fn wait_policy(&self) -> WaitPolicy {
        WaitPolicy::default()
    }

    /// Resolve a named locator.
    fn locator(&self, name: &str) -> Result<By<'static>> {
        self.locators()
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, by)| by.clone())
            .ok_or_else(|| {
                Error::Config(format!("locator '{name}' not defined for {}", self.name()))
            })
    }

    /// Look up a named element on the page.
    fn element(&self, name: &str) -> Result<WebElement<'_>> {
        let by = self.locator(name)?;
        Ok(self.driver().find_element(by)?)
    }

    /// Wait for a condition, dumping the DOM if it times out.
    ///
    /// Pages with no dump directory still wait; they just skip the artifact.
    fn wait_with_dump(
        &self,
        condition: impl FnMut() -> Result<bool>,
        policy: &WaitPolicy,
        reason: &str,
    ) -> Result<()> {
        match self.dump_dir() {
            Some(dir) => timing::wait_until_true_or(condition, policy, || {
                let filename = format!("{}_{reason}.html", self.name());
                dom::save_dom(self.driver(), &dir, &filename).map(|_| ())
            }),
            None => timing::wait_until_true(condition, policy),
        }
    }

    /// The URL and title checks every page inherits.
    ///
    /// Kept separate from [`Page::verify_loaded`] so overriding pages can
    /// run these first and then add their own element checks.
    fn verify_base(&self) -> Result<()> {
        if let Some(url) = self.url() {
            let policy = self
                .wait_policy()
                .message(format!("expected URL to contain '{url}'"));
            self.wait_with_dump(
                || Ok(self.driver().current_url()?.contains(url)),
                &policy,
                "is_loaded_failed_url",
            )?;
        }

        if let Some(title) = self.title() {
            let policy = self
                .wait_policy()
                .message(format!("expected title to contain '{title}'"));
            self.wait_with_dump(
                || Ok(self.driver().title()?.contains(title)),
                &policy,
                "is_loaded_failed_title",
            )?;
        }

        Ok(())
    }

    /// Wait until the page is finished loading.
    fn verify_loaded(&self) -> Result<()> {
        self.verify_base()
    }

    /// Navigate to the page and verify it loaded.
    fn load(&self) -> Result<()> {
        let url = self.url().ok_or_else(|| {
            Error::Config(format!("page {} does not define a URL", self.name()))
        })?;
        self.driver().get(url)?;
        self.verify_loaded()
    }
}
