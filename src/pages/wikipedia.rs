//! Page objects for the Wikipedia example flows.

use std::path::PathBuf;

use thirtyfour_sync::{By, Keys, WebDriver};

use crate::error::Result;
use crate::pages::Page;

/// Page object for the Wikipedia portal page
pub struct WikipediaHomePage<'d> {
    driver: &'d WebDriver,
    dump_dir: Option<PathBuf>,
}

impl<'d> WikipediaHomePage<'d> {
    /// Landing page URL
    pub const URL: &'static str = "https://www.wikipedia.org";

    /// Expected title fragment
    pub const TITLE: &'static str = "Wikipedia";

    pub fn new(driver: &'d WebDriver) -> Self {
        Self {
            driver,
            dump_dir: None,
        }
    }

    /// Save DOM dumps under `dir` if load verification fails.
    pub fn with_dump_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dump_dir = Some(dir.into());
        self
    }

    /// Type into the search box and submit it.
    pub fn search(&self, query: &str) -> Result<()> {
        let search_box = self.element("search_box")?;
        search_box.send_keys(query)?;
        search_box.send_keys(Keys::Enter)?;
        Ok(())
    }
}

impl Page for WikipediaHomePage<'_> {
    fn driver(&self) -> &WebDriver {
        self.driver
    }

    fn name(&self) -> &'static str {
        "WikipediaHomePage"
    }

    fn url(&self) -> Option<&str> {
        Some(Self::URL)
    }

    fn title(&self) -> Option<&str> {
        Some(Self::TITLE)
    }

    fn locators(&self) -> &[(&'static str, By<'static>)] {
        &[("search_box", By::XPath("//input[@name='search']"))]
    }

    fn dump_dir(&self) -> Option<PathBuf> {
        self.dump_dir.clone()
    }

    fn verify_loaded(&self) -> Result<()> {
        self.verify_base()?;

        let policy = self
            .wait_policy()
            .message("search box is not displayed on the Wikipedia home page");
        self.wait_with_dump(
            || Ok(self.element("search_box")?.is_displayed()?),
            &policy,
            "is_loaded_failed",
        )
    }
}

/// Page object for the Wikipedia search results page
pub struct WikipediaSearchResultsPage<'d> {
    driver: &'d WebDriver,
    dump_dir: Option<PathBuf>,
}

impl<'d> WikipediaSearchResultsPage<'d> {
    /// Partial URL; the full URL depends on the search terms
    pub const URL: &'static str = "https://en.wikipedia.org/wiki";

    /// Partial title; the full text is `<terms> - Search results - Wikipedia`
    pub const TITLE: &'static str = "- Search results - Wikipedia";

    pub fn new(driver: &'d WebDriver) -> Self {
        Self {
            driver,
            dump_dir: None,
        }
    }

    /// Save DOM dumps under `dir` if load verification fails.
    pub fn with_dump_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dump_dir = Some(dir.into());
        self
    }
}

impl Page for WikipediaSearchResultsPage<'_> {
    fn driver(&self) -> &WebDriver {
        self.driver
    }

    fn name(&self) -> &'static str {
        "WikipediaSearchResultsPage"
    }

    fn url(&self) -> Option<&str> {
        Some(Self::URL)
    }

    fn title(&self) -> Option<&str> {
        Some(Self::TITLE)
    }

    fn dump_dir(&self) -> Option<PathBuf> {
        self.dump_dir.clone()
    }
}
