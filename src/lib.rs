//! Web Harness - browser UI/API test automation scaffold.
//!
//! This crate provides:
//! - Explicit-wait polling with timeout and failure hooks
//! - A test-runner command builder with report/screenshot lifecycle management
//! - Page-object support over a synchronous WebDriver client
//! - A blocking HTTP client wrapper for API tests
//! - DOM dumps on page-load failure and colorized logging
//!
//! # Example
//!
//! ```rust,no_run
//! use web_harness::browser;
//! use web_harness::config::Config;
//! use web_harness::pages::Page;
//! use web_harness::pages::wikipedia::WikipediaHomePage;
//!
//! let config = Config::from_env();
//! let driver = browser::connect(&config.browser).unwrap();
//! let home = WikipediaHomePage::new(&driver);
//! home.load().unwrap();
//! home.search("Selenium UI automation").unwrap();
//! ```

pub mod api;
pub mod browser;
pub mod config;
pub mod dom;
pub mod error;
pub mod logging;
pub mod pages;
pub mod report;
pub mod runner;
pub mod timing;

// Re-export the error surface
pub use error::{Error, Result};

// Re-export the explicit-wait utilities
pub use timing::{
    WaitPolicy, wait_until_clickable, wait_until_invisible, wait_until_true, wait_until_true_or,
    wait_until_visible,
};

// Re-export run orchestration types
pub use report::ReportRun;
pub use runner::RunCommand;

// Re-export page and API support
pub use api::ApiClient;
pub use browser::Browser;
pub use pages::Page;
