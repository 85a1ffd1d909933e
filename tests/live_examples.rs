//! Live example flows against real services.
//!
//! These tests need a running WebDriver endpoint (`WEBDRIVER_URL`, e.g. a
//! selenium standalone at localhost:4444) or outbound network access, so
//! they are ignored by default. Run them with `cargo test -- --ignored`.

use std::time::Duration;

use serde_json::json;
use thirtyfour_sync::{By, WebDriverCommands};
use web_harness::api::{EchoResponse, PostmanEchoApi};
use web_harness::browser;
use web_harness::config::Config;
use web_harness::pages::Page;
use web_harness::pages::craigslist::{NyCraigslistHomePage, NyCraigslistSearchResultsPage};
use web_harness::pages::wikipedia::{WikipediaHomePage, WikipediaSearchResultsPage};
use web_harness::timing::{self, WaitPolicy};

const DEMO_TIMEOUT: Duration = Duration::from_secs(2);

#[test]
#[ignore = "requires a WebDriver endpoint"]
fn test_wikipedia_search_end_to_end() {
    let config = Config::from_env();
    let driver = browser::connect(&config.browser).unwrap();

    let home = WikipediaHomePage::new(&driver);
    home.load().unwrap();
    home.search("Selenium UI automation").unwrap();

    let results = WikipediaSearchResultsPage::new(&driver);
    results.verify_loaded().unwrap();

    let title = driver.title().unwrap();
    assert!(
        title.contains("Search results"),
        "expected a search results title, got '{title}'"
    );
}

#[test]
#[ignore = "requires a WebDriver endpoint"]
fn test_craigslist_search_end_to_end() {
    let config = Config::from_env();
    let driver = browser::connect(&config.browser).unwrap();

    let home = NyCraigslistHomePage::new(&driver);
    home.load().unwrap();
    home.search("rocking chair").unwrap();

    let results = NyCraigslistSearchResultsPage::new(&driver);
    results.verify_loaded().unwrap();

    let url = driver.current_url().unwrap();
    assert!(
        url.contains(NyCraigslistSearchResultsPage::URL),
        "expected a search results URL, got '{url}'"
    );
}

#[test]
#[ignore = "requires a WebDriver endpoint"]
fn test_wait_until_visible_finds_obvious_element() {
    let config = Config::from_env();
    let driver = browser::connect(&config.browser).unwrap();

    let home = WikipediaHomePage::new(&driver);
    home.load().unwrap();

    let policy = WaitPolicy::with_timeout(DEMO_TIMEOUT);
    let element =
        timing::wait_until_visible(&driver, By::XPath("//input[@name='search']"), &policy)
            .unwrap();
    assert!(element.is_displayed().unwrap());
}

#[test]
#[ignore = "requires a WebDriver endpoint"]
fn test_wait_for_missing_element_times_out() {
    let config = Config::from_env();
    let driver = browser::connect(&config.browser).unwrap();

    let home = WikipediaHomePage::new(&driver);
    home.load().unwrap();

    let policy = WaitPolicy::with_timeout(DEMO_TIMEOUT);
    let err = timing::wait_until_visible(&driver, By::Id("nonexistent-element"), &policy)
        .unwrap_err();
    assert!(err.is_timeout());

    // An element that is not on the page at all counts as invisible.
    timing::wait_until_invisible(&driver, By::Id("not-on-page"), &policy).unwrap();
}

#[test]
#[ignore = "requires outbound network access"]
fn test_postman_echo_round_trips() {
    let api = PostmanEchoApi::new();

    let response = api.echo_get(&[("foo1", "bar1"), ("foo2", "bar2")]).unwrap();
    assert_eq!(response.status(), 200);
    let echo: EchoResponse = response.json().unwrap();
    assert_eq!(echo.args.get("foo1").map(String::as_str), Some("bar1"));

    let payload = json!({"key": "value"});
    let response = api.echo_post(&payload).unwrap();
    assert_eq!(response.status(), 200);
    let echo: EchoResponse = response.json().unwrap();
    assert_eq!(echo.json, Some(payload));
}
