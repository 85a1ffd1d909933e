//! Explicit-wait polling utilities.
//!
//! An explicit wait re-evaluates a condition at a fixed interval until it
//! holds or a deadline elapses, instead of sleeping a fixed amount and hoping.
//! This is the synchronization primitive every page object builds on.
//!
//! A condition that errors is not itself a test failure. Only exhausting the
//! timeout fails, and it always fails as [`Error::Timeout`], including when
//! the underlying WebDriver lookup is what kept erroring.

use std::cell::RefCell;
use std::thread;
use std::time::{Duration, Instant};

use thirtyfour_sync::error::WebDriverError;
use thirtyfour_sync::{By, WebDriver, WebDriverCommands, WebElement};
use tracing::{debug, warn};

use crate::config;
use crate::error::{Error, Result};

/// Policy for a single explicit wait.
#[derive(Debug, Clone)]
pub struct WaitPolicy {
    /// Maximum time to wait for the condition
    pub timeout: Duration,
    /// How often to re-evaluate the condition
    pub interval: Duration,
    /// Message to attach to the timeout error
    pub message: Option<String>,
}

impl WaitPolicy {
    /// Create a policy with explicit timeout and interval.
    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self {
            timeout,
            interval,
            message: None,
        }
    }

    /// Create a policy with a custom timeout and the configured default interval.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new(timeout, config::get().waits.interval)
    }

    /// Attach a message to show if the wait times out.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Default for WaitPolicy {
    fn default() -> Self {
        let waits = &config::get().waits;
        Self::new(waits.timeout, waits.interval)
    }
}

/// Wait until `condition` returns `Ok(true)`.
///
/// The condition is re-evaluated every `policy.interval` until it holds or
/// `policy.timeout` elapses. A condition that returns `Err` is logged at
/// debug level and polling continues; the error it carried never escapes.
///
/// # Errors
///
/// Returns [`Error::Timeout`] if the condition never held within the budget.
/// This is the only error this function returns.
pub fn wait_until_true<C>(condition: C, policy: &WaitPolicy) -> Result<()>
where
    C: FnMut() -> Result<bool>,
{
    wait_until_true_or(condition, policy, || Ok(()))
}

/// Like [`wait_until_true`], with a hook invoked once if the wait times out.
///
/// The hook runs before the timeout error is returned, so it can capture
/// debug artifacts (a DOM dump, a screenshot) while the page is still in its
/// failed state. A hook that itself fails is logged at warn level and never
/// masks the timeout.
pub fn wait_until_true_or<C, H>(mut condition: C, policy: &WaitPolicy, on_timeout: H) -> Result<()>
where
    C: FnMut() -> Result<bool>,
    H: FnOnce() -> Result<()>,
{
    let deadline = Instant::now() + policy.timeout;

    while Instant::now() < deadline {
        match condition() {
            Ok(true) => return Ok(()),
            Ok(false) => {}
            Err(err) => debug!("wait condition errored, still polling: {err}"),
        }
        thread::sleep(policy.interval);
    }

    if let Err(err) = on_timeout() {
        warn!("on-timeout hook failed: {err}");
    }
    Err(Error::timeout(policy.message.clone(), policy.timeout))
}

/// Wait for the element located by `by` to be displayed, and return it.
pub fn wait_until_visible<'a>(
    driver: &'a WebDriver,
    by: By<'_>,
    policy: &WaitPolicy,
) -> Result<WebElement<'a>> {
    let found = RefCell::new(None);
    wait_until_true(
        || {
            let element = driver.find_element(by.clone())?;
            if element.is_displayed()? {
                *found.borrow_mut() = Some(element);
                Ok(true)
            } else {
                Ok(false)
            }
        },
        policy,
    )?;
    found
        .into_inner()
        .ok_or_else(|| Error::timeout(policy.message.clone(), policy.timeout))
}

/// Wait for the element located by `by` to be displayed and enabled, and return it.
pub fn wait_until_clickable<'a>(
    driver: &'a WebDriver,
    by: By<'_>,
    policy: &WaitPolicy,
) -> Result<WebElement<'a>> {
    let found = RefCell::new(None);
    wait_until_true(
        || {
            let element = driver.find_element(by.clone())?;
            if element.is_displayed()? && element.is_enabled()? {
                *found.borrow_mut() = Some(element);
                Ok(true)
            } else {
                Ok(false)
            }
        },
        policy,
    )?;
    found
        .into_inner()
        .ok_or_else(|| Error::timeout(policy.message.clone(), policy.timeout))
}

/// Wait until the element located by `by` is absent, stale, or not displayed.
pub fn wait_until_invisible(driver: &WebDriver, by: By<'_>, policy: &WaitPolicy) -> Result<()> {
    wait_until_true(
        || match driver.find_element(by.clone()) {
            Ok(element) => Ok(!element.is_displayed().unwrap_or(false)),
            Err(WebDriverError::NoSuchElement(_)) => Ok(true),
            Err(WebDriverError::StaleElementReference(_)) => Ok(true),
            Err(err) => Err(err.into()),
        },
        policy,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn quick_policy(timeout_ms: u64) -> WaitPolicy {
        WaitPolicy::new(
            Duration::from_millis(timeout_ms),
            Duration::from_millis(10),
        )
    }

    #[test]
    fn test_succeeds_immediately() {
        let result = wait_until_true(|| Ok(true), &quick_policy(1000));
        assert!(result.is_ok());
    }

    #[test]
    fn test_succeeds_eventually() {
        let attempts = AtomicU32::new(0);
        let result = wait_until_true(
            || Ok(attempts.fetch_add(1, Ordering::SeqCst) >= 3),
            &quick_policy(1000),
        );
        assert!(result.is_ok());
        assert!(attempts.load(Ordering::SeqCst) >= 3);
    }

    #[test]
    fn test_times_out_no_earlier_than_budget() {
        let start = Instant::now();
        let result = wait_until_true(|| Ok(false), &quick_policy(100));
        assert!(start.elapsed() >= Duration::from_millis(100));
        match result {
            Err(Error::Timeout { .. }) => {}
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_timeout_still_times_out() {
        let result = wait_until_true(|| Ok(true), &WaitPolicy::new(Duration::ZERO, Duration::from_millis(1)));
        // Zero budget means the condition may never even be evaluated; the
        // wait must still report a timeout rather than silently succeed.
        assert!(matches!(result, Err(Error::Timeout { .. })));
    }

    #[test]
    fn test_erroring_condition_yields_timeout() {
        let result = wait_until_true(
            || Err(Error::Config("flaky lookup".into())),
            &quick_policy(100),
        );
        match result {
            Err(err) => assert!(err.is_timeout(), "expected timeout, got {:?}", err),
            Ok(()) => panic!("expected timeout"),
        }
    }

    #[test]
    fn test_timeout_carries_message() {
        let policy = quick_policy(50).message("widget never appeared");
        let err = wait_until_true(|| Ok(false), &policy).unwrap_err();
        assert!(err.to_string().contains("widget never appeared"));
    }

    #[test]
    fn test_on_timeout_hook_runs_exactly_once() {
        let calls = AtomicU32::new(0);
        let result = wait_until_true_or(
            || Ok(false),
            &quick_policy(50),
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            },
        );
        assert!(matches!(result, Err(Error::Timeout { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_hook_not_run_on_success() {
        let calls = AtomicU32::new(0);
        let result = wait_until_true_or(
            || Ok(true),
            &quick_policy(1000),
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            },
        );
        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_failing_hook_does_not_mask_timeout() {
        let result = wait_until_true_or(
            || Ok(false),
            &quick_policy(50),
            || Err(Error::Config("hook blew up".into())),
        );
        match result {
            Err(err) => assert!(err.is_timeout(), "hook error leaked: {:?}", err),
            Ok(()) => panic!("expected timeout"),
        }
    }
}
