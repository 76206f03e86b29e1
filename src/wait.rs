//! Generic condition polling.
//!
//! [`wait_for_result`] repeatedly evaluates a caller-supplied probe until its
//! result matches the expected truthiness, a non-bypassed error is raised, or
//! the deadline passes. It is the single retry primitive everything else in
//! this crate (element lookups, widget state waits) is built on.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use voltron::wait::{WaitOptions, wait_for_result};
//!
//! let visible = wait_for_result(
//!     || async { panel.is_displayed().await },
//!     WaitOptions::new("results panel visible")
//!         .timeout(Duration::from_secs(5))
//!         .poll_interval(Duration::from_millis(250)),
//! )
//! .await?;
//! ```
//!
//! On deadline expiry the poller never raises: it returns the last observed
//! value (`Ok(None)` when the probe never completed without a bypassed
//! error), leaving the "is this a failure" decision to the caller.

// ============================================================================
// Imports
// ============================================================================

use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::{debug, info};

use crate::error::{Error, ErrorKind, Result};

// ============================================================================
// Constants
// ============================================================================

/// Default wall-clock budget for a poll operation (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default sleep between probe invocations (500 milliseconds).
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Default transient set: conditions a poll swallows and retries past.
pub const DEFAULT_BYPASS: &[ErrorKind] = &[ErrorKind::ElementNotFound, ErrorKind::StaleElement];

// ============================================================================
// Truthy
// ============================================================================

/// Truthiness coercion for probe results.
///
/// The poller compares `value.is_truthy()` against the expected boolean, so
/// probes can return whatever value is most useful to the caller (a handle,
/// a list, a string) while the polling decision stays boolean.
pub trait Truthy {
    /// Returns the boolean interpretation of this value.
    fn is_truthy(&self) -> bool;
}

impl Truthy for bool {
    #[inline]
    fn is_truthy(&self) -> bool {
        *self
    }
}

impl<T> Truthy for Option<T> {
    #[inline]
    fn is_truthy(&self) -> bool {
        self.is_some()
    }
}

impl<T> Truthy for Vec<T> {
    #[inline]
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthy for String {
    #[inline]
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthy for &str {
    #[inline]
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthy for usize {
    #[inline]
    fn is_truthy(&self) -> bool {
        *self != 0
    }
}

impl Truthy for serde_json::Value {
    fn is_truthy(&self) -> bool {
        match self {
            serde_json::Value::Null => false,
            serde_json::Value::Bool(b) => *b,
            serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            serde_json::Value::String(s) => !s.is_empty(),
            serde_json::Value::Array(a) => !a.is_empty(),
            serde_json::Value::Object(_) => true,
        }
    }
}

// ============================================================================
// WaitOptions
// ============================================================================

/// Configuration for a single poll operation.
///
/// Defaults mirror the crate constants: expected result `true`, 30 second
/// timeout, 500 millisecond interval, and the [`DEFAULT_BYPASS`] set.
#[derive(Debug, Clone)]
pub struct WaitOptions {
    /// Human-readable condition label for diagnostics.
    name: String,
    /// Desired truthiness of the probe's return value.
    expected: bool,
    /// Maximum wall-clock time to keep polling.
    timeout: Duration,
    /// Sleep between probe invocations. Must be non-zero.
    poll_interval: Duration,
    /// Condition kinds to swallow and retry past.
    bypass: Vec<ErrorKind>,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            name: "condition".to_string(),
            expected: true,
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            bypass: DEFAULT_BYPASS.to_vec(),
        }
    }
}

impl WaitOptions {
    /// Creates options with the given condition name and default settings.
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the desired truthiness of the probe result.
    #[inline]
    #[must_use]
    pub fn expected(mut self, expected: bool) -> Self {
        self.expected = expected;
        self
    }

    /// Sets the maximum wall-clock polling budget.
    #[inline]
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the sleep between probe invocations.
    #[inline]
    #[must_use]
    pub fn poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Replaces the transient condition set.
    #[inline]
    #[must_use]
    pub fn bypass(mut self, kinds: impl IntoIterator<Item = ErrorKind>) -> Self {
        self.bypass = kinds.into_iter().collect();
        self
    }

    /// Returns the condition label.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

// ============================================================================
// Poll Loop
// ============================================================================

/// Polls `probe` until its result matches the expected truthiness or the
/// deadline passes.
///
/// Behavior:
///
/// 1. The deadline is `now + max(timeout, poll_interval / 2)`, so even a zero
///    timeout allows one evaluation window.
/// 2. Each iteration awaits the probe. An error whose kind is in the bypass
///    set counts as "no result this iteration" and the loop continues; any
///    other error aborts the poll immediately. A value whose truthiness
///    equals the expected boolean is returned at once.
/// 3. On deadline expiry the last observed value is returned — `Ok(None)`
///    when the probe never completed without a bypassed error. Timeout is
///    not an error from the poller's point of view.
///
/// # Errors
///
/// - [`Error::Config`] if `poll_interval` is zero (would spin).
/// - Any probe error whose kind is outside the bypass set, unmodified.
pub async fn wait_for_result<T, F, Fut>(mut probe: F, options: WaitOptions) -> Result<Option<T>>
where
    T: Truthy,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    if options.poll_interval.is_zero() {
        return Err(Error::config("poll interval must be greater than zero"));
    }

    let started = Instant::now();
    // Even a zero or sub-interval timeout gets one evaluation window.
    let window = options.timeout.max(options.poll_interval / 2);
    let deadline = started + window;
    let mut last: Option<T> = None;

    while Instant::now() < deadline {
        match probe().await {
            Ok(value) => {
                let current = value.is_truthy();
                if current == options.expected {
                    info!(
                        condition = %options.name,
                        result = current,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Condition succeeded"
                    );
                    return Ok(Some(value));
                }
                debug!(
                    condition = %options.name,
                    expected = options.expected,
                    current,
                    "Condition not met yet, waiting"
                );
                last = Some(value);
            }
            Err(err) if options.bypass.contains(&err.kind()) => {
                debug!(
                    condition = %options.name,
                    kind = ?err.kind(),
                    error = %err,
                    "Overriding bypassed condition in wait"
                );
            }
            Err(err) => return Err(err),
        }
        sleep(options.poll_interval).await;
    }

    debug!(
        condition = %options.name,
        expected = options.expected,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Gave up waiting for condition"
    );
    Ok(last)
}

// ============================================================================
// Tests
// ============================================================================
