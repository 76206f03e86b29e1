//! Session acquisition with retry and guaranteed teardown.
//!
//! The entry point for an automation run: establish a browser session
//! through a [`SessionFactory`] (retrying transient launch failures), hand
//! it to the caller's routine, and close it on every exit path.
//!
//! # Example
//!
//! ```ignore
//! use voltron::runner::run_with_session;
//! use voltron::page::LinkedInPage;
//!
//! let results = run_with_session(&factory, |session| async move {
//!     let page = LinkedInPage::open(session).await?;
//!     page.search("rust jobs").await?.item_names().await
//! })
//! .await?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;
use tracing::{debug, error, warn};

use crate::error::{Error, Result};
use crate::session::BrowserSession;

// ============================================================================
// Constants
// ============================================================================

/// Default number of session establishment attempts.
pub const DEFAULT_LAUNCH_ATTEMPTS: u32 = 3;

/// Default delay between launch attempts (5 seconds).
pub const DEFAULT_LAUNCH_DELAY: Duration = Duration::from_secs(5);

// ============================================================================
// SessionFactory
// ============================================================================

/// Produces live browser sessions.
///
/// Implemented by the concrete WebDriver binding glue (or a test double);
/// each call should attempt a fresh session.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    /// Attempts to establish one browser session.
    async fn connect(&self) -> Result<Arc<dyn BrowserSession>>;
}

// ============================================================================
// Retry
// ============================================================================

/// Establishes a session, retrying failed attempts.
///
/// Each failure is logged; between attempts the runner sleeps for `delay`.
///
/// # Errors
///
/// - [`Error::Config`] when `attempts` is zero.
/// - [`Error::Launch`] carrying the last failure when every attempt fails.
pub async fn connect_with_retry(
    factory: &dyn SessionFactory,
    attempts: u32,
    delay: Duration,
) -> Result<Arc<dyn BrowserSession>> {
    if attempts == 0 {
        return Err(Error::config("at least one launch attempt is required"));
    }

    let mut last_failure = String::new();
    for attempt in 1..=attempts {
        debug!(attempt, attempts, "Attempting to establish browser session");
        match factory.connect().await {
            Ok(session) => return Ok(session),
            Err(err) => {
                error!(attempt, error = %err, "Session attempt failed");
                last_failure = err.to_string();
                if attempt < attempts {
                    sleep(delay).await;
                }
            }
        }
    }
    Err(Error::launch(attempts, last_failure))
}

// ============================================================================
// Scoped Run
// ============================================================================

/// Acquires a session with default retry settings, runs `routine`, and
/// closes the session regardless of the routine's outcome.
pub async fn run_with_session<T, F, Fut>(factory: &dyn SessionFactory, routine: F) -> Result<T>
where
    F: FnOnce(Arc<dyn BrowserSession>) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    run_with_session_retry(factory, DEFAULT_LAUNCH_ATTEMPTS, DEFAULT_LAUNCH_DELAY, routine).await
}

/// Like [`run_with_session`] with explicit retry settings.
pub async fn run_with_session_retry<T, F, Fut>(
    factory: &dyn SessionFactory,
    attempts: u32,
    delay: Duration,
    routine: F,
) -> Result<T>
where
    F: FnOnce(Arc<dyn BrowserSession>) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let session = connect_with_retry(factory, attempts, delay).await?;
    let result = routine(Arc::clone(&session)).await;
    if let Err(err) = session.close().await {
        warn!(error = %err, "Failed to close browser session");
    }
    result
}

// ============================================================================
// Tests
// ============================================================================
