//! Element lookup with polling fallback.
//!
//! [`find_one`] and [`find_many`] attempt an immediate lookup and, when the
//! failure is in the transient class, hand a retrying probe to the poller.
//! A missing element after the deadline is reported as an absent value, not
//! an error — page objects decide whether absence is fatal.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use tracing::debug;

use crate::error::{ErrorKind, Result};
use crate::selector::parse;
use crate::session::{Handle, SearchContext};
use crate::wait::{WaitOptions, wait_for_result};

// ============================================================================
// Constants
// ============================================================================

/// Default wall-clock budget for a lookup (15 seconds).
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(15);

/// Default transient set for lookups.
///
/// Session-level failures are retried here (unlike in state waits) because a
/// lookup racing a page load routinely observes transient driver errors.
pub const LOOKUP_BYPASS: &[ErrorKind] = &[
    ErrorKind::ElementNotFound,
    ErrorKind::StaleElement,
    ErrorKind::Session,
];

// ============================================================================
// find_one
// ============================================================================

/// Looks up a single element by selector string, polling until it appears.
///
/// The selector is parsed first; a grammar violation is a fatal configuration
/// error raised before any lookup. An immediate lookup is then attempted, and
/// a failure whose kind is in `bypass` delegates to the poller with a probe
/// re-running the lookup. Returns `Ok(None)` when the deadline passes without
/// the element appearing.
///
/// # Errors
///
/// - [`crate::Error::InvalidSelector`] for malformed selectors.
/// - Any lookup error whose kind is outside `bypass`.
pub async fn find_one(
    ctx: &dyn SearchContext,
    selector: &str,
    bypass: &[ErrorKind],
    timeout: Duration,
) -> Result<Option<Handle>> {
    let by = parse(selector)?;

    match ctx.find(&by).await {
        Ok(handle) => Ok(Some(handle)),
        Err(err) if bypass.contains(&err.kind()) => {
            debug!(selector, error = %err, "Immediate lookup failed, polling");
            let polled = wait_for_result(
                || async { ctx.find(&by).await.map(Some) },
                WaitOptions::new(format!("web element to exist by selector {selector}"))
                    .bypass(bypass.iter().copied())
                    .timeout(timeout),
            )
            .await?;
            Ok(polled.flatten())
        }
        Err(err) => Err(err),
    }
}

// ============================================================================
// find_many
// ============================================================================

/// Looks up all elements matching a selector string, polling until at least
/// one appears.
///
/// An empty result set triggers the same polling fallback as a transient
/// lookup failure. Returns an empty vec — never an error — when the deadline
/// passes without a match.
///
/// # Errors
///
/// - [`crate::Error::InvalidSelector`] for malformed selectors.
/// - Any lookup error whose kind is outside `bypass`.
pub async fn find_many(
    ctx: &dyn SearchContext,
    selector: &str,
    bypass: &[ErrorKind],
    timeout: Duration,
) -> Result<Vec<Handle>> {
    let by = parse(selector)?;

    match ctx.find_all(&by).await {
        Ok(handles) if !handles.is_empty() => return Ok(handles),
        Ok(_) => {}
        Err(err) if bypass.contains(&err.kind()) => {
            debug!(selector, error = %err, "Immediate bulk lookup failed, polling");
        }
        Err(err) => return Err(err),
    }

    let polled = wait_for_result(
        || async { ctx.find_all(&by).await },
        WaitOptions::new(format!("web elements to exist by selector {selector}"))
            .bypass(bypass.iter().copied())
            .timeout(timeout),
    )
    .await?;
    Ok(polled.unwrap_or_default())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use crate::error::Error;
    use crate::selector::By;
    use crate::session::ElementHandle;

    /// Inert handle used as a lookup result.
    struct NullHandle;

    #[async_trait]
    impl SearchContext for NullHandle {
        async fn find(&self, by: &By) -> Result<Handle> {
            Err(Error::element_not_found(by.to_string()))
        }

        async fn find_all(&self, _by: &By) -> Result<Vec<Handle>> {
            Ok(Vec::new())
        }
    }

    #[async_trait]
    impl ElementHandle for NullHandle {
        fn handle_id(&self) -> &str {
            "null"
        }

        async fn click(&self) -> Result<()> {
            Ok(())
        }

        async fn text(&self) -> Result<String> {
            Ok(String::new())
        }

        async fn attribute(&self, _name: &str) -> Result<Option<String>> {
            Ok(None)
        }

        async fn is_displayed(&self) -> Result<bool> {
            Ok(true)
        }

        async fn is_selected(&self) -> Result<bool> {
            Ok(false)
        }

        async fn send_keys(&self, _keys: &str) -> Result<()> {
            Ok(())
        }

        async fn clear(&self) -> Result<()> {
            Ok(())
        }
    }

    /// Context that replays a scripted sequence of lookup outcomes.
    struct ScriptedContext {
        outcomes: Mutex<VecDeque<Result<usize>>>,
    }

    impl ScriptedContext {
        fn new(outcomes: Vec<Result<usize>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
            }
        }

        fn next_outcome(&self) -> Result<usize> {
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Ok(0))
        }
    }

    #[async_trait]
    impl SearchContext for ScriptedContext {
        async fn find(&self, by: &By) -> Result<Handle> {
            match self.next_outcome()? {
                0 => Err(Error::element_not_found(by.to_string())),
                _ => Ok(Arc::new(NullHandle) as Handle),
            }
        }

        async fn find_all(&self, _by: &By) -> Result<Vec<Handle>> {
            let count = self.next_outcome()?;
            Ok((0..count).map(|_| Arc::new(NullHandle) as Handle).collect())
        }
    }

    #[test]
    fn test_handle_debug_shows_handle_id() {
        let handle: Handle = Arc::new(NullHandle);
        assert_eq!(format!("{handle:?}"), "ElementHandle(\"null\")");
    }

    #[tokio::test]
    async fn test_find_one_immediate_hit() {
        let ctx = ScriptedContext::new(vec![Ok(1)]);
        let found = find_one(&ctx, "css=#submit", LOOKUP_BYPASS, Duration::from_secs(1))
            .await
            .unwrap();
        assert!(found.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_find_one_appears_after_polling() {
        let ctx = ScriptedContext::new(vec![Err(Error::element_not_found("css=#late")), Ok(0), Ok(1)]);
        let found = find_one(&ctx, "css=#late", LOOKUP_BYPASS, Duration::from_secs(5))
            .await
            .unwrap();
        assert!(found.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_find_one_times_out_to_none() {
        let ctx = ScriptedContext::new(vec![]);
        let found = find_one(&ctx, "css=#never", LOOKUP_BYPASS, Duration::from_secs(1))
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_find_one_malformed_selector_is_fatal() {
        let ctx = ScriptedContext::new(vec![Ok(1)]);
        let err = find_one(&ctx, "bogus=x", LOOKUP_BYPASS, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSelector);
    }

    #[tokio::test]
    async fn test_find_one_non_bypassed_error_propagates() {
        let ctx = ScriptedContext::new(vec![Err(Error::script("boom"))]);
        let err = find_one(&ctx, "css=#x", LOOKUP_BYPASS, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Script);
    }

    #[tokio::test]
    async fn test_find_many_immediate_hit() {
        let ctx = ScriptedContext::new(vec![Ok(3)]);
        let found = find_many(&ctx, "css=li.item", LOOKUP_BYPASS, Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(found.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_find_many_polls_past_empty_result() {
        let ctx = ScriptedContext::new(vec![Ok(0), Ok(0), Ok(2)]);
        let found = find_many(&ctx, "css=li.item", LOOKUP_BYPASS, Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(found.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_find_many_times_out_to_empty() {
        let ctx = ScriptedContext::new(vec![]);
        let found = find_many(&ctx, "css=li.none", LOOKUP_BYPASS, Duration::from_secs(1))
            .await
            .unwrap();
        assert!(found.is_empty());
    }
}
