//! Page-object widgets.
//!
//! [`Component`] attaches to a DOM subtree by selector and carries the shared
//! behavior every widget needs: scoped lookups, clicking with a script
//! fallback, text retrieval, and polled state checks. Concrete widgets wrap
//! it:
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Component`] | Base widget bound to one element |
//! | [`Checkbox`] | Boolean control with an inner `<input>` |
//! | [`Input`] | Text field with verified typing |
//! | [`ListPanel`] | Container of homogeneous [`ListItem`]s |

// ============================================================================
// Submodules
// ============================================================================

/// Checkbox widget.
pub mod checkbox;

/// Text input widget.
pub mod input;

/// List container widget and item capability trait.
pub mod list;

// ============================================================================
// Re-exports
// ============================================================================

pub use checkbox::Checkbox;
pub use input::Input;
pub use list::{ListItem, ListPanel};

// ============================================================================
// Imports
// ============================================================================

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{Error, ErrorKind, Result};
use crate::locator::{LOOKUP_BYPASS, find_many, find_one};
use crate::selector::substitute;
use crate::session::{BrowserSession, Handle, ScriptArg};
use crate::wait::{WaitOptions, wait_for_result};

// ============================================================================
// Constants
// ============================================================================

/// Default budget for resolving a component's own element (15 seconds).
pub const DEFAULT_ATTACH_TIMEOUT: Duration = Duration::from_secs(15);

/// Default budget for widget state checks (1 second).
pub const DEFAULT_STATE_TIMEOUT: Duration = Duration::from_secs(1);

const SCROLL_INTO_VIEW_SCRIPT: &str =
    "return arguments[0].scrollIntoView({ behavior: 'instant', block: 'center' });";

const SCRIPT_CLICK: &str = "arguments[0].click();";

const SCROLL_TO_BOTTOM_SCRIPT: &str = "window.scrollTo(0, document.body.scrollHeight);";

const SCROLL_TO_TOP_SCRIPT: &str = "window.scrollTo(0, 0);";

// ============================================================================
// Page Scrolling
// ============================================================================

/// Scrolls the page to the bottom.
pub async fn scroll_to_bottom(session: &dyn BrowserSession) -> Result<()> {
    session
        .execute_script(SCROLL_TO_BOTTOM_SCRIPT, Vec::new())
        .await?;
    Ok(())
}

/// Scrolls the page to the top.
pub async fn scroll_to_top(session: &dyn BrowserSession) -> Result<()> {
    session
        .execute_script(SCROLL_TO_TOP_SCRIPT, Vec::new())
        .await?;
    Ok(())
}

// ============================================================================
// Component
// ============================================================================

/// Base page-object widget bound to a single element.
///
/// A component owns its session reference (constructor injection, no global
/// driver state) and the handle of the element it attached to. All scoped
/// lookups run under that element's subtree.
pub struct Component {
    session: Arc<dyn BrowserSession>,
    handle: Handle,
    name: String,
    selector: String,
}

impl Component {
    /// Resolves a component by selector under the document root.
    ///
    /// # Errors
    ///
    /// [`Error::ComponentNotFound`] when the element does not appear within
    /// `timeout`; selector grammar violations are fatal configuration errors.
    pub async fn attach(
        session: Arc<dyn BrowserSession>,
        name: impl Into<String>,
        selector: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let name = name.into();
        let selector = selector.into();
        let handle = find_one(session.as_ref(), &selector, LOOKUP_BYPASS, timeout)
            .await?
            .ok_or_else(|| Error::component_not_found(&name, &selector))?;
        debug!(component = %name, selector = %selector, "Component attached");
        Ok(Self {
            session,
            handle,
            name,
            selector,
        })
    }

    /// Like [`Component::attach`] but resolves `{identifier}` placeholders in
    /// the selector template first.
    pub async fn attach_with_values(
        session: Arc<dyn BrowserSession>,
        name: impl Into<String>,
        template: &str,
        values: &HashMap<String, String>,
        timeout: Duration,
    ) -> Result<Self> {
        let selector = substitute(template, values)?;
        Self::attach(session, name, selector, timeout).await
    }

    /// Wraps an already-located element, e.g. a list item handle.
    pub fn from_handle(
        session: Arc<dyn BrowserSession>,
        name: impl Into<String>,
        handle: Handle,
    ) -> Self {
        Self {
            session,
            handle,
            name: name.into(),
            selector: String::new(),
        }
    }

    /// Returns the component's diagnostic name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the selector this component attached by (empty for handles).
    #[inline]
    #[must_use]
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Returns the underlying element handle.
    #[inline]
    #[must_use]
    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    /// Returns the session this component was built with.
    #[inline]
    #[must_use]
    pub fn session(&self) -> &Arc<dyn BrowserSession> {
        &self.session
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("name", &self.name)
            .field("selector", &self.selector)
            .field("handle", &self.handle.handle_id())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Component - Scoped Lookups
// ============================================================================

impl Component {
    /// Looks up a single element under this component's subtree.
    pub async fn find_in_scope(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<Option<Handle>> {
        find_one(self.handle.as_ref(), selector, LOOKUP_BYPASS, timeout).await
    }

    /// Looks up all matching elements under this component's subtree.
    pub async fn find_all_in_scope(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<Vec<Handle>> {
        find_many(self.handle.as_ref(), selector, LOOKUP_BYPASS, timeout).await
    }
}

// ============================================================================
// Component - Interaction
// ============================================================================

impl Component {
    /// Scrolls the element into the center of the viewport.
    pub async fn scroll_into_view(&self) -> Result<()> {
        self.session
            .execute_script(
                SCROLL_INTO_VIEW_SCRIPT,
                vec![ScriptArg::element(Arc::clone(&self.handle))],
            )
            .await?;
        Ok(())
    }

    /// Scrolls to the element and clicks it.
    ///
    /// When the native click is rejected (element obscured, interaction
    /// refused by the driver) the click is retried through script execution.
    pub async fn click(&self) -> Result<()> {
        self.scroll_into_view().await?;
        debug!(component = %self.name, "Clicking component");
        match self.handle.click().await {
            Ok(()) => Ok(()),
            Err(err) if !err.is_config_error() => {
                warn!(
                    component = %self.name,
                    error = %err,
                    "Native click failed, falling back to script click"
                );
                self.session
                    .execute_script(
                        SCRIPT_CLICK,
                        vec![ScriptArg::element(Arc::clone(&self.handle))],
                    )
                    .await?;
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// Returns the element's visible text, consulting the `innerText`
    /// attribute when the driver reports an empty text node.
    pub async fn text(&self) -> Result<String> {
        let text = self.handle.text().await?;
        if !text.is_empty() {
            return Ok(text);
        }
        let inner = self.handle.attribute("innerText").await?;
        Ok(inner.map(|t| t.trim().to_string()).unwrap_or_default())
    }

    /// Returns an attribute of the bound element.
    pub async fn attribute(&self, attribute: &str) -> Result<Option<String>> {
        let value = self.handle.attribute(attribute).await?;
        debug!(
            component = %self.name,
            attribute,
            value = ?value,
            "Read component attribute"
        );
        Ok(value)
    }
}

// ============================================================================
// Component - State Waits
// ============================================================================

impl Component {
    /// Waits for the displayed state to match `expected`.
    ///
    /// Returns the last observed state; on timeout this is the non-matching
    /// value (or `false` when the element kept disappearing mid-check).
    pub async fn is_displayed(&self, expected: bool, timeout: Duration) -> Result<bool> {
        self.scroll_into_view().await?;
        let result = wait_for_result(
            || async { self.handle.is_displayed().await },
            WaitOptions::new(format!("{:?} displayed status is {expected}", self.name))
                .expected(expected)
                .timeout(timeout),
        )
        .await?;
        Ok(result.unwrap_or(false))
    }

    /// Waits for the selected state (an `active` class token) to match
    /// `expected`.
    pub async fn is_selected(&self, expected: bool, timeout: Duration) -> Result<bool> {
        let result = wait_for_result(
            || async {
                let class = self.handle.attribute("class").await?.unwrap_or_default();
                Ok(class.split_whitespace().any(|token| token == "active"))
            },
            WaitOptions::new(format!("{:?} selected status is {expected}", self.name))
                .expected(expected)
                .timeout(timeout),
        )
        .await?;
        Ok(result.unwrap_or(false))
    }

    /// Waits for the enabled state to match `expected`.
    ///
    /// An element is considered disabled when it carries a `disabled`
    /// attribute or a `disabled` class token. A missing `class` attribute is
    /// treated as a retryable state (the `AttributeMissing` kind sits in this
    /// wait's default bypass set); pass custom [`WaitOptions`] via
    /// [`Component::wait_for_state`] to tighten that.
    pub async fn is_enabled(&self, expected: bool, timeout: Duration) -> Result<bool> {
        let options = WaitOptions::new(format!("{:?} enabled status is {expected}", self.name))
            .expected(expected)
            .timeout(timeout)
            .bypass([
                ErrorKind::ElementNotFound,
                ErrorKind::StaleElement,
                ErrorKind::AttributeMissing,
            ]);
        let result = wait_for_result(|| self.enabled_probe(), options).await?;
        Ok(result.unwrap_or(false))
    }

    /// Runs an arbitrary boolean probe against this component with the given
    /// wait options.
    pub async fn wait_for_state<F, Fut>(&self, probe: F, options: WaitOptions) -> Result<bool>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<bool>>,
    {
        let result = wait_for_result(probe, options).await?;
        Ok(result.unwrap_or(false))
    }

    /// Waits for the element to disappear (hidden or detached).
    pub async fn wait_until_gone(&self, timeout: Duration) -> Result<bool> {
        let result = wait_for_result(
            || async {
                match self.handle.is_displayed().await {
                    Ok(displayed) => Ok(!displayed),
                    // Detached counts as gone.
                    Err(err) if err.kind().is_transient_default() => Ok(true),
                    Err(err) => Err(err),
                }
            },
            WaitOptions::new(format!("{:?} to disappear", self.name)).timeout(timeout),
        )
        .await?;
        Ok(result.unwrap_or(false))
    }

    /// Waits until the component's text is non-empty, returning it.
    pub async fn wait_for_text(&self, timeout: Duration) -> Result<Option<String>> {
        wait_for_result(
            || self.text(),
            WaitOptions::new(format!("text of {:?} to be non-empty", self.name)).timeout(timeout),
        )
        .await
    }

    async fn enabled_probe(&self) -> Result<bool> {
        if self.handle.attribute("disabled").await?.is_some() {
            return Ok(false);
        }
        let class = self.handle.attribute("class").await?.ok_or_else(|| {
            Error::attribute_missing("class", self.handle.handle_id())
        })?;
        Ok(!class.split_whitespace().any(|token| token == "disabled"))
    }
}
