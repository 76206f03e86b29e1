//! Checkbox widget.
//!
//! A checkbox component wraps a labelled container whose actual state lives
//! on an inner `<input>` element. Reading the value inspects that input's
//! selected state; writing clicks the container only when the state differs.

// ============================================================================
// Imports
// ============================================================================

use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::component::{Component, DEFAULT_ATTACH_TIMEOUT, DEFAULT_STATE_TIMEOUT};
use crate::error::{Error, Result};
use crate::session::BrowserSession;

// ============================================================================
// Constants
// ============================================================================

/// Selector of the state-carrying input inside the checkbox container.
const INPUT_SELECTOR: &str = "xpath=.//input";

/// Budget for locating the inner input (the container already resolved, so
/// a short window suffices).
const INPUT_TIMEOUT: Duration = Duration::from_secs(2);

// ============================================================================
// Checkbox
// ============================================================================

/// Boolean control backed by an inner `<input>` element.
pub struct Checkbox {
    inner: Component,
}

impl Checkbox {
    /// Resolves a checkbox by selector.
    pub async fn attach(
        session: Arc<dyn BrowserSession>,
        selector: impl Into<String>,
    ) -> Result<Self> {
        let inner =
            Component::attach(session, "Checkbox", selector, DEFAULT_ATTACH_TIMEOUT).await?;
        Ok(Self { inner })
    }

    /// Wraps an already-attached component.
    #[inline]
    pub fn from_component(inner: Component) -> Self {
        Self { inner }
    }

    /// Returns the checkbox state.
    ///
    /// # Errors
    ///
    /// [`Error::ComponentNotFound`] when the inner input cannot be located.
    pub async fn value(&self) -> Result<bool> {
        self.inner.scroll_into_view().await?;
        let input = self
            .inner
            .find_in_scope(INPUT_SELECTOR, INPUT_TIMEOUT)
            .await?
            .ok_or_else(|| Error::component_not_found("Checkbox input", INPUT_SELECTOR))?;
        input.is_selected().await
    }

    /// Sets the checkbox state, clicking only when it differs.
    ///
    /// # Errors
    ///
    /// [`Error::NotInteractable`] when the state differs but the control is
    /// disabled.
    pub async fn set_value(&self, value: bool) -> Result<()> {
        if self.value().await? == value {
            return Ok(());
        }
        if !self.inner.is_enabled(true, DEFAULT_STATE_TIMEOUT).await? {
            return Err(Error::not_interactable(
                "checkbox is disabled and cannot be clicked",
            ));
        }
        debug!(value, "Setting checkbox state");
        self.inner.click().await
    }
}

impl Deref for Checkbox {
    type Target = Component;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
