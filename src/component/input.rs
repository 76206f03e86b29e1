//! Text input widget.
//!
//! Values are read through script execution (`element.value`) rather than the
//! text node, and writes are verified: after typing, the widget polls until
//! the value actually sticks, which absorbs debounced listeners re-rendering
//! the field.

// ============================================================================
// Imports
// ============================================================================

use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

use crate::component::{Component, DEFAULT_ATTACH_TIMEOUT};
use crate::error::{ErrorKind, Result};
use crate::session::{BrowserSession, ScriptArg};
use crate::wait::{WaitOptions, wait_for_result};

// ============================================================================
// Constants
// ============================================================================

const GET_VALUE_SCRIPT: &str = "return arguments[0].value;";

const SET_VALUE_SCRIPT: &str = "\
    arguments[0].setAttribute('value', arguments[1]);\n\
    arguments[0].value = arguments[1];\n\
    arguments[0].dispatchEvent(new Event('change'));";

/// Pause between individual keystrokes.
const SEND_KEYS_DELAY: Duration = Duration::from_millis(100);

/// Budget for a freshly rendered field to expose its value.
const VALUE_READ_TIMEOUT: Duration = Duration::from_millis(600);

/// Budget for a typed value to stick.
const VALUE_VERIFY_TIMEOUT: Duration = Duration::from_secs(1);

// ============================================================================
// Input
// ============================================================================

/// Text field widget with verified typing.
pub struct Input {
    inner: Component,
}

impl Input {
    /// Resolves an input by selector.
    pub async fn attach(
        session: Arc<dyn BrowserSession>,
        selector: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let inner = Component::attach(session, "Input", selector, timeout).await?;
        Ok(Self { inner })
    }

    /// Resolves an input by selector with the default attach budget.
    pub async fn attach_default(
        session: Arc<dyn BrowserSession>,
        selector: impl Into<String>,
    ) -> Result<Self> {
        Self::attach(session, selector, DEFAULT_ATTACH_TIMEOUT).await
    }

    /// Wraps an already-attached component.
    #[inline]
    pub fn from_component(inner: Component) -> Self {
        Self { inner }
    }

    /// Returns the field's current value, polling briefly while a fresh
    /// render exposes it.
    pub async fn value(&self) -> Result<String> {
        self.inner.scroll_into_view().await?;
        let value = wait_for_result(
            || self.read_value(),
            WaitOptions::new("input value to appear").timeout(VALUE_READ_TIMEOUT),
        )
        .await?;
        Ok(value.flatten().unwrap_or_default())
    }

    /// Types `value` into the field and verifies it stuck.
    ///
    /// When the driver refuses the interaction the value is written through
    /// script execution instead.
    pub async fn set_value(&self, value: &str) -> Result<()> {
        self.inner.scroll_into_view().await?;

        let typed = async {
            self.inner.handle().clear().await?;
            self.send_keys(value).await
        }
        .await;

        match typed {
            Ok(()) => {}
            Err(err)
                if matches!(
                    err.kind(),
                    ErrorKind::NotInteractable | ErrorKind::Session
                ) =>
            {
                warn!(error = %err, "Typing rejected, setting value via script");
                self.inner
                    .session()
                    .execute_script(
                        SET_VALUE_SCRIPT,
                        vec![
                            ScriptArg::element(Arc::clone(self.inner.handle())),
                            ScriptArg::value(value),
                        ],
                    )
                    .await?;
            }
            Err(err) => return Err(err),
        }
        debug!(component = %self.inner.name(), value, "Set input value");

        let confirmed = wait_for_result(
            || async { Ok(self.read_value().await?.unwrap_or_default() == value) },
            WaitOptions::new(format!("{:?} value to appear", self.inner.name()))
                .timeout(VALUE_VERIFY_TIMEOUT),
        )
        .await?;
        if confirmed != Some(true) {
            warn!(
                component = %self.inner.name(),
                expected = value,
                "Input value did not settle within the verify window"
            );
        }
        Ok(())
    }

    /// Clears the field, preferring the script path and falling back to the
    /// driver-native clear when a value survives.
    pub async fn clear(&self) -> Result<()> {
        self.inner
            .session()
            .execute_script(
                SET_VALUE_SCRIPT,
                vec![
                    ScriptArg::element(Arc::clone(self.inner.handle())),
                    ScriptArg::value(""),
                ],
            )
            .await?;
        if self.read_value().await?.is_some() {
            self.inner.handle().clear().await?;
        }
        Ok(())
    }

    /// Types characters one at a time with a small delay between keystrokes.
    pub async fn send_keys(&self, keys: &str) -> Result<()> {
        let mut buf = [0u8; 4];
        for symbol in keys.chars() {
            self.inner
                .handle()
                .send_keys(symbol.encode_utf8(&mut buf))
                .await?;
            sleep(SEND_KEYS_DELAY).await;
        }
        Ok(())
    }

    /// Returns the field's placeholder attribute.
    pub async fn placeholder(&self) -> Result<Option<String>> {
        self.inner.attribute("placeholder").await
    }

    /// Waits for the field to be visible and enabled.
    pub async fn is_active(&self, expected: bool, timeout: Duration) -> Result<bool> {
        self.inner
            .wait_for_state(
                || async {
                    Ok(self.inner.handle().is_displayed().await?
                        && self.inner.handle().attribute("disabled").await?.is_none())
                },
                WaitOptions::new(format!("input active status to be {expected}"))
                    .expected(expected)
                    .timeout(timeout),
            )
            .await
    }

    /// Reads `element.value`, mapping empty strings and nulls to `None`.
    async fn read_value(&self) -> Result<Option<String>> {
        let raw = self
            .inner
            .session()
            .execute_script(
                GET_VALUE_SCRIPT,
                vec![ScriptArg::element(Arc::clone(self.inner.handle()))],
            )
            .await?;
        Ok(raw.as_str().filter(|s| !s.is_empty()).map(str::to_string))
    }
}

impl Deref for Input {
    type Target = Component;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
