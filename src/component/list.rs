//! List container widget.
//!
//! [`ListPanel`] scopes a homogeneous collection of widgets under one
//! container element. The concrete item type is a generic parameter
//! implementing [`ListItem`] — an explicit capability contract (has a display
//! name, can be activated) instead of any runtime type lookup.

// ============================================================================
// Imports
// ============================================================================

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::component::Component;
use crate::error::{Error, Result};
use crate::session::BrowserSession;
use crate::wait::{WaitOptions, wait_for_result};

// ============================================================================
// ListItem
// ============================================================================

/// Capability contract for entries of a [`ListPanel`].
#[async_trait]
pub trait ListItem: Send + Sync {
    /// Builds the item from the component wrapping its element handle.
    fn from_component(component: Component) -> Self;

    /// Returns the item's backing component.
    fn component(&self) -> &Component;

    /// Returns the item's display name, used for name-based selection.
    async fn display_name(&self) -> Result<String> {
        self.component().text().await
    }

    /// Activates the item.
    async fn activate(&self) -> Result<()> {
        self.component().click().await
    }
}

// ============================================================================
// ListPanel
// ============================================================================

/// Container of homogeneous list items.
pub struct ListPanel<I: ListItem> {
    panel: Component,
    item_selector: String,
    /// Budget for item lookups, shared with the container's attach budget.
    item_timeout: Duration,
    _marker: PhantomData<I>,
}

impl<I: ListItem> ListPanel<I> {
    /// Resolves the container by selector; items are looked up lazily under
    /// the same budget.
    pub async fn attach(
        session: Arc<dyn BrowserSession>,
        name: impl Into<String>,
        selector: impl Into<String>,
        item_selector: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let panel = Component::attach(session, name, selector, timeout).await?;
        Ok(Self {
            panel,
            item_selector: item_selector.into(),
            item_timeout: timeout,
            _marker: PhantomData,
        })
    }

    /// Wraps an already-attached container component.
    pub fn from_component(
        panel: Component,
        item_selector: impl Into<String>,
        item_timeout: Duration,
    ) -> Self {
        Self {
            panel,
            item_selector: item_selector.into(),
            item_timeout,
            _marker: PhantomData,
        }
    }

    /// Returns the container component.
    #[inline]
    #[must_use]
    pub fn panel(&self) -> &Component {
        &self.panel
    }

    /// Returns all currently displayed items, in document order.
    ///
    /// Each item is scrolled into view as it is enumerated, so lazily
    /// rendered entries materialize before the displayed check.
    pub async fn items(&self) -> Result<Vec<I>> {
        let handles = self
            .panel
            .find_all_in_scope(&self.item_selector, self.item_timeout)
            .await?;
        debug!(
            panel = %self.panel.name(),
            count = handles.len(),
            "Found list items"
        );

        let mut items = Vec::with_capacity(handles.len());
        for handle in handles {
            let component = Component::from_handle(
                Arc::clone(self.panel.session()),
                format!("{} item", self.panel.name()),
                handle,
            );
            component.scroll_into_view().await?;
            if component.handle().is_displayed().await? {
                items.push(I::from_component(component));
            }
        }
        Ok(items)
    }

    /// Returns `(display name, item)` pairs in document order.
    pub async fn items_by_name(&self) -> Result<Vec<(String, I)>> {
        let items = self.items().await?;
        let mut named = Vec::with_capacity(items.len());
        for item in items {
            let name = item.display_name().await?;
            named.push((name, item));
        }
        Ok(named)
    }

    /// Returns the display names of all items.
    pub async fn item_names(&self) -> Result<Vec<String>> {
        Ok(self
            .items_by_name()
            .await?
            .into_iter()
            .map(|(name, _)| name)
            .collect())
    }

    /// Returns the first displayed item with its name, if any.
    pub async fn first_item(&self) -> Result<Option<(String, I)>> {
        Ok(self.items_by_name().await?.into_iter().next())
    }

    /// Returns up to the first `n` displayed items with their names, in
    /// document order.
    pub async fn first_n_items(&self, n: usize) -> Result<Vec<(String, I)>> {
        Ok(self.items_by_name().await?.into_iter().take(n).collect())
    }

    /// Returns the number of matching item elements (displayed or not).
    pub async fn count(&self) -> Result<usize> {
        Ok(self
            .panel
            .find_all_in_scope(&self.item_selector, self.item_timeout)
            .await?
            .len())
    }

    /// Returns whether the container currently has any item elements.
    pub async fn has_items(&self) -> Result<bool> {
        Ok(self.count().await? > 0)
    }

    /// Waits for an item whose display name matches `item_name` (case and
    /// surrounding whitespace insensitive) and activates it.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] when `item_name` is empty.
    /// - [`Error::ComponentNotFound`] when no such item appears in time.
    pub async fn click_item(&self, item_name: &str, timeout: Duration) -> Result<()> {
        if item_name.is_empty() {
            return Err(Error::config("item name was not specified"));
        }
        let wanted = item_name.trim().to_uppercase();

        let found = wait_for_result(
            || async {
                let named = self.items_by_name().await?;
                Ok(named
                    .into_iter()
                    .find(|(name, _)| name.trim().to_uppercase() == wanted)
                    .map(|(_, item)| item))
            },
            WaitOptions::new(format!("{item_name:?} to appear between items")).timeout(timeout),
        )
        .await?
        .flatten();

        match found {
            Some(item) => item.activate().await,
            None => Err(Error::component_not_found(
                format!("{} item {item_name:?}", self.panel.name()),
                &self.item_selector,
            )),
        }
    }
}
