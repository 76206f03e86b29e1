//! LinkedIn feed page model.
//!
//! Thin glue over the widget layer: navigates to the feed, drives the global
//! navigation search box, and exposes search results as a [`ListPanel`].

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::component::{Component, Input, ListItem, ListPanel};
use crate::error::Result;
use crate::session::BrowserSession;

// ============================================================================
// Constants
// ============================================================================

/// Landing URL for an authenticated session.
pub const FEED_URL: &str = "https://www.linkedin.com/feed/";

const SEARCH_BAR_SELECTOR: &str = r#"xpath=//*[@id="global-nav-typeahead"]//input"#;

const SEARCH_RESULTS_SELECTOR: &str = "css=div.search-results-container";

const SEARCH_RESULT_ITEM_SELECTOR: &str = "css=li.reusable-search__result-container";

/// Budget for the search bar to render after navigation.
const SEARCH_BAR_TIMEOUT: Duration = Duration::from_secs(5);

/// Budget for the results container after submitting a query.
const RESULTS_TIMEOUT: Duration = Duration::from_secs(10);

// ============================================================================
// SearchResult
// ============================================================================

/// One entry in the search results list.
pub struct SearchResult {
    component: Component,
}

impl ListItem for SearchResult {
    fn from_component(component: Component) -> Self {
        Self { component }
    }

    fn component(&self) -> &Component {
        &self.component
    }
}

// ============================================================================
// LinkedInPage
// ============================================================================

/// Page object for the LinkedIn feed.
pub struct LinkedInPage {
    session: Arc<dyn BrowserSession>,
}

impl LinkedInPage {
    /// Navigates the session to the feed and binds the page model to it.
    pub async fn open(session: Arc<dyn BrowserSession>) -> Result<Self> {
        session.goto(FEED_URL).await?;
        info!(url = FEED_URL, "Opened LinkedIn feed");
        Ok(Self { session })
    }

    /// Returns the global navigation search input.
    pub async fn search_input(&self) -> Result<Input> {
        Input::attach(
            Arc::clone(&self.session),
            SEARCH_BAR_SELECTOR,
            SEARCH_BAR_TIMEOUT,
        )
        .await
    }

    /// Types a query into the search bar, submits it, and returns the
    /// results panel.
    pub async fn search(&self, query: &str) -> Result<ListPanel<SearchResult>> {
        let input = self.search_input().await?;
        input.set_value(query).await?;
        input.handle().send_keys("\n").await?;
        info!(query, "Submitted search");

        ListPanel::attach(
            Arc::clone(&self.session),
            "SearchResults",
            SEARCH_RESULTS_SELECTOR,
            SEARCH_RESULT_ITEM_SELECTOR,
            RESULTS_TIMEOUT,
        )
        .await
    }
}
