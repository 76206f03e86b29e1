//! Voltron - resilient page-object helpers for browser automation.
//!
//! This library layers condition polling, selector parsing, and page-object
//! widgets on top of a WebDriver-style binding. The binding itself stays
//! behind the [`session::BrowserSession`] / [`session::ElementHandle`] trait
//! seams, so the helpers are driver-agnostic and fully testable in memory.
//!
//! # Architecture
//!
//! Everything reduces to one primitive: [`wait::wait_for_result`] polls a
//! probe until its result matches an expected truthiness, swallowing a
//! caller-declared set of transient condition kinds and propagating
//! everything else immediately. Element lookups, widget state checks, and
//! item selection are all probes over that loop.
//!
//! Key design principles:
//!
//! - Sessions are injected (`Arc<dyn BrowserSession>`), never global
//! - Retry-vs-propagate is a value match on [`ErrorKind`], not a catch list
//! - Timeout returns the last observed value; callers decide what failure is
//!
//! # Quick Start
//!
//! ```ignore
//! use voltron::page::LinkedInPage;
//! use voltron::runner::run_with_session;
//!
//! let names = run_with_session(&factory, |session| async move {
//!     let page = LinkedInPage::open(session).await?;
//!     let results = page.search("site reliability engineer").await?;
//!     results.item_names().await
//! })
//! .await?;
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`wait`] | Condition polling primitive and [`wait::WaitOptions`] |
//! | [`selector`] | `strategy=pattern` grammar and `{placeholder}` substitution |
//! | [`session`] | Trait seams to the underlying WebDriver binding |
//! | [`locator`] | Element lookup with polling fallback |
//! | [`component`] | Page-object widgets: base, checkbox, input, list |
//! | [`page`] | Site page models |
//! | [`runner`] | Session acquisition retry and scoped teardown |
//! | [`error`] | Error types, [`ErrorKind`] classification, [`Result`] alias |

// ============================================================================
// Modules
// ============================================================================

/// Page-object widgets: base component, checkbox, input, list container.
pub mod component;

/// Error types and result aliases.
pub mod error;

/// Element lookup with polling fallback.
pub mod locator;

/// Site page models.
pub mod page;

/// Session acquisition with retry and guaranteed teardown.
pub mod runner;

/// Selector grammar and pattern substitution.
pub mod selector;

/// Browser session and element handle trait seams.
pub mod session;

/// Generic condition polling.
pub mod wait;

// ============================================================================
// Re-exports
// ============================================================================

// Core polling
pub use wait::{DEFAULT_BYPASS, DEFAULT_POLL_INTERVAL, DEFAULT_TIMEOUT, WaitOptions, wait_for_result};

// Selectors
pub use selector::{By, parse, substitute};

// Session seams
pub use session::{BrowserSession, ElementHandle, Handle, ScriptArg, SearchContext};

// Lookups
pub use locator::{find_many, find_one};

// Widgets
pub use component::{Checkbox, Component, Input, ListItem, ListPanel};

// Runner
pub use runner::{SessionFactory, connect_with_retry, run_with_session};

// Error types
pub use error::{Error, ErrorKind, Result};
