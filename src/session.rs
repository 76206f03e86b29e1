//! Browser session and element handle seams.
//!
//! This crate never talks to a browser directly: everything is written
//! against the traits in this module, and a concrete WebDriver binding (or a
//! test double) supplies the implementation. Sessions are injected into every
//! collaborator as `Arc<dyn BrowserSession>` — there is no process-global
//! driver handle.
//!
//! | Trait | Description |
//! |-------|-------------|
//! | [`SearchContext`] | Anything elements can be looked up under (document root or element subtree) |
//! | [`BrowserSession`] | Live browser instance: navigation, script execution, teardown |
//! | [`ElementHandle`] | Reference to a located DOM element |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::selector::By;

// ============================================================================
// Handle Alias
// ============================================================================

/// Shared element handle returned by lookups.
pub type Handle = Arc<dyn ElementHandle>;

// ============================================================================
// SearchContext
// ============================================================================

/// A context elements can be located within.
///
/// Implemented by sessions (lookup against the document root) and by element
/// handles (lookup scoped to the element's subtree).
#[async_trait]
pub trait SearchContext: Send + Sync {
    /// Looks up a single element.
    ///
    /// # Errors
    ///
    /// [`crate::Error::ElementNotFound`] when nothing matches; implementations
    /// map their binding's failure modes onto the crate error kinds.
    async fn find(&self, by: &By) -> Result<Handle>;

    /// Looks up all matching elements. An empty vec is not an error.
    async fn find_all(&self, by: &By) -> Result<Vec<Handle>>;
}

// ============================================================================
// BrowserSession
// ============================================================================

/// A live browser instance.
///
/// Acquired once through a [`crate::runner::SessionFactory`], threaded through
/// collaborators by reference counting, and closed exactly once by the owner
/// on every exit path.
#[async_trait]
pub trait BrowserSession: SearchContext {
    /// Navigates the session to the given URL.
    async fn goto(&self, url: &str) -> Result<()>;

    /// Executes a script in the page, returning its JSON result.
    ///
    /// Arguments are exposed to the script as `arguments[0..n]`, with
    /// [`ScriptArg::Element`] entries resolved to live DOM nodes.
    async fn execute_script(&self, script: &str, args: Vec<ScriptArg>) -> Result<Value>;

    /// Tears the session down. Idempotent.
    async fn close(&self) -> Result<()>;
}

impl fmt::Debug for dyn BrowserSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BrowserSession")
    }
}

// ============================================================================
// ElementHandle
// ============================================================================

/// Reference to a located DOM element.
#[async_trait]
pub trait ElementHandle: SearchContext {
    /// Stable identifier for diagnostics and script argument marshalling.
    fn handle_id(&self) -> &str;

    /// Clicks the element.
    async fn click(&self) -> Result<()>;

    /// Returns the element's visible text.
    async fn text(&self) -> Result<String>;

    /// Returns an attribute value, `None` when the attribute is absent.
    async fn attribute(&self, name: &str) -> Result<Option<String>>;

    /// Returns whether the element is rendered and visible.
    async fn is_displayed(&self) -> Result<bool>;

    /// Returns whether the element is selected (checkboxes, options).
    async fn is_selected(&self) -> Result<bool>;

    /// Types the given characters into the element.
    async fn send_keys(&self, keys: &str) -> Result<()>;

    /// Clears the element's value.
    async fn clear(&self) -> Result<()>;
}

impl fmt::Debug for dyn ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ElementHandle")
            .field(&self.handle_id())
            .finish()
    }
}

// ============================================================================
// ScriptArg
// ============================================================================

/// Argument passed to [`BrowserSession::execute_script`].
#[derive(Clone)]
pub enum ScriptArg {
    /// Plain JSON value.
    Value(Value),
    /// Element reference, resolved to the live DOM node by the binding.
    Element(Handle),
}

impl ScriptArg {
    /// Wraps a JSON-serializable value.
    #[inline]
    pub fn value(value: impl Into<Value>) -> Self {
        Self::Value(value.into())
    }

    /// Wraps an element handle.
    #[inline]
    pub fn element(handle: Handle) -> Self {
        Self::Element(handle)
    }
}

impl fmt::Debug for ScriptArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Element(h) => f.debug_tuple("Element").field(&h.handle_id()).finish(),
        }
    }
}
