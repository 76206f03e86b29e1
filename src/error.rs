//! Error types for the voltron helpers.
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`].
//!
//! # Condition classification
//!
//! Every error maps to an [`ErrorKind`] via [`Error::kind()`]. The polling
//! layer decides retry-vs-propagate by matching the kind against a caller
//! supplied bypass set, never by inspecting the error type itself:
//!
//! ```ignore
//! use voltron::{Error, ErrorKind};
//!
//! let err = Error::element_not_found("css=#submit");
//! assert_eq!(err.kind(), ErrorKind::ElementNotFound);
//! assert!(err.kind().is_transient_default());
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`], [`Error::InvalidSelector`] |
//! | Element | [`Error::ElementNotFound`], [`Error::StaleElement`], [`Error::NotInteractable`], [`Error::AttributeMissing`] |
//! | Session | [`Error::Session`], [`Error::Launch`] |
//! | Execution | [`Error::Script`] |
//! | Page objects | [`Error::ComponentNotFound`] |

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use thiserror::Error;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// ErrorKind
// ============================================================================

/// Condition kind used for bypass-set matching in the polling layer.
///
/// A poll operation swallows and retries past errors whose kind is listed in
/// its bypass set; every other kind aborts the poll immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Invalid configuration (bad options, missing substitution value).
    Config,
    /// Selector string does not match the grammar or names an unknown strategy.
    InvalidSelector,
    /// No element matched the selector.
    ElementNotFound,
    /// Element reference is no longer attached to the document.
    StaleElement,
    /// Driver/session level failure (connection lost, command rejected).
    Session,
    /// Element exists but cannot be interacted with.
    NotInteractable,
    /// A required attribute is absent on the element.
    AttributeMissing,
    /// Script execution failed in the browser.
    Script,
    /// A page-object component could not be resolved.
    ComponentNotFound,
    /// Browser session could not be established.
    Launch,
}

impl ErrorKind {
    /// Returns `true` if this kind is in the default transient set
    /// (swallowed by element lookups unless the caller overrides it).
    #[inline]
    #[must_use]
    pub fn is_transient_default(self) -> bool {
        matches!(self, Self::ElementNotFound | Self::StaleElement)
    }

    /// Returns `true` if this kind signals a configuration problem.
    ///
    /// Configuration errors are always fatal and are never placed in a
    /// bypass set.
    #[inline]
    #[must_use]
    pub fn is_config(self) -> bool {
        matches!(self, Self::Config | Self::InvalidSelector)
    }
}

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when wait options, substitution values, or widget inputs
    /// are invalid. Always fatal, raised before any polling begins.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// Selector string is malformed or names an unknown strategy.
    #[error("Invalid selector {selector:?}: {message}")]
    InvalidSelector {
        /// The offending selector string.
        selector: String,
        /// Description of the grammar violation.
        message: String,
    },

    // ========================================================================
    // Element Errors
    // ========================================================================
    /// Element not found by selector.
    #[error("Element not found: {selector}")]
    ElementNotFound {
        /// Selector used for the lookup.
        selector: String,
    },

    /// Element is stale (no longer in the document).
    #[error("Stale element: {handle}")]
    StaleElement {
        /// Identifier of the stale handle.
        handle: String,
    },

    /// Element cannot be interacted with (hidden, disabled, obscured).
    #[error("Element not interactable: {message}")]
    NotInteractable {
        /// Description of the interaction failure.
        message: String,
    },

    /// A required attribute is absent on the element.
    #[error("Attribute {attribute:?} missing on element {handle}")]
    AttributeMissing {
        /// Attribute name that was requested.
        attribute: String,
        /// Identifier of the element handle.
        handle: String,
    },

    // ========================================================================
    // Session Errors
    // ========================================================================
    /// Driver/session level failure.
    #[error("Session error: {message}")]
    Session {
        /// Description of the session failure.
        message: String,
    },

    /// Browser session could not be established.
    #[error("Failed to launch browser session after {attempts} attempts: {message}")]
    Launch {
        /// Number of connection attempts made.
        attempts: u32,
        /// Description of the last failure.
        message: String,
    },

    // ========================================================================
    // Execution Errors
    // ========================================================================
    /// Script execution error.
    #[error("Script error: {message}")]
    Script {
        /// Error message from script execution.
        message: String,
    },

    // ========================================================================
    // Page Object Errors
    // ========================================================================
    /// A page-object component could not be resolved within its timeout.
    #[error("Component {component:?} not found by selector {selector:?}")]
    ComponentNotFound {
        /// Component name for diagnostics.
        component: String,
        /// Selector the component attaches by.
        selector: String,
    },
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an invalid selector error.
    #[inline]
    pub fn invalid_selector(selector: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSelector {
            selector: selector.into(),
            message: message.into(),
        }
    }

    /// Creates an element not found error.
    #[inline]
    pub fn element_not_found(selector: impl Into<String>) -> Self {
        Self::ElementNotFound {
            selector: selector.into(),
        }
    }

    /// Creates a stale element error.
    #[inline]
    pub fn stale_element(handle: impl Into<String>) -> Self {
        Self::StaleElement {
            handle: handle.into(),
        }
    }

    /// Creates a not interactable error.
    #[inline]
    pub fn not_interactable(message: impl Into<String>) -> Self {
        Self::NotInteractable {
            message: message.into(),
        }
    }

    /// Creates an attribute missing error.
    #[inline]
    pub fn attribute_missing(attribute: impl Into<String>, handle: impl Into<String>) -> Self {
        Self::AttributeMissing {
            attribute: attribute.into(),
            handle: handle.into(),
        }
    }

    /// Creates a session error.
    #[inline]
    pub fn session(message: impl Into<String>) -> Self {
        Self::Session {
            message: message.into(),
        }
    }

    /// Creates a launch error.
    #[inline]
    pub fn launch(attempts: u32, message: impl Into<String>) -> Self {
        Self::Launch {
            attempts,
            message: message.into(),
        }
    }

    /// Creates a script error.
    #[inline]
    pub fn script(message: impl Into<String>) -> Self {
        Self::Script {
            message: message.into(),
        }
    }

    /// Creates a component not found error.
    #[inline]
    pub fn component_not_found(component: impl Into<String>, selector: impl Into<String>) -> Self {
        Self::ComponentNotFound {
            component: component.into(),
            selector: selector.into(),
        }
    }
}

// ============================================================================
// Classification
// ============================================================================

impl Error {
    /// Returns the condition kind for bypass-set matching.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config { .. } => ErrorKind::Config,
            Self::InvalidSelector { .. } => ErrorKind::InvalidSelector,
            Self::ElementNotFound { .. } => ErrorKind::ElementNotFound,
            Self::StaleElement { .. } => ErrorKind::StaleElement,
            Self::NotInteractable { .. } => ErrorKind::NotInteractable,
            Self::AttributeMissing { .. } => ErrorKind::AttributeMissing,
            Self::Session { .. } => ErrorKind::Session,
            Self::Launch { .. } => ErrorKind::Launch,
            Self::Script { .. } => ErrorKind::Script,
            Self::ComponentNotFound { .. } => ErrorKind::ComponentNotFound,
        }
    }

    /// Returns `true` if this is an element error.
    #[inline]
    #[must_use]
    pub fn is_element_error(&self) -> bool {
        matches!(
            self,
            Self::ElementNotFound { .. } | Self::StaleElement { .. }
        )
    }

    /// Returns `true` if this is a configuration error.
    #[inline]
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        self.kind().is_config()
    }
}

// ============================================================================
// Tests
// ============================================================================
