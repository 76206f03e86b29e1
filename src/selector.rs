//! Selector grammar and pattern substitution.
//!
//! Selectors travel as plain strings of the form `"<strategy>=<pattern>"`
//! and are parsed into a [`By`] locator right before each lookup:
//!
//! ```
//! use voltron::selector::parse;
//!
//! let by = parse("xpath=//button[@type='submit']").unwrap();
//! assert_eq!(by.strategy(), "xpath");
//!
//! // The pattern may itself contain `=`.
//! let by = parse("css=input[name='q']").unwrap();
//! assert_eq!(by.value(), "input[name='q']");
//! ```
//!
//! Selector templates may carry `{identifier}` placeholders which are
//! resolved against a value map before parsing, see [`substitute`].

// ============================================================================
// Imports
// ============================================================================

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

// ============================================================================
// Grammar
// ============================================================================

/// Selector grammar: `<strategy>=<pattern>` where the pattern is the rest of
/// the string (at least one character, `=` allowed).
static SELECTOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^([a-z]+)=(.+)$").expect("selector grammar regex"));

/// Placeholder tokens in selector templates: `{identifier}`.
static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([a-zA-Z0-9]+)\}").expect("placeholder regex"));

// ============================================================================
// By Enum
// ============================================================================

/// Element locator strategy (like Selenium's `By`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", content = "value")]
pub enum By {
    /// CSS selector.
    ///
    /// # Example
    /// ```ignore
    /// By::Css("#login-button".into())
    /// ```
    #[serde(rename = "css")]
    Css(String),

    /// XPath expression.
    ///
    /// # Example
    /// ```ignore
    /// By::XPath("//button[@type='submit']".into())
    /// ```
    #[serde(rename = "xpath")]
    XPath(String),

    /// Element ID.
    #[serde(rename = "id")]
    Id(String),

    /// Name attribute.
    #[serde(rename = "name")]
    Name(String),

    /// Tag name.
    #[serde(rename = "tag")]
    Tag(String),
}

impl By {
    /// Creates a CSS selector.
    #[inline]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Creates an XPath selector.
    #[inline]
    pub fn xpath(expr: impl Into<String>) -> Self {
        Self::XPath(expr.into())
    }

    /// Creates an ID selector.
    #[inline]
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    /// Creates a name attribute selector.
    #[inline]
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// Creates a tag name selector.
    #[inline]
    pub fn tag(tag: impl Into<String>) -> Self {
        Self::Tag(tag.into())
    }

    /// Returns the strategy name as it appears in the selector grammar.
    #[must_use]
    pub fn strategy(&self) -> &'static str {
        match self {
            Self::Css(_) => "css",
            Self::XPath(_) => "xpath",
            Self::Id(_) => "id",
            Self::Name(_) => "name",
            Self::Tag(_) => "tag",
        }
    }

    /// Returns the locator pattern.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Css(v) | Self::XPath(v) | Self::Id(v) | Self::Name(v) | Self::Tag(v) => v,
        }
    }
}

impl fmt::Display for By {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy(), self.value())
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Parses a `"<strategy>=<pattern>"` selector string into a [`By`] locator.
///
/// Pure and deterministic. Any string not matching the grammar, and any
/// strategy outside the fixed set (`css`, `xpath`, `id`, `name`, `tag`), is a
/// configuration error — never a transient condition.
///
/// # Errors
///
/// [`Error::InvalidSelector`] when the string is empty, lacks a `=`
/// separator, has an empty pattern, or names an unknown strategy.
pub fn parse(selector: &str) -> Result<By> {
    // TODO: allow whitespace around the strategy, e.g. "xpath = .//*"
    let captures = SELECTOR_RE.captures(selector).ok_or_else(|| {
        Error::invalid_selector(
            selector,
            "selector doesn't match pattern '<strategy>=<pattern>'",
        )
    })?;

    let strategy = &captures[1];
    let pattern = captures[2].to_string();

    match strategy {
        "css" => Ok(By::Css(pattern)),
        "xpath" => Ok(By::XPath(pattern)),
        "id" => Ok(By::Id(pattern)),
        "name" => Ok(By::Name(pattern)),
        "tag" => Ok(By::Tag(pattern)),
        other => Err(Error::invalid_selector(
            selector,
            format!("unknown selector strategy {other:?}"),
        )),
    }
}

// ============================================================================
// Pattern Substitution
// ============================================================================

/// Substitutes `{identifier}` tokens in a selector template with values from
/// the supplied map.
///
/// Identifiers are `[a-zA-Z0-9]+`. Text outside placeholders passes through
/// unchanged, so substitution composes with [`parse`]:
///
/// ```
/// use std::collections::HashMap;
/// use voltron::selector::substitute;
///
/// let values = HashMap::from([("uid".to_string(), "42".to_string())]);
/// let selector = substitute("xpath=//*[@id='{uid}']", &values).unwrap();
/// assert_eq!(selector, "xpath=//*[@id='42']");
/// ```
///
/// # Errors
///
/// [`Error::Config`] when a placeholder has no entry in `values`.
pub fn substitute(template: &str, values: &HashMap<String, String>) -> Result<String> {
    let mut resolved = template.to_string();
    for captures in PLACEHOLDER_RE.captures_iter(template) {
        let name = &captures[1];
        let value = values.get(name).ok_or_else(|| {
            Error::config(format!(
                "no substitution value for placeholder {name:?} in template {template:?}"
            ))
        })?;
        resolved = resolved.replace(&format!("{{{name}}}"), value);
    }
    debug!(template, resolved, "Resolved selector pattern");
    Ok(resolved)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    #[test]
    fn test_parse_xpath() {
        let by = parse("xpath=//div").unwrap();
        assert_eq!(by, By::XPath("//div".to_string()));
        assert_eq!(by.strategy(), "xpath");
        assert_eq!(by.value(), "//div");
    }

    #[test]
    fn test_parse_css() {
        let by = parse("css=.foo").unwrap();
        assert_eq!(by, By::Css(".foo".to_string()));
    }

    #[test]
    fn test_parse_id_name_tag() {
        assert_eq!(parse("id=username").unwrap(), By::Id("username".into()));
        assert_eq!(parse("name=email").unwrap(), By::Name("email".into()));
        assert_eq!(parse("tag=input").unwrap(), By::Tag("input".into()));
    }

    #[test]
    fn test_parse_pattern_may_contain_equals() {
        let by = parse("xpath=//*[@data-qa='x=y']").unwrap();
        assert_eq!(by.value(), "//*[@data-qa='x=y']");
    }

    #[test]
    fn test_parse_unknown_strategy() {
        let err = parse("bogus=x").unwrap_err();
        assert!(matches!(err, Error::InvalidSelector { .. }));
        assert!(err.to_string().contains("bogus"));
    }

    #[test]
    fn test_parse_missing_separator() {
        assert!(parse("noequalsign").is_err());
    }

    #[test]
    fn test_parse_empty_inputs() {
        assert!(parse("").is_err());
        assert!(parse("css=").is_err());
        assert!(parse("=//div").is_err());
    }

    #[test]
    fn test_parse_rejects_uppercase_strategy() {
        assert!(parse("CSS=.foo").is_err());
    }

    #[test]
    fn test_display_round_trip() {
        let by = parse("css=button.primary").unwrap();
        assert_eq!(by.to_string(), "css=button.primary");
    }

    #[test]
    fn test_substitute_single_placeholder() {
        let values = HashMap::from([("uid".to_string(), "42".to_string())]);
        let result = substitute("xpath=//*[@id='{uid}']", &values).unwrap();
        assert_eq!(result, "xpath=//*[@id='42']");
    }

    #[test]
    fn test_substitute_multiple_placeholders() {
        let values = HashMap::from([
            ("row".to_string(), "3".to_string()),
            ("col".to_string(), "7".to_string()),
        ]);
        let result = substitute("css=td[data-row='{row}'][data-col='{col}']", &values).unwrap();
        assert_eq!(result, "css=td[data-row='3'][data-col='7']");
    }

    #[test]
    fn test_substitute_missing_value_is_config_error() {
        let err = substitute("xpath=//*[@id='{uid}']", &HashMap::new()).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert!(err.to_string().contains("uid"));
    }

    #[test]
    fn test_substitute_no_placeholders_passthrough() {
        let result = substitute("css=.foo", &HashMap::new()).unwrap();
        assert_eq!(result, "css=.foo");
    }

    proptest! {
        #[test]
        fn prop_valid_selectors_round_trip(pattern in r"[^=\s][ -~]{0,40}") {
            for strategy in ["css", "xpath", "id", "name", "tag"] {
                let raw = format!("{strategy}={pattern}");
                let by = parse(&raw).unwrap();
                prop_assert_eq!(by.strategy(), strategy);
                prop_assert_eq!(by.value(), pattern.as_str());
            }
        }

        #[test]
        fn prop_strings_without_separator_fail(raw in r"[a-z]{0,20}") {
            prop_assert!(parse(&raw).is_err());
        }
    }
}
