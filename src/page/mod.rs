//! Site page models built from the widget layer.

/// LinkedIn feed page model.
pub mod linkedin;

pub use linkedin::{LinkedInPage, SearchResult};
