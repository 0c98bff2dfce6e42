//! Evidence types.

use serde::{Deserialize, Serialize};

/// One retrieved evidence item.
///
/// Sources are read-only inputs to claim verification. The URL is passed
/// through as returned by the provider, malformed or not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Source {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub url: String,
}

impl Source {
    pub fn new(
        title: impl Into<String>,
        snippet: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            snippet: snippet.into(),
            url: url.into(),
        }
    }

    /// Placeholder source for a citation URL returned by the answer provider.
    ///
    /// `index` is zero-based; the title uses the one-based number.
    pub fn from_citation(index: usize, url: impl Into<String>) -> Self {
        let number = index + 1;
        Self {
            title: format!("Source {}", number),
            snippet: format!("Citation {} returned by the answer provider", number),
            url: url.into(),
        }
    }

    /// Whether the source has any content to verify against.
    pub fn is_usable(&self) -> bool {
        !self.snippet.trim().is_empty()
    }
}
