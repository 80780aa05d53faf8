//! Opaque continuation tokens for paged listings.
//!
//! The export API hands out continuation cursors as opaque strings. The
//! client never inspects them; it only needs to distinguish "first page"
//! (no token) from "continue from here" (a non-empty token). Some API
//! versions signal the final page with an empty string instead of omitting
//! the field, so empty tokens normalize to `None` at the boundary.

use serde::{Deserialize, Serialize};

/// An opaque continuation cursor returned by a paged listing.
///
/// Invariant: the wrapped string is never empty. Construct through
/// [`PageToken::from_raw`] to keep the invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageToken(String);

impl PageToken {
    /// Normalizes a raw cursor value from the server.
    ///
    /// Returns `None` for absent or empty cursors (no more pages).
    pub fn from_raw(raw: Option<String>) -> Option<Self> {
        match raw {
            Some(s) if !s.is_empty() => Some(Self(s)),
            _ => None,
        }
    }

    /// The raw token value, for use as a query parameter.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PageToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One page of a listing, with the cursor for the next page if any.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<PageToken>,
}

impl<T> Page<T> {
    /// Builds a page from raw server values, normalizing the cursor.
    pub fn new(items: Vec<T>, raw_cursor: Option<String>) -> Self {
        Self {
            items,
            next: PageToken::from_raw(raw_cursor),
        }
    }
}
