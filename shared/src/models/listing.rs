//! List responses
//!
//! List endpoints answer either with a bare JSON array or, when pagination
//! is enabled on the backend, with a page envelope.

use serde::{Deserialize, Serialize};

/// Page envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// A list response in either shape
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Paged(Page<T>),
    Plain(Vec<T>),
}

impl<T> Listing<T> {
    /// Items of this response (current page only when paged)
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Paged(page) => page.results,
            Self::Plain(items) => items,
        }
    }

    /// Total count across all pages, if known
    pub fn total(&self) -> usize {
        match self {
            Self::Paged(page) => page.count as usize,
            Self::Plain(items) => items.len(),
        }
    }

    /// Whether the backend reports a further page
    pub fn has_next(&self) -> bool {
        matches!(self, Self::Paged(Page { next: Some(_), .. }))
    }
}
