//! The per-page redaction plan.

use super::BoundingBox;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The accumulated set of rectangles to blank, keyed by 1-based page number
/// rendered as a string (the upstream inference key format).
///
/// Built fresh per request and consumed immediately by a redactor; never
/// persisted. Within a page, rectangles keep insertion order:
/// phrase-derived before entity-derived, each in source order. Iteration
/// over pages is deterministic for identical inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RedactionSet {
    by_page: BTreeMap<String, Vec<BoundingBox>>,
}

impl RedactionSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends rectangles to a page's list, creating the page entry if
    /// absent. Appending an empty iterator still records the page as
    /// processed.
    pub fn append(
        &mut self,
        page: impl Into<String>,
        boxes: impl IntoIterator<Item = BoundingBox>,
    ) {
        self.by_page.entry(page.into()).or_default().extend(boxes);
    }

    /// Rectangles recorded for a page, if the page was processed.
    #[must_use]
    pub fn boxes_for(&self, page: &str) -> Option<&[BoundingBox]> {
        self.by_page.get(page).map(Vec::as_slice)
    }

    /// Iterates pages and their rectangle lists in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[BoundingBox])> {
        self.by_page
            .iter()
            .map(|(page, boxes)| (page.as_str(), boxes.as_slice()))
    }

    /// Number of pages with an entry.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.by_page.len()
    }

    /// Total number of rectangles across all pages.
    #[must_use]
    pub fn total_boxes(&self) -> usize {
        self.by_page.values().map(Vec::len).sum()
    }

    /// True when no page has an entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_page.is_empty()
    }
}
