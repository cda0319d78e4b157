//! Caller-facing redaction request types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A literal phrase and the 1-based pages to search it on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseRequest {
    /// The exact phrase to locate. Matching is case- and
    /// whitespace-sensitive.
    pub text: String,
    /// 1-based page numbers to search.
    #[serde(default)]
    pub pages: Vec<u32>,
}

/// Which detected entities to redact: inference source name → entity type →
/// entity text → 1-based pages.
pub type EntitySelection = BTreeMap<String, BTreeMap<String, BTreeMap<String, Vec<u32>>>>;

/// The caller's combined redaction request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionRequest {
    /// Literal phrases to locate and redact.
    #[serde(default)]
    pub phrases: Vec<PhraseRequest>,
    /// Detected entities to redact, keyed by inference source.
    #[serde(default)]
    pub entities: EntitySelection,
}

impl RedactionRequest {
    /// True when the request selects nothing to redact.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty() && self.entities.is_empty()
    }
}
