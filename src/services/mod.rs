//! Core services: OCR indexing, phrase location, and plan aggregation.

mod aggregator;
mod phrase_finder;
mod text_index;

pub use aggregator::{InMemorySource, InferenceSource, aggregate};
pub use phrase_finder::PhraseFinder;
pub use text_index::TextIndex;
