//! Data models for blackout.
//!
//! Wire types mirror the upstream OCR/entity-detection artifacts (PascalCase
//! JSON field names); request types mirror the caller's redaction request
//! body (lowercase field names).

mod document;
mod entity;
mod geometry;
mod ocr;
mod redaction;
mod request;

pub use document::{Document, DocumentKind};
pub use entity::{EntityDetail, EntityLocations};
pub use geometry::BoundingBox;
pub use ocr::{Block, BlockType, Geometry, OcrPage, Relationship};
pub use redaction::RedactionSet;
pub use request::{EntitySelection, PhraseRequest, RedactionRequest};
