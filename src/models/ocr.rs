//! OCR engine output types.
//!
//! Shapes mirror the upstream text-detection artifact: a list of per-page
//! results, each an ordered list of blocks with normalized geometry.

use super::BoundingBox;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The kind of unit a block represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockType {
    /// A whole detected page.
    Page,
    /// A line of text; its first relationship lists its word ids in order.
    Line,
    /// A single detected word.
    Word,
    /// Any block kind this crate does not interpret.
    #[serde(other)]
    Other,
}

/// A link from one block to an ordered list of related block ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Relationship {
    /// Relationship kind, `CHILD` for line→word links.
    #[serde(rename = "Type")]
    pub kind: String,
    /// Related block ids, in reading order for `CHILD` relationships.
    pub ids: Vec<String>,
}

/// Geometric envelope of a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Geometry {
    /// The block's normalized bounding box.
    pub bounding_box: BoundingBox,
}

/// One unit of OCR output: a page, line, or word detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Block {
    /// Engine-assigned block id, unique within the document.
    pub id: String,
    /// What this block represents.
    pub block_type: BlockType,
    /// Detected text. Empty for blocks without text (e.g. `PAGE`).
    #[serde(default)]
    pub text: String,
    /// Detection confidence in `[0, 100]`, when reported.
    #[serde(default)]
    pub confidence: Option<f32>,
    /// Normalized geometry, when reported.
    #[serde(default)]
    pub geometry: Option<Geometry>,
    /// Links to related blocks.
    ///
    /// A `LINE` block from text detection carries exactly one relationship,
    /// listing its child `WORD` ids in left-to-right order.
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

impl Block {
    /// Ordered child block ids from the first relationship.
    #[must_use]
    pub fn child_ids(&self) -> Option<&[String]> {
        self.relationships
            .first()
            .map(|relationship| relationship.ids.as_slice())
    }

    /// The block's normalized bounding box, when geometry was reported.
    #[must_use]
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.geometry.as_ref().map(|geometry| geometry.bounding_box)
    }
}

/// A single page's OCR result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OcrPage {
    /// All blocks detected on the page, in engine order.
    #[serde(default)]
    pub blocks: Vec<Block>,
    /// Page-level counters (e.g. number of detected pages).
    #[serde(default)]
    pub document_metadata: BTreeMap<String, u32>,
    /// Version tag of the detection model that produced this page.
    #[serde(default, rename = "DetectDocumentTextModelVersion")]
    pub model_version: String,
}

impl OcrPage {
    /// Looks up a block by id with a linear scan.
    #[must_use]
    pub fn block_with_id(&self, id: &str) -> Option<&Block> {
        self.blocks.iter().find(|block| block.id == id)
    }
}
