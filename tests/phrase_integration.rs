//! Integration tests for phrase location and plan aggregation.
//!
//! Fixtures mirror the upstream OCR engine's output shape: LINE blocks whose
//! first relationship lists child WORD ids in reading order, every block
//! carrying normalized geometry.

// Tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use blackout::models::{
    Block, BlockType, BoundingBox, EntityDetail, Geometry, OcrPage, PhraseRequest,
    RedactionRequest, Relationship,
};
use blackout::services::{InMemorySource, InferenceSource, PhraseFinder, aggregate};
use std::collections::BTreeMap;
use uuid::Uuid;

// ============================================================================
// Fixture Builders
// ============================================================================

/// Lays out words left to right, one line per row, the way the OCR engine
/// reports a cleanly scanned page: each word 5% wide, lines 3% tall.
#[allow(clippy::cast_precision_loss)]
fn word_geometry(line_idx: usize, word_idx: usize) -> BoundingBox {
    BoundingBox::new(
        0.05,
        0.03,
        0.05 + word_idx as f64 * 0.06,
        0.10 + line_idx as f64 * 0.05,
    )
}

/// Builds one page from lines of words, with engine-style UUID block ids.
fn page_of(lines: &[&[&str]]) -> OcrPage {
    let mut blocks = Vec::new();
    for (line_idx, words) in lines.iter().enumerate() {
        let word_ids: Vec<String> = words.iter().map(|_| Uuid::new_v4().to_string()).collect();
        blocks.push(Block {
            id: Uuid::new_v4().to_string(),
            block_type: BlockType::Line,
            text: words.join(" "),
            confidence: Some(99.4),
            geometry: None,
            relationships: vec![Relationship {
                kind: "CHILD".to_string(),
                ids: word_ids.clone(),
            }],
        });
        for (word_idx, word) in words.iter().enumerate() {
            blocks.push(Block {
                id: word_ids[word_idx].clone(),
                block_type: BlockType::Word,
                text: (*word).to_string(),
                confidence: Some(99.4),
                geometry: Some(Geometry {
                    bounding_box: word_geometry(line_idx, word_idx),
                }),
                relationships: Vec::new(),
            });
        }
    }
    OcrPage {
        blocks,
        ..OcrPage::default()
    }
}

/// The merged box of words `first..=last` on one line.
fn merged_span(line_idx: usize, first: usize, last: usize) -> BoundingBox {
    (first..=last)
        .map(|word_idx| word_geometry(line_idx, word_idx))
        .reduce(|merged, side| merged.merge(&side))
        .unwrap()
}

fn seattle_page() -> OcrPage {
    page_of(&[&[
        "Amazon.com,",
        "Inc.",
        "is",
        "located",
        "in",
        "Seattle,",
        "WA",
    ]])
}

// ============================================================================
// Phrase Location
// ============================================================================

#[test]
fn single_line_phrase_resolves_to_one_merged_rectangle() {
    let finder = PhraseFinder::new(vec![seattle_page()]);
    let by_page = finder
        .find_phrase_bounding_boxes("is located in Seattle", &[1])
        .unwrap();

    let boxes = &by_page["1"];
    assert_eq!(boxes.len(), 1);
    // The merged boxes of "is", "located", "in", "Seattle," (words 2..=5).
    assert_eq!(boxes[0], merged_span(0, 2, 5));
}

#[test]
fn phrase_spanning_two_lines_yields_one_rectangle_per_line() {
    let finder = PhraseFinder::new(vec![page_of(&[
        &["Deliver", "promptly", "to", "blenders"],
        &["Seattle", "warehouse", "division"],
    ])]);
    let by_page = finder
        .find_phrase_bounding_boxes("to blenders Seattle", &[1])
        .unwrap();

    let boxes = &by_page["1"];
    assert_eq!(boxes.len(), 2);
    assert_eq!(boxes[0], merged_span(0, 2, 3));
    assert_eq!(boxes[1], merged_span(1, 0, 0));
}

#[test]
fn absent_phrase_produces_an_empty_entry_without_error() {
    let finder = PhraseFinder::new(vec![seattle_page()]);
    let by_page = finder
        .find_phrase_bounding_boxes("Portland", &[1])
        .unwrap();
    assert_eq!(by_page["1"], Vec::<BoundingBox>::new());
}

#[test]
fn out_of_range_pages_are_skipped_while_valid_pages_resolve() {
    let finder = PhraseFinder::new(vec![seattle_page(), seattle_page()]);
    let by_page = finder
        .find_phrase_bounding_boxes("located in", &[2, 9])
        .unwrap();
    assert_eq!(by_page.len(), 1);
    assert_eq!(by_page["2"].len(), 1);
}

#[test]
fn repeated_phrase_yields_one_rectangle_per_occurrence() {
    let finder = PhraseFinder::new(vec![page_of(&[&[
        "approved", "by", "J.", "Doe", "and", "J.", "Doe",
    ]])]);
    let by_page = finder.find_phrase_bounding_boxes("J. Doe", &[1]).unwrap();

    let boxes = &by_page["1"];
    assert_eq!(boxes.len(), 2);
    assert_eq!(boxes[0], merged_span(0, 2, 3));
    assert_eq!(boxes[1], merged_span(0, 5, 6));
}

#[test]
fn quoted_words_in_scanned_text_still_match() {
    let finder = PhraseFinder::new(vec![page_of(&[&[
        "shipped", "from", "\"Seattle,\"", "yesterday",
    ]])]);
    let by_page = finder
        .find_phrase_bounding_boxes("from Seattle", &[1])
        .unwrap();
    assert_eq!(by_page["1"], vec![merged_span(0, 1, 2)]);
}

// ============================================================================
// Aggregation
// ============================================================================

fn entity_source(pages: Vec<OcrPage>) -> InMemorySource {
    let mut locations = BTreeMap::new();
    let mut dates = BTreeMap::new();
    let mut by_page = BTreeMap::new();
    by_page.insert(
        "1".to_string(),
        vec![EntityDetail {
            score: 0.93,
            bounding_boxes: vec![BoundingBox::new(0.12, 0.03, 0.7, 0.4)],
        }],
    );
    dates.insert("10/23/20".to_string(), by_page);
    let mut standard = BTreeMap::new();
    standard.insert("DATE".to_string(), dates);
    locations.insert("entity-standard".to_string(), standard);
    InMemorySource { pages, locations }
}

fn combined_request() -> RedactionRequest {
    let mut request = RedactionRequest::default();
    request.phrases.push(PhraseRequest {
        text: "is located in Seattle".to_string(),
        pages: vec![1],
    });
    request
        .entities
        .entry("entity-standard".to_string())
        .or_default()
        .entry("DATE".to_string())
        .or_default()
        .insert("10/23/20".to_string(), vec![1]);
    request
}

#[test]
fn plan_orders_phrase_boxes_before_entity_boxes() {
    let source = entity_source(vec![seattle_page()]);
    let plan = aggregate(&combined_request(), &source).unwrap();

    let boxes = plan.boxes_for("1").unwrap();
    assert_eq!(boxes.len(), 2);
    assert_eq!(boxes[0], merged_span(0, 2, 5));
    assert_eq!(boxes[1], BoundingBox::new(0.12, 0.03, 0.7, 0.4));
}

#[test]
fn aggregating_twice_produces_identical_plans() {
    let source = entity_source(vec![seattle_page()]);
    let request = combined_request();
    let first = aggregate(&request, &source).unwrap();
    let second = aggregate(&request, &source).unwrap();
    assert_eq!(first, second);
}

#[test]
fn unknown_inference_source_is_skipped_not_fatal() {
    let source = entity_source(vec![seattle_page()]);
    let mut request = combined_request();
    request
        .entities
        .entry("entity-pii".to_string())
        .or_default()
        .entry("SSN".to_string())
        .or_default()
        .insert("123-45-6789".to_string(), vec![1]);

    let plan = aggregate(&request, &source).unwrap();
    // The unknown source contributed nothing; everything else survived.
    assert_eq!(plan.boxes_for("1").unwrap().len(), 2);
}

// ============================================================================
// Disk-Backed Sources
// ============================================================================

#[test]
fn aggregation_reads_inference_artifacts_from_disk() {
    use blackout::cli::FileInferenceSource;

    let dir = tempfile::tempdir().unwrap();
    let ocr_path = dir.path().join("detect-text.json");
    std::fs::write(
        &ocr_path,
        serde_json::to_vec(&vec![seattle_page()]).unwrap(),
    )
    .unwrap();

    let in_memory = entity_source(Vec::new());
    std::fs::write(
        dir.path().join("entity-standard-locations.json"),
        serde_json::to_vec(&in_memory.locations["entity-standard"]).unwrap(),
    )
    .unwrap();

    let source = FileInferenceSource::new(Some(ocr_path), Some(dir.path().to_path_buf()));
    let pages = source.ocr_pages().unwrap();
    assert_eq!(pages.len(), 1);

    let plan = aggregate(&combined_request(), &source).unwrap();
    let boxes = plan.boxes_for("1").unwrap();
    assert_eq!(boxes.len(), 2);
    assert_eq!(boxes[0], merged_span(0, 2, 5));
}

#[test]
fn missing_artifacts_on_disk_degrade_to_partial_coverage() {
    use blackout::cli::FileInferenceSource;

    // No OCR file: phrase redaction is skipped, entity boxes still land.
    let dir = tempfile::tempdir().unwrap();
    let in_memory = entity_source(Vec::new());
    std::fs::write(
        dir.path().join("entity-standard-locations.json"),
        serde_json::to_vec(&in_memory.locations["entity-standard"]).unwrap(),
    )
    .unwrap();

    let source = FileInferenceSource::new(None, Some(dir.path().to_path_buf()));
    let plan = aggregate(&combined_request(), &source).unwrap();
    assert_eq!(plan.boxes_for("1").unwrap().len(), 1);
}
