//! Redaction plan aggregation.
//!
//! Combines phrase-derived and entity-derived rectangles into one
//! [`RedactionSet`]. Accumulation is a fold over an owned set; per-source
//! failures are logged and skipped so that partial redaction coverage is
//! produced rather than none.

use crate::models::{BoundingBox, EntityLocations, OcrPage, RedactionRequest, RedactionSet};
use crate::services::PhraseFinder;
use crate::{Error, Result};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Supplies the inference artifacts aggregation reads.
///
/// Implementations wrap whatever store holds the upstream OCR and
/// entity-location results; the core only ever sees fully materialized
/// values.
pub trait InferenceSource {
    /// The per-page text-detection result for the document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceUnavailable`] when the artifact cannot be
    /// retrieved or parsed.
    fn ocr_pages(&self) -> Result<Vec<OcrPage>>;

    /// The parsed `<name>-locations.json` artifact for one inference
    /// source.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceUnavailable`] when the artifact cannot be
    /// retrieved or parsed.
    fn entity_locations(&self, name: &str) -> Result<EntityLocations>;
}

/// An [`InferenceSource`] over values already in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    /// OCR pages for the document, in page order.
    pub pages: Vec<OcrPage>,
    /// Entity-location artifacts keyed by inference source name.
    pub locations: BTreeMap<String, EntityLocations>,
}

impl InferenceSource for InMemorySource {
    fn ocr_pages(&self) -> Result<Vec<OcrPage>> {
        Ok(self.pages.clone())
    }

    fn entity_locations(&self, name: &str) -> Result<EntityLocations> {
        self.locations
            .get(name)
            .cloned()
            .ok_or_else(|| Error::SourceUnavailable {
                source_name: name.to_string(),
                cause: "not loaded".to_string(),
            })
    }
}

/// Builds the per-page redaction plan for a request.
///
/// Phrase-derived rectangles are inserted before entity-derived ones, each
/// internally in source order, so identical inputs always produce an
/// identical plan. Unavailable inference sources are skipped with a
/// warning.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for structurally invalid caller input
/// (a phrase with empty text). Partial data unavailability never fails.
pub fn aggregate(
    request: &RedactionRequest,
    source: &dyn InferenceSource,
) -> Result<RedactionSet> {
    let set = collect_phrase_boxes(RedactionSet::new(), request, source)?;
    let set = collect_entity_boxes(set, request, source);
    debug!(
        pages = set.page_count(),
        boxes = set.total_boxes(),
        "aggregated redaction plan"
    );
    Ok(set)
}

/// Folds every requested phrase's rectangles into the set.
fn collect_phrase_boxes(
    mut set: RedactionSet,
    request: &RedactionRequest,
    source: &dyn InferenceSource,
) -> Result<RedactionSet> {
    if request.phrases.is_empty() {
        return Ok(set);
    }
    if request.phrases.iter().any(|phrase| phrase.text.is_empty()) {
        return Err(Error::InvalidInput(
            "phrase with empty text in request".to_string(),
        ));
    }

    let pages = match source.ocr_pages() {
        Ok(pages) => pages,
        Err(error) => {
            warn!(%error, "failed to retrieve the text-detection inference, skipping phrase redaction");
            return Ok(set);
        }
    };

    let finder = PhraseFinder::new(pages);
    for phrase in &request.phrases {
        for (page, boxes) in finder.find_phrase_bounding_boxes(&phrase.text, &phrase.pages)? {
            set.append(page, boxes);
        }
    }
    Ok(set)
}

/// Folds every selected entity's rectangles into the set.
fn collect_entity_boxes(
    set: RedactionSet,
    request: &RedactionRequest,
    source: &dyn InferenceSource,
) -> RedactionSet {
    request
        .entities
        .iter()
        .fold(set, |mut set, (source_name, entity_types)| {
            let locations = match source.entity_locations(source_name) {
                Ok(locations) => locations,
                Err(error) => {
                    warn!(source = %source_name, %error, "failed to retrieve inference, skipping");
                    return set;
                }
            };
            for (entity_type, entities) in entity_types {
                for (entity_text, pages) in entities {
                    for &page_number in pages {
                        append_entity_boxes(
                            &mut set,
                            &locations,
                            entity_type,
                            entity_text,
                            page_number,
                        );
                    }
                }
            }
            set
        })
}

/// Appends every rectangle of the detected instances of one entity on one
/// page, when the inference data has them.
fn append_entity_boxes(
    set: &mut RedactionSet,
    locations: &EntityLocations,
    entity_type: &str,
    entity_text: &str,
    page_number: u32,
) {
    let page_key = page_number.to_string();
    let Some(details) = locations
        .get(entity_type)
        .and_then(|entities| entities.get(entity_text))
        .and_then(|pages| pages.get(&page_key))
    else {
        return;
    };
    let boxes: Vec<BoundingBox> = details
        .iter()
        .flat_map(|detail| detail.bounding_boxes.iter().copied())
        .collect();
    set.append(page_key, boxes);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::{
        Block, BlockType, EntityDetail, Geometry, PhraseRequest, Relationship,
    };

    fn simple_page(words: &[&str]) -> OcrPage {
        let word_ids: Vec<String> = (0..words.len()).map(|idx| format!("w{idx}")).collect();
        let mut blocks = vec![Block {
            id: "l0".to_string(),
            block_type: BlockType::Line,
            text: words.join(" "),
            confidence: None,
            geometry: None,
            relationships: vec![Relationship {
                kind: "CHILD".to_string(),
                ids: word_ids.clone(),
            }],
        }];
        for (idx, word) in words.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let left = idx as f64 * 0.1;
            blocks.push(Block {
                id: word_ids[idx].clone(),
                block_type: BlockType::Word,
                text: (*word).to_string(),
                confidence: None,
                geometry: Some(Geometry {
                    bounding_box: BoundingBox::new(0.08, 0.02, left, 0.5),
                }),
                relationships: Vec::new(),
            });
        }
        OcrPage {
            blocks,
            ..OcrPage::default()
        }
    }

    fn locations_with(
        entity_type: &str,
        entity_text: &str,
        page: &str,
        boxes: Vec<BoundingBox>,
    ) -> EntityLocations {
        let mut locations = EntityLocations::new();
        locations
            .entry(entity_type.to_string())
            .or_default()
            .entry(entity_text.to_string())
            .or_default()
            .insert(page.to_string(), vec![EntityDetail {
                score: 0.9,
                bounding_boxes: boxes,
            }]);
        locations
    }

    fn request_with_entity(source: &str, entity_type: &str, text: &str, pages: Vec<u32>) -> RedactionRequest {
        let mut request = RedactionRequest::default();
        request
            .entities
            .entry(source.to_string())
            .or_default()
            .entry(entity_type.to_string())
            .or_default()
            .insert(text.to_string(), pages);
        request
    }

    #[test]
    fn phrase_boxes_come_before_entity_boxes() {
        let entity_box = BoundingBox::new(0.1, 0.1, 0.8, 0.8);
        let mut source = InMemorySource {
            pages: vec![simple_page(&["top", "secret"])],
            locations: BTreeMap::new(),
        };
        source.locations.insert(
            "entity-standard".to_string(),
            locations_with("NAME", "top", "1", vec![entity_box]),
        );

        let mut request = request_with_entity("entity-standard", "NAME", "top", vec![1]);
        request.phrases.push(PhraseRequest {
            text: "secret".to_string(),
            pages: vec![1],
        });

        let set = aggregate(&request, &source).unwrap();
        let boxes = set.boxes_for("1").unwrap();
        assert_eq!(boxes.len(), 2);
        // The phrase-derived rectangle (word "secret", left 0.1) precedes
        // the entity-derived one.
        assert_eq!(boxes[0], BoundingBox::new(0.08, 0.02, 0.1, 0.5));
        assert_eq!(boxes[1], entity_box);
    }

    #[test]
    fn missing_inference_source_is_skipped() {
        let source = InMemorySource {
            pages: Vec::new(),
            locations: BTreeMap::new(),
        };
        let request = request_with_entity("entity-pii", "SSN", "123-45-6789", vec![1]);
        let set = aggregate(&request, &source).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn unrequested_pages_and_unknown_entities_contribute_nothing() {
        let mut source = InMemorySource::default();
        source.locations.insert(
            "entity-standard".to_string(),
            locations_with("DATE", "10/23/20", "2", vec![BoundingBox::new(0.1, 0.1, 0.0, 0.0)]),
        );
        // Page 3 is not present in the inference data; entity "NAME" is
        // unknown entirely.
        let mut request = request_with_entity("entity-standard", "DATE", "10/23/20", vec![3]);
        request
            .entities
            .get_mut("entity-standard")
            .unwrap()
            .entry("NAME".to_string())
            .or_default()
            .insert("John".to_string(), vec![2]);
        let set = aggregate(&request, &source).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn entity_details_union_all_their_boxes() {
        let first = BoundingBox::new(0.1, 0.02, 0.1, 0.1);
        let second = BoundingBox::new(0.1, 0.02, 0.3, 0.1);
        let mut source = InMemorySource::default();
        source.locations.insert(
            "entity-standard".to_string(),
            locations_with("NAME", "John Doe", "2", vec![first, second]),
        );
        let request = request_with_entity("entity-standard", "NAME", "John Doe", vec![2]);
        let set = aggregate(&request, &source).unwrap();
        assert_eq!(set.boxes_for("2").unwrap(), &[first, second]);
    }

    #[test]
    fn unavailable_ocr_skips_phrase_redaction_but_keeps_entities() {
        struct FailingOcr(EntityLocations);
        impl InferenceSource for FailingOcr {
            fn ocr_pages(&self) -> Result<Vec<OcrPage>> {
                Err(Error::SourceUnavailable {
                    source_name: "textract-detectText".to_string(),
                    cause: "gone".to_string(),
                })
            }
            fn entity_locations(&self, _name: &str) -> Result<EntityLocations> {
                Ok(self.0.clone())
            }
        }

        let entity_box = BoundingBox::new(0.2, 0.05, 0.4, 0.4);
        let source = FailingOcr(locations_with("NAME", "Jane", "1", vec![entity_box]));
        let mut request = request_with_entity("entity-standard", "NAME", "Jane", vec![1]);
        request.phrases.push(PhraseRequest {
            text: "Jane".to_string(),
            pages: vec![1],
        });

        let set = aggregate(&request, &source).unwrap();
        assert_eq!(set.boxes_for("1").unwrap(), &[entity_box]);
    }

    #[test]
    fn empty_phrase_text_is_structurally_invalid() {
        let source = InMemorySource::default();
        let mut request = RedactionRequest::default();
        request.phrases.push(PhraseRequest {
            text: String::new(),
            pages: vec![1],
        });
        assert!(matches!(
            aggregate(&request, &source),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn aggregation_is_deterministic() {
        let mut source = InMemorySource {
            pages: vec![simple_page(&["alpha", "beta", "gamma"])],
            locations: BTreeMap::new(),
        };
        source.locations.insert(
            "entity-standard".to_string(),
            locations_with("NAME", "alpha", "1", vec![BoundingBox::new(0.1, 0.1, 0.5, 0.5)]),
        );
        let mut request = request_with_entity("entity-standard", "NAME", "alpha", vec![1]);
        request.phrases.push(PhraseRequest {
            text: "beta gamma".to_string(),
            pages: vec![1],
        });

        let first = aggregate(&request, &source).unwrap();
        let second = aggregate(&request, &source).unwrap();
        assert_eq!(first, second);
    }
}
