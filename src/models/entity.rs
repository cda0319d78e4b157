//! Entity-location inference types.

use super::BoundingBox;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One detected instance of a named entity on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EntityDetail {
    /// Detection confidence in `[0, 1]`.
    pub score: f64,
    /// Rectangles covering this instance on the page.
    #[serde(default)]
    pub bounding_boxes: Vec<BoundingBox>,
}

/// Parsed form of one `<source>-locations.json` inference artifact:
/// entity type → entity text → page number (string) → detected instances.
pub type EntityLocations = BTreeMap<String, BTreeMap<String, BTreeMap<String, Vec<EntityDetail>>>>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_locations_artifact() {
        let json = r#"{
            "DATE": {
                "10/23/20": {
                    "1": [
                        {
                            "Score": 0.97,
                            "BoundingBoxes": [
                                {"Width": 0.1, "Height": 0.02, "Left": 0.4, "Top": 0.1}
                            ]
                        }
                    ]
                }
            }
        }"#;
        let locations: EntityLocations = serde_json::from_str(json).unwrap();
        let details = &locations["DATE"]["10/23/20"]["1"];
        assert_eq!(details.len(), 1);
        assert!((details[0].score - 0.97).abs() < f64::EPSILON);
        assert_eq!(details[0].bounding_boxes.len(), 1);
    }
}
