//! Literal phrase location over OCR geometry.
//!
//! Occurrences are found by exact substring scan of each page's
//! concatenated line text, then resolved word-by-word against the line's
//! ordered child `WORD` blocks to produce one merged rectangle per line the
//! phrase spans.

use crate::models::{Block, BoundingBox, OcrPage};
use crate::services::TextIndex;
use crate::{Error, Result};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Locates literal phrases in OCR'd page text and resolves each occurrence
/// to covering rectangles.
pub struct PhraseFinder {
    index: TextIndex,
}

impl PhraseFinder {
    /// Builds a finder (and its text index) from per-page OCR results.
    #[must_use]
    pub fn new(pages: Vec<OcrPage>) -> Self {
        Self {
            index: TextIndex::build(pages),
        }
    }

    /// Finds all rectangles covering `phrase` on the requested 1-based
    /// pages.
    ///
    /// Matching is exact, case-sensitive, and whitespace-sensitive;
    /// overlapping occurrences are never reported. Page numbers beyond the
    /// available OCR results are skipped with a warning; every searched
    /// page gets an entry in the result, even when nothing was found.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an empty phrase, which can never
    /// terminate the scan.
    pub fn find_phrase_bounding_boxes(
        &self,
        phrase: &str,
        pages: &[u32],
    ) -> Result<BTreeMap<String, Vec<BoundingBox>>> {
        if phrase.is_empty() {
            return Err(Error::InvalidInput("phrase is empty".to_string()));
        }

        let mut by_page = BTreeMap::new();
        for &page_number in pages {
            let page_idx = (page_number as usize).wrapping_sub(1);
            if page_number == 0 || page_idx >= self.index.page_count() {
                warn!(page = page_number, "page does not exist, ignoring");
                continue;
            }
            let boxes = self.find_on_page(phrase, page_idx)?;
            info!(
                page = page_number,
                count = boxes.len(),
                phrase,
                "found bounding boxes for phrase"
            );
            by_page.insert(page_number.to_string(), boxes);
        }
        Ok(by_page)
    }

    /// Finds the rectangles of every occurrence of `phrase` on a 0-based
    /// page index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] for an invalid page index.
    pub fn find_on_page(&self, phrase: &str, page_idx: usize) -> Result<Vec<BoundingBox>> {
        let phrase_words: Vec<&str> = phrase.split(' ').collect();
        let mut boxes = Vec::new();
        for offset in self.find_start_offsets(phrase, page_idx)? {
            self.resolve_occurrence(page_idx, &mut boxes, &phrase_words, offset)?;
        }
        Ok(boxes)
    }

    /// All non-overlapping start offsets of `phrase` in a page's text.
    ///
    /// The scan resumes at the end of each hit, so overlapping occurrences
    /// are not reported.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] for an invalid page index.
    pub fn find_start_offsets(&self, phrase: &str, page_idx: usize) -> Result<Vec<usize>> {
        let text = self.index.page_text(page_idx)?;
        let mut offsets = Vec::new();
        if phrase.is_empty() {
            return Ok(offsets);
        }
        let mut index = 0;
        while let Some(position) = text.get(index..).and_then(|rest| rest.find(phrase)) {
            offsets.push(index + position);
            index += position + phrase.len();
        }
        Ok(offsets)
    }

    /// Resolves one occurrence starting at `offset` into per-line merged
    /// rectangles, appended to `boxes`.
    ///
    /// Words are matched in order against each line's words. A mismatch
    /// resets the match to the first phrase word without rewinding: scanning
    /// continues from the current word and line, so rectangles already
    /// appended for earlier lines of the abandoned partial match are kept.
    fn resolve_occurrence(
        &self,
        page_idx: usize,
        boxes: &mut Vec<BoundingBox>,
        phrase_words: &[&str],
        offset: usize,
    ) -> Result<()> {
        let mut phrase_word_idx = 0;
        let mut lines = self.index.lines_from(page_idx, offset)?;

        while phrase_word_idx < phrase_words.len() {
            let Some(line_id) = lines.next() else {
                warn!(
                    offset,
                    "ran out of lines before the phrase completed, abandoning occurrence"
                );
                break;
            };
            let Some(line_block) = self.index.block(page_idx, line_id)? else {
                warn!(line_id, "line block missing from index, abandoning occurrence");
                break;
            };

            // The children of a LINE block are ordered, so the word index
            // within the line is the index of the child WORD block.
            let child_ids = line_block.child_ids().unwrap_or(&[]);
            let mut line_box: Option<BoundingBox> = None;

            for (line_word_idx, line_word) in line_block.text.split(' ').enumerate() {
                if phrase_word_idx >= phrase_words.len() {
                    break;
                }
                let word_box = contains_standalone(line_word, phrase_words[phrase_word_idx])
                    .then(|| self.word_box_at(page_idx, child_ids, line_word_idx))
                    .transpose()?
                    .flatten();
                if let Some(word_box) = word_box {
                    line_box = Some(line_box.map_or(word_box, |merged| merged.merge(&word_box)));
                    phrase_word_idx += 1;
                } else {
                    // Partial match failed; restart the matching sequence.
                    phrase_word_idx = 0;
                    line_box = None;
                }
            }

            if let Some(found) = line_box {
                boxes.push(found);
            }
        }
        Ok(())
    }

    /// Bounding box of the child `WORD` block at a line word index.
    fn word_box_at(
        &self,
        page_idx: usize,
        child_ids: &[String],
        line_word_idx: usize,
    ) -> Result<Option<BoundingBox>> {
        let Some(word_id) = child_ids.get(line_word_idx) else {
            warn!(line_word_idx, "line has no child word at matched index");
            return Ok(None);
        };
        Ok(self.index.block(page_idx, word_id)?.and_then(Block::bounding_box))
    }
}

/// True when `needle` appears in `haystack` as a standalone token: not
/// preceded or followed by another word character. This tolerates leading
/// or trailing punctuation attached to OCR'd words, such as quotes or
/// periods.
fn contains_standalone(haystack: &str, needle: &str) -> bool {
    let mut search_start = 0;
    while let Some(found) = haystack
        .get(search_start..)
        .and_then(|rest| rest.find(needle))
    {
        let start = search_start + found;
        let end = start + needle.len();
        let preceded = haystack[..start].chars().next_back().is_some_and(is_word_char);
        let followed = haystack[end..].chars().next().is_some_and(is_word_char);
        if !preceded && !followed {
            return true;
        }
        let step = haystack[start..].chars().next().map_or(1, char::len_utf8);
        search_start = start + step;
    }
    false
}

/// ASCII word character, matching the `\w` class the matcher is defined
/// against.
const fn is_word_char(character: char) -> bool {
    character.is_ascii_alphanumeric() || character == '_'
}
