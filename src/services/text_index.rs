//! Offset index over per-page OCR line text.

use crate::models::{Block, BlockType, OcrPage};
use crate::{Error, Result};
use std::collections::{BTreeMap, HashMap};

/// Index data for one page.
struct PageIndex {
    /// All `LINE` text on the page, concatenated in engine order with a
    /// single separating space.
    text: String,
    /// Character offset recorded when each `LINE` was appended → line id.
    ///
    /// For every line after the first, the recorded offset is the position
    /// of the separating space, one short of the line's first character;
    /// floor lookups at any offset inside a line still resolve to it.
    line_offsets: BTreeMap<usize, String>,
    /// Every block on the page, by id.
    blocks: HashMap<String, Block>,
}

/// Searchable index built once per document from raw OCR page results.
///
/// Supports floor lookup of the line containing a given character offset of
/// the page text, ascending iteration over subsequent lines, and block
/// resolution by id.
pub struct TextIndex {
    pages: Vec<PageIndex>,
}

impl TextIndex {
    /// Builds the index from per-page OCR results.
    #[must_use]
    pub fn build(pages: Vec<OcrPage>) -> Self {
        let pages = pages
            .into_iter()
            .map(|page| {
                let mut text = String::new();
                let mut line_offsets = BTreeMap::new();
                let mut blocks = HashMap::with_capacity(page.blocks.len());
                for block in page.blocks {
                    if block.block_type == BlockType::Line {
                        line_offsets.insert(text.len(), block.id.clone());
                        if !text.is_empty() {
                            text.push(' ');
                        }
                        text.push_str(&block.text);
                    }
                    blocks.insert(block.id.clone(), block);
                }
                PageIndex {
                    text,
                    line_offsets,
                    blocks,
                }
            })
            .collect();
        Self { pages }
    }

    fn page(&self, page_idx: usize) -> Result<&PageIndex> {
        self.pages.get(page_idx).ok_or(Error::OutOfRange {
            index: page_idx,
            len: self.pages.len(),
        })
    }

    /// Number of indexed pages.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// The concatenated line text of a page.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] for an invalid page index.
    pub fn page_text(&self, page_idx: usize) -> Result<&str> {
        Ok(&self.page(page_idx)?.text)
    }

    /// Id of the line whose recorded offset is at or immediately before
    /// `offset`, if the page has any lines.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] for an invalid page index.
    pub fn line_at(&self, page_idx: usize, offset: usize) -> Result<Option<&str>> {
        Ok(self
            .page(page_idx)?
            .line_offsets
            .range(..=offset)
            .next_back()
            .map(|(_, id)| id.as_str()))
    }

    /// Line ids in ascending offset order, starting at the floor of
    /// `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] for an invalid page index.
    pub fn lines_from(
        &self,
        page_idx: usize,
        offset: usize,
    ) -> Result<impl Iterator<Item = &str>> {
        let page = self.page(page_idx)?;
        let start = page
            .line_offsets
            .range(..=offset)
            .next_back()
            .map_or(0, |(key, _)| *key);
        Ok(page.line_offsets.range(start..).map(|(_, id)| id.as_str()))
    }

    /// Looks up a block by id on a page.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] for an invalid page index.
    pub fn block(&self, page_idx: usize, id: &str) -> Result<Option<&Block>> {
        Ok(self.page(page_idx)?.blocks.get(id))
    }
}
