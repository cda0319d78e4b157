//! Phrase search CLI command.

use crate::observability::record_phrase_occurrences;
use crate::services::PhraseFinder;
use crate::{Error, Result};
use clap::Args;
use std::path::PathBuf;

use super::source::parse_ocr_pages;

/// Arguments for `blackout find`.
#[derive(Debug, Args)]
pub struct FindArgs {
    /// The literal phrase to locate (case- and whitespace-sensitive).
    pub phrase: String,

    /// Path to the OCR text-detection JSON.
    #[arg(long)]
    pub ocr: PathBuf,

    /// 1-based page to search (repeatable). Defaults to every OCR page.
    #[arg(short, long = "page")]
    pub pages: Vec<u32>,
}

/// Locates a phrase and prints the page → rectangles map as JSON.
#[allow(clippy::print_stdout)]
pub fn cmd_find(args: &FindArgs) -> Result<()> {
    let bytes = std::fs::read(&args.ocr).map_err(|error| {
        Error::InvalidInput(format!("cannot read {}: {error}", args.ocr.display()))
    })?;
    let ocr_pages = parse_ocr_pages(&bytes).map_err(|error| {
        Error::InvalidInput(format!("cannot parse {}: {error}", args.ocr.display()))
    })?;

    let page_count = ocr_pages.len();
    let finder = PhraseFinder::new(ocr_pages);

    #[allow(clippy::cast_possible_truncation)]
    let pages: Vec<u32> = if args.pages.is_empty() {
        (1..=page_count as u32).collect()
    } else {
        args.pages.clone()
    };

    let by_page = finder.find_phrase_bounding_boxes(&args.phrase, &pages)?;

    let mut occurrences = 0u64;
    for page_key in by_page.keys() {
        if let Ok(page_number) = page_key.parse::<usize>() {
            occurrences += finder.find_start_offsets(&args.phrase, page_number - 1)?.len() as u64;
        }
    }
    record_phrase_occurrences(occurrences);

    let rendered = serde_json::to_string_pretty(&by_page).map_err(|error| {
        Error::InvalidInput(format!("cannot render result: {error}"))
    })?;
    println!("{rendered}");
    Ok(())
}
