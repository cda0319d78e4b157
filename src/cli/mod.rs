//! CLI command implementations.
//!
//! The `blackout` binary drives the library's two call boundaries from local
//! files, standing in for the queue-triggered entry points a hosting
//! pipeline would provide.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `find` | Locate a literal phrase in OCR output and print its rectangles |
//! | `redact` | Aggregate a redaction request and burn it into a document |
//!
//! # Example Usage
//!
//! ```bash
//! # Where does "John Doe" appear on pages 1 and 2?
//! blackout find --ocr detect-text.json --page 1 --page 2 "John Doe"
//!
//! # Redact a document against a request file
//! blackout redact scan.pdf --request request.json \
//!     --ocr detect-text.json --locations inferences/ --output redacted.pdf
//! ```

mod find;
mod redact;
mod source;

pub use find::{FindArgs, cmd_find};
pub use redact::{RedactArgs, cmd_redact};
pub use source::FileInferenceSource;
