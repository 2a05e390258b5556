//! pagesift - document text extraction and geometric normalization.
//!
//! Takes an arbitrary document (digital PDF or scanned image) and produces a
//! position-aware textual representation: one [`document::Word`] per token
//! with bounding box, block/line grouping, and confidence, aggregated into
//! [`document::Page`]s and a [`document::Document`] whose reading-order text
//! feeds downstream chunking and retrieval.
//!
//! Extraction runs through a fallback chain: the PDF text layer is tried
//! first, and image OCR takes over when the file has no embedded text. See
//! [`extract::extract_document`] for the one-call entry point.

pub mod config;
pub mod document;
pub mod extract;
pub mod geometry;

pub use config::ExtractionConfig;
pub use document::{Document, Page, PageRecords, Word, WordList};
pub use extract::{extract_document, ExtractError, ParserChain};
pub use geometry::{combine, iou, BBox, EmptyInputError};
