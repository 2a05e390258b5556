//! Text extraction backends and the fallback parser chain.
//!
//! Extracts positioned words from documents using:
//! - pdftotext (Poppler) for digital PDF text layers
//! - Tesseract OCR for scanned PDFs and image files (default provider)
//!
//! Every backend emits the same normalized record schema, one record set per
//! page, so downstream code never special-cases the source format. The
//! [`ParserChain`] tries the digital text layer first and falls back to OCR
//! when a file turns out to have no embedded text.

mod chain;
mod digital;
pub mod grouping;
mod providers;
mod raster;
mod tesseract;

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::ExtractionConfig;
use crate::document::{Document, PageRecords};

pub use chain::ParserChain;
pub use digital::DigitalTextBackend;
pub use providers::ProviderRegistry;
pub use tesseract::TesseractBackend;

/// Fatal ingestion errors, surfaced to the caller immediately.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unreadable file {path}: {reason}")]
    UnreadableFile { path: PathBuf, reason: String },

    #[error("Unknown OCR provider: {0}")]
    UnknownProvider(String),
}

/// Errors from a single extraction backend.
///
/// These are recovered by the parser chain, which logs them and advances to
/// the next backend; they never abort ingestion on their own.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("External tool not found: {0}")]
    ToolNotFound(String),

    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("Malformed extractor output: {0}")]
    MalformedOutput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Supported input formats, detected from file content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Pdf,
    Image,
}

/// A classified input file handed to the backends.
#[derive(Debug, Clone)]
pub struct DocumentInput {
    path: PathBuf,
    kind: InputKind,
}

impl DocumentInput {
    /// Classify a file by sniffing its magic bytes, falling back to the
    /// extension when the content is unrecognized.
    pub fn open(path: &Path) -> Result<Self, ExtractError> {
        let unreadable = |reason: String| ExtractError::UnreadableFile {
            path: path.to_path_buf(),
            reason,
        };

        let mut file = File::open(path).map_err(|e| unreadable(e.to_string()))?;
        let mut buffer = [0u8; 8192];
        let bytes_read = file.read(&mut buffer).map_err(|e| unreadable(e.to_string()))?;

        let kind = detect_kind(&buffer[..bytes_read], path)
            .ok_or_else(|| unreadable("unsupported file format".to_string()))?;

        Ok(Self {
            path: path.to_path_buf(),
            kind,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> InputKind {
        self.kind
    }
}

fn detect_kind(head: &[u8], path: &Path) -> Option<InputKind> {
    if let Some(detected) = infer::get(head) {
        let mime = detected.mime_type();
        if mime == "application/pdf" {
            return Some(InputKind::Pdf);
        }
        if mime.starts_with("image/") {
            return Some(InputKind::Image);
        }
        return None;
    }

    // No recognizable magic bytes; trust a known extension.
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "pdf" => Some(InputKind::Pdf),
        "png" | "jpg" | "jpeg" | "tif" | "tiff" | "bmp" | "gif" | "webp" => {
            Some(InputKind::Image)
        }
        _ => None,
    }
}

/// A strategy that turns one input file into per-page normalized record sets.
///
/// "No text found" is an empty record set, never an error; errors are
/// reserved for unreadable input or external tool failure.
pub trait ExtractionBackend: Send + Sync {
    /// Short name used in logs and availability reports.
    fn name(&self) -> &'static str;

    /// Whether the backend's external tools are installed.
    fn is_available(&self) -> bool;

    /// What is needed to make this backend available.
    fn availability_hint(&self) -> String;

    /// Extract every page of the input, preserving physical page order.
    fn extract(&self, input: &DocumentInput) -> Result<Vec<PageRecords>, BackendError>;
}

impl std::fmt::Debug for dyn ExtractionBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractionBackend")
            .field("name", &self.name())
            .finish()
    }
}

/// Ingest one file: run the parser chain and wrap the result in a
/// [`Document`].
///
/// An empty document means no backend found extractable text; callers decide
/// whether that is actionable.
pub fn extract_document(path: &Path, config: &ExtractionConfig) -> Result<Document, ExtractError> {
    let chain = ParserChain::from_config(config)?;
    let records = chain.parse(path)?;
    Ok(Document::from_records(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_detect_kind_pdf_magic() {
        let kind = detect_kind(b"%PDF-1.7\n%stream", Path::new("noext"));
        assert_eq!(kind, Some(InputKind::Pdf));
    }

    #[test]
    fn test_detect_kind_png_magic() {
        let kind = detect_kind(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A], Path::new("x"));
        assert_eq!(kind, Some(InputKind::Image));
    }

    #[test]
    fn test_detect_kind_extension_fallback() {
        assert_eq!(detect_kind(b"", Path::new("scan.tiff")), Some(InputKind::Image));
        assert_eq!(detect_kind(b"", Path::new("report.pdf")), Some(InputKind::Pdf));
        assert_eq!(detect_kind(b"", Path::new("notes.txt")), None);
    }

    #[test]
    fn test_open_missing_file_is_unreadable() {
        let err = DocumentInput::open(Path::new("/nonexistent/file.pdf")).unwrap_err();
        assert!(matches!(err, ExtractError::UnreadableFile { .. }));
    }

    #[test]
    fn test_open_unsupported_format_is_unreadable() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("data.bin");
        let mut file = File::create(&path).unwrap();
        file.write_all(b"PK\x03\x04not a document").unwrap();
        let err = DocumentInput::open(&path).unwrap_err();
        assert!(matches!(err, ExtractError::UnreadableFile { .. }));
    }

    #[test]
    fn test_open_classifies_pdf() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("doc.pdf");
        std::fs::write(&path, b"%PDF-1.4\n1 0 obj\n").unwrap();
        let input = DocumentInput::open(&path).unwrap();
        assert_eq!(input.kind(), InputKind::Pdf);
    }
}
