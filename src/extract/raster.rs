//! PDF-to-image conversion for the OCR path.
//!
//! Rasterizes PDF pages to PNG with pdftoppm (Poppler). Output lives in a
//! caller-owned temporary directory that is released when the extraction
//! call returns, on all exit paths.

use std::path::{Path, PathBuf};
use std::process::Command;

use super::BackendError;

pub const PDFTOPPM_NOT_FOUND: &str = "pdftoppm (install poppler-utils)";

/// Rasterize every page of a PDF into `output_dir`, returning the page
/// images in physical page order.
pub fn rasterize_pdf(
    pdf_path: &Path,
    dpi: u32,
    output_dir: &Path,
) -> Result<Vec<PathBuf>, BackendError> {
    let status = Command::new("pdftoppm")
        .args(["-png", "-r", &dpi.to_string()])
        .arg(pdf_path)
        .arg(output_dir.join("page"))
        .status();

    match status {
        Ok(s) if s.success() => {}
        Ok(_) => {
            return Err(BackendError::ExtractionFailed(
                "pdftoppm failed to convert PDF".to_string(),
            ))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(BackendError::ToolNotFound(PDFTOPPM_NOT_FOUND.to_string()))
        }
        Err(e) => return Err(BackendError::Io(e)),
    }

    // pdftoppm names files page-01.png, page-02.png, ... with zero padding
    // that depends on the page count, so a lexicographic sort preserves
    // page order.
    let mut images: Vec<PathBuf> = std::fs::read_dir(output_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().map(|ext| ext == "png").unwrap_or(false))
        .collect();
    images.sort();

    if images.is_empty() {
        return Err(BackendError::ExtractionFailed(
            "no images generated from PDF".to_string(),
        ));
    }

    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_page_order_is_lexicographic() {
        let temp = TempDir::new().unwrap();
        for name in ["page-03.png", "page-01.png", "page-02.png", "notes.txt"] {
            std::fs::write(temp.path().join(name), b"x").unwrap();
        }

        let mut images: Vec<PathBuf> = std::fs::read_dir(temp.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().map(|ext| ext == "png").unwrap_or(false))
            .collect();
        images.sort();

        let names: Vec<_> = images
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["page-01.png", "page-02.png", "page-03.png"]);
    }
}
