//! Tesseract OCR backend.
//!
//! Runs the Tesseract CLI in TSV mode, which reports one row per detected
//! word with its box, block/line grouping, and the engine's own confidence
//! score. PDF pages are rasterized to PNG first; native images are OCRed
//! as-is.

use std::path::Path;
use std::process::Command;

use serde::Deserialize;
use tempfile::TempDir;

use super::raster::rasterize_pdf;
use super::{BackendError, DocumentInput, ExtractionBackend, InputKind};
use crate::config::ExtractionConfig;
use crate::document::{PageRecords, Word};

pub const TESSERACT_NOT_FOUND: &str = "tesseract (install tesseract-ocr)";

/// Word-level detection row in Tesseract's TSV output.
const WORD_LEVEL: u32 = 5;

/// OCR extraction backend driving the `tesseract` CLI.
pub struct TesseractBackend {
    language: String,
    dpi: u32,
}

impl TesseractBackend {
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            language: config.language.clone(),
            dpi: config.dpi,
        }
    }

    fn run_tesseract_tsv(&self, image_path: &Path) -> Result<String, BackendError> {
        let output = Command::new("tesseract")
            .arg(image_path)
            .arg("stdout")
            .args(["-l", &self.language])
            .arg("tsv")
            .output();

        match output {
            Ok(output) => {
                if output.status.success() {
                    Ok(String::from_utf8_lossy(&output.stdout).to_string())
                } else {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    Err(BackendError::ExtractionFailed(format!(
                        "tesseract failed: {}",
                        stderr
                    )))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(BackendError::ToolNotFound(TESSERACT_NOT_FOUND.to_string()))
            }
            Err(e) => Err(BackendError::Io(e)),
        }
    }

    fn ocr_page(&self, image_path: &Path, page: u32) -> Result<PageRecords, BackendError> {
        let tsv = self.run_tesseract_tsv(image_path)?;
        parse_tsv(&tsv, page)
    }
}

impl ExtractionBackend for TesseractBackend {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn is_available(&self) -> bool {
        which::which("tesseract").is_ok()
    }

    fn availability_hint(&self) -> String {
        if which::which("tesseract").is_err() {
            "Tesseract not installed. Install with: apt install tesseract-ocr".to_string()
        } else if which::which("pdftoppm").is_err() {
            "pdftoppm not installed. Install with: apt install poppler-utils".to_string()
        } else {
            "Tesseract is available".to_string()
        }
    }

    fn extract(&self, input: &DocumentInput) -> Result<Vec<PageRecords>, BackendError> {
        match input.kind() {
            InputKind::Image => Ok(vec![self.ocr_page(input.path(), 0)?]),
            InputKind::Pdf => {
                // Temp dir lives for the duration of this file's extraction
                // and is removed on every exit path.
                let temp_dir = TempDir::new()?;
                let images = rasterize_pdf(input.path(), self.dpi, temp_dir.path())?;

                let mut pages = Vec::with_capacity(images.len());
                for (page_index, image_path) in images.iter().enumerate() {
                    pages.push(self.ocr_page(image_path, page_index as u32)?);
                }
                Ok(pages)
            }
        }
    }
}

/// One row of `tesseract ... tsv` output.
#[derive(Debug, Deserialize)]
struct TsvRow {
    level: u32,
    #[allow(dead_code)]
    page_num: u32,
    block_num: u32,
    #[allow(dead_code)]
    par_num: u32,
    line_num: u32,
    #[allow(dead_code)]
    word_num: u32,
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    conf: f32,
    #[serde(default)]
    text: String,
}

/// Map Tesseract's TSV rows into the normalized record schema.
///
/// Keeps word-level rows with visible text, converts `left/top/width/height`
/// into corner coordinates, and normalizes the engine's 0-100 confidence
/// into `[0, 1]`.
fn parse_tsv(tsv: &str, page: u32) -> Result<PageRecords, BackendError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .quoting(false)
        .flexible(true)
        .from_reader(tsv.as_bytes());

    let mut records = Vec::new();
    for row in reader.deserialize::<TsvRow>() {
        let row = row.map_err(|e| BackendError::MalformedOutput(e.to_string()))?;
        if row.level != WORD_LEVEL || row.text.trim().is_empty() {
            continue;
        }
        records.push(Word {
            x0: row.left,
            y0: row.top,
            x2: row.left + row.width,
            y2: row.top + row.height,
            text: row.text,
            block: row.block_num,
            page,
            index_sort: records.len() as u32,
            line: row.line_num,
            confidence: (row.conf / 100.0).clamp(0.0, 1.0),
        });
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_TSV: &str = "\
level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext
1\t1\t0\t0\t0\t0\t0\t0\t640\t480\t-1\t
2\t1\t1\t0\t0\t0\t32\t40\t400\t60\t-1\t
3\t1\t1\t1\t0\t0\t32\t40\t400\t60\t-1\t
4\t1\t1\t1\t1\t0\t32\t40\t400\t24\t-1\t
5\t1\t1\t1\t1\t1\t32\t40\t96\t24\t96.063904\tInvoice
5\t1\t1\t1\t1\t2\t140\t40\t80\t24\t91.5\t2024
5\t1\t1\t1\t2\t1\t32\t80\t64\t24\t88.2\tTotal
5\t1\t1\t1\t2\t2\t110\t80\t20\t24\t12.0\t \
";

    #[test]
    fn test_parse_tsv_keeps_word_rows_only() {
        let records = parse_tsv(SAMPLE_TSV, 0).unwrap();
        let texts: Vec<_> = records.iter().map(|w| w.text.as_str()).collect();
        // Structural rows and the whitespace-only detection are dropped.
        assert_eq!(texts, vec!["Invoice", "2024", "Total"]);
    }

    #[test]
    fn test_parse_tsv_maps_geometry_and_confidence() {
        let records = parse_tsv(SAMPLE_TSV, 4).unwrap();
        let first = &records[0];
        assert_eq!(first.x0, 32.0);
        assert_eq!(first.y0, 40.0);
        assert_eq!(first.x2, 128.0);
        assert_eq!(first.y2, 64.0);
        assert_eq!(first.block, 1);
        assert_eq!(first.line, 1);
        assert_eq!(first.page, 4);
        assert!((first.confidence - 0.96063904).abs() < 1e-6);

        assert_eq!(records[2].line, 2);
        // Emission order within the page, not Tesseract's per-line word_num.
        let order: Vec<_> = records.iter().map(|w| w.index_sort).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn test_parse_tsv_empty_output() {
        let header = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext\n";
        assert!(parse_tsv(header, 0).unwrap().is_empty());
    }

    #[test]
    fn test_parse_tsv_confidence_clamped() {
        let tsv = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext\n\
                   5\t1\t1\t1\t1\t1\t0\t0\t10\t10\t101.0\thigh\n";
        let records = parse_tsv(tsv, 0).unwrap();
        assert_eq!(records[0].confidence, 1.0);
    }
}
