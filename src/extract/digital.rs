//! Digital text-layer extraction via pdftotext.
//!
//! Drives `pdftotext -bbox-layout` (Poppler) and parses its XHTML output,
//! which nests per-word boxes inside line and block elements. Confidence is
//! always 1.0 on this path: the embedded text layer is authoritative, not
//! probabilistic. A scanned page simply yields no words, which is the signal
//! that makes the parser chain fall back to OCR.

use std::path::Path;
use std::process::Command;

use quick_xml::events::Event;
use quick_xml::Reader;

use super::grouping::{mark_breaks, LineBreak, RawToken};
use super::{BackendError, DocumentInput, ExtractionBackend, InputKind};
use crate::document::{PageRecords, Word};

pub const PDFTOTEXT_NOT_FOUND: &str = "pdftotext (install poppler-utils)";

/// Extraction backend for PDFs with an embedded text layer.
#[derive(Debug, Default)]
pub struct DigitalTextBackend;

impl DigitalTextBackend {
    pub fn new() -> Self {
        Self
    }

    fn run_pdftotext(&self, pdf_path: &Path) -> Result<String, BackendError> {
        let output = Command::new("pdftotext")
            .args(["-bbox-layout", "-enc", "UTF-8"])
            .arg(pdf_path)
            .arg("-")
            .output();

        match output {
            Ok(output) => {
                if output.status.success() {
                    Ok(String::from_utf8_lossy(&output.stdout).to_string())
                } else {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    Err(BackendError::ExtractionFailed(format!(
                        "pdftotext failed: {}",
                        stderr
                    )))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(BackendError::ToolNotFound(PDFTOTEXT_NOT_FOUND.to_string()))
            }
            Err(e) => Err(BackendError::Io(e)),
        }
    }
}

impl ExtractionBackend for DigitalTextBackend {
    fn name(&self) -> &'static str {
        "digital-text"
    }

    fn is_available(&self) -> bool {
        which::which("pdftotext").is_ok()
    }

    fn availability_hint(&self) -> String {
        if self.is_available() {
            "pdftotext is available".to_string()
        } else {
            format!("{} not installed", PDFTOTEXT_NOT_FOUND)
        }
    }

    fn extract(&self, input: &DocumentInput) -> Result<Vec<PageRecords>, BackendError> {
        if input.kind() != InputKind::Pdf {
            // Raster images carry no text layer.
            return Ok(Vec::new());
        }

        let xml = self.run_pdftotext(input.path())?;
        let pages = parse_bbox_layout(&xml)?;
        Ok(pages
            .into_iter()
            .enumerate()
            .map(|(page_index, tokens)| normalize_page(tokens, page_index as u32))
            .collect())
    }
}

/// Parse `pdftotext -bbox-layout` XHTML into per-page raw token streams.
///
/// Block and line ids are assigned from the structural nesting: blocks are
/// numbered per page, lines per block, both in document order.
fn parse_bbox_layout(xml: &str) -> Result<Vec<Vec<RawToken>>, BackendError> {
    let malformed = |detail: String| BackendError::MalformedOutput(detail);

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut pages: Vec<Vec<RawToken>> = Vec::new();
    let mut block: u32 = 0;
    let mut line: u32 = 0;
    let mut pending: Option<RawToken> = None;

    loop {
        match reader.read_event().map_err(|e| malformed(e.to_string()))? {
            Event::Start(e) => match e.name().as_ref() {
                b"page" => {
                    pages.push(Vec::new());
                    block = 0;
                }
                b"block" => {
                    block = pages
                        .last()
                        .and_then(|p| p.last())
                        .map(|t| t.block + 1)
                        .unwrap_or(0);
                    line = 0;
                }
                b"line" => {
                    line = pages
                        .last()
                        .and_then(|p| p.last())
                        .filter(|t| t.block == block)
                        .map(|t| t.line + 1)
                        .unwrap_or(0);
                }
                b"word" => {
                    let mut token = RawToken {
                        text: String::new(),
                        x0: 0.0,
                        y0: 0.0,
                        x2: 0.0,
                        y2: 0.0,
                        block,
                        line,
                    };
                    for attr in e.attributes() {
                        let attr = attr.map_err(|e| malformed(e.to_string()))?;
                        let field = match attr.key.as_ref() {
                            b"xMin" => &mut token.x0,
                            b"yMin" => &mut token.y0,
                            b"xMax" => &mut token.x2,
                            b"yMax" => &mut token.y2,
                            _ => continue,
                        };
                        let value = attr
                            .unescape_value()
                            .map_err(|e| malformed(e.to_string()))?;
                        *field = value
                            .parse::<f64>()
                            .map_err(|e| malformed(format!("bad coordinate: {}", e)))?;
                    }
                    pending = Some(token);
                }
                _ => {}
            },
            Event::Empty(e) => {
                if e.name().as_ref() == b"page" {
                    pages.push(Vec::new());
                    block = 0;
                }
            }
            Event::Text(t) => {
                if let Some(token) = pending.as_mut() {
                    token
                        .text
                        .push_str(&t.unescape().map_err(|e| malformed(e.to_string()))?);
                }
            }
            Event::End(e) => {
                if e.name().as_ref() == b"word" {
                    if let Some(token) = pending.take() {
                        if !token.text.is_empty() {
                            match pages.last_mut() {
                                Some(page) => page.push(token),
                                None => {
                                    return Err(malformed("word outside a page".to_string()))
                                }
                            }
                        }
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(pages)
}

/// Turn one page's raw tokens into normalized records.
///
/// The grouping heuristic assigns the final line ids: a token after a hard
/// break starts a new line. `index_sort` is the emission order within the
/// page.
fn normalize_page(tokens: Vec<RawToken>, page: u32) -> PageRecords {
    let breaks = mark_breaks(&tokens);
    let mut current_line: u32 = 0;
    let mut records = Vec::with_capacity(tokens.len());

    for (i, (token, brk)) in tokens.into_iter().zip(breaks).enumerate() {
        records.push(Word {
            x0: token.x0,
            y0: token.y0,
            x2: token.x2,
            y2: token.y2,
            text: token.text,
            block: token.block,
            page,
            index_sort: i as u32,
            line: current_line,
            confidence: 1.0,
        });
        if brk == LineBreak::Hard {
            current_line += 1;
        }
    }

    records
}
