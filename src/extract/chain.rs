//! Fallback parser chain.
//!
//! Many files are ambiguous about being "digital" versus "scanned", and no
//! upfront heuristic classifies them reliably. The chain sidesteps the
//! question: try the digital text layer first, and if it yields nothing,
//! run OCR. A backend failure is recovered by advancing to the next
//! backend; only an unreadable input file aborts ingestion.

use std::path::Path;

use tracing::{debug, info, warn};

use super::providers::ProviderRegistry;
use super::{DigitalTextBackend, DocumentInput, ExtractError, ExtractionBackend};
use crate::config::ExtractionConfig;
use crate::document::PageRecords;

/// Ordered fallback sequence of extraction backends.
#[derive(Debug)]
pub struct ParserChain {
    backends: Vec<Box<dyn ExtractionBackend>>,
}

impl ParserChain {
    /// Standard chain: digital text layer first, then the configured OCR
    /// provider.
    pub fn from_config(config: &ExtractionConfig) -> Result<Self, ExtractError> {
        Self::with_registry(&ProviderRegistry::builtin(), config)
    }

    /// Standard chain resolving the OCR provider through a caller-supplied
    /// registry, so additional providers can be registered without changing
    /// any call site.
    pub fn with_registry(
        registry: &ProviderRegistry,
        config: &ExtractionConfig,
    ) -> Result<Self, ExtractError> {
        let ocr = registry.create(&config.ocr_provider, config)?;
        Ok(Self {
            backends: vec![Box::new(DigitalTextBackend::new()), ocr],
        })
    }

    /// Chain over an explicit backend sequence.
    pub fn with_backends(backends: Vec<Box<dyn ExtractionBackend>>) -> Self {
        Self { backends }
    }

    pub fn backends(&self) -> impl Iterator<Item = &dyn ExtractionBackend> {
        self.backends.iter().map(|b| b.as_ref())
    }

    /// Produce the best available per-page record sets for one file.
    ///
    /// A backend succeeds when at least one page's record set is non-empty.
    /// If every backend fails or comes back empty, the result is an empty
    /// vector: "no extractable content", which callers must not treat as an
    /// error.
    pub fn parse(&self, path: &Path) -> Result<Vec<PageRecords>, ExtractError> {
        let input = DocumentInput::open(path)?;

        for backend in &self.backends {
            match backend.extract(&input) {
                Ok(pages) => {
                    let words: usize = pages.iter().map(Vec::len).sum();
                    if words > 0 {
                        info!(
                            "{} extracted {} words across {} pages",
                            backend.name(),
                            words,
                            pages.len()
                        );
                        return Ok(pages);
                    }
                    debug!("{} found no text, trying next backend", backend.name());
                }
                Err(e) => {
                    warn!("{} failed, trying next backend: {}", backend.name(), e);
                }
            }
        }

        info!("No extractable content in {}", path.display());
        Ok(Vec::new())
    }
}
