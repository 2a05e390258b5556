//! Extraction pipeline configuration.

use serde::{Deserialize, Serialize};

/// Default OCR provider name.
pub const DEFAULT_PROVIDER: &str = "tesseract";

/// Default OCR language.
pub const DEFAULT_LANGUAGE: &str = "eng";

/// Default rasterization resolution for OCR quality.
pub const DEFAULT_DPI: u32 = 300;

/// Settings shared by the extraction backends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// OCR provider name, resolved through the provider registry.
    pub ocr_provider: String,
    /// Language passed to the OCR engine (e.g. "eng", "deu").
    pub language: String,
    /// Resolution used when rasterizing PDF pages for OCR.
    pub dpi: u32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            ocr_provider: DEFAULT_PROVIDER.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            dpi: DEFAULT_DPI,
        }
    }
}

impl ExtractionConfig {
    /// Defaults overlaid with `OCR_PROVIDER`, `OCR_LANGUAGE`, and `OCR_DPI`
    /// environment variables where set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(provider) = std::env::var("OCR_PROVIDER") {
            if !provider.is_empty() {
                config.ocr_provider = provider;
            }
        }
        if let Ok(language) = std::env::var("OCR_LANGUAGE") {
            if !language.is_empty() {
                config.language = language;
            }
        }
        if let Ok(dpi) = std::env::var("OCR_DPI") {
            if let Ok(dpi) = dpi.parse() {
                config.dpi = dpi;
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExtractionConfig::default();
        assert_eq!(config.ocr_provider, "tesseract");
        assert_eq!(config.language, "eng");
        assert_eq!(config.dpi, 300);
    }
}
