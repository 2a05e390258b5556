//! OCR provider registry.
//!
//! Maps provider names to backend factories so the OCR step can be swapped
//! by configuration without changing call sites. The registry is populated
//! at startup; looking up a name that was never registered is a named
//! failure, not a silent default.

use std::collections::HashMap;

use super::tesseract::TesseractBackend;
use super::{ExtractError, ExtractionBackend};
use crate::config::ExtractionConfig;

/// Constructor for one OCR provider.
pub type ProviderFactory = fn(&ExtractionConfig) -> Box<dyn ExtractionBackend>;

/// Registry of OCR providers, keyed by name.
pub struct ProviderRegistry {
    providers: HashMap<&'static str, ProviderFactory>,
}

impl ProviderRegistry {
    /// Registry with the built-in providers wired.
    pub fn builtin() -> Self {
        let mut registry = Self {
            providers: HashMap::new(),
        };
        registry.register("tesseract", |config| Box::new(TesseractBackend::new(config)));
        registry
    }

    /// Register an additional provider under a name.
    pub fn register(&mut self, name: &'static str, factory: ProviderFactory) {
        self.providers.insert(name, factory);
    }

    /// Instantiate the provider registered under `name`.
    pub fn create(
        &self,
        name: &str,
        config: &ExtractionConfig,
    ) -> Result<Box<dyn ExtractionBackend>, ExtractError> {
        let factory = self
            .providers
            .get(name)
            .ok_or_else(|| ExtractError::UnknownProvider(name.to_string()))?;
        Ok(factory(config))
    }

    /// Registered provider names, sorted for stable display.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.providers.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_has_tesseract() {
        let registry = ProviderRegistry::builtin();
        assert_eq!(registry.names(), vec!["tesseract"]);
        let backend = registry
            .create("tesseract", &ExtractionConfig::default())
            .unwrap();
        assert_eq!(backend.name(), "tesseract");
    }

    #[test]
    fn test_unknown_provider_is_named_error() {
        let registry = ProviderRegistry::builtin();
        let err = registry
            .create("cuneiform", &ExtractionConfig::default())
            .unwrap_err();
        match err {
            ExtractError::UnknownProvider(name) => assert_eq!(name, "cuneiform"),
            other => panic!("expected UnknownProvider, got {other:?}"),
        }
    }

    #[test]
    fn test_registering_new_provider() {
        let mut registry = ProviderRegistry::builtin();
        registry.register("tesseract-fast", |config| {
            Box::new(TesseractBackend::new(config))
        });
        assert!(registry
            .create("tesseract-fast", &ExtractionConfig::default())
            .is_ok());
    }
}
