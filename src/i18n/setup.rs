//! Wiring for the localization side of an import.
//!
//! One `Localization` is built per process (or per tenant language) and
//! handed to every listener. It decides which translator is in effect: the
//! built-in catalog unless the host application already provides one. The
//! same translator doubles as the message source for constraint messages, so
//! row prefixes and constraint text always come out in the same language.

use std::sync::Arc;

use super::{CatalogTranslator, Language, Translator};

#[derive(Clone)]
pub struct Localization {
    language: Language,
    translator: Arc<dyn Translator>,
    overridden: bool,
}

impl Localization {
    /// Use the built-in catalog for `language`.
    pub fn new(language: Language) -> Self {
        Self {
            language,
            translator: Arc::new(CatalogTranslator::new(language)),
            overridden: false,
        }
    }

    /// Replace the built-in catalog with a host-provided translator.
    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = translator;
        self.overridden = true;
        self
    }

    /// Use `translator` only if none has been provided yet.
    pub fn or_translator(self, translator: Arc<dyn Translator>) -> Self {
        if self.overridden {
            self
        } else {
            self.with_translator(translator)
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn is_overridden(&self) -> bool {
        self.overridden
    }

    /// Translator for row error phrasing.
    pub fn translator(&self) -> Arc<dyn Translator> {
        Arc::clone(&self.translator)
    }

    /// Translator for constraint messages. Same instance as `translator`.
    pub fn message_source(&self) -> Arc<dyn Translator> {
        self.translator()
    }
}

impl Default for Localization {
    fn default() -> Self {
        Self::new(Language::canonical())
    }
}

impl std::fmt::Debug for Localization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Localization")
            .field("language", &self.language)
            .field("overridden", &self.overridden)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn custom_catalog() -> Arc<dyn Translator> {
        let mut catalog = HashMap::new();
        catalog.insert("row_error".to_string(), "Line {row}: {message}".to_string());
        Arc::new(catalog)
    }

    #[test]
    fn test_default_uses_canonical_catalog() {
        let l10n = Localization::default();
        assert_eq!(l10n.language(), Language::ENGLISH);
        assert!(!l10n.is_overridden());
        assert_eq!(l10n.translator().translate("row_error"), "Row {row} error: {message}");
    }

    #[test]
    fn test_with_translator_overrides_catalog() {
        let l10n = Localization::new(Language::CHINESE).with_translator(custom_catalog());
        assert!(l10n.is_overridden());
        assert_eq!(l10n.translator().translate("row_error"), "Line {row}: {message}");
    }

    #[test]
    fn test_or_translator_only_fills_missing() {
        let fallback: Arc<dyn Translator> = Arc::new(HashMap::<String, String>::new());

        let l10n = Localization::default().or_translator(custom_catalog());
        assert_eq!(l10n.translator().translate("row_error"), "Line {row}: {message}");

        let l10n = l10n.or_translator(fallback);
        assert_eq!(l10n.translator().translate("row_error"), "Line {row}: {message}");
    }

    #[test]
    fn test_message_source_shares_translator() {
        let l10n = Localization::new(Language::CHINESE);
        assert!(Arc::ptr_eq(&l10n.translator(), &l10n.message_source()));
    }
}
