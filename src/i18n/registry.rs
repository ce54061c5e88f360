//! Locale registry: the fixed table of catalogs the importer can speak.
//!
//! Built lazily once through `OnceLock` and immutable afterwards, so it holds
//! no per-run state.

use std::sync::OnceLock;

use super::strings::{LanguageStrings, CHINESE_STRINGS, ENGLISH_STRINGS};

/// A supported locale and its message catalog.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// ISO 639-1 language code (e.g., "en", "zh")
    pub code: &'static str,

    /// English name of the language
    pub name: &'static str,

    /// Native name of the language
    pub native_name: &'static str,

    /// Fallback locale used when none is configured (exactly one)
    pub is_canonical: bool,

    /// Whether imports may be run in this language
    pub enabled: bool,

    /// Message catalog for this language
    pub strings: &'static LanguageStrings,
}

pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the shared registry, building it on first access.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
        })
    }

    /// Look up a language by its code.
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    pub fn list_enabled(&self) -> Vec<&LanguageConfig> {
        self.languages.iter().filter(|lang| lang.enabled).collect()
    }

    /// Get the canonical language configuration.
    ///
    /// # Panics
    /// Panics unless exactly one canonical language is registered. The table
    /// is static, so this is a build-time mistake rather than a runtime one.
    pub fn canonical(&self) -> &LanguageConfig {
        let canonical: Vec<_> = self
            .languages
            .iter()
            .filter(|lang| lang.is_canonical)
            .collect();

        match canonical.len() {
            1 => canonical[0],
            0 => panic!("No canonical language found in registry"),
            _ => panic!("Multiple canonical languages found in registry"),
        }
    }

    pub fn is_enabled(&self, code: &str) -> bool {
        self.get_by_code(code)
            .map(|lang| lang.enabled)
            .unwrap_or(false)
    }
}

fn default_languages() -> Vec<LanguageConfig> {
    vec![
        LanguageConfig {
            code: "en",
            name: "English",
            native_name: "English",
            is_canonical: true,
            enabled: true,
            strings: &ENGLISH_STRINGS,
        },
        LanguageConfig {
            code: "zh",
            name: "Chinese",
            native_name: "中文",
            is_canonical: false,
            enabled: true,
            strings: &CHINESE_STRINGS,
        },
    ]
}
