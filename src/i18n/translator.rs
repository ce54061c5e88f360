//! Key-based message lookup.

use std::collections::HashMap;

use super::Language;

/// Resolves a catalog key to display text.
///
/// Lookups never fail: an unmapped key comes back unchanged, so a missing
/// translation degrades to the key rather than aborting an import.
pub trait Translator: Send + Sync {
    fn translate(&self, key: &str) -> String;
}

/// Translator backed by the built-in catalog of one language.
#[derive(Debug, Clone, Copy)]
pub struct CatalogTranslator {
    language: Language,
}

impl CatalogTranslator {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn language(&self) -> Language {
        self.language
    }
}

impl Default for CatalogTranslator {
    fn default() -> Self {
        Self::new(Language::canonical())
    }
}

impl Translator for CatalogTranslator {
    fn translate(&self, key: &str) -> String {
        self.language
            .strings()
            .get(key)
            .map(str::to_string)
            .unwrap_or_else(|| key.to_string())
    }
}

/// Caller-owned catalogs, e.g. loaded from a properties or JSON file.
impl Translator for HashMap<String, String> {
    fn translate(&self, key: &str) -> String {
        self.get(key).cloned().unwrap_or_else(|| key.to_string())
    }
}

/// Substitute `{name}` placeholders in a template.
///
/// Single pass: substituted values are never scanned again, and unknown
/// placeholders are left as written.
pub fn fill(template: &str, args: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let arg = tail.find('}').and_then(|close| {
            let name = &tail[1..close];
            args.iter()
                .find(|(n, _)| *n == name)
                .map(|(_, value)| (*value, close))
        });
        match arg {
            Some((value, close)) => {
                out.push_str(value);
                rest = &tail[close + 1..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}
