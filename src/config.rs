use anyhow::{bail, Context, Result};

use crate::i18n::Language;
use crate::listener::DEFAULT_BATCH_SIZE;

#[derive(Debug, Clone)]
pub struct ImportConfig {
    // Batching
    pub batch_size: usize,

    // Localization
    pub language: Language,

    // Persistence
    pub database_path: String,

    // Decoding
    pub delimiter: u8,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            language: Language::canonical(),
            database_path: "data/import.db".to_string(),
            delimiter: b',',
        }
    }
}

impl ImportConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let batch_size = match std::env::var("IMPORT_BATCH_SIZE") {
            Ok(value) => {
                let size: usize = value
                    .trim()
                    .parse()
                    .context(format!("IMPORT_BATCH_SIZE is not a number: {}", value))?;
                if size == 0 {
                    bail!("IMPORT_BATCH_SIZE must be at least 1");
                }
                size
            }
            Err(_) => defaults.batch_size,
        };

        let language = match std::env::var("IMPORT_LANGUAGE") {
            Ok(code) => Language::from_code(code.trim()).context("IMPORT_LANGUAGE is invalid")?,
            Err(_) => defaults.language,
        };

        let delimiter = match std::env::var("IMPORT_DELIMITER") {
            Ok(value) => parse_delimiter(&value)?,
            Err(_) => defaults.delimiter,
        };

        Ok(Self {
            batch_size,
            language,
            database_path: std::env::var("IMPORT_DATABASE_PATH")
                .unwrap_or(defaults.database_path),
            delimiter,
        })
    }
}

/// Accepts a single ASCII character, or `\t` / `tab` for tab-separated files.
fn parse_delimiter(value: &str) -> Result<u8> {
    match value {
        "\\t" | "tab" | "\t" => Ok(b'\t'),
        v if v.len() == 1 && v.is_ascii() => Ok(v.as_bytes()[0]),
        v => bail!("IMPORT_DELIMITER must be a single ASCII character, got '{}'", v),
    }
}
