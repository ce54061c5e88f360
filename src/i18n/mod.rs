//! Localization for import messages.
//!
//! # Architecture
//!
//! - `registry`: the fixed table of supported languages and their catalogs
//! - `language`: validated `Language` handle
//! - `strings`: the per-language message catalogs and their keys
//! - `translator`: the `Translator` lookup trait and its implementations
//! - `setup`: `Localization`, the single wiring point listeners take their
//!   translator from
//!
//! # Example
//!
//! ```rust
//! use sheet_import::i18n::{Language, Localization};
//!
//! let l10n = Localization::new(Language::from_code("zh").unwrap());
//! assert_eq!(l10n.translator().translate("missing_header_information"), "缺少头部信息");
//! ```

mod language;
mod registry;
mod setup;
pub mod strings;
mod translator;

pub use language::Language;
pub use registry::{LanguageConfig, LanguageRegistry};
pub use setup::Localization;
pub use strings::LanguageStrings;
pub use translator::{fill, CatalogTranslator, Translator};
