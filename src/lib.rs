//! Spreadsheet import: header check, per-row validation, batched persistence.
//!
//! ```rust
//! use sheet_import::i18n::Localization;
//! use sheet_import::{FieldDef, FieldSchema, MemorySink, RowListener, RowRecord};
//!
//! let schema = FieldSchema::new(vec![
//!     FieldDef::new("name", "name").required(),
//!     FieldDef::new("age", "age").range(0.0, 120.0).unwrap(),
//! ])
//! .unwrap();
//!
//! let mut listener = RowListener::with_localization(schema, MemorySink::new(), &Localization::default());
//! listener.validate_header(&["name", "age"]).unwrap();
//! listener.process(RowRecord::from_pairs([("name", "Alice"), ("age", "30")]), 2).unwrap();
//! listener.process(RowRecord::from_pairs([("name", ""), ("age", "200")]), 3).unwrap();
//! listener.finish().unwrap();
//!
//! assert_eq!(listener.sink().row_count(), 1);
//! assert_eq!(listener.drain_errors()[0].message, "Row 3 error: name is required");
//! ```

pub mod config;
pub mod db;
pub mod decoder;
pub mod error;
pub mod i18n;
pub mod listener;
pub mod metrics;
pub mod record;
pub mod schema;
pub mod sink;
pub mod validate;

pub use error::{ImportError, ImportResult, PersistenceError};
pub use listener::{CustomValidator, ErrorEntry, NoCustomValidation, RowListener, DEFAULT_BATCH_SIZE};
pub use record::{Record, RowRecord};
pub use schema::{FieldDef, FieldSchema};
pub use sink::{BatchSink, MemorySink};
