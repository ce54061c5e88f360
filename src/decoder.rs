//! CSV driver for `RowListener`.
//!
//! Reads a delimited sheet with the `csv` crate and feeds it to a listener
//! in the order the listener expects: header, rows, end of stream.

use std::io::Read;

use serde::Serialize;
use tracing::info;

use crate::error::ImportResult;
use crate::listener::{CustomValidator, ErrorEntry, RowListener};
use crate::metrics::MetricsReport;
use crate::record::RowRecord;
use crate::sink::BatchSink;

/// Outcome of a completed import.
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport<R> {
    pub metrics: MetricsReport,
    pub errors: Vec<ErrorEntry<R>>,
}

impl<R> ImportReport<R> {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Run a whole CSV source through `listener`.
///
/// Header cells are trimmed (and a leading byte-order mark dropped) before
/// the header check. Each data row becomes a `RowRecord` keyed by schema
/// field name; with an empty schema, by header text. Missing trailing cells
/// are empty cells. The row index is the 1-based line the record starts on,
/// so the first data row of a file with a one-line header is row 2.
///
/// # Errors
///
/// Whatever the listener reports, plus `ImportError::Decode` if the input is
/// not readable as CSV. Rows rejected before the failure stay on the
/// listener for `drain_errors`.
pub fn import_csv<Rd, S, V>(
    reader: Rd,
    listener: &mut RowListener<RowRecord, S, V>,
    delimiter: u8,
) -> ImportResult<ImportReport<RowRecord>>
where
    Rd: Read,
    S: BatchSink<RowRecord>,
    V: CustomValidator<RowRecord>,
{
    let mut csv = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let h = if i == 0 { h.trim_start_matches('\u{feff}') } else { h };
            h.trim().to_string()
        })
        .collect();

    listener.validate_header(&headers)?;

    let columns: Vec<(String, usize)> = if listener.schema().is_empty() {
        headers.iter().cloned().zip(0..).collect()
    } else {
        listener
            .schema()
            .fields()
            .iter()
            .filter_map(|field| {
                headers
                    .iter()
                    .position(|h| h == field.header())
                    .map(|i| (field.name().to_string(), i))
            })
            .collect()
    };

    let mut record = csv::StringRecord::new();
    while csv.read_record(&mut record)? {
        let row_index = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or_default();

        let mut row = RowRecord::new();
        for (name, i) in &columns {
            row.set(name.as_str(), record.get(*i).unwrap_or(""));
        }
        listener.process(row, row_index)?;
    }

    listener.finish()?;

    let report = ImportReport {
        metrics: listener.metrics().report(),
        errors: listener.drain_errors(),
    };
    info!(
        "Imported {} of {} rows ({} rejected)",
        report.metrics.rows_flushed, report.metrics.rows_seen, report.metrics.rows_rejected
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ImportError;
    use crate::i18n::{CatalogTranslator, Language, Translator};
    use crate::record::Record;
    use crate::schema::{FieldDef, FieldSchema};
    use crate::sink::MemorySink;
    use std::sync::Arc;

    fn listener(schema: FieldSchema) -> RowListener<RowRecord, MemorySink<RowRecord>> {
        let translator: Arc<dyn Translator> = Arc::new(CatalogTranslator::new(Language::ENGLISH));
        RowListener::new(schema, MemorySink::new(), translator)
    }

    fn people_schema() -> FieldSchema {
        FieldSchema::new(vec![
            FieldDef::new("name", "Name").required(),
            FieldDef::new("age", "Age").range(0.0, 120.0).unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn test_import_maps_columns_by_header() {
        let data = "Age,Ignored,Name\n30,x,Alice\n45,y,Bob\n";
        let mut listener = listener(people_schema());

        let report = import_csv(data.as_bytes(), &mut listener, b',').unwrap();

        assert!(!report.has_errors());
        assert_eq!(report.metrics.rows_flushed, 2);
        let first = listener.sink().rows().next().unwrap();
        assert_eq!(first.value("name"), Some("Alice"));
        assert_eq!(first.value("age"), Some("30"));
        assert!(!first.has_field("Ignored"));
    }

    #[test]
    fn test_row_index_is_source_line() {
        let data = "Name,Age\nAlice,30\n,200\nBob,45\n";
        let mut listener = listener(people_schema());

        let report = import_csv(data.as_bytes(), &mut listener, b',').unwrap();

        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].row_index, 3);
        assert_eq!(report.errors[0].message, "Row 3 error: Name is required");
    }

    #[test]
    fn test_missing_header_aborts_before_rows() {
        let data = "Name\nAlice\n";
        let mut listener = listener(people_schema());

        let err = import_csv(data.as_bytes(), &mut listener, b',').unwrap_err();

        assert!(matches!(err, ImportError::SchemaMismatch { ref field, .. } if field == "age"));
        assert!(listener.sink().batches().is_empty());
        assert_eq!(listener.metrics().rows_seen(), 0);
    }

    #[test]
    fn test_header_bom_and_whitespace_are_ignored() {
        let data = "\u{feff} Name , Age\nAlice,30\n";
        let mut listener = listener(people_schema());
        let report = import_csv(data.as_bytes(), &mut listener, b',').unwrap();
        assert_eq!(report.metrics.rows_accepted, 1);
    }

    #[test]
    fn test_short_rows_have_empty_cells() {
        let data = "Name,Age\nAlice\n";
        let mut listener = listener(people_schema());
        let report = import_csv(data.as_bytes(), &mut listener, b',').unwrap();

        assert_eq!(report.metrics.rows_accepted, 1);
        assert_eq!(listener.sink().rows().next().unwrap().value("age"), None);
    }

    #[test]
    fn test_blank_optional_cell_is_accepted() {
        let data = "Name,Age\nAlice, \nBob,\n";
        let mut listener = listener(people_schema());
        let report = import_csv(data.as_bytes(), &mut listener, b',').unwrap();

        assert!(!report.has_errors());
        assert_eq!(report.metrics.rows_accepted, 2);
    }

    #[test]
    fn test_fatal_error_keeps_rejected_rows() {
        let data = "Name,Age\n,1\nAlice,2\nBob,3\n";
        let translator: Arc<dyn Translator> = Arc::new(CatalogTranslator::new(Language::ENGLISH));
        let mut listener =
            RowListener::new(people_schema(), MemorySink::new().failing_at(0), translator)
                .with_batch_size(1);

        let err = import_csv(data.as_bytes(), &mut listener, b',').unwrap_err();
        assert!(matches!(err, ImportError::Persistence(_)));

        let errors = listener.drain_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Row 2 error: Name is required");
    }

    #[test]
    fn test_custom_delimiter() {
        let data = "Name;Age\nAlice;30\n";
        let mut listener = listener(people_schema());
        let report = import_csv(data.as_bytes(), &mut listener, b';').unwrap();
        assert_eq!(report.metrics.rows_accepted, 1);
    }

    #[test]
    fn test_empty_schema_keys_by_header() {
        let data = "Anything,Else\n1,2\n";
        let mut listener = listener(FieldSchema::empty());
        import_csv(data.as_bytes(), &mut listener, b',').unwrap();

        let row = listener.sink().rows().next().unwrap();
        assert_eq!(row.value("Else"), Some("2"));
    }

    #[test]
    fn test_header_only_file_flushes_empty_batch() {
        let mut listener = listener(people_schema());
        let report = import_csv("Name,Age\n".as_bytes(), &mut listener, b',').unwrap();

        assert_eq!(report.metrics.rows_seen, 0);
        assert_eq!(listener.sink().batches().len(), 1);
    }

    #[test]
    fn test_invalid_utf8_is_decode_error() {
        let data: &[u8] = b"Name,Age\n\xff\xfe,1\n";
        let mut listener = listener(people_schema());
        let err = import_csv(data, &mut listener, b',').unwrap_err();
        assert!(matches!(err, ImportError::Decode(_)));
    }
}
