//! Streaming row validator and batcher.
//!
//! The upstream decoder drives a `RowListener` in a fixed order:
//!
//! 1. `validate_header` once with the decoded header row,
//! 2. `process` for every data row,
//! 3. `finish` once at end of stream,
//!
//! and reads per-row failures with `drain_errors` whenever it likes. Valid
//! rows are buffered and handed to the sink whenever the buffer grows past
//! the batch size, and once more at `finish`.
//!
//! Every accepted call leaves each record in exactly one place: the pending
//! buffer, a batch already handed to the sink, or the error list.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{ImportError, ImportResult};
use crate::i18n::strings::keys;
use crate::i18n::{fill, Localization, Translator};
use crate::metrics::ImportMetrics;
use crate::record::Record;
use crate::schema::FieldSchema;
use crate::sink::BatchSink;
use crate::validate::validate_record;

/// Rows buffered before a flush is forced.
pub const DEFAULT_BATCH_SIZE: usize = 2000;

/// A rejected row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorEntry<R> {
    pub record: R,
    /// Row index as supplied by the decoder
    pub row_index: usize,
    /// Localized message including the row prefix
    pub message: String,
    /// The bare validation message
    pub reason: String,
}

/// Domain rules that run after the schema checks.
///
/// Receives the structural verdict (`None` = passed) and returns the final
/// one. It may keep, replace, extend or clear the message. It must not
/// depend on or touch rows seen earlier.
pub trait CustomValidator<R> {
    fn validate(&self, record: &R, message: Option<String>) -> Option<String>;
}

impl<R, F> CustomValidator<R> for F
where
    F: Fn(&R, Option<String>) -> Option<String>,
{
    fn validate(&self, record: &R, message: Option<String>) -> Option<String> {
        self(record, message)
    }
}

/// Hook that passes the structural verdict through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCustomValidation;

impl<R> CustomValidator<R> for NoCustomValidation {
    fn validate(&self, _record: &R, message: Option<String>) -> Option<String> {
        message
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    AwaitingHeader,
    Streaming,
    Aborted,
    Finished,
}

pub struct RowListener<R, S, V = NoCustomValidation> {
    schema: FieldSchema,
    sink: S,
    custom: V,
    translator: Arc<dyn Translator>,
    batch_size: usize,
    pending: Vec<R>,
    errors: Vec<ErrorEntry<R>>,
    metrics: ImportMetrics,
    stage: Stage,
}

impl<R, S> RowListener<R, S>
where
    R: Record,
    S: BatchSink<R>,
{
    pub fn new(schema: FieldSchema, sink: S, translator: Arc<dyn Translator>) -> Self {
        Self {
            schema,
            sink,
            custom: NoCustomValidation,
            translator,
            batch_size: DEFAULT_BATCH_SIZE,
            pending: Vec::new(),
            errors: Vec::new(),
            metrics: ImportMetrics::new(),
            stage: Stage::AwaitingHeader,
        }
    }

    /// Take the translator from the localization wiring.
    pub fn with_localization(schema: FieldSchema, sink: S, localization: &Localization) -> Self {
        Self::new(schema, sink, localization.message_source())
    }
}

impl<R, S, V> RowListener<R, S, V>
where
    R: Record,
    S: BatchSink<R>,
    V: CustomValidator<R>,
{
    /// Flush once more than `batch_size` rows are pending. Zero flushes
    /// after every accepted row.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_custom_validator<V2>(self, custom: V2) -> RowListener<R, S, V2>
    where
        V2: CustomValidator<R>,
    {
        RowListener {
            schema: self.schema,
            sink: self.sink,
            custom,
            translator: self.translator,
            batch_size: self.batch_size,
            pending: self.pending,
            errors: self.errors,
            metrics: self.metrics,
            stage: self.stage,
        }
    }

    /// Check the decoded header row before any data row.
    ///
    /// Every schema header must appear among `columns`. The first missing
    /// one, in schema order, aborts the import.
    ///
    /// # Errors
    ///
    /// * `SchemaMismatch` naming the first field whose header is missing
    /// * `InvalidState` if rows were already processed or the header was
    ///   already checked
    pub fn validate_header<H: AsRef<str>>(&mut self, columns: &[H]) -> ImportResult<()> {
        if self.stage != Stage::AwaitingHeader {
            return Err(ImportError::InvalidState(
                "header must be validated once, before any row",
            ));
        }

        for field in self.schema.fields() {
            if !columns.iter().any(|c| c.as_ref() == field.header()) {
                let message = format!(
                    "{}:{}",
                    self.translator.translate(keys::MISSING_HEADER_INFORMATION),
                    field.header()
                );
                warn!("Rejecting sheet: header '{}' not found", field.header());
                self.stage = Stage::Aborted;
                return Err(ImportError::schema_mismatch(field.name(), message));
            }
        }

        debug!("Header accepted ({} columns)", columns.len());
        self.stage = Stage::Streaming;
        Ok(())
    }

    /// Validate one row and route it to the pending buffer or the error list.
    ///
    /// `row_index` is only used in messages; it is never checked or derived.
    ///
    /// # Errors
    ///
    /// * `SchemaMismatch` if the record lacks a schema field
    /// * `Persistence` if this row triggered a flush and the sink failed
    /// * `InvalidState` after `finish` or after a fatal error
    pub fn process(&mut self, record: R, row_index: usize) -> ImportResult<()> {
        match self.stage {
            Stage::AwaitingHeader => self.stage = Stage::Streaming,
            Stage::Streaming => {}
            Stage::Aborted => return Err(ImportError::InvalidState("import was aborted")),
            Stage::Finished => {
                return Err(ImportError::InvalidState("process called after finish"))
            }
        }

        let structural = match validate_record(&self.schema, &record, self.translator.as_ref()) {
            Ok(verdict) => verdict,
            Err(e) => {
                warn!("Aborting import at row {}: {}", row_index, e);
                self.stage = Stage::Aborted;
                return Err(e);
            }
        };

        match self
            .custom
            .validate(&record, structural)
            .filter(|reason| !reason.is_empty())
        {
            Some(reason) => {
                let message = fill(
                    &self.translator.translate(keys::ROW_ERROR),
                    &[("row", &row_index.to_string()), ("message", &reason)],
                );
                debug!("Row {} rejected: {}", row_index, reason);
                self.errors.push(ErrorEntry {
                    record,
                    row_index,
                    message,
                    reason,
                });
                self.metrics.record_rejected();
            }
            None => {
                self.pending.push(record);
                self.metrics.record_accepted();
            }
        }

        if self.pending.len() > self.batch_size {
            self.flush()?;
        }

        Ok(())
    }

    /// End of stream: hand whatever is pending to the sink, even nothing.
    pub fn finish(&mut self) -> ImportResult<()> {
        match self.stage {
            Stage::Finished => return Err(ImportError::InvalidState("finish called twice")),
            Stage::Aborted => return Err(ImportError::InvalidState("import was aborted")),
            Stage::AwaitingHeader | Stage::Streaming => {}
        }

        self.flush()?;
        self.stage = Stage::Finished;

        info!(
            "Import finished: {} rows accepted, {} rejected",
            self.metrics.rows_accepted(),
            self.metrics.rows_rejected()
        );
        Ok(())
    }

    /// Take the errors collected so far, leaving the list empty.
    pub fn drain_errors(&mut self) -> Vec<ErrorEntry<R>> {
        std::mem::take(&mut self.errors)
    }

    // The buffer is taken before the sink runs, so a rejected batch is lost
    // to this listener. Callers that need retries must keep their own copy.
    fn flush(&mut self) -> ImportResult<()> {
        let batch = std::mem::take(&mut self.pending);
        let rows = batch.len();

        match self.sink.save_batch(batch) {
            Ok(()) => {
                debug!("Flushed batch of {} rows", rows);
                self.metrics.record_flush(rows);
                Ok(())
            }
            Err(e) => {
                warn!("Discarding batch of {} rows after sink failure: {}", rows, e);
                self.metrics.record_failed_flush(rows);
                self.stage = Stage::Aborted;
                Err(e.into())
            }
        }
    }
}

impl<R, S, V> RowListener<R, S, V> {
    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Errors collected and not yet drained.
    pub fn errors(&self) -> &[ErrorEntry<R>] {
        &self.errors
    }

    pub fn metrics(&self) -> &ImportMetrics {
        &self.metrics
    }

    pub fn is_finished(&self) -> bool {
        self.stage == Stage::Finished
    }

    pub fn is_aborted(&self) -> bool {
        self.stage == Stage::Aborted
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
