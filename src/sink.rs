//! Persistence capability handed to the listener.

use crate::error::PersistenceError;

/// Receives validated rows in batches.
///
/// A batch is either fully persisted (`Ok`) or rejected as a whole. The
/// listener never retries, and it has already let go of the rows by the
/// time this is called.
pub trait BatchSink<R> {
    fn save_batch(&mut self, rows: Vec<R>) -> Result<(), PersistenceError>;
}

impl<R, F> BatchSink<R> for F
where
    F: FnMut(Vec<R>) -> Result<(), PersistenceError>,
{
    fn save_batch(&mut self, rows: Vec<R>) -> Result<(), PersistenceError> {
        self(rows)
    }
}

/// Keeps every batch in memory. Used for dry runs and tests.
#[derive(Debug, Clone)]
pub struct MemorySink<R> {
    batches: Vec<Vec<R>>,
    fail_at: Option<usize>,
}

impl<R> MemorySink<R> {
    pub fn new() -> Self {
        Self {
            batches: Vec::new(),
            fail_at: None,
        }
    }

    /// Reject the batch with this 0-based ordinal (counting every call).
    pub fn failing_at(mut self, batch: usize) -> Self {
        self.fail_at = Some(batch);
        self
    }

    /// Every save call so far, including empty and rejected ones.
    pub fn batches(&self) -> &[Vec<R>] {
        &self.batches
    }

    /// Rows from accepted batches, in arrival order.
    pub fn rows(&self) -> impl Iterator<Item = &R> {
        self.batches
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != self.fail_at)
            .flat_map(|(_, batch)| batch.iter())
    }

    pub fn row_count(&self) -> usize {
        self.rows().count()
    }
}

impl<R> Default for MemorySink<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> BatchSink<R> for MemorySink<R> {
    fn save_batch(&mut self, rows: Vec<R>) -> Result<(), PersistenceError> {
        let ordinal = self.batches.len();
        let len = rows.len();
        self.batches.push(rows);

        if self.fail_at == Some(ordinal) {
            return Err(PersistenceError::new(len, "memory sink configured to fail"));
        }
        Ok(())
    }
}
