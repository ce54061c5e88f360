//! Decoded rows.

use serde::{Deserialize, Serialize};

/// A decoded row as seen by the validator.
///
/// `has_field` describes the record's shape, `value` its content. A field can
/// be part of the shape and still be empty; validating a field outside the
/// shape is a schema error rather than bad data.
pub trait Record {
    fn has_field(&self, name: &str) -> bool;

    /// Cell text for `name`, `None` when the cell is empty or absent.
    fn value(&self, name: &str) -> Option<&str>;
}

/// Generic row: field names in column order with optional cell text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowRecord {
    cells: Vec<(String, Option<String>)>,
}

impl RowRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row from `(field, text)` pairs; empty text becomes an empty cell.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut row = Self::new();
        for (name, text) in pairs {
            row.set(name, text);
        }
        row
    }

    /// Set a cell; an empty string is stored as an empty cell.
    pub fn set(&mut self, name: impl Into<String>, text: impl Into<String>) {
        let text = text.into();
        let value = if text.is_empty() { None } else { Some(text) };
        self.insert(name.into(), value);
    }

    /// Declare `name` as part of the row without a value.
    pub fn set_empty(&mut self, name: impl Into<String>) {
        self.insert(name.into(), None);
    }

    fn insert(&mut self, name: String, value: Option<String>) {
        match self.cells.iter_mut().find(|(field, _)| *field == name) {
            Some(cell) => cell.1 = value,
            None => self.cells.push((name, value)),
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl Record for RowRecord {
    fn has_field(&self, name: &str) -> bool {
        self.cells.iter().any(|(field, _)| field == name)
    }

    fn value(&self, name: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(field, _)| field == name)
            .and_then(|(_, value)| value.as_deref())
    }
}
