//! Row payloads and batches

use serde_json::{Map, Value};

/// One unit of data applied against a template: field name -> value
pub type RowPayload = Map<String, Value>;

/// Ordered, non-empty sequence of rows applied in one transaction
#[derive(Debug, Clone, PartialEq)]
pub struct RowBatch {
    rows: Vec<RowPayload>,
}

impl RowBatch {
    /// Build a batch; `None` when `rows` is empty.
    pub fn new(rows: Vec<RowPayload>) -> Option<Self> {
        if rows.is_empty() {
            None
        } else {
            Some(Self { rows })
        }
    }

    /// Batch of exactly one row
    pub fn single(row: RowPayload) -> Self {
        Self { rows: vec![row] }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RowPayload> {
        self.rows.iter()
    }

    pub fn rows(&self) -> &[RowPayload] {
        &self.rows
    }
}

impl<'a> IntoIterator for &'a RowBatch {
    type Item = &'a RowPayload;
    type IntoIter = std::slice::Iter<'a, RowPayload>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
