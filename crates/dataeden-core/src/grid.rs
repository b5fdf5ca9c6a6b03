use serde::Serialize;

/// Rows of string-encoded values, one value per generation column.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValueGrid {
    rows: Vec<Vec<String>>,
}

impl ValueGrid {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<String>> {
        self.rows
    }

    /// Index of the first row whose width differs from `width`.
    pub fn first_ragged_row(&self, width: usize) -> Option<usize> {
        self.rows.iter().position(|row| row.len() != width)
    }
}

impl From<Vec<Vec<String>>> for ValueGrid {
    fn from(rows: Vec<Vec<String>>) -> Self {
        Self::new(rows)
    }
}
