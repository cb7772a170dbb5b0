use serde::{Deserialize, Serialize};

/// One spreadsheet cell as handed over by the tabular parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Blank,
}

impl CellValue {
    /// Classifies a raw text cell; numeric-looking text becomes a `Number`.
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return CellValue::Blank;
        }
        match parse_finite(trimmed) {
            Some(value) => CellValue::Number(value),
            None => CellValue::Text(trimmed.to_string()),
        }
    }

    /// Numeric coercion used for mark columns. Blank, non-numeric and non-finite cells yield `None`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(value) if value.is_finite() => Some(*value),
            CellValue::Number(_) | CellValue::Blank => None,
            CellValue::Text(text) => parse_finite(text.trim()),
        }
    }
}

fn parse_finite(value: &str) -> Option<f64> {
    value
        .parse::<f64>()
        .ok()
        .filter(|parsed| parsed.is_finite())
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

/// A raw mark-sheet row: column header to cell, in header order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkRecord {
    cells: Vec<(String, CellValue)>,
}

impl MarkRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.push(column, value);
        self
    }

    pub fn push(&mut self, column: impl Into<String>, value: impl Into<CellValue>) {
        self.cells.push((column.into(), value.into()));
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(column, _)| column.as_str())
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }
}

impl FromIterator<(String, CellValue)> for MarkRecord {
    fn from_iter<T: IntoIterator<Item = (String, CellValue)>>(iter: T) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

/// Rows of a sheet together with its header line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkSheet {
    pub headers: Vec<String>,
    pub rows: Vec<MarkRecord>,
}
