//! Typed table abstraction and source metadata.

use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata about the source workbook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file, when opened from disk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// SHA-256 hash of the container bytes.
    pub hash: String,
    /// Container size in bytes.
    pub size_bytes: u64,
    /// Detected container format (xlsx, xls, ods, ...).
    pub format: String,
    /// Number of sheets in the workbook.
    pub sheet_count: usize,
    /// When the workbook was opened.
    pub analyzed_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a workbook that has been opened.
    pub fn new(
        file: String,
        path: Option<PathBuf>,
        hash: String,
        size_bytes: u64,
        format: String,
        sheet_count: usize,
    ) -> Self {
        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            sheet_count,
            analyzed_at: Utc::now(),
        }
    }

    /// File name up to its first `.`, used to name the download archive.
    pub fn base_name(&self) -> &str {
        self.file.split('.').next().unwrap_or(&self.file)
    }
}

/// A present cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Number(f64),
    Bool(bool),
    /// Date or date-time rendered as ISO 8601.
    DateTime(String),
    /// Duration rendered as ISO 8601.
    Duration(String),
}

impl CellValue {
    /// Short name of the value's kind.
    pub fn kind(&self) -> &'static str {
        match self {
            CellValue::Text(_) => "text",
            CellValue::Integer(_) => "integer",
            CellValue::Number(_) => "number",
            CellValue::Bool(_) => "bool",
            CellValue::DateTime(_) => "datetime",
            CellValue::Duration(_) => "duration",
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) | CellValue::DateTime(s) | CellValue::Duration(s) => {
                write!(f, "{}", s)
            }
            CellValue::Integer(i) => write!(f, "{}", i),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
                    write!(f, "{:.0}", n)
                } else {
                    write!(f, "{}", n)
                }
            }
            CellValue::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
        }
    }
}

/// Which present values should additionally count as missing.
///
/// The default is strict: only empty and error cells are missing, and a
/// present empty string is a value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MissingPolicy {
    /// Text tokens treated as missing (exact match after trimming).
    #[serde(default)]
    pub na_tokens: Vec<String>,
}

impl MissingPolicy {
    /// Strict policy with no NA tokens.
    pub fn strict() -> Self {
        Self::default()
    }

    /// Treat the given text tokens as missing.
    pub fn with_na_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            na_tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether a present value should be recorded as missing.
    pub fn is_na(&self, value: &CellValue) -> bool {
        match value {
            CellValue::Text(s) => {
                let trimmed = s.trim();
                self.na_tokens.iter().any(|t| t == trimmed)
            }
            _ => false,
        }
    }
}

/// A sheet materialized as ordered columns and rows of nullable cells.
#[derive(Debug, Clone, PartialEq)]
pub struct DataTable {
    /// Column names, unique within the table.
    pub headers: Vec<String>,
    /// Row data (row-major); `None` is a missing cell.
    pub rows: Vec<Vec<Option<CellValue>>>,
}

impl DataTable {
    /// Create a new data table. Rows shorter than the header are padded
    /// with missing cells; longer rows are truncated.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Option<CellValue>>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, None);
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Whether a column with this name exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(col)).and_then(Option::as_ref)
    }

    /// Whether a cell is missing. Out-of-range cells count as missing.
    pub fn is_missing(&self, row: usize, col: usize) -> bool {
        self.get(row, col).is_none()
    }

    /// Get all cells for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = Option<&CellValue>> {
        self.rows
            .iter()
            .map(move |row| row.get(index).and_then(Option::as_ref))
    }

    /// Count missing cells in a column.
    pub fn missing_count(&self, index: usize) -> usize {
        self.column_values(index).filter(Option::is_none).count()
    }

    /// Restrict the table to the named columns, in the given order.
    /// Names that do not exist are ignored.
    pub fn select(&self, columns: &[String]) -> DataTable {
        let indices: Vec<usize> = columns
            .iter()
            .filter_map(|c| self.column_index(c))
            .collect();

        let headers = indices.iter().map(|&i| self.headers[i].clone()).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                indices
                    .iter()
                    .map(|&i| row.get(i).cloned().flatten())
                    .collect()
            })
            .collect();

        DataTable { headers, rows }
    }
}

/// Make header names unique and fill blanks.
///
/// Blank headers become `Unnamed: {index}`; repeats get `.1`, `.2`, ...
/// suffixes in order of appearance.
pub(crate) fn normalize_headers(raw: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut headers = Vec::with_capacity(raw.len());

    for (index, name) in raw.into_iter().enumerate() {
        let base = if name.trim().is_empty() {
            format!("Unnamed: {}", index)
        } else {
            name
        };

        let mut candidate = base.clone();
        let mut suffix = 1;
        while seen.contains(&candidate) {
            candidate = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        seen.insert(candidate.clone());
        headers.push(candidate);
    }

    headers
}
