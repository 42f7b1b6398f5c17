//! Workbook accessor backed by calamine.

use std::collections::HashMap;
use std::fs;
use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use chrono::{NaiveDate, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use super::source::{normalize_headers, CellValue, DataTable, MissingPolicy, SourceMetadata};
use crate::error::{GapsheetError, Result};

/// Container formats recognised by extension.
const KNOWN_FORMATS: &[&str] = &["xlsx", "xlsm", "xlam", "xlsb", "xls", "xla", "ods"];

/// Reader configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Which present values also count as missing.
    #[serde(default)]
    pub missing: MissingPolicy,
    /// Maximum data rows to read per sheet (None = all).
    #[serde(default)]
    pub max_rows: Option<usize>,
}

/// An opened, read-only spreadsheet workbook.
///
/// Sheets are decoded lazily and cached, so each sheet is parsed at most
/// once per handle.
pub struct Workbook {
    sheets: Sheets<Cursor<Vec<u8>>>,
    names: Vec<String>,
    config: ReaderConfig,
    cache: HashMap<String, DataTable>,
    metadata: SourceMetadata,
}

impl Workbook {
    /// Open a workbook from disk with the default reader configuration.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(path, ReaderConfig::default())
    }

    /// Open a workbook from disk.
    pub fn open_with_config(path: impl AsRef<Path>, config: ReaderConfig) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| GapsheetError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut workbook = Self::from_bytes_with_config(bytes, file, config)?;
        workbook.metadata.path = Some(path.to_path_buf());
        Ok(workbook)
    }

    /// Open a workbook from in-memory bytes, e.g. an upload.
    pub fn from_bytes(bytes: Vec<u8>, name: impl Into<String>) -> Result<Self> {
        Self::from_bytes_with_config(bytes, name, ReaderConfig::default())
    }

    /// Open a workbook from in-memory bytes with a reader configuration.
    pub fn from_bytes_with_config(
        bytes: Vec<u8>,
        name: impl Into<String>,
        config: ReaderConfig,
    ) -> Result<Self> {
        let name = name.into();

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let hash = format!("sha256:{:x}", hasher.finalize());
        let size_bytes = bytes.len() as u64;
        let format = detect_format(&name, &bytes);

        let sheets = open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|e| {
            GapsheetError::UnreadableWorkbook {
                name: name.clone(),
                message: e.to_string(),
            }
        })?;
        let names = sheets.sheet_names();

        debug!(file = %name, sheets = names.len(), format = %format, "opened workbook");

        let metadata = SourceMetadata::new(name, None, hash, size_bytes, format, names.len());

        Ok(Self {
            sheets,
            names,
            config,
            cache: HashMap::new(),
            metadata,
        })
    }

    /// Sheet names in workbook order.
    pub fn sheet_names(&self) -> &[String] {
        &self.names
    }

    /// Whether the workbook has a sheet with this name.
    pub fn has_sheet(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Metadata about the source container.
    pub fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }

    /// Reader configuration in effect.
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Materialize a sheet as a table.
    ///
    /// The first row of the sheet's used range is the header.
    pub fn load_sheet(&mut self, name: &str) -> Result<&DataTable> {
        if !self.has_sheet(name) {
            return Err(GapsheetError::SheetNotFound(name.to_string()));
        }

        if !self.cache.contains_key(name) {
            let range = self
                .sheets
                .worksheet_range(name)
                .map_err(|e| GapsheetError::SheetUnreadable {
                    sheet: name.to_string(),
                    message: e.to_string(),
                })?;
            let table = table_from_range(&range, &self.config);
            debug!(
                sheet = name,
                rows = table.row_count(),
                columns = table.column_count(),
                "loaded sheet"
            );
            self.cache.insert(name.to_string(), table);
        }

        self.cache
            .get(name)
            .ok_or_else(|| GapsheetError::SheetNotFound(name.to_string()))
    }
}

/// Build a table from a worksheet range.
///
/// Column positions are absolute: blank columns to the left of the used
/// range are kept, so `Unnamed: {i}` matches the sheet column index. Blank
/// rows above the header are skipped.
fn table_from_range(range: &Range<Data>, config: &ReaderConfig) -> DataTable {
    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return DataTable::new(Vec::new(), Vec::new());
    };
    let offset = range.start().map_or(0, |(_, col)| col as usize);

    let raw_headers = std::iter::repeat_n(String::new(), offset)
        .chain(header_row.iter().map(header_text))
        .collect();
    let headers = normalize_headers(raw_headers);

    let mut raw: Vec<&[Data]> = rows.collect();
    // Blank rows after the last populated one are not data.
    while raw
        .last()
        .is_some_and(|row| row.iter().all(|c| matches!(c, Data::Empty)))
    {
        raw.pop();
    }
    if let Some(max) = config.max_rows {
        raw.truncate(max);
    }

    let data = raw
        .into_iter()
        .map(|row| {
            std::iter::repeat_n(None, offset)
                .chain(row.iter().map(|cell| convert_cell(cell, &config.missing)))
                .collect()
        })
        .collect();

    DataTable::new(headers, data)
}

/// Render a header cell as a column name, verbatim.
fn header_text(cell: &Data) -> String {
    convert_cell(cell, &MissingPolicy::strict())
        .map(|v| v.to_string())
        .unwrap_or_default()
}

/// Convert a calamine cell; empty and error cells are missing.
fn convert_cell(cell: &Data, policy: &MissingPolicy) -> Option<CellValue> {
    let value = match cell {
        Data::Empty | Data::Error(_) => return None,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            CellValue::DateTime(excel_serial_to_iso(serial).unwrap_or_else(|| serial.to_string()))
        }
        Data::DateTimeIso(s) => CellValue::DateTime(s.clone()),
        Data::DurationIso(s) => CellValue::Duration(s.clone()),
    };

    if policy.is_na(&value) { None } else { Some(value) }
}

/// Convert an Excel serial date (1900 system) to ISO 8601.
fn excel_serial_to_iso(serial: f64) -> Option<String> {
    // Serial 0 is 1899-12-30 once the 1900 leap-year bug is accounted for.
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    if !serial.is_finite() {
        return None;
    }
    let millis = (serial * 86_400_000.0).round() as i64;
    let datetime = base.checked_add_signed(TimeDelta::try_milliseconds(millis)?)?;

    let formatted = if datetime.time().num_seconds_from_midnight() == 0 {
        datetime.format("%Y-%m-%d").to_string()
    } else {
        datetime.format("%Y-%m-%dT%H:%M:%S").to_string()
    };
    Some(formatted)
}

/// Detect the container format from the file name, falling back to magic bytes.
fn detect_format(name: &str, bytes: &[u8]) -> String {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match ext {
        Some(e) if KNOWN_FORMATS.contains(&e.as_str()) => e,
        _ if bytes.starts_with(b"PK\x03\x04") => "zip".to_string(),
        _ if bytes.starts_with(&[0xD0, 0xCF, 0x11, 0xE0]) => "cfb".to_string(),
        _ => "unknown".to_string(),
    }
}
