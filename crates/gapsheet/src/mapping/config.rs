//! Sheet-to-columns mapping supplied by the caller.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{GapsheetError, Result};

/// Ordered mapping from sheet name to the columns requested on it.
///
/// Serializes as a plain JSON object, `{"Sheet1": ["A", "B"], ...}`, and
/// iterates in insertion (or document) order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SheetColumnMapping {
    entries: IndexMap<String, Vec<String>>,
}

impl SheetColumnMapping {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the same columns on every listed sheet.
    pub fn uniform<S, C>(sheets: S, columns: C) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let mut mapping = Self::new();
        if columns.is_empty() {
            return mapping;
        }
        for sheet in sheets {
            mapping.insert(sheet, columns.clone());
        }
        mapping
    }

    /// Decode a mapping from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| GapsheetError::InvalidMapping(e.to_string()))
    }

    /// Decode a mapping from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| GapsheetError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json_str(&text)
    }

    /// Encode as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Set the columns for a sheet, replacing any earlier entry in place.
    pub fn insert<S, C>(&mut self, sheet: S, columns: C)
    where
        S: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        self.entries
            .insert(sheet.into(), columns.into_iter().map(Into::into).collect());
    }

    /// Columns requested for a sheet.
    pub fn get(&self, sheet: &str) -> Option<&[String]> {
        self.entries.get(sheet).map(Vec::as_slice)
    }

    /// Iterate over `(sheet, columns)` in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(sheet, cols)| (sheet.as_str(), cols.as_slice()))
    }

    /// Number of sheets in the mapping.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the mapping requests nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of `(sheet, column)` pairs requested.
    pub fn pair_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}

impl<S, C> FromIterator<(S, C)> for SheetColumnMapping
where
    S: Into<String>,
    C: IntoIterator,
    C::Item: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (S, C)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (sheet, columns) in iter {
            mapping.insert(sheet, columns);
        }
        mapping
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_preserves_order() {
        let json = r#"{"Zeta": ["b", "a"], "Alpha": ["c"]}"#;
        let mapping = SheetColumnMapping::from_json_str(json).unwrap();

        let sheets: Vec<&str> = mapping.iter().map(|(s, _)| s).collect();
        assert_eq!(sheets, vec!["Zeta", "Alpha"]);
        assert_eq!(mapping.get("Zeta").unwrap(), ["b", "a"]);
        assert_eq!(mapping.pair_count(), 3);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let result = SheetColumnMapping::from_json_str("{\"Sheet1\": [\"A\",");
        assert!(matches!(result, Err(GapsheetError::InvalidMapping(_))));

        let wrong_shape = SheetColumnMapping::from_json_str(r#"{"Sheet1": "A"}"#);
        assert!(matches!(wrong_shape, Err(GapsheetError::InvalidMapping(_))));
    }

    #[test]
    fn test_uniform() {
        let mapping = SheetColumnMapping::uniform(["S1", "S2"], ["Asset", "Reason"]);
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.get("S2").unwrap(), ["Asset", "Reason"]);

        let none = SheetColumnMapping::uniform(["S1"], Vec::<String>::new());
        assert!(none.is_empty());
    }

    #[test]
    fn test_json_roundtrip_shape() {
        let mapping: SheetColumnMapping =
            [("Sheet1", vec!["Asset", "Super Reason"])].into_iter().collect();
        let json = mapping.to_json_pretty().unwrap();
        assert!(json.contains("\"Sheet1\""));
        assert_eq!(SheetColumnMapping::from_json_str(&json).unwrap(), mapping);
    }
}
