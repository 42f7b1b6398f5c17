//! CSV summaries and the downloadable zip bundle.

use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::analysis::{AggregatedStat, ColumnStat};
use crate::error::{GapsheetError, Result};

/// Archive entry name of the detailed summary.
pub const SUMMARY_FILE: &str = "missing_values_summary.csv";

/// Archive entry name of the aggregated summary.
pub const AGGREGATED_FILE: &str = "aggregated_missing_summary.csv";

const SUMMARY_HEADER: [&str; 6] = [
    "Sheet",
    "Column",
    "Total_Rows",
    "Missing_Count",
    "Missing_Percentage",
    "Non_Missing_Count",
];

const AGGREGATED_HEADER: [&str; 4] = [
    "Column",
    "Total_Rows",
    "Missing_Count",
    "Missing_Percentage",
];

/// Archive entry name of a sheet's report.
pub fn report_file_name(sheet: &str) -> String {
    format!("{}_missing_values_report.html", sheet)
}

/// Suggested file name of the archive for a source base name.
pub fn archive_file_name(base_name: &str) -> String {
    format!("missing_values_analysis_{}.zip", base_name)
}

/// Everything an analysis produces for download.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportBundle {
    /// Detailed summary CSV text.
    pub summary_csv: String,
    /// Aggregated summary CSV text, when more than one stat was produced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregated_csv: Option<String>,
    /// Descriptive document per sheet, in processing order.
    pub documents: IndexMap<String, String>,
    /// Suggested archive file name.
    pub archive_name: String,
    /// Deflate-compressed zip of every artifact.
    #[serde(skip)]
    pub archive: Vec<u8>,
}

impl ReportBundle {
    /// Serialize the summaries and bundle them with the documents.
    pub fn build(
        stats: &[ColumnStat],
        aggregated: &[AggregatedStat],
        documents: IndexMap<String, String>,
        base_name: &str,
    ) -> Result<Self> {
        let summary_csv = summary_csv(stats)?;
        let aggregated_csv = if aggregated.is_empty() {
            None
        } else {
            Some(aggregated_csv(aggregated)?)
        };

        let mut bundle = Self {
            summary_csv,
            aggregated_csv,
            documents,
            archive_name: archive_file_name(base_name),
            archive: Vec::new(),
        };
        let archive = write_archive(&bundle.entries())?;
        bundle.archive = archive;

        Ok(bundle)
    }

    /// Archive entries in order: summary, aggregated summary, then one
    /// report per document.
    pub fn entries(&self) -> Vec<(String, &[u8])> {
        let mut entries = vec![(SUMMARY_FILE.to_string(), self.summary_csv.as_bytes())];
        if let Some(ref agg) = self.aggregated_csv {
            entries.push((AGGREGATED_FILE.to_string(), agg.as_bytes()));
        }
        for (sheet, doc) in &self.documents {
            entries.push((report_file_name(sheet), doc.as_bytes()));
        }
        entries
    }

    /// Write every artifact and the archive into `dir`, creating it if
    /// needed. Returns the written paths.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|e| GapsheetError::Io {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let mut written = Vec::new();
        let archive = (self.archive_name.clone(), self.archive.as_slice());
        for (name, bytes) in self.entries().into_iter().chain(std::iter::once(archive)) {
            let path = dir.join(&name);
            fs::write(&path, bytes).map_err(|e| GapsheetError::Io {
                path: path.clone(),
                source: e,
            })?;
            written.push(path);
        }

        Ok(written)
    }
}

/// Render the detailed summary CSV.
pub fn summary_csv(stats: &[ColumnStat]) -> Result<String> {
    let rows = stats.iter().map(|s| {
        vec![
            s.sheet.clone(),
            s.column.clone(),
            s.total_rows.to_string(),
            s.missing_count.to_string(),
            format!("{:.2}", s.missing_percentage),
            s.non_missing_count.to_string(),
        ]
    });
    to_csv_text(&SUMMARY_HEADER, rows)
}

/// Render the aggregated summary CSV.
pub fn aggregated_csv(aggregated: &[AggregatedStat]) -> Result<String> {
    let rows = aggregated.iter().map(|a| {
        vec![
            a.column.clone(),
            a.total_rows_sum.to_string(),
            a.missing_count_sum.to_string(),
            format!("{:.2}", a.missing_percentage_mean),
        ]
    });
    to_csv_text(&AGGREGATED_HEADER, rows)
}

fn to_csv_text(header: &[&str], rows: impl Iterator<Item = Vec<String>>) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(header)?;
    for row in rows {
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| GapsheetError::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| GapsheetError::Export(e.to_string()))
}

/// Zip the entries with deflate and a fixed timestamp.
fn write_archive(entries: &[(String, &[u8])]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default());

    for (name, bytes) in entries {
        zip.start_file(name.as_str(), options)?;
        zip.write_all(bytes)
            .map_err(|e| GapsheetError::Export(format!("writing '{}': {}", name, e)))?;
    }

    Ok(zip.finish()?.into_inner())
}
