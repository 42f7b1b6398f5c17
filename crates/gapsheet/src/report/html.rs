//! Built-in HTML completeness profile.

use std::collections::{BTreeSet, HashSet};
use std::fmt::Write;

use crate::input::DataTable;

use super::generator::{ReportConfig, ReportError, ReportGenerator};

const STYLE: &str = "body{font-family:sans-serif;margin:2em;color:#222}\
table{border-collapse:collapse;margin-bottom:1.5em}\
th,td{border:1px solid #ccc;padding:4px 10px;text-align:left}\
th{background:#f3f3f3}\
.bar{background:#e8e8e8;width:160px;height:10px}\
.bar>div{background:#d9534f;height:10px}";

/// Per-column profile used while rendering.
struct ColumnProfile<'a> {
    name: &'a str,
    present: usize,
    missing: usize,
    distinct: usize,
    kinds: BTreeSet<&'static str>,
    samples: Vec<String>,
}

impl<'a> ColumnProfile<'a> {
    fn build(table: &'a DataTable, index: usize, sample_limit: usize) -> Self {
        let mut seen: HashSet<String> = HashSet::new();
        let mut kinds = BTreeSet::new();
        let mut samples = Vec::new();
        let mut missing = 0;

        for cell in table.column_values(index) {
            match cell {
                None => missing += 1,
                Some(value) => {
                    kinds.insert(value.kind());
                    let text = value.to_string();
                    if seen.insert(text.clone()) && samples.len() < sample_limit {
                        samples.push(text);
                    }
                }
            }
        }

        Self {
            name: &table.headers[index],
            present: table.row_count() - missing,
            missing,
            distinct: seen.len(),
            kinds,
            samples,
        }
    }

    fn missing_percentage(&self) -> f64 {
        let total = self.present + self.missing;
        if total == 0 {
            0.0
        } else {
            self.missing as f64 / total as f64 * 100.0
        }
    }
}

/// Renders a self-contained HTML page describing a table's shape and
/// completeness.
#[derive(Debug, Clone, Default)]
pub struct HtmlProfileGenerator {
    config: ReportConfig,
}

impl HtmlProfileGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ReportConfig) -> Self {
        Self { config }
    }

    fn render(&self, table: &DataTable, title: &str) -> Result<String, ReportError> {
        let sample_limit = if self.config.minimal {
            0
        } else {
            self.config.sample_values
        };
        let profiles: Vec<ColumnProfile<'_>> = (0..table.column_count())
            .map(|i| ColumnProfile::build(table, i, sample_limit))
            .collect();

        let rows = table.row_count();
        let cells = rows * table.column_count();
        let missing_cells: usize = profiles.iter().map(|p| p.missing).sum();
        let complete_rows = table
            .rows
            .iter()
            .filter(|row| row.iter().all(Option::is_some))
            .count();
        let missing_cells_pct = if cells == 0 {
            0.0
        } else {
            missing_cells as f64 / cells as f64 * 100.0
        };

        let title = escape_html(title);
        let mut out = String::new();

        writeln!(out, "<!DOCTYPE html>")?;
        writeln!(out, "<html lang=\"en\">")?;
        writeln!(out, "<head>")?;
        writeln!(out, "<meta charset=\"utf-8\">")?;
        writeln!(out, "<title>{}</title>", title)?;
        writeln!(out, "<style>{}</style>", STYLE)?;
        writeln!(out, "</head>")?;
        writeln!(out, "<body>")?;
        writeln!(out, "<h1>{}</h1>", title)?;

        writeln!(out, "<h2>Overview</h2>")?;
        writeln!(out, "<table class=\"overview\">")?;
        writeln!(out, "<tr><th>Rows</th><td>{}</td></tr>", rows)?;
        writeln!(out, "<tr><th>Columns</th><td>{}</td></tr>", table.column_count())?;
        writeln!(out, "<tr><th>Missing cells</th><td>{}</td></tr>", missing_cells)?;
        writeln!(
            out,
            "<tr><th>Missing cells (%)</th><td>{:.2}%</td></tr>",
            missing_cells_pct
        )?;
        writeln!(out, "<tr><th>Complete rows</th><td>{}</td></tr>", complete_rows)?;
        writeln!(out, "</table>")?;

        writeln!(out, "<h2>Variables</h2>")?;
        writeln!(out, "<table class=\"variables\">")?;
        writeln!(
            out,
            "<tr><th>Column</th><th>Present</th><th>Missing</th><th>Missing (%)</th>\
             <th></th><th>Distinct</th><th>Types</th></tr>"
        )?;
        for profile in &profiles {
            let pct = profile.missing_percentage();
            let kinds: Vec<&str> = profile.kinds.iter().copied().collect();
            writeln!(
                out,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{:.2}%</td>\
                 <td><div class=\"bar\"><div style=\"width:{:.0}%\"></div></div></td>\
                 <td>{}</td><td>{}</td></tr>",
                escape_html(profile.name),
                profile.present,
                profile.missing,
                pct,
                pct,
                profile.distinct,
                kinds.join(", ")
            )?;
        }
        writeln!(out, "</table>")?;

        if !self.config.minimal {
            writeln!(out, "<h2>Sample values</h2>")?;
            for profile in &profiles {
                writeln!(out, "<h3>{}</h3>", escape_html(profile.name))?;
                if profile.samples.is_empty() {
                    writeln!(out, "<p><em>No values</em></p>")?;
                    continue;
                }
                writeln!(out, "<ul>")?;
                for sample in &profile.samples {
                    writeln!(out, "<li>{}</li>", escape_html(sample))?;
                }
                writeln!(out, "</ul>")?;
            }
        }

        writeln!(out, "</body>")?;
        writeln!(out, "</html>")?;

        Ok(out)
    }
}

impl ReportGenerator for HtmlProfileGenerator {
    fn name(&self) -> &str {
        "html_profile"
    }

    fn generate(&self, table: &DataTable, title: &str) -> Result<String, ReportError> {
        if table.column_count() == 0 {
            return Err(ReportError::Generation("table has no columns".to_string()));
        }
        self.render(table, title)
    }
}

/// Escape text for inclusion in HTML content or attribute values.
pub(crate) fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
