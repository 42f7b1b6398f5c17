//! Main Gapsheet struct and public API.

use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::analysis::{aggregate, compute_column_stats, AggregatedStat, AnalysisSummary, ColumnStat};
use crate::error::{GapsheetError, Result};
use crate::input::{ReaderConfig, SourceMetadata, Workbook};
use crate::mapping::{validate_mapping, SheetColumnMapping, Warning};
use crate::report::{
    report_title, HtmlProfileGenerator, ReportBundle, ReportConfig, ReportGenerator,
};

/// Configuration for a missing-value analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GapsheetConfig {
    /// How sheets are read and which values count as missing.
    #[serde(default)]
    pub reader: ReaderConfig,
    /// Options for the built-in report generator.
    #[serde(default)]
    pub report: ReportConfig,
    /// Whether to produce a descriptive document per sheet.
    #[serde(default = "default_true")]
    pub generate_reports: bool,
}

impl GapsheetConfig {
    /// Decode a configuration from JSON; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| GapsheetError::Config(e.to_string()))
    }
}

fn default_true() -> bool {
    true
}

impl Default for GapsheetConfig {
    fn default() -> Self {
        Self {
            reader: ReaderConfig::default(),
            report: ReportConfig::default(),
            generate_reports: true,
        }
    }
}

/// Result of an analysis that produced at least one stat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Metadata about the source workbook.
    pub source: SourceMetadata,
    /// One stat per resolved `(sheet, column)` pair, in mapping order.
    pub stats: Vec<ColumnStat>,
    /// Cross-sheet aggregation; empty when there is only one stat.
    pub aggregated: Vec<AggregatedStat>,
    /// Headline metrics.
    pub summary: AnalysisSummary,
    /// CSV texts, documents and the zip archive.
    pub bundle: ReportBundle,
    /// Everything that was skipped or failed along the way.
    pub warnings: Vec<Warning>,
}

/// Outcome of an analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    /// At least one stat was produced.
    Completed(Box<AnalysisResult>),
    /// Nothing could be analyzed; the warnings explain why.
    Empty { warnings: Vec<Warning> },
}

impl AnalysisOutcome {
    /// Warnings recorded during the run.
    pub fn warnings(&self) -> &[Warning] {
        match self {
            AnalysisOutcome::Completed(result) => &result.warnings,
            AnalysisOutcome::Empty { warnings } => warnings,
        }
    }

    /// The result, if any stats were produced.
    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            AnalysisOutcome::Completed(result) => Some(result.as_ref()),
            AnalysisOutcome::Empty { .. } => None,
        }
    }

    /// Consume the outcome, returning the result if any stats were produced.
    pub fn into_result(self) -> Option<AnalysisResult> {
        match self {
            AnalysisOutcome::Completed(result) => Some(*result),
            AnalysisOutcome::Empty { .. } => None,
        }
    }

    /// Whether nothing could be analyzed.
    pub fn is_empty(&self) -> bool {
        matches!(self, AnalysisOutcome::Empty { .. })
    }
}

/// The missing-value analysis engine.
pub struct Gapsheet {
    config: GapsheetConfig,
    generator: Arc<dyn ReportGenerator>,
}

impl Gapsheet {
    /// Create a new engine with default configuration.
    pub fn new() -> Self {
        Self::with_config(GapsheetConfig::default())
    }

    /// Create an engine with custom configuration and the built-in HTML
    /// report generator.
    pub fn with_config(config: GapsheetConfig) -> Self {
        let generator = Arc::new(HtmlProfileGenerator::with_config(config.report.clone()));
        Self { config, generator }
    }

    /// Use a different report generator.
    pub fn with_generator(mut self, generator: impl ReportGenerator + 'static) -> Self {
        self.generator = Arc::new(generator);
        self
    }

    /// Configuration in effect.
    pub fn config(&self) -> &GapsheetConfig {
        &self.config
    }

    /// Open the workbook at `path` and analyze it.
    ///
    /// Fails only when the workbook cannot be read at all.
    pub fn analyze_path(
        &self,
        path: impl AsRef<Path>,
        mapping: &SheetColumnMapping,
    ) -> Result<AnalysisOutcome> {
        let mut workbook = Workbook::open_with_config(path, self.config.reader.clone())?;
        self.analyze(&mut workbook, mapping)
    }

    /// Analyze an opened workbook.
    ///
    /// Unknown sheets and columns, empty selections and report failures are
    /// recorded as warnings; the run continues with whatever remains.
    pub fn analyze(
        &self,
        workbook: &mut Workbook,
        mapping: &SheetColumnMapping,
    ) -> Result<AnalysisOutcome> {
        info!(
            file = %workbook.metadata().file,
            sheets = mapping.len(),
            columns = mapping.pair_count(),
            "starting missing-value analysis"
        );

        let (selections, mut warnings) = validate_mapping(workbook, mapping).into_parts();

        let mut stats = Vec::new();
        let mut documents = IndexMap::new();

        for selection in &selections {
            let sheet_stats = compute_column_stats(selection);
            debug!(
                sheet = %selection.sheet,
                rows = selection.total_rows(),
                columns = sheet_stats.len(),
                "computed column stats"
            );
            stats.extend(sheet_stats);

            if !self.config.generate_reports {
                continue;
            }

            let title = report_title(&selection.sheet);
            match self.generator.generate(&selection.table, &title) {
                Ok(document) => {
                    documents.insert(selection.sheet.clone(), document);
                }
                Err(e) => {
                    warn!(
                        sheet = %selection.sheet,
                        generator = self.generator.name(),
                        error = %e,
                        "report generation failed"
                    );
                    warnings.push(Warning::document_failed(&selection.sheet, e));
                }
            }
        }

        if stats.is_empty() {
            info!(warnings = warnings.len(), "no columns could be analyzed");
            return Ok(AnalysisOutcome::Empty { warnings });
        }

        let aggregated = aggregate(&stats);
        let summary = AnalysisSummary::from_stats(&stats);
        let source = workbook.metadata().clone();
        let bundle = ReportBundle::build(&stats, &aggregated, documents, source.base_name())?;

        info!(
            stats = stats.len(),
            aggregated = aggregated.len(),
            documents = bundle.documents.len(),
            warnings = warnings.len(),
            "analysis complete"
        );

        Ok(AnalysisOutcome::Completed(Box::new(AnalysisResult {
            source,
            stats,
            aggregated,
            summary,
            bundle,
            warnings,
        })))
    }
}

impl Default for Gapsheet {
    fn default() -> Self {
        Self::new()
    }
}
