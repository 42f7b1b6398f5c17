//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Gapsheet: missing-value analysis for spreadsheet workbooks
#[derive(Parser)]
#[command(name = "gapsheet")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output and debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the sheets of a workbook and their columns
    Sheets {
        /// Path to the workbook (xlsx, xlsm, xlsb, xls, ods)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Count missing values in the selected columns of each sheet
    Analyze {
        /// Path to the workbook (xlsx, xlsm, xlsb, xls, ods)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// JSON file mapping sheet names to column lists
        #[arg(
            short,
            long,
            value_name = "JSON_FILE",
            required_unless_present_any = ["mapping", "columns"],
            conflicts_with_all = ["mapping", "columns"]
        )]
        config: Option<PathBuf>,

        /// Inline JSON mapping, e.g. '{"Sheet1": ["Asset"]}'
        #[arg(short, long, value_name = "JSON", conflicts_with = "columns")]
        mapping: Option<String>,

        /// Analyze these columns on every sheet (comma-separated)
        #[arg(long, value_name = "A,B,...", value_delimiter = ',')]
        columns: Vec<String>,

        /// Directory for the CSV summaries, reports and archive
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        output: PathBuf,

        /// Skip per-sheet HTML reports
        #[arg(long)]
        no_reports: bool,

        /// Include sample values in the HTML reports
        #[arg(long)]
        full: bool,

        /// Treat this text as missing (repeatable)
        #[arg(long = "na-token", value_name = "TOKEN")]
        na_tokens: Vec<String>,

        /// Output the analysis as JSON instead of tables
        #[arg(long)]
        json: bool,
    },
}
