//! Analyze command - count missing values and write the report bundle.

use std::path::PathBuf;

use colored::Colorize;
use gapsheet::{
    AnalysisOutcome, AnalysisResult, Gapsheet, GapsheetConfig, MissingPolicy, SheetColumnMapping,
    Warning, Workbook,
};
use tracing::debug;

use super::Exit;

pub struct AnalyzeArgs {
    pub file: PathBuf,
    pub config: Option<PathBuf>,
    pub mapping: Option<String>,
    pub columns: Vec<String>,
    pub output: PathBuf,
    pub no_reports: bool,
    pub full: bool,
    pub na_tokens: Vec<String>,
    pub json: bool,
    pub verbose: bool,
}

pub fn run(args: AnalyzeArgs) -> Result<Exit, Box<dyn std::error::Error>> {
    if !args.file.exists() {
        return Err(format!("File not found: {}", args.file.display()).into());
    }

    let mut config = GapsheetConfig::default();
    config.generate_reports = !args.no_reports;
    config.report.minimal = !args.full;
    if !args.na_tokens.is_empty() {
        config.reader.missing = MissingPolicy::with_na_tokens(args.na_tokens.iter());
    }

    let mut workbook = Workbook::open_with_config(&args.file, config.reader.clone())?;

    let mapping = if let Some(ref path) = args.config {
        SheetColumnMapping::from_json_file(path)?
    } else if let Some(ref json) = args.mapping {
        SheetColumnMapping::from_json_str(json)?
    } else {
        SheetColumnMapping::uniform(workbook.sheet_names(), args.columns.iter())
    };

    if !args.json {
        println!(
            "{} {} ({} sheets, {} columns requested)",
            "Analyzing".cyan().bold(),
            args.file.display().to_string().white(),
            mapping.len(),
            mapping.pair_count()
        );
    }

    let outcome = Gapsheet::with_config(config).analyze(&mut workbook, &mapping)?;

    let written = match outcome.result() {
        Some(result) => result.bundle.write_to_dir(&args.output)?,
        None => Vec::new(),
    };
    debug!(dir = %args.output.display(), files = written.len(), "wrote report bundle");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_warnings(outcome.warnings());
        if let AnalysisOutcome::Completed(ref result) = outcome {
            print_result(result, args.verbose);
            println!();
            for path in &written {
                println!(
                    "{} {}",
                    "Wrote".green().bold(),
                    path.display().to_string().white()
                );
            }
        }
    }

    if outcome.is_empty() {
        eprintln!(
            "{}",
            "No columns could be analyzed. Check sheet and column names.".red()
        );
        return Ok(Exit::NothingAnalyzed);
    }

    Ok(Exit::Success)
}

fn print_warnings(warnings: &[Warning]) {
    if warnings.is_empty() {
        return;
    }

    eprintln!();
    eprintln!(
        "{} ({})",
        "Warnings".yellow().bold(),
        warnings.len().to_string().yellow()
    );
    for warning in warnings {
        eprintln!("  [{}] {}", warning.kind.label().yellow(), warning.message);
    }
}

fn print_result(result: &AnalysisResult, verbose: bool) {
    let summary = &result.summary;

    println!();
    println!("{}", "Summary:".yellow().bold());
    println!("  Sheets processed:   {}", summary.sheets_processed);
    println!("  Columns analyzed:   {}", summary.columns_analyzed);
    println!(
        "  Missing values:     {}",
        summary.total_missing.to_string().white().bold()
    );
    println!(
        "  Mean missing:       {:.2}%",
        summary.mean_missing_percentage
    );

    if verbose {
        for (sheet, missing) in &summary.missing_by_sheet {
            println!("    {:20} {}", sheet, missing);
        }
    }

    println!();
    println!("{}", "Missing values by column:".yellow().bold());
    println!(
        "  {:20} {:20} {:>8} {:>8} {:>10}",
        "Sheet", "Column", "Rows", "Missing", "Missing %"
    );
    for stat in &result.stats {
        let pct = format!("{:.2}%", stat.missing_percentage);
        let pct = if stat.missing_count == 0 {
            pct.green()
        } else if stat.missing_percentage >= 50.0 {
            pct.red()
        } else {
            pct.yellow()
        };
        println!(
            "  {:20} {:20} {:>8} {:>8} {:>10}",
            stat.sheet, stat.column, stat.total_rows, stat.missing_count, pct
        );
    }

    if !result.aggregated.is_empty() {
        println!();
        println!("{}", "Across sheets:".yellow().bold());
        println!(
            "  {:20} {:>10} {:>10} {:>10}",
            "Column", "Rows", "Missing", "Mean %"
        );
        for agg in &result.aggregated {
            println!(
                "  {:20} {:>10} {:>10} {:>9.2}%",
                agg.column, agg.total_rows_sum, agg.missing_count_sum, agg.missing_percentage_mean
            );
        }
    }
}
