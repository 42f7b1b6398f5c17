//! Example: Analyze missing values in a workbook.
//!
//! Usage:
//!   cargo run --example analyze -- <workbook> <mapping.json>
//!
//! The mapping file is a JSON object of sheet name to column names:
//!   {"Sheet1": ["Asset", "Super Reason"]}

use std::env;

use gapsheet::{AnalysisOutcome, Gapsheet, SheetColumnMapping};

fn main() -> gapsheet::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: cargo run --example analyze -- <workbook> <mapping.json>");
        std::process::exit(1);
    }

    let mapping = SheetColumnMapping::from_json_file(&args[2])?;
    let outcome = Gapsheet::new().analyze_path(&args[1], &mapping)?;

    for warning in outcome.warnings() {
        eprintln!("warning: {}", warning);
    }

    let result = match outcome {
        AnalysisOutcome::Completed(result) => result,
        AnalysisOutcome::Empty { .. } => {
            eprintln!("No columns could be analyzed.");
            std::process::exit(2);
        }
    };

    let separator = "=".repeat(80);
    println!("{}", separator);
    println!("Missing Values: {}", result.source.file);
    println!("{}", separator);
    println!();

    println!(
        "  {:20} {:20} {:>8} {:>8} {:>9}",
        "Sheet", "Column", "Rows", "Missing", "Missing %"
    );
    for stat in &result.stats {
        println!(
            "  {:20} {:20} {:>8} {:>8} {:>8.2}%",
            stat.sheet, stat.column, stat.total_rows, stat.missing_count, stat.missing_percentage
        );
    }

    if !result.aggregated.is_empty() {
        println!();
        println!("## Across sheets");
        for agg in &result.aggregated {
            println!(
                "  {:20} rows={:<8} missing={:<8} mean={:.2}%",
                agg.column, agg.total_rows_sum, agg.missing_count_sum, agg.missing_percentage_mean
            );
        }
    }

    println!();
    println!(
        "Archive: {} ({} bytes)",
        result.bundle.archive_name,
        result.bundle.archive.len()
    );

    Ok(())
}
