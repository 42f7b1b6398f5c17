//! Sheets command - list the sheets of a workbook and their columns.

use std::path::PathBuf;

use colored::Colorize;
use gapsheet::Workbook;
use serde::Serialize;

#[derive(Serialize)]
struct SheetInfo {
    name: String,
    rows: Option<usize>,
    columns: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub fn run(file: PathBuf, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let mut workbook = Workbook::open(&file)?;
    let names = workbook.sheet_names().to_vec();

    let sheets: Vec<SheetInfo> = names
        .into_iter()
        .map(|name| match workbook.load_sheet(&name) {
            Ok(table) => SheetInfo {
                rows: Some(table.row_count()),
                columns: table.headers.clone(),
                error: None,
                name,
            },
            Err(e) => SheetInfo {
                rows: None,
                columns: Vec::new(),
                error: Some(e.to_string()),
                name,
            },
        })
        .collect();

    if json_output {
        let out = serde_json::json!({
            "file": workbook.metadata().file,
            "format": workbook.metadata().format,
            "sheets": sheets,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!(
        "{} {} ({} sheets)",
        "Workbook".cyan().bold(),
        file.display().to_string().white(),
        sheets.len()
    );
    println!();

    for sheet in &sheets {
        match (&sheet.error, sheet.rows) {
            (Some(err), _) => {
                println!("  {} {}", sheet.name.white().bold(), err.red());
            }
            (None, rows) => {
                println!(
                    "  {} {} rows",
                    sheet.name.white().bold(),
                    rows.unwrap_or_default()
                );
                if !sheet.columns.is_empty() {
                    println!("    {}", sheet.columns.join(", ").dimmed());
                }
            }
        }
    }

    Ok(())
}
