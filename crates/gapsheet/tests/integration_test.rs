//! Integration tests for gapsheet.

use std::io::{Cursor, Read, Write};

use gapsheet::{
    AnalysisOutcome, AnalysisResult, ColumnStat, Gapsheet, GapsheetConfig, GapsheetError,
    MissingPolicy, MockGenerator, SheetColumnMapping, Workbook, WarningKind,
};
use rust_xlsxwriter::Workbook as XlsxBook;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

/// One worksheet of a fixture workbook. `None` cells are left blank.
struct SheetSpec<'a> {
    name: &'a str,
    headers: &'a [&'a str],
    rows: Vec<Vec<Option<String>>>,
}

/// Build an .xlsx workbook in memory.
fn build_xlsx(sheets: &[SheetSpec<'_>]) -> Vec<u8> {
    let mut book = XlsxBook::new();
    for spec in sheets {
        let sheet = book.add_worksheet();
        sheet.set_name(spec.name).expect("Failed to name sheet");
        for (col, header) in spec.headers.iter().enumerate() {
            sheet
                .write_string(0, col as u16, *header)
                .expect("Failed to write header");
        }
        for (row, cells) in spec.rows.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                if let Some(value) = cell {
                    sheet
                        .write_string(row as u32 + 1, col as u16, value.as_str())
                        .expect("Failed to write cell");
                }
            }
        }
    }
    book.save_to_buffer().expect("Failed to save workbook")
}

/// `total` rows of columns A and B; A is blank on the rows in `a_missing`.
/// B is always present so no row is entirely blank.
fn ab_rows(total: usize, a_missing: &[usize]) -> Vec<Vec<Option<String>>> {
    (0..total)
        .map(|i| {
            let a = if a_missing.contains(&i) {
                None
            } else {
                Some(format!("a{}", i))
            };
            vec![a, Some(format!("b{}", i))]
        })
        .collect()
}

fn open(bytes: Vec<u8>) -> Workbook {
    Workbook::from_bytes(bytes, "book.xlsx").expect("Failed to open workbook")
}

fn two_sheet_workbook() -> Workbook {
    open(build_xlsx(&[
        SheetSpec {
            name: "S1",
            headers: &["A", "B"],
            rows: ab_rows(10, &[1, 4, 7]),
        },
        SheetSpec {
            name: "S2",
            headers: &["A", "B"],
            rows: ab_rows(20, &[0, 2, 4, 6, 8, 10, 12, 14, 16, 18]),
        },
    ]))
}

fn completed(outcome: AnalysisOutcome) -> AnalysisResult {
    outcome.into_result().expect("Expected a completed analysis")
}

fn mock_engine() -> Gapsheet {
    Gapsheet::new().with_generator(MockGenerator::new())
}

fn archive_names(archive: &[u8]) -> Vec<String> {
    let mut zip = ZipArchive::new(Cursor::new(archive)).expect("Failed to read archive");
    (0..zip.len())
        .map(|i| zip.by_index(i).expect("Missing entry").name().to_string())
        .collect()
}

// =============================================================================
// Workbook Accessor
// =============================================================================

#[test]
fn test_sheet_names_in_workbook_order() {
    let workbook = two_sheet_workbook();
    assert_eq!(workbook.sheet_names(), ["S1", "S2"]);
    assert!(workbook.has_sheet("S2"));
    assert!(!workbook.has_sheet("s2"));
    assert_eq!(workbook.metadata().sheet_count, 2);
    assert_eq!(workbook.metadata().format, "xlsx");
    assert!(workbook.metadata().hash.starts_with("sha256:"));
}

#[test]
fn test_load_sheet() {
    let mut workbook = two_sheet_workbook();
    let table = workbook.load_sheet("S1").expect("Failed to load sheet");

    assert_eq!(table.headers, vec!["A", "B"]);
    assert_eq!(table.row_count(), 10);
    assert_eq!(table.missing_count(0), 3);
    assert_eq!(table.missing_count(1), 0);
}

#[test]
fn test_load_unknown_sheet_fails() {
    let mut workbook = two_sheet_workbook();
    assert!(matches!(
        workbook.load_sheet("Nope"),
        Err(GapsheetError::SheetNotFound(_))
    ));
}

#[test]
fn test_duplicate_headers_are_made_unique() {
    let mut workbook = open(build_xlsx(&[SheetSpec {
        name: "Dup",
        headers: &["id", "id", "name"],
        rows: vec![vec![Some("1".into()), None, Some("x".into())]],
    }]));
    let table = workbook.load_sheet("Dup").unwrap();
    assert_eq!(table.headers, vec!["id", "id.1", "name"]);
}

#[test]
fn test_unreadable_workbook_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.xlsx");
    std::fs::write(&path, b"this is not a spreadsheet").unwrap();

    let mapping = SheetColumnMapping::uniform(["S1"], ["A"]);
    let result = Gapsheet::new().analyze_path(&path, &mapping);

    assert!(matches!(
        result,
        Err(GapsheetError::UnreadableWorkbook { .. })
    ));
}

// =============================================================================
// Analysis runs
// =============================================================================

#[test]
fn test_single_column_stat() {
    let mut workbook = two_sheet_workbook();
    let mapping = SheetColumnMapping::uniform(["S1"], ["A"]);

    let result = completed(mock_engine().analyze(&mut workbook, &mapping).unwrap());

    assert_eq!(
        result.stats,
        vec![ColumnStat {
            sheet: "S1".into(),
            column: "A".into(),
            total_rows: 10,
            missing_count: 3,
            missing_percentage: 30.0,
            non_missing_count: 7,
        }]
    );
    assert!(result.aggregated.is_empty());
    assert!(result.bundle.aggregated_csv.is_none());
    assert!(result.warnings.is_empty());
}

#[test]
fn test_unknown_sheet_is_skipped_with_warning() {
    let mut workbook = two_sheet_workbook();
    let mapping = SheetColumnMapping::from_json_str(r#"{"Missing": ["A"], "S1": ["A"]}"#).unwrap();

    let result = completed(mock_engine().analyze(&mut workbook, &mapping).unwrap());

    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].kind, WarningKind::SheetNotFound);
    assert_eq!(result.warnings[0].sheet, "Missing");
    assert!(result.stats.iter().all(|s| s.sheet != "Missing"));
    assert_eq!(result.stats.len(), 1);
}

#[test]
fn test_unknown_column_is_skipped_with_warning() {
    let mut workbook = two_sheet_workbook();
    let mapping = SheetColumnMapping::from_json_str(r#"{"S1": ["Z", "A", "Z"]}"#).unwrap();

    let result = completed(mock_engine().analyze(&mut workbook, &mapping).unwrap());

    let column_warnings: Vec<_> = result
        .warnings
        .iter()
        .filter(|w| w.kind == WarningKind::ColumnsNotFound)
        .collect();
    assert_eq!(column_warnings.len(), 1);
    assert_eq!(column_warnings[0].columns, vec!["Z"]);

    let columns: Vec<&str> = result.stats.iter().map(|s| s.column.as_str()).collect();
    assert_eq!(columns, vec!["A"]);
}

#[test]
fn test_cross_sheet_aggregation() {
    let mut workbook = two_sheet_workbook();
    let mapping = SheetColumnMapping::uniform(["S1", "S2"], ["A"]);

    let result = completed(mock_engine().analyze(&mut workbook, &mapping).unwrap());

    assert_eq!(result.stats[0].missing_percentage, 30.0);
    assert_eq!(result.stats[1].missing_percentage, 50.0);

    assert_eq!(result.aggregated.len(), 1);
    let agg = &result.aggregated[0];
    assert_eq!(agg.column, "A");
    assert_eq!(agg.total_rows_sum, 30);
    assert_eq!(agg.missing_count_sum, 3 + 10);
    assert_eq!(agg.missing_percentage_mean, 40.0);

    assert_eq!(
        result.bundle.aggregated_csv.as_deref(),
        Some("Column,Total_Rows,Missing_Count,Missing_Percentage\nA,30,13,40.00\n")
    );
}

#[test]
fn test_zero_row_sheet_is_skipped() {
    let mut workbook = open(build_xlsx(&[
        SheetSpec {
            name: "Empty",
            headers: &["A", "B"],
            rows: Vec::new(),
        },
        SheetSpec {
            name: "S1",
            headers: &["A", "B"],
            rows: ab_rows(4, &[0]),
        },
    ]));
    let mapping = SheetColumnMapping::uniform(["Empty", "S1"], ["A", "B"]);

    let result = completed(mock_engine().analyze(&mut workbook, &mapping).unwrap());

    assert!(result.stats.iter().all(|s| s.sheet == "S1"));
    assert!(!result.bundle.documents.contains_key("Empty"));
    assert!(
        !archive_names(&result.bundle.archive)
            .iter()
            .any(|n| n.starts_with("Empty"))
    );
    assert!(
        result
            .warnings
            .iter()
            .any(|w| w.kind == WarningKind::EmptySelection && w.sheet == "Empty")
    );
}

// =============================================================================
// Outcomes and failures
// =============================================================================

#[test]
fn test_nothing_to_analyze_is_empty_outcome() {
    let mut workbook = two_sheet_workbook();
    let mapping = SheetColumnMapping::from_json_str(r#"{"Missing": ["A"], "S1": ["Z"]}"#).unwrap();

    let outcome = mock_engine().analyze(&mut workbook, &mapping).unwrap();

    assert!(outcome.is_empty());
    let kinds: Vec<WarningKind> = outcome.warnings().iter().map(|w| w.kind).collect();
    assert_eq!(
        kinds,
        vec![WarningKind::SheetNotFound, WarningKind::ColumnsNotFound]
    );
}

#[test]
fn test_document_failure_keeps_stats() {
    let mut workbook = two_sheet_workbook();
    let mapping = SheetColumnMapping::uniform(["S1", "S2"], ["A", "B"]);
    let engine = Gapsheet::new().with_generator(MockGenerator::new().failing_on("S2"));

    let result = completed(engine.analyze(&mut workbook, &mapping).unwrap());

    assert_eq!(result.stats.len(), 4);
    assert!(result.stats.iter().any(|s| s.sheet == "S2"));
    assert_eq!(result.bundle.documents.len(), 1);
    assert!(result.bundle.documents.contains_key("S1"));

    let failures: Vec<_> = result
        .warnings
        .iter()
        .filter(|w| w.kind == WarningKind::DocumentGenerationFailed)
        .collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].sheet, "S2");

    assert_eq!(
        archive_names(&result.bundle.archive),
        vec![
            "missing_values_summary.csv",
            "aggregated_missing_summary.csv",
            "S1_missing_values_report.html",
        ]
    );
}

#[test]
fn test_reports_can_be_disabled() {
    let mut workbook = two_sheet_workbook();
    let mapping = SheetColumnMapping::uniform(["S1"], ["A", "B"]);
    let engine = Gapsheet::with_config(GapsheetConfig {
        generate_reports: false,
        ..GapsheetConfig::default()
    });

    let result = completed(engine.analyze(&mut workbook, &mapping).unwrap());

    assert!(result.bundle.documents.is_empty());
    assert_eq!(result.stats.len(), 2);
}

// =============================================================================
// Bundle
// =============================================================================

#[test]
fn test_archive_contents_match_bundle() {
    let mut workbook = two_sheet_workbook();
    let mapping = SheetColumnMapping::uniform(["S2", "S1"], ["B", "A"]);

    let result = completed(Gapsheet::new().analyze(&mut workbook, &mapping).unwrap());
    let bundle = &result.bundle;

    assert_eq!(
        archive_names(&bundle.archive),
        vec![
            "missing_values_summary.csv",
            "aggregated_missing_summary.csv",
            "S2_missing_values_report.html",
            "S1_missing_values_report.html",
        ]
    );

    let mut zip = ZipArchive::new(Cursor::new(bundle.archive.as_slice())).unwrap();
    let mut html = String::new();
    zip.by_name("S1_missing_values_report.html")
        .unwrap()
        .read_to_string(&mut html)
        .unwrap();
    assert_eq!(html, bundle.documents["S1"]);
    assert!(html.contains("Missing Values Analysis - S1"));

    let lines: Vec<&str> = bundle.summary_csv.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Sheet,Column,Total_Rows,Missing_Count,Missing_Percentage,Non_Missing_Count",
            "S2,B,20,0,0.00,20",
            "S2,A,20,10,50.00,10",
            "S1,B,10,0,0.00,10",
            "S1,A,10,3,30.00,7",
        ]
    );
}

#[test]
fn test_analysis_is_idempotent() {
    let bytes = build_xlsx(&[SheetSpec {
        name: "S1",
        headers: &["A", "B"],
        rows: ab_rows(7, &[2, 3]),
    }]);
    let mapping = SheetColumnMapping::uniform(["S1"], ["A", "B"]);
    let engine = Gapsheet::new();

    let first = completed(engine.analyze(&mut open(bytes.clone()), &mapping).unwrap());
    let second = completed(engine.analyze(&mut open(bytes), &mapping).unwrap());

    assert_eq!(first.stats, second.stats);
    assert_eq!(first.bundle.summary_csv, second.bundle.summary_csv);
    assert_eq!(first.bundle.aggregated_csv, second.bundle.aggregated_csv);
    assert_eq!(first.bundle.archive, second.bundle.archive);
}

#[test]
fn test_archive_name_from_file_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quarterly.report.xlsx");
    std::fs::write(
        &path,
        build_xlsx(&[SheetSpec {
            name: "S1",
            headers: &["A"],
            rows: vec![vec![Some("x".into())]],
        }]),
    )
    .unwrap();

    let mapping = SheetColumnMapping::uniform(["S1"], ["A"]);
    let result = completed(mock_engine().analyze_path(&path, &mapping).unwrap());

    assert_eq!(result.source.file, "quarterly.report.xlsx");
    assert_eq!(result.bundle.archive_name, "missing_values_analysis_quarterly.zip");
}

#[test]
fn test_na_tokens_count_as_missing() {
    let bytes = build_xlsx(&[SheetSpec {
        name: "S1",
        headers: &["A", "B"],
        rows: vec![
            vec![Some("NA".into()), Some("1".into())],
            vec![Some("ok".into()), Some("2".into())],
        ],
    }]);
    let mut config = GapsheetConfig::default();
    config.reader.missing = MissingPolicy::with_na_tokens(["NA"]);

    let mut strict = open(bytes.clone());
    let mut lenient =
        Workbook::from_bytes_with_config(bytes, "book.xlsx", config.reader.clone()).unwrap();
    let mapping = SheetColumnMapping::uniform(["S1"], ["A"]);

    let strict_result = completed(mock_engine().analyze(&mut strict, &mapping).unwrap());
    let lenient_result = completed(
        Gapsheet::with_config(config)
            .with_generator(MockGenerator::new())
            .analyze(&mut lenient, &mapping)
            .unwrap(),
    );

    assert_eq!(strict_result.stats[0].missing_count, 0);
    assert_eq!(lenient_result.stats[0].missing_count, 1);
    assert_eq!(lenient_result.stats[0].missing_percentage, 50.0);
}

#[test]
fn test_summary_metrics() {
    let mut workbook = two_sheet_workbook();
    let mapping = SheetColumnMapping::uniform(["S1", "S2"], ["A", "B"]);

    let result = completed(mock_engine().analyze(&mut workbook, &mapping).unwrap());

    assert_eq!(result.summary.sheets_processed, 2);
    assert_eq!(result.summary.columns_analyzed, 2);
    assert_eq!(result.summary.total_missing, 13);
    assert_eq!(result.summary.mean_missing_percentage, 20.0);
    assert_eq!(result.summary.missing_by_sheet["S1"], 3);
    assert_eq!(result.summary.missing_by_sheet["S2"], 10);
}

// =============================================================================
// Sheet layout
// =============================================================================

/// Replace one part of an xlsx package with `contents`.
fn replace_part(xlsx: &[u8], part: &str, contents: &[u8]) -> Vec<u8> {
    let mut source = ZipArchive::new(Cursor::new(xlsx)).expect("Failed to read xlsx");
    let mut out = ZipWriter::new(Cursor::new(Vec::new()));

    for i in 0..source.len() {
        let mut entry = source.by_index(i).expect("Missing entry");
        let name = entry.name().to_string();
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes).expect("Failed to read entry");

        out.start_file(name.as_str(), SimpleFileOptions::default())
            .expect("Failed to start entry");
        if name == part {
            out.write_all(contents).expect("Failed to write entry");
        } else {
            out.write_all(&bytes).expect("Failed to write entry");
        }
    }

    out.finish().expect("Failed to finish xlsx").into_inner()
}

#[test]
fn test_padded_header_resolves_verbatim() {
    let mut workbook = open(build_xlsx(&[SheetSpec {
        name: "S1",
        headers: &["Super Reason ", "B", "B "],
        rows: vec![
            vec![Some("late".into()), Some("1".into()), Some("x".into())],
            vec![None, Some("2".into()), None],
        ],
    }]));
    let mapping =
        SheetColumnMapping::from_json_str(r#"{"S1": ["Super Reason ", "B "]}"#).unwrap();

    let result = completed(mock_engine().analyze(&mut workbook, &mapping).unwrap());

    assert!(result.warnings.is_empty());
    let columns: Vec<&str> = result.stats.iter().map(|s| s.column.as_str()).collect();
    assert_eq!(columns, vec!["Super Reason ", "B "]);
    assert_eq!(result.stats[0].missing_count, 1);
    assert!(result.bundle.summary_csv.contains("Super Reason "));
}

#[test]
fn test_leading_blank_columns_are_numbered_by_position() {
    let mut book = XlsxBook::new();
    let sheet = book.add_worksheet();
    sheet.set_name("S1").unwrap();
    sheet.write_string(0, 1, "A").unwrap();
    sheet.write_string(0, 3, "C").unwrap();
    sheet.write_string(1, 1, "a").unwrap();
    sheet.write_string(2, 3, "c").unwrap();
    let mut workbook = open(book.save_to_buffer().unwrap());

    let table = workbook.load_sheet("S1").unwrap();
    assert_eq!(table.headers, vec!["Unnamed: 0", "A", "Unnamed: 2", "C"]);

    let mapping = SheetColumnMapping::uniform(["S1"], ["Unnamed: 0", "C"]);
    let result = completed(mock_engine().analyze(&mut workbook, &mapping).unwrap());

    assert_eq!(result.stats[0].column, "Unnamed: 0");
    assert_eq!(result.stats[0].missing_count, 2);
    assert_eq!(result.stats[1].missing_count, 1);
}

#[test]
fn test_corrupt_sheet_is_skipped_with_warning() {
    let xlsx = build_xlsx(&[
        SheetSpec {
            name: "Good",
            headers: &["A", "B"],
            rows: ab_rows(4, &[0]),
        },
        SheetSpec {
            name: "Bad",
            headers: &["A", "B"],
            rows: ab_rows(4, &[]),
        },
    ]);
    // A shared-string cell whose index is not a number.
    let sheet_xml = concat!(
        r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        r#"<sheetData><row r="1"><c r="A1" t="s"><v>oops</v></c></row></sheetData>"#,
        "</worksheet>",
    );
    let broken = replace_part(&xlsx, "xl/worksheets/sheet2.xml", sheet_xml.as_bytes());
    let mut workbook = open(broken);
    assert!(workbook.has_sheet("Bad"));

    let mapping = SheetColumnMapping::uniform(["Good", "Bad"], ["A"]);
    let result = completed(mock_engine().analyze(&mut workbook, &mapping).unwrap());

    assert_eq!(result.stats.len(), 1);
    assert_eq!(result.stats[0].sheet, "Good");
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].kind, WarningKind::SheetUnreadable);
    assert_eq!(result.warnings[0].sheet, "Bad");
}
