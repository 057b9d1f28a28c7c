//! Parsing of the fixture files under `tests/fixtures`.

use pretty_assertions::assert_eq;
use sheet_insights::{analyze, parse_spreadsheet, AppError, Cell};
use std::path::PathBuf;

fn fixture(name: &str) -> Vec<u8> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name);
    std::fs::read(&path).expect("Failed to read fixture")
}

#[test]
fn reads_first_sheet_of_workbook() {
    let grid = parse_spreadsheet(&fixture("sales.xlsx"), "sales.xlsx").unwrap();

    assert_eq!(grid.headers, vec!["Region", "Units", "Revenue"]);
    assert_eq!(grid.records.len(), 3);
    assert_eq!(grid.cell(0, 0), &Cell::Text("North".into()));
    assert_eq!(grid.cell(2, 2), &Cell::Number(3000.0));
}

#[test]
fn workbook_analysis_totals() {
    let grid = parse_spreadsheet(&fixture("sales.xlsx"), "sales.xlsx").unwrap();
    let analysis = analyze(&grid);

    let names: Vec<_> = analysis.profiles.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Units", "Revenue"]);
    assert_eq!(analysis.profiles[0].sum, 60.0);
    assert_eq!(analysis.profiles[1].sum, 7000.5);
    assert_eq!(analysis.charts.row_series[1].label, "South");
}

#[test]
fn workbook_is_sniffed_without_extension() {
    let grid = parse_spreadsheet(&fixture("sales.xlsx"), "upload").unwrap();
    assert_eq!(grid.headers.len(), 3);
}

#[test]
fn mixed_csv_profiles_and_completeness() {
    let grid = parse_spreadsheet(&fixture("mixed.csv"), "mixed.csv").unwrap();
    let analysis = analyze(&grid);

    assert_eq!(analysis.summary.total_rows, 4);
    assert_eq!(analysis.summary.non_empty_rows, 3);
    assert_eq!(analysis.summary.completeness, 75);

    let q1 = &analysis.profiles[0];
    assert_eq!((q1.name.as_str(), q1.count), ("Q1", 1));
    let q2 = &analysis.profiles[1];
    assert_eq!((q2.name.as_str(), q2.count, q2.sum), ("Q2", 3, 295.0));

    let labels: Vec<_> = analysis.charts.row_series.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, vec!["Widget", "Gadget", "Row 3", "Gizmo"]);
    let values: Vec<_> = analysis.charts.row_series.iter().map(|p| p.value).collect();
    assert_eq!(values, vec![100.0, 0.0, 0.0, 0.0]);
}

#[test]
fn truncated_workbook_is_rejected() {
    let mut bytes = fixture("sales.xlsx");
    bytes.truncate(100);
    let err = parse_spreadsheet(&bytes, "sales.xlsx").unwrap_err();
    assert!(matches!(err, AppError::ParseError(_)));
}
