use std::fs;

use entity_flow::config::keywords::KeywordTables;
use calamine::{open_workbook_auto, Data, Reader};
use entity_flow::export::{write_to_path, ExportFormat, XLSX_SHEET_NAME};
use entity_flow::refinery::{Record, Refinery};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

const HTML: &str = r#"
    <table>
        <tr><th>Hospital Name</th><th>Address</th></tr>
        <tr><td>City Care Hospital</td><td>12 Mall Road, Ludhiana</td></tr>
        <tr><td>Sunrise Clinic</td><td>8 Hill Street</td></tr>
    </table>"#;

fn records() -> Vec<Record> {
    Refinery::new()
        .process(HTML, "https://example.com/list")
        .unwrap()
        .records
}

#[test]
fn test_csv_file_written() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.csv");

    write_to_path(&records(), &path, ExportFormat::Csv, false).unwrap();

    let written = fs::read_to_string(&path).unwrap();
    assert_eq!(
        written,
        "Entity_Name,Address\nCity Care Hospital,\"12 Mall Road, Ludhiana\"\nSunrise Clinic,8 Hill Street\n"
    );
}

#[test]
fn test_tsv_with_provenance() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.tsv");

    write_to_path(&records(), &path, ExportFormat::Tsv, true).unwrap();

    let written = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(
        lines[0],
        "Entity_Name\tAddress\tSource_URL\tSource_Type\tTable_Index\tRow_Index"
    );
    assert_eq!(
        lines[1],
        "City Care Hospital\t12 Mall Road, Ludhiana\thttps://example.com/list\ttable\t1\t1"
    );
}

#[test]
fn test_json_file_round_trips_records() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.json");
    let original = records();

    write_to_path(&original, &path, ExportFormat::Json, false).unwrap();

    let parsed: Vec<Record> = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(parsed, original);
}

#[test]
fn test_empty_result_writes_header() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.csv");

    write_to_path(&[], &path, ExportFormat::Csv, false).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "Entity_Name,Address\n");
}

#[test]
fn test_keyword_file_loaded() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("keywords.json");
    fs::write(&path, r#"{"major_cities": ["Shimla", "Agra"]}"#).unwrap();

    let tables = KeywordTables::from_json_file(&path).unwrap();
    assert_eq!(tables.major_cities, vec!["shimla", "agra"]);
    assert_eq!(tables.entity, KeywordTables::global().entity);
}

fn sheet_rows(path: &std::path::Path) -> Vec<Vec<String>> {
    let mut workbook = open_workbook_auto(path).unwrap();
    let range = workbook.worksheet_range(XLSX_SHEET_NAME).unwrap();
    range
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Data::Empty => String::new(),
                    Data::Float(f) => format!("{}", *f as i64),
                    Data::Int(i) => i.to_string(),
                    other => other.to_string(),
                })
                .collect()
        })
        .collect()
}

#[test]
fn test_xlsx_file_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.xlsx");

    write_to_path(&records(), &path, ExportFormat::Xlsx, false).unwrap();

    assert_eq!(
        sheet_rows(&path),
        vec![
            vec!["Entity_Name".to_string(), "Address".to_string()],
            vec!["City Care Hospital".to_string(), "12 Mall Road, Ludhiana".to_string()],
            vec!["Sunrise Clinic".to_string(), "8 Hill Street".to_string()],
        ]
    );
}

#[test]
fn test_xlsx_provenance_columns() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("provenance.xlsx");

    write_to_path(&records(), &path, ExportFormat::Xlsx, true).unwrap();

    let rows = sheet_rows(&path);
    assert_eq!(
        rows[0],
        vec!["Entity_Name", "Address", "Source_URL", "Source_Type", "Table_Index", "Row_Index"]
    );
    assert_eq!(
        rows[2],
        vec!["Sunrise Clinic", "8 Hill Street", "https://example.com/list", "table", "1", "2"]
    );
}

#[test]
fn test_xlsx_empty_result_has_header_row() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.xlsx");

    write_to_path(&[], &path, ExportFormat::Xlsx, false).unwrap();

    assert_eq!(sheet_rows(&path), vec![vec!["Entity_Name", "Address"]]);
}
