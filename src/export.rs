// * Result Sink
// * Writes validated records as delimited text (CSV/TSV), a spreadsheet or JSON.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use rust_xlsxwriter::{Format, Workbook, XlsxError};
use thiserror::Error;

use crate::refinery::record::Record;

const BASE_HEADER: &[&str] = &["Entity_Name", "Address"];
const PROVENANCE_HEADER: &[&str] = &["Source_URL", "Source_Type", "Table_Index", "Row_Index"];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Spreadsheet write failed: {0}")]
    Xlsx(#[from] XlsxError),
}

/// Worksheet the spreadsheet export writes into
pub const XLSX_SHEET_NAME: &str = "Records";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Tab,
}

impl Delimiter {
    pub fn as_char(&self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Tab => '\t',
        }
    }
}

/// Output formats understood by the sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Tsv,
    Json,
    Xlsx,
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "tsv" => Ok(ExportFormat::Tsv),
            "json" => Ok(ExportFormat::Json),
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            other => Err(format!("unknown export format: {}", other)),
        }
    }
}

fn needs_quotes(field: &str, sep: char) -> bool {
    field.contains(sep) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

fn write_row<W: Write>(w: &mut W, row: &[&str], sep: char) -> io::Result<()> {
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            write!(w, "{}", sep)?;
        }
        if needs_quotes(cell, sep) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

/// Writes a header row followed by one row per record.
pub fn write_delimited<W: Write>(
    records: &[Record],
    mut writer: W,
    delimiter: Delimiter,
    include_provenance: bool,
) -> Result<(), ExportError> {
    let sep = delimiter.as_char();

    let mut header: Vec<&str> = BASE_HEADER.to_vec();
    if include_provenance {
        header.extend_from_slice(PROVENANCE_HEADER);
    }
    write_row(&mut writer, &header, sep)?;

    for record in records {
        if include_provenance {
            let table_index = record.table_index.map(|i| i.to_string()).unwrap_or_default();
            let row_index = record.row_index.map(|i| i.to_string()).unwrap_or_default();
            let row = [
                record.entity_name.as_str(),
                record.address.as_str(),
                record.source_url.as_str(),
                record.source_kind.as_str(),
                table_index.as_str(),
                row_index.as_str(),
            ];
            write_row(&mut writer, &row, sep)?;
        } else {
            write_row(&mut writer, &[&record.entity_name, &record.address], sep)?;
        }
    }

    writer.flush()?;
    Ok(())
}

pub fn to_delimited_string(
    records: &[Record],
    delimiter: Delimiter,
    include_provenance: bool,
) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    write_delimited(records, &mut buf, delimiter, include_provenance)?;
    // * Every field came from a String, so the buffer is valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Writes the records as a pretty-printed JSON array.
pub fn write_json<W: Write>(records: &[Record], mut writer: W) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut writer, records)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Builds an in-memory workbook: one sheet, header row first, then one row per
/// record. Table and row positions are numeric cells, empty for non-table records.
pub fn build_workbook(records: &[Record], include_provenance: bool) -> Result<Workbook, ExportError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(XLSX_SHEET_NAME)?;

    let mut header: Vec<&str> = BASE_HEADER.to_vec();
    if include_provenance {
        header.extend_from_slice(PROVENANCE_HEADER);
    }
    for (col, label) in header.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *label, &header_format)?;
    }

    for (idx, record) in records.iter().enumerate() {
        // * Beyond the sheet's row limit the writer itself reports the error
        let row = u32::try_from(idx + 1).unwrap_or(u32::MAX);
        worksheet.write_string(row, 0, record.entity_name.as_str())?;
        worksheet.write_string(row, 1, record.address.as_str())?;

        if include_provenance {
            worksheet.write_string(row, 2, record.source_url.as_str())?;
            worksheet.write_string(row, 3, record.source_kind.as_str())?;
            if let Some(table_index) = record.table_index {
                worksheet.write_number(row, 4, table_index as f64)?;
            }
            if let Some(row_index) = record.row_index {
                worksheet.write_number(row, 5, row_index as f64)?;
            }
        }
    }

    Ok(workbook)
}

/// Writes the records as an `.xlsx` document.
pub fn write_xlsx<W: Write>(
    records: &[Record],
    mut writer: W,
    include_provenance: bool,
) -> Result<(), ExportError> {
    let mut workbook = build_workbook(records, include_provenance)?;
    let bytes = workbook.save_to_buffer()?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Writes records in the given format to any writer.
pub fn write_records<W: Write>(
    records: &[Record],
    writer: W,
    format: ExportFormat,
    include_provenance: bool,
) -> Result<(), ExportError> {
    match format {
        ExportFormat::Csv => write_delimited(records, writer, Delimiter::Comma, include_provenance),
        ExportFormat::Tsv => write_delimited(records, writer, Delimiter::Tab, include_provenance),
        ExportFormat::Json => write_json(records, writer),
        ExportFormat::Xlsx => write_xlsx(records, writer, include_provenance),
    }
}

/// Creates (or truncates) `path` and writes the records into it.
pub fn write_to_path(
    records: &[Record],
    path: &Path,
    format: ExportFormat,
    include_provenance: bool,
) -> Result<(), ExportError> {
    let file = File::create(path)?;
    write_records(records, BufWriter::new(file), format, include_provenance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refinery::record::SourceKind;

    fn record(name: &str, address: &str) -> Record {
        Record {
            entity_name: name.to_string(),
            address: address.to_string(),
            source_url: "https://example.com/list".to_string(),
            source_kind: SourceKind::Table,
            table_index: Some(1),
            row_index: Some(2),
        }
    }

    #[test]
    fn test_header_only_for_empty() {
        let out = to_delimited_string(&[], Delimiter::Comma, false).unwrap();
        assert_eq!(out, "Entity_Name,Address\n");
    }

    #[test]
    fn test_comma_fields_quoted() {
        let out = to_delimited_string(
            &[record("City Hospital", "12 MG Road, Pune")],
            Delimiter::Comma,
            false,
        )
        .unwrap();
        assert_eq!(out, "Entity_Name,Address\nCity Hospital,\"12 MG Road, Pune\"\n");
    }

    #[test]
    fn test_quotes_doubled() {
        let out = to_delimited_string(&[record("The \"Best\" Clinic", "4 Lake Road")], Delimiter::Comma, false)
            .unwrap();
        assert!(out.contains("\"The \"\"Best\"\" Clinic\""));
    }

    #[test]
    fn test_tab_delimiter_leaves_commas_alone() {
        let out = to_delimited_string(&[record("City Hospital", "12 MG Road, Pune")], Delimiter::Tab, false)
            .unwrap();
        assert_eq!(out, "Entity_Name\tAddress\nCity Hospital\t12 MG Road, Pune\n");
    }

    #[test]
    fn test_provenance_columns() {
        let mut list_record = record("Sunrise Clinic", "8 Hill Street");
        list_record.source_kind = SourceKind::List;
        list_record.table_index = None;
        list_record.row_index = None;

        let out = to_delimited_string(
            &[record("City Hospital", "12 MG Road"), list_record],
            Delimiter::Comma,
            true,
        )
        .unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Entity_Name,Address,Source_URL,Source_Type,Table_Index,Row_Index");
        assert_eq!(lines[1], "City Hospital,12 MG Road,https://example.com/list,table,1,2");
        assert_eq!(lines[2], "Sunrise Clinic,8 Hill Street,https://example.com/list,list,,");
    }

    #[test]
    fn test_json_export() {
        let mut buf = Vec::new();
        write_json(&[record("City Hospital", "12 MG Road")], &mut buf).unwrap();
        let parsed: Vec<Record> = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed[0].entity_name, "City Hospital");
        assert_eq!(parsed[0].table_index, Some(1));
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("CSV".parse::<ExportFormat>(), Ok(ExportFormat::Csv));
        assert_eq!("tsv".parse::<ExportFormat>(), Ok(ExportFormat::Tsv));
        assert_eq!("xlsx".parse::<ExportFormat>(), Ok(ExportFormat::Xlsx));
        assert!("ods".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_xlsx_bytes_are_a_zip_package() {
        let mut buf = Vec::new();
        write_xlsx(&[record("City Hospital", "12 MG Road")], &mut buf, true).unwrap();
        // * xlsx is an OOXML zip container
        assert!(buf.starts_with(b"PK"));
    }
}
