use super::types::{Cell, Grid};
use crate::error::AppError;
use calamine::{open_workbook_from_rs, Data, Reader, Xls, Xlsx};
use csv::{ReaderBuilder, Trim};
use std::io::{Cursor, Read, Seek};

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Xlsx,
    Xls,
    Csv,
}

impl FileFormat {
    /// Pick a format from the file extension, sniffing the content when the
    /// name does not say.
    pub fn detect(file_name: &str, data: &[u8]) -> Self {
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase());
        match extension.as_deref() {
            Some("xlsx") | Some("xlsm") => FileFormat::Xlsx,
            Some("xls") => FileFormat::Xls,
            Some("csv") | Some("txt") => FileFormat::Csv,
            _ if data.starts_with(ZIP_MAGIC) => FileFormat::Xlsx,
            _ if data.starts_with(OLE_MAGIC) => FileFormat::Xls,
            _ => FileFormat::Csv,
        }
    }
}

/// Turn uploaded bytes into a [`Grid`]. Only the first sheet of a workbook
/// is read.
pub fn parse_spreadsheet(data: &[u8], file_name: &str) -> Result<Grid, AppError> {
    if data.is_empty() {
        return Err(AppError::ParseError("The uploaded file is empty".to_string()));
    }

    let start = std::time::Instant::now();
    let format = FileFormat::detect(file_name, data);
    tracing::info!("Parsing {} ({} bytes) as {:?}", file_name, data.len(), format);

    let rows = match format {
        FileFormat::Xlsx => {
            let workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(data))?;
            read_first_sheet(workbook)?
        }
        FileFormat::Xls => {
            let workbook: Xls<_> = open_workbook_from_rs(Cursor::new(data))?;
            read_first_sheet(workbook)?
        }
        FileFormat::Csv => read_csv(data)?,
    };

    let grid = Grid::from_rows(rows);
    tracing::info!(
        "Parsed {} with {} columns and {} records in {:?}",
        file_name,
        grid.headers.len(),
        grid.records.len(),
        start.elapsed()
    );
    Ok(grid)
}

fn read_first_sheet<RS, R>(mut workbook: R) -> Result<Vec<Vec<Cell>>, AppError>
where
    RS: Read + Seek,
    R: Reader<RS>,
    R::Error: std::fmt::Display,
{
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| AppError::ParseError("No sheets found in workbook".to_string()))?;

    let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
        tracing::error!("Failed to read worksheet {}: {}", sheet_name, e);
        AppError::ParseError(format!("Failed to read worksheet {}: {}", sheet_name, e))
    })?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(convert_cell).collect())
        .collect())
}

fn convert_cell(value: &Data) -> Cell {
    match value {
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::DateTime(d) => Cell::Number(d.as_f64()),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::from(s.as_str()),
        Data::Bool(b) => Cell::Bool(*b),
        Data::Error(_) | Data::Empty => Cell::Empty,
    }
}

fn read_csv(data: &[u8]) -> Result<Vec<Vec<Cell>>, AppError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::None)
        .from_reader(data);

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| {
            AppError::ParseError(format!("Failed to parse CSV row {}: {}", index + 1, e))
        })?;
        rows.push(record.iter().map(Cell::from).collect());
    }
    Ok(rows)
}
