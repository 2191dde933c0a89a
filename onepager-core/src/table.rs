//! Raw tabular input
//!
//! Reads a delimited text file or one worksheet of a workbook into a header
//! row plus loosely typed cells. Typing against the column contract happens
//! in `dataset`.

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

/// A single cell as decoded from the source, before any column typing
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

/// Source encoding, chosen from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Workbook,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(SourceFormat::Csv),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(SourceFormat::Workbook),
            _ => None,
        }
    }
}

/// Header row plus data rows. Rows may be shorter than the header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    /// Position of the first header equal to `name`
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// Read a data file into a raw table
///
/// `sheet` selects a worksheet for workbook formats (default: first sheet)
/// and is ignored for CSV.
pub fn read_table(path: &Path, sheet: Option<&str>) -> Result<RawTable> {
    if !path.is_file() {
        anyhow::bail!("data file does not exist: {}", path.display());
    }

    match SourceFormat::from_path(path) {
        Some(SourceFormat::Csv) => read_csv(path),
        Some(SourceFormat::Workbook) => read_workbook(path, sheet),
        None => anyhow::bail!(
            "unsupported data file: {} (expected .csv, .xlsx, .xlsm, .xlsb, .xls, or .ods)",
            path.display()
        ),
    }
}

fn read_csv(path: &Path) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("failed to open CSV file: {}", path.display()))?;

    let headers: Vec<String> = reader
        .headers()
        .with_context(|| format!("failed to read CSV header: {}", path.display()))?
        .iter()
        .map(normalize_header)
        .collect();
    if headers.iter().all(|h| h.is_empty()) {
        anyhow::bail!("no header row in {}", path.display());
    }

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        // Row numbers are 1-based and count the header line
        let record =
            record.with_context(|| format!("failed to parse {} at row {}", path.display(), i + 2))?;
        rows.push(record.iter().map(csv_cell).collect());
    }

    Ok(RawTable { headers, rows })
}

fn csv_cell(raw: &str) -> Cell {
    if raw.trim().is_empty() {
        Cell::Empty
    } else {
        Cell::Text(raw.to_string())
    }
}

fn read_workbook(path: &Path, sheet: Option<&str>) -> Result<RawTable> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("failed to open workbook: {}", path.display()))?;

    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .with_context(|| format!("workbook has no sheets: {}", path.display()))?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("failed to read sheet '{}' in {}", sheet_name, path.display()))?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(workbook_header).collect(),
        None => anyhow::bail!("sheet '{}' in {} is empty", sheet_name, path.display()),
    };
    if headers.iter().all(|h| h.is_empty()) {
        anyhow::bail!("no header row in sheet '{}' of {}", sheet_name, path.display());
    }

    let rows = rows
        .map(|row| row.iter().map(workbook_cell).collect())
        .collect();

    Ok(RawTable { headers, rows })
}

fn normalize_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}').trim().to_string()
}

fn workbook_header(data: &Data) -> String {
    match data {
        Data::Empty => String::new(),
        Data::String(s) => normalize_header(s),
        other => other.to_string().trim().to_string(),
    }
}

/// Map a workbook cell onto the loader's cell model
///
/// Spreadsheet error values (`#N/A`, `#DIV/0!`) read as empty cells.
pub(crate) fn workbook_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::Int(v) => Cell::Int(*v),
        Data::Float(v) => Cell::Float(*v),
        Data::Bool(v) => Cell::Bool(*v),
        Data::String(s) => csv_cell(s),
        Data::DateTime(_) | Data::DateTimeIso(_) | Data::DurationIso(_) => {
            Cell::Text(data.to_string())
        }
    }
}
