//! Spreadsheet readers producing rows keyed by normalized header.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use calamine::{open_workbook_auto, Data, DataType, Reader};
use chrono::NaiveDate;
use tracing::debug;

use crate::error::ImportError;

/// A single spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Bool(bool),
}

impl Cell {
    /// Text as displayed, `None` for empty or blank cells.
    pub fn text(&self) -> Option<String> {
        let text = match self {
            Cell::Empty => return None,
            Cell::Text(s) => s.trim().to_string(),
            Cell::Number(n) => n.to_string(),
            Cell::Date(d) => d.format("%Y-%m-%d").to_string(),
            Cell::Bool(b) => b.to_string(),
        };
        (!text.is_empty()).then_some(text)
    }

    pub fn is_blank(&self) -> bool {
        self.text().is_none()
    }
}

/// One data row, keyed by normalized header name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    cells: HashMap<String, Cell>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a cell under `header`, normalized.
    pub fn insert(&mut self, header: &str, cell: Cell) {
        self.cells.insert(normalize_key(header), cell);
    }

    /// Cell for a normalized key, blank cells included.
    pub fn get(&self, key: &str) -> Option<&Cell> {
        self.cells.get(key)
    }

    /// Trimmed text of a non-blank cell.
    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key).and_then(Cell::text)
    }

    fn is_blank(&self) -> bool {
        self.cells.values().all(Cell::is_blank)
    }
}

/// Lower-case and drop all whitespace: `"Type Travaux"` becomes `typetravaux`.
pub fn normalize_key(header: &str) -> String {
    header
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Supported spreadsheet formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    Csv,
    Workbook,
}

impl SheetFormat {
    pub fn from_path(path: &Path) -> Result<Self, ImportError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "csv" => Ok(SheetFormat::Csv),
            "xlsx" | "xlsm" | "xls" | "ods" => Ok(SheetFormat::Workbook),
            _ => Err(ImportError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Data rows of the file at `path`; the first row holds the headers.
pub fn read_rows(path: &Path) -> Result<Vec<RawRow>, ImportError> {
    let rows = match SheetFormat::from_path(path)? {
        SheetFormat::Csv => {
            let file = std::fs::File::open(path).map_err(|e| ImportError::Read(e.to_string()))?;
            read_csv(file)?
        }
        SheetFormat::Workbook => read_workbook(path)?,
    };
    debug!("Read {} data rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Data rows of a CSV document. Comma and semicolon delimiters are accepted.
pub fn read_csv<R: Read>(mut reader: R) -> Result<Vec<RawRow>, ImportError> {
    let mut content = String::new();
    reader
        .read_to_string(&mut content)
        .map_err(|e| ImportError::Read(e.to_string()))?;

    let header_line = content.lines().next().unwrap_or_default();
    let delimiter = if header_line.matches(';').count() > header_line.matches(',').count() {
        b';'
    } else {
        b','
    };

    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let mut row = RawRow::new();
        for (header, value) in headers.iter().zip(record.iter()) {
            let cell = if value.trim().is_empty() {
                Cell::Empty
            } else {
                Cell::Text(value.to_string())
            };
            row.insert(header, cell);
        }
        if !row.is_blank() {
            rows.push(row);
        }
    }
    Ok(rows)
}

/// Data rows of the first sheet of an Excel or OpenDocument workbook.
pub fn read_workbook(path: &Path) -> Result<Vec<RawRow>, ImportError> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(ImportError::Empty)?;
    let range = workbook.worksheet_range(&sheet)?;

    let mut sheet_rows = range.rows();
    let headers: Vec<String> = match sheet_rows.next() {
        Some(header_row) => header_row.iter().map(|c| c.to_string()).collect(),
        None => return Ok(Vec::new()),
    };

    let mut rows = Vec::new();
    for data in sheet_rows {
        let mut row = RawRow::new();
        for (header, value) in headers.iter().zip(data.iter()) {
            if !header.trim().is_empty() {
                row.insert(header, to_cell(value));
            }
        }
        if !row.is_blank() {
            rows.push(row);
        }
    }
    Ok(rows)
}

fn to_cell(value: &Data) -> Cell {
    match value {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(_) | Data::DateTimeIso(_) => match value.as_date() {
            Some(date) => Cell::Date(date),
            None => Cell::Text(value.to_string()),
        },
        other => Cell::Text(other.to_string()),
    }
}
