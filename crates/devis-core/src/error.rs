//! Error types for the devis-core library.

use thiserror::Error;

/// Main error type for the devis library.
#[derive(Error, Debug)]
pub enum DevisError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Quote extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Spreadsheet import error.
    #[error("import error: {0}")]
    Import(#[from] ImportError),

    /// A field failed validation.
    #[error("validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// The referenced quote does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Storage error from the database layer.
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Spreadsheet export error.
    #[error("export error: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl DevisError {
    /// Shorthand for a validation error on a named field.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors related to quote extraction from document text.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Neither a client nor a total could be found in the text.
    #[error("unparseable document: no client and no total found")]
    Unparseable,

    /// The document produced no text at all.
    #[error("no text found in document")]
    NoText,
}

/// Errors related to reading a spreadsheet for import.
#[derive(Error, Debug)]
pub enum ImportError {
    /// Extension is not one of the supported spreadsheet formats.
    #[error("unsupported file format: {0} (use .xlsx, .xls, .ods or .csv)")]
    UnsupportedFormat(String),

    /// The workbook could not be opened or read.
    #[error("failed to read spreadsheet: {0}")]
    Read(String),

    /// The spreadsheet has no data rows.
    #[error("spreadsheet is empty or invalid")]
    Empty,
}

impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::Read(err.to_string())
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::Read(err.to_string())
    }
}

/// Result type for the devis library.
pub type Result<T> = std::result::Result<T, DevisError>;
