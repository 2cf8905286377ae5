//! Batch quote import from spreadsheets.
//!
//! Each data row becomes one quote without lines. Rows are validated
//! independently; a bad row is reported and the rest still import.

mod reader;

pub use reader::{normalize_key, read_csv, read_rows, read_workbook, Cell, RawRow, SheetFormat};

use std::path::Path;

use chrono::{Days, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{ImportError, Result};
use crate::extraction::rules::{parse_date, parse_french_amount};
use crate::models::quote::{ClientInfo, NewQuote, QuoteStatus};
use crate::service::QuoteService;

/// Outcome of an import.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportReport {
    /// Quotes created.
    pub count: usize,
    /// Numbers of the created quotes.
    #[serde(rename = "numeros")]
    pub numbers: Vec<String>,
    /// One message per rejected row, prefixed with its spreadsheet line.
    pub errors: Vec<String>,
}

/// Import every row of the spreadsheet at `path`.
pub fn import_file(service: &mut QuoteService, path: &Path, now: NaiveDateTime) -> Result<ImportReport> {
    let rows = read_rows(path)?;
    if rows.is_empty() {
        return Err(ImportError::Empty.into());
    }
    Ok(import_rows(service, &rows, now))
}

/// Create one quote per valid row.
pub fn import_rows(service: &mut QuoteService, rows: &[RawRow], now: NaiveDateTime) -> ImportReport {
    let mut report = ImportReport::default();

    for (index, row) in rows.iter().enumerate() {
        // Header is line 1.
        let line = index + 2;

        let outcome = parse_row(row)
            .map_err(|reason| reason.to_string())
            .and_then(|input| service.create(input, now).map_err(|e| e.to_string()));

        match outcome {
            Ok(quote) => {
                report.count += 1;
                report.numbers.push(quote.number);
            }
            Err(reason) => {
                warn!("Import line {} rejected: {}", line, reason);
                report.errors.push(format!("Ligne {}: {}", line, reason));
            }
        }
    }

    info!("Imported {} quotes, {} rows rejected", report.count, report.errors.len());
    report
}

/// Why a row was rejected before reaching the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowError {
    MissingFields,
    InvalidDate,
    InvalidAmount,
    InvalidRate,
    InvalidStatus,
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            RowError::MissingFields => "Champs obligatoires manquants",
            RowError::InvalidDate => "Date invalide",
            RowError::InvalidAmount => "Montant invalide",
            RowError::InvalidRate => "Taux de TVA invalide",
            RowError::InvalidStatus => {
                "Statut invalide (brouillon, envoyé, accepté, refusé, en cours, terminé, annulé)"
            }
        };
        f.write_str(message)
    }
}

/// Creation input for one row. The rate falls back to the configured default.
pub fn parse_row(row: &RawRow) -> std::result::Result<NewQuote, RowError> {
    let client = row.text("client");
    let work_type = row.text("typetravaux");
    let issue_date = row.get("datedevis").filter(|c| !c.is_blank());
    let amount = row.get("montant").filter(|c| !c.is_blank());
    let status = row.text("statut");

    let (Some(client), Some(work_type), Some(issue_date), Some(amount), Some(status)) =
        (client, work_type, issue_date, amount, status)
    else {
        return Err(RowError::MissingFields);
    };

    let issue_date = cell_date(issue_date).ok_or(RowError::InvalidDate)?;
    let amount = cell_amount(amount).ok_or(RowError::InvalidAmount)?;
    let status = QuoteStatus::parse(&status).ok_or(RowError::InvalidStatus)?;
    let vat_rate = match row.get("tauxtva").filter(|c| !c.is_blank()) {
        Some(cell) => Some(cell_amount(cell).ok_or(RowError::InvalidRate)?),
        None => None,
    };
    let optional_date = |key: &str| match row.get(key).filter(|c| !c.is_blank()) {
        Some(cell) => cell_date(cell).map(Some).ok_or(RowError::InvalidDate),
        None => Ok(None),
    };

    Ok(NewQuote {
        client: ClientInfo {
            name: client,
            address: row.text("clientadresse"),
            phone: row.text("clienttelephone"),
            email: row.text("clientemail"),
            siret: row.text("clientsiret"),
        },
        work_type,
        issue_date: Some(issue_date),
        valid_until: optional_date("datevalidite")?,
        work_start: optional_date("datedebuttravaux")?,
        vat_rate,
        status: Some(status),
        materials: row.text("materiaux"),
        notes: row.text("notes"),
        amount_ht: Some(amount),
        ..NewQuote::default()
    })
}

/// Day zero of spreadsheet date serials.
fn serial_epoch() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1899, 12, 30)
}

fn cell_date(cell: &Cell) -> Option<NaiveDate> {
    match cell {
        Cell::Date(date) => Some(*date),
        Cell::Text(text) => parse_date(text.trim()),
        Cell::Number(serial) if *serial >= 1.0 && serial.fract() == 0.0 => {
            serial_epoch()?.checked_add_days(Days::new(*serial as u64))
        }
        _ => None,
    }
}

fn cell_amount(cell: &Cell) -> Option<Decimal> {
    match cell {
        Cell::Number(n) => Decimal::try_from(*n).ok(),
        Cell::Text(text) => parse_french_amount(text),
        _ => None,
    }
}
