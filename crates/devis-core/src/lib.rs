//! Core library for construction quote ("devis") management.
//!
//! This crate provides:
//! - Year-scoped sequential quote numbers (`DEV-2024-001`)
//! - HT / TVA / TTC computation for lines and quote totals
//! - Heuristic extraction of draft quotes from PDF text
//! - SQLite storage with listing filters, client and dashboard reports
//! - Spreadsheet import and Excel export

pub mod error;
pub mod export;
pub mod extraction;
pub mod import;
pub mod models;
pub mod numbering;
pub mod pdf;
pub mod pricing;
pub mod reports;
pub mod service;
pub mod store;

pub use error::{DevisError, Result};
pub use extraction::{DraftRecord, QuoteExtractor, QuoteTextParser};
pub use import::ImportReport;
pub use models::config::{AppConfig, QuoteDefaults};
pub use models::quote::{ClientInfo, LineItem, NewLine, NewQuote, Quote, QuoteStatus, QuoteUpdate};
pub use numbering::{NumberAllocator, NumberStore};
pub use pdf::{PdfContent, PdfExtractor, PdfProcessor, PdfType};
pub use pricing::Amounts;
pub use service::QuoteService;
pub use store::{Database, FilterOptions, Page, Pagination, QuoteFilter, SortField, SortOrder, StoredPdf};
