//! Data models: quotes, lines and application settings.

pub mod config;
pub mod quote;

pub use config::{AppConfig, CompanyConfig, QuoteDefaults, StorageConfig};
pub use quote::{ClientInfo, LineItem, NewLine, NewQuote, Quote, QuoteStatus, QuoteUpdate};
