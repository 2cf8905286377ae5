//! Application settings.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::DevisError;

/// Main configuration for the devis application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Issuing company identity.
    pub company: CompanyConfig,

    /// Quote defaults.
    pub quotes: QuoteDefaults,

    /// Database location.
    pub storage: StorageConfig,
}

/// Identity of the company issuing quotes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyConfig {
    pub name: String,
    pub address: String,
    pub postal_code: String,
    pub city: String,
    pub phone: String,
    pub email: String,
    pub siret: String,
    /// Intra-community VAT number.
    pub vat_number: String,
}

impl CompanyConfig {
    /// Address, contact and registration details on one line, blanks skipped.
    pub fn contact_line(&self) -> String {
        let city = format!("{} {}", self.postal_code.trim(), self.city.trim());
        let siret = (!self.siret.trim().is_empty()).then(|| format!("SIRET {}", self.siret.trim()));
        let vat = (!self.vat_number.trim().is_empty())
            .then(|| format!("TVA {}", self.vat_number.trim()));

        [
            Some(self.address.trim().to_string()),
            Some(city.trim().to_string()),
            Some(self.phone.trim().to_string()),
            Some(self.email.trim().to_string()),
            siret,
            vat,
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" - ")
    }
}

/// Defaults applied when creating or importing quotes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteDefaults {
    /// VAT rate in percent.
    pub default_vat_rate: Decimal,

    /// Validity period in days; 0 leaves the validity date empty.
    pub validity_days: u32,

    /// Document number prefix (`DEV` gives `DEV-2024-001`).
    pub number_prefix: String,

    /// Notes used when a new quote has none.
    pub default_notes: String,
}

impl Default for QuoteDefaults {
    fn default() -> Self {
        Self {
            default_vat_rate: Decimal::new(20, 0),
            validity_days: 30,
            number_prefix: "DEV".to_string(),
            default_notes: String::new(),
        }
    }
}

impl QuoteDefaults {
    /// Validity end date for a quote issued on `issue_date`.
    pub fn valid_until(&self, issue_date: NaiveDate) -> Option<NaiveDate> {
        if self.validity_days == 0 {
            return None;
        }
        issue_date.checked_add_days(Days::new(u64::from(self.validity_days)))
    }

    /// Default notes, if configured.
    pub fn notes(&self) -> Option<String> {
        let notes = self.default_notes.trim();
        (!notes.is_empty()).then(|| notes.to_string())
    }
}

/// Database location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database file.
    pub database_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("devis.db"),
        }
    }
}

impl AppConfig {
    /// Reject settings that would make quote creation fail later.
    pub fn validate(&self) -> crate::Result<()> {
        let rate = self.quotes.default_vat_rate;
        if rate < Decimal::ZERO || rate > Decimal::ONE_HUNDRED {
            return Err(DevisError::Config(format!(
                "quotes.default_vat_rate must be between 0 and 100, got {}",
                rate
            )));
        }
        let prefix = self.quotes.number_prefix.trim();
        if prefix.is_empty() || prefix.contains(char::is_whitespace) {
            return Err(DevisError::Config(
                "quotes.number_prefix must be a non-empty word".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
