//! Quote extraction from document text.

mod parser;
pub mod rules;

pub use parser::{QuoteTextParser, CLIENT_PLACEHOLDER, DEFAULT_WORK_TYPE};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{DevisError, ExtractionError};
use crate::models::quote::{ClientInfo, LineItem, NewLine, NewQuote, QuoteStatus};
use crate::pricing::Amounts;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Draft quote read from a document, shaped like an import row plus lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftRecord {
    pub client: String,

    #[serde(rename = "typeTravaux")]
    pub work_type: String,

    /// ISO date as found in the document, not calendar-checked.
    #[serde(rename = "dateDevis")]
    pub issue_date: String,

    #[serde(rename = "tauxTVA")]
    pub vat_rate: Decimal,

    #[serde(flatten)]
    pub totals: Amounts,

    /// Always draft.
    #[serde(rename = "statut")]
    pub status: QuoteStatus,

    #[serde(rename = "entreprise", skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    #[serde(rename = "adresseEntreprise", skip_serializing_if = "Option::is_none")]
    pub company_address: Option<String>,

    #[serde(rename = "referenceAffaire", skip_serializing_if = "Option::is_none")]
    pub affair_reference: Option<String>,

    #[serde(rename = "affaireSuiviePar", skip_serializing_if = "Option::is_none")]
    pub followed_by: Option<String>,

    #[serde(rename = "lieu", skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,

    #[serde(rename = "lignes")]
    pub lines: Vec<LineItem>,
}

impl DraftRecord {
    /// Whether at least one priced line was read.
    pub fn has_priced_lines(&self) -> bool {
        self.lines.iter().any(|l| !l.is_section)
    }

    /// Creation input for this draft.
    ///
    /// Fails when the document date does not exist in the calendar.
    pub fn to_new_quote(&self) -> crate::Result<NewQuote> {
        let issue_date = NaiveDate::parse_from_str(&self.issue_date, "%Y-%m-%d").map_err(|_| {
            DevisError::validation("dateDevis", format!("date invalide: {}", self.issue_date))
        })?;

        let lines: Vec<NewLine> = self
            .lines
            .iter()
            .map(|line| NewLine {
                description: line.description.clone(),
                quantity: line.quantity,
                unit: line.unit.clone(),
                unit_price: line.unit_price,
                vat_rate: Some(line.vat_rate),
                stated_ht: (!line.is_section).then_some(line.amounts.ht),
                is_section: line.is_section,
            })
            .collect();

        let amount_ht = (!self.has_priced_lines()).then_some(self.totals.ht);

        let mut notes = Vec::new();
        if let Some(reference) = &self.affair_reference {
            notes.push(format!("Référence affaire : {}", reference));
        }
        if let Some(follower) = &self.followed_by {
            notes.push(format!("Affaire suivie par : {}", follower));
        }

        Ok(NewQuote {
            client: ClientInfo {
                name: self.client.clone(),
                ..ClientInfo::default()
            },
            work_type: self.work_type.clone(),
            issue_date: Some(issue_date),
            vat_rate: Some(self.vat_rate),
            status: Some(QuoteStatus::Draft),
            notes: (!notes.is_empty()).then(|| notes.join("\n")),
            amount_ht,
            lines,
            ..NewQuote::default()
        })
    }
}

/// Trait for quote extraction from plain text.
pub trait QuoteExtractor {
    /// Draft from `text`, or `None` when the document is unparseable.
    fn extract(&self, text: &str) -> Option<DraftRecord>;

    /// Like [`extract`](Self::extract), with the failure as an error.
    fn extract_from_text(&self, text: &str) -> Result<DraftRecord> {
        if text.trim().is_empty() {
            return Err(ExtractionError::NoText);
        }
        self.extract(text).ok_or(ExtractionError::Unparseable)
    }
}
