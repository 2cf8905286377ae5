//! Quote ("devis") data models.
//!
//! Field names serialize to the persisted JSON shape (`numeroDevis`,
//! `typeTravaux`, `montantHT`, ...).

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::pricing::Amounts;

/// Default unit label for a new line.
pub const DEFAULT_UNIT: &str = "unité";

/// A persisted quote with its lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Year-scoped document number (`DEV-2024-001`).
    #[serde(rename = "numeroDevis")]
    pub number: String,

    /// Client identity.
    #[serde(flatten)]
    pub client: ClientInfo,

    /// Kind of work quoted.
    #[serde(rename = "typeTravaux")]
    pub work_type: String,

    /// Issue date.
    #[serde(rename = "dateDevis")]
    pub issue_date: NaiveDate,

    /// Date until which the quote is valid.
    #[serde(rename = "dateValidite", skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<NaiveDate>,

    /// Planned start of the work.
    #[serde(rename = "dateDebutTravaux", skip_serializing_if = "Option::is_none")]
    pub work_start: Option<NaiveDate>,

    /// Quote-level VAT rate in percent.
    #[serde(rename = "tauxTVA")]
    pub vat_rate: Decimal,

    /// Derived totals.
    #[serde(flatten)]
    pub totals: Amounts,

    /// Lifecycle status.
    #[serde(rename = "statut")]
    pub status: QuoteStatus,

    /// Materials, free text.
    #[serde(rename = "materiaux", skip_serializing_if = "Option::is_none")]
    pub materials: Option<String>,

    /// Notes, free text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// File name of the PDF this quote was imported from.
    #[serde(rename = "nomFichierPDF", skip_serializing_if = "Option::is_none")]
    pub pdf_file_name: Option<String>,

    /// Lines in display order.
    #[serde(rename = "lignes", default)]
    pub lines: Vec<LineItem>,

    #[serde(rename = "createdAt")]
    pub created_at: NaiveDateTime,

    #[serde(rename = "updatedAt")]
    pub updated_at: NaiveDateTime,
}

/// Client identity fields carried on each quote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    /// Client name.
    #[serde(rename = "client")]
    pub name: String,

    #[serde(rename = "clientAdresse", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(rename = "clientTelephone", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(rename = "clientEmail", default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Company registration / tax identifier.
    #[serde(rename = "clientSiret", default, skip_serializing_if = "Option::is_none")]
    pub siret: Option<String>,
}

/// A persisted quote line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,

    #[serde(rename = "quantite")]
    pub quantity: Decimal,

    #[serde(rename = "unite")]
    pub unit: String,

    #[serde(rename = "prixUnitaire")]
    pub unit_price: Decimal,

    /// Line VAT rate in percent; may differ from the quote rate.
    #[serde(rename = "tauxTVA")]
    pub vat_rate: Decimal,

    #[serde(flatten)]
    pub amounts: Amounts,

    /// Display position, starting at 0.
    #[serde(rename = "ordre")]
    pub order: u32,

    /// Heading row without prices.
    #[serde(rename = "isSection", default)]
    pub is_section: bool,
}

/// Quote lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QuoteStatus {
    /// brouillon
    Draft,
    /// envoyé
    Sent,
    /// accepté
    Accepted,
    /// refusé
    Refused,
    /// en cours
    InProgress,
    /// terminé
    Completed,
    /// annulé
    Cancelled,
}

impl QuoteStatus {
    pub const ALL: [QuoteStatus; 7] = [
        QuoteStatus::Draft,
        QuoteStatus::Sent,
        QuoteStatus::Accepted,
        QuoteStatus::Refused,
        QuoteStatus::InProgress,
        QuoteStatus::Completed,
        QuoteStatus::Cancelled,
    ];

    /// Stored label.
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Draft => "brouillon",
            QuoteStatus::Sent => "envoyé",
            QuoteStatus::Accepted => "accepté",
            QuoteStatus::Refused => "refusé",
            QuoteStatus::InProgress => "en cours",
            QuoteStatus::Completed => "terminé",
            QuoteStatus::Cancelled => "annulé",
        }
    }

    /// Parse a status label, case-insensitively.
    ///
    /// Also accepts the labels of older spreadsheets: "en attente" (draft)
    /// and "validé" (accepted).
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();

        match s.as_str() {
            "brouillon" | "en attente" => Some(QuoteStatus::Draft),
            "envoyé" | "envoye" => Some(QuoteStatus::Sent),
            "accepté" | "accepte" | "validé" | "valide" => Some(QuoteStatus::Accepted),
            "refusé" | "refuse" => Some(QuoteStatus::Refused),
            "en cours" => Some(QuoteStatus::InProgress),
            "terminé" | "termine" => Some(QuoteStatus::Completed),
            "annulé" | "annule" => Some(QuoteStatus::Cancelled),
            _ => None,
        }
    }

    /// Whether the quote still awaits a client decision.
    pub fn is_pending(&self) -> bool {
        matches!(self, QuoteStatus::Draft | QuoteStatus::Sent)
    }
}

impl Default for QuoteStatus {
    fn default() -> Self {
        Self::Draft
    }
}

impl fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for QuoteStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for QuoteStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        QuoteStatus::parse(&s).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid status: {}", s))
        })
    }
}

/// Input for a new line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLine {
    pub description: String,

    #[serde(rename = "quantite", default)]
    pub quantity: Decimal,

    #[serde(rename = "unite", default = "default_unit")]
    pub unit: String,

    #[serde(rename = "prixUnitaire", default)]
    pub unit_price: Decimal,

    /// Falls back to the quote rate when absent.
    #[serde(rename = "tauxTVA", default, skip_serializing_if = "Option::is_none")]
    pub vat_rate: Option<Decimal>,

    /// HT figure read from a source document, authoritative over quantity x
    /// price. Never taken from user input.
    #[serde(skip)]
    pub stated_ht: Option<Decimal>,

    #[serde(rename = "isSection", default)]
    pub is_section: bool,
}

fn default_unit() -> String {
    DEFAULT_UNIT.to_string()
}

impl NewLine {
    /// A priced line.
    pub fn priced(
        description: impl Into<String>,
        quantity: Decimal,
        unit: impl Into<String>,
        unit_price: Decimal,
    ) -> Self {
        Self {
            description: description.into(),
            quantity,
            unit: unit.into(),
            unit_price,
            vat_rate: None,
            stated_ht: None,
            is_section: false,
        }
    }

    /// A section heading row.
    pub fn section(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            quantity: Decimal::ZERO,
            unit: String::new(),
            unit_price: Decimal::ZERO,
            vat_rate: None,
            stated_ht: None,
            is_section: true,
        }
    }
}

/// Input for quote creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewQuote {
    #[serde(flatten)]
    pub client: ClientInfo,

    #[serde(rename = "typeTravaux")]
    pub work_type: String,

    /// Defaults to the creation day when absent.
    #[serde(rename = "dateDevis", default)]
    pub issue_date: Option<NaiveDate>,

    /// Defaults to the issue date plus the configured validity period.
    #[serde(rename = "dateValidite", default)]
    pub valid_until: Option<NaiveDate>,

    #[serde(rename = "dateDebutTravaux", default)]
    pub work_start: Option<NaiveDate>,

    /// Falls back to the configured default rate when absent.
    #[serde(rename = "tauxTVA", default)]
    pub vat_rate: Option<Decimal>,

    #[serde(rename = "statut", default)]
    pub status: Option<QuoteStatus>,

    #[serde(rename = "materiaux", default)]
    pub materials: Option<String>,

    #[serde(default)]
    pub notes: Option<String>,

    /// Pre-tax amount for a quote without lines.
    #[serde(rename = "montant", default)]
    pub amount_ht: Option<Decimal>,

    #[serde(rename = "lignes", default)]
    pub lines: Vec<NewLine>,

    /// Original PDF bytes, kept when the quote comes from a PDF import.
    #[serde(skip)]
    pub pdf_original: Option<Vec<u8>>,

    #[serde(rename = "nomFichierPDF", default)]
    pub pdf_file_name: Option<String>,
}

/// Partial update of a quote. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteUpdate {
    #[serde(rename = "client", default)]
    pub client: Option<String>,

    #[serde(rename = "clientAdresse", default)]
    pub client_address: Option<String>,

    #[serde(rename = "clientTelephone", default)]
    pub client_phone: Option<String>,

    #[serde(rename = "clientEmail", default)]
    pub client_email: Option<String>,

    #[serde(rename = "clientSiret", default)]
    pub client_siret: Option<String>,

    #[serde(rename = "typeTravaux", default)]
    pub work_type: Option<String>,

    #[serde(rename = "dateDevis", default)]
    pub issue_date: Option<NaiveDate>,

    #[serde(rename = "dateValidite", default)]
    pub valid_until: Option<NaiveDate>,

    #[serde(rename = "dateDebutTravaux", default)]
    pub work_start: Option<NaiveDate>,

    #[serde(rename = "tauxTVA", default)]
    pub vat_rate: Option<Decimal>,

    #[serde(rename = "statut", default)]
    pub status: Option<QuoteStatus>,

    /// An empty string clears the field.
    #[serde(rename = "materiaux", default)]
    pub materials: Option<String>,

    /// An empty string clears the field.
    #[serde(default)]
    pub notes: Option<String>,

    /// New pre-tax amount; only applies to a quote without lines.
    #[serde(rename = "montant", default)]
    pub amount_ht: Option<Decimal>,

    /// Replaces all lines when present.
    #[serde(rename = "lignes", default)]
    pub lines: Option<Vec<NewLine>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_parsing() {
        assert_eq!(QuoteStatus::parse("brouillon"), Some(QuoteStatus::Draft));
        assert_eq!(QuoteStatus::parse("  Accepté "), Some(QuoteStatus::Accepted));
        assert_eq!(QuoteStatus::parse("EN COURS"), Some(QuoteStatus::InProgress));
        assert_eq!(QuoteStatus::parse("en attente"), Some(QuoteStatus::Draft));
        assert_eq!(QuoteStatus::parse("validé"), Some(QuoteStatus::Accepted));
        assert_eq!(QuoteStatus::parse("perdu"), None);
    }

    #[test]
    fn test_status_labels_round_trip() {
        for status in QuoteStatus::ALL {
            assert_eq!(QuoteStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_new_quote_from_json() {
        let json = r#"{
            "client": "Martin SARL",
            "clientEmail": "contact@martin.fr",
            "typeTravaux": "Rénovation",
            "dateDevis": "2024-03-15",
            "statut": "Envoyé",
            "lignes": [
                { "description": "Gros oeuvre", "isSection": true },
                { "description": "Dalle béton", "quantite": 12.5, "unite": "m²", "prixUnitaire": 85 }
            ]
        }"#;

        let quote: NewQuote = serde_json::from_str(json).unwrap();
        assert_eq!(quote.client.name, "Martin SARL");
        assert_eq!(quote.client.email.as_deref(), Some("contact@martin.fr"));
        assert_eq!(quote.status, Some(QuoteStatus::Sent));
        assert_eq!(quote.lines.len(), 2);
        assert!(quote.lines[0].is_section);
        assert_eq!(quote.lines[1].unit, "m²");
        assert_eq!(quote.lines[1].quantity, Decimal::new(125, 1));
        assert_eq!(quote.issue_date, NaiveDate::from_ymd_opt(2024, 3, 15));
    }

    #[test]
    fn test_line_unit_defaults() {
        let line: NewLine = serde_json::from_str(r#"{ "description": "Pose" }"#).unwrap();
        assert_eq!(line.unit, DEFAULT_UNIT);
        assert_eq!(line.quantity, Decimal::ZERO);
        assert!(!line.is_section);
    }
}
