//! Heuristic quote parser over PDF text.

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::models::quote::{LineItem, QuoteStatus, DEFAULT_UNIT};
use crate::pricing::{self, Amounts};

use super::rules::{
    extract_affair_reference, extract_client, extract_company, extract_followed_by,
    extract_place_date, extract_table_rows, extract_totals, StatedTotals, TableRow,
};
use super::{DraftRecord, QuoteExtractor};

/// Client name used when the document names none.
pub const CLIENT_PLACEHOLDER: &str = "Client non spécifié";

/// Work type used when the document has no affair reference.
pub const DEFAULT_WORK_TYPE: &str = "Travaux";

/// Quote parser running independent field rules over the whole text.
pub struct QuoteTextParser {
    /// Rate used when the document states none.
    default_vat_rate: Decimal,
    default_work_type: String,
    /// Date used when the document has no place/date line; `None` is today.
    today: Option<NaiveDate>,
}

impl QuoteTextParser {
    /// Create a parser with a 20% default rate.
    pub fn new() -> Self {
        Self {
            default_vat_rate: Decimal::new(20, 0),
            default_work_type: DEFAULT_WORK_TYPE.to_string(),
            today: None,
        }
    }

    /// Set the VAT rate assumed when the document states none.
    pub fn with_default_vat_rate(mut self, rate: Decimal) -> Self {
        self.default_vat_rate = rate;
        self
    }

    /// Set the work type used without an affair reference.
    pub fn with_default_work_type(mut self, work_type: impl Into<String>) -> Self {
        self.default_work_type = work_type.into();
        self
    }

    /// Pin the fallback date instead of reading the clock.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    fn build_lines(&self, rows: Vec<TableRow>, vat_rate: Decimal) -> Vec<LineItem> {
        rows.into_iter()
            .zip(0u32..)
            .map(|(row, order)| match row {
                TableRow::Section { description } => LineItem {
                    description,
                    quantity: Decimal::ZERO,
                    unit: String::new(),
                    unit_price: Decimal::ZERO,
                    vat_rate,
                    amounts: Amounts::ZERO,
                    order,
                    is_section: true,
                },
                TableRow::Priced {
                    description,
                    quantity,
                    unit,
                    unit_price,
                    stated_ht,
                } => LineItem {
                    description,
                    quantity,
                    unit: if unit.is_empty() {
                        DEFAULT_UNIT.to_string()
                    } else {
                        unit
                    },
                    unit_price,
                    vat_rate,
                    amounts: pricing::line_amounts(quantity, unit_price, vat_rate, stated_ht, false),
                    order,
                    is_section: false,
                },
            })
            .collect()
    }
}

impl Default for QuoteTextParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Quote-level figures from the stated totals, deriving what is missing.
fn derive_totals(stated: &StatedTotals, vat_rate: Decimal) -> Amounts {
    let round = pricing::round_cents;

    match (stated.total_ht, stated.vat_amount, stated.total_ttc) {
        (None, _, Some(ttc)) => pricing::from_ttc(ttc, vat_rate),
        (Some(ht), Some(tva), Some(ttc)) => Amounts {
            ht: round(ht),
            tva: round(tva),
            ttc: round(ttc),
        },
        (Some(ht), None, Some(ttc)) => Amounts {
            ht: round(ht),
            tva: round(ttc - ht),
            ttc: round(ttc),
        },
        (Some(ht), Some(tva), None) => Amounts {
            ht: round(ht),
            tva: round(tva),
            ttc: round(ht + tva),
        },
        (Some(ht), None, None) => pricing::from_ht(ht, vat_rate),
        (None, _, None) => Amounts::ZERO,
    }
}

impl QuoteExtractor for QuoteTextParser {
    fn extract(&self, text: &str) -> Option<DraftRecord> {
        info!("Parsing quote from {} characters of text", text.len());

        let affair_reference = extract_affair_reference(text);
        let followed_by = extract_followed_by(text);
        let place_date = extract_place_date(text);
        let company = extract_company(text);
        let company_name = company.as_ref().map(|c| c.name.clone());

        let client = extract_client(text, company_name.as_deref())
            .or_else(|| affair_reference.clone())
            .or_else(|| company_name.clone());
        let has_client = client.is_some();

        let stated = extract_totals(text);
        let vat_rate = stated.vat_rate.unwrap_or(self.default_vat_rate);
        let mut totals = derive_totals(&stated, vat_rate);

        let lines = self.build_lines(extract_table_rows(text), vat_rate);
        let priced = lines.iter().filter(|l| !l.is_section).count();
        if totals.ttc.is_zero() && priced > 0 {
            totals = pricing::compute_totals(lines.iter().map(|l| &l.amounts));
        }

        if !has_client && totals.ttc.is_zero() {
            debug!("No client and no total found, document is unparseable");
            return None;
        }

        let issue_date = place_date
            .as_ref()
            .map(|pd| pd.iso_date.clone())
            .unwrap_or_else(|| self.today().format("%Y-%m-%d").to_string());

        debug!(
            "Extracted draft for {:?}: {} lines ({} priced), TTC {}",
            client, lines.len(), priced, totals.ttc
        );

        Some(DraftRecord {
            client: client.unwrap_or_else(|| CLIENT_PLACEHOLDER.to_string()),
            work_type: affair_reference
                .clone()
                .unwrap_or_else(|| self.default_work_type.clone()),
            issue_date,
            vat_rate,
            totals,
            status: QuoteStatus::Draft,
            company: company_name,
            company_address: company.and_then(|c| c.address),
            affair_reference,
            followed_by,
            place: place_date.map(|pd| pd.place),
            lines,
        })
    }
}
