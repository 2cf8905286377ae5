//! Quote lifecycle: validation, pricing, numbering and persistence.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::error::{DevisError, ExtractionError, Result};
use crate::extraction::{DraftRecord, QuoteExtractor, QuoteTextParser};
use crate::models::config::QuoteDefaults;
use crate::models::quote::{LineItem, NewLine, NewQuote, Quote, QuoteUpdate, DEFAULT_UNIT};
use crate::numbering::NumberAllocator;
use crate::pdf::{PdfExtractor, PdfType};
use crate::pricing::{self, Amounts};
use crate::store::{Database, StoredPdf};

/// Quote operations over a database, with the configured defaults.
pub struct QuoteService {
    db: Database,
    defaults: QuoteDefaults,
    allocator: NumberAllocator,
}

impl QuoteService {
    pub fn new(db: Database, defaults: QuoteDefaults) -> Self {
        let allocator = NumberAllocator::new(defaults.number_prefix.clone());
        Self {
            db,
            defaults,
            allocator,
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn defaults(&self) -> &QuoteDefaults {
        &self.defaults
    }

    /// Validate, price, number and store a new quote.
    pub fn create(&mut self, input: NewQuote, now: NaiveDateTime) -> Result<Quote> {
        self.create_with_totals(input, None, now)
    }

    fn create_with_totals(
        &mut self,
        input: NewQuote,
        stated_totals: Option<Amounts>,
        now: NaiveDateTime,
    ) -> Result<Quote> {
        let now = truncate_seconds(now);
        let today = now.date();

        let name = required("client", &input.client.name)?;
        let work_type = required("typeTravaux", &input.work_type)?;
        let vat_rate = input.vat_rate.unwrap_or(self.defaults.default_vat_rate);
        check_rate("tauxTVA", vat_rate)?;

        let issue_date = input.issue_date.unwrap_or(today);
        let had_lines = !input.lines.is_empty();
        let lines = build_lines(input.lines, vat_rate)?;
        if had_lines && lines.is_empty() {
            return Err(DevisError::validation(
                "lignes",
                "au moins une ligne doit avoir une description",
            ));
        }

        let totals = if !lines.is_empty() {
            pricing::compute_totals(lines.iter().map(|l| &l.amounts))
        } else if let Some(stated) = stated_totals {
            stated
        } else {
            let ht = input.amount_ht.unwrap_or(Decimal::ZERO);
            if ht < Decimal::ZERO {
                return Err(DevisError::validation("montant", "le montant doit être positif"));
            }
            pricing::from_ht(ht, vat_rate)
        };

        let mut client = input.client;
        client.name = name;

        let quote = Quote {
            number: String::new(),
            client,
            work_type,
            issue_date,
            valid_until: input
                .valid_until
                .or_else(|| self.defaults.valid_until(issue_date)),
            work_start: input.work_start,
            vat_rate,
            totals,
            status: input.status.unwrap_or_default(),
            materials: non_blank(input.materials),
            notes: non_blank(input.notes).or_else(|| self.defaults.notes()),
            pdf_file_name: input.pdf_file_name,
            lines,
            created_at: now,
            updated_at: now,
        };

        self.db
            .insert_quote(quote, input.pdf_original.as_deref(), &self.allocator, today)
    }

    /// Quote by number.
    pub fn get(&self, number: &str) -> Result<Quote> {
        self.db
            .get_quote(number)?
            .ok_or_else(|| DevisError::NotFound(format!("devis {}", number)))
    }

    /// Apply a partial update.
    ///
    /// New lines replace the old ones and reprice the quote. A quote without
    /// lines is repriced from its HT when the rate or amount changes.
    pub fn update(&mut self, number: &str, update: QuoteUpdate, now: NaiveDateTime) -> Result<Quote> {
        let mut quote = self.get(number)?;

        if let Some(name) = update.client {
            quote.client.name = required("client", &name)?;
        }
        if let Some(address) = update.client_address {
            quote.client.address = non_blank(Some(address));
        }
        if let Some(phone) = update.client_phone {
            quote.client.phone = non_blank(Some(phone));
        }
        if let Some(email) = update.client_email {
            quote.client.email = non_blank(Some(email));
        }
        if let Some(siret) = update.client_siret {
            quote.client.siret = non_blank(Some(siret));
        }
        if let Some(work_type) = update.work_type {
            quote.work_type = required("typeTravaux", &work_type)?;
        }
        if let Some(date) = update.issue_date {
            quote.issue_date = date;
        }
        if update.valid_until.is_some() {
            quote.valid_until = update.valid_until;
        }
        if update.work_start.is_some() {
            quote.work_start = update.work_start;
        }
        if let Some(status) = update.status {
            quote.status = status;
        }
        if let Some(materials) = update.materials {
            quote.materials = non_blank(Some(materials));
        }
        if let Some(notes) = update.notes {
            quote.notes = non_blank(Some(notes));
        }

        let rate_changed = match update.vat_rate {
            Some(rate) if rate != quote.vat_rate => {
                check_rate("tauxTVA", rate)?;
                quote.vat_rate = rate;
                true
            }
            _ => false,
        };

        let replace_lines = update.lines.is_some();
        if let Some(lines) = update.lines {
            quote.lines = build_lines(lines, quote.vat_rate)?;
            quote.totals = pricing::compute_totals(quote.lines.iter().map(|l| &l.amounts));
            if update.amount_ht.is_some() {
                warn!("Ignoring montant on {}: totals come from its lines", number);
            }
        } else if quote.lines.is_empty() {
            if rate_changed || update.amount_ht.is_some() {
                let ht = update.amount_ht.unwrap_or(quote.totals.ht);
                quote.totals = pricing::from_ht(ht, quote.vat_rate);
            }
        } else if update.amount_ht.is_some() {
            return Err(DevisError::validation(
                "montant",
                "le montant d'un devis avec lignes est calculé depuis ses lignes",
            ));
        }

        quote.updated_at = truncate_seconds(now);
        self.db.update_quote(&quote, replace_lines)?;
        info!("Updated quote {}", number);
        Ok(quote)
    }

    /// Delete a quote and its lines.
    pub fn delete(&mut self, number: &str) -> Result<()> {
        if !self.db.delete_quote(number)? {
            return Err(DevisError::NotFound(format!("devis {}", number)));
        }
        info!("Deleted quote {}", number);
        Ok(())
    }

    /// Original PDF of an imported quote.
    pub fn original_pdf(&self, number: &str) -> Result<StoredPdf> {
        self.db.original_pdf(number)
    }

    /// Draft quote read from PDF bytes, using the configured default rate.
    pub fn draft_from_pdf(&self, data: &[u8], today: NaiveDate) -> Result<DraftRecord> {
        draft_from_pdf(data, &self.defaults, today)
    }

    /// Store a draft as a new quote, along with the PDF it came from.
    ///
    /// Without priced lines the document's own totals are kept as read.
    pub fn import_draft(
        &mut self,
        draft: &DraftRecord,
        pdf: Option<(&[u8], &str)>,
        now: NaiveDateTime,
    ) -> Result<Quote> {
        let mut input = draft.to_new_quote()?;
        if let Some((data, file_name)) = pdf {
            input.pdf_original = Some(data.to_vec());
            input.pdf_file_name = Some(file_name.to_string());
        }

        let stated = (!draft.has_priced_lines()).then_some(draft.totals);
        self.create_with_totals(input, stated, now)
    }

    /// Extract a quote from a PDF and store it with the original file.
    pub fn import_pdf(&mut self, data: &[u8], file_name: &str, now: NaiveDateTime) -> Result<Quote> {
        let draft = self.draft_from_pdf(data, now.date())?;
        debug!("Draft from {}: client {}, TTC {}", file_name, draft.client, draft.totals.ttc);
        self.import_draft(&draft, Some((data, file_name)), now)
    }
}

/// Extract a draft quote from PDF bytes.
pub fn draft_from_pdf(data: &[u8], defaults: &QuoteDefaults, today: NaiveDate) -> Result<DraftRecord> {
    let content = PdfExtractor::from_bytes(data)?;
    if content.pdf_type == PdfType::Empty {
        // Scanned pages carry no text layer.
        return Err(ExtractionError::NoText.into());
    }
    debug!("Read {} pages of text", content.page_count);

    let parser = QuoteTextParser::new()
        .with_default_vat_rate(defaults.default_vat_rate)
        .with_today(today);
    Ok(parser.extract_from_text(&content.text)?)
}

/// Priced lines in display order. Lines without a description are dropped.
fn build_lines(lines: Vec<NewLine>, quote_rate: Decimal) -> Result<Vec<LineItem>> {
    let mut items = Vec::with_capacity(lines.len());

    for (index, line) in lines.into_iter().enumerate() {
        let description = line.description.trim();
        if description.is_empty() {
            continue;
        }

        let field = format!("lignes[{}]", index);
        if !line.is_section {
            if line.quantity < Decimal::ZERO {
                return Err(DevisError::validation(field, "quantité négative"));
            }
            if line.unit_price < Decimal::ZERO {
                return Err(DevisError::validation(field, "prix unitaire négatif"));
            }
        }

        let vat_rate = line.vat_rate.unwrap_or(quote_rate);
        check_rate(&field, vat_rate)?;

        let unit = match line.unit.trim() {
            "" if !line.is_section => DEFAULT_UNIT.to_string(),
            unit => unit.to_string(),
        };

        let order = items.len() as u32;
        items.push(LineItem {
            description: description.to_string(),
            quantity: line.quantity,
            unit,
            unit_price: line.unit_price,
            vat_rate,
            amounts: pricing::line_amounts(
                line.quantity,
                line.unit_price,
                vat_rate,
                line.stated_ht,
                line.is_section,
            ),
            order,
            is_section: line.is_section,
        });
    }

    Ok(items)
}

fn required(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DevisError::validation(field, "champ obligatoire"));
    }
    Ok(value.to_string())
}

fn check_rate(field: &str, rate: Decimal) -> Result<()> {
    if rate < Decimal::ZERO || rate > Decimal::ONE_HUNDRED {
        return Err(DevisError::validation(
            field,
            format!("taux de TVA hors limites: {}", rate),
        ));
    }
    Ok(())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Stored timestamps have second precision.
fn truncate_seconds(at: NaiveDateTime) -> NaiveDateTime {
    at.with_nanosecond(0).unwrap_or(at)
}
