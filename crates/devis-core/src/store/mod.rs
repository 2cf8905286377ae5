//! SQLite persistence for quotes and their lines.

pub mod filter;
mod schema;
mod sql;

pub use filter::{Page, Pagination, QuoteFilter, SortField, SortOrder};

use std::path::Path;

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{DevisError, Result};
use crate::models::quote::{ClientInfo, LineItem, Quote, QuoteStatus};
use crate::numbering::{format_number, NumberAllocator, NumberStore};
use crate::pricing::Amounts;

use sql::{
    date_text, datetime_text, from_cents, to_cents, DateText, DateTimeText, DecimalText,
};

/// Attempts at inserting after the allocated number turned out to be taken.
const MAX_NUMBER_CONFLICTS: u32 = 10;

const QUOTE_COLUMNS: &str = "id, numero_devis, client, client_adresse, client_telephone, \
    client_email, client_siret, type_travaux, date_devis, date_validite, date_debut_travaux, \
    taux_tva, montant_ht, montant_tva, montant_ttc, statut, materiaux, notes, nom_fichier_pdf, \
    created_at, updated_at";

/// Original PDF of an imported quote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPdf {
    pub file_name: String,
    pub data: Vec<u8>,
}

/// Distinct values for filter autocompletion.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    pub clients: Vec<String>,
    #[serde(rename = "typeTravaux")]
    pub work_types: Vec<String>,
    #[serde(rename = "statuts")]
    pub statuses: Vec<QuoteStatus>,
    #[serde(rename = "materiaux")]
    pub materials: Vec<String>,
}

/// Quote database.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database file at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        debug!("Opening database at {}", path.display());
        Self::init(Connection::open(path)?)
    }

    /// Fresh database held in memory.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        schema::create_tables(&conn)?;
        Ok(Self { conn })
    }

    /// Allocate a number for `quote` and insert it with its lines.
    ///
    /// Allocation and insert share one write transaction. If the number is
    /// taken anyway, the insert continues after the greatest numeric
    /// sequence of the year.
    pub fn insert_quote(
        &mut self,
        mut quote: Quote,
        pdf_original: Option<&[u8]>,
        allocator: &NumberAllocator,
        today: NaiveDate,
    ) -> Result<Quote> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let prefix = allocator.year_prefix(today);
        quote.number = allocator.allocate(&*tx, today)?;

        let mut conflicts = 0;
        loop {
            match insert_rows(&tx, &quote, pdf_original) {
                Ok(()) => break,
                Err(DevisError::Storage(ref e))
                    if is_unique_violation(e) && conflicts < MAX_NUMBER_CONFLICTS =>
                {
                    conflicts += 1;
                    let next = match greatest_sequence(&tx, &prefix)? {
                        Some(n) => n.checked_add(1).ok_or_else(|| {
                            DevisError::Config(format!("sequence exhausted for {}", prefix))
                        })?,
                        None => 1,
                    };
                    warn!("Number {} already taken, trying the next one", quote.number);
                    quote.number = format_number(&prefix, next);
                }
                Err(e) => return Err(e),
            }
        }

        tx.commit()?;
        info!("Created quote {} for {}", quote.number, quote.client.name);
        Ok(quote)
    }

    /// Quote with its lines.
    pub fn get_quote(&self, number: &str) -> Result<Option<Quote>> {
        let found = self
            .conn
            .query_row(
                &format!("SELECT {QUOTE_COLUMNS} FROM devis WHERE numero_devis = ?1"),
                params![number],
                quote_from_row,
            )
            .optional()?;

        match found {
            Some((id, mut quote)) => {
                quote.lines = load_lines(&self.conn, id)?;
                Ok(Some(quote))
            }
            None => Ok(None),
        }
    }

    /// Overwrite the stored fields of `quote`, and its lines when `replace_lines`.
    pub fn update_quote(&mut self, quote: &Quote, replace_lines: bool) -> Result<()> {
        let tx = self.conn.transaction()?;

        let id: i64 = tx
            .query_row(
                "SELECT id FROM devis WHERE numero_devis = ?1",
                params![quote.number],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| DevisError::NotFound(format!("devis {}", quote.number)))?;

        tx.execute(
            "UPDATE devis SET client = ?2, client_adresse = ?3, client_telephone = ?4,
                client_email = ?5, client_siret = ?6, type_travaux = ?7, date_devis = ?8,
                date_validite = ?9, date_debut_travaux = ?10, taux_tva = ?11, montant_ht = ?12,
                montant_tva = ?13, montant_ttc = ?14, statut = ?15, materiaux = ?16, notes = ?17,
                updated_at = ?18
             WHERE id = ?1",
            params![
                id,
                quote.client.name,
                quote.client.address,
                quote.client.phone,
                quote.client.email,
                quote.client.siret,
                quote.work_type,
                date_text(quote.issue_date),
                quote.valid_until.map(date_text),
                quote.work_start.map(date_text),
                quote.vat_rate.to_string(),
                to_cents(quote.totals.ht)?,
                to_cents(quote.totals.tva)?,
                to_cents(quote.totals.ttc)?,
                quote.status,
                quote.materials,
                quote.notes,
                datetime_text(quote.updated_at),
            ],
        )?;

        if replace_lines {
            tx.execute("DELETE FROM lignes_devis WHERE devis_id = ?1", params![id])?;
            insert_lines(&tx, id, &quote.lines)?;
        }

        tx.commit()?;
        debug!("Updated quote {} (lines replaced: {})", quote.number, replace_lines);
        Ok(())
    }

    /// Delete a quote and its lines. Returns whether it existed.
    pub fn delete_quote(&mut self, number: &str) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM devis WHERE numero_devis = ?1", params![number])?;
        Ok(deleted > 0)
    }

    /// Original PDF stored with an imported quote.
    pub fn original_pdf(&self, number: &str) -> Result<StoredPdf> {
        let row: Option<(Option<Vec<u8>>, Option<String>)> = self
            .conn
            .query_row(
                "SELECT pdf_original, nom_fichier_pdf FROM devis WHERE numero_devis = ?1",
                params![number],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let (data, file_name) =
            row.ok_or_else(|| DevisError::NotFound(format!("devis {}", number)))?;
        let data = data
            .filter(|d| !d.is_empty())
            .ok_or_else(|| DevisError::NotFound(format!("PDF original du devis {}", number)))?;

        Ok(StoredPdf {
            file_name: file_name.unwrap_or_else(|| format!("devis-{}.pdf", number)),
            data,
        })
    }

    /// Every quote, newest first. Lines are loaded only when `with_lines`.
    pub fn all_quotes(&self, with_lines: bool) -> Result<Vec<Quote>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {QUOTE_COLUMNS} FROM devis ORDER BY date_devis DESC, numero_devis DESC"
        ))?;
        let rows = stmt
            .query_map([], quote_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut quotes = Vec::with_capacity(rows.len());
        for (id, mut quote) in rows {
            if with_lines {
                quote.lines = load_lines(&self.conn, id)?;
            }
            quotes.push(quote);
        }
        Ok(quotes)
    }

    /// One page of the filtered listing, without lines.
    pub fn list_quotes(&self, filter: &QuoteFilter, pagination: Pagination) -> Result<Page<Quote>> {
        let matching = filter.apply(self.all_quotes(false)?);
        Ok(pagination.paginate(matching))
    }

    /// Every matching quote with its lines.
    pub fn filtered_quotes(&self, filter: &QuoteFilter) -> Result<Vec<Quote>> {
        Ok(filter.apply(self.all_quotes(true)?))
    }

    /// Distinct clients, work types, statuses and materials, sorted.
    pub fn options(&self) -> Result<FilterOptions> {
        Ok(FilterOptions {
            clients: self.distinct("SELECT DISTINCT client FROM devis ORDER BY client")?,
            work_types: self
                .distinct("SELECT DISTINCT type_travaux FROM devis ORDER BY type_travaux")?,
            statuses: self.distinct("SELECT DISTINCT statut FROM devis ORDER BY statut")?,
            materials: self.distinct(
                "SELECT DISTINCT materiaux FROM devis WHERE materiaux IS NOT NULL ORDER BY materiaux",
            )?,
        })
    }

    fn distinct<T: rusqlite::types::FromSql>(&self, sql: &str) -> Result<Vec<T>> {
        let mut stmt = self.conn.prepare(sql)?;
        let values = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<T>>>()?;
        Ok(values)
    }
}

impl NumberStore for Connection {
    fn greatest_number_with_prefix(&self, prefix: &str) -> Result<Option<String>> {
        let number = self
            .query_row(
                "SELECT numero_devis FROM devis
                 WHERE substr(numero_devis, 1, length(?1)) = ?1
                 ORDER BY numero_devis DESC
                 LIMIT 1",
                params![prefix],
                |row| row.get(0),
            )
            .optional()?;
        Ok(number)
    }
}

impl NumberStore for Database {
    fn greatest_number_with_prefix(&self, prefix: &str) -> Result<Option<String>> {
        self.conn.greatest_number_with_prefix(prefix)
    }
}

/// Greatest all-digit sequence under `prefix`, ignoring malformed numbers.
fn greatest_sequence(conn: &Connection, prefix: &str) -> Result<Option<u32>> {
    let greatest: Option<i64> = conn.query_row(
        "SELECT MAX(CAST(substr(numero_devis, length(?1) + 1) AS INTEGER)) FROM devis
         WHERE substr(numero_devis, 1, length(?1)) = ?1
           AND length(numero_devis) > length(?1)
           AND substr(numero_devis, length(?1) + 1) NOT GLOB '*[^0-9]*'",
        params![prefix],
        |row| row.get(0),
    )?;

    greatest
        .map(|n| {
            u32::try_from(n)
                .map_err(|_| DevisError::Config(format!("sequence out of range: {}{}", prefix, n)))
        })
        .transpose()
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn insert_rows(conn: &Connection, quote: &Quote, pdf_original: Option<&[u8]>) -> Result<()> {
    conn.execute(
        "INSERT INTO devis (numero_devis, client, client_adresse, client_telephone, client_email,
            client_siret, type_travaux, date_devis, date_validite, date_debut_travaux, taux_tva,
            montant_ht, montant_tva, montant_ttc, statut, materiaux, notes, pdf_original,
            nom_fichier_pdf, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17,
            ?18, ?19, ?20, ?21)",
        params![
            quote.number,
            quote.client.name,
            quote.client.address,
            quote.client.phone,
            quote.client.email,
            quote.client.siret,
            quote.work_type,
            date_text(quote.issue_date),
            quote.valid_until.map(date_text),
            quote.work_start.map(date_text),
            quote.vat_rate.to_string(),
            to_cents(quote.totals.ht)?,
            to_cents(quote.totals.tva)?,
            to_cents(quote.totals.ttc)?,
            quote.status,
            quote.materials,
            quote.notes,
            pdf_original,
            quote.pdf_file_name,
            datetime_text(quote.created_at),
            datetime_text(quote.updated_at),
        ],
    )?;

    insert_lines(conn, conn.last_insert_rowid(), &quote.lines)
}

fn insert_lines(conn: &Connection, quote_id: i64, lines: &[LineItem]) -> Result<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO lignes_devis (devis_id, description, quantite, unite, prix_unitaire,
            taux_tva, montant_ht, montant_tva, montant_ttc, ordre, is_section)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
    )?;

    for line in lines {
        stmt.execute(params![
            quote_id,
            line.description,
            line.quantity.to_string(),
            line.unit,
            line.unit_price.to_string(),
            line.vat_rate.to_string(),
            to_cents(line.amounts.ht)?,
            to_cents(line.amounts.tva)?,
            to_cents(line.amounts.ttc)?,
            line.order,
            line.is_section,
        ])?;
    }
    Ok(())
}

fn load_lines(conn: &Connection, quote_id: i64) -> Result<Vec<LineItem>> {
    let mut stmt = conn.prepare_cached(
        "SELECT description, quantite, unite, prix_unitaire, taux_tva, montant_ht, montant_tva,
            montant_ttc, ordre, is_section
         FROM lignes_devis WHERE devis_id = ?1 ORDER BY ordre, id",
    )?;

    let lines = stmt
        .query_map(params![quote_id], |row| {
            Ok(LineItem {
                description: row.get(0)?,
                quantity: row.get::<_, DecimalText>(1)?.0,
                unit: row.get(2)?,
                unit_price: row.get::<_, DecimalText>(3)?.0,
                vat_rate: row.get::<_, DecimalText>(4)?.0,
                amounts: Amounts {
                    ht: from_cents(row.get(5)?),
                    tva: from_cents(row.get(6)?),
                    ttc: from_cents(row.get(7)?),
                },
                order: row.get(8)?,
                is_section: row.get(9)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(lines)
}

fn quote_from_row(row: &Row<'_>) -> rusqlite::Result<(i64, Quote)> {
    let quote = Quote {
        number: row.get(1)?,
        client: ClientInfo {
            name: row.get(2)?,
            address: row.get(3)?,
            phone: row.get(4)?,
            email: row.get(5)?,
            siret: row.get(6)?,
        },
        work_type: row.get(7)?,
        issue_date: row.get::<_, DateText>(8)?.0,
        valid_until: row.get::<_, Option<DateText>>(9)?.map(|d| d.0),
        work_start: row.get::<_, Option<DateText>>(10)?.map(|d| d.0),
        vat_rate: row.get::<_, DecimalText>(11)?.0,
        totals: Amounts {
            ht: from_cents(row.get(12)?),
            tva: from_cents(row.get(13)?),
            ttc: from_cents(row.get(14)?),
        },
        status: row.get(15)?,
        materials: row.get(16)?,
        notes: row.get(17)?,
        pdf_file_name: row.get(18)?,
        lines: Vec::new(),
        created_at: row.get::<_, DateTimeText>(19)?.0,
        updated_at: row.get::<_, DateTimeText>(20)?.0,
    };
    Ok((row.get(0)?, quote))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::compute_line;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 2).unwrap()
    }

    fn sample_quote() -> Quote {
        let created_at = today().and_hms_opt(10, 30, 0).unwrap();
        let line = LineItem {
            description: "Dalle béton".to_string(),
            quantity: d("12.5"),
            unit: "m²".to_string(),
            unit_price: d("85"),
            vat_rate: d("20"),
            amounts: compute_line(d("12.5"), d("85"), d("20")),
            order: 1,
            is_section: false,
        };
        let section = LineItem {
            description: "Gros oeuvre".to_string(),
            quantity: Decimal::ZERO,
            unit: String::new(),
            unit_price: Decimal::ZERO,
            vat_rate: d("20"),
            amounts: Amounts::ZERO,
            order: 0,
            is_section: true,
        };
        Quote {
            number: String::new(),
            client: ClientInfo {
                name: "Martin SARL".to_string(),
                email: Some("contact@martin.fr".to_string()),
                ..ClientInfo::default()
            },
            work_type: "Maçonnerie".to_string(),
            issue_date: today(),
            valid_until: NaiveDate::from_ymd_opt(2024, 5, 2),
            work_start: None,
            vat_rate: d("20"),
            totals: line.amounts,
            status: QuoteStatus::Sent,
            materials: Some("Béton".to_string()),
            notes: None,
            pdf_file_name: None,
            lines: vec![line, section],
            created_at,
            updated_at: created_at,
        }
    }

    #[test]
    fn test_insert_and_get_round_trip() {
        let mut db = Database::open_in_memory().unwrap();
        let inserted = db
            .insert_quote(sample_quote(), None, &NumberAllocator::default(), today())
            .unwrap();
        assert_eq!(inserted.number, "DEV-2024-001");

        let loaded = db.get_quote("DEV-2024-001").unwrap().unwrap();
        assert_eq!(loaded.client, inserted.client);
        assert_eq!(loaded.totals, inserted.totals);
        assert_eq!(loaded.status, QuoteStatus::Sent);
        assert_eq!(loaded.valid_until, inserted.valid_until);
        assert_eq!(loaded.created_at, inserted.created_at);

        // Lines come back in display order.
        assert_eq!(loaded.lines.len(), 2);
        assert!(loaded.lines[0].is_section);
        assert_eq!(loaded.lines[1].quantity, d("12.5"));
        assert_eq!(loaded.lines[1].amounts.ttc, d("1275.00"));
    }

    #[test]
    fn test_sequential_numbers_and_no_reuse_below_max() {
        let mut db = Database::open_in_memory().unwrap();
        let allocator = NumberAllocator::default();
        for _ in 0..3 {
            db.insert_quote(sample_quote(), None, &allocator, today()).unwrap();
        }
        assert!(db.delete_quote("DEV-2024-002").unwrap());

        let next = db.insert_quote(sample_quote(), None, &allocator, today()).unwrap();
        assert_eq!(next.number, "DEV-2024-004");
    }

    #[test]
    fn test_conflict_moves_to_next_number() {
        let mut db = Database::open_in_memory().unwrap();
        let allocator = NumberAllocator::default();

        let mut existing = sample_quote();
        existing.number = "DEV-2024-001".to_string();
        insert_rows(&db.conn, &existing, None).unwrap();
        existing.number = "DEV-2024-abc".to_string();
        insert_rows(&db.conn, &existing, None).unwrap();

        // The greatest number is malformed, so allocation restarts at 001.
        let inserted = db.insert_quote(sample_quote(), None, &allocator, today()).unwrap();
        assert_eq!(inserted.number, "DEV-2024-002");
    }

    fn insert_existing(db: &Database, numbers: &[&str]) {
        let mut existing = sample_quote();
        for number in numbers {
            existing.number = number.to_string();
            insert_rows(&db.conn, &existing, None).unwrap();
        }
    }

    #[test]
    fn test_malformed_number_does_not_block_a_full_year() {
        let mut db = Database::open_in_memory().unwrap();
        let numbers: Vec<String> = (1..=15).map(|n| format!("DEV-2024-{:03}", n)).collect();
        let mut all: Vec<&str> = numbers.iter().map(String::as_str).collect();
        all.push("DEV-2024-abc");
        insert_existing(&db, &all);

        let inserted = db
            .insert_quote(sample_quote(), None, &NumberAllocator::default(), today())
            .unwrap();
        assert_eq!(inserted.number, "DEV-2024-016");
    }

    #[test]
    fn test_greatest_number_is_lexicographic() {
        let mut db = Database::open_in_memory().unwrap();
        insert_existing(&db, &["DEV-2024-007", "DEV-2024-x"]);

        assert_eq!(
            db.greatest_number_with_prefix("DEV-2024-").unwrap().as_deref(),
            Some("DEV-2024-x")
        );
        let inserted = db
            .insert_quote(sample_quote(), None, &NumberAllocator::default(), today())
            .unwrap();
        assert_eq!(inserted.number, "DEV-2024-001");
    }

    #[test]
    fn test_sequence_continues_past_999() {
        let mut db = Database::open_in_memory().unwrap();
        insert_existing(&db, &["DEV-2024-999", "DEV-2024-1000"]);

        // "999" sorts after "1000", so the first candidate is taken.
        let inserted = db
            .insert_quote(sample_quote(), None, &NumberAllocator::default(), today())
            .unwrap();
        assert_eq!(inserted.number, "DEV-2024-1001");
    }

    #[test]
    fn test_update_replaces_lines() {
        let mut db = Database::open_in_memory().unwrap();
        let mut quote = db
            .insert_quote(sample_quote(), None, &NumberAllocator::default(), today())
            .unwrap();

        quote.status = QuoteStatus::Accepted;
        quote.lines.truncate(1);
        db.update_quote(&quote, true).unwrap();

        let loaded = db.get_quote(&quote.number).unwrap().unwrap();
        assert_eq!(loaded.status, QuoteStatus::Accepted);
        assert_eq!(loaded.lines.len(), 1);

        quote.number = "DEV-1999-001".to_string();
        assert!(matches!(
            db.update_quote(&quote, false),
            Err(DevisError::NotFound(_))
        ));
    }

    #[test]
    fn test_delete_cascades() {
        let mut db = Database::open_in_memory().unwrap();
        let quote = db
            .insert_quote(sample_quote(), None, &NumberAllocator::default(), today())
            .unwrap();

        assert!(db.delete_quote(&quote.number).unwrap());
        assert!(!db.delete_quote(&quote.number).unwrap());
        assert_eq!(db.get_quote(&quote.number).unwrap(), None);

        let orphans: i64 = db
            .conn
            .query_row("SELECT COUNT(*) FROM lignes_devis", [], |row| row.get(0))
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[test]
    fn test_original_pdf() {
        let mut db = Database::open_in_memory().unwrap();
        let allocator = NumberAllocator::default();

        let plain = db.insert_quote(sample_quote(), None, &allocator, today()).unwrap();
        assert!(matches!(
            db.original_pdf(&plain.number),
            Err(DevisError::NotFound(_))
        ));

        let imported = db
            .insert_quote(sample_quote(), Some(b"%PDF-1.5 data"), &allocator, today())
            .unwrap();
        let pdf = db.original_pdf(&imported.number).unwrap();
        assert_eq!(pdf.data, b"%PDF-1.5 data".to_vec());
        assert_eq!(pdf.file_name, "devis-DEV-2024-002.pdf");

        assert!(matches!(
            db.original_pdf("DEV-2024-999"),
            Err(DevisError::NotFound(_))
        ));
    }

    #[test]
    fn test_options() {
        let mut db = Database::open_in_memory().unwrap();
        let allocator = NumberAllocator::default();
        db.insert_quote(sample_quote(), None, &allocator, today()).unwrap();

        let mut other = sample_quote();
        other.client.name = "Dupont".to_string();
        other.materials = None;
        other.status = QuoteStatus::Draft;
        db.insert_quote(other, None, &allocator, today()).unwrap();

        let options = db.options().unwrap();
        assert_eq!(options.clients, vec!["Dupont", "Martin SARL"]);
        assert_eq!(options.work_types, vec!["Maçonnerie"]);
        assert_eq!(options.statuses, vec![QuoteStatus::Draft, QuoteStatus::Sent]);
        assert_eq!(options.materials, vec!["Béton"]);
    }

    #[test]
    fn test_list_quotes_paginates() {
        let mut db = Database::open_in_memory().unwrap();
        let allocator = NumberAllocator::default();
        for _ in 0..3 {
            db.insert_quote(sample_quote(), None, &allocator, today()).unwrap();
        }

        let page = db
            .list_quotes(&QuoteFilter::default(), Pagination { page: 1, page_size: 2 })
            .unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.data[0].number, "DEV-2024-003");
        assert!(page.data[0].lines.is_empty());
    }
}
