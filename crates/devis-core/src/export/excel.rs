//! Excel workbook with one sheet of quotes and one of their lines.

use std::path::Path;

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_xlsxwriter::{DocProperties, Format, FormatAlign, Workbook, Worksheet, XlsxError};
use tracing::info;

use crate::error::Result;
use crate::models::config::CompanyConfig;
use crate::models::quote::Quote;

pub const SUMMARY_SHEET: &str = "Devis";
pub const DETAIL_SHEET: &str = "Lignes détaillées";

const AMOUNT_FORMAT: &str = "#,##0.00";

const SUMMARY_COLUMNS: [(&str, f64); 18] = [
    ("N° Devis", 15.0),
    ("Client", 25.0),
    ("Adresse", 30.0),
    ("Téléphone", 15.0),
    ("Email", 25.0),
    ("SIRET", 15.0),
    ("Type travaux", 20.0),
    ("Date devis", 12.0),
    ("Date validité", 12.0),
    ("Date début travaux", 15.0),
    ("Montant HT", 12.0),
    ("Taux TVA", 10.0),
    ("Montant TVA", 12.0),
    ("Montant TTC", 12.0),
    ("Statut", 12.0),
    ("Matériaux", 30.0),
    ("Notes", 40.0),
    ("Nb lignes", 10.0),
];

const DETAIL_COLUMNS: [(&str, f64); 10] = [
    ("N° Devis", 15.0),
    ("Client", 25.0),
    ("Description", 40.0),
    ("Quantité", 10.0),
    ("Unité", 10.0),
    ("Prix unitaire", 12.0),
    ("Taux TVA", 10.0),
    ("Montant HT", 12.0),
    ("Montant TVA", 12.0),
    ("Montant TTC", 12.0),
];

/// `devis-export-YYYY-MM-DD.xlsx`
pub fn default_file_name(today: NaiveDate) -> String {
    format!("devis-export-{}.xlsx", today.format("%Y-%m-%d"))
}

/// Write `quotes` to an `.xlsx` file at `path`, issued by `company`.
pub fn write_workbook(quotes: &[Quote], company: &CompanyConfig, path: &Path) -> Result<()> {
    let mut workbook = build_workbook(quotes, company)?;
    workbook.save(path)?;
    info!("Exported {} quotes to {}", quotes.len(), path.display());
    Ok(())
}

/// `.xlsx` bytes for `quotes`.
pub fn write_workbook_to_buffer(quotes: &[Quote], company: &CompanyConfig) -> Result<Vec<u8>> {
    let mut workbook = build_workbook(quotes, company)?;
    Ok(workbook.save_to_buffer()?)
}

struct Formats {
    header: Format,
    amount: Format,
}

/// Document properties naming the issuing company, when configured.
fn properties(company: &CompanyConfig) -> DocProperties {
    let properties = DocProperties::new().set_title("Devis");
    let name = company.name.trim();
    if name.is_empty() {
        return properties;
    }
    properties
        .set_company(name)
        .set_author(name)
        .set_comment(company.contact_line())
}

fn build_workbook(
    quotes: &[Quote],
    company: &CompanyConfig,
) -> std::result::Result<Workbook, XlsxError> {
    let formats = Formats {
        header: Format::new().set_bold().set_align(FormatAlign::Center),
        amount: Format::new().set_num_format(AMOUNT_FORMAT),
    };

    let mut workbook = Workbook::new();
    workbook.set_properties(&properties(company));
    workbook.push_worksheet(summary_sheet(quotes, &formats)?);
    workbook.push_worksheet(detail_sheet(quotes, &formats)?);
    Ok(workbook)
}

fn write_headers(
    sheet: &mut Worksheet,
    columns: &[(&str, f64)],
    formats: &Formats,
) -> std::result::Result<(), XlsxError> {
    for (col, (title, width)) in (0u16..).zip(columns) {
        sheet.write_string_with_format(0, col, *title, &formats.header)?;
        sheet.set_column_width(col, *width)?;
    }
    sheet.set_freeze_panes(1, 0)?;
    Ok(())
}

fn write_amount(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    amount: Decimal,
    formats: &Formats,
) -> std::result::Result<(), XlsxError> {
    let value = amount.to_f64().unwrap_or_default();
    sheet.write_number_with_format(row, col, value, &formats.amount)?;
    Ok(())
}

fn write_optional(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: Option<&str>,
) -> std::result::Result<(), XlsxError> {
    if let Some(value) = value {
        sheet.write_string(row, col, value)?;
    }
    Ok(())
}

fn french_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

fn summary_sheet(quotes: &[Quote], formats: &Formats) -> std::result::Result<Worksheet, XlsxError> {
    let mut sheet = Worksheet::new();
    sheet.set_name(SUMMARY_SHEET)?;
    write_headers(&mut sheet, &SUMMARY_COLUMNS, formats)?;

    for (row, quote) in (1u32..).zip(quotes) {
        sheet.write_string(row, 0, &quote.number)?;
        sheet.write_string(row, 1, &quote.client.name)?;
        write_optional(&mut sheet, row, 2, quote.client.address.as_deref())?;
        write_optional(&mut sheet, row, 3, quote.client.phone.as_deref())?;
        write_optional(&mut sheet, row, 4, quote.client.email.as_deref())?;
        write_optional(&mut sheet, row, 5, quote.client.siret.as_deref())?;
        sheet.write_string(row, 6, &quote.work_type)?;
        sheet.write_string(row, 7, french_date(quote.issue_date))?;
        write_optional(&mut sheet, row, 8, quote.valid_until.map(french_date).as_deref())?;
        write_optional(&mut sheet, row, 9, quote.work_start.map(french_date).as_deref())?;
        write_amount(&mut sheet, row, 10, quote.totals.ht, formats)?;
        sheet.write_number(row, 11, quote.vat_rate.to_f64().unwrap_or_default())?;
        write_amount(&mut sheet, row, 12, quote.totals.tva, formats)?;
        write_amount(&mut sheet, row, 13, quote.totals.ttc, formats)?;
        sheet.write_string(row, 14, quote.status.as_str())?;
        write_optional(&mut sheet, row, 15, quote.materials.as_deref())?;
        write_optional(&mut sheet, row, 16, quote.notes.as_deref())?;
        sheet.write_number(row, 17, quote.lines.len() as f64)?;
    }

    Ok(sheet)
}

fn detail_sheet(quotes: &[Quote], formats: &Formats) -> std::result::Result<Worksheet, XlsxError> {
    let mut sheet = Worksheet::new();
    sheet.set_name(DETAIL_SHEET)?;
    write_headers(&mut sheet, &DETAIL_COLUMNS, formats)?;

    let mut row = 1u32;
    for quote in quotes {
        if quote.lines.is_empty() {
            // Quote without lines: one row with its totals.
            sheet.write_string(row, 0, &quote.number)?;
            sheet.write_string(row, 1, &quote.client.name)?;
            sheet.write_string(row, 2, "Total")?;
            sheet.write_number(row, 6, quote.vat_rate.to_f64().unwrap_or_default())?;
            write_amount(&mut sheet, row, 7, quote.totals.ht, formats)?;
            write_amount(&mut sheet, row, 8, quote.totals.tva, formats)?;
            write_amount(&mut sheet, row, 9, quote.totals.ttc, formats)?;
            row += 1;
            continue;
        }

        for line in &quote.lines {
            sheet.write_string(row, 0, &quote.number)?;
            sheet.write_string(row, 1, &quote.client.name)?;
            sheet.write_string(row, 2, &line.description)?;
            if !line.is_section {
                sheet.write_number(row, 3, line.quantity.to_f64().unwrap_or_default())?;
                sheet.write_string(row, 4, &line.unit)?;
                write_amount(&mut sheet, row, 5, line.unit_price, formats)?;
                sheet.write_number(row, 6, line.vat_rate.to_f64().unwrap_or_default())?;
                write_amount(&mut sheet, row, 7, line.amounts.ht, formats)?;
                write_amount(&mut sheet, row, 8, line.amounts.tva, formats)?;
                write_amount(&mut sheet, row, 9, line.amounts.ttc, formats)?;
            }
            row += 1;
        }
    }

    Ok(sheet)
}
