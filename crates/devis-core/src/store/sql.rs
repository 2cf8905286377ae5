//! Column encodings for decimals, dates and statuses.

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rust_decimal::Decimal;

use crate::error::{DevisError, Result};
use crate::models::quote::QuoteStatus;
use crate::pricing::round_cents;

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";
pub(crate) const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Amount rounded to the cent, as integer cents.
pub(crate) fn to_cents(amount: Decimal) -> Result<i64> {
    let mut rounded = round_cents(amount);
    rounded.rescale(2);
    i64::try_from(rounded.mantissa())
        .map_err(|_| DevisError::validation("montant", format!("montant hors limites: {}", amount)))
}

pub(crate) fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

pub(crate) fn date_text(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn datetime_text(at: NaiveDateTime) -> String {
    at.format(DATETIME_FORMAT).to_string()
}

fn other(err: impl std::error::Error + Send + Sync + 'static) -> FromSqlError {
    FromSqlError::Other(Box::new(err))
}

/// Decimal stored as text.
pub(crate) struct DecimalText(pub Decimal);

impl FromSql for DecimalText {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Integer(i) => Ok(DecimalText(Decimal::from(i))),
            ValueRef::Real(f) => Decimal::try_from(f).map(DecimalText).map_err(other),
            _ => value.as_str()?.parse().map(DecimalText).map_err(other),
        }
    }
}

/// `YYYY-MM-DD` text.
pub(crate) struct DateText(pub NaiveDate);

impl FromSql for DateText {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        NaiveDate::parse_from_str(value.as_str()?, DATE_FORMAT)
            .map(DateText)
            .map_err(other)
    }
}

/// `YYYY-MM-DD HH:MM:SS` text.
pub(crate) struct DateTimeText(pub NaiveDateTime);

impl FromSql for DateTimeText {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        NaiveDateTime::parse_from_str(value.as_str()?, DATETIME_FORMAT)
            .map(DateTimeText)
            .map_err(other)
    }
}

impl ToSql for QuoteStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for QuoteStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let label = value.as_str()?;
        QuoteStatus::parse(label)
            .ok_or_else(|| FromSqlError::Other(format!("unknown status: {}", label).into()))
    }
}
