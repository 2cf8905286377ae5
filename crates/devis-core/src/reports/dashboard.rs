//! Dashboard statistics.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::quote::{Quote, QuoteStatus};

/// Number of work types listed, most frequent first.
const TOP_WORK_TYPES: usize = 5;

/// Months covered by the evolution series, current month included.
const EVOLUTION_MONTHS: u32 = 6;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Totals {
    #[serde(rename = "devis")]
    pub count: usize,
    #[serde(rename = "montantHT")]
    pub ht: Decimal,
    #[serde(rename = "montantTVA")]
    pub tva: Decimal,
    #[serde(rename = "montantTTC")]
    pub ttc: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PeriodStats {
    #[serde(rename = "devis")]
    pub count: usize,
    #[serde(rename = "montantTTC")]
    pub ttc: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusStats {
    #[serde(rename = "statut")]
    pub status: QuoteStatus,
    pub count: usize,
    #[serde(rename = "montantTTC")]
    pub ttc: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkTypeStats {
    #[serde(rename = "type")]
    pub work_type: String,
    pub count: usize,
    #[serde(rename = "montantTTC")]
    pub ttc: Decimal,
}

/// Quotes issued in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthStats {
    /// `YYYY-MM`
    #[serde(rename = "mois")]
    pub month: String,
    pub count: usize,
    #[serde(rename = "montant")]
    pub ttc: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub total: Totals,
    #[serde(rename = "ceMois")]
    pub this_month: PeriodStats,
    #[serde(rename = "acceptes")]
    pub accepted: PeriodStats,
    /// Drafts and sent quotes.
    #[serde(rename = "enAttente")]
    pub pending: usize,
    #[serde(rename = "parStatut")]
    pub by_status: Vec<StatusStats>,
    #[serde(rename = "parType")]
    pub by_work_type: Vec<WorkTypeStats>,
    pub evolution: Vec<MonthStats>,
}

fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// First day of the month `back` months before the month of `date`.
fn month_start(date: NaiveDate, back: u32) -> Option<NaiveDate> {
    let index = date.year() * 12 + date.month0() as i32 - back as i32;
    NaiveDate::from_ymd_opt(index.div_euclid(12), index.rem_euclid(12) as u32 + 1, 1)
}

/// Statistics over `quotes` as of `today`.
pub fn dashboard(quotes: &[Quote], today: NaiveDate) -> Dashboard {
    let mut total = Totals::default();
    let mut this_month = PeriodStats::default();
    let mut accepted = PeriodStats::default();
    let mut pending = 0;
    let mut by_status: HashMap<QuoteStatus, (usize, Decimal)> = HashMap::new();
    let mut by_work_type: HashMap<&str, (usize, Decimal)> = HashMap::new();

    let current_month = month_key(today);
    let months: Vec<String> = (0..EVOLUTION_MONTHS)
        .rev()
        .filter_map(|back| month_start(today, back))
        .map(month_key)
        .collect();
    let mut evolution: HashMap<&str, (usize, Decimal)> = HashMap::new();

    for quote in quotes {
        let ttc = quote.totals.ttc;

        total.count += 1;
        total.ht += quote.totals.ht;
        total.tva += quote.totals.tva;
        total.ttc += ttc;

        let month = month_key(quote.issue_date);
        if month == current_month {
            this_month.count += 1;
            this_month.ttc += ttc;
        }
        if let Some(key) = months.iter().find(|m| **m == month) {
            let entry = evolution.entry(key.as_str()).or_default();
            entry.0 += 1;
            entry.1 += ttc;
        }

        if quote.status == QuoteStatus::Accepted {
            accepted.count += 1;
            accepted.ttc += ttc;
        }
        if quote.status.is_pending() {
            pending += 1;
        }

        let entry = by_status.entry(quote.status).or_default();
        entry.0 += 1;
        entry.1 += ttc;

        let entry = by_work_type.entry(quote.work_type.as_str()).or_default();
        entry.0 += 1;
        entry.1 += ttc;
    }

    let by_status = QuoteStatus::ALL
        .into_iter()
        .filter_map(|status| {
            by_status
                .get(&status)
                .map(|&(count, ttc)| StatusStats { status, count, ttc })
        })
        .collect();

    let mut by_work_type: Vec<WorkTypeStats> = by_work_type
        .into_iter()
        .map(|(work_type, (count, ttc))| WorkTypeStats {
            work_type: work_type.to_string(),
            count,
            ttc,
        })
        .collect();
    by_work_type.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.work_type.cmp(&b.work_type)));
    by_work_type.truncate(TOP_WORK_TYPES);

    let evolution = months
        .iter()
        .map(|month| {
            let (count, ttc) = evolution.get(month.as_str()).copied().unwrap_or_default();
            MonthStats {
                month: month.clone(),
                count,
                ttc,
            }
        })
        .collect();

    Dashboard {
        total,
        this_month,
        accepted,
        pending,
        by_status,
        by_work_type,
        evolution,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quote::ClientInfo;
    use crate::pricing::from_ht;
    use pretty_assertions::assert_eq;

    fn quote(work: &str, date: (i32, u32, u32), ht: i64, status: QuoteStatus) -> Quote {
        let issue_date = NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap();
        let created_at = issue_date.and_hms_opt(8, 0, 0).unwrap();
        Quote {
            number: format!("DEV-{}-{}", date.0, ht),
            client: ClientInfo {
                name: "Client".to_string(),
                ..ClientInfo::default()
            },
            work_type: work.to_string(),
            issue_date,
            valid_until: None,
            work_start: None,
            vat_rate: Decimal::new(20, 0),
            totals: from_ht(Decimal::new(ht, 0), Decimal::new(20, 0)),
            status,
            materials: None,
            notes: None,
            pdf_file_name: None,
            lines: Vec::new(),
            created_at,
            updated_at: created_at,
        }
    }

    #[test]
    fn test_month_start_crosses_years() {
        let today = NaiveDate::from_ymd_opt(2024, 2, 17).unwrap();
        assert_eq!(month_start(today, 0), NaiveDate::from_ymd_opt(2024, 2, 1));
        assert_eq!(month_start(today, 5), NaiveDate::from_ymd_opt(2023, 9, 1));
    }

    #[test]
    fn test_dashboard() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
        let quotes = vec![
            quote("Toiture", (2024, 3, 2), 1000, QuoteStatus::Accepted),
            quote("Toiture", (2024, 1, 15), 500, QuoteStatus::Sent),
            quote("Peinture", (2024, 3, 10), 200, QuoteStatus::Draft),
            quote("Plomberie", (2023, 6, 1), 100, QuoteStatus::Refused),
        ];

        let stats = dashboard(&quotes, today);

        assert_eq!(stats.total.count, 4);
        assert_eq!(stats.total.ht, Decimal::new(1800, 0));
        assert_eq!(stats.total.ttc, Decimal::new(2160, 0));
        assert_eq!(stats.this_month.count, 2);
        assert_eq!(stats.this_month.ttc, Decimal::new(1440, 0));
        assert_eq!(stats.accepted.count, 1);
        assert_eq!(stats.accepted.ttc, Decimal::new(1200, 0));
        assert_eq!(stats.pending, 2);

        let statuses: Vec<QuoteStatus> = stats.by_status.iter().map(|s| s.status).collect();
        assert_eq!(
            statuses,
            vec![QuoteStatus::Draft, QuoteStatus::Sent, QuoteStatus::Accepted, QuoteStatus::Refused]
        );

        assert_eq!(stats.by_work_type[0].work_type, "Toiture");
        assert_eq!(stats.by_work_type[0].count, 2);

        let months: Vec<(&str, usize)> = stats
            .evolution
            .iter()
            .map(|m| (m.month.as_str(), m.count))
            .collect();
        assert_eq!(
            months,
            vec![
                ("2023-10", 0),
                ("2023-11", 0),
                ("2023-12", 0),
                ("2024-01", 1),
                ("2024-02", 0),
                ("2024-03", 2),
            ]
        );
    }
}
