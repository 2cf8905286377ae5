//! Listing filters, sort order and pagination.

use std::cmp::Ordering;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::quote::{Quote, QuoteStatus};

/// Filters applied to the quote listing and export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteFilter {
    /// Case-insensitive search across client, work type, notes and materials.
    /// When set, the client, work type and materials filters are ignored.
    pub search: Option<String>,
    pub client: Option<String>,
    #[serde(rename = "typeTravaux")]
    pub work_type: Option<String>,
    #[serde(rename = "materiaux")]
    pub materials: Option<String>,
    #[serde(rename = "statut")]
    pub status: Option<QuoteStatus>,
    /// Inclusive lower bound on the issue date.
    #[serde(rename = "dateDebut")]
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper bound on the issue date.
    #[serde(rename = "dateFin")]
    pub date_to: Option<NaiveDate>,
    #[serde(rename = "montantMin")]
    pub min_ttc: Option<Decimal>,
    #[serde(rename = "montantMax")]
    pub max_ttc: Option<Decimal>,
    #[serde(rename = "sortBy")]
    pub sort: SortField,
    #[serde(rename = "sortOrder")]
    pub order: SortOrder,
}

/// Listing sort key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortField {
    #[default]
    #[serde(rename = "dateDevis")]
    IssueDate,
    #[serde(rename = "montantTTC")]
    TotalTtc,
    #[serde(rename = "client")]
    Client,
    #[serde(rename = "typeTravaux")]
    WorkType,
    #[serde(rename = "statut")]
    Status,
    #[serde(rename = "createdAt")]
    CreatedAt,
}

impl SortField {
    /// Parse a sort key; unknown keys fall back to the issue date.
    pub fn parse(s: &str) -> Self {
        match s {
            "montantTTC" | "montant" => SortField::TotalTtc,
            "client" => SortField::Client,
            "typeTravaux" => SortField::WorkType,
            "statut" => SortField::Status,
            "createdAt" => SortField::CreatedAt,
            _ => SortField::IssueDate,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// `asc` sorts ascending, anything else descending.
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("asc") {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        }
    }
}

/// Page request, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 50,
        }
    }
}

/// One page of results with the counts of the whole result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page.
    pub count: usize,
    /// Items across all pages.
    pub total: usize,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub data: Vec<T>,
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn optional_contains_ci(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|h| contains_ci(h, needle))
}

/// Treat blank filter strings as absent.
fn term(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl QuoteFilter {
    /// Whether `quote` passes every active filter.
    pub fn matches(&self, quote: &Quote) -> bool {
        let search = term(&self.search);

        if let Some(search) = search {
            let found = contains_ci(&quote.client.name, search)
                || contains_ci(&quote.work_type, search)
                || optional_contains_ci(quote.notes.as_deref(), search)
                || optional_contains_ci(quote.materials.as_deref(), search);
            if !found {
                return false;
            }
        } else {
            if let Some(client) = term(&self.client) {
                if !contains_ci(&quote.client.name, client) {
                    return false;
                }
            }
            if let Some(work_type) = term(&self.work_type) {
                if !contains_ci(&quote.work_type, work_type) {
                    return false;
                }
            }
            if let Some(materials) = term(&self.materials) {
                if !optional_contains_ci(quote.materials.as_deref(), materials) {
                    return false;
                }
            }
        }

        if self.status.is_some_and(|s| s != quote.status) {
            return false;
        }
        if self.date_from.is_some_and(|from| quote.issue_date < from) {
            return false;
        }
        if self.date_to.is_some_and(|to| quote.issue_date > to) {
            return false;
        }
        if self.min_ttc.is_some_and(|min| quote.totals.ttc < min) {
            return false;
        }
        if self.max_ttc.is_some_and(|max| quote.totals.ttc > max) {
            return false;
        }

        true
    }

    fn compare(&self, a: &Quote, b: &Quote) -> Ordering {
        let ordering = match self.sort {
            SortField::IssueDate => a.issue_date.cmp(&b.issue_date),
            SortField::TotalTtc => a.totals.ttc.cmp(&b.totals.ttc),
            SortField::Client => a.client.name.to_lowercase().cmp(&b.client.name.to_lowercase()),
            SortField::WorkType => a.work_type.to_lowercase().cmp(&b.work_type.to_lowercase()),
            SortField::Status => a.status.as_str().cmp(b.status.as_str()),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        }
        // Stable tie-break on the document number.
        .then_with(|| a.number.cmp(&b.number));

        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }

    /// Keep the matching quotes, sorted.
    pub fn apply(&self, quotes: Vec<Quote>) -> Vec<Quote> {
        let mut kept: Vec<Quote> = quotes.into_iter().filter(|q| self.matches(q)).collect();
        kept.sort_by(|a, b| self.compare(a, b));
        kept
    }
}

impl Pagination {
    /// Cut one page out of `items`.
    pub fn paginate<T>(&self, items: Vec<T>) -> Page<T> {
        let page = self.page.max(1);
        let page_size = self.page_size.max(1);
        let total = items.len();
        let total_pages = total.div_ceil(page_size as usize) as u32;

        let skip = (page as usize - 1).saturating_mul(page_size as usize);
        let data: Vec<T> = items.into_iter().skip(skip).take(page_size as usize).collect();

        Page {
            count: data.len(),
            total,
            page,
            page_size,
            total_pages,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quote::ClientInfo;
    use crate::pricing::Amounts;
    use pretty_assertions::assert_eq;

    fn quote(number: &str, client: &str, work: &str, date: (i32, u32, u32), ttc: i64) -> Quote {
        let issue_date = NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap();
        let created_at = issue_date.and_hms_opt(9, 0, 0).unwrap();
        Quote {
            number: number.to_string(),
            client: ClientInfo {
                name: client.to_string(),
                ..ClientInfo::default()
            },
            work_type: work.to_string(),
            issue_date,
            valid_until: None,
            work_start: None,
            vat_rate: Decimal::new(20, 0),
            totals: Amounts {
                ht: Decimal::ZERO,
                tva: Decimal::ZERO,
                ttc: Decimal::new(ttc, 0),
            },
            status: QuoteStatus::Draft,
            materials: None,
            notes: None,
            pdf_file_name: None,
            lines: Vec::new(),
            created_at,
            updated_at: created_at,
        }
    }

    fn sample() -> Vec<Quote> {
        let mut accepted = quote("DEV-2024-002", "Martin SARL", "Toiture", (2024, 2, 10), 5000);
        accepted.status = QuoteStatus::Accepted;
        accepted.materials = Some("Tuiles terre cuite".to_string());

        let mut with_notes = quote("DEV-2024-003", "Élodie Petit", "Peinture", (2024, 3, 5), 800);
        with_notes.notes = Some("Accès par la cour, toiture voisine".to_string());

        vec![
            quote("DEV-2024-001", "Dupont", "Rénovation cuisine", (2024, 1, 15), 12000),
            accepted,
            with_notes,
        ]
    }

    fn numbers(quotes: &[Quote]) -> Vec<&str> {
        quotes.iter().map(|q| q.number.as_str()).collect()
    }

    #[test]
    fn test_default_sort_is_newest_first() {
        let kept = QuoteFilter::default().apply(sample());
        assert_eq!(numbers(&kept), vec!["DEV-2024-003", "DEV-2024-002", "DEV-2024-001"]);
    }

    #[test]
    fn test_search_spans_fields_and_ignores_specific_filters() {
        let filter = QuoteFilter {
            search: Some("TOITURE".to_string()),
            client: Some("nobody".to_string()),
            order: SortOrder::Asc,
            ..QuoteFilter::default()
        };
        let kept = filter.apply(sample());
        assert_eq!(numbers(&kept), vec!["DEV-2024-002", "DEV-2024-003"]);
    }

    #[test]
    fn test_accented_search_is_case_insensitive() {
        let filter = QuoteFilter {
            client: Some("élodie".to_string()),
            ..QuoteFilter::default()
        };
        assert_eq!(numbers(&filter.apply(sample())), vec!["DEV-2024-003"]);
    }

    #[test]
    fn test_status_date_and_amount_filters() {
        let filter = QuoteFilter {
            status: Some(QuoteStatus::Accepted),
            ..QuoteFilter::default()
        };
        assert_eq!(numbers(&filter.apply(sample())), vec!["DEV-2024-002"]);

        let filter = QuoteFilter {
            date_from: NaiveDate::from_ymd_opt(2024, 2, 10),
            date_to: NaiveDate::from_ymd_opt(2024, 3, 5),
            min_ttc: Some(Decimal::new(1000, 0)),
            ..QuoteFilter::default()
        };
        assert_eq!(numbers(&filter.apply(sample())), vec!["DEV-2024-002"]);
    }

    #[test]
    fn test_sort_by_amount_ascending() {
        let filter = QuoteFilter {
            sort: SortField::parse("montantTTC"),
            order: SortOrder::parse("ASC"),
            ..QuoteFilter::default()
        };
        let kept = filter.apply(sample());
        assert_eq!(numbers(&kept), vec!["DEV-2024-003", "DEV-2024-002", "DEV-2024-001"]);
    }

    #[test]
    fn test_paginate() {
        let pagination = Pagination { page: 2, page_size: 2 };
        let page = pagination.paginate(vec![1, 2, 3, 4, 5]);
        assert_eq!(
            page,
            Page {
                count: 2,
                total: 5,
                page: 2,
                page_size: 2,
                total_pages: 3,
                data: vec![3, 4],
            }
        );

        let past_end = Pagination { page: 9, page_size: 2 }.paginate(vec![1, 2]);
        assert_eq!(past_end.count, 0);
        assert_eq!(past_end.total_pages, 1);
    }
}
