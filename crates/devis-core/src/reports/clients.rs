//! Client list derived from quotes.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::quote::{Quote, QuoteStatus};

/// One client with the figures of all its quotes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSummary {
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(rename = "adresse")]
    pub address: Option<String>,
    #[serde(rename = "telephone")]
    pub phone: Option<String>,
    pub email: Option<String>,
    pub siret: Option<String>,
    #[serde(rename = "totalDevis")]
    pub quote_count: usize,
    /// Sum of TTC over all quotes.
    #[serde(rename = "totalMontant")]
    pub total_ttc: Decimal,
    /// Sum of TTC over accepted quotes.
    #[serde(rename = "montantAccepte")]
    pub accepted_ttc: Decimal,
    #[serde(rename = "dernierDevis")]
    pub last_quote_date: NaiveDate,
    #[serde(rename = "numerosDevis")]
    pub quote_numbers: Vec<String>,
}

fn client_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Group quotes by client name, ignoring case and surrounding spaces.
///
/// Name and contact fields come from the client's most recent quote.
pub fn aggregate_clients(quotes: &[Quote]) -> Vec<ClientSummary> {
    let mut by_date: Vec<&Quote> = quotes.iter().collect();
    by_date.sort_by(|a, b| {
        b.issue_date
            .cmp(&a.issue_date)
            .then_with(|| b.number.cmp(&a.number))
    });

    let mut clients: HashMap<String, ClientSummary> = HashMap::new();
    for quote in by_date {
        let summary = clients
            .entry(client_key(&quote.client.name))
            .or_insert_with(|| ClientSummary {
                name: quote.client.name.trim().to_string(),
                address: quote.client.address.clone(),
                phone: quote.client.phone.clone(),
                email: quote.client.email.clone(),
                siret: quote.client.siret.clone(),
                quote_count: 0,
                total_ttc: Decimal::ZERO,
                accepted_ttc: Decimal::ZERO,
                last_quote_date: quote.issue_date,
                quote_numbers: Vec::new(),
            });

        summary.quote_count += 1;
        summary.total_ttc += quote.totals.ttc;
        if quote.status == QuoteStatus::Accepted {
            summary.accepted_ttc += quote.totals.ttc;
        }
        summary.last_quote_date = summary.last_quote_date.max(quote.issue_date);
        summary.quote_numbers.push(quote.number.clone());
    }

    let mut clients: Vec<ClientSummary> = clients.into_values().collect();
    clients.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    });
    clients
}
