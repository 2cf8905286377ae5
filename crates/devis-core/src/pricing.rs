//! Monetary computation for quote lines and quote totals.
//!
//! Every amount is rounded to the cent with half-away-from-zero semantics.
//! A line's HT and TVA are rounded separately and its TTC is their sum; quote
//! totals are the sums of the already-rounded line figures, rounded again.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Pre-tax, tax and tax-inclusive amounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amounts {
    /// Pre-tax amount (HT).
    #[serde(rename = "montantHT")]
    pub ht: Decimal,

    /// Tax amount (TVA).
    #[serde(rename = "montantTVA")]
    pub tva: Decimal,

    /// Tax-inclusive amount (TTC).
    #[serde(rename = "montantTTC")]
    pub ttc: Decimal,
}

impl Amounts {
    /// All three amounts at zero, as carried by section rows.
    pub const ZERO: Amounts = Amounts {
        ht: Decimal::ZERO,
        tva: Decimal::ZERO,
        ttc: Decimal::ZERO,
    };

    pub fn is_zero(&self) -> bool {
        self.ht.is_zero() && self.tva.is_zero() && self.ttc.is_zero()
    }
}

/// Round to two decimal places, midpoint away from zero.
pub fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Unrounded tax on `ht` at `rate_percent` (20 for 20%).
pub fn vat_of(ht: Decimal, rate_percent: Decimal) -> Decimal {
    ht * rate_percent / Decimal::ONE_HUNDRED
}

/// Amounts for `quantity` units at `unit_price` taxed at `rate_percent`.
pub fn compute_line(quantity: Decimal, unit_price: Decimal, rate_percent: Decimal) -> Amounts {
    from_ht(quantity * unit_price, rate_percent)
}

/// Amounts for a known pre-tax figure.
pub fn from_ht(ht: Decimal, rate_percent: Decimal) -> Amounts {
    let ht = round_cents(ht);
    let tva = round_cents(vat_of(ht, rate_percent));
    Amounts {
        ht,
        tva,
        ttc: ht + tva,
    }
}

/// Back-compute HT and TVA from a tax-inclusive total.
///
/// HT and TVA are rounded independently from the unrounded pre-tax value, so
/// `ht + tva` may differ from `ttc` by one cent.
pub fn from_ttc(ttc: Decimal, rate_percent: Decimal) -> Amounts {
    let divisor = Decimal::ONE + rate_percent / Decimal::ONE_HUNDRED;
    let raw_ht = if divisor.is_zero() { ttc } else { ttc / divisor };

    Amounts {
        ht: round_cents(raw_ht),
        tva: round_cents(vat_of(raw_ht, rate_percent)),
        ttc: round_cents(ttc),
    }
}

/// Amounts of a single quote line.
///
/// Section rows price to zero. When the source document already states the
/// line's HT (`stated_ht`), that figure is authoritative over `quantity * unit_price`.
pub fn line_amounts(
    quantity: Decimal,
    unit_price: Decimal,
    rate_percent: Decimal,
    stated_ht: Option<Decimal>,
    is_section: bool,
) -> Amounts {
    if is_section {
        return Amounts::ZERO;
    }

    match stated_ht {
        Some(ht) => from_ht(ht, rate_percent),
        None => compute_line(quantity, unit_price, rate_percent),
    }
}

/// Quote totals: sum each rounded line field independently, then round each sum.
pub fn compute_totals<'a, I>(lines: I) -> Amounts
where
    I: IntoIterator<Item = &'a Amounts>,
{
    let sum = lines.into_iter().fold(Amounts::ZERO, |acc, line| Amounts {
        ht: acc.ht + line.ht,
        tva: acc.tva + line.tva,
        ttc: acc.ttc + line.ttc,
    });

    Amounts {
        ht: round_cents(sum.ht),
        tva: round_cents(sum.tva),
        ttc: round_cents(sum.ttc),
    }
}
