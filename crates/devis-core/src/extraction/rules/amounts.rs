//! French amounts and the totals block of a quote.

use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::trace;

use super::patterns::{TOTAL_HT_LABEL, TOTAL_TTC_LABEL, TVA_LABEL, VAT_RATE};
use super::split_row;

/// Totals as printed in the document, before any derivation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatedTotals {
    pub total_ht: Option<Decimal>,
    pub vat_rate: Option<Decimal>,
    pub vat_amount: Option<Decimal>,
    pub total_ttc: Option<Decimal>,
}

/// Scan pipe-delimited rows for TOTAL HT, TVA and TOTAL TTC.
///
/// The amount of a row is its last cell that reads as a number. The first
/// occurrence of each label wins.
pub fn extract_totals(text: &str) -> StatedTotals {
    let mut totals = StatedTotals::default();

    for line in text.lines().filter(|l| l.contains('|')) {
        let cells = split_row(line);
        let Some(label) = cells.iter().find(|c| !c.is_empty()) else {
            continue;
        };

        if TOTAL_HT_LABEL.is_match(label) {
            if totals.total_ht.is_none() {
                totals.total_ht = last_amount(&cells);
            }
        } else if TOTAL_TTC_LABEL.is_match(label) {
            if totals.total_ttc.is_none() {
                totals.total_ttc = last_amount(&cells);
            }
        } else if TVA_LABEL.is_match(label) {
            if totals.vat_rate.is_none() {
                totals.vat_rate = VAT_RATE
                    .captures(line)
                    .and_then(|caps| parse_french_amount(&caps[1]));
            }
            if totals.vat_amount.is_none() {
                totals.vat_amount = last_amount(&cells);
            }
        }
    }

    trace!("Stated totals: {:?}", totals);
    totals
}

fn last_amount(cells: &[&str]) -> Option<Decimal> {
    // Skip the label cell so "TOTAL H.T." never reads as a number.
    cells
        .iter()
        .skip(1)
        .rev()
        .filter(|c| !c.contains('%'))
        .find_map(|c| parse_french_amount(c))
}

/// Parse a French-formatted number ("1 234,56", "1234,56", "12", "1.234,56 €").
///
/// Returns `None` for anything that is not purely a number.
pub fn parse_french_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .trim()
        .trim_end_matches('€')
        .chars()
        .filter(|c| !matches!(c, ' ' | '\u{00a0}' | '\u{202f}'))
        .collect();

    if cleaned.is_empty()
        || !cleaned
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
    {
        return None;
    }

    let normalized = if cleaned.contains(',') {
        // Comma is the decimal separator; dots can only group thousands.
        cleaned.replace('.', "").replace(',', ".")
    } else {
        cleaned
    };

    Decimal::from_str(&normalized).ok()
}

/// Format an amount in French style (1 234,56).
pub fn format_french_amount(amount: Decimal) -> String {
    let s = format!("{:.2}", amount);
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };

    let Some((integer_part, decimal_part)) = digits.split_once('.') else {
        return s;
    };

    // Add thousand separators
    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push(' ');
        }
        formatted.push(*c);
    }

    format!("{}{},{}", sign, formatted, decimal_part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_french_amount() {
        assert_eq!(parse_french_amount("1 234,56"), Some(d("1234.56")));
        assert_eq!(parse_french_amount("1234,56"), Some(d("1234.56")));
        assert_eq!(parse_french_amount("12\u{a0}345\u{a0}678,90"), Some(d("12345678.90")));
        assert_eq!(parse_french_amount("1.234,56 €"), Some(d("1234.56")));
        assert_eq!(parse_french_amount("12"), Some(d("12")));
        assert_eq!(parse_french_amount("-5,5"), Some(d("-5.5")));
        assert_eq!(parse_french_amount(""), None);
        assert_eq!(parse_french_amount("U"), None);
        assert_eq!(parse_french_amount("20 %"), None);
    }

    #[test]
    fn test_format_french_amount() {
        assert_eq!(format_french_amount(d("1234.56")), "1 234,56");
        assert_eq!(format_french_amount(d("12345678.9")), "12 345 678,90");
        assert_eq!(format_french_amount(d("-1500")), "-1 500,00");
        assert_eq!(format_french_amount(d("0.5")), "0,50");
    }

    #[test]
    fn test_extract_totals() {
        let text = "\
TOTAL H.T.   |      |     |         | 1 028,80
TVA 20,00 %  |      |     |         |   205,76
TOTAL T.T.C. |      |     |         | 1 234,56
";
        let totals = extract_totals(text);
        assert_eq!(
            totals,
            StatedTotals {
                total_ht: Some(d("1028.80")),
                vat_rate: Some(d("20.00")),
                vat_amount: Some(d("205.76")),
                total_ttc: Some(d("1234.56")),
            }
        );
    }

    #[test]
    fn test_extract_totals_ttc_only() {
        let totals = extract_totals("TOTAL T.T.C. | | | | 1 234,56");
        assert_eq!(totals.total_ttc, Some(d("1234.56")));
        assert_eq!(totals.total_ht, None);
        assert_eq!(totals.vat_rate, None);
    }

    #[test]
    fn test_totals_ignore_rows_without_pipes() {
        let totals = extract_totals("TOTAL HT 1 028,80\nTOTAL TTC 1 234,56");
        assert_eq!(totals, StatedTotals::default());
    }
}
