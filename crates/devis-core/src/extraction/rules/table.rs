//! Line-item table: `N° | Désignation | Qté | U | PU HT | Montant HT`.

use rust_decimal::Decimal;
use tracing::trace;

use super::amounts::parse_french_amount;
use super::patterns::{SEPARATOR_ROW, TABLE_HEADER, TOTAL_LABEL};
use super::split_row;

// Cell positions
const DESCRIPTION: usize = 1;
const QUANTITY: usize = 2;
const UNIT: usize = 3;
const UNIT_PRICE: usize = 4;
const AMOUNT: usize = 5;

/// A classified table row.
#[derive(Debug, Clone, PartialEq)]
pub enum TableRow {
    /// Heading row without prices.
    Section { description: String },
    /// Priced row. `stated_ht` is the table's own amount column.
    Priced {
        description: String,
        quantity: Decimal,
        unit: String,
        unit_price: Decimal,
        stated_ht: Option<Decimal>,
    },
}

/// Rows of the first line-item table in `text`.
///
/// Header, separator and total rows are skipped, as are rows that are
/// neither sections nor priced (zero quantity with a price).
pub fn extract_table_rows(text: &str) -> Vec<TableRow> {
    let mut rows = Vec::new();
    let mut lines = text.lines();

    if lines.find(|l| TABLE_HEADER.is_match(l)).is_none() {
        return rows;
    }

    for line in lines {
        if !line.contains('|') || SEPARATOR_ROW.is_match(line) || TABLE_HEADER.is_match(line) {
            continue;
        }

        let cells = split_row(line);
        if is_total_row(&cells) {
            continue;
        }

        match classify(&cells) {
            Some(row) => rows.push(row),
            None => trace!("Skipping table row: {}", line.trim()),
        }
    }

    rows
}

fn is_total_row(cells: &[&str]) -> bool {
    cells
        .iter()
        .filter(|c| !c.is_empty())
        .take(2)
        .any(|c| TOTAL_LABEL.is_match(c))
}

fn classify(cells: &[&str]) -> Option<TableRow> {
    let cell = |i: usize| cells.get(i).copied().unwrap_or("");
    let number = |i: usize| parse_french_amount(cell(i));

    let description = cell(DESCRIPTION).to_string();
    if description.is_empty() {
        return None;
    }

    let quantity = number(QUANTITY).unwrap_or_default();
    let unit_price = number(UNIT_PRICE).unwrap_or_default();
    let stated_ht = number(AMOUNT);
    let amount = stated_ht.unwrap_or(quantity * unit_price);

    if quantity.is_zero() && unit_price.is_zero() && amount.is_zero() {
        return Some(TableRow::Section { description });
    }

    if quantity > Decimal::ZERO {
        return Some(TableRow::Priced {
            description,
            quantity,
            unit: cell(UNIT).to_string(),
            unit_price,
            stated_ht,
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    const TABLE: &str = "\
Objet : salle de bain
N° | Désignation              | Qté   | U  | PU HT    | Montant HT
---|--------------------------|-------|----|----------|-----------
1  | PLOMBERIE                |       |    |          |
1.1| Dépose baignoire         | 1,00  | U  | 250,00   | 250,00
1.2| Pose receveur            | 1,00  | U  | 480,50   | 480,50
2  | CARRELAGE                |       |    |          |
2.1| Faïence murale           | 12,50 | m² | 23,85    | 298,13
2.2| Plinthes (pour mémoire)  | 0     | ml | 12,00    |
TOTAL H.T.                    |       |    |          | 1 028,63
TVA 20,00 %                   |       |    |          | 205,73
TOTAL T.T.C.                  |       |    |          | 1 234,36
";

    #[test]
    fn test_extract_table_rows() {
        let rows = extract_table_rows(TABLE);
        assert_eq!(rows.len(), 5);

        assert_eq!(
            rows[0],
            TableRow::Section {
                description: "PLOMBERIE".to_string()
            }
        );
        assert_eq!(
            rows[1],
            TableRow::Priced {
                description: "Dépose baignoire".to_string(),
                quantity: d("1.00"),
                unit: "U".to_string(),
                unit_price: d("250.00"),
                stated_ht: Some(d("250.00")),
            }
        );
        assert_eq!(
            rows[4],
            TableRow::Priced {
                description: "Faïence murale".to_string(),
                quantity: d("12.50"),
                unit: "m²".to_string(),
                unit_price: d("23.85"),
                stated_ht: Some(d("298.13")),
            }
        );
    }

    #[test]
    fn test_no_header_no_rows() {
        let text = "1 | Dépose | 1 | U | 250,00 | 250,00";
        assert!(extract_table_rows(text).is_empty());
    }

    #[test]
    fn test_row_without_amount_column() {
        let text = "N° | Désignation | Qté | U | PU HT\n1 | Ragréage | 2 | m² | 15,5";
        assert_eq!(
            extract_table_rows(text),
            vec![TableRow::Priced {
                description: "Ragréage".to_string(),
                quantity: d("2"),
                unit: "m²".to_string(),
                unit_price: d("15.5"),
                stated_ht: None,
            }]
        );
    }
}
