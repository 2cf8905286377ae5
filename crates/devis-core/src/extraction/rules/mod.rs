//! Rule-based field extractors for French quote documents.

pub mod amounts;
pub mod dates;
pub mod parties;
pub mod patterns;
pub mod table;

pub use amounts::{extract_totals, format_french_amount, parse_french_amount, StatedTotals};
pub use dates::{extract_place_date, parse_date, PlaceDate, PlaceDateExtractor};
pub use parties::{
    extract_affair_reference, extract_client, extract_company, extract_followed_by, Company,
    LabelExtractor,
};
pub use table::{extract_table_rows, TableRow};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// Split a pipe-delimited row into trimmed cells.
///
/// Outer pipes (`| a | b |`) do not produce empty edge cells.
pub fn split_row(line: &str) -> Vec<&str> {
    let line = line.trim();
    let line = line.strip_prefix('|').unwrap_or(line);
    let line = line.strip_suffix('|').unwrap_or(line);
    line.split('|').map(str::trim).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_row() {
        assert_eq!(split_row(" 1 | Pose | 2 "), vec!["1", "Pose", "2"]);
        assert_eq!(split_row("| 1 | Pose |"), vec!["1", "Pose"]);
        assert_eq!(split_row("A | | B"), vec!["A", "", "B"]);
    }
}
