//! Place/date lines and date parsing.

use chrono::NaiveDate;

use super::patterns::{DATE_DMY, DATE_YMD, PLACE_DATE};
use super::FieldExtractor;

/// A `<PLACE>, le <DD/MM/YYYY>` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceDate {
    pub place: String,
    /// `YYYY-MM-DD`, reordered from the document without calendar checks.
    pub iso_date: String,
}

/// Extractor for place/date lines.
pub struct PlaceDateExtractor;

impl FieldExtractor for PlaceDateExtractor {
    type Output = PlaceDate;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        PLACE_DATE
            .captures_iter(text)
            .map(|caps| PlaceDate {
                place: caps[1].trim().to_string(),
                iso_date: format!("{}-{}-{}", &caps[4], &caps[3], &caps[2]),
            })
            .collect()
    }
}

/// Extract the first place/date line.
pub fn extract_place_date(text: &str) -> Option<PlaceDate> {
    PlaceDateExtractor.extract(text)
}

/// Parse a date typed as `YYYY-MM-DD` (optionally followed by a time) or
/// `DD/MM/YYYY` (also with `.` or `-`).
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    if let Some(caps) = DATE_YMD.captures(s) {
        return NaiveDate::from_ymd_opt(
            caps[1].parse().ok()?,
            caps[2].parse().ok()?,
            caps[3].parse().ok()?,
        );
    }

    if let Some(caps) = DATE_DMY.captures(s) {
        return NaiveDate::from_ymd_opt(
            caps[3].parse().ok()?,
            caps[2].parse().ok()?,
            caps[1].parse().ok()?,
        );
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_place_date() {
        let text = "BATI RENOV\n  Lyon, le 15/03/2024\nObjet : rénovation";
        assert_eq!(
            extract_place_date(text),
            Some(PlaceDate {
                place: "Lyon".to_string(),
                iso_date: "2024-03-15".to_string(),
            })
        );
    }

    #[test]
    fn test_place_date_with_prefix_and_compound_place() {
        let text = "Fait à Saint-Étienne, le 02/11/2023";
        let found = extract_place_date(text).unwrap();
        assert_eq!(found.place, "Saint-Étienne");
        assert_eq!(found.iso_date, "2023-11-02");
    }

    #[test]
    fn test_impossible_date_passes_through() {
        let found = extract_place_date("Paris, le 31/02/2024").unwrap();
        assert_eq!(found.iso_date, "2024-02-31");
    }

    #[test]
    fn test_parse_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15);
        assert_eq!(parse_date("2024-03-15"), expected);
        assert_eq!(parse_date("2024-03-15T00:00:00"), expected);
        assert_eq!(parse_date("15/03/2024"), expected);
        assert_eq!(parse_date("15.03.2024"), expected);
        assert_eq!(parse_date("31/02/2024"), None);
        assert_eq!(parse_date("mars 2024"), None);
    }
}
