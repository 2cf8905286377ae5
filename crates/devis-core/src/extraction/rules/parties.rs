//! Affair, company and client identification.

use regex::Regex;

use super::patterns::{
    AFFAIR_LABEL, AFFAIR_REFERENCE, CLIENT_LABEL, COMPANY_LINE, DEVIS_HEADING, FOLLOWED_BY,
    PLACE_DATE, SECTION_KEYWORD, TABLE_HEADER,
};
use super::FieldExtractor;

/// Number of leading non-empty lines searched for the company name.
const COMPANY_SCAN_LINES: usize = 5;

/// Extracts the value following a label, up to the end of the line or an
/// optional stop keyword.
pub struct LabelExtractor {
    pattern: &'static Regex,
    stop: Option<&'static Regex>,
}

impl LabelExtractor {
    pub fn new(pattern: &'static Regex) -> Self {
        Self { pattern, stop: None }
    }

    pub fn with_stop(mut self, stop: &'static Regex) -> Self {
        self.stop = Some(stop);
        self
    }

    fn clean(&self, raw: &str) -> Option<String> {
        let bounded = match self.stop.and_then(|stop| stop.find(raw)) {
            Some(m) => &raw[..m.start()],
            None => raw,
        };
        let value = bounded
            .trim()
            .trim_end_matches([':', '-', ',', ';'])
            .trim();
        (!value.is_empty()).then(|| value.to_string())
    }
}

impl FieldExtractor for LabelExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| self.clean(&caps[1]))
            .collect()
    }
}

/// "Référence Affaire : ..." value.
pub fn extract_affair_reference(text: &str) -> Option<String> {
    LabelExtractor::new(&AFFAIR_REFERENCE).extract(text)
}

/// "Affaire suivie par : ..." name, bounded by the next section keyword.
pub fn extract_followed_by(text: &str) -> Option<String> {
    LabelExtractor::new(&FOLLOWED_BY)
        .with_stop(&SECTION_KEYWORD)
        .extract(text)
}

/// Issuing company found at the top of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Company {
    pub name: String,
    pub address: Option<String>,
}

/// Find the issuing company among the first non-empty lines.
///
/// The name is an upper-case line without digits; the next line is its
/// address when it contains a digit.
pub fn extract_company(text: &str) -> Option<Company> {
    let lines: Vec<&str> = non_empty_lines(text).collect();

    let index = lines
        .iter()
        .take(COMPANY_SCAN_LINES)
        .position(|l| COMPANY_LINE.is_match(l) && !DEVIS_HEADING.is_match(l))?;

    let address = lines
        .get(index + 1)
        .filter(|next| next.chars().any(|c| c.is_ascii_digit()))
        .map(|next| next.to_string());

    Some(Company {
        name: lines[index].to_string(),
        address,
    })
}

/// Client name from an explicit label, the line after a DEVIS heading, or an
/// "Affaire :" label, in that order.
pub fn extract_client(text: &str, company: Option<&str>) -> Option<String> {
    if let Some(client) = LabelExtractor::new(&CLIENT_LABEL).extract(text) {
        return Some(client);
    }

    if let Some(client) = client_after_heading(text, company) {
        return Some(client);
    }

    LabelExtractor::new(&AFFAIR_LABEL).extract(text)
}

fn client_after_heading(text: &str, company: Option<&str>) -> Option<String> {
    let mut lines = non_empty_lines(text);
    lines.find(|l| DEVIS_HEADING.is_match(l))?;

    let candidate = lines.next()?;
    let looks_like_client = !candidate.contains([':', '|'])
        && !PLACE_DATE.is_match(candidate)
        && !TABLE_HEADER.is_match(candidate)
        && company != Some(candidate);

    looks_like_client.then(|| candidate.to_string())
}

fn non_empty_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const HEADER: &str = "\
BATI RENOV
12 rue des Lilas 69003 Lyon
DEVIS N° 2024-118
M. et Mme DURAND
Référence Affaire : Rénovation salle de bain
Affaire suivie par : Jean MARTIN Tél : 06 12 34 56 78
Lyon, le 15/03/2024
";

    #[test]
    fn test_affair_reference() {
        assert_eq!(
            extract_affair_reference(HEADER).as_deref(),
            Some("Rénovation salle de bain")
        );
        assert_eq!(
            extract_affair_reference("REFERENCE AFFAIRE | Toiture | |").as_deref(),
            Some("Toiture")
        );
    }

    #[test]
    fn test_followed_by_stops_at_keyword() {
        assert_eq!(extract_followed_by(HEADER).as_deref(), Some("Jean MARTIN"));
        assert_eq!(
            extract_followed_by("Affaire suivie par Paul DUPONT").as_deref(),
            Some("Paul DUPONT")
        );
    }

    #[test]
    fn test_company_and_address() {
        assert_eq!(
            extract_company(HEADER),
            Some(Company {
                name: "BATI RENOV".to_string(),
                address: Some("12 rue des Lilas 69003 Lyon".to_string()),
            })
        );
    }

    #[test]
    fn test_company_only_in_leading_lines() {
        let text = "a\nb\nc\nd\ne\nLATE COMPANY";
        assert_eq!(extract_company(text), None);

        let text = "DEVIS\nSARL DUPONT-TP\nContact: x";
        let company = extract_company(text).unwrap();
        assert_eq!(company.name, "SARL DUPONT-TP");
        assert_eq!(company.address, None);
    }

    #[test]
    fn test_client_after_devis_heading() {
        assert_eq!(
            extract_client(HEADER, Some("BATI RENOV")).as_deref(),
            Some("M. et Mme DURAND")
        );
    }

    #[test]
    fn test_client_label_wins() {
        let text = "DEVIS\nObjet\nClient : SCI Les Tilleuls\nAffaire : Toiture";
        assert_eq!(extract_client(text, None).as_deref(), Some("SCI Les Tilleuls"));
    }

    #[test]
    fn test_client_from_affair_label() {
        let text = "Affaire : Résidence du Parc\nN° | Désignation | Qté";
        assert_eq!(extract_client(text, None).as_deref(), Some("Résidence du Parc"));
    }

    #[test]
    fn test_no_client() {
        assert_eq!(extract_client("lorem ipsum\ndolor sit amet", None), None);
    }
}
