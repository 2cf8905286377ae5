//! Regex patterns for French quote documents.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Labeled header fields
    pub static ref AFFAIR_REFERENCE: Regex = Regex::new(
        r"(?i)R[eé]f[eé]rence\s+(?:de\s+l'\s*)?affaire\s*[:|]?\s*([^\n|]+)"
    ).unwrap();

    pub static ref FOLLOWED_BY: Regex = Regex::new(
        r"(?i)Affaire\s+suivie\s+par\s*[:|]?\s*([^\n|]+)"
    ).unwrap();

    /// Keywords that end a free-text label value on the same line.
    pub static ref SECTION_KEYWORD: Regex = Regex::new(
        r"(?i)\s*\b(?:T[eé]l(?:[eé]phone)?|Portable|Mobile|Fax|E-?mail|Courriel|R[eé]f[eé]rence|Date|Client|Devis)\b"
    ).unwrap();

    pub static ref CLIENT_LABEL: Regex = Regex::new(
        r"(?im)^[^\S\n]*(?:Client|Ma[iî]tre\s+d'ouvrage)\s*:\s*([^\n|]+)"
    ).unwrap();

    pub static ref AFFAIR_LABEL: Regex = Regex::new(
        r"(?im)^[^\S\n]*Affaire\s*:\s*([^\n|]+)"
    ).unwrap();

    pub static ref DEVIS_HEADING: Regex = Regex::new(
        r"^DEVIS\b"
    ).unwrap();

    // "Paris, le 15/03/2024"
    pub static ref PLACE_DATE: Regex = Regex::new(
        r"(?m)^[^\S\n]*(?:Fait\s+[àa]\s+)?(\p{L}[\p{L}' \-]*?)\s*,\s*le\s+(\d{2})/(\d{2})/(\d{4})"
    ).unwrap();

    /// Upper-case letters, spaces and hyphens only.
    pub static ref COMPANY_LINE: Regex = Regex::new(
        r"^\p{Lu}[\p{Lu} \-]*$"
    ).unwrap();

    // Dates as typed in spreadsheets
    pub static ref DATE_DMY: Regex = Regex::new(
        r"^(\d{1,2})[./\-](\d{1,2})[./\-](\d{4})$"
    ).unwrap();

    pub static ref DATE_YMD: Regex = Regex::new(
        r"^(\d{4})-(\d{1,2})-(\d{1,2})"
    ).unwrap();

    // Pipe-delimited table rows
    pub static ref TABLE_HEADER: Regex = Regex::new(
        r"(?i)N[°º]\s*\|\s*D[eé]signation"
    ).unwrap();

    pub static ref SEPARATOR_ROW: Regex = Regex::new(
        r"^[\s|:\-=_+]+$"
    ).unwrap();

    pub static ref TOTAL_LABEL: Regex = Regex::new(
        r"(?i)^(?:sous[\s\-]*)?total\b|^net\s+[àa]\s+payer|^(?:total\s+)?t\.?\s*v\.?\s*a(?:\.|\b)"
    ).unwrap();

    pub static ref TOTAL_HT_LABEL: Regex = Regex::new(
        r"(?i)^total\s*h\.?\s*t\.?$"
    ).unwrap();

    pub static ref TOTAL_TTC_LABEL: Regex = Regex::new(
        r"(?i)^total\s*t\.?\s*t\.?\s*c\.?$"
    ).unwrap();

    pub static ref TVA_LABEL: Regex = Regex::new(
        r"(?i)^(?:total\s+)?t\.?\s*v\.?\s*a(?:\.|\b)"
    ).unwrap();

    pub static ref VAT_RATE: Regex = Regex::new(
        r"(\d{1,2}(?:[.,]\d{1,2})?)\s*%"
    ).unwrap();
}
