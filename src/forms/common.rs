//! Common utilities for form generation.
//!
//! Shared helpers for date formatting, blank-value handling and default paths.

use chrono::{Datelike, NaiveDate};
use std::path::Path;

/// Format a date the way Polish forms print it (e.g., "1.12.2024").
pub fn format_polish_date(date: NaiveDate) -> String {
    format!("{}.{:02}.{}", date.day(), date.month(), date.year())
}

/// Format a date as ISO `YYYY-MM-DD`, used in file names.
pub fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Trimmed value, or `None` when the value is missing or whitespace only.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Keep only ASCII digits (identifiers are often typed as "123-456-78-90").
pub fn digits_only(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Get the static assets directory path.
pub fn get_static_dir() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/static"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_polish_date() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
        assert_eq!(format_polish_date(date), "1.12.2024");

        let date = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        assert_eq!(format_polish_date(date), "15.03.2025");
    }

    #[test]
    fn test_iso_date() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 9).unwrap();
        assert_eq!(iso_date(date), "2024-02-09");
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  NIP  ")), Some("NIP"));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn test_digits_only() {
        assert_eq!(digits_only("123-456-78-90"), "1234567890");
        assert_eq!(digits_only("PL 526 000 12 46"), "5260001246");
    }
}
