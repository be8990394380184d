//! Date-pattern templates
//!
//! Contract file names carry a single `{date}` placeholder that is replaced
//! with a six-digit `DDMMYY` token, e.g. `debitcard_input_{date}.csv` becomes
//! `debitcard_input_080725.csv` for 8 July 2025.

use crate::error::{Error, Result};
use chrono::{Local, NaiveDate};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

/// Placeholder substituted with the date token
pub const DATE_PLACEHOLDER: &str = "{date}";

/// strftime format of the token used in file names
pub const DATE_FORMAT: &str = "%d%m%y";

/// Regex for a raw six-digit token
static TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{6}$").unwrap());

/// A validated `DDMMYY` date token
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DateToken(String);

impl DateToken {
    /// Token for the current local date
    pub fn today() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    /// Token for a calendar date
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.format(DATE_FORMAT).to_string())
    }

    /// Parse a caller-supplied date.
    ///
    /// Accepts `DDMMYY`, `YYYY-MM-DD` and the literal `today`. The token must
    /// name a real calendar day.
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("today") {
            return Ok(Self::today());
        }

        if TOKEN_REGEX.is_match(value) {
            return NaiveDate::parse_from_str(value, DATE_FORMAT)
                .map(|_| Self(value.to_string()))
                .map_err(|_| Error::invalid_date(value));
        }

        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Self::from_date)
            .map_err(|_| Error::invalid_date(value))
    }

    /// Resolve an optional caller date, defaulting to today
    pub fn from_option(value: Option<&str>) -> Result<Self> {
        match value {
            Some(v) if !v.trim().is_empty() => Self::parse(v),
            _ => Ok(Self::today()),
        }
    }

    /// The raw six-digit token
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Calendar date this token encodes
    pub fn to_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.0, DATE_FORMAT).ok()
    }
}

impl fmt::Display for DateToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Count `{date}` placeholders in a pattern
pub fn placeholder_count(pattern: &str) -> usize {
    pattern.matches(DATE_PLACEHOLDER).count()
}

/// Check that a file pattern is usable: one placeholder, no directories
pub fn validate_pattern(pattern: &str) -> Result<()> {
    match placeholder_count(pattern) {
        1 => {}
        n => {
            return Err(Error::config(format!(
                "Pattern '{pattern}' must contain exactly one {DATE_PLACEHOLDER} placeholder, found {n}"
            )))
        }
    }

    if pattern.contains('/') || pattern.contains('\\') || pattern.contains("..") {
        return Err(Error::config(format!(
            "Pattern '{pattern}' must be a bare file name"
        )));
    }

    Ok(())
}

/// Substitute the date token into a pattern
pub fn render(pattern: &str, token: &DateToken) -> String {
    pattern.replace(DATE_PLACEHOLDER, token.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_render_pattern() {
        let token = DateToken::parse("080725").unwrap();
        assert_eq!(
            render("debitcard_input_{date}.csv", &token),
            "debitcard_input_080725.csv"
        );
    }

    #[test]
    fn test_iso_date_converts_to_token() {
        let token = DateToken::parse("2025-07-08").unwrap();
        assert_eq!(token.as_str(), "080725");
        assert_eq!(token.to_date(), NaiveDate::from_ymd_opt(2025, 7, 8));
    }

    #[test]
    fn test_today() {
        let expected = Local::now().date_naive().format("%d%m%y").to_string();
        assert_eq!(DateToken::parse("today").unwrap().as_str(), expected);
        assert_eq!(DateToken::from_option(None).unwrap().as_str(), expected);
        assert_eq!(DateToken::from_option(Some("  ")).unwrap().as_str(), expected);
    }

    #[test_case("320725" ; "day out of range")]
    #[test_case("081325" ; "month out of range")]
    #[test_case("0807251" ; "too long")]
    #[test_case("08-07-25" ; "separators")]
    #[test_case("yesterday" ; "word")]
    #[test_case("2025-02-30" ; "impossible iso")]
    fn test_invalid_dates(value: &str) {
        let err = DateToken::parse(value).unwrap_err();
        assert!(matches!(err, Error::InvalidDate { .. }));
    }

    #[test]
    fn test_validate_pattern() {
        assert!(validate_pattern("ebbs_report_{date}.txt").is_ok());
        assert!(validate_pattern("ebbs_report.txt").is_err());
        assert!(validate_pattern("{date}_{date}.txt").is_err());
        assert!(validate_pattern("../escape_{date}.txt").is_err());
        assert!(validate_pattern("nested/file_{date}.txt").is_err());
    }
}
