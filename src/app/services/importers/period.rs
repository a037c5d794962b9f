//! Period label to timestamp conversion for Nomis extracts
//!
//! Every rule maps a period label onto the last second of the period it
//! covers, so "Jan-16" and "January 2016" both become 2016-01-31T23:59:59.

use crate::error::{ImporterError, Result};
use chrono::{Months, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::LazyLock;

/// "Oct 2016-Sep 2017"
static YEAR_ENDING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z]+)\s+(\d{4})\s*-\s*([A-Za-z]+)\s+(\d{4})$")
        .expect("valid year-ending regex")
});

/// How a datasource's DATE_NAME column is read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeriodRule {
    /// "Jan-16", "January 2016", "Jan 2016"
    Month,
    /// "2016"
    Year,
    /// Twelve months ending in the second month, e.g. "Oct 2016-Sep 2017"
    YearEnding,
}

impl PeriodRule {
    /// Convert a period label into the last second of its period
    pub fn to_timestamp(&self, label: &str) -> Result<NaiveDateTime> {
        let label = label.trim();
        let end = match self {
            PeriodRule::Month => parse_month(label),
            PeriodRule::Year => parse_year(label),
            PeriodRule::YearEnding => parse_year_ending(label),
        };

        end.and_then(|date| date.and_hms_opt(23, 59, 59))
            .ok_or_else(|| ImporterError::invalid_period(label, self))
    }
}

/// Last day of the month named by the label
fn parse_month(label: &str) -> Option<NaiveDate> {
    let label = normalize_month_name(label);
    // %B accepts both the abbreviated and the full month name
    let first = NaiveDate::parse_from_str(&format!("1-{label}"), "%d-%B-%y")
        .or_else(|_| NaiveDate::parse_from_str(&format!("1 {label}"), "%d %B %Y"))
        .ok()?;
    last_day_of_month(first)
}

/// Rewrite the four-letter "Sept" abbreviation, which chrono does not know
fn normalize_month_name(label: &str) -> Cow<'_, str> {
    match label.get(..4) {
        Some(prefix)
            if prefix.eq_ignore_ascii_case("sept")
                && !label[4..].starts_with(|c: char| c.is_ascii_alphabetic()) =>
        {
            Cow::Owned(format!("Sep{}", &label[4..]))
        }
        _ => Cow::Borrowed(label),
    }
}

fn parse_year(label: &str) -> Option<NaiveDate> {
    if label.len() != 4 {
        return None;
    }
    let year = label.parse::<i32>().ok()?;
    NaiveDate::from_ymd_opt(year, 12, 31)
}

fn parse_year_ending(label: &str) -> Option<NaiveDate> {
    let captures = YEAR_ENDING_RE.captures(label)?;
    parse_month(&format!("{} {}", &captures[3], &captures[4]))
}

fn last_day_of_month(first: NaiveDate) -> Option<NaiveDate> {
    first.checked_add_months(Months::new(1))?.pred_opt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    #[test]
    fn test_month_forms() {
        let rule = PeriodRule::Month;
        assert_eq!(rule.to_timestamp("Jan-16").unwrap(), at("2016-01-31T23:59:59"));
        assert_eq!(rule.to_timestamp("Feb-16").unwrap(), at("2016-02-29T23:59:59"));
        assert_eq!(rule.to_timestamp("Jan 2016").unwrap(), at("2016-01-31T23:59:59"));
        assert_eq!(
            rule.to_timestamp("December 2017").unwrap(),
            at("2017-12-31T23:59:59")
        );
        assert_eq!(rule.to_timestamp(" Jun-17 ").unwrap(), at("2017-06-30T23:59:59"));
    }

    #[test]
    fn test_sept_abbreviation() {
        assert_eq!(
            PeriodRule::Month.to_timestamp("Sept 2017").unwrap(),
            at("2017-09-30T23:59:59")
        );
        assert_eq!(
            PeriodRule::Month.to_timestamp("Sept-17").unwrap(),
            at("2017-09-30T23:59:59")
        );
        assert_eq!(
            PeriodRule::Month.to_timestamp("September 2017").unwrap(),
            at("2017-09-30T23:59:59")
        );
        assert_eq!(
            PeriodRule::YearEnding.to_timestamp("Oct 2016-Sept 2017").unwrap(),
            at("2017-09-30T23:59:59")
        );
    }

    #[test]
    fn test_year() {
        let rule = PeriodRule::Year;
        assert_eq!(rule.to_timestamp("2016").unwrap(), at("2016-12-31T23:59:59"));
        assert!(rule.to_timestamp("16").is_err());
    }

    #[test]
    fn test_year_ending() {
        let rule = PeriodRule::YearEnding;
        assert_eq!(
            rule.to_timestamp("Oct 2016-Sep 2017").unwrap(),
            at("2017-09-30T23:59:59")
        );
        assert_eq!(
            rule.to_timestamp("Jan 2017 - Dec 2017").unwrap(),
            at("2017-12-31T23:59:59")
        );
    }

    #[test]
    fn test_unparseable_period_is_an_error() {
        let error = PeriodRule::Month.to_timestamp("Q1 2016").unwrap_err();
        assert!(matches!(error, ImporterError::InvalidPeriod { .. }));
        assert!(error.to_string().contains("Q1 2016"));

        assert!(PeriodRule::YearEnding.to_timestamp("2016").is_err());
        assert!(PeriodRule::Year.to_timestamp("Jan-16").is_err());
    }
}
