//! Calendar date handling.
//!
//! Dates are stored and compared as `YYYY-MM-DD` strings. Anything coming from
//! a caller is parsed into a [`NaiveDate`] first and re-formatted, so the
//! strings handed to a store always carry zero padding and compare correctly.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{ClimateError, Result};

/// Storage and wire format of every date in the system
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` calendar date
///
/// The year must be exactly four digits with no sign; month and day may
/// omit zero padding.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    if !has_date_shape(input) {
        return Err(ClimateError::InvalidDate(format!("{input}: expected YYYY-MM-DD")));
    }

    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .map_err(|e| ClimateError::InvalidDate(format!("{input}: {e}")))
}

fn has_date_shape(input: &str) -> bool {
    let digits = |part: &str, min: usize, max: usize| {
        (min..=max).contains(&part.len()) && part.bytes().all(|b| b.is_ascii_digit())
    };

    let mut parts = input.split('-');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(year), Some(month), Some(day), None) => {
            digits(year, 4, 4) && digits(month, 1, 2) && digits(day, 1, 2)
        }
        _ => false,
    }
}

/// Format a date as `YYYY-MM-DD`
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse and re-format, yielding the canonical zero-padded form
pub fn normalize_date(input: &str) -> Result<String> {
    parse_date(input).map(format_date)
}

/// The same calendar day one year earlier.
///
/// 29 February maps to 28 February of the previous year.
pub fn one_year_prior(date: NaiveDate) -> NaiveDate {
    date.checked_sub_months(Months::new(12))
        .unwrap_or(NaiveDate::MIN)
}

/// The most recent observation date and the date one year before it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceWindow {
    pub most_recent: String,
    pub one_year_prior: String,
}

impl ReferenceWindow {
    /// Build the window from the store's maximum measurement date.
    ///
    /// A stored value that is not a calendar date is a data problem, not a
    /// caller problem, so it maps to [`ClimateError::CorruptData`].
    pub fn from_most_recent(most_recent: &str) -> Result<Self> {
        let date = parse_date(most_recent).map_err(|_| {
            ClimateError::CorruptData(format!(
                "most recent measurement date '{most_recent}' is not YYYY-MM-DD"
            ))
        })?;

        Ok(Self {
            most_recent: format_date(date),
            one_year_prior: format_date(one_year_prior(date)),
        })
    }

    /// True if `date` lies inside the window, bounds included
    pub fn contains(&self, date: &str) -> bool {
        date >= self.one_year_prior.as_str() && date <= self.most_recent.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_parse_valid_dates() {
        assert_eq!(
            parse_date("2017-08-23").unwrap(),
            NaiveDate::from_ymd_opt(2017, 8, 23).unwrap()
        );
        assert_eq!(normalize_date("2017-1-5").unwrap(), "2017-01-05");
    }

    #[test]
    fn test_parse_invalid_dates() {
        for input in [
            "2020-13-40",
            "not-a-date",
            "2017-02-30",
            "",
            "2017/01/01",
            "20170101",
            "+2017-01-01",
            "-2017-01-01",
            "02017-01-01",
            "2017-001-01",
            "2017-01-01-01",
            " 2017-01-01",
        ] {
            assert_matches!(parse_date(input), Err(ClimateError::InvalidDate(_)), "{input}");
        }
    }

    #[test]
    fn test_one_year_prior() {
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();

        assert_eq!(one_year_prior(d(2017, 8, 23)), d(2016, 8, 23));
        assert_eq!(one_year_prior(d(2017, 1, 1)), d(2016, 1, 1));
        // Leap day clamps to the end of February
        assert_eq!(one_year_prior(d(2016, 2, 29)), d(2015, 2, 28));
        // Crossing a leap day keeps month/day rather than shifting by 365 days
        assert_eq!(one_year_prior(d(2016, 3, 1)), d(2015, 3, 1));
    }

    #[test]
    fn test_reference_window() {
        let window = ReferenceWindow::from_most_recent("2017-08-23").unwrap();

        assert_eq!(window.most_recent, "2017-08-23");
        assert_eq!(window.one_year_prior, "2016-08-23");
        assert!(window.contains("2016-08-23"));
        assert!(window.contains("2017-08-23"));
        assert!(!window.contains("2016-08-22"));
    }

    #[test]
    fn test_reference_window_corrupt_date() {
        assert_matches!(
            ReferenceWindow::from_most_recent("garbage"),
            Err(ClimateError::CorruptData(_))
        );
    }
}
