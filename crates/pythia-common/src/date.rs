//! Conversion between calendar dates and the service's compact date codes.
//!
//! The remote service keys each day's data on a 6-digit YYMMDD code
//! (`"250613"` is June 13, 2025). This module owns all conversion into that
//! format: encoding calendar components, encoding the current day, and
//! parsing caller-supplied text that may already be a code or may be a
//! natural-language date.

use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;
use thiserror::Error;

/// Years accepted after two-digit windowing.
const MIN_YEAR: i32 = 1900;
const MAX_YEAR: i32 = 2100;

/// Date formats tried, in order, when free text is not already a date code.
const NATURAL_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%B %d, %Y", "%b %d, %Y"];

/// Errors from date encoding and parsing.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum DateError {
    /// The year/month/day triple does not name a real calendar day.
    #[error("invalid calendar date {year:04}-{month:02}-{day:02}")]
    InvalidCalendarDate {
        /// Year after two-digit windowing.
        year: i32,
        /// Month as given.
        month: u32,
        /// Day as given.
        day: u32,
    },

    /// The (windowed) year falls outside the supported range.
    #[error("year {0} is outside the supported range {MIN_YEAR}-{MAX_YEAR}")]
    YearOutOfRange(i32),

    /// The input is not a structurally valid 6-digit date code.
    #[error("'{0}' is not a YYMMDD date code")]
    NotADateCode(String),

    /// The input matched none of the accepted date formats.
    #[error("unrecognized date format: '{0}'")]
    UnrecognizedFormat(String),
}

/// A 6-digit YYMMDD day key, as the service expects it on the wire.
///
/// The inner string is guaranteed to be exactly six ASCII digits. Codes are
/// derived from calendar dates (or accepted as-is from callers who already
/// hold one) and never stored beyond the call that produces them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DateCode(String);

impl DateCode {
    /// Encode the current local calendar date.
    #[must_use]
    pub fn today() -> Self {
        Self::encode(Local::now().date_naive())
    }

    /// Encode a year/month/day triple.
    ///
    /// Two-digit years are windowed first: 0-49 become 20xx, 51-99 become
    /// 19xx. Other values are taken as full years, so 50 falls through to the
    /// range check and is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`DateError::YearOutOfRange`] if the windowed year is outside
    /// 1900-2100, or [`DateError::InvalidCalendarDate`] if the triple does
    /// not name a real day.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        let full_year = match year {
            0..=49 => 2000 + year,
            51..=99 => 1900 + year,
            y => y,
        };

        if !(MIN_YEAR..=MAX_YEAR).contains(&full_year) {
            return Err(DateError::YearOutOfRange(full_year));
        }

        let date = NaiveDate::from_ymd_opt(full_year, month, day).ok_or(
            DateError::InvalidCalendarDate {
                year: full_year,
                month,
                day,
            },
        )?;

        Ok(Self::encode(date))
    }

    /// Accept a string that is already a date code.
    ///
    /// Only the structure is checked (six ASCII digits); the calendar is not
    /// consulted, since lookup keys are passed to the service as given.
    ///
    /// # Errors
    ///
    /// Returns [`DateError::NotADateCode`] if the trimmed input is not six
    /// ASCII digits.
    pub fn parse(input: &str) -> Result<Self, DateError> {
        let trimmed = input.trim();
        if Self::is_date_code(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(DateError::NotADateCode(input.to_string()))
        }
    }

    /// Parse a natural or ISO date string and encode it.
    ///
    /// Tries `%Y-%m-%d`, `%m/%d/%Y`, `%B %d, %Y`, and `%b %d, %Y` in order.
    ///
    /// # Errors
    ///
    /// Returns [`DateError::UnrecognizedFormat`] if no format matches, or
    /// [`DateError::YearOutOfRange`] if the parsed year is outside 1900-2100.
    pub fn from_natural(input: &str) -> Result<Self, DateError> {
        let trimmed = input.trim();
        for format in NATURAL_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
                if !(MIN_YEAR..=MAX_YEAR).contains(&date.year()) {
                    return Err(DateError::YearOutOfRange(date.year()));
                }
                return Ok(Self::encode(date));
            }
        }
        Err(DateError::UnrecognizedFormat(input.to_string()))
    }

    /// Resolve caller-supplied text that may already be a code.
    ///
    /// Input that structurally looks like a code is passed through unchanged;
    /// anything else goes through [`Self::from_natural`].
    ///
    /// # Errors
    ///
    /// Returns [`DateError::UnrecognizedFormat`] if the input is neither a
    /// code nor a recognized date string.
    pub fn resolve(input: &str) -> Result<Self, DateError> {
        let trimmed = input.trim();
        if Self::is_date_code(trimmed) {
            Self::parse(trimmed)
        } else {
            Self::from_natural(trimmed)
        }
    }

    /// Structural check: exactly six ASCII digits, no calendar validation.
    #[must_use]
    pub fn is_date_code(input: &str) -> bool {
        input.len() == 6 && input.bytes().all(|b| b.is_ascii_digit())
    }

    /// The code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn encode(date: NaiveDate) -> Self {
        Self(date.format("%y%m%d").to_string())
    }
}

impl std::fmt::Display for DateCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for DateCode {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn encodes_full_years() {
        assert_eq!(DateCode::from_ymd(2025, 3, 15).unwrap().as_str(), "250315");
        assert_eq!(DateCode::from_ymd(1999, 12, 31).unwrap().as_str(), "991231");
        assert_eq!(DateCode::from_ymd(2024, 6, 13).unwrap().as_str(), "240613");
    }

    #[test]
    fn windows_two_digit_years() {
        assert_eq!(DateCode::from_ymd(24, 6, 13).unwrap().as_str(), "240613");
        assert_eq!(DateCode::from_ymd(0, 1, 1).unwrap().as_str(), "000101");
        assert_eq!(DateCode::from_ymd(49, 12, 31).unwrap().as_str(), "491231");
        assert_eq!(DateCode::from_ymd(51, 1, 1).unwrap().as_str(), "510101");
        assert_eq!(DateCode::from_ymd(99, 1, 2).unwrap().as_str(), "990102");
    }

    #[test]
    fn rejects_year_fifty_and_out_of_range_years() {
        assert_eq!(
            DateCode::from_ymd(50, 1, 1),
            Err(DateError::YearOutOfRange(50))
        );
        assert_eq!(
            DateCode::from_ymd(1899, 12, 31),
            Err(DateError::YearOutOfRange(1899))
        );
        assert_eq!(
            DateCode::from_ymd(2101, 1, 1),
            Err(DateError::YearOutOfRange(2101))
        );
    }

    #[test]
    fn rejects_impossible_calendar_dates() {
        assert_eq!(
            DateCode::from_ymd(2025, 13, 1),
            Err(DateError::InvalidCalendarDate {
                year: 2025,
                month: 13,
                day: 1
            })
        );
        assert!(DateCode::from_ymd(2025, 2, 30).is_err());
        assert!(DateCode::from_ymd(2025, 0, 10).is_err());
    }

    #[test]
    fn leap_day_is_valid_only_in_leap_years() {
        assert_eq!(DateCode::from_ymd(2024, 2, 29).unwrap().as_str(), "240229");
        assert!(DateCode::from_ymd(2025, 2, 29).is_err());
    }

    #[test]
    fn today_is_stable_within_a_day() {
        let first = DateCode::today();
        let second = DateCode::today();
        assert_eq!(first, second);
        assert!(DateCode::is_date_code(first.as_str()));
    }

    #[test]
    fn structural_check_accepts_only_six_ascii_digits() {
        assert!(DateCode::is_date_code("250613"));
        assert!(DateCode::is_date_code("000000"));
        assert!(!DateCode::is_date_code("25061"));
        assert!(!DateCode::is_date_code("2506134"));
        assert!(!DateCode::is_date_code("25a613"));
        assert!(!DateCode::is_date_code(""));
        // Unicode digits are not ASCII digits
        assert!(!DateCode::is_date_code("２５０６１３"));
    }

    #[test]
    fn parse_accepts_codes_without_calendar_validation() {
        assert_eq!(DateCode::parse("250613").unwrap().as_str(), "250613");
        assert_eq!(DateCode::parse(" 250613 ").unwrap().as_str(), "250613");
        // 999999 is no calendar day, but the service owns that judgment
        assert_eq!(DateCode::parse("999999").unwrap().as_str(), "999999");
        assert!(matches!(
            DateCode::parse("March 15, 2025"),
            Err(DateError::NotADateCode(_))
        ));
    }

    #[test]
    fn natural_dates_parse_in_several_formats() {
        assert_eq!(
            DateCode::from_natural("March 15, 2025").unwrap().as_str(),
            "250315"
        );
        assert_eq!(
            DateCode::from_natural("Mar 15, 2025").unwrap().as_str(),
            "250315"
        );
        assert_eq!(
            DateCode::from_natural("2025-03-15").unwrap().as_str(),
            "250315"
        );
        assert_eq!(
            DateCode::from_natural("03/15/2025").unwrap().as_str(),
            "250315"
        );
    }

    #[test]
    fn natural_parse_rejects_unknown_formats_and_far_years() {
        assert!(matches!(
            DateCode::from_natural("the ides of March"),
            Err(DateError::UnrecognizedFormat(_))
        ));
        assert_eq!(
            DateCode::from_natural("1850-01-01"),
            Err(DateError::YearOutOfRange(1850))
        );
    }

    #[test]
    fn resolve_passes_codes_through_and_parses_everything_else() {
        assert_eq!(DateCode::resolve("250613").unwrap().as_str(), "250613");
        assert_eq!(DateCode::resolve(" 250613 ").unwrap().as_str(), "250613");
        assert_eq!(
            DateCode::resolve("March 15, 2025").unwrap().as_str(),
            "250315"
        );
        assert!(matches!(
            DateCode::resolve("not a date"),
            Err(DateError::UnrecognizedFormat(_))
        ));
    }

    #[test]
    fn display_matches_inner_code() {
        let code = DateCode::parse("250613").unwrap();
        assert_eq!(code.to_string(), "250613");
        assert_eq!(format!("{code}"), code.as_str());
    }

    #[test]
    fn from_str_round_trips() {
        let code: DateCode = "250613".parse().unwrap();
        assert_eq!(code.as_str(), "250613");
    }
}

#[cfg(test)]
mod proptests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn valid_triples_encode_to_six_digits(
            year in 1900..=2100i32,
            month in 1u32..=12,
            day in 1u32..=28,
        ) {
            let code = DateCode::from_ymd(year, month, day).unwrap();
            prop_assert_eq!(code.as_str().len(), 6);
            prop_assert!(DateCode::is_date_code(code.as_str()));
        }

        #[test]
        fn arbitrary_triples_never_panic(
            year in any::<i32>(),
            month in any::<u32>(),
            day in any::<u32>(),
        ) {
            let _ = DateCode::from_ymd(year, month, day);
        }

        #[test]
        fn structural_check_never_panics(input in ".*") {
            let accepted = DateCode::is_date_code(&input);
            if accepted {
                prop_assert_eq!(input.len(), 6);
            }
        }
    }
}
