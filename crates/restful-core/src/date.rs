//! ISO-8601 calendar date strings
//!
//! Representations carry local dates as `YYYY-MM-DD` strings. Input may also
//! use the reduced forms `YYYY` and `YYYY-MM`, which name the first day of
//! the year or month. An empty string stands for "no date" on input; a
//! missing date prints as nothing.

use jiff::civil::Date;

/// Failure to read a calendar date string
#[derive(Debug, thiserror::Error)]
pub enum DateError {
    /// Input is not an ISO-8601 calendar date
    #[error("invalid ISO-8601 date `{input}`")]
    Invalid {
        input: String,
        #[source]
        source: jiff::Error,
    },
}

/// Parse an ISO-8601 calendar date, treating empty input as no date
///
/// # Errors
///
/// Returns [`DateError::Invalid`] if the input is non-empty and not a valid date
pub fn parse_date(input: &str) -> Result<Option<Date>, DateError> {
    if input.is_empty() {
        return Ok(None);
    }

    let parsed = match reduced_precision_suffix(input) {
        Some(suffix) => format!("{input}{suffix}").parse::<Date>(),
        None => input.parse::<Date>(),
    };

    parsed.map(Some).map_err(|source| DateError::Invalid {
        input: input.to_owned(),
        source,
    })
}

/// Completion that turns `YYYY` or `YYYY-MM` into a full calendar date
fn reduced_precision_suffix(input: &str) -> Option<&'static str> {
    let bytes = input.as_bytes();
    let digits = |range: std::ops::Range<usize>| bytes[range].iter().all(u8::is_ascii_digit);

    match bytes.len() {
        4 if digits(0..4) => Some("-01-01"),
        7 if digits(0..4) && bytes[4] == b'-' && digits(5..7) => Some("-01"),
        _ => None,
    }
}

/// Print a date as `YYYY-MM-DD`, or nothing if there is no date
pub fn print_date(date: Option<Date>) -> Option<String> {
    date.map(|date| date.to_string())
}

/// Serde adapters for date fields carried as ISO-8601 strings
pub mod iso_date {
    /// For `Option<Date>` fields: `null` and `""` both read as `None`
    ///
    /// Use with `#[serde(with = "restful_core::date::iso_date::option", default)]`.
    pub mod option {
        use jiff::civil::Date;
        use serde::{Deserialize, Deserializer, Serializer};

        /// # Errors
        ///
        /// Propagates serializer errors
        #[allow(clippy::ref_option)]
        pub fn serialize<S>(date: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match super::super::print_date(*date) {
                Some(text) => serializer.serialize_str(&text),
                None => serializer.serialize_none(),
            }
        }

        /// # Errors
        ///
        /// Returns an error if the value is not a string, null, or a valid date
        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let text = Option::<String>::deserialize(deserializer)?;
            match text {
                Some(text) => super::super::parse_date(&text).map_err(serde::de::Error::custom),
                None => Ok(None),
            }
        }
    }
}
