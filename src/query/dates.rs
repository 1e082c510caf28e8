//! Date validation and the timestamp strings the analytics API expects.
//!
//! Timestamps are written as `YYYY-MM-DDTHH:MM:000Z`. The trailing `000` is part of the
//! format the API accepts, not a seconds/millis field, so it is emitted literally.

use chrono::{Days, Months, NaiveDate};

use crate::config::TimeAgoFormat;
use crate::error::QueryError;

use super::models::Frequency;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(value: &str) -> Result<NaiveDate, QueryError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| QueryError::InvalidDateFormat {
        value: value.to_string(),
    })
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Midnight UTC of an already validated `YYYY-MM-DD` date, written as given.
pub fn midnight(date: &str) -> String {
    format!("{date}T00:00:000Z")
}

/// One minute past midnight UTC of an already validated date, written as given.
pub fn one_minute_past_midnight(date: &str) -> String {
    format!("{date}T00:01:000Z")
}

/// Start timestamp for a relative range; the separator depends on `format`.
pub fn time_ago_start(date: NaiveDate, format: TimeAgoFormat) -> String {
    format!("{}{}00:00:000Z", format_date(date), format.start_separator())
}

/// Step back `value` units of `frequency` from `today`.
///
/// Days and weeks are exact day counts. Months are calendar months, clamped to the last
/// day of the target month (March 31 minus one month is February 29 in a leap year).
pub fn subtract(today: NaiveDate, value: u32, frequency: Frequency) -> Result<NaiveDate, QueryError> {
    let start = match frequency {
        Frequency::Days => today.checked_sub_days(Days::new(u64::from(value))),
        Frequency::Weekly => today.checked_sub_days(Days::new(u64::from(value) * 7)),
        Frequency::Monthly => today.checked_sub_months(Months::new(value)),
    };
    start.ok_or(QueryError::DateOutOfRange { value, frequency })
}
