use chrono::NaiveDate;
use std::str::FromStr;

use crate::error::InventoryError;

/// Trims a submitted value and treats an empty field as absent.
pub fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Accepts only a run of ASCII digits naming a value above zero.
pub fn parse_positive_id(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse::<i64>().ok().filter(|id| *id > 0)
}

pub fn parse_field<T: FromStr>(label: &str, raw: &str) -> Result<T, InventoryError> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| InventoryError::validation(format!("{} must be a number.", label)))
}

pub fn parse_optional_field<T: FromStr>(
    label: &str,
    raw: Option<String>,
) -> Result<Option<T>, InventoryError> {
    blank_to_none(raw)
        .map(|value| parse_field(label, &value))
        .transpose()
}

/// `YYYY-MM-DD`, falling back to `default` when the field is blank.
pub fn parse_date_or(label: &str, raw: Option<String>, default: NaiveDate) -> Result<NaiveDate, InventoryError> {
    match blank_to_none(raw) {
        Some(value) => NaiveDate::parse_from_str(&value, "%Y-%m-%d").map_err(|_| {
            InventoryError::validation(format!("{} must be a date (YYYY-MM-DD).", label))
        }),
        None => Ok(default),
    }
}
