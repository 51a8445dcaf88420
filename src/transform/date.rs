//! Calendar handling for the API's `cd` column (`"2020-Dec-10 00:00"`).

use chrono::NaiveDate;

use crate::error::{NeoError, Result};

const MONTHS: [(&str, &str); 12] = [
    ("Jan", "01"),
    ("Feb", "02"),
    ("Mar", "03"),
    ("Apr", "04"),
    ("May", "05"),
    ("Jun", "06"),
    ("Jul", "07"),
    ("Aug", "08"),
    ("Sep", "09"),
    ("Oct", "10"),
    ("Nov", "11"),
    ("Dec", "12"),
];

/// Convert API calendar text to an ISO `YYYY-MM-DD` string.
///
/// The time of day is dropped.
pub fn date_from_cd(cd: &str) -> Result<String> {
    let date_part = cd.split_whitespace().next().unwrap_or("");
    let mut parts = date_part.split('-');
    let (year, month, day) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(y), Some(m), Some(d), None) => (y, m, d),
        _ => {
            return Err(NeoError::Parse(format!(
                "calendar date '{}' is not YYYY-Mon-DD",
                cd
            )))
        }
    };

    let month = MONTHS
        .iter()
        .find(|(name, _)| *name == month)
        .map(|(_, num)| *num)
        .ok_or_else(|| NeoError::Parse(format!("unknown month '{}' in '{}'", month, cd)))?;

    Ok(format!("{}-{}-{}", year, month, day))
}

/// Parse an ISO date string.
pub fn parse_iso(date: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|e| NeoError::Parse(format!("invalid date '{}': {}", date, e)))
}

/// `date_from_cd` followed by `parse_iso`; rejects impossible days like Feb 30.
pub fn parse_cd(cd: &str) -> Result<NaiveDate> {
    parse_iso(&date_from_cd(cd)?)
}

/// Signed whole days from `from` to `to` (negative when `to` is earlier).
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}
