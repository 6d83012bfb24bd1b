//! Field-level validation of listing requests.
//!
//! [`validate`] is a pure function: it looks only at the payload and the
//! supplied "now", and returns one human-readable message per broken rule.
//! An empty list means the payload is valid.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Violation for a security code that is not four letters or digits.
pub const SEC_CODE_INVALID: &str = "SecCode must be exactly 4 alphanumeric characters.";
/// Violation for a non-positive row count.
pub const ROW_COUNT_INVALID: &str = "RowCount must be greater than 0.";
/// Violation for a negative page index.
pub const PAGE_INDEX_INVALID: &str = "PageIndex must be non-negative.";
/// Violation for a date after the current instant.
pub const DT_DATE_IN_FUTURE: &str = "DtDate cannot be a future date.";

const SEC_CODE_LEN: usize = 4;

/// Listing request payload.
///
/// Missing fields take their defaults, so `{}` deserializes and then fails
/// validation on `secCode` and `rowCount` rather than being rejected as
/// malformed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidationRequest {
    /// Four-character alphanumeric security code
    #[serde(alias = "SecCode")]
    #[schema(example = "AB12")]
    pub sec_code: String,
    /// Rows per page, must be positive
    #[serde(alias = "RowCount")]
    #[schema(example = 10)]
    pub row_count: i32,
    /// Whether live price data is requested
    #[serde(rename = "bLivePriceData", alias = "BLivePriceData")]
    pub live_price_data: bool,
    /// Zero-based page index
    #[serde(alias = "PageIndex")]
    pub page_index: i32,
    /// Optional as-of date, must not be in the future
    #[serde(
        rename = "dtDate",
        alias = "DtDate",
        deserialize_with = "deserialize_optional_date"
    )]
    #[schema(value_type = Option<String>, format = DateTime, example = "2024-01-31")]
    pub date: Option<DateTime<Utc>>,
}

impl Default for ValidationRequest {
    fn default() -> Self {
        Self {
            sec_code: String::new(),
            row_count: 0,
            live_price_data: true,
            page_index: 0,
            date: None,
        }
    }
}

/// Check `request` against every rule, using `now` as the current instant.
///
/// Violations are reported in rule order: security code, row count, page
/// index, date.
#[must_use]
pub fn validate(request: &ValidationRequest, now: DateTime<Utc>) -> Vec<String> {
    let mut errors = Vec::new();

    if !is_valid_sec_code(&request.sec_code) {
        errors.push(SEC_CODE_INVALID.to_string());
    }

    if request.row_count <= 0 {
        errors.push(ROW_COUNT_INVALID.to_string());
    }

    if request.page_index < 0 {
        errors.push(PAGE_INDEX_INVALID.to_string());
    }

    if request.date.is_some_and(|date| date > now) {
        errors.push(DT_DATE_IN_FUTURE.to_string());
    }

    errors
}

/// Exactly four UTF-16 code units, each a letter or a decimal digit.
///
/// Characters outside the Basic Multilingual Plane never qualify, nor do
/// numeric letters such as `Ⅻ` or other numerics such as `²`.
#[must_use]
pub fn is_valid_sec_code(code: &str) -> bool {
    code.encode_utf16().count() == SEC_CODE_LEN && code.chars().all(is_letter_or_digit)
}

fn is_letter_or_digit(c: char) -> bool {
    c.len_utf16() == 1 && ((c.is_alphabetic() && !c.is_numeric()) || c.is_ascii_digit())
}

/// Parse an RFC 3339 timestamp, a naive `YYYY-MM-DDTHH:MM:SS[.f]` (read as
/// UTC), or a bare `YYYY-MM-DD` (midnight UTC).
#[must_use]
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&Utc));
    }

    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, pattern) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_date(value).map(Some).ok_or_else(|| {
            serde::de::Error::custom(format!("dtDate is not a recognised date: {value}"))
        }),
    }
}
