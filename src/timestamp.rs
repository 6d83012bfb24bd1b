//! Fixed-offset timestamp rendering.
//!
//! Every timestamp this service writes (request log lines, tracing output,
//! `requestTime` in API responses, log file names) is rendered in India
//! Standard Time, UTC+05:30. The offset is a constant: no time zone database
//! lookup happens, so output is identical on every host regardless of its
//! local zone or installed zone data.
//!
//! Patterns use [`chrono::format::strftime`] syntax.

use chrono::{DateTime, FixedOffset, Offset, Utc};

/// Offset of the target civil time zone from UTC, in seconds (+05:30).
pub const IST_OFFSET_SECONDS: i32 = 5 * 3600 + 30 * 60;

/// `dd/MM/yyyy hh:mm:ss tt`, used for request log lines.
pub const LOG_LINE_FORMAT: &str = "%d/%m/%Y %I:%M:%S %p";

/// `dd/MM/yyyy hh:mm:ss`, used for `requestTime` in API responses.
pub const RESPONSE_TIME_FORMAT: &str = "%d/%m/%Y %I:%M:%S";

/// `dd-MM-yyyy hh:mm:ss tt`, used for tracing console and file output.
pub const CONSOLE_FORMAT: &str = "%d-%m-%Y %I:%M:%S %p";

/// `dd-MM-yyyy`, used in request log file names.
pub const FILE_DATE_FORMAT: &str = "%d-%m-%Y";

/// The fixed UTC+05:30 offset.
#[must_use]
pub fn ist_offset() -> FixedOffset {
    // east_opt only rejects offsets of a day or more
    FixedOffset::east_opt(IST_OFFSET_SECONDS).unwrap_or_else(|| Utc.fix())
}

/// Convert `instant` to UTC+05:30 and render it with `pattern`.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use payload_validator::timestamp::{format_local, LOG_LINE_FORMAT};
///
/// let instant = Utc.with_ymd_and_hms(2024, 3, 15, 20, 45, 10).unwrap();
/// assert_eq!(format_local(instant, LOG_LINE_FORMAT), "16/03/2024 02:15:10 AM");
/// ```
#[must_use]
pub fn format_local(instant: DateTime<Utc>, pattern: &str) -> String {
    instant.with_timezone(&ist_offset()).format(pattern).to_string()
}
