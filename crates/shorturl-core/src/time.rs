//! RFC 3339 text form of timestamps, as persisted and put on the wire.
//!
//! Timestamps are rendered in UTC at whole-second precision, e.g.
//! `2024-01-01T00:00:00Z`. Parsing accepts `Z` or a numeric `±hh:mm` offset
//! and an optional fraction, and nothing else: basic format, a space
//! separator, missing seconds and bracketed time zones are all rejected.

use crate::error::StorageError;
use jiff::Timestamp;

const RFC3339_SECONDS: &str = "%Y-%m-%dT%H:%M:%SZ";
const DATE_TIME_SHAPE: &[u8; 19] = b"dddd-dd-ddTdd:dd:dd";

/// Formats `ts` as RFC 3339 UTC, dropping any sub-second part.
pub fn format_rfc3339(ts: Timestamp) -> String {
    ts.strftime(RFC3339_SECONDS).to_string()
}

/// Parses a stored RFC 3339 timestamp.
///
/// `field` names the column in the error message. Any parse failure is
/// reported as [`StorageError::Corrupt`].
pub fn parse_rfc3339(field: &str, value: &str) -> Result<Timestamp, StorageError> {
    if !is_rfc3339(value) {
        return Err(StorageError::Corrupt(format!(
            "invalid {field} timestamp '{value}': not an RFC 3339 date-time"
        )));
    }
    value.parse::<Timestamp>().map_err(|e| {
        StorageError::Corrupt(format!("invalid {field} timestamp '{value}': {e}"))
    })
}

/// Checks the `YYYY-MM-DDTHH:MM:SS[.fff](Z|±hh:mm)` layout. Field ranges are
/// left to the parser.
fn is_rfc3339(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() < DATE_TIME_SHAPE.len() {
        return false;
    }
    let (date_time, rest) = bytes.split_at(DATE_TIME_SHAPE.len());
    let date_time_ok = date_time
        .iter()
        .zip(DATE_TIME_SHAPE)
        .all(|(&b, &shape)| match shape {
            b'd' => b.is_ascii_digit(),
            _ => b == shape,
        });
    if !date_time_ok {
        return false;
    }

    let offset = match rest.split_first() {
        Some((&b'.', fraction)) => {
            let digits = fraction.iter().take_while(|b| b.is_ascii_digit()).count();
            if digits == 0 {
                return false;
            }
            &fraction[digits..]
        }
        _ => rest,
    };

    match offset {
        [b'Z'] => true,
        [sign, h1, h2, b':', m1, m2] => {
            matches!(*sign, b'+' | b'-') && [h1, h2, m1, m2].iter().all(|b| b.is_ascii_digit())
        }
        _ => false,
    }
}

/// Drops the sub-second part of `ts`.
pub fn truncate_to_second(ts: Timestamp) -> Timestamp {
    Timestamp::from_second(ts.as_second()).unwrap_or(ts)
}
