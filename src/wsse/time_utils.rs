//! Clock access and XML-schema datetime formatting.

use crate::wsse::error::WsseError;
use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use std::time::Duration;

/// Current UTC time.
///
/// Wrapped in a `Result` so it can stand in for any user supplied time
/// provider, which may fail.
pub(crate) fn current_time() -> Result<DateTime<Utc>, WsseError> {
    Ok(Utc::now())
}

/// Formats a UTC instant as an `xs:dateTime`, e.g. `2024-01-01T12:00:00Z`.
pub fn xs_datetime(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Returns `created + ttl`, saturating at the largest representable instant.
pub(crate) fn expires_after(created: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    TimeDelta::from_std(ttl)
        .ok()
        .and_then(|delta| created.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
