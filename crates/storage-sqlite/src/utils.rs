//! Conversion helpers shared by the repository models.

use chrono::{DateTime, SecondsFormat, Utc};
use pistosi_core::errors::{Result, ValidationError};
use rust_decimal::Decimal;

/// Serialize a timestamp for storage. Fixed microsecond precision in UTC so
/// the TEXT column sorts lexicographically in chronological order; the
/// ledger's `ORDER BY created_at` relies on this.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| ValidationError::InvalidTimestamp(format!("{raw}: {e}")).into())
}

/// Parse a stored decimal amount. Amounts are written by this crate via
/// `Decimal::to_string`, so a parse failure means a corrupted row and is
/// surfaced as an error rather than silently read as zero.
pub fn parse_amount(raw: &str) -> Result<Decimal> {
    raw.parse::<Decimal>()
        .map_err(|e| ValidationError::DecimalParse(e).into())
}
