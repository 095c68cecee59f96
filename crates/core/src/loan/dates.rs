//! Serde adapters for the persisted date fields.
//!
//! Reading is lenient because older files carry .NET-style naive datetimes
//! (`2026-02-12T00:00:00`, seven fractional digits, no offset). Writing is
//! always `YYYY-MM-DD` for dates and RFC 3339 UTC for timestamps.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};

const ISO_DATE: &str = "%Y-%m-%d";
const NAIVE_DATETIME: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Parse an ISO-8601 date, ignoring any time component that follows it.
pub fn parse_iso_date(raw: &str) -> Result<NaiveDate, String> {
    let raw = raw.trim();
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, ISO_DATE).map_err(|e| format!("invalid date {raw:?}: {e}"))
}

/// Parse an RFC 3339 timestamp, or a naive datetime/date taken as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, NAIVE_DATETIME) {
        return Ok(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, ISO_DATE)
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
        .map_err(|e| format!("invalid timestamp {raw:?}: {e}"))
}

pub mod optional_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(date) => serializer.serialize_some(&date.format(super::ISO_DATE).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(super::parse_iso_date)
            .transpose()
            .map_err(de::Error::custom)
    }
}

pub mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(super::SecondsFormat::AutoSi, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw).map_err(de::Error::custom)
    }
}
