//! Offset-less ISO 8601 wire formats.
//!
//! The backend serializes `LocalDate` as `YYYY-MM-DD` and
//! `LocalDateTime` as `YYYY-MM-DDTHH:MM:SS` with an optional fractional
//! second. No UTC offset is ever present on the wire, so the Rust side
//! uses `time::Date` and `time::PrimitiveDateTime`.

use time::format_description::BorrowedFormatItem;
use time::macros::{format_description, time};
use time::{Date, PrimitiveDateTime};

const DATE: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");
const DATETIME: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
const DATETIME_FRAC: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]");

/// Parse a `YYYY-MM-DD` calendar date. Returns `None` on any mismatch.
pub fn parse_date(s: &str) -> Option<Date> {
    Date::parse(s.trim(), DATE).ok()
}

/// Parse an offset-less timestamp, with or without fractional seconds.
pub fn parse_datetime(s: &str) -> Option<PrimitiveDateTime> {
    let s = s.trim();
    PrimitiveDateTime::parse(s, DATETIME_FRAC)
        .or_else(|_| PrimitiveDateTime::parse(s, DATETIME))
        .ok()
}

/// Parse either a timestamp or a bare date (taken as midnight).
///
/// Sorting treats any value in a date-typed column as a point in time;
/// this is the conversion it leans on.
pub fn parse_instant(s: &str) -> Option<PrimitiveDateTime> {
    parse_datetime(s).or_else(|| parse_date(s).map(Date::midnight))
}

pub fn format_date(d: Date) -> String {
    d.format(DATE).unwrap_or_else(|_| d.to_string())
}

pub fn format_datetime(dt: PrimitiveDateTime) -> String {
    let fmt = if dt.nanosecond() == 0 {
        DATETIME
    } else {
        DATETIME_FRAC
    };
    dt.format(fmt).unwrap_or_else(|_| dt.to_string())
}

/// First instant of the given day (00:00:00).
pub fn start_of_day(d: Date) -> PrimitiveDateTime {
    d.midnight()
}

/// Last representable instant of the given day (23:59:59.999999999).
pub fn end_of_day(d: Date) -> PrimitiveDateTime {
    PrimitiveDateTime::new(d, time!(23:59:59.999_999_999))
}

// ──────────────────────────────────────────────
// Serde adapters for optional wire fields
// ──────────────────────────────────────────────

pub mod date_option {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;

    pub fn serialize<S: Serializer>(value: &Option<Date>, ser: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => ser.serialize_str(&super::format_date(*d)),
            None => ser.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Option<Date>, D::Error> {
        match Option::<String>::deserialize(de)? {
            None => Ok(None),
            Some(raw) => super::parse_date(&raw).map(Some).ok_or_else(|| {
                serde::de::Error::custom(format!("invalid date `{raw}`: expected YYYY-MM-DD"))
            }),
        }
    }
}

pub mod datetime_option {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::PrimitiveDateTime;

    pub fn serialize<S: Serializer>(
        value: &Option<PrimitiveDateTime>,
        ser: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) => ser.serialize_str(&super::format_datetime(*dt)),
            None => ser.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        de: D,
    ) -> Result<Option<PrimitiveDateTime>, D::Error> {
        match Option::<String>::deserialize(de)? {
            None => Ok(None),
            Some(raw) => super::parse_datetime(&raw).map(Some).ok_or_else(|| {
                serde::de::Error::custom(format!(
                    "invalid timestamp `{raw}`: expected YYYY-MM-DDTHH:MM:SS"
                ))
            }),
        }
    }
}
