//! Stay normalization: date parsing, UTC-day truncation and nights.
//!
//! Checkin/checkout inputs may carry a time-of-day and a timezone offset.
//! Both are truncated to their UTC calendar day before any comparison, so
//! intraday times and offsets can never produce false overlap positives or
//! negatives. A stay covers the half-open day range `[checkin, checkout)`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use super::error::BookingError;

/// A normalized stay: raw instants, their UTC calendar days, and the number
/// of nights. Computed fresh on every create/update call, never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stay {
    pub checkin: DateTime<Utc>,
    pub checkout: DateTime<Utc>,
    pub checkin_day: NaiveDate,
    pub checkout_day: NaiveDate,
    pub nights: i64,
}

impl Stay {
    /// Normalize a pair of already-parsed instants.
    ///
    /// Fails with `InvalidStayDuration` when the checkout day is not
    /// strictly after the checkin day (nights must be >= 1). A too-short
    /// stay is a rejection, never a clamp.
    pub fn from_instants(
        checkin: DateTime<Utc>,
        checkout: DateTime<Utc>,
    ) -> Result<Self, BookingError> {
        let checkin_day = checkin.date_naive();
        let checkout_day = checkout.date_naive();
        let nights = (checkout_day - checkin_day).num_days();

        if nights <= 0 {
            return Err(BookingError::InvalidStayDuration { nights });
        }

        Ok(Stay {
            checkin,
            checkout,
            checkin_day,
            checkout_day,
            nights,
        })
    }

    /// Parse and normalize a pair of date-like strings.
    pub fn normalize(checkin: &str, checkout: &str) -> Result<Self, BookingError> {
        let checkin = parse_date_value("checkin date", checkin)?;
        let checkout = parse_date_value("checkout date", checkout)?;
        Self::from_instants(checkin, checkout)
    }
}

/// Parse a date-like string into a UTC instant.
///
/// Accepts RFC 3339 timestamps (any offset), bare `YYYY-MM-DDTHH:MM:SS`
/// datetimes (read as UTC), and plain `YYYY-MM-DD` dates (UTC midnight).
pub fn parse_date_value(field: &'static str, value: &str) -> Result<DateTime<Utc>, BookingError> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(instant.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Ok(Utc.from_utc_datetime(&naive));
    }
    if let Ok(day) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        let midnight = day.and_hms_opt(0, 0, 0).expect("midnight is always valid");
        return Ok(Utc.from_utc_datetime(&midnight));
    }

    Err(BookingError::InvalidDateFormat {
        field,
        value: value.to_string(),
    })
}

/// The UTC midnight instant that starts the given calendar day.
///
/// Used by repositories to express day-granularity overlap comparisons over
/// raw stored timestamps: `floor_utc(ts) < day` iff `ts < day_start_utc(day)`.
pub fn day_start_utc(day: NaiveDate) -> DateTime<Utc> {
    let midnight = day.and_hms_opt(0, 0, 0).expect("midnight is always valid");
    Utc.from_utc_datetime(&midnight)
}
