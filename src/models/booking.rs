//! Booking domain types.
//!
//! A [`Booking`] is the persisted record; a [`BookingRecord`] is the
//! validated write produced by the engine (everything but the id). The
//! request types carry the caller-supplied primitives before validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{BookingId, PropertyId, UserId};

/// Lifecycle status of a booking.
///
/// Unknown status strings are never an error: the engine discards them and
/// keeps the previous value (update) or the default (create).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    /// Parse a status string, returning `None` for anything that is not one
    /// of the three known values. Callers decide what the fallback is.
    pub fn parse_lenient(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted booking.
///
/// Checkin/checkout are stored as the raw parsed instants; the UTC-day
/// truncation used for overlap checks is recomputed on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub user_id: UserId,
    pub property_id: PropertyId,
    pub checkin_date: DateTime<Utc>,
    pub checkout_date: DateTime<Utc>,
    pub number_of_guests: i32,
    pub total_price: f64,
    pub booking_status: BookingStatus,
}

/// A validated booking write, emitted by the engine for persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub user_id: UserId,
    pub property_id: PropertyId,
    pub checkin_date: DateTime<Utc>,
    pub checkout_date: DateTime<Utc>,
    pub number_of_guests: i32,
    pub total_price: f64,
    pub booking_status: BookingStatus,
}

impl BookingRecord {
    /// Attach an id, producing the persisted form.
    pub fn into_booking(self, id: BookingId) -> Booking {
        Booking {
            id,
            user_id: self.user_id,
            property_id: self.property_id,
            checkin_date: self.checkin_date,
            checkout_date: self.checkout_date,
            number_of_guests: self.number_of_guests,
            total_price: self.total_price,
            booking_status: self.booking_status,
        }
    }
}

/// Caller-supplied input for creating a booking.
///
/// Dates arrive as date-like strings (RFC 3339 or `YYYY-MM-DD`); the engine
/// owns parsing and normalization. `total_price`, when present, is treated
/// as authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub user_id: UserId,
    pub property_id: PropertyId,
    pub checkin_date: String,
    pub checkout_date: String,
    pub number_of_guests: i32,
    pub total_price: Option<f64>,
    pub booking_status: Option<String>,
}

/// Caller-supplied input for updating a booking.
///
/// Every field is optional; unsupplied fields retain the persisted value.
/// Dates, guests, price and property are re-validated together regardless,
/// because they are mutually dependent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBookingRequest {
    pub user_id: Option<UserId>,
    pub property_id: Option<PropertyId>,
    pub checkin_date: Option<String>,
    pub checkout_date: Option<String>,
    pub number_of_guests: Option<i32>,
    pub total_price: Option<f64>,
    pub booking_status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_known_values() {
        assert_eq!(
            BookingStatus::parse_lenient("pending"),
            Some(BookingStatus::Pending)
        );
        assert_eq!(
            BookingStatus::parse_lenient("confirmed"),
            Some(BookingStatus::Confirmed)
        );
        assert_eq!(
            BookingStatus::parse_lenient("cancelled"),
            Some(BookingStatus::Cancelled)
        );
    }

    #[test]
    fn status_rejects_unknown_values() {
        assert_eq!(BookingStatus::parse_lenient("archived"), None);
        assert_eq!(BookingStatus::parse_lenient("Pending"), None);
        assert_eq!(BookingStatus::parse_lenient(""), None);
    }

    #[test]
    fn status_default_is_pending() {
        assert_eq!(BookingStatus::default(), BookingStatus::Pending);
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&BookingStatus::Confirmed).unwrap();
        assert_eq!(json, "\"confirmed\"");
    }
}
