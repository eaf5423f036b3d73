//! Booking repository trait.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::error::RepositoryResult;
use crate::api::{Booking, BookingId, BookingRecord, PropertyId, UserId};

/// Repository trait for booking storage.
///
/// The overlap test is day-granular and half-open: an existing booking
/// conflicts with `[checkin_day, checkout_day)` when
/// `existing.checkin < checkout_day` and `existing.checkout > checkin_day`
/// on UTC calendar days. Adjacent stays, where one checkout day equals the
/// other checkin day, do not conflict.
///
/// # Atomicity
/// `create_booking` and `update_booking` must make the overlap check and
/// the write one atomic step (a lock, a serializable transaction, or a
/// database exclusion constraint) and return a conflict error when a
/// concurrent writer got there first. Two requests can otherwise both pass
/// the engine's pre-check and double-book the property.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Fetch a booking by id.
    async fn fetch_booking(&self, id: BookingId) -> RepositoryResult<Option<Booking>>;

    /// List bookings, optionally filtered to one user, ordered by checkin.
    async fn list_bookings(&self, user_id: Option<UserId>) -> RepositoryResult<Vec<Booking>>;

    /// Find one booking for the property whose stay overlaps the given
    /// half-open day range. A booking whose id equals `exclude` is never
    /// considered a conflict.
    async fn find_overlapping(
        &self,
        property_id: PropertyId,
        checkin_day: NaiveDate,
        checkout_day: NaiveDate,
        exclude: Option<BookingId>,
    ) -> RepositoryResult<Option<Booking>>;

    /// Persist a new booking, re-checking the overlap atomically with the
    /// insert. Returns the persisted booking with its assigned id, or a
    /// conflict error if the range was taken in the meantime.
    async fn create_booking(&self, record: BookingRecord) -> RepositoryResult<Booking>;

    /// Replace an existing booking's record, re-checking the overlap
    /// (excluding the booking itself) atomically with the write. Returns a
    /// not-found error if the booking does not exist.
    async fn update_booking(
        &self,
        id: BookingId,
        record: BookingRecord,
    ) -> RepositoryResult<Booking>;

    /// Delete a booking. Returns whether a record was removed.
    async fn delete_booking(&self, id: BookingId) -> RepositoryResult<bool>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;
}
