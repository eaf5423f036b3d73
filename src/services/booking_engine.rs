//! The booking availability & pricing engine.
//!
//! State-free per-call pipeline over the repository collaborators: resolve
//! referenced entities, normalize the stay, detect date-range overlaps,
//! check guest capacity, resolve the price, then emit the validated record
//! for persistence. Every step short-circuits on the first failure; there
//! are no partial writes. The engine holds no shared mutable state and is
//! safe to invoke concurrently.

use crate::api::{
    Booking, BookingId, BookingRecord, BookingStatus, CreateBookingRequest, Property, PropertyId,
    UpdateBookingRequest, User, UserId,
};
use crate::db::repository::FullRepository;

use super::error::{BookingError, BookingResult};
use super::stay::{parse_date_value, Stay};

/// Validate and persist a new booking.
pub async fn create_booking(
    repo: &dyn FullRepository,
    request: CreateBookingRequest,
) -> BookingResult<Booking> {
    resolve_user(repo, request.user_id).await?;
    let property = resolve_property(repo, request.property_id).await?;

    let stay = Stay::normalize(&request.checkin_date, &request.checkout_date)?;
    ensure_no_overlap(repo, request.property_id, &stay, None).await?;
    check_capacity(request.number_of_guests, &property)?;

    let total_price = resolve_price(
        request.total_price,
        &stay,
        property.price_per_night,
        request.number_of_guests,
    )?;
    // Lenient by design: an unknown status string falls back to the default
    // instead of rejecting the request.
    let booking_status = request
        .booking_status
        .as_deref()
        .and_then(BookingStatus::parse_lenient)
        .unwrap_or_default();

    let record = BookingRecord {
        user_id: request.user_id,
        property_id: request.property_id,
        checkin_date: stay.checkin,
        checkout_date: stay.checkout,
        number_of_guests: request.number_of_guests,
        total_price,
        booking_status,
    };

    match repo.create_booking(record).await {
        Ok(booking) => Ok(booking),
        // A concurrent request won the check-then-write race; surface it as
        // the same conflict the pre-check would have produced.
        Err(err) if err.is_conflict() => {
            Err(conflict_for(repo, request.property_id, &stay, None).await)
        }
        Err(err) => Err(err.into()),
    }
}

/// Validate and persist changes to an existing booking.
///
/// Partial-update semantics: unsupplied fields keep their persisted values.
/// Dates, guests, price and property are always re-validated together
/// against the resolved property, since changing any one of them can
/// invalidate the others. The booking's own id is excluded from the overlap
/// check so in-place date changes never conflict with themselves.
pub async fn update_booking(
    repo: &dyn FullRepository,
    id: BookingId,
    request: UpdateBookingRequest,
) -> BookingResult<Booking> {
    let existing = repo
        .fetch_booking(id)
        .await?
        .ok_or_else(|| BookingError::not_found("booking", id))?;

    if let Some(user_id) = request.user_id {
        resolve_user(repo, user_id).await?;
    }
    let user_id = request.user_id.unwrap_or(existing.user_id);

    let property_id = request.property_id.unwrap_or(existing.property_id);
    let property = resolve_property(repo, property_id).await?;

    let checkin = match request.checkin_date.as_deref() {
        Some(raw) => parse_date_value("checkin date", raw)?,
        None => existing.checkin_date,
    };
    let checkout = match request.checkout_date.as_deref() {
        Some(raw) => parse_date_value("checkout date", raw)?,
        None => existing.checkout_date,
    };
    let stay = Stay::from_instants(checkin, checkout)?;
    ensure_no_overlap(repo, property_id, &stay, Some(id)).await?;

    let number_of_guests = request.number_of_guests.unwrap_or(existing.number_of_guests);
    check_capacity(number_of_guests, &property)?;

    let total_price = resolve_price(
        request.total_price,
        &stay,
        property.price_per_night,
        number_of_guests,
    )?;
    let booking_status = match request.booking_status.as_deref() {
        // Unknown values are discarded and the prior status is retained.
        Some(raw) => BookingStatus::parse_lenient(raw).unwrap_or(existing.booking_status),
        None => existing.booking_status,
    };

    let record = BookingRecord {
        user_id,
        property_id,
        checkin_date: stay.checkin,
        checkout_date: stay.checkout,
        number_of_guests,
        total_price,
        booking_status,
    };

    match repo.update_booking(id, record).await {
        Ok(booking) => Ok(booking),
        Err(err) if err.is_conflict() => {
            Err(conflict_for(repo, property_id, &stay, Some(id)).await)
        }
        Err(err) if err.is_not_found() => Err(BookingError::not_found("booking", id)),
        Err(err) => Err(err.into()),
    }
}

/// Fetch a booking by id.
pub async fn get_booking(repo: &dyn FullRepository, id: BookingId) -> BookingResult<Booking> {
    repo.fetch_booking(id)
        .await?
        .ok_or_else(|| BookingError::not_found("booking", id))
}

/// List bookings, optionally filtered to one user.
pub async fn list_bookings(
    repo: &dyn FullRepository,
    user_id: Option<UserId>,
) -> BookingResult<Vec<Booking>> {
    if let Some(user_id) = user_id {
        resolve_user(repo, user_id).await?;
    }
    Ok(repo.list_bookings(user_id).await?)
}

/// Delete a booking, returning its id.
pub async fn delete_booking(repo: &dyn FullRepository, id: BookingId) -> BookingResult<BookingId> {
    if repo.delete_booking(id).await? {
        Ok(id)
    } else {
        Err(BookingError::not_found("booking", id))
    }
}

/// Resolve a referenced user or fail with `NotFound`.
pub async fn resolve_user(repo: &dyn FullRepository, id: UserId) -> BookingResult<User> {
    repo.fetch_user(id)
        .await?
        .ok_or_else(|| BookingError::not_found("user", id))
}

/// Resolve a referenced property or fail with `NotFound`.
pub async fn resolve_property(
    repo: &dyn FullRepository,
    id: PropertyId,
) -> BookingResult<Property> {
    repo.fetch_property(id)
        .await?
        .ok_or_else(|| BookingError::not_found("property", id))
}

/// Fail with `DateRangeConflict` if an existing booking for the property
/// overlaps the stay. `exclude` omits one booking id from consideration.
pub async fn ensure_no_overlap(
    repo: &dyn FullRepository,
    property_id: PropertyId,
    stay: &Stay,
    exclude: Option<BookingId>,
) -> BookingResult<()> {
    let conflict = repo
        .find_overlapping(property_id, stay.checkin_day, stay.checkout_day, exclude)
        .await?;

    match conflict {
        Some(existing) => Err(BookingError::DateRangeConflict {
            checkin: existing.checkin_date.date_naive(),
            checkout: existing.checkout_date.date_naive(),
        }),
        None => Ok(()),
    }
}

/// Fail with `CapacityExceeded` if the guest count is over the property
/// maximum. Equality succeeds.
pub fn check_capacity(requested: i32, property: &Property) -> BookingResult<()> {
    if requested > property.max_guest_count {
        return Err(BookingError::CapacityExceeded {
            requested,
            maximum: property.max_guest_count,
        });
    }
    Ok(())
}

/// Resolve the total price for a stay.
///
/// An explicit price is authoritative and accepted verbatim (it may cover
/// a discount or promotion not otherwise modeled) but must still be a
/// positive finite number. Only when no price is supplied does the engine
/// compute the nights x rate x guests default.
pub fn resolve_price(
    explicit: Option<f64>,
    stay: &Stay,
    price_per_night: f64,
    guests: i32,
) -> BookingResult<f64> {
    match explicit {
        Some(value) if !value.is_finite() || value <= 0.0 => {
            Err(BookingError::InvalidPrice { value })
        }
        Some(value) => Ok(value),
        None => Ok(stay.nights as f64 * price_per_night * guests as f64),
    }
}

/// Build the `DateRangeConflict` for a conflict reported by the storage
/// layer at write time, recovering the winning booking's range for the
/// message when it is still visible.
async fn conflict_for(
    repo: &dyn FullRepository,
    property_id: PropertyId,
    stay: &Stay,
    exclude: Option<BookingId>,
) -> BookingError {
    match repo
        .find_overlapping(property_id, stay.checkin_day, stay.checkout_day, exclude)
        .await
    {
        Ok(Some(existing)) => BookingError::DateRangeConflict {
            checkin: existing.checkin_date.date_naive(),
            checkout: existing.checkout_date.date_naive(),
        },
        _ => BookingError::DateRangeConflict {
            checkin: stay.checkin_day,
            checkout: stay.checkout_day,
        },
    }
}
