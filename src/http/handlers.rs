//! HTTP handlers for the REST API.
//!
//! Each handler validates the wire-level input (field presence and basic
//! typing) and delegates the domain rules to the engine in
//! [`crate::services::booking_engine`].

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use super::dto::{
    BookingListResponse, BookingsQuery, CreateBookingDto, DeleteBookingResponse, HealthResponse,
    PropertyDto, UpdateBookingDto, UserDto,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::{Booking, BookingId, PropertyId, UserId};
use crate::services::booking_engine;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and storage is
/// accessible.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Booking CRUD
// =============================================================================

/// GET /v1/bookings
///
/// List bookings, optionally filtered by user.
pub async fn list_bookings(
    State(state): State<AppState>,
    Query(query): Query<BookingsQuery>,
) -> HandlerResult<BookingListResponse> {
    let user_id = query.user_id.map(UserId::new);
    let bookings = booking_engine::list_bookings(state.repository.as_ref(), user_id).await?;
    let total = bookings.len();

    Ok(Json(BookingListResponse { bookings, total }))
}

/// GET /v1/bookings/{id}
pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> HandlerResult<Booking> {
    let booking =
        booking_engine::get_booking(state.repository.as_ref(), BookingId::new(id)).await?;
    Ok(Json(booking))
}

/// POST /v1/bookings
///
/// Validate and create a booking. Returns 201 with the persisted record.
pub async fn create_booking(
    State(state): State<AppState>,
    Json(request): Json<CreateBookingDto>,
) -> Result<(axum::http::StatusCode, Json<Booking>), AppError> {
    // The engine expects an already-validated positive guest count.
    if request.number_of_guests <= 0 {
        return Err(AppError::BadRequest(
            "numberOfGuests must be a positive integer".to_string(),
        ));
    }

    let booking =
        booking_engine::create_booking(state.repository.as_ref(), request.into()).await?;
    tracing::info!(booking_id = %booking.id, property_id = %booking.property_id, "booking created");

    Ok((axum::http::StatusCode::CREATED, Json(booking)))
}

/// PUT /v1/bookings/{id}
///
/// Partially update a booking; absent fields keep their persisted values.
pub async fn update_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateBookingDto>,
) -> HandlerResult<Booking> {
    if matches!(request.number_of_guests, Some(guests) if guests <= 0) {
        return Err(AppError::BadRequest(
            "numberOfGuests must be a positive integer".to_string(),
        ));
    }

    let booking =
        booking_engine::update_booking(state.repository.as_ref(), BookingId::new(id), request.into())
            .await?;
    tracing::info!(booking_id = %booking.id, "booking updated");

    Ok(Json(booking))
}

/// DELETE /v1/bookings/{id}
pub async fn delete_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> HandlerResult<DeleteBookingResponse> {
    let deleted =
        booking_engine::delete_booking(state.repository.as_ref(), BookingId::new(id)).await?;
    tracing::info!(booking_id = %deleted, "booking deleted");

    Ok(Json(DeleteBookingResponse {
        message: format!("Booking with id {} was deleted", deleted),
    }))
}

// =============================================================================
// Entity lookups
// =============================================================================

/// GET /v1/properties/{id}
pub async fn get_property(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> HandlerResult<PropertyDto> {
    let property =
        booking_engine::resolve_property(state.repository.as_ref(), PropertyId::new(id)).await?;
    Ok(Json(property))
}

/// GET /v1/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> HandlerResult<UserDto> {
    let user = booking_engine::resolve_user(state.repository.as_ref(), UserId::new(id)).await?;
    Ok(Json(user))
}
