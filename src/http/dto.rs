//! Data Transfer Objects for the HTTP API.
//!
//! These DTOs are used for request/response serialization in the REST API.
//! The domain types already derive Serialize/Deserialize, so responses
//! mostly re-export them; the request DTOs exist to keep wire-level
//! optionality separate from the engine's request types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::{
    Booking, CreateBookingRequest, Property, PropertyId, UpdateBookingRequest, User, UserId,
};

/// Request body for creating a booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingDto {
    pub user_id: Uuid,
    pub property_id: Uuid,
    pub checkin_date: String,
    pub checkout_date: String,
    pub number_of_guests: i32,
    #[serde(default)]
    pub total_price: Option<f64>,
    #[serde(default)]
    pub booking_status: Option<String>,
}

impl From<CreateBookingDto> for CreateBookingRequest {
    fn from(dto: CreateBookingDto) -> Self {
        CreateBookingRequest {
            user_id: UserId::new(dto.user_id),
            property_id: PropertyId::new(dto.property_id),
            checkin_date: dto.checkin_date,
            checkout_date: dto.checkout_date,
            number_of_guests: dto.number_of_guests,
            total_price: dto.total_price,
            booking_status: dto.booking_status,
        }
    }
}

/// Request body for updating a booking. Absent fields keep their persisted
/// values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBookingDto {
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub property_id: Option<Uuid>,
    #[serde(default)]
    pub checkin_date: Option<String>,
    #[serde(default)]
    pub checkout_date: Option<String>,
    #[serde(default)]
    pub number_of_guests: Option<i32>,
    #[serde(default)]
    pub total_price: Option<f64>,
    #[serde(default)]
    pub booking_status: Option<String>,
}

impl From<UpdateBookingDto> for UpdateBookingRequest {
    fn from(dto: UpdateBookingDto) -> Self {
        UpdateBookingRequest {
            user_id: dto.user_id.map(UserId::new),
            property_id: dto.property_id.map(PropertyId::new),
            checkin_date: dto.checkin_date,
            checkout_date: dto.checkout_date,
            number_of_guests: dto.number_of_guests,
            total_price: dto.total_price,
            booking_status: dto.booking_status,
        }
    }
}

/// Query parameters for listing bookings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BookingsQuery {
    /// Restrict the listing to one user's bookings.
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

/// Booking list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingListResponse {
    /// Bookings ordered by checkin date
    pub bookings: Vec<Booking>,
    /// Total count
    pub total: usize,
}

/// Response for a deleted booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteBookingResponse {
    pub message: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// Property response (snapshot fields only).
pub type PropertyDto = Property;

/// User response.
pub type UserDto = User;
