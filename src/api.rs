//! Public API surface for the booking backend.
//!
//! This file consolidates the entity identifier newtypes and re-exports the
//! domain types used across the engine, the repositories and the HTTP layer.
//! All types derive Serialize/Deserialize for JSON serialization.

pub use crate::models::booking::{
    Booking, BookingRecord, BookingStatus, CreateBookingRequest, UpdateBookingRequest,
};
pub use crate::models::property::Property;
pub use crate::models::user::User;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Booking identifier (database primary key).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingId(pub Uuid);

/// Property identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyId(pub Uuid);

/// User identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

impl BookingId {
    pub fn new(value: Uuid) -> Self {
        BookingId(value)
    }

    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        BookingId(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl PropertyId {
    pub fn new(value: Uuid) -> Self {
        PropertyId(value)
    }

    pub fn generate() -> Self {
        PropertyId(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl UserId {
    pub fn new(value: Uuid) -> Self {
        UserId(value)
    }

    pub fn generate() -> Self {
        UserId(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for BookingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for PropertyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<BookingId> for Uuid {
    fn from(id: BookingId) -> Self {
        id.0
    }
}
impl From<PropertyId> for Uuid {
    fn from(id: PropertyId) -> Self {
        id.0
    }
}
impl From<UserId> for Uuid {
    fn from(id: UserId) -> Self {
        id.0
    }
}
