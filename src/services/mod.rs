//! Service layer: the booking availability & pricing engine.
//!
//! The engine sits between the HTTP handlers and the repository layer. It
//! validates tentative reservations against a property snapshot and the
//! existing bookings for that property, and emits normalized records for
//! the storage collaborator to persist.

pub mod booking_engine;
pub mod error;
pub mod stay;


#[cfg(test)]
#[path = "booking_engine_tests.rs"]
mod booking_engine_tests;

pub use booking_engine::{
    create_booking, delete_booking, get_booking, list_bookings, update_booking,
};
pub use error::{BookingError, BookingResult};
pub use stay::Stay;
