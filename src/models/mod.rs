//! Domain data types for the booking backend.

pub mod booking;
pub mod property;
pub mod user;

pub use booking::{Booking, BookingRecord, BookingStatus, CreateBookingRequest, UpdateBookingRequest};
pub use property::Property;
pub use user::User;
