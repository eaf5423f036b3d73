//! Repository trait definitions.
//!
//! The storage collaborators of the engine, expressed as async traits so
//! backends can be swapped (in-memory for tests and local development,
//! Postgres for production).

pub mod booking;
pub mod error;
pub mod property;
pub mod user;

pub use booking::BookingRepository;
pub use error::{ErrorContext, RepositoryError, RepositoryResult};
pub use property::PropertyRepository;
pub use user::UserRepository;

/// The full storage surface the engine and the HTTP layer operate on.
pub trait FullRepository: BookingRepository + PropertyRepository + UserRepository {}

impl<T> FullRepository for T where T: BookingRepository + PropertyRepository + UserRepository {}
