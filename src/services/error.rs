//! Error types for the booking availability & pricing engine.
//!
//! Every variant is a caller-input or state-conflict error; transient
//! storage faults travel through the transparent `Repository` variant. The
//! engine never logs or retries: a failure aborts the pipeline and is
//! surfaced to the caller for translation into a user-facing response.

use chrono::NaiveDate;

use crate::db::repository::RepositoryError;

/// Result type for engine operations.
pub type BookingResult<T> = Result<T, BookingError>;

/// Validation outcome of a booking create/update call.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    /// A referenced user, property or booking does not exist.
    #[error("the {entity} with {id} was not found")]
    NotFound { entity: &'static str, id: String },

    /// A checkin/checkout value could not be parsed as a calendar date.
    #[error("invalid {field}: {value:?} is not a recognizable date")]
    InvalidDateFormat { field: &'static str, value: String },

    /// Checkout is not strictly after checkin by at least one UTC day.
    #[error("checkout date must be at least one night after the checkin date")]
    InvalidStayDuration { nights: i64 },

    /// An existing booking for the property overlaps the requested stay.
    #[error("property is already booked from {checkin} to {checkout}")]
    DateRangeConflict {
        checkin: NaiveDate,
        checkout: NaiveDate,
    },

    /// Guest count exceeds the property capacity snapshot.
    #[error("number of guests {requested} is greater than the capacity of the property: {maximum}")]
    CapacityExceeded { requested: i32, maximum: i32 },

    /// Explicit total price is non-positive or not a finite number.
    #[error("invalid total price: {value}")]
    InvalidPrice { value: f64 },

    /// Storage collaborator failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl BookingError {
    /// Shorthand for a missing-entity error.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}
