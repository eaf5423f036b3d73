//! Property domain type.

use serde::{Deserialize, Serialize};

use crate::api::PropertyId;

/// A rentable property.
///
/// The engine reads only the capacity and rate snapshot at validation time;
/// the rest of the record is carried for API responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: PropertyId,
    pub title: String,
    /// Maximum number of guests the property accommodates.
    pub max_guest_count: i32,
    /// Nightly rate used when no explicit total price is supplied.
    pub price_per_night: f64,
}
