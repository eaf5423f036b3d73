//! User domain type.

use serde::{Deserialize, Serialize};

use crate::api::UserId;

/// A platform user. The engine only checks existence; no other fields are
/// read during validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
}
