//! Property repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{Property, PropertyId};

/// Repository trait for property snapshots.
///
/// The engine only reads properties; `upsert_property` exists for seeding
/// and for the catalog side of the platform.
#[async_trait]
pub trait PropertyRepository: Send + Sync {
    /// Fetch a property snapshot (capacity and nightly rate) by id.
    async fn fetch_property(&self, id: PropertyId) -> RepositoryResult<Option<Property>>;

    /// Insert or replace a property.
    async fn upsert_property(&self, property: Property) -> RepositoryResult<Property>;
}
