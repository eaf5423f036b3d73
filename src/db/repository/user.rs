//! User repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{User, UserId};

/// Repository trait for user lookups.
///
/// The engine only needs an existence check; `upsert_user` exists for
/// seeding and for the account side of the platform.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by id.
    async fn fetch_user(&self, id: UserId) -> RepositoryResult<Option<User>>;

    /// Insert or replace a user.
    async fn upsert_user(&self, user: User) -> RepositoryResult<User>;
}
