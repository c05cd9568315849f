use async_trait::async_trait;

use crate::common::ServiceError;

use super::super::models::{NewUserLimit, UserLimit, UserLimitPatch};

/// Storage contract for user limits.
///
/// Absent lookups are `Ok(None)` — never an error — so the domain service
/// can distinguish "not found" from a backend failure.
#[async_trait]
pub trait UserLimitRepository: Send + Sync {
    /// Persist a new limit; storage assigns the id.
    async fn create(&self, new_limit: NewUserLimit) -> Result<UserLimit, ServiceError>;

    /// Apply a partial update keyed by the patch's `user_limit_id`.
    async fn update(&self, patch: UserLimitPatch) -> Result<UserLimit, ServiceError>;

    /// Delete and return the deleted entity.
    async fn delete(&self, user_limit_id: &str) -> Result<UserLimit, ServiceError>;

    async fn find_by_id(&self, user_limit_id: &str) -> Result<Option<UserLimit>, ServiceError>;

    async fn find_by_user_id(&self, user_id: &str) -> Result<Vec<UserLimit>, ServiceError>;

    async fn find_by_brand_id(&self, brand_id: &str) -> Result<Vec<UserLimit>, ServiceError>;

    async fn find_all(&self) -> Result<Vec<UserLimit>, ServiceError>;

    /// Release the storage connection. Idempotent.
    async fn disconnect(&self);
}
