//! Domain service: the only component that mutates user limit state.
//!
//! Validation and business rules live here; persistence is delegated to the
//! repository, owner checks to the user directory. Failures are always typed
//! errors — nothing is swallowed at this layer.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use crate::common::ServiceError;
use crate::kernel::{BaseUserDirectory, UserAccount};

use super::data::UserLimitRepository;
use super::models::{LimitStatus, NewUserLimit, UserLimit, UserLimitPatch};
use super::validate::assert_new_limit_valid;

pub struct UserLimitService {
    repository: Arc<dyn UserLimitRepository>,
    directory: Arc<dyn BaseUserDirectory>,
}

impl UserLimitService {
    pub fn new(
        repository: Arc<dyn UserLimitRepository>,
        directory: Arc<dyn BaseUserDirectory>,
    ) -> Self {
        Self {
            repository,
            directory,
        }
    }

    /// Create a limit: validate the shape, confirm the owner exists, apply
    /// business normalization, persist.
    pub async fn add_user_limit(&self, new_limit: NewUserLimit) -> Result<UserLimit, ServiceError> {
        assert_new_limit_valid(&new_limit)?;
        let owner = self.directory.assert_user_exists(&new_limit.user_id).await?;
        let normalized = apply_business_rules(new_limit, &owner);
        self.repository.create(normalized).await
    }

    /// Update a limit. Gatekeeps existence and requires the patch to name
    /// its owner; the field merge itself is the repository's concern.
    pub async fn update_user_limit(
        &self,
        user_limit_id: &str,
        patch: UserLimitPatch,
    ) -> Result<UserLimit, ServiceError> {
        if patch.user_id.is_none() {
            return Err(ServiceError::not_found(
                "user-not-found",
                format!("No user was provided for limit {user_limit_id}"),
            ));
        }
        if self.repository.find_by_id(user_limit_id).await?.is_none() {
            return Err(ServiceError::not_found(
                "user-limit-not-found",
                format!("User limit with ID {user_limit_id} not found"),
            ));
        }
        let mut patch = patch;
        patch.user_limit_id = user_limit_id.to_string();
        self.repository.update(patch).await
    }

    pub async fn delete_user_limit(&self, user_limit_id: &str) -> Result<UserLimit, ServiceError> {
        if self.repository.find_by_id(user_limit_id).await?.is_none() {
            return Err(ServiceError::not_found(
                "user-limit-not-found",
                format!("User limit with ID {user_limit_id} not found"),
            ));
        }
        self.repository.delete(user_limit_id).await
    }

    /// A missing id is a hard not-found error, not a `None`.
    pub async fn get_user_limit(&self, user_limit_id: &str) -> Result<UserLimit, ServiceError> {
        self.repository
            .find_by_id(user_limit_id)
            .await?
            .ok_or_else(|| {
                ServiceError::not_found(
                    "user-limit-not-found",
                    format!("User limit with ID {user_limit_id} not found"),
                )
            })
    }

    pub async fn get_user_limits_by_user_id(
        &self,
        user_id: &str,
    ) -> Result<Vec<UserLimit>, ServiceError> {
        self.directory.assert_user_exists(user_id).await?;
        self.repository.find_by_user_id(user_id).await
    }

    pub async fn get_all_user_limits(&self) -> Result<Vec<UserLimit>, ServiceError> {
        debug!("getting all user limits");
        self.repository.find_all().await
    }
}

/// Business normalization on create, applied silently — the caller is never
/// told its input was changed.
///
/// The status rule runs first, then the temporal clamp; the clamp must not
/// be gated on status.
fn apply_business_rules(mut limit: NewUserLimit, owner: &UserAccount) -> NewUserLimit {
    if owner.status != "active" {
        limit.status = LimitStatus::Future;
    }
    let now = Utc::now().timestamp_millis();
    if limit.active_from < now {
        limit.active_from = now;
    }
    limit
}
