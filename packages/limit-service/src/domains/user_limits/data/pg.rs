//! Postgres-backed user limit repository.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::ServiceError;

use super::super::models::{NewUserLimit, UserLimit, UserLimitPatch};
use super::repository::UserLimitRepository;

pub struct PgUserLimitRepository {
    pool: PgPool,
}

impl PgUserLimitRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn storage_error(code: &'static str, error: sqlx::Error) -> ServiceError {
    ServiceError::upstream_with_source(code, format!("storage call failed: {error}"), error)
}

#[async_trait]
impl UserLimitRepository for PgUserLimitRepository {
    async fn create(&self, new_limit: NewUserLimit) -> Result<UserLimit, ServiceError> {
        let user_limit_id = Uuid::new_v4().to_string();
        let created_at = new_limit
            .created_at
            .unwrap_or_else(|| Utc::now().timestamp_millis());
        sqlx::query_as::<_, UserLimit>(
            r#"
            INSERT INTO user_limits (
                user_limit_id, user_id, brand_id, currency_code, value,
                previous_limit_value, progress, status, period, limit_type,
                active_from, active_until, next_reset_time, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(&user_limit_id)
        .bind(&new_limit.user_id)
        .bind(&new_limit.brand_id)
        .bind(&new_limit.currency_code)
        .bind(&new_limit.value)
        .bind(&new_limit.previous_limit_value)
        .bind(&new_limit.progress)
        .bind(new_limit.status)
        .bind(new_limit.period)
        .bind(new_limit.limit_type)
        .bind(new_limit.active_from)
        .bind(new_limit.active_until)
        .bind(new_limit.next_reset_time)
        .bind(created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| storage_error("user-limit-create-repository-error", e))
    }

    async fn update(&self, patch: UserLimitPatch) -> Result<UserLimit, ServiceError> {
        sqlx::query_as::<_, UserLimit>(
            r#"
            UPDATE user_limits SET
                user_id = COALESCE($2, user_id),
                progress = COALESCE($3, progress),
                value = COALESCE($4, value),
                previous_limit_value = COALESCE($5, previous_limit_value),
                status = COALESCE($6, status),
                active_until = COALESCE($7, active_until),
                next_reset_time = COALESCE($8, next_reset_time)
            WHERE user_limit_id = $1
            RETURNING *
            "#,
        )
        .bind(&patch.user_limit_id)
        .bind(&patch.user_id)
        .bind(&patch.progress)
        .bind(&patch.value)
        .bind(&patch.previous_limit_value)
        .bind(patch.status)
        .bind(patch.active_until)
        .bind(patch.next_reset_time)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_error("user-limit-update-repository-error", e))?
        .ok_or_else(|| {
            ServiceError::not_found(
                "user-limit-not-found",
                format!("User limit with ID {} not found", patch.user_limit_id),
            )
        })
    }

    async fn delete(&self, user_limit_id: &str) -> Result<UserLimit, ServiceError> {
        sqlx::query_as::<_, UserLimit>(
            "DELETE FROM user_limits WHERE user_limit_id = $1 RETURNING *",
        )
        .bind(user_limit_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_error("user-limit-delete-repository-error", e))?
        .ok_or_else(|| {
            ServiceError::not_found(
                "user-limit-not-found",
                format!("User limit with ID {user_limit_id} not found"),
            )
        })
    }

    async fn find_by_id(&self, user_limit_id: &str) -> Result<Option<UserLimit>, ServiceError> {
        sqlx::query_as::<_, UserLimit>("SELECT * FROM user_limits WHERE user_limit_id = $1")
            .bind(user_limit_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("user-limit-find-by-id-repository-error", e))
    }

    async fn find_by_user_id(&self, user_id: &str) -> Result<Vec<UserLimit>, ServiceError> {
        sqlx::query_as::<_, UserLimit>(
            "SELECT * FROM user_limits WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_error("user-limit-find-by-user-id-repository-error", e))
    }

    async fn find_by_brand_id(&self, brand_id: &str) -> Result<Vec<UserLimit>, ServiceError> {
        sqlx::query_as::<_, UserLimit>(
            "SELECT * FROM user_limits WHERE brand_id = $1 ORDER BY created_at",
        )
        .bind(brand_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_error("user-limit-find-by-brand-id-repository-error", e))
    }

    async fn find_all(&self) -> Result<Vec<UserLimit>, ServiceError> {
        sqlx::query_as::<_, UserLimit>("SELECT * FROM user_limits ORDER BY created_at")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage_error("user-limit-find-all-repository-error", e))
    }

    async fn disconnect(&self) {
        self.pool.close().await;
    }
}
