//! In-memory repository used by tests and offline mode.
//!
//! Records every call by method name so tests can assert on storage traffic
//! (or the absence of it).

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::common::ServiceError;

use super::super::models::{NewUserLimit, UserLimit, UserLimitPatch};
use super::repository::UserLimitRepository;

#[derive(Default)]
pub struct InMemoryUserLimitRepository {
    rows: Mutex<HashMap<String, UserLimit>>,
    calls: Mutex<Vec<String>>,
}

impl InMemoryUserLimitRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a limit directly, bypassing the service path.
    pub fn insert(&self, limit: UserLimit) {
        self.rows
            .lock()
            .unwrap()
            .insert(limit.user_limit_id.clone(), limit);
    }

    /// Method names of every repository call made so far, in order.
    pub fn recorded_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls that write (create / update / delete).
    pub fn recorded_writes(&self) -> Vec<String> {
        self.recorded_calls()
            .into_iter()
            .filter(|call| matches!(call.as_str(), "create" | "update" | "delete"))
            .collect()
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }
}

#[async_trait]
impl UserLimitRepository for InMemoryUserLimitRepository {
    async fn create(&self, new_limit: NewUserLimit) -> Result<UserLimit, ServiceError> {
        self.record("create");
        let limit = UserLimit {
            user_limit_id: Uuid::new_v4().to_string(),
            user_id: new_limit.user_id,
            brand_id: new_limit.brand_id,
            currency_code: new_limit.currency_code,
            value: new_limit.value,
            previous_limit_value: new_limit.previous_limit_value,
            progress: new_limit.progress,
            status: new_limit.status,
            period: new_limit.period,
            limit_type: new_limit.limit_type,
            active_from: new_limit.active_from,
            active_until: new_limit.active_until,
            next_reset_time: new_limit.next_reset_time,
            created_at: Some(
                new_limit
                    .created_at
                    .unwrap_or_else(|| Utc::now().timestamp_millis()),
            ),
        };
        self.rows
            .lock()
            .unwrap()
            .insert(limit.user_limit_id.clone(), limit.clone());
        Ok(limit)
    }

    async fn update(&self, patch: UserLimitPatch) -> Result<UserLimit, ServiceError> {
        self.record("update");
        let mut rows = self.rows.lock().unwrap();
        let existing = rows.get_mut(&patch.user_limit_id).ok_or_else(|| {
            ServiceError::not_found(
                "user-limit-not-found",
                format!("User limit with ID {} not found", patch.user_limit_id),
            )
        })?;
        if let Some(user_id) = patch.user_id {
            existing.user_id = user_id;
        }
        if let Some(progress) = patch.progress {
            existing.progress = Some(progress);
        }
        if let Some(value) = patch.value {
            existing.value = value;
        }
        if let Some(previous) = patch.previous_limit_value {
            existing.previous_limit_value = Some(previous);
        }
        if let Some(status) = patch.status {
            existing.status = status;
        }
        if let Some(active_until) = patch.active_until {
            existing.active_until = Some(active_until);
        }
        if let Some(next_reset_time) = patch.next_reset_time {
            existing.next_reset_time = Some(next_reset_time);
        }
        Ok(existing.clone())
    }

    async fn delete(&self, user_limit_id: &str) -> Result<UserLimit, ServiceError> {
        self.record("delete");
        self.rows.lock().unwrap().remove(user_limit_id).ok_or_else(|| {
            ServiceError::not_found(
                "user-limit-not-found",
                format!("User limit with ID {user_limit_id} not found"),
            )
        })
    }

    async fn find_by_id(&self, user_limit_id: &str) -> Result<Option<UserLimit>, ServiceError> {
        self.record("find_by_id");
        Ok(self.rows.lock().unwrap().get(user_limit_id).cloned())
    }

    async fn find_by_user_id(&self, user_id: &str) -> Result<Vec<UserLimit>, ServiceError> {
        self.record("find_by_user_id");
        let mut limits: Vec<UserLimit> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|limit| limit.user_id == user_id)
            .cloned()
            .collect();
        limits.sort_by_key(|limit| limit.created_at);
        Ok(limits)
    }

    async fn find_by_brand_id(&self, brand_id: &str) -> Result<Vec<UserLimit>, ServiceError> {
        self.record("find_by_brand_id");
        let mut limits: Vec<UserLimit> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|limit| limit.brand_id == brand_id)
            .cloned()
            .collect();
        limits.sort_by_key(|limit| limit.created_at);
        Ok(limits)
    }

    async fn find_all(&self) -> Result<Vec<UserLimit>, ServiceError> {
        self.record("find_all");
        let mut limits: Vec<UserLimit> = self.rows.lock().unwrap().values().cloned().collect();
        limits.sort_by_key(|limit| limit.created_at);
        Ok(limits)
    }

    async fn disconnect(&self) {
        self.record("disconnect");
        self.rows.lock().unwrap().clear();
    }
}
