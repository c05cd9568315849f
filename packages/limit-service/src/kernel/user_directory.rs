//! User directory collaborator.
//!
//! The domain service confirms owner existence here before any write. The
//! trait keeps not-found (the user does not exist, carries the upstream
//! status) distinct from unreachable (the directory itself failed).

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::Deserialize;

use crate::common::ServiceError;

/// Account summary returned by the directory.
#[derive(Debug, Clone, Deserialize)]
pub struct UserAccount {
    pub id: String,
    pub status: String,
}

#[async_trait]
pub trait BaseUserDirectory: Send + Sync {
    /// Resolve a user or fail: not-found and unreachable are distinct errors.
    async fn assert_user_exists(&self, user_id: &str) -> Result<UserAccount, ServiceError>;
}

// =============================================================================
// HTTP directory client
// =============================================================================

/// Directory client against the user service's HTTP API.
pub struct HttpUserDirectory {
    base_url: String,
    client: reqwest::Client,
}

impl HttpUserDirectory {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl BaseUserDirectory for HttpUserDirectory {
    async fn assert_user_exists(&self, user_id: &str) -> Result<UserAccount, ServiceError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), user_id);
        let response = self.client.get(&url).send().await.map_err(|e| {
            ServiceError::upstream_with_source(
                "user-directory-unreachable",
                format!("user directory call for {user_id} failed: {e}"),
                e,
            )
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::not_found_with_status(
                "user-not-found",
                format!("The user {user_id} does not exist"),
                status.as_u16(),
            ));
        }

        response.json::<UserAccount>().await.map_err(|e| {
            ServiceError::upstream_with_source(
                "user-directory-decode",
                format!("user directory returned an undecodable body for {user_id}: {e}"),
                e,
            )
        })
    }
}

// =============================================================================
// Static directory (tests and offline mode)
// =============================================================================

/// Directory double with per-user status programming.
#[derive(Default)]
pub struct StaticUserDirectory {
    users: Mutex<HashMap<String, String>>,
}

impl StaticUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, user_id: &str, status: &str) -> Self {
        self.users
            .lock()
            .unwrap()
            .insert(user_id.to_string(), status.to_string());
        self
    }
}

#[async_trait]
impl BaseUserDirectory for StaticUserDirectory {
    async fn assert_user_exists(&self, user_id: &str) -> Result<UserAccount, ServiceError> {
        let users = self.users.lock().unwrap();
        match users.get(user_id) {
            Some(status) => Ok(UserAccount {
                id: user_id.to_string(),
                status: status.clone(),
            }),
            None => Err(ServiceError::not_found(
                "user-not-found",
                format!("The user {user_id} does not exist"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_directory_resolves_programmed_users() {
        let directory = StaticUserDirectory::new().with_user("u1", "active");
        let account = directory.assert_user_exists("u1").await.unwrap();
        assert_eq!(account.id, "u1");
        assert_eq!(account.status, "active");
    }

    #[tokio::test]
    async fn static_directory_rejects_unknown_users() {
        let directory = StaticUserDirectory::new();
        let err = directory.assert_user_exists("ghost").await.unwrap_err();
        assert_eq!(err.code(), "user-not-found");
        assert_eq!(err.http_status(), 404);
    }
}
