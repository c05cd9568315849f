//! Closed command set driven by stream events.
//!
//! Commands are single-shot: classified from an envelope, executed once
//! against the domain service, then discarded. The executor never absorbs
//! failures — disposition belongs to the batch consumer or an outer handler.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::common::ServiceError;

use super::models::{NewUserLimit, UserLimitPatch};
use super::service::UserLimitService;

pub const USER_LIMIT_CREATED: &str = "USER_LIMIT_CREATED";
pub const USER_LIMIT_PROGRESS_CHANGED: &str = "USER_LIMIT_PROGRESS_CHANGED";
pub const USER_LIMIT_RESET: &str = "USER_LIMIT_RESET";

/// Envelope carried by each stream record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamEvent {
    #[serde(default)]
    pub event_id: Option<String>,
    #[serde(rename = "type")]
    pub event_type: String,
    pub payload: Value,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeProgressPayload {
    pub user_id: String,
    pub user_limit_id: String,
    pub amount: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPayload {
    pub user_id: String,
    pub user_limit_id: String,
}

/// One variant per known event type.
#[derive(Debug)]
pub enum UserLimitCommand {
    Create(Box<NewUserLimit>),
    ChangeProgress(ChangeProgressPayload),
    Reset(ResetPayload),
}

impl UserLimitCommand {
    /// Classify an envelope into a command.
    ///
    /// An event type outside the known set is a classification error raised
    /// before any command is constructed; a malformed payload for a known
    /// type is a validation error.
    pub fn classify(event_type: &str, data: Value) -> Result<Self, ServiceError> {
        match event_type {
            USER_LIMIT_CREATED => Ok(Self::Create(Box::new(decode_payload(data)?))),
            USER_LIMIT_PROGRESS_CHANGED => Ok(Self::ChangeProgress(decode_payload(data)?)),
            USER_LIMIT_RESET => Ok(Self::Reset(decode_payload(data)?)),
            unknown => Err(ServiceError::UnknownEventType {
                event_type: unknown.to_string(),
            }),
        }
    }

    /// Execute the command: exactly one domain-service call, atomic as seen
    /// by the caller.
    pub async fn execute(self, service: &UserLimitService) -> Result<(), ServiceError> {
        match self {
            Self::Create(new_limit) => {
                service.add_user_limit(*new_limit).await?;
            }
            Self::ChangeProgress(payload) => {
                let ChangeProgressPayload {
                    user_id,
                    user_limit_id,
                    amount,
                } = payload;
                let patch = UserLimitPatch {
                    user_limit_id: user_limit_id.clone(),
                    user_id: Some(user_id),
                    progress: Some(amount.clone()),
                    ..Default::default()
                };
                service.update_user_limit(&user_limit_id, patch).await?;
                info!(user_limit_id = %user_limit_id, amount = %amount, "user limit progress changed");
            }
            Self::Reset(payload) => {
                let ResetPayload {
                    user_id,
                    user_limit_id,
                } = payload;
                let patch = UserLimitPatch {
                    user_limit_id: user_limit_id.clone(),
                    user_id: Some(user_id),
                    progress: Some("0".to_string()),
                    ..Default::default()
                };
                service.update_user_limit(&user_limit_id, patch).await?;
                info!(user_limit_id = %user_limit_id, "user limit progress reset");
            }
        }
        Ok(())
    }
}

fn decode_payload<T: DeserializeOwned>(data: Value) -> Result<T, ServiceError> {
    serde_json::from_value(data).map_err(|e| {
        ServiceError::validation(
            "invalid-event-payload",
            format!("failed to decode event payload: {e}"),
        )
    })
}

/// Dispatcher: classifies an envelope and executes the resulting command.
pub struct UserLimitCommandExecutor {
    service: Arc<UserLimitService>,
}

impl UserLimitCommandExecutor {
    pub fn new(service: Arc<UserLimitService>) -> Self {
        Self { service }
    }

    pub async fn execute_event(&self, event: &StreamEvent) -> Result<(), ServiceError> {
        let command = UserLimitCommand::classify(&event.event_type, event.payload.clone())?;
        command.execute(&self.service).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_event_type_is_a_classification_error() {
        let err = UserLimitCommand::classify("USER_LIMIT_TELEPORTED", json!({})).unwrap_err();
        assert!(matches!(err, ServiceError::UnknownEventType { .. }));
    }

    #[test]
    fn reset_payload_classifies() {
        let command = UserLimitCommand::classify(
            USER_LIMIT_RESET,
            json!({ "userId": "u1", "userLimitId": "L1" }),
        )
        .unwrap();
        match command {
            UserLimitCommand::Reset(payload) => {
                assert_eq!(payload.user_id, "u1");
                assert_eq!(payload.user_limit_id, "L1");
            }
            other => panic!("expected Reset, got {other:?}"),
        }
    }

    #[test]
    fn malformed_payload_for_known_type_is_a_validation_error() {
        let err =
            UserLimitCommand::classify(USER_LIMIT_RESET, json!({ "userId": "u1" })).unwrap_err();
        assert!(matches!(err, ServiceError::Validation { .. }));
    }

    #[test]
    fn envelope_decodes_wire_shape() {
        let event: StreamEvent = serde_json::from_value(json!({
            "eventId": "e-1",
            "type": "USER_LIMIT_PROGRESS_CHANGED",
            "payload": { "userId": "u1", "userLimitId": "L1", "amount": "250.00" }
        }))
        .unwrap();
        assert_eq!(event.event_type, USER_LIMIT_PROGRESS_CHANGED);
        assert_eq!(event.event_id.as_deref(), Some("e-1"));
    }
}
