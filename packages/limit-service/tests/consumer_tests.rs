//! End-to-end pipeline behavior: stream adapter → consumer → dispatcher →
//! domain service → repository.

mod common;

use std::sync::Arc;

use common::{build_service, persisted_limit, TestDeps};
use event_stream::{create_adapter, AdapterKind, EventStreamAdapter, ShardLog};
use limit_service::common::ServiceError;
use limit_service::domains::user_limits::commands::{
    StreamEvent, UserLimitCommand, UserLimitCommandExecutor, USER_LIMIT_RESET,
};
use limit_service::domains::user_limits::consumer::{ConsumerConfig, StreamConsumer};
use limit_service::kernel::StaticUserDirectory;
use serde_json::{json, Value};

const STREAM: &str = "user-limit-events";

fn build_consumer(deps: &TestDeps) -> (Arc<dyn EventStreamAdapter>, StreamConsumer) {
    let adapter = create_adapter(AdapterKind::Memory, ShardLog::new());
    let executor = UserLimitCommandExecutor::new(deps.service.clone());
    let consumer = StreamConsumer::new(adapter.clone(), executor, ConsumerConfig::new(STREAM));
    (adapter, consumer)
}

async fn publish(adapter: &dyn EventStreamAdapter, event: &Value) {
    let partition_key = event["payload"]["userId"].as_str().unwrap_or("unknown");
    adapter
        .create_record(
            serde_json::to_vec(event).unwrap().as_slice(),
            STREAM,
            partition_key,
        )
        .await
        .expect("record should be accepted");
}

#[tokio::test]
async fn reset_record_from_the_stream_zeroes_progress() {
    let deps = build_service(StaticUserDirectory::new().with_user("u1", "active"));
    deps.repository.insert(persisted_limit("L1", "u1", "700"));
    let (adapter, consumer) = build_consumer(&deps);

    adapter.create_stream(STREAM).await;
    publish(
        adapter.as_ref(),
        &json!({
            "eventId": "e-1",
            "type": "USER_LIMIT_RESET",
            "payload": { "userId": "u1", "userLimitId": "L1" }
        }),
    )
    .await;

    consumer.run_once().await;

    let limit = deps.service.get_user_limit("L1").await.unwrap();
    assert_eq!(limit.progress.as_deref(), Some("0"));
    assert_eq!(deps.repository.recorded_writes(), vec!["update"]);
}

#[tokio::test]
async fn one_poisoned_record_does_not_halt_the_batch() {
    let deps = build_service(StaticUserDirectory::new().with_user("u1", "active"));
    deps.repository.insert(persisted_limit("L1", "u1", "500"));
    let (_, consumer) = build_consumer(&deps);

    let records = vec![
        json!({
            "eventId": "e-1",
            "type": "USER_LIMIT_PROGRESS_CHANGED",
            "payload": { "userId": "u1", "userLimitId": "L1", "amount": "250.00" }
        }),
        // Unknown type: classification failure, isolated per record.
        json!({
            "eventId": "e-2",
            "type": "USER_LIMIT_TELEPORTED",
            "payload": {}
        }),
        // Not even an envelope.
        json!("garbage"),
        json!({
            "eventId": "e-3",
            "type": "USER_LIMIT_RESET",
            "payload": { "userId": "u1", "userLimitId": "L1" }
        }),
    ];

    consumer.run_seeded(records).await;

    let limit = deps.service.get_user_limit("L1").await.unwrap();
    assert_eq!(limit.progress.as_deref(), Some("0"));
    assert_eq!(deps.repository.recorded_writes(), vec!["update", "update"]);
}

#[tokio::test]
async fn unknown_event_type_makes_zero_repository_calls() {
    let deps = build_service(StaticUserDirectory::new().with_user("u1", "active"));
    let executor = UserLimitCommandExecutor::new(deps.service.clone());

    let event = StreamEvent {
        event_id: Some("e-1".to_string()),
        event_type: "USER_LIMIT_TELEPORTED".to_string(),
        payload: json!({}),
    };
    let err = executor.execute_event(&event).await.unwrap_err();

    assert!(matches!(err, ServiceError::UnknownEventType { .. }));
    assert!(deps.repository.recorded_calls().is_empty());
}

#[tokio::test]
async fn reset_is_idempotent() {
    let deps = build_service(StaticUserDirectory::new().with_user("u1", "active"));
    deps.repository.insert(persisted_limit("L1", "u1", "900"));

    for _ in 0..2 {
        let command = UserLimitCommand::classify(
            USER_LIMIT_RESET,
            json!({ "userId": "u1", "userLimitId": "L1" }),
        )
        .unwrap();
        command.execute(&deps.service).await.unwrap();
        let limit = deps.service.get_user_limit("L1").await.unwrap();
        assert_eq!(limit.progress.as_deref(), Some("0"));
    }
}

#[tokio::test]
async fn create_event_from_the_stream_persists_a_limit() {
    let deps = build_service(StaticUserDirectory::new().with_user("user-1001", "active"));
    let (adapter, consumer) = build_consumer(&deps);

    adapter.create_stream(STREAM).await;
    publish(
        adapter.as_ref(),
        &json!({
            "eventId": "e-1",
            "type": "USER_LIMIT_CREATED",
            "payload": {
                "brandId": "b1",
                "userId": "user-1001",
                "currencyCode": "USD",
                "value": "1000",
                "status": "ACTIVE",
                "period": "CALENDAR_DAY",
                "type": "BALANCE",
                "activeFrom": 1_i64
            }
        }),
    )
    .await;

    consumer.run_once().await;

    let limits = deps.service.get_all_user_limits().await.unwrap();
    assert_eq!(limits.len(), 1);
    assert_eq!(limits[0].user_id, "user-1001");
    assert!(!limits[0].user_limit_id.is_empty());
}

#[tokio::test]
async fn records_are_dispatched_in_input_order() {
    let deps = build_service(StaticUserDirectory::new().with_user("u1", "active"));
    deps.repository.insert(persisted_limit("L1", "u1", "0"));
    let (adapter, consumer) = build_consumer(&deps);

    adapter.create_stream(STREAM).await;
    for amount in ["100", "200", "300"] {
        publish(
            adapter.as_ref(),
            &json!({
                "type": "USER_LIMIT_PROGRESS_CHANGED",
                "payload": { "userId": "u1", "userLimitId": "L1", "amount": amount }
            }),
        )
        .await;
    }

    consumer.run_once().await;

    let limit = deps.service.get_user_limit("L1").await.unwrap();
    assert_eq!(limit.progress.as_deref(), Some("300"));
}

#[tokio::test]
async fn empty_stream_is_a_quiet_cycle() {
    let deps = build_service(StaticUserDirectory::new());
    let (adapter, consumer) = build_consumer(&deps);

    adapter.create_stream(STREAM).await;
    consumer.run_once().await;

    assert!(deps.repository.recorded_calls().is_empty());
}
