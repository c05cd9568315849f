//! Publisher side of the pipeline: seeds the stream with the bundled
//! fixture events.
//!
//! Mirrors what an upstream producer does: check the stream exists (create
//! it when absent — the adapter does not dedupe), then append one UTF-8 JSON
//! record per event, partition-keyed by the subject user id for ownership
//! locality.

use anyhow::{Context, Result};
use event_stream::EventStreamAdapter;
use serde_json::Value;
use tracing::{info, warn};

/// Bundled demo events, one envelope per record.
pub const FIXTURE_EVENTS: &str = include_str!("../fixtures/events.json");

/// Parse the bundled fixture events.
pub fn fixture_events() -> Result<Vec<Value>> {
    serde_json::from_str(FIXTURE_EVENTS).context("failed to parse bundled fixture events")
}

/// Publish the given events onto the stream, creating it when absent.
pub async fn publish_events(
    adapter: &dyn EventStreamAdapter,
    stream_name: &str,
    events: &[Value],
) -> Result<()> {
    let streams = adapter.list_streams().await;
    if !streams.iter().any(|name| name == stream_name) {
        info!(stream = stream_name, "creating stream");
        adapter.create_stream(stream_name).await;
    }

    for event in events {
        let partition_key = event
            .get("payload")
            .and_then(|payload| payload.get("userId"))
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        let bytes = serde_json::to_vec(event).context("failed to serialize event")?;
        match adapter.create_record(&bytes, stream_name, partition_key).await {
            Some(ack) => info!(
                event_id = ?event.get("eventId"),
                event_type = ?event.get("type"),
                shard = %ack.shard_id,
                "published event"
            ),
            None => warn!(event_id = ?event.get("eventId"), "failed to publish event"),
        }
    }
    Ok(())
}

/// Seed the stream with the bundled fixtures.
pub async fn seed_stream(adapter: &dyn EventStreamAdapter, stream_name: &str) -> Result<()> {
    let events = fixture_events()?;
    publish_events(adapter, stream_name, &events).await
}
