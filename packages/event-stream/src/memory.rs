//! Adapter implementation against the in-process [`ShardLog`] backend.

use async_trait::async_trait;
use bytes::Bytes;
use tracing::{error, info};

use crate::adapter::{EventStreamAdapter, RecordAck};
use crate::error::StreamError;
use crate::shard_log::{IteratorPosition, ShardLog};

const DEFAULT_BATCH_LIMIT: usize = 1000;

/// [`EventStreamAdapter`] over a shared [`ShardLog`] handle.
///
/// Streams are created single-shard, and consumption only ever reads the
/// first shard — no fan-out across shards.
pub struct MemoryStreamAdapter {
    log: ShardLog,
    batch_limit: usize,
}

impl MemoryStreamAdapter {
    pub fn new(log: ShardLog) -> Self {
        Self {
            log,
            batch_limit: DEFAULT_BATCH_LIMIT,
        }
    }

    pub fn with_batch_limit(mut self, batch_limit: usize) -> Self {
        self.batch_limit = batch_limit;
        self
    }

    /// Three-step consumption protocol: describe the stream and take its
    /// first shard, obtain a trim-horizon iterator, pull one batch and
    /// decode each payload.
    async fn fetch_batch(&self, stream_name: &str) -> Result<Vec<serde_json::Value>, StreamError> {
        let shard_ids = self.log.describe_stream(stream_name).await?;
        let shard_id = shard_ids
            .first()
            .ok_or_else(|| StreamError::NoShards(stream_name.to_string()))?;
        let iterator = self
            .log
            .get_shard_iterator(stream_name, shard_id, IteratorPosition::TrimHorizon)
            .await?;
        let batch = self.log.get_records(&iterator, self.batch_limit).await?;
        if batch.records.is_empty() {
            info!(stream = stream_name, "no records in stream yet");
        }
        batch
            .records
            .iter()
            .map(|record| serde_json::from_slice(&record.data).map_err(StreamError::from))
            .collect()
    }
}

#[async_trait]
impl EventStreamAdapter for MemoryStreamAdapter {
    async fn create_stream(&self, stream_name: &str) {
        if let Err(e) = self.log.create_stream(stream_name, 1).await {
            error!(stream = stream_name, error = %e, "failed to create stream");
        }
    }

    async fn list_streams(&self) -> Vec<String> {
        self.log.list_streams().await
    }

    async fn create_record(
        &self,
        payload: &[u8],
        stream_name: &str,
        partition_key: &str,
    ) -> Option<RecordAck> {
        match self
            .log
            .put_record(stream_name, partition_key, Bytes::copy_from_slice(payload))
            .await
        {
            Ok((shard_id, sequence_number)) => Some(RecordAck {
                shard_id,
                sequence_number,
            }),
            Err(e) => {
                error!(stream = stream_name, error = %e, "failed to create record");
                None
            }
        }
    }

    async fn get_records(&self, stream_name: &str) -> Vec<serde_json::Value> {
        match self.fetch_batch(stream_name).await {
            Ok(records) => records,
            Err(e) => {
                error!(stream = stream_name, error = %e, "failed to read records");
                Vec::new()
            }
        }
    }

    async fn destroy(&self) {
        self.log.destroy().await;
        info!("stream backend destroyed");
    }
}
