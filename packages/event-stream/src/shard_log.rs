//! In-process shard-log backend.
//!
//! Stands in for a managed partitioned-log service: streams are created with
//! a fixed shard count, records are routed to a shard by an md5 hash of
//! their partition key, and consumption goes through opaque iterator tokens
//! obtained per shard. Thread-safe and cloneable; clones share state, so one
//! handle can serve producers and consumers in the same process.
//!
//! Iterator tokens remain valid until [`ShardLog::destroy`] wipes the log.
//! `get_records` hands back a `next_iterator` token so a consumer can page
//! forward without re-reading from the trim horizon.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::StreamError;

/// A single record as stored in a shard.
#[derive(Debug, Clone)]
pub struct ShardRecord {
    /// Monotonically increasing within a stream; orders records in a shard.
    pub sequence_number: u64,
    pub partition_key: String,
    pub data: Bytes,
}

/// Where a new iterator starts reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IteratorPosition {
    /// Oldest retained record in the shard.
    TrimHorizon,
    /// Only records appended after the iterator was obtained.
    Latest,
}

#[derive(Debug, Default)]
struct Shard {
    records: Vec<ShardRecord>,
}

#[derive(Debug)]
struct StreamState {
    shards: Vec<Shard>,
    next_sequence: u64,
}

#[derive(Debug, Clone)]
struct IteratorState {
    stream: String,
    shard_index: usize,
    offset: usize,
}

#[derive(Default)]
struct LogState {
    streams: HashMap<String, StreamState>,
    iterators: HashMap<String, IteratorState>,
}

/// Shared handle to the in-process log. Cheap to clone.
#[derive(Clone, Default)]
pub struct ShardLog {
    inner: Arc<RwLock<LogState>>,
}

/// One batch of records plus the token to continue from.
#[derive(Debug)]
pub struct RecordBatch {
    pub records: Vec<ShardRecord>,
    pub next_iterator: String,
}

impl ShardLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a stream with the given shard count (clamped to at least one).
    pub async fn create_stream(&self, name: &str, shard_count: usize) -> Result<(), StreamError> {
        let mut state = self.inner.write().await;
        if state.streams.contains_key(name) {
            return Err(StreamError::StreamAlreadyExists(name.to_string()));
        }
        let shards = (0..shard_count.max(1)).map(|_| Shard::default()).collect();
        state.streams.insert(
            name.to_string(),
            StreamState {
                shards,
                next_sequence: 0,
            },
        );
        Ok(())
    }

    /// Names of all streams, sorted. Empty when none exist.
    pub async fn list_streams(&self) -> Vec<String> {
        let state = self.inner.read().await;
        let mut names: Vec<String> = state.streams.keys().cloned().collect();
        names.sort();
        names
    }

    /// Shard ids of a stream, in shard order.
    pub async fn describe_stream(&self, name: &str) -> Result<Vec<String>, StreamError> {
        let state = self.inner.read().await;
        let stream = state
            .streams
            .get(name)
            .ok_or_else(|| StreamError::StreamNotFound(name.to_string()))?;
        Ok((0..stream.shards.len()).map(shard_id).collect())
    }

    /// Append a record, routed to a shard by its partition key.
    pub async fn put_record(
        &self,
        stream_name: &str,
        partition_key: &str,
        data: Bytes,
    ) -> Result<(String, u64), StreamError> {
        let mut state = self.inner.write().await;
        let stream = state
            .streams
            .get_mut(stream_name)
            .ok_or_else(|| StreamError::StreamNotFound(stream_name.to_string()))?;
        let shard_index = route_partition_key(partition_key, stream.shards.len());
        let sequence_number = stream.next_sequence;
        stream.next_sequence += 1;
        stream.shards[shard_index].records.push(ShardRecord {
            sequence_number,
            partition_key: partition_key.to_string(),
            data,
        });
        Ok((shard_id(shard_index), sequence_number))
    }

    /// Obtain an opaque iterator token for one shard of a stream.
    pub async fn get_shard_iterator(
        &self,
        stream_name: &str,
        shard: &str,
        position: IteratorPosition,
    ) -> Result<String, StreamError> {
        let mut state = self.inner.write().await;
        let stream = state
            .streams
            .get(stream_name)
            .ok_or_else(|| StreamError::StreamNotFound(stream_name.to_string()))?;
        let shard_index = parse_shard_id(shard, stream.shards.len()).ok_or_else(|| {
            StreamError::ShardNotFound {
                stream: stream_name.to_string(),
                shard_id: shard.to_string(),
            }
        })?;
        let offset = match position {
            IteratorPosition::TrimHorizon => 0,
            IteratorPosition::Latest => stream.shards[shard_index].records.len(),
        };
        let token = Uuid::new_v4().to_string();
        state.iterators.insert(
            token.clone(),
            IteratorState {
                stream: stream_name.to_string(),
                shard_index,
                offset,
            },
        );
        Ok(token)
    }

    /// Pull up to `limit` records through an iterator token.
    pub async fn get_records(&self, iterator: &str, limit: usize) -> Result<RecordBatch, StreamError> {
        let mut state = self.inner.write().await;
        let position = state
            .iterators
            .get(iterator)
            .cloned()
            .ok_or(StreamError::InvalidIterator)?;
        let stream = state
            .streams
            .get(&position.stream)
            .ok_or_else(|| StreamError::StreamNotFound(position.stream.clone()))?;
        let shard = stream
            .shards
            .get(position.shard_index)
            .ok_or(StreamError::InvalidIterator)?;
        let end = shard.records.len().min(position.offset + limit.max(1));
        let records: Vec<ShardRecord> = shard.records[position.offset.min(end)..end].to_vec();
        let next_iterator = Uuid::new_v4().to_string();
        state.iterators.insert(
            next_iterator.clone(),
            IteratorState {
                stream: position.stream,
                shard_index: position.shard_index,
                offset: end,
            },
        );
        Ok(RecordBatch {
            records,
            next_iterator,
        })
    }

    /// Drop all streams and invalidate every outstanding iterator.
    /// Safe to call repeatedly.
    pub async fn destroy(&self) {
        let mut state = self.inner.write().await;
        state.streams.clear();
        state.iterators.clear();
    }
}

fn shard_id(index: usize) -> String {
    format!("shardId-{index:012}")
}

fn parse_shard_id(shard: &str, shard_count: usize) -> Option<usize> {
    let index: usize = shard.strip_prefix("shardId-")?.parse().ok()?;
    (index < shard_count).then_some(index)
}

/// Route a partition key onto a shard: md5 of the key, first 8 bytes as a
/// big-endian integer, modulo the shard count.
fn route_partition_key(partition_key: &str, shard_count: usize) -> usize {
    let digest = md5::compute(partition_key.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest.0[..8]);
    (u64::from_be_bytes(prefix) % shard_count.max(1) as u64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_stream_twice_errors() {
        let log = ShardLog::new();
        log.create_stream("events", 1).await.unwrap();
        let err = log.create_stream("events", 1).await.unwrap_err();
        assert!(matches!(err, StreamError::StreamAlreadyExists(_)));
    }

    #[tokio::test]
    async fn list_streams_is_sorted_and_empty_safe() {
        let log = ShardLog::new();
        assert!(log.list_streams().await.is_empty());
        log.create_stream("b-stream", 1).await.unwrap();
        log.create_stream("a-stream", 1).await.unwrap();
        assert_eq!(log.list_streams().await, vec!["a-stream", "b-stream"]);
    }

    #[tokio::test]
    async fn partition_key_routing_is_deterministic() {
        let log = ShardLog::new();
        log.create_stream("events", 4).await.unwrap();
        let (first_shard, _) = log
            .put_record("events", "user-1", Bytes::from_static(b"a"))
            .await
            .unwrap();
        let (second_shard, _) = log
            .put_record("events", "user-1", Bytes::from_static(b"b"))
            .await
            .unwrap();
        assert_eq!(first_shard, second_shard);
    }

    #[tokio::test]
    async fn trim_horizon_reads_from_oldest_in_order() {
        let log = ShardLog::new();
        log.create_stream("events", 1).await.unwrap();
        for payload in ["one", "two", "three"] {
            log.put_record("events", "u1", Bytes::copy_from_slice(payload.as_bytes()))
                .await
                .unwrap();
        }
        let shards = log.describe_stream("events").await.unwrap();
        let iterator = log
            .get_shard_iterator("events", &shards[0], IteratorPosition::TrimHorizon)
            .await
            .unwrap();
        let batch = log.get_records(&iterator, 100).await.unwrap();
        let payloads: Vec<String> = batch
            .records
            .iter()
            .map(|r| String::from_utf8(r.data.to_vec()).unwrap())
            .collect();
        assert_eq!(payloads, vec!["one", "two", "three"]);
        let sequences: Vec<u64> = batch.records.iter().map(|r| r.sequence_number).collect();
        assert!(sequences.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn latest_iterator_sees_only_new_records() {
        let log = ShardLog::new();
        log.create_stream("events", 1).await.unwrap();
        log.put_record("events", "u1", Bytes::from_static(b"old"))
            .await
            .unwrap();
        let shards = log.describe_stream("events").await.unwrap();
        let iterator = log
            .get_shard_iterator("events", &shards[0], IteratorPosition::Latest)
            .await
            .unwrap();
        log.put_record("events", "u1", Bytes::from_static(b"new"))
            .await
            .unwrap();
        let batch = log.get_records(&iterator, 100).await.unwrap();
        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.records[0].data.as_ref(), &b"new"[..]);
    }

    #[tokio::test]
    async fn next_iterator_pages_forward() {
        let log = ShardLog::new();
        log.create_stream("events", 1).await.unwrap();
        for payload in ["one", "two"] {
            log.put_record("events", "u1", Bytes::copy_from_slice(payload.as_bytes()))
                .await
                .unwrap();
        }
        let shards = log.describe_stream("events").await.unwrap();
        let iterator = log
            .get_shard_iterator("events", &shards[0], IteratorPosition::TrimHorizon)
            .await
            .unwrap();
        let first = log.get_records(&iterator, 1).await.unwrap();
        assert_eq!(first.records[0].data.as_ref(), &b"one"[..]);
        let second = log.get_records(&first.next_iterator, 1).await.unwrap();
        assert_eq!(second.records[0].data.as_ref(), &b"two"[..]);
        let third = log.get_records(&second.next_iterator, 1).await.unwrap();
        assert!(third.records.is_empty());
    }

    #[tokio::test]
    async fn unknown_stream_and_iterator_error() {
        let log = ShardLog::new();
        assert!(matches!(
            log.describe_stream("missing").await.unwrap_err(),
            StreamError::StreamNotFound(_)
        ));
        assert!(matches!(
            log.get_records("not-a-token", 10).await.unwrap_err(),
            StreamError::InvalidIterator
        ));
    }

    #[tokio::test]
    async fn destroy_invalidates_iterators_and_is_idempotent() {
        let log = ShardLog::new();
        log.create_stream("events", 1).await.unwrap();
        let shards = log.describe_stream("events").await.unwrap();
        let iterator = log
            .get_shard_iterator("events", &shards[0], IteratorPosition::TrimHorizon)
            .await
            .unwrap();
        log.destroy().await;
        log.destroy().await;
        assert!(log.list_streams().await.is_empty());
        assert!(matches!(
            log.get_records(&iterator, 10).await.unwrap_err(),
            StreamError::InvalidIterator
        ));
    }
}
