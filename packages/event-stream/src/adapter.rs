//! The adapter contract producers and consumers program against.
//!
//! Every operation absorbs its own failure at this boundary: it reports the
//! error through `tracing` and returns a safe empty value, so stream
//! infrastructure hiccups degrade to "no records this cycle" for consumers
//! and a skipped ack for producers.

use std::sync::Arc;

use async_trait::async_trait;

use crate::memory::MemoryStreamAdapter;
use crate::shard_log::ShardLog;

/// Acknowledgement for a produced record.
#[derive(Debug, Clone)]
pub struct RecordAck {
    pub shard_id: String,
    pub sequence_number: u64,
}

/// Capability set over a partitioned append-only log.
///
/// Implementable against any shard-based backend; see [`MemoryStreamAdapter`]
/// for the bundled one.
#[async_trait]
pub trait EventStreamAdapter: Send + Sync {
    /// Create a stream. No internal dedupe: callers check [`list_streams`]
    /// first. Failure is reported and swallowed.
    ///
    /// [`list_streams`]: EventStreamAdapter::list_streams
    async fn create_stream(&self, stream_name: &str);

    /// Names of all streams. Empty on failure or when none exist.
    async fn list_streams(&self) -> Vec<String>;

    /// Append one record, partition-keyed for ownership locality.
    /// `None` means the append failed; the error has already been reported.
    async fn create_record(
        &self,
        payload: &[u8],
        stream_name: &str,
        partition_key: &str,
    ) -> Option<RecordAck>;

    /// Pull one batch of decoded payloads from the stream's first shard,
    /// reading from the trim horizon. Empty on failure.
    async fn get_records(&self, stream_name: &str) -> Vec<serde_json::Value>;

    /// Release backend resources. Must not fault when nothing is connected.
    async fn destroy(&self);
}

/// Known adapter backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterKind {
    Memory,
}

/// Construct the adapter for a backend kind.
pub fn create_adapter(kind: AdapterKind, backend: ShardLog) -> Arc<dyn EventStreamAdapter> {
    match kind {
        AdapterKind::Memory => Arc::new(MemoryStreamAdapter::new(backend)),
    }
}
