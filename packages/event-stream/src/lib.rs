//! Partitioned append-only event stream abstraction.
//!
//! Two layers:
//!
//! - [`ShardLog`] — an in-process shard-log backend with managed-stream
//!   semantics: named streams, a fixed shard set per stream, partition-key
//!   routing, and opaque read iterators with trim-horizon positioning.
//! - [`EventStreamAdapter`] — the capability set consumers and producers
//!   program against. Adapter operations absorb their own failures at the
//!   boundary (report, then return a safe empty value) so a transient stream
//!   hiccup degrades to "no records this cycle" instead of killing the
//!   process.
//!
//! The adapter trait is backend-agnostic; [`MemoryStreamAdapter`] is the
//! bundled implementation against [`ShardLog`].

pub mod adapter;
pub mod error;
pub mod memory;
pub mod shard_log;

pub use adapter::{create_adapter, AdapterKind, EventStreamAdapter, RecordAck};
pub use error::StreamError;
pub use memory::MemoryStreamAdapter;
pub use shard_log::{IteratorPosition, ShardLog, ShardRecord};
