use thiserror::Error;

/// Transport-level stream errors.
///
/// These never cross the adapter boundary: adapter operations report them
/// and return a safe empty value instead.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("stream {0} does not exist")]
    StreamNotFound(String),

    #[error("stream {0} already exists")]
    StreamAlreadyExists(String),

    #[error("shard {shard_id} does not exist in stream {stream}")]
    ShardNotFound { stream: String, shard_id: String },

    #[error("stream {0} has no shards")]
    NoShards(String),

    #[error("unknown or invalidated shard iterator")]
    InvalidIterator,

    #[error("failed to decode record payload: {0}")]
    Decode(#[from] serde_json::Error),
}
