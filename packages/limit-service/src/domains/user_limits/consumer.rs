//! Stream consumer: drains batches of envelopes through the command
//! executor.
//!
//! Records are handled strictly sequentially within a batch, in input order.
//! Each record's dispatch is isolated: a failure is reported and the loop
//! moves on, so one poisoned record never halts the batch. A batch, once
//! started, runs to completion; shutdown is observed between batches.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use event_stream::EventStreamAdapter;
use serde_json::Value;
use tracing::{debug, info};

use crate::common::{report, ServiceError};

use super::commands::{StreamEvent, UserLimitCommandExecutor};

#[derive(Debug, Clone)]
pub struct ConsumerConfig {
    pub stream_name: String,
    /// How long to wait between polls.
    pub poll_interval: Duration,
}

impl ConsumerConfig {
    pub fn new(stream_name: impl Into<String>) -> Self {
        Self {
            stream_name: stream_name.into(),
            poll_interval: Duration::from_secs(5),
        }
    }
}

pub struct StreamConsumer {
    adapter: Arc<dyn EventStreamAdapter>,
    executor: UserLimitCommandExecutor,
    config: ConsumerConfig,
    shutdown: Arc<AtomicBool>,
}

impl StreamConsumer {
    pub fn new(
        adapter: Arc<dyn EventStreamAdapter>,
        executor: UserLimitCommandExecutor,
        config: ConsumerConfig,
    ) -> Self {
        Self {
            adapter,
            executor,
            config,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Get a shutdown handle; store `true` to stop the poll loop after the
    /// current batch.
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        self.shutdown.clone()
    }

    pub fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    /// Drain one batch from the stream (cold start / backfill).
    pub async fn run_once(&self) {
        let records = self.adapter.get_records(&self.config.stream_name).await;
        self.process_records(records).await;
    }

    /// Feed a pre-seeded batch instead of pulling from the stream
    /// (offline mode).
    pub async fn run_seeded(&self, records: Vec<Value>) {
        self.process_records(records).await;
    }

    /// Poll loop: one batch per cycle until shutdown is requested.
    pub async fn run(self) {
        info!(
            stream = %self.config.stream_name,
            poll_interval_ms = self.config.poll_interval.as_millis() as u64,
            "stream consumer starting"
        );

        loop {
            if self.shutdown.load(Ordering::SeqCst) {
                break;
            }
            self.run_once().await;
            tokio::time::sleep(self.config.poll_interval).await;
        }

        info!(stream = %self.config.stream_name, "stream consumer stopped");
    }

    /// Run until Ctrl+C.
    pub async fn run_until_shutdown(self) {
        let shutdown = self.shutdown_handle();
        tokio::spawn(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("received shutdown signal");
            shutdown.store(true, Ordering::SeqCst);
        });
        self.run().await;
    }

    async fn process_records(&self, records: Vec<Value>) {
        for record in records {
            if let Err(error) = self.dispatch_record(record).await {
                report(&error);
            }
        }
    }

    async fn dispatch_record(&self, record: Value) -> Result<(), ServiceError> {
        let event: StreamEvent = serde_json::from_value(record).map_err(|e| {
            ServiceError::validation(
                "invalid-event-envelope",
                format!("failed to decode stream envelope: {e}"),
            )
        })?;
        debug!(event_type = %event.event_type, event_id = ?event.event_id, "dispatching stream event");
        self.executor.execute_event(&event).await
    }
}
