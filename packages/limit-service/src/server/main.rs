// Main entry point for the user limit service

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use event_stream::{create_adapter, AdapterKind, ShardLog};
use limit_service::domains::user_limits::commands::UserLimitCommandExecutor;
use limit_service::domains::user_limits::consumer::{ConsumerConfig, StreamConsumer};
use limit_service::domains::user_limits::data::PgUserLimitRepository;
use limit_service::domains::user_limits::service::UserLimitService;
use limit_service::kernel::HttpUserDirectory;
use limit_service::server::{build_app, AppState};
use limit_service::{publisher, Config};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,limit_service=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting user limit service");

    // A failure from here until serving is catastrophic: report and exit.
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let repository = Arc::new(PgUserLimitRepository::new(pool.clone()));
    let directory = Arc::new(HttpUserDirectory::new(config.user_directory_url.clone()));
    let service = Arc::new(UserLimitService::new(repository, directory));

    let adapter = create_adapter(AdapterKind::Memory, ShardLog::new());

    let executor = UserLimitCommandExecutor::new(service.clone());
    let consumer_config = ConsumerConfig {
        stream_name: config.stream_name.clone(),
        poll_interval: Duration::from_secs(config.poll_interval_secs),
    };
    let consumer = StreamConsumer::new(adapter.clone(), executor, consumer_config);

    if config.seed_events {
        // Cold-start mode: seed the stream, drain it once, then serve reads.
        // The trim-horizon read would re-apply the seeded batch every poll.
        publisher::seed_stream(adapter.as_ref(), &config.stream_name)
            .await
            .context("Failed to seed the event stream")?;
        consumer.run_once().await;
    } else {
        tokio::spawn(consumer.run_until_shutdown());
    }

    let app = build_app(AppState {
        db_pool: pool,
        service,
    });

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    adapter.destroy().await;
    Ok(())
}
