//! Whisper Engine server binary.
//!
//! Loads configuration from the environment, wires the storage, classifier
//! and notification adapters into an [`Engine`], and serves the HTTP API.

use std::error::Error;
use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use sqlx::PgPool;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use whisper_engine::adapters::ai::FailoverAIProvider;
use whisper_engine::adapters::http::{app_router, AppState};
use whisper_engine::adapters::memory::{
    InMemoryAccountRepository, InMemoryQuestionRepository, InMemoryResponseRepository,
    InMemorySessionReportRepository,
};
use whisper_engine::adapters::notifications::{
    BroadcastNotificationBus, FanoutNotificationBus, RedisNotificationBus,
};
use whisper_engine::adapters::postgres::{
    self, PostgresAccountRepository, PostgresQuestionRepository, PostgresResponseRepository,
    PostgresSessionReportRepository,
};
use whisper_engine::application::{Engine, EnginePolicy, EnginePorts};
use whisper_engine::config::{AppConfig, DatabaseConfig, NotificationConfig, ServerConfig};
use whisper_engine::ports::{AIProvider, NotificationBus};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let classifier = Arc::new(FailoverAIProvider::from_config(&config.moderation)?);
    tracing::info!(
        backends = ?classifier.backend_labels(),
        "classifier chain ready"
    );

    let feed = BroadcastNotificationBus::new(config.notifications.channel_capacity);
    let bus = notification_bus(&config.notifications, feed.clone()).await?;

    let ports = storage_ports(config.database.as_ref(), classifier, bus).await?;
    let policy = EnginePolicy {
        screen_asker_replies: config.moderation.screen_asker_replies,
        excerpt_chars: config.moderation.excerpt_chars,
    };
    let engine = Engine::new(ports, policy);

    let app = with_layers(app_router(AppState::new(engine, feed)), &config.server);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "whisper engine listening");

    axum::serve(listener, app).await?;
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(server.log_level.as_str()));

    if server.json_logs() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// Broadcast feed for websocket clients, plus Redis when configured.
async fn notification_bus(
    config: &NotificationConfig,
    feed: BroadcastNotificationBus,
) -> Result<Arc<dyn NotificationBus>, Box<dyn Error>> {
    let Some(url) = config.redis_url.as_deref().filter(|_| config.uses_redis()) else {
        return Ok(Arc::new(feed));
    };

    let redis = RedisNotificationBus::connect(url, config.redis_channel.clone()).await?;
    tracing::info!(channel = redis.channel(), "publishing notifications to redis");
    Ok(Arc::new(
        FanoutNotificationBus::new()
            .with_bus(Arc::new(feed))
            .with_bus(Arc::new(redis)),
    ))
}

async fn storage_ports(
    database: Option<&DatabaseConfig>,
    classifier: Arc<FailoverAIProvider>,
    bus: Arc<dyn NotificationBus>,
) -> Result<EnginePorts, Box<dyn Error>> {
    let classifier: Arc<dyn AIProvider> = classifier;
    let assistant = classifier.clone();

    let Some(database) = database else {
        tracing::warn!("no database configured, using in-memory storage");
        let accounts = Arc::new(InMemoryAccountRepository::new());
        return Ok(EnginePorts {
            accounts: accounts.clone(),
            directory: accounts,
            questions: Arc::new(InMemoryQuestionRepository::new()),
            responses: Arc::new(InMemoryResponseRepository::new()),
            reports: Arc::new(InMemorySessionReportRepository::new()),
            classifier,
            assistant,
            bus,
        });
    };

    let pool: PgPool = database.pool_options().connect(&database.url).await?;
    if database.run_migrations {
        postgres::run_migrations(&pool).await?;
        tracing::info!("database migrations applied");
    }

    let accounts = Arc::new(PostgresAccountRepository::new(pool.clone()));
    Ok(EnginePorts {
        accounts: accounts.clone(),
        directory: accounts,
        questions: Arc::new(PostgresQuestionRepository::new(pool.clone())),
        responses: Arc::new(PostgresResponseRepository::new(pool.clone())),
        reports: Arc::new(PostgresSessionReportRepository::new(pool)),
        classifier,
        assistant,
        bus,
    })
}

fn with_layers(router: Router, server: &ServerConfig) -> Router {
    let cors = if server.allows_any_origin() {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = server
            .cors_origins_list()
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    router
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
