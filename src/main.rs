//! Guest Concierge service entrypoint.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use guest_concierge::adapters::ai::{
    AnthropicConfig, AnthropicProvider, FailoverAIProvider, OpenAIConfig, OpenAIProvider,
};
use guest_concierge::adapters::faq::YamlFaqCorpus;
use guest_concierge::adapters::gateway::{HttpGatewayConfig, HttpMessagingGateway};
use guest_concierge::adapters::http::{app_router, AppState};
use guest_concierge::adapters::notifications::{SlackConfig, SlackWebhookChannel};
use guest_concierge::adapters::postgres::{
    PostgresConversationRepository, PostgresListingReader, PostgresSupportTicketRepository,
};
use guest_concierge::adapters::token_cache::{InMemoryTokenCache, RedisTokenCache};
use guest_concierge::application::{
    CreateSupportTicketHandler, EscalationNotifier, PipelineComponents, PipelinePorts,
    RespondToGuestHandler, UpdateTicketStatusHandler,
};
use guest_concierge::config::{
    AiConfig, AiProvider, AppConfig, ConfigError, RedisConfig, ServerConfig, ValidationError,
};
use guest_concierge::ports::{
    AIError, AIProvider, GatewayError, NotificationChannel, NotificationError,
    SupportTicketRepository, TokenCache,
};

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] ValidationError),

    #[error("database: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migrations: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("redis: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("AI provider: {0}")]
    Ai(#[from] AIError),

    #[error("messaging gateway: {0}")]
    Gateway(#[from] GatewayError),

    #[error("notifications: {0}")]
    Notification(#[from] NotificationError),

    #[error("server: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config.server);

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;
    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("database migrations applied");
    }

    let ai = build_ai_provider(&config.ai)?;
    let tokens = build_token_cache(config.redis.as_ref()).await?;
    let gateway = HttpMessagingGateway::new(
        HttpGatewayConfig::new(
            config.gateway.base_url.clone(),
            config.gateway.client_id.clone(),
            config.gateway.client_secret().to_string(),
        )
        .with_timeout(config.gateway.timeout())
        .with_default_token_ttl(config.gateway.token_ttl()),
        tokens,
    )?;

    let notifications: Option<Arc<dyn NotificationChannel>> = match &config.notifications {
        Some(slack) => Some(Arc::new(SlackWebhookChannel::new(
            SlackConfig::new(slack.webhook_url()).with_timeout(slack.timeout()),
        )?)),
        None => {
            tracing::warn!("no Slack webhook configured, tickets will only be stored");
            None
        }
    };
    let tickets: Arc<dyn SupportTicketRepository> =
        Arc::new(PostgresSupportTicketRepository::new(pool.clone()));

    let tuning = config
        .pipeline
        .tuning(config.ai.timeout(), config.gateway.timeout());
    let components = PipelineComponents::assemble(
        PipelinePorts {
            ai,
            conversations: Arc::new(PostgresConversationRepository::new(pool.clone())),
            listings: Arc::new(PostgresListingReader::new(pool.clone())),
            faqs: Arc::new(YamlFaqCorpus::new(&config.knowledge.faq_path)),
            gateway: Arc::new(gateway),
            tickets: tickets.clone(),
            notifications: notifications.clone(),
        },
        &tuning,
    );
    let notifier = Arc::new(EscalationNotifier::new(
        tickets.clone(),
        notifications,
        tuning.store_timeout,
    ));

    let state = AppState::new(
        Arc::new(RespondToGuestHandler::new(components, config.pipeline.settings())),
        Arc::new(CreateSupportTicketHandler::new(notifier)),
        Arc::new(UpdateTicketStatusHandler::new(tickets)),
    );
    let app = app_router(state, config.server.request_timeout());

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "guest concierge listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("shut down");
    Ok(())
}

/// JSON lines in production, compact text elsewhere. `RUST_LOG` wins over config.
fn init_tracing(server: &ServerConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&server.log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if server.is_production() {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

fn build_ai_provider(config: &AiConfig) -> Result<Arc<dyn AIProvider>, StartupError> {
    let primary = provider(config, config.primary_provider)?;
    let Some(fallback) = config.fallback_provider else {
        return Ok(primary);
    };

    tracing::info!(primary = ?config.primary_provider, fallback = ?fallback, "AI failover enabled");
    Ok(Arc::new(
        FailoverAIProvider::new(primary).with_fallback(provider(config, fallback)?),
    ))
}

fn provider(config: &AiConfig, which: AiProvider) -> Result<Arc<dyn AIProvider>, StartupError> {
    match which {
        AiProvider::Anthropic => {
            let key = config
                .api_key(which)
                .ok_or(ValidationError::MissingRequired("AI__ANTHROPIC_API_KEY"))?;
            let mut settings = AnthropicConfig::new(key)
                .with_timeout(config.timeout())
                .with_max_retries(config.max_retries);
            if let Some(model) = &config.anthropic_model {
                settings = settings.with_model(model.clone());
            }
            Ok(Arc::new(AnthropicProvider::new(settings)?))
        }
        AiProvider::OpenAI => {
            let key = config
                .api_key(which)
                .ok_or(ValidationError::MissingRequired("AI__OPENAI_API_KEY"))?;
            let mut settings = OpenAIConfig::new(key)
                .with_timeout(config.timeout())
                .with_max_retries(config.max_retries);
            if let Some(model) = &config.openai_model {
                settings = settings.with_model(model.clone());
            }
            Ok(Arc::new(OpenAIProvider::new(settings)?))
        }
    }
}

async fn build_token_cache(
    config: Option<&RedisConfig>,
) -> Result<Arc<dyn TokenCache>, StartupError> {
    let Some(redis_config) = config else {
        tracing::info!("gateway tokens cached in process memory");
        return Ok(Arc::new(InMemoryTokenCache::new()));
    };

    let client = redis::Client::open(redis_config.url.as_str())?;
    let conn = tokio::time::timeout(
        redis_config.timeout(),
        client.get_multiplexed_tokio_connection(),
    )
    .await
    .map_err(|_| {
        std::io::Error::new(std::io::ErrorKind::TimedOut, "redis connection timed out")
    })??;

    tracing::info!("gateway tokens cached in redis");
    Ok(Arc::new(
        RedisTokenCache::new(conn).with_prefix(redis_config.key_prefix.clone()),
    ))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
