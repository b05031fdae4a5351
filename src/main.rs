//! Memechat HTTP server.
//!
//! Loads `.env`, reads configuration from the environment, wires the chat
//! store, model, and trading adapters, and serves the chat routes until
//! interrupted.

use std::sync::Arc;

use anyhow::Context;
use mockable::DefaultClock;
use secrecy::ExposeSecret;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use memechat::{
    chat::{
        adapters::{
            memory::InMemoryChatRepository, ollama::OllamaClient,
            postgres::PostgresChatRepository,
        },
        ports::{ChatRepository, LanguageModel, TitleGenerator},
        services::{ChatService, ChatSettings},
    },
    command::{
        adapters::http::HttpTradingAdapter, registry::CommandRegistry,
        services::CommandExecutor,
    },
    config::{AppConfig, DatabaseConfig, LogFormat},
    server::{AppState, AuthSettings, DynChatService, router},
};

const DEFAULT_LOG_FILTER: &str = "memechat=info,tower_http=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env().context("invalid configuration")?;
    init_tracing(config.log_format);

    let repository = chat_store(config.database.as_ref()).await?;
    let ollama = Arc::new(
        OllamaClient::new(&config.model.base_url, &config.model.model)
            .context("failed to build model client")?
            .with_stall_timeout(config.model.stall_timeout),
    );
    let model: Arc<dyn LanguageModel> = ollama.clone();
    let titles: Arc<dyn TitleGenerator> = ollama;
    let trading = HttpTradingAdapter::new(
        &config.trading.base_url,
        config.trading.api_key.clone(),
        config.trading.timeout,
    )
    .context("failed to build trading client")?;
    let commands = CommandExecutor::new(CommandRegistry::builtin(), Arc::new(trading));

    let service: DynChatService = ChatService::new(
        repository,
        model,
        titles,
        Arc::new(commands),
        Arc::new(DefaultClock),
    )
    .with_settings(ChatSettings {
        max_tokens: config.model.max_tokens,
    });
    let auth = AuthSettings::new(&config.auth.user_header, config.auth.shared_secret.clone())
        .context("invalid AUTH_USER_HEADER")?;
    let app = router(AppState::new(service, auth));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, model = %config.model.model, "memechat listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    info!("memechat stopped");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .init(),
    }
}

async fn chat_store(database: Option<&DatabaseConfig>) -> anyhow::Result<Arc<dyn ChatRepository>> {
    let Some(database) = database else {
        info!("DATABASE_URL unset, chats are kept in memory");
        return Ok(Arc::new(InMemoryChatRepository::new()));
    };
    let repository =
        PostgresChatRepository::connect(database.url.expose_secret(), database.pool_size)
            .await
            .context("failed to connect to PostgreSQL")?;
    repository
        .run_migrations()
        .await
        .context("failed to apply chat schema")?;
    info!(pool_size = database.pool_size, "using PostgreSQL chat store");
    Ok(Arc::new(repository))
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::warn!("ctrl-c handler unavailable, running until killed");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
