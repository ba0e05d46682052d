//! Application state wiring all services together.
//!
//! AppState holds the concrete session service used by the HTTP handlers.
//! The service is generic over store/gateway traits, but AppState pins it
//! to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

use parley_core::session::service::SessionService;
use parley_infra::config::load_config;
use parley_infra::gateway::api_key_from_env;
use parley_infra::gateway::openai::OpenAiGateway;
use parley_infra::sqlite::pool::DatabasePool;
use parley_infra::sqlite::session::SqliteSessionStore;
use parley_types::config::RelayConfig;

/// Concrete type alias for the service generics pinned to infra implementations.
pub type ConcreteSessionService = SessionService<SqliteSessionStore, OpenAiGateway>;

/// Shared application state holding the session service and configuration.
#[derive(Clone)]
pub struct AppState {
    pub session_service: Arc<ConcreteSessionService>,
    pub config: Arc<RelayConfig>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Initialize the application state: load config, connect to DB, wire services.
    pub async fn init(data_dir: PathBuf) -> anyhow::Result<Self> {
        // Ensure data directory exists
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_config(&data_dir).await;

        // Initialize database
        let db_url = format!(
            "sqlite://{}?mode=rwc",
            data_dir.join("parley.db").display()
        );
        let db_pool = DatabasePool::new(&db_url).await?;
        let store = SqliteSessionStore::new(db_pool);

        // Wire the completion gateway; the key comes from the environment
        // variable named in config, never from the config file itself.
        let api_key = api_key_from_env(&config.gateway.api_key_env).with_context(|| {
            format!(
                "gateway API key not found: set the {} environment variable",
                config.gateway.api_key_env
            )
        })?;
        let gateway = OpenAiGateway::new(&config.gateway, api_key)?;

        let session_service = SessionService::new(store, gateway, config.limits.clone());

        Ok(Self {
            session_service: Arc::new(session_service),
            config: Arc::new(config),
            data_dir,
        })
    }
}
