use std::sync::Arc;

use carmatch_agent::{client_from_config, AgentRuntime, ConversationalRelay, TurnPolicy};
use carmatch_core::catalog::CarCatalog;
use carmatch_core::config::{AppConfig, ConfigError, LoadOptions};
use carmatch_db::{
    connect_with_settings, migrations, DbPool, ListingRepository, SqlListingRepository,
    SqlUserProfileRepository,
};
use carmatch_places::{finder_from_config, LookupError};
use thiserror::Error;
use tracing::{info, warn};

use crate::app::AppState;

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub state: AppState,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
    #[error("chat model client setup failed: {0}")]
    LlmClient(String),
    #[error("repair shop finder setup failed: {0}")]
    Places(#[source] LookupError),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let db_pool = connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        "database connection established"
    );

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        "database migrations applied"
    );

    let llm = client_from_config(&config.llm)
        .map_err(|error| BootstrapError::LlmClient(format!("{error:#}")))?;
    let finder = finder_from_config(&config.places).map_err(BootstrapError::Places)?;

    let catalog = CarCatalog::new(&config.catalog.csv_path);
    match catalog.try_load() {
        Ok(cars) => info!(
            event_name = "system.bootstrap.catalog_checked",
            correlation_id = "bootstrap",
            path = %catalog.path().display(),
            record_count = cars.len(),
            "car catalog readable"
        ),
        Err(error) => warn!(
            event_name = "system.bootstrap.catalog_unavailable",
            correlation_id = "bootstrap",
            error = %error,
            "car catalog unavailable, buyers will not receive matches until it exists"
        ),
    }

    let listings: Arc<dyn ListingRepository> =
        Arc::new(SqlListingRepository::new(db_pool.clone()));
    let agent = AgentRuntime::new(
        ConversationalRelay::new(llm),
        TurnPolicy::from_config(&config.buyer),
        catalog,
    )
    .with_listing_repository(listings.clone());

    info!(
        event_name = "system.bootstrap.ready",
        correlation_id = "bootstrap",
        llm_provider = ?config.llm.provider,
        places_finder = finder.name(),
        "application components initialized"
    );

    let state = AppState {
        agent: Arc::new(agent),
        listings,
        users: Arc::new(SqlUserProfileRepository::new(db_pool.clone())),
        finder,
    };

    Ok(Application { config, db_pool, state })
}
