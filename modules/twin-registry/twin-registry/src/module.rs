use std::sync::Arc;

use anyhow::Context;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};
use twin_registry_sdk::{TwinRegistryClientV1, TwinRegistryError};

use crate::config::TwinRegistryConfig;
use crate::domain::service::{ModelsService, ServiceConfig, TelemetryService, TwinsService};
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::{
    SeaOrmModelsRepository, SeaOrmTelemetryRepository, SeaOrmTwinsRepository,
};
use crate::local_client::TwinRegistryLocalClient;

/// Composition root: owns the database handle and the local client built on it.
pub struct TwinRegistry {
    db: DatabaseConnection,
    client: Arc<TwinRegistryLocalClient>,
}

impl TwinRegistry {
    /// Open the connection pool described by `cfg` and wire the registry over it.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid, the database cannot
    /// be reached or a migration fails.
    pub async fn connect(cfg: &TwinRegistryConfig) -> anyhow::Result<Self> {
        cfg.validate()?;
        let db_cfg = &cfg.database;
        info!(dsn = %db_cfg.redacted_dsn(), "Connecting twin registry database");

        let mut opts = ConnectOptions::new(db_cfg.dsn.clone());
        opts.max_connections(db_cfg.max_connections)
            .min_connections(db_cfg.min_connections)
            .acquire_timeout(db_cfg.acquire_timeout)
            .sqlx_logging(db_cfg.sqlx_logging);
        if db_cfg.dsn.contains(":memory:") {
            // Every pooled connection to an in-memory SQLite database would see its own copy.
            debug!("In-memory database, using a single connection");
            opts.max_connections(1).min_connections(1);
        }

        let db = Database::connect(opts)
            .await
            .with_context(|| format!("failed to connect to {}", db_cfg.redacted_dsn()))?;
        Self::from_connection(db, cfg).await
    }

    /// Wire the registry over an existing connection.
    ///
    /// # Errors
    /// Returns an error if a migration fails.
    pub async fn from_connection(
        db: DatabaseConnection,
        cfg: &TwinRegistryConfig,
    ) -> anyhow::Result<Self> {
        if cfg.database.run_migrations {
            info!("Running twin registry database migrations");
            Migrator::up(&db, None)
                .await
                .context("twin registry migrations failed")?;
            info!("Twin registry database migrations completed successfully");
        }

        let service_config = ServiceConfig::from(cfg);
        let models_repo = Arc::new(SeaOrmModelsRepository::new(db.clone()));
        let twins_repo = Arc::new(SeaOrmTwinsRepository::new(db.clone()));
        let telemetry_repo = Arc::new(SeaOrmTelemetryRepository::new(db.clone()));

        let client = Arc::new(TwinRegistryLocalClient::new(
            ModelsService::new(
                models_repo.clone(),
                twins_repo.clone(),
                service_config.clone(),
            ),
            TwinsService::new(models_repo, twins_repo, service_config.clone()),
            TelemetryService::new(telemetry_repo, service_config),
        ));

        info!("Twin registry ready");
        Ok(Self { db, client })
    }

    /// The in-process client, for handing to consumers.
    #[must_use]
    pub fn client(&self) -> Arc<dyn TwinRegistryClientV1> {
        self.client.clone()
    }

    /// Check that the database answers.
    ///
    /// # Errors
    /// Returns [`TwinRegistryError::Internal`] if the ping fails.
    pub async fn health_check(&self) -> Result<(), TwinRegistryError> {
        self.db.ping().await.map_err(|e| {
            tracing::error!(error = %e, "Twin registry health check failed");
            TwinRegistryError::internal()
        })
    }

    /// Close the connection pool.
    ///
    /// # Errors
    /// Returns an error if the pool does not shut down cleanly.
    pub async fn close(self) -> anyhow::Result<()> {
        self.db
            .close()
            .await
            .context("failed to close twin registry database")
    }
}
